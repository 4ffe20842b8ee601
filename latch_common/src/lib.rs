//! Latch Common Library
//!
//! This crate provides the shared mode enum, tunable constants, actuator
//! interface and configuration loading utilities for all latch workspace
//! crates.
//!
//! # Module Structure
//!
//! - [`sequencer`] - Operating modes of the lander/latch sequencer
//! - [`consts`] - Power levels, timing gates and default device names
//! - [`hal`] - Actuator sink trait, polarity and HAL error types
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use latch_common::prelude::*;
//!
//! assert_eq!(Mode::default(), Mode::Standby);
//! assert!(LOCK_SETTLE_TIME.as_millis() == 500);
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
pub mod sequencer;
