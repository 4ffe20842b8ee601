//! State machine module root.
//!
//! The mode set and its per-cycle dispatch. Shared, lock-guarded storage
//! of the current mode lives in [`crate::shared`].

pub mod machine;
