//! Real-time setup for the control thread.
//!
//! With the `rt` feature enabled the control thread locks its memory pages,
//! pins itself to a CPU core and switches to `SCHED_FIFO`. Without the
//! feature every step is a no-op, which is the normal simulation setup.

use crate::error::SequencerError;

/// CPU placement and priority for the control thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtOptions {
    /// CPU core to pin the control thread to.
    pub cpu_core: usize,
    /// `SCHED_FIFO` priority.
    pub priority: i32,
}

impl Default for RtOptions {
    fn default() -> Self {
        Self {
            cpu_core: 1,
            priority: 80,
        }
    }
}

/// Lock all current and future memory pages.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), SequencerError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| SequencerError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), SequencerError> {
    Ok(()) // No-op in simulation mode
}

/// Pin the current thread to a specific CPU core.
#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), SequencerError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| SequencerError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| SequencerError::RtSetup(format!("sched_setaffinity failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), SequencerError> {
    Ok(()) // No-op in simulation mode
}

/// Set SCHED_FIFO with the given RT priority.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), SequencerError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    // SAFETY: `param` is a valid, initialized sched_param; pid 0 is the caller.
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(SequencerError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), SequencerError> {
    Ok(()) // No-op in simulation mode
}

/// Whether this build can apply RT scheduling at all.
#[inline]
pub const fn rt_available() -> bool {
    cfg!(feature = "rt")
}

/// Perform the RT setup sequence on the calling thread.
pub fn rt_setup(options: RtOptions) -> Result<(), SequencerError> {
    rt_mlockall()?;
    rt_set_affinity(options.cpu_core)?;
    rt_set_scheduler(options.priority)?;
    Ok(())
}

/// Whether the calling thread runs under a real-time scheduling policy.
pub fn is_realtime() -> bool {
    #[cfg(target_os = "linux")]
    {
        // SAFETY: sched_getscheduler has no memory-safety preconditions.
        let policy = unsafe { libc::sched_getscheduler(0) };
        policy == libc::SCHED_FIFO || policy == libc::SCHED_RR
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}
