//! Single-flight autosearch job lock and a wall-clock-bounded wrapper
//! around exact (backtracking) realization.
//!
//! The source bounds exact realization with `multiprocessing.Process` +
//! `Queue` + `join(timeout)`, then `terminate()`s the child on timeout --
//! real OS-process isolation, since a cooperative cancellation flag inside
//! the algorithm cannot reliably stop a worker stuck deep in backtracking.
//! A plain Rust thread has no equivalent of `terminate()`, so the faithful
//! translation is to shell out to a second `specx realize-exact` process
//! and poll it with `try_wait`, killing the child if it outruns the
//! budget -- termination that is actually reliable, unlike abandoning a
//! thread.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use specx_graph::edges::EdgeSet;

/// Process-global flag enforcing that at most one autosearch batch runs at
/// a time, mirroring the source's single `threading.Lock`.
pub struct JobLock {
    held: Arc<AtomicBool>,
}

impl JobLock {
    /// Creates a new, initially-unlocked job lock.
    pub fn new() -> Self {
        JobLock {
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attempts to acquire the lock without blocking. Returns a guard that
    /// releases the lock on drop, or `None` if another job already holds
    /// it.
    pub fn try_acquire(&self) -> Option<JobGuard> {
        if self.held.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
            Some(JobGuard { held: self.held.clone() })
        } else {
            None
        }
    }
}

impl Default for JobLock {
    fn default() -> Self {
        JobLock::new()
    }
}

/// RAII guard releasing a [`JobLock`] when dropped.
pub struct JobGuard {
    held: Arc<AtomicBool>,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

/// Runs exact (backtracking) realization in a child `specx realize-exact`
/// process with a wall-clock budget, killing the child if it runs over.
/// Returns `None` on timeout, a non-graphical sequence, or a backtracking
/// failure -- the same "skip, don't fail the batch" semantics as the
/// source's `run_algorithm_timeout`.
///
/// This process *is* `specx` (re-invoked for any caller that isn't the CLI
/// entry point itself, `current_exe` always resolves back to the running
/// binary), so re-spawning via `current_exe` is always correct here; unlike
/// a thread, the child this starts can be reliably reclaimed with `kill`.
pub fn realize_backtracking_with_timeout(
    degrees: Vec<u32>,
    seed: Option<u64>,
    max_steps: u64,
    timeout: Duration,
) -> Option<EdgeSet> {
    let n = degrees.len();
    let exe = std::env::current_exe().ok()?;
    let degrees_arg = degrees.iter().map(u32::to_string).collect::<Vec<_>>().join(",");

    let mut cmd = Command::new(exe);
    cmd.arg("realize-exact")
        .arg("--degrees")
        .arg(degrees_arg)
        .arg("--max-steps")
        .arg(max_steps.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(seed) = seed {
        cmd.arg("--seed").arg(seed.to_string());
    }

    let mut child = cmd.spawn().ok()?;
    let started = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                std::thread::sleep(Duration::from_millis(15));
            }
            Err(_) => return None,
        }
    };

    if !status.success() {
        return None;
    }

    let mut stdout = String::new();
    child.stdout.take()?.read_to_string(&mut stdout).ok()?;
    let edges: Vec<(u32, u32)> = serde_json::from_str(stdout.trim()).ok()?;
    Some(EdgeSet::normalize(n, edges))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_lock_rejects_concurrent_acquire() {
        let lock = JobLock::new();
        let first = lock.try_acquire();
        assert!(first.is_some());
        assert!(lock.try_acquire().is_none());
        drop(first);
        assert!(lock.try_acquire().is_some());
    }

    // Exercising `realize_backtracking_with_timeout` itself means spawning a
    // real `specx` child process; that belongs in `tests/realize_exact_timeout.rs`,
    // where `CARGO_BIN_EXE_specx` is actually available.
}
