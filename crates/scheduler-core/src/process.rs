//! OS process control: spawning a job born suspended, delivering the
//! STOP/CONTINUE/KILL signals that drive pre-emption, and probing liveness.
//!
//! Grounded on `other_examples/manifests/softdevteam-snare`'s `jobrunner.rs`
//! for the `nix::sys::signal` plumbing. The self-`SIGSTOP` in `pre_exec`
//! replaces the original C source's `pause()`-before-`exec` scheme: a
//! process that stops itself cannot race a `CONTINUE` sent before it reaches
//! the stop point, whereas a process blocked in `pause()` can miss a signal
//! delivered a moment too early.

use std::os::unix::process::CommandExt;
use std::process::Stdio;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};

use crate::error::SchedulerError;

/// A submitted job's OS-level identity: a child process and the signals
/// needed to suspend, resume, and terminate it.
pub struct ProcessHandle {
    child: Child,
    pid: Pid,
}

impl ProcessHandle {
    /// Spawns `program` with `args`, born suspended: the child raises
    /// `SIGSTOP` on itself before `exec`, so it never executes a single
    /// instruction of user code outside a scheduler-granted quantum
    /// (spec.md §4.5, "Why born suspended matters").
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, SchedulerError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // SAFETY: the closure only calls the async-signal-safe `raise(2)`
        // between `fork` and `exec`, as required by `pre_exec`'s contract.
        unsafe {
            command.pre_exec(|| {
                nix::sys::signal::raise(Signal::SIGSTOP)
                    .map_err(|errno| std::io::Error::from_raw_os_error(errno as i32))
            });
        }

        let child = command.spawn().map_err(SchedulerError::SpawnFailed)?;
        let pid = Pid::from_raw(child.id().expect("freshly spawned child has a pid") as i32);
        Ok(Self { child, pid })
    }

    pub fn pid(&self) -> i32 {
        self.pid.as_raw()
    }

    /// Resume the job for one quantum (Phase A of the quantum loop).
    pub fn resume(&self) {
        // A failure here means the process is already gone; that is not an
        // error, it is the `SignalLost` evidence that the job is Finished.
        let _ = kill(self.pid, Signal::SIGCONT);
    }

    /// Suspend the job at the end of its quantum (Phase C, still alive).
    pub fn suspend(&self) {
        let _ = kill(self.pid, Signal::SIGSTOP);
    }

    /// Unconditionally terminate the job (teardown only).
    pub fn kill(&self) {
        let _ = kill(self.pid, Signal::SIGKILL);
    }

    /// Non-destructive liveness probe. Reaps the child if it has already
    /// exited, which is how this design avoids the zombie processes the
    /// original source left as an open question (spec.md §9).
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Wait for the job to exit, for use during teardown after `kill()`.
    pub async fn reap(&mut self) {
        let _ = self.child.wait().await;
    }
}
