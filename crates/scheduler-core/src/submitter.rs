//! The boundary the shell uses to enroll a new job and to produce
//! accounting reports (spec.md §4.5).

use tracing::{info, warn};

use crate::context::SchedulerContext;
use crate::error::SchedulerError;
use crate::job::JobId;
use crate::process::ProcessHandle;

/// One line of `report()` output, in submission order and 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub index: usize,
    pub command: String,
    pub pid: i32,
    pub completion_ms: u64,
    pub wait_ms: u64,
}

impl std::fmt::Display for ReportLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (PID: {}, Completion Time: {}ms, Wait Time: {}ms)",
            self.index, self.command, self.pid, self.completion_ms, self.wait_ms
        )
    }
}

/// Spawns `program_path` (born suspended) and enrolls it as a batch job:
/// inserts it into the `JobTable` and enqueues it on the `ReadyQueue`.
///
/// Grounded on the original source's `add_job_to_queue`, called from the
/// `submit` branch of `shell_loop`. Fails with `SpawnFailed`, `TableFull`,
/// or `QueueFull` and, per spec.md §7, never mutates state on failure.
pub fn submit(
    ctx: &SchedulerContext,
    program_path: &str,
    args: &[String],
) -> Result<JobId, SchedulerError> {
    let handle = ProcessHandle::spawn(program_path, args)?;
    let pid = handle.pid();

    let mut state = ctx.lock();
    if state.table.is_full() {
        warn!(program_path, "job table full, rejecting submission");
        handle.kill();
        return Err(SchedulerError::TableFull {
            capacity: state.table.len(),
        });
    }
    if state.queue.is_full() {
        warn!(program_path, "ready queue full, rejecting submission");
        handle.kill();
        return Err(SchedulerError::QueueFull {
            capacity: state.queue.len(),
        });
    }

    let id = state.table.insert(program_path.to_string(), handle)?;
    state
        .queue
        .enqueue(id)
        .expect("capacity was checked above under the same lock");

    info!(job_id = id, pid, program_path, "submitted job");
    Ok(id)
}

/// Produces a snapshot of every submitted job with derived completion and
/// wait times, in submission order (spec.md §4.5).
pub fn report(ctx: &SchedulerContext) -> Vec<ReportLine> {
    let state = ctx.lock();
    state
        .table
        .snapshot()
        .into_iter()
        .enumerate()
        .map(|(i, record)| ReportLine {
            index: i + 1,
            command: record.command,
            pid: record.pid,
            completion_ms: record.quanta_run * ctx.tslice_ms,
            wait_ms: record.quanta_waited * ctx.tslice_ms,
        })
        .collect()
}
