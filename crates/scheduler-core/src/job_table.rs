use crate::error::SchedulerError;
use crate::job::{Job, JobId, JobRecord};
use crate::process::ProcessHandle;

/// Bounded append-only registry of every submitted job (spec.md §4.1).
///
/// Grounded on the original source's `commands_submitted` array and
/// `jobs_submitted` counter (`original_source/scheduler.c`); the teacher's
/// `HashMap<u32, Pcb>` in `27-process-scheduler` showed the idiomatic
/// Rust shape, but a dense `Vec` fits better here because ids are never
/// removed — an index is a stable, minimal `JobId`.
pub struct JobTable {
    capacity: usize,
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            jobs: Vec::with_capacity(capacity.min(1024)),
        }
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    /// Reserves a new record. Fails with `TableFull` when the table is at
    /// capacity; the caller must check `is_full` before spawning the
    /// process this record will own, so this never actually fails in
    /// practice under the single-writer locking discipline (`submitter.rs`).
    pub fn insert(&mut self, command: String, handle: ProcessHandle) -> Result<JobId, SchedulerError> {
        if self.is_full() {
            return Err(SchedulerError::TableFull {
                capacity: self.capacity,
            });
        }
        let id = self.jobs.len();
        self.jobs.push(Job::new(command, handle));
        Ok(id)
    }

    /// Total on live identifiers; never fails for an id previously returned
    /// by `insert`.
    pub fn get(&self, id: JobId) -> &Job {
        &self.jobs[id]
    }

    pub fn get_mut(&mut self, id: JobId) -> &mut Job {
        &mut self.jobs[id]
    }

    /// The single place wait time accrues: see `Job::update_on_run`.
    pub fn update_on_run(&mut self, id: JobId, current_tick: u64) {
        self.jobs[id].update_on_run(current_tick);
    }

    /// Snapshot of every submitted job, in submission order, for reporting.
    pub fn snapshot(&self) -> Vec<JobRecord> {
        self.jobs
            .iter()
            .map(|job| JobRecord {
                command: job.command.clone(),
                pid: job.handle.pid(),
                quanta_run: job.quanta_run,
                quanta_waited: job.quanta_waited,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// All job ids currently registered, for teardown sweeps.
    pub fn ids(&self) -> impl Iterator<Item = JobId> {
        0..self.jobs.len()
    }
}
