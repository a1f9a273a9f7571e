use std::sync::{Arc, Mutex, MutexGuard};

use crate::cpu_pool::CpuPool;
use crate::error::SchedulerError;
use crate::job::{JobId, JobState};
use crate::job_table::JobTable;
use crate::ready_queue::ReadyQueue;

/// The upper bound on `NCPU` (spec.md §6). Carried over from the original
/// source's `MAX_NCPU`.
pub const MAX_NCPU: usize = 16;

/// Default bound on submitted jobs and queue depth, carried over from the
/// original source's `MAX_COMMANDS_SUBMIT` / `MAX_QUEUE_SIZE` (both 100).
pub const DEFAULT_CAPACITY: usize = 100;

/// Everything the scheduler loop mutates each quantum, behind one lock
/// (spec.md §5: "a single mutex guards JobTable + ReadyQueue + CpuPool as
/// one critical section").
pub struct SchedulerState {
    pub table: JobTable,
    pub queue: ReadyQueue,
    pub pool: CpuPool,
    pub tick: u64,
}

impl SchedulerState {
    /// Derives the `JobState` of `id` from where it currently lives — a
    /// `CpuPool` slot, the `ReadyQueue`, or neither (spec.md §3:
    /// "JobState... derived, not stored").
    pub fn job_state(&self, id: JobId) -> JobState {
        if self.pool.occupied().any(|(_, occupant)| occupant == id) {
            JobState::Running
        } else if self.queue.contains(id) {
            JobState::Ready
        } else {
            JobState::Finished
        }
    }
}

/// Process-wide scheduling configuration and shared state, replacing the
/// original source's file-scope globals (`NCPU`, `TSLICE`, the job table,
/// the queue) with one value constructed at startup and passed explicitly
/// (spec.md §9).
#[derive(Clone)]
pub struct SchedulerContext {
    pub ncpu: usize,
    pub tslice_ms: u64,
    state: Arc<Mutex<SchedulerState>>,
}

impl SchedulerContext {
    pub fn new(ncpu: usize, tslice_ms: u64) -> Result<Self, SchedulerError> {
        Self::with_capacity(ncpu, tslice_ms, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(ncpu: usize, tslice_ms: u64, capacity: usize) -> Result<Self, SchedulerError> {
        if ncpu == 0 || ncpu > MAX_NCPU {
            return Err(SchedulerError::ConfigInvalid(format!(
                "NCPU must be in 1..={MAX_NCPU}, got {ncpu}"
            )));
        }
        if tslice_ms == 0 {
            return Err(SchedulerError::ConfigInvalid(
                "TSLICE must be >= 1".to_string(),
            ));
        }
        let state = SchedulerState {
            table: JobTable::new(capacity),
            queue: ReadyQueue::new(capacity),
            pool: CpuPool::new(ncpu),
            tick: 0,
        };
        Ok(Self {
            ncpu,
            tslice_ms,
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Acquires the single critical section. Must never be held across an
    /// `.await` point — the quantum sleep in `scheduler::run_one_quantum`
    /// deliberately drops it first.
    pub fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().expect("scheduler state mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_validation {
        use super::*;

        #[test]
        fn rejects_ncpu_out_of_range() {
            assert!(matches!(
                SchedulerContext::new(0, 10),
                Err(SchedulerError::ConfigInvalid(_))
            ));
            assert!(matches!(
                SchedulerContext::new(17, 10),
                Err(SchedulerError::ConfigInvalid(_))
            ));
        }

        #[test]
        fn rejects_zero_tslice() {
            assert!(matches!(
                SchedulerContext::new(2, 0),
                Err(SchedulerError::ConfigInvalid(_))
            ));
        }

        #[test]
        fn accepts_boundary_values() {
            assert!(SchedulerContext::new(1, 1).is_ok());
            assert!(SchedulerContext::new(MAX_NCPU, 1).is_ok());
        }
    }

    mod job_state {
        use super::*;

        #[tokio::test]
        async fn reflects_queue_pool_and_finished() {
            let ctx = SchedulerContext::new(1, 50).unwrap();
            let queued = crate::submitter::submit(&ctx, "/bin/sleep", &["5".to_string()]).unwrap();
            assert_eq!(ctx.lock().job_state(queued), JobState::Ready);

            crate::scheduler::run_one_quantum(&ctx).await;
            // After one quantum the only job has been dispatched and then
            // pre-empted back into the queue (Phase C runs unconditionally).
            assert_eq!(ctx.lock().job_state(queued), JobState::Ready);

            let finished = crate::submitter::submit(&ctx, "/bin/true", &[]).unwrap();
            crate::scheduler::run_one_quantum(&ctx).await;
            crate::scheduler::run_one_quantum(&ctx).await;
            assert_eq!(ctx.lock().job_state(finished), JobState::Finished);

            crate::scheduler::teardown(&ctx).await;
        }
    }
}
