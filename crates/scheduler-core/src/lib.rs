//! Pre-emptive round-robin batch scheduler over a fixed-size CPU pool,
//! driven by OS-level `SIGSTOP`/`SIGCONT` signals.
//!
//! This is the batch scheduling subsystem of an interactive shell: jobs
//! enrolled with `submitter::submit` are dispatched by `scheduler::run` in
//! fixed time quanta across `ncpu` simulated CPUs, with completion and wait
//! time accounted in whole quanta. See `SPEC_FULL.md` at the workspace root
//! for the full design.

pub mod context;
pub mod cpu_pool;
pub mod error;
pub mod job;
pub mod job_table;
pub mod process;
pub mod ready_queue;
pub mod scheduler;
pub mod submitter;

pub use context::SchedulerContext;
pub use error::SchedulerError;
pub use job::{JobId, JobState};
pub use submitter::{report, submit, ReportLine};
