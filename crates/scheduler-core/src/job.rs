use crate::process::ProcessHandle;

/// Opaque, stable identifier for a submitted job. Stable for the life of
/// the process — indices into `JobTable` are never reused.
pub type JobId = usize;

/// Derived state of a job. Never stored directly; computed from where the
/// job's id currently lives (a `CpuPool` slot, the `ReadyQueue`, or neither).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Ready,
    Running,
    Finished,
}

/// A single submitted job: identity, command text, OS process handle, and
/// the accounting counters from spec.md §3.
pub struct Job {
    pub command: String,
    pub handle: ProcessHandle,
    /// Quanta during which this job occupied a CPU slot.
    pub quanta_run: u64,
    /// Quanta during which this job was enqueued but not on a CPU.
    pub quanta_waited: u64,
    /// Ordinal of the most recent quantum in which this job ran.
    /// `None` is the "never" sentinel from spec.md.
    pub last_run_quantum: Option<u64>,
}

impl Job {
    pub fn new(command: String, handle: ProcessHandle) -> Self {
        Self {
            command,
            handle,
            quanta_run: 0,
            quanta_waited: 0,
            last_run_quantum: None,
        }
    }

    /// Accrues one quantum of run time and, unless this is the job's first
    /// dispatch, the wait time accumulated since it last ran. This is the
    /// single place wait time is charged — see `JobTable::update_on_run`.
    pub fn update_on_run(&mut self, current_tick: u64) {
        self.quanta_run += 1;
        if let Some(last) = self.last_run_quantum {
            self.quanta_waited += current_tick - last;
        }
        self.last_run_quantum = Some(current_tick);
    }
}

/// A point-in-time copy of a job's accounting state, used for `report()`.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub command: String,
    pub pid: i32,
    pub quanta_run: u64,
    pub quanta_waited: u64,
}
