use std::collections::{HashSet, VecDeque};

use crate::error::SchedulerError;
use crate::job::JobId;

/// Bounded FIFO of runnable job ids (spec.md §4.2).
///
/// The original source (`original_source/scheduler.c`) backs this with a
/// fixed `MAX_QUEUE_SIZE` ring buffer that silently drops on overflow; the
/// redesign keeps the fixed capacity but surfaces overflow as `QueueFull`
/// instead (spec.md: "in this redesign it shall instead fail... and be
/// surfaced to the submitter").
pub struct ReadyQueue {
    capacity: usize,
    queue: VecDeque<JobId>,
    members: HashSet<JobId>,
}

impl ReadyQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: VecDeque::with_capacity(capacity.min(1024)),
            members: HashSet::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    /// Appends to the tail. Fails `QueueFull` at capacity. A job id already
    /// present is never enqueued twice (spec.md invariant: "a job identifier
    /// is in the queue at most once at any time").
    pub fn enqueue(&mut self, id: JobId) -> Result<(), SchedulerError> {
        if self.members.contains(&id) {
            return Ok(());
        }
        if self.is_full() {
            return Err(SchedulerError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.queue.push_back(id);
        self.members.insert(id);
        Ok(())
    }

    /// Removes from the head.
    pub fn dequeue(&mut self) -> Option<JobId> {
        let id = self.queue.pop_front()?;
        self.members.remove(&id);
        Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.members.contains(&id)
    }

    /// Drains every id still queued, for teardown.
    pub fn drain(&mut self) -> Vec<JobId> {
        self.members.clear();
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod fifo_order {
        use super::*;

        #[test]
        fn enqueue_then_dequeue_preserves_order() {
            let mut q = ReadyQueue::new(4);
            q.enqueue(1).unwrap();
            q.enqueue(2).unwrap();
            q.enqueue(3).unwrap();
            assert_eq!(q.dequeue(), Some(1));
            assert_eq!(q.dequeue(), Some(2));
            assert_eq!(q.dequeue(), Some(3));
            assert_eq!(q.dequeue(), None);
        }
    }

    mod capacity {
        use super::*;

        #[test]
        fn enqueue_rejects_overflow_without_mutating_state() {
            let mut q = ReadyQueue::new(2);
            q.enqueue(1).unwrap();
            q.enqueue(2).unwrap();
            let err = q.enqueue(3);
            assert!(matches!(err, Err(SchedulerError::QueueFull { capacity: 2 })));
            assert_eq!(q.len(), 2);
        }
    }

    mod membership {
        use super::*;

        #[test]
        fn enqueue_is_idempotent_for_a_duplicate_id() {
            let mut q = ReadyQueue::new(2);
            q.enqueue(1).unwrap();
            q.enqueue(1).unwrap();
            assert_eq!(q.len(), 1);
        }
    }
}
