//! Deferred work on the host's virtual clock
//!
//! Refresh components never run delayed work directly. They enqueue a
//! [`Task`] here (or attach one to an offset animation) and the host runs it
//! when the clock passes its due time. Tasks are plain data so they can
//! outlive the component that created them; the host drops any task whose
//! [`ComponentId`] no longer occupies the slot.

use std::time::Duration;

use crate::component::{ComponentId, Edge};

/// Work resolved by the host against the current slot occupants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Capture the origin inset and start observing the container
    BeginObserving { edge: Edge, id: ComponentId },
    /// Invoke the component's trigger callback
    Trigger { edge: Edge, id: ComponentId },
    /// Stop whichever component occupies `edge` when the task runs
    StopRefreshing { edge: Edge, animated: bool },
    /// Clear `ignore_observe` on the component
    ReleaseObserve { edge: Edge, id: ComponentId },
}

/// Tasks run when an offset animation ends
pub type Completion = Vec<Task>;

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: Vec<Scheduled>,
    seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run once the clock reaches `now + delay`.
    /// A zero delay still waits for the next tick.
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: Task) {
        self.seq += 1;
        self.queue.push(Scheduled {
            due: now + delay,
            seq: self.seq,
            task,
        });
    }

    /// Remove and return every task due at `now`, earliest first.
    /// Ties keep insertion order.
    pub fn take_due(&mut self, now: Duration) -> Vec<Task> {
        let mut due: Vec<Scheduled> = Vec::new();
        let mut pending = Vec::with_capacity(self.queue.len());
        for item in self.queue.drain(..) {
            if item.due <= now {
                due.push(item);
            } else {
                pending.push(item);
            }
        }
        self.queue = pending;
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Earliest due time, if anything is queued
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.iter().map(|s| s.due).min()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(id: u64) -> Task {
        Task::Trigger {
            edge: Edge::Top,
            id: ComponentId::from_raw(id),
        }
    }

    #[test]
    fn test_take_due_orders_by_time_then_insertion() {
        let mut scheduler = Scheduler::new();
        let now = Duration::from_millis(100);
        scheduler.schedule(now, Duration::from_millis(200), trigger(1));
        scheduler.schedule(now, Duration::from_millis(10), trigger(2));
        scheduler.schedule(now, Duration::from_millis(10), trigger(3));

        let due = scheduler.take_due(Duration::from_millis(110));
        assert_eq!(due, vec![trigger(2), trigger(3)]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn test_zero_delay_is_due_on_same_timestamp() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::ZERO, Duration::ZERO, trigger(7));
        assert_eq!(scheduler.take_due(Duration::ZERO), vec![trigger(7)]);
        assert!(scheduler.is_empty());
    }
}
