//! Delayed-task queue.
//!
//! Tasks are plain values tagged with a due time. They come out in due-time
//! order, and tasks due at the same instant come out in the order they were
//! scheduled. Nothing runs on its own: the owner polls with the current time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

struct Entry<T> {
    due: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap yields the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

/// Min-heap of tasks keyed by due time, FIFO among equal due times.
pub struct Scheduler<T> {
    queue: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to become due `delay` after `now`.
    ///
    /// Returns the absolute due time.
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: T) -> Duration {
        let due = now.saturating_add(delay);
        self.queue.push(Entry {
            due,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
        due
    }

    /// Remove and return the earliest task if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        if self.queue.peek()?.due > now {
            return None;
        }
        self.queue.pop().map(|entry| (entry.due, entry.task))
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|entry| entry.due)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no tasks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
