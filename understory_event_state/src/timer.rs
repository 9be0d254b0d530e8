// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadline queue for deferred state changes driven by event timestamps.
//!
//! There is no clock here. Callers schedule payloads at absolute deadlines
//! (milliseconds, on whatever time base their input events use) and later
//! call [`TimerQueue::expire`] with the current time to collect everything
//! that came due. Pending entries can be cancelled individually or by
//! predicate, which is how owners drop timers for objects that went away.
//!
//! ```
//! use understory_event_state::timer::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let a = timers.schedule(100, "a");
//! timers.schedule(50, "b");
//! timers.schedule(300, "c");
//! assert_eq!(timers.cancel(a), Some("a"));
//!
//! let due: Vec<_> = timers.expire(200).collect();
//! assert_eq!(due, vec!["b"]);
//! assert_eq!(timers.next_due(), Some(300));
//! ```

use alloc::vec::Vec;

/// Handle returned by [`TimerQueue::schedule`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    id: TimerId,
    due: u64,
    payload: T,
}

/// Ordered set of pending deadlines.
///
/// Entries with the same deadline expire in scheduling order.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    // Sorted by (due, id).
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Schedule `payload` to expire at `due`.
    pub fn schedule(&mut self, due: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // New ids are always the largest, so ties land after existing entries.
        let at = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(at, Entry { id, due, payload });
        id
    }

    /// Cancel a pending timer, returning its payload if it had not expired.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let at = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(at).payload)
    }

    /// Cancel every pending timer whose payload matches `pred`.
    ///
    /// Returns the number of cancelled timers.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.payload));
        before - self.entries.len()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.first().map(|e| e.due)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and yield, in deadline order, every payload due at or before `now`.
    pub fn expire(&mut self, now: u64) -> impl Iterator<Item = T> + '_ {
        let due = self.entries.partition_point(|e| e.due <= now);
        self.entries.drain(..due).map(|e| e.payload)
    }
}
