// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Double-click / double-tap windows, tracked per key.
//!
//! A *window* opens on a key (typically a node, or a `(channel, node)` pair)
//! every time a qualifying release lands on it. If another qualifying release
//! lands on the same key while the window is still open, the pair counts as a
//! double click. The window is consumed by that check and then re-armed with a
//! fresh start time, so the window slides: every click starts a new one.
//!
//! Windows are independent per key. Alternating clicks between two nodes
//! never pair up across nodes.
//!
//! ## Usage
//!
//! ```
//! use understory_event_state::click::GestureWindows;
//!
//! let mut windows: GestureWindows<u32> = GestureWindows::new(400);
//!
//! // First click on node 7.
//! assert!(!windows.take_pending(&7, 1_000));
//! windows.arm(7, 1_000);
//!
//! // A click on node 8 does not pair with node 7.
//! assert!(!windows.take_pending(&8, 1_100));
//! windows.arm(8, 1_100);
//!
//! // Second click on node 7 inside the window: double click.
//! assert!(windows.take_pending(&7, 1_200));
//! windows.arm(7, 1_200);
//!
//! // Too late for node 8.
//! assert!(!windows.take_pending(&8, 1_600));
//! ```
//!
//! ## Expiry
//!
//! Each arming schedules a deadline in an internal
//! [`TimerQueue`](crate::timer::TimerQueue). Call [`GestureWindows::expire`]
//! as time advances; it closes due windows and skips keys the caller reports
//! as gone. Re-arming cancels the previous deadline, so an older timer can
//! never close a newer window early. Timestamp checks in
//! [`GestureWindows::take_pending`] make the answer correct even when
//! `expire` has not been called yet.

use core::hash::Hash;

use hashbrown::HashMap;

use crate::timer::{TimerId, TimerQueue};

/// Default double-click window in milliseconds.
pub const DEFAULT_WINDOW_MS: u64 = 400;

#[derive(Clone, Copy, Debug)]
struct Pending {
    armed_at: u64,
    timer: TimerId,
}

/// Per-key "awaiting second click" flags with sliding expiry.
#[derive(Clone, Debug)]
pub struct GestureWindows<K> {
    window_ms: u64,
    pending: HashMap<K, Pending>,
    timers: TimerQueue<K>,
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> Default for GestureWindows<K> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_MS)
    }
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> GestureWindows<K> {
    /// Create an empty set of windows, each lasting `window_ms` milliseconds.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: HashMap::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Window length in milliseconds.
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Change the window length. Already armed windows keep their deadline.
    pub fn set_window_ms(&mut self, window_ms: u64) {
        self.window_ms = window_ms;
    }

    /// Open (or restart) the window for `key` at time `now`.
    pub fn arm(&mut self, key: K, now: u64) {
        if let Some(old) = self.pending.remove(&key) {
            self.timers.cancel(old.timer);
        }
        let timer = self.timers.schedule(now.saturating_add(self.window_ms), key);
        self.pending.insert(
            key,
            Pending {
                armed_at: now,
                timer,
            },
        );
        tracing::trace!(?key, now, "gesture window armed");
    }

    /// Returns `true` if the window for `key` is open at `now`.
    pub fn is_pending(&self, key: &K, now: u64) -> bool {
        self.pending
            .get(key)
            .is_some_and(|p| self.within(p.armed_at, now))
    }

    /// Consume the window for `key`, returning whether it was still open.
    ///
    /// The flag is cleared whether or not the window was open.
    pub fn take_pending(&mut self, key: &K, now: u64) -> bool {
        let Some(p) = self.pending.remove(key) else {
            return false;
        };
        self.timers.cancel(p.timer);
        self.within(p.armed_at, now)
    }

    /// Close the window for `key` without consuming a pair.
    pub fn cancel(&mut self, key: &K) -> bool {
        let Some(p) = self.pending.remove(key) else {
            return false;
        };
        self.timers.cancel(p.timer);
        true
    }

    /// Close every window whose key matches `pred`. Returns how many closed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|k, _| !pred(k));
        self.timers.cancel_where(|k| pred(k));
        before - self.pending.len()
    }

    /// Close every window.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.timers.clear();
    }

    /// Number of open windows.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` when no window is open.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest deadline among open windows.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_due()
    }

    /// Run every expiry due at or before `now`.
    ///
    /// `is_alive` is consulted for each expiring key. Keys reported as gone are
    /// dropped silently. Returns the number of windows closed for live keys.
    pub fn expire(&mut self, now: u64, mut is_alive: impl FnMut(&K) -> bool) -> usize {
        let mut closed = 0;
        let due: alloc::vec::Vec<K> = self.timers.expire(now).collect();
        for key in due {
            if self.pending.remove(&key).is_none() {
                continue;
            }
            if is_alive(&key) {
                closed += 1;
                tracing::debug!(?key, now, "gesture window expired");
            }
        }
        closed
    }

    fn within(&self, armed_at: u64, now: u64) -> bool {
        now.saturating_sub(armed_at) < self.window_ms
    }
}
