// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-target hover tracking.
//!
//! Unlike path-based hover (which enters and leaves every ancestor), a
//! [`TargetTracker`] remembers a single node: the one the input is currently
//! "inside". Callers that route several input channels share one tracker, so
//! the mouse and a touch contact move the same target. Moving onto another
//! node yields a leave for the old one and an enter for the new one, in that
//! order.
//!
//! ```
//! use understory_event_state::hover::{HoverEvent, TargetTracker};
//!
//! let mut hover = TargetTracker::new();
//! assert_eq!(hover.enter(1_u32).as_slice(), &[HoverEvent::Enter(1)]);
//! assert!(hover.enter(1).is_empty());
//! assert_eq!(
//!     hover.enter(2).as_slice(),
//!     &[HoverEvent::Leave(1), HoverEvent::Enter(2)]
//! );
//! assert_eq!(hover.leave(), Some(2));
//! assert_eq!(hover.current(), None);
//! ```

use smallvec::SmallVec;

/// A hover transition for one node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered this node.
    Enter(K),
    /// The pointer left this node.
    Leave(K),
}

/// At most one leave followed by at most one enter.
pub type HoverTransition<K> = SmallVec<[HoverEvent<K>; 2]>;

/// Remembers which node the pointer is inside.
#[derive(Copy, Clone, Debug)]
pub struct TargetTracker<K> {
    current: Option<K>,
}

impl<K> Default for TargetTracker<K> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<K: Copy + PartialEq> TargetTracker<K> {
    /// Create a tracker with no current target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current target, if any.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Returns `true` if `node` is the current target.
    pub fn is_current(&self, node: &K) -> bool {
        self.current.as_ref() == Some(node)
    }

    /// Make `node` the current target and report the transition.
    ///
    /// Entering the node that is already current produces nothing.
    pub fn enter(&mut self, node: K) -> HoverTransition<K> {
        let mut out = HoverTransition::new();
        if self.is_current(&node) {
            return out;
        }
        if let Some(old) = self.current.replace(node) {
            out.push(HoverEvent::Leave(old));
        }
        out.push(HoverEvent::Enter(node));
        out
    }

    /// Clear the current target, returning the node that was left.
    pub fn leave(&mut self) -> Option<K> {
        self.current.take()
    }

    /// Clear the target only if it is `node`. Returns `true` if it was.
    ///
    /// Used when `node` disappears without the pointer actually leaving it,
    /// so no leave event is owed.
    pub fn forget(&mut self, node: &K) -> bool {
        if self.is_current(node) {
            self.current = None;
            return true;
        }
        false
    }
}
