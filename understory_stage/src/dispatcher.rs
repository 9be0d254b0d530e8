// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deliver synthetic events to application code.
//!
//! [`Stage::handle`](crate::Stage::handle) returns the complete, ordered list
//! of events for one raw input, with all stage state already updated. Only
//! then does application code run, through one of two helpers:
//!
//! - [`deliver`] walks the list with a single handler and stops early on
//!   [`Outcome::Stop`].
//! - [`Listeners`] keeps callbacks registered per node and event kind and
//!   invokes the matching ones, optionally bubbling to ancestors.
//!
//! Since handlers run after the stage is done with the raw event, they are
//! free to edit the scene (remove nodes, toggle flags) without corrupting
//! dispatch. Tell the stage about removed nodes with
//! [`Stage::node_removed`](crate::Stage::node_removed).
//!
//! ## Minimal example
//!
//! ```
//! use understory_stage::dispatcher::{Outcome, deliver};
//! use understory_stage::{Channel, EventKind, StageEvent};
//!
//! let ev = |kind, node| StageEvent { kind, node, channel: Channel::Pointer, position: None, time: 0 };
//! let events = [ev(EventKind::Release, 1_u32), ev(EventKind::Click, 1), ev(EventKind::DoubleClick, 1)];
//!
//! let mut names = Vec::new();
//! let stopped = deliver(&events, &mut names, |e, names| {
//!     names.push(e.name());
//!     if e.kind == EventKind::Click { Outcome::Stop } else { Outcome::Continue }
//! });
//!
//! assert_eq!(stopped.map(|e| e.kind), Some(EventKind::Click));
//! assert_eq!(names, ["mouseup", "click"]);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::event::{EventKind, StageEvent};

/// Whether delivery goes on after a handler returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Outcome {
    /// Keep going.
    #[default]
    Continue,
    /// Stop delivering.
    Stop,
}

/// Run `handler` over `events` in order and honor stop outcomes.
///
/// Returns `None` if every event was handled, or the event whose handler
/// returned [`Outcome::Stop`].
pub fn deliver<'a, K, E>(
    events: &'a [StageEvent<K>],
    payload: &mut E,
    mut handler: impl FnMut(&StageEvent<K>, &mut E) -> Outcome,
) -> Option<&'a StageEvent<K>> {
    for e in events {
        match handler(e, payload) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(e),
        }
    }
    None
}

/// Handle returned by [`Listeners::on`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<K, E> = Box<dyn FnMut(&StageEvent<K>, &mut E) -> Outcome>;

struct Entry<K, E> {
    id: ListenerId,
    node: K,
    kind: EventKind,
    callback: Callback<K, E>,
}

/// Callbacks keyed by node and event kind.
///
/// `E` is a payload shared by all callbacks during one emission, typically
/// application state.
///
/// ```
/// use understory_stage::dispatcher::{Listeners, Outcome};
/// use understory_stage::{Channel, EventKind, StageEvent};
///
/// let mut listeners: Listeners<u32, Vec<&'static str>> = Listeners::new();
/// listeners.on(7, EventKind::Click, |_, log| {
///     log.push("clicked 7");
///     Outcome::Continue
/// });
///
/// let click = StageEvent { kind: EventKind::Click, node: 7, channel: Channel::Pointer, position: None, time: 0 };
/// let mut log = Vec::new();
/// listeners.emit(&[click], &mut log);
/// assert_eq!(log, ["clicked 7"]);
/// ```
pub struct Listeners<K, E> {
    next_id: u64,
    entries: Vec<Entry<K, E>>,
}

impl<K: core::fmt::Debug, E> core::fmt::Debug for Listeners<K, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut list = f.debug_list();
        for e in &self.entries {
            list.entry(&(e.id, &e.node, e.kind));
        }
        list.finish()
    }
}

impl<K, E> Default for Listeners<K, E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq, E> Listeners<K, E> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `kind` events on `node`.
    ///
    /// Callbacks for the same node and kind run in registration order.
    pub fn on(
        &mut self,
        node: K,
        kind: EventKind,
        callback: impl FnMut(&StageEvent<K>, &mut E) -> Outcome + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            node,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Unregister one callback. Returns `false` if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Unregister every callback of `node`, for example after it left the scene.
    pub fn remove_node(&mut self, node: K) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.node != node);
        before - self.entries.len()
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke the callbacks registered on each event's own node, in event order.
    ///
    /// [`Outcome::Stop`] skips the remaining callbacks for that event only.
    /// Returns the number of callbacks invoked.
    pub fn emit(&mut self, events: &[StageEvent<K>], payload: &mut E) -> usize {
        let mut calls = 0;
        for ev in events {
            let (n, _) = self.fire(ev, ev.node, payload);
            calls += n;
        }
        calls
    }

    /// Like [`Listeners::emit`], but each event then bubbles to the ancestors
    /// given by `parent_of`, nearest first.
    ///
    /// [`Outcome::Stop`] ends bubbling for that event.
    pub fn emit_bubbling(
        &mut self,
        events: &[StageEvent<K>],
        payload: &mut E,
        parent_of: impl Fn(K) -> Option<K>,
    ) -> usize {
        let mut calls = 0;
        for ev in events {
            let mut at = Some(ev.node);
            while let Some(node) = at {
                let (n, stopped) = self.fire(ev, node, payload);
                calls += n;
                if stopped {
                    break;
                }
                at = parent_of(node);
            }
        }
        calls
    }

    fn fire(&mut self, ev: &StageEvent<K>, node: K, payload: &mut E) -> (usize, bool) {
        let mut calls = 0;
        for entry in &mut self.entries {
            if entry.node != node || entry.kind != ev.kind {
                continue;
            }
            calls += 1;
            if (entry.callback)(ev, payload) == Outcome::Stop {
                return (calls, true);
            }
        }
        (calls, false)
    }
}
