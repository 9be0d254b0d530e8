// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input as it arrives from the windowing layer, and per-channel state.
//!
//! Mouse-like devices and touch screens feed the same dispatch path; they
//! differ only by [`Channel`]. Touch input may carry several contacts, but
//! only the *primary* one counts: the first contact of a gesture. Other
//! contacts are ignored until the primary contact ends.

use kurbo::Point;
use smallvec::SmallVec;

/// Which family of input an event belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Mouse, pen or any other hovering pointer.
    Pointer,
    /// Touch screen.
    Touch,
}

impl Channel {
    /// Both channels, in index order.
    pub const ALL: [Self; 2] = [Self::Pointer, Self::Touch];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Pointer => 0,
            Self::Touch => 1,
        }
    }
}

/// One touch contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPoint {
    /// Identifier stable for the lifetime of the contact.
    pub id: u64,
    /// Surface position.
    pub position: Point,
}

impl TouchPoint {
    /// A contact `id` at `position`.
    pub fn new(id: u64, position: impl Into<Point>) -> Self {
        Self {
            id,
            position: position.into(),
        }
    }
}

/// Contacts that changed in one touch event.
pub type Contacts = SmallVec<[TouchPoint; 2]>;

/// A raw input signal.
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    /// Button pressed at a point.
    PointerDown(Point),
    /// Pointer moved to a point.
    PointerMove(Point),
    /// Button released at a point.
    PointerUp(Point),
    /// Pointer left the surface.
    PointerLeave,
    /// New contacts touched the surface.
    TouchStart(Contacts),
    /// Contacts moved.
    TouchMove(Contacts),
    /// Contacts lifted.
    TouchEnd(Contacts),
    /// The platform cancelled every contact.
    TouchCancel,
}

/// A raw input signal with its timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent {
    /// Milliseconds on a monotonic clock shared by all events of a stage.
    pub time: u64,
    /// The signal.
    pub input: RawInput,
}

impl RawEvent {
    /// Wrap `input` with its timestamp.
    pub fn new(time: u64, input: RawInput) -> Self {
        Self { time, input }
    }

    /// Pointer press.
    pub fn pointer_down(time: u64, at: impl Into<Point>) -> Self {
        Self::new(time, RawInput::PointerDown(at.into()))
    }

    /// Pointer move.
    pub fn pointer_move(time: u64, at: impl Into<Point>) -> Self {
        Self::new(time, RawInput::PointerMove(at.into()))
    }

    /// Pointer release.
    pub fn pointer_up(time: u64, at: impl Into<Point>) -> Self {
        Self::new(time, RawInput::PointerUp(at.into()))
    }

    /// Pointer leaving the surface.
    pub fn pointer_leave(time: u64) -> Self {
        Self::new(time, RawInput::PointerLeave)
    }

    /// A single contact starting.
    pub fn touch_start(time: u64, id: u64, at: impl Into<Point>) -> Self {
        Self::new(time, RawInput::TouchStart(single(id, at)))
    }

    /// A single contact moving.
    pub fn touch_move(time: u64, id: u64, at: impl Into<Point>) -> Self {
        Self::new(time, RawInput::TouchMove(single(id, at)))
    }

    /// A single contact ending.
    pub fn touch_end(time: u64, id: u64, at: impl Into<Point>) -> Self {
        Self::new(time, RawInput::TouchEnd(single(id, at)))
    }
}

fn single(id: u64, at: impl Into<Point>) -> Contacts {
    let mut contacts = Contacts::new();
    contacts.push(TouchPoint::new(id, at));
    contacts
}

/// What a raw event means once reduced to its channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Action {
    Press(Point),
    Move(Point),
    Release(Point),
    Leave,
}

/// Picks the primary contact out of touch events.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct PrimaryContact {
    id: Option<u64>,
}

impl PrimaryContact {
    /// Reduce a raw input to at most one channel action.
    pub(crate) fn resolve(&mut self, input: &RawInput) -> Option<(Channel, Action)> {
        let action = match input {
            RawInput::PointerDown(p) => return Some((Channel::Pointer, Action::Press(*p))),
            RawInput::PointerMove(p) => return Some((Channel::Pointer, Action::Move(*p))),
            RawInput::PointerUp(p) => return Some((Channel::Pointer, Action::Release(*p))),
            RawInput::PointerLeave => return Some((Channel::Pointer, Action::Leave)),
            RawInput::TouchStart(contacts) => {
                if self.id.is_some() {
                    return None;
                }
                let first = contacts.first()?;
                self.id = Some(first.id);
                Action::Press(first.position)
            }
            RawInput::TouchMove(contacts) => Action::Move(self.find(contacts)?),
            RawInput::TouchEnd(contacts) => {
                let at = self.find(contacts)?;
                self.id = None;
                Action::Release(at)
            }
            RawInput::TouchCancel => {
                self.id = None;
                Action::Leave
            }
        };
        Some((Channel::Touch, action))
    }

    pub(crate) fn current(&self) -> Option<u64> {
        self.id
    }

    fn find(&self, contacts: &[TouchPoint]) -> Option<Point> {
        let id = self.id?;
        contacts.iter().find(|c| c.id == id).map(|c| c.position)
    }
}

/// Per-channel interaction record.
#[derive(Clone, Debug)]
pub struct ChannelState<K> {
    pub(crate) pressed: bool,
    pub(crate) released: bool,
    pub(crate) moved: bool,
    pub(crate) position: Option<Point>,
    pub(crate) armed: Option<K>,
}

impl<K> Default for ChannelState<K> {
    fn default() -> Self {
        Self {
            pressed: false,
            released: false,
            moved: false,
            position: None,
            armed: None,
        }
    }
}

impl<K: Copy> ChannelState<K> {
    /// Last known position, or `None` when undefined (never set, or the pointer left).
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Node on which the last press armed a click or tap.
    pub fn armed(&self) -> Option<K> {
        self.armed
    }

    pub(crate) fn clear_flags(&mut self) {
        self.pressed = false;
        self.released = false;
        self.moved = false;
    }
}
