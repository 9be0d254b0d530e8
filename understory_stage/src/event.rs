// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic interaction events produced by a [`Stage`](crate::Stage).

use kurbo::Point;

use crate::input::Channel;

/// What happened to a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Button or contact went down on the node.
    Press,
    /// Button or contact went up on the node.
    Release,
    /// Press and release on the same node, without a drag in between.
    Click,
    /// Second click on the same node inside the double-click window.
    DoubleClick,
    /// The pointer entered the node.
    Enter,
    /// The pointer left the node.
    Exit,
    /// The pointer moved over the node.
    Move,
    /// The node started following the pointer.
    DragStart,
    /// The node moved with the pointer.
    DragMove,
    /// The node stopped following the pointer.
    DragEnd,
}

impl EventKind {
    /// Conventional DOM-style name of this kind on `channel`.
    ///
    /// ```
    /// use understory_stage::{Channel, EventKind};
    ///
    /// assert_eq!(EventKind::Click.name(Channel::Pointer), "click");
    /// assert_eq!(EventKind::Click.name(Channel::Touch), "tap");
    /// assert_eq!(EventKind::Press.name(Channel::Touch), "touchstart");
    /// ```
    pub const fn name(self, channel: Channel) -> &'static str {
        match (self, channel) {
            (Self::Press, Channel::Pointer) => "mousedown",
            (Self::Press, Channel::Touch) => "touchstart",
            (Self::Release, Channel::Pointer) => "mouseup",
            (Self::Release, Channel::Touch) => "touchend",
            (Self::Click, Channel::Pointer) => "click",
            (Self::Click, Channel::Touch) => "tap",
            (Self::DoubleClick, Channel::Pointer) => "dblclick",
            (Self::DoubleClick, Channel::Touch) => "dbltap",
            (Self::Enter, _) => "mouseover",
            (Self::Exit, _) => "mouseout",
            (Self::Move, Channel::Pointer) => "mousemove",
            (Self::Move, Channel::Touch) => "touchmove",
            (Self::DragStart, _) => "dragstart",
            (Self::DragMove, _) => "dragmove",
            (Self::DragEnd, _) => "dragend",
        }
    }
}

/// One synthetic event targeted at one node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StageEvent<K> {
    /// What happened.
    pub kind: EventKind,
    /// Target node.
    pub node: K,
    /// Channel of the raw event that caused it.
    pub channel: Channel,
    /// Channel position when it was produced; `None` once the pointer left.
    pub position: Option<Point>,
    /// Timestamp of the raw event that caused it.
    pub time: u64,
}

impl<K> StageEvent<K> {
    /// DOM-style name of this event.
    pub fn name(&self) -> &'static str {
        self.kind.name(self.channel)
    }
}
