// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session: move one node with the pointer, under axis and bounds constraints.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --arm--> Armed --update--> Moving --update--> Moving
//!   ^             |                  |
//!   +----end------+-------end--------+
//! ```
//!
//! 1) On press over a draggable node, call [`DragSession::arm`] with the
//!    pointer position and the node's current position. The offset between
//!    them is kept for the whole session so the node does not jump.
//! 2) On each move, call [`DragSession::update`]. It returns the new node
//!    position, already clamped to [`DragBounds`] and locked to [`DragAxis`],
//!    and whether this update started the drag.
//! 3) On release or when the pointer leaves, call [`DragSession::end`]. It
//!    reports whether the node actually moved, which decides whether a
//!    drag-end notification is due.
//!
//! At most one node is dragged at a time; arming replaces any previous
//! session.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::drag::{DragAxis, DragBounds, DragOptions, DragSession};
//!
//! let mut drag = DragSession::new();
//! let options = DragOptions {
//!     axis: DragAxis::Horizontal,
//!     bounds: DragBounds::new().with_left(10.0).with_right(100.0),
//! };
//!
//! // Press at (25, 25) on a node positioned at (20, 20).
//! drag.arm(1_u32, Point::new(25.0, 25.0), Point::new(20.0, 20.0), options);
//!
//! let step = drag.update(Point::new(0.0, 90.0)).unwrap();
//! assert!(step.started);
//! assert_eq!(step.position, Point::new(10.0, 20.0)); // clamped left, y locked
//!
//! let end = drag.end().unwrap();
//! assert!(end.moved);
//! ```

use kurbo::{Point, Vec2};

/// Axis restriction applied while dragging.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DragAxis {
    /// Move freely.
    #[default]
    Free,
    /// Only x changes; y stays where it was.
    Horizontal,
    /// Only y changes; x stays where it was.
    Vertical,
}

/// Error returned when drag bounds cannot be satisfied.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum BoundsError {
    /// `left` is greater than `right`.
    #[error("drag bounds are inverted horizontally: left {left} > right {right}")]
    InvertedHorizontal {
        /// Configured left edge.
        left: f64,
        /// Configured right edge.
        right: f64,
    },
    /// `top` is greater than `bottom`.
    #[error("drag bounds are inverted vertically: top {top} > bottom {bottom}")]
    InvertedVertical {
        /// Configured top edge.
        top: f64,
        /// Configured bottom edge.
        bottom: f64,
    },
}

/// Optional clamps on the dragged node's position. Each edge applies only if set.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DragBounds {
    /// Minimum x.
    pub left: Option<f64>,
    /// Maximum x.
    pub right: Option<f64>,
    /// Minimum y.
    pub top: Option<f64>,
    /// Maximum y.
    pub bottom: Option<f64>,
}

impl DragBounds {
    /// No clamping on any edge.
    pub const fn new() -> Self {
        Self {
            left: None,
            right: None,
            top: None,
            bottom: None,
        }
    }

    /// Set the minimum x.
    pub const fn with_left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    /// Set the maximum x.
    pub const fn with_right(mut self, right: f64) -> Self {
        self.right = Some(right);
        self
    }

    /// Set the minimum y.
    pub const fn with_top(mut self, top: f64) -> Self {
        self.top = Some(top);
        self
    }

    /// Set the maximum y.
    pub const fn with_bottom(mut self, bottom: f64) -> Self {
        self.bottom = Some(bottom);
        self
    }

    /// Check that opposite edges are not inverted.
    pub fn validate(&self) -> Result<(), BoundsError> {
        if let (Some(left), Some(right)) = (self.left, self.right)
            && left > right
        {
            return Err(BoundsError::InvertedHorizontal { left, right });
        }
        if let (Some(top), Some(bottom)) = (self.top, self.bottom)
            && top > bottom
        {
            return Err(BoundsError::InvertedVertical { top, bottom });
        }
        Ok(())
    }

    /// Clamp `pos` to the configured edges.
    pub fn clamp(&self, mut pos: Point) -> Point {
        if let Some(left) = self.left {
            pos.x = pos.x.max(left);
        }
        if let Some(right) = self.right {
            pos.x = pos.x.min(right);
        }
        if let Some(top) = self.top {
            pos.y = pos.y.max(top);
        }
        if let Some(bottom) = self.bottom {
            pos.y = pos.y.min(bottom);
        }
        pos
    }
}

/// Constraints for one draggable node.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DragOptions {
    /// Axis lock.
    pub axis: DragAxis,
    /// Position clamps.
    pub bounds: DragBounds,
}

impl DragOptions {
    /// Check the options for contradictions.
    pub fn validate(&self) -> Result<(), BoundsError> {
        self.bounds.validate()
    }

    /// Apply bounds and then the axis lock relative to `previous`.
    pub fn constrain(&self, candidate: Point, previous: Point) -> Point {
        let mut pos = self.bounds.clamp(candidate);
        match self.axis {
            DragAxis::Free => {}
            DragAxis::Horizontal => pos.y = previous.y,
            DragAxis::Vertical => pos.x = previous.x,
        }
        pos
    }
}

/// Observable phase of a [`DragSession`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// No session.
    Idle,
    /// A node is grabbed but has not moved yet.
    Armed,
    /// The node has been displaced by at least one update.
    Moving,
}

/// Result of one [`DragSession::update`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragStep<K> {
    /// Dragged node.
    pub node: K,
    /// New node position after constraints.
    pub position: Point,
    /// Position before this update.
    pub previous: Point,
    /// `true` if this update moved the session from armed to moving.
    pub started: bool,
}

/// Result of [`DragSession::end`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DragEnd<K> {
    /// Node that was being dragged.
    pub node: K,
    /// `true` if at least one update happened.
    pub moved: bool,
}

#[derive(Copy, Clone, Debug)]
struct Active<K> {
    node: K,
    /// Pointer position minus node position at press.
    grab_offset: Vec2,
    pointer_start: Point,
    node_start: Point,
    node_position: Point,
    options: DragOptions,
    moving: bool,
}

/// Single-node drag state machine.
#[derive(Copy, Clone, Debug)]
pub struct DragSession<K> {
    active: Option<Active<K>>,
}

impl<K> Default for DragSession<K> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<K: Copy + PartialEq + core::fmt::Debug> DragSession<K> {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grab `node` at `pointer`; `node_position` is where the node is now.
    ///
    /// Any previous session is discarded without an end notification.
    pub fn arm(&mut self, node: K, pointer: Point, node_position: Point, options: DragOptions) {
        if let Some(stale) = self.active.take() {
            tracing::debug!(node = ?stale.node, "discarding stale drag session");
        }
        self.active = Some(Active {
            node,
            grab_offset: pointer - node_position,
            pointer_start: pointer,
            node_start: node_position,
            node_position,
            options,
            moving: false,
        });
        tracing::debug!(?node, "drag armed");
    }

    /// Follow the pointer to `pointer`. Returns `None` when idle.
    pub fn update(&mut self, pointer: Point) -> Option<DragStep<K>> {
        let active = self.active.as_mut()?;
        let previous = active.node_position;
        let candidate = pointer - active.grab_offset;
        let position = active.options.constrain(candidate, previous);
        let started = !active.moving;
        active.moving = true;
        active.node_position = position;
        if started {
            tracing::debug!(node = ?active.node, "drag started");
        }
        Some(DragStep {
            node: active.node,
            position,
            previous,
            started,
        })
    }

    /// Finish the session.
    pub fn end(&mut self) -> Option<DragEnd<K>> {
        let active = self.active.take()?;
        tracing::debug!(node = ?active.node, moved = active.moving, "drag ended");
        Some(DragEnd {
            node: active.node,
            moved: active.moving,
        })
    }

    /// Drop the session if it drags `node`, without reporting an end.
    ///
    /// Used when the node leaves the scene mid-drag.
    pub fn forget(&mut self, node: &K) -> bool {
        if self.active.as_ref().is_some_and(|a| a.node == *node) {
            self.active = None;
            return true;
        }
        false
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        match &self.active {
            None => DragPhase::Idle,
            Some(a) if a.moving => DragPhase::Moving,
            Some(_) => DragPhase::Armed,
        }
    }

    /// Returns `true` while the node is actually being displaced.
    pub fn is_moving(&self) -> bool {
        self.phase() == DragPhase::Moving
    }

    /// Returns `true` when armed or moving.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The dragged node, if any.
    pub fn node(&self) -> Option<K> {
        self.active.as_ref().map(|a| a.node)
    }

    /// Where the node was when the session was armed.
    pub fn start_position(&self) -> Option<Point> {
        self.active.as_ref().map(|a| a.node_start)
    }

    /// Pointer travel since the session was armed.
    pub fn total_offset(&self, pointer: Point) -> Option<Vec2> {
        self.active.as_ref().map(|a| pointer - a.pointer_start)
    }
}
