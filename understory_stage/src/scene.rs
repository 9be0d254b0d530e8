// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract a scene graph fulfils so a [`Stage`](crate::Stage) can route input into it.
//!
//! The stage never owns nodes. It reads structure, flags and geometry through
//! [`SceneAccess`], and writes back only two things: new positions for dragged
//! nodes and repaint requests.
//!
//! ## Roles
//!
//! Every live node resolves to a [`NodeKind`]. Containers (the stage, layers,
//! groups) are walked but never hit-tested. Shapes are hit-tested, either
//! analytically from [`SceneAccess::hit_geometry`] or, when
//! `pixel_exact` is set, by painting [`SceneAccess::paint_hit_region`] into a
//! scratch canvas and reading back one pixel.
//!
//! ## Coordinates
//!
//! Everything is in surface (stage) coordinates: hit geometry, positions and
//! the points carried by raw events.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Size};
use peniko::Color;
use understory_event_state::drag::DragOptions;
use understory_precise_hit::{HitCanvas, HitGeometry};

/// How the dispatcher treats a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Walked into, never hit.
    Container,
    /// A hit-test target.
    Shape {
        /// Resolve hits through the scratch canvas instead of analytically.
        pixel_exact: bool,
    },
}

/// Read access to a scene graph plus the few writes input routing needs.
///
/// Methods taking a stale key return the "empty" answer (`false`, `None`,
/// an empty slice) rather than panicking.
pub trait SceneAccess {
    /// Node identifier.
    type Key: Copy + Eq + Hash + Debug;

    /// The root node. Its children are the layers.
    fn stage(&self) -> Self::Key;

    /// Returns `true` if `node` is still part of the scene.
    fn is_alive(&self, node: Self::Key) -> bool;

    /// Dispatch role of a live node.
    fn kind(&self, node: Self::Key) -> Option<NodeKind>;

    /// Returns `true` if the node is drawn.
    fn is_visible(&self, node: Self::Key) -> bool;

    /// Returns `true` if the node (and so its subtree) takes part in input.
    fn is_listening(&self, node: Self::Key) -> bool;

    /// Children in insertion order; the last one is on top.
    fn children_of(&self, node: Self::Key) -> &[Self::Key];

    /// Parent of a node, `None` for the stage.
    fn parent_of(&self, node: Self::Key) -> Option<Self::Key>;

    /// Layer containing a node, `None` for the stage.
    fn layer_of(&self, node: Self::Key) -> Option<Self::Key>;

    /// Outline of a shape in surface coordinates.
    fn hit_geometry(&self, node: Self::Key) -> Option<HitGeometry>;

    /// Paint the hit region of `node` alone, in the flat `color`.
    ///
    /// Returns `true` if anything was painted. The default fills
    /// [`SceneAccess::hit_geometry`].
    fn paint_hit_region(&self, node: Self::Key, canvas: &mut HitCanvas, color: Color) -> bool {
        self.hit_geometry(node)
            .is_some_and(|g| canvas.fill(&g, color) > 0)
    }

    /// Absolute position of a node.
    fn position_of(&self, node: Self::Key) -> Option<Point>;

    /// Move a node to an absolute position.
    fn set_position(&mut self, node: Self::Key, position: Point);

    /// Drag constraints, or `None` if the node is not draggable.
    fn drag_options(&self, node: Self::Key) -> Option<DragOptions>;

    /// Request a redraw of one layer.
    fn repaint(&mut self, layer: Self::Key);

    /// Request a redraw of every layer.
    fn repaint_all(&mut self);

    /// Size of the drawing surface.
    fn surface_size(&self) -> Size;
}
