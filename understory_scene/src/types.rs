// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, roles and shape content.

use kurbo::Point;
use understory_event_state::drag::DragOptions;
use understory_precise_hit::HitGeometry;

use crate::mask::AlphaMask;

/// Identifier for a node in the scene (generational).
///
/// A removed node's slot may be reused, but with a higher generation, so an
/// old identifier never aliases a newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling rendering and input participation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is drawn. Hidden nodes are never hit.
        const VISIBLE   = 0b0000_0001;
        /// Node and its subtree take part in input dispatch.
        const LISTENING = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::LISTENING
    }
}

/// Structural role of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// The single root; its children are layers.
    Stage,
    /// Direct child of the stage with its own repaint unit.
    Layer,
    /// Container below a layer.
    Group,
    /// Leaf with hit-testable content.
    Shape,
}

impl NodeRole {
    /// Returns `true` for roles that hold children.
    pub const fn is_container(self) -> bool {
        !matches!(self, Self::Shape)
    }
}

/// Per-node data shared by every role.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNode {
    /// Offset relative to the parent's absolute position.
    pub position: Point,
    /// Visibility and listening flags.
    pub flags: NodeFlags,
    /// Drag constraints; `None` means the node is not draggable.
    pub drag: Option<DragOptions>,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            flags: NodeFlags::default(),
            drag: None,
        }
    }
}

impl LocalNode {
    /// A default node at `position`.
    pub fn at(position: impl Into<Point>) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    /// Make the node draggable with `options`.
    pub fn draggable(mut self, options: DragOptions) -> Self {
        self.drag = Some(options);
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// What a shape looks like to hit testing.
///
/// `geometry` is in the shape's own coordinates: it is moved by the node's
/// absolute position before any test.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeContent {
    /// Outline used by analytic tests and for painting the hit region.
    pub geometry: HitGeometry,
    /// Optional coverage mask, painted instead of `geometry` on the hit canvas.
    pub mask: Option<AlphaMask>,
    /// Resolve hits by reading back a painted hit region rather than analytically.
    pub pixel_exact: bool,
}

impl ShapeContent {
    /// Analytic shape with the given outline.
    pub fn new(geometry: impl Into<HitGeometry>) -> Self {
        Self {
            geometry: geometry.into(),
            mask: None,
            pixel_exact: false,
        }
    }

    /// Switch to pixel-exact hit testing.
    pub fn pixel_exact(mut self) -> Self {
        self.pixel_exact = true;
        self
    }

    /// Attach a coverage mask; implies pixel-exact hit testing.
    pub fn with_mask(mut self, mask: AlphaMask) -> Self {
        self.mask = Some(mask);
        self.pixel_exact = true;
        self
    }
}
