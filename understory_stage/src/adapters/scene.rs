// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! - Stage, layers and groups map to [`NodeKind::Container`]; shapes map to
//!   [`NodeKind::Shape`] with their own `pixel_exact` flag.
//! - Visibility is the scene's effective visibility (a hidden group hides its
//!   shapes); listening is the node's own flag, since the traversal already
//!   skips the subtrees of non-listening containers.
//! - Positions are absolute, and shapes with an alpha mask paint the mask
//!   rather than their outline on the hit canvas.

use kurbo::{Point, Size};
use peniko::Color;
use understory_event_state::drag::DragOptions;
use understory_precise_hit::{HitCanvas, HitGeometry};
use understory_scene::{NodeId, NodeRole, Scene};

use crate::scene::{NodeKind, SceneAccess};

impl SceneAccess for Scene {
    type Key = NodeId;

    fn stage(&self) -> NodeId {
        Self::stage(self)
    }

    fn is_alive(&self, node: NodeId) -> bool {
        Self::is_alive(self, node)
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        match self.role(node)? {
            NodeRole::Shape => Some(NodeKind::Shape {
                pixel_exact: self.shape(node).is_some_and(|s| s.pixel_exact),
            }),
            NodeRole::Stage | NodeRole::Layer | NodeRole::Group => Some(NodeKind::Container),
        }
    }

    fn is_visible(&self, node: NodeId) -> bool {
        Self::is_visible(self, node)
    }

    fn is_listening(&self, node: NodeId) -> bool {
        Self::is_listening(self, node)
    }

    fn children_of(&self, node: NodeId) -> &[NodeId] {
        Self::children_of(self, node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        Self::parent_of(self, node)
    }

    fn layer_of(&self, node: NodeId) -> Option<NodeId> {
        Self::layer_of(self, node)
    }

    fn hit_geometry(&self, node: NodeId) -> Option<HitGeometry> {
        self.world_geometry(node)
    }

    fn paint_hit_region(&self, node: NodeId, canvas: &mut HitCanvas, color: Color) -> bool {
        Self::paint_hit_region(self, node, canvas, color)
    }

    fn position_of(&self, node: NodeId) -> Option<Point> {
        self.absolute_position(node)
    }

    fn set_position(&mut self, node: NodeId, position: Point) {
        self.set_absolute_position(node, position);
    }

    fn drag_options(&self, node: NodeId) -> Option<DragOptions> {
        Self::drag_options(self, node)
    }

    fn repaint(&mut self, layer: NodeId) {
        self.request_repaint(layer);
    }

    fn repaint_all(&mut self) {
        self.request_repaint_all();
    }

    fn surface_size(&self) -> Size {
        self.size()
    }
}
