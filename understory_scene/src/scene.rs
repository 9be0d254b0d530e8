// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, attribute updates, queries.

use alloc::{vec, vec::Vec};

use kurbo::{Point, Size};
use peniko::Color;
use understory_event_state::drag::DragOptions;
use understory_precise_hit::{HitCanvas, HitGeometry};

use crate::error::SceneError;
use crate::repaint::Repaint;
use crate::types::{LocalNode, NodeFlags, NodeId, NodeRole, ShapeContent};

/// A retained 2D scene: one stage, its layers, and groups and shapes below them.
///
/// Every scene is created with its stage. Layers are direct children of the
/// stage; groups and shapes live inside layers (or inside groups).
/// Children keep insertion order, which is also paint order: the last child
/// is drawn on top.
///
/// Positions are offsets from the parent. [`Scene::absolute_position`] and
/// [`Scene::set_absolute_position`] work in stage coordinates.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect, Size};
/// use understory_scene::{LocalNode, Scene, ShapeContent};
///
/// let mut scene = Scene::new(Size::new(200.0, 100.0));
/// let layer = scene.add_layer(LocalNode::default()).unwrap();
/// let group = scene.add_group(layer, LocalNode::at((50.0, 10.0))).unwrap();
/// let rect = scene
///     .add_shape(
///         group,
///         LocalNode::at((5.0, 5.0)),
///         ShapeContent::new(Rect::new(0.0, 0.0, 20.0, 20.0)),
///     )
///     .unwrap();
///
/// assert_eq!(scene.absolute_position(rect), Some(Point::new(55.0, 15.0)));
/// assert_eq!(scene.layer_of(rect), Some(layer));
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    stage: NodeId,
    size: Size,
    repaint: Repaint,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("stage", &self.stage)
            .field("size", &self.size)
            .field("repaint", &self.repaint)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    role: NodeRole,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
    content: Option<ShapeContent>,
}

impl Node {
    fn new(generation: u32, role: NodeRole, local: LocalNode) -> Self {
        Self {
            generation,
            role,
            parent: None,
            children: Vec::new(),
            local,
            content: None,
        }
    }
}

impl Scene {
    /// Create a scene whose stage covers `size` and uses default flags.
    pub fn new(size: Size) -> Self {
        Self::with_stage(size, LocalNode::default())
    }

    /// Create a scene whose stage uses `stage` for its position, flags and drag options.
    pub fn with_stage(size: Size, stage: LocalNode) -> Self {
        let mut scene = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            stage: NodeId::new(0, 1),
            size,
            repaint: Repaint::default(),
        };
        scene.stage = scene.alloc(Node::new(0, NodeRole::Stage, stage));
        scene
    }

    /// The root node.
    pub fn stage(&self) -> NodeId {
        self.stage
    }

    /// Size of the drawing surface.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the drawing surface. Every layer is repainted.
    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.repaint.all = true;
        }
    }

    /// Append a layer on top of the existing ones.
    pub fn add_layer(&mut self, local: LocalNode) -> Result<NodeId, SceneError> {
        Self::check_drag(&local)?;
        let id = self.alloc(Node::new(0, NodeRole::Layer, local));
        self.link_parent(id, self.stage);
        self.repaint.push(id);
        Ok(id)
    }

    /// Append a group to `parent`, which must be a layer or a group.
    pub fn add_group(&mut self, parent: NodeId, local: LocalNode) -> Result<NodeId, SceneError> {
        self.check_child_parent(NodeRole::Group, parent)?;
        Self::check_drag(&local)?;
        let id = self.alloc(Node::new(0, NodeRole::Group, local));
        self.link_parent(id, parent);
        Ok(id)
    }

    /// Append a shape to `parent`, which must be a layer or a group.
    pub fn add_shape(
        &mut self,
        parent: NodeId,
        local: LocalNode,
        content: ShapeContent,
    ) -> Result<NodeId, SceneError> {
        self.check_child_parent(NodeRole::Shape, parent)?;
        Self::check_drag(&local)?;
        let mut node = Node::new(0, NodeRole::Shape, local);
        node.content = Some(content);
        let id = self.alloc(node);
        self.link_parent(id, parent);
        self.request_repaint_of(id);
        Ok(id)
    }

    /// Remove a node and its subtree.
    ///
    /// Returns every removed identifier, parents before children, so callers
    /// can purge per-node state held elsewhere.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        if id == self.stage {
            return Err(SceneError::StageHasNoParent);
        }
        let (role, parent) = self
            .node(id)
            .map(|n| (n.role, n.parent))
            .ok_or(SceneError::StaleNode(id))?;
        if role == NodeRole::Layer {
            self.repaint.all = true;
        } else {
            self.request_repaint_of(id);
        }
        if let Some(parent) = parent {
            self.unlink_parent(id, parent);
        }
        let removed = self.subtree(id);
        for &gone in &removed {
            self.nodes[gone.idx()] = None;
            self.free_list.push(gone.idx());
        }
        tracing::debug!(?id, count = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Move `id` to the end of `new_parent`'s children.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        if id == self.stage {
            return Err(SceneError::StageHasNoParent);
        }
        let role = self.role(id).ok_or(SceneError::StaleNode(id))?;
        self.check_child_parent(role, new_parent)?;
        if self.is_ancestor_or_self(id, new_parent) {
            return Err(SceneError::Cycle(id));
        }
        self.request_repaint_of(id);
        if let Some(old) = self.parent_of(id) {
            self.unlink_parent(id, old);
        }
        self.link_parent(id, new_parent);
        self.request_repaint_of(id);
        tracing::debug!(?id, ?new_parent, "reparented");
        Ok(())
    }

    /// Move `id` last among its siblings, so it is drawn and hit-tested first.
    pub fn move_to_top(&mut self, id: NodeId) -> Result<(), SceneError> {
        if id == self.stage {
            return Err(SceneError::StageHasNoParent);
        }
        let parent = self
            .node(id)
            .ok_or(SceneError::StaleNode(id))?
            .parent
            .ok_or(SceneError::StaleNode(id))?;
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
            p.children.push(id);
        }
        self.request_repaint_of(id);
        Ok(())
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Role of a live node.
    pub fn role(&self, id: NodeId) -> Option<NodeRole> {
        self.node(id).map(|n| n.role)
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node(id).map(|n| n.local.flags)
    }

    /// Replace the flags of a live node.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.flags != flags
        {
            n.local.flags = flags;
            self.request_repaint_of(id);
        }
    }

    /// Show or hide a node.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(mut flags) = self.flags(id) {
            flags.set(NodeFlags::VISIBLE, visible);
            self.set_flags(id, flags);
        }
    }

    /// Enable or disable input for a node and its subtree.
    pub fn set_listening(&mut self, id: NodeId, listening: bool) {
        if let Some(mut flags) = self.flags(id) {
            flags.set(NodeFlags::LISTENING, listening);
            self.set_flags(id, flags);
        }
    }

    /// Returns `true` if the node and all its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            let Some(n) = self.node(c) else {
                return false;
            };
            if !n.local.flags.contains(NodeFlags::VISIBLE) {
                return false;
            }
            cursor = n.parent;
        }
        true
    }

    /// Returns `true` if the node's own listening flag is set.
    pub fn is_listening(&self, id: NodeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(NodeFlags::LISTENING))
    }

    /// Returns the parent of a node if live, or `None` for the stage or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Get the children of a node in insertion order, or an empty slice if the node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// The layer containing `id` (or `id` itself if it is a layer).
    ///
    /// Returns `None` for the stage and for stale ids.
    pub fn layer_of(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = id;
        loop {
            let n = self.node(cursor)?;
            match n.role {
                NodeRole::Layer => return Some(cursor),
                NodeRole::Stage => return None,
                _ => cursor = n.parent?,
            }
        }
    }

    /// Offset of a node from its parent.
    pub fn local_position(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.local.position)
    }

    /// Set the offset of a node from its parent.
    pub fn set_local_position(&mut self, id: NodeId, position: Point) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.position != position
        {
            n.local.position = position;
            self.request_repaint_of(id);
        }
    }

    /// Position of a node in stage coordinates.
    pub fn absolute_position(&self, id: NodeId) -> Option<Point> {
        let n = self.node(id)?;
        let mut acc = n.local.position.to_vec2();
        let mut cursor = n.parent;
        while let Some(c) = cursor {
            let p = self.node(c)?;
            acc += p.local.position.to_vec2();
            cursor = p.parent;
        }
        Some(acc.to_point())
    }

    /// Place a node at `position` in stage coordinates.
    ///
    /// Returns `false` for stale ids.
    pub fn set_absolute_position(&mut self, id: NodeId, position: Point) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let parent_origin = self
            .parent_of(id)
            .and_then(|p| self.absolute_position(p))
            .unwrap_or(Point::ZERO);
        self.set_local_position(id, position - parent_origin.to_vec2());
        true
    }

    /// Drag options of a node, or `None` if it is not draggable.
    pub fn drag_options(&self, id: NodeId) -> Option<DragOptions> {
        self.node(id).and_then(|n| n.local.drag)
    }

    /// Make a node draggable (`Some`) or not (`None`).
    pub fn set_draggable(
        &mut self,
        id: NodeId,
        options: Option<DragOptions>,
    ) -> Result<(), SceneError> {
        if let Some(o) = &options {
            o.validate()?;
        }
        let n = self.node_opt_mut(id).ok_or(SceneError::StaleNode(id))?;
        n.local.drag = options;
        Ok(())
    }

    /// Hit content of a shape.
    pub fn shape(&self, id: NodeId) -> Option<&ShapeContent> {
        self.node(id).and_then(|n| n.content.as_ref())
    }

    /// Replace the hit content of a shape.
    pub fn set_shape(&mut self, id: NodeId, content: ShapeContent) -> Result<(), SceneError> {
        let n = self.node_opt_mut(id).ok_or(SceneError::StaleNode(id))?;
        if n.role != NodeRole::Shape {
            return Err(SceneError::NotAShape(id));
        }
        n.content = Some(content);
        self.request_repaint_of(id);
        Ok(())
    }

    /// Shape outline moved to stage coordinates.
    pub fn world_geometry(&self, id: NodeId) -> Option<HitGeometry> {
        let content = self.shape(id)?;
        let offset = self.absolute_position(id)?.to_vec2();
        Some(content.geometry.translated(offset))
    }

    /// Paint the hit region of a shape in a flat `color`.
    ///
    /// Uses the shape's mask when it has one and its outline otherwise.
    /// Returns `true` if at least one pixel was painted.
    pub fn paint_hit_region(&self, id: NodeId, canvas: &mut HitCanvas, color: Color) -> bool {
        let Some(content) = self.shape(id) else {
            return false;
        };
        let Some(origin) = self.absolute_position(id) else {
            return false;
        };
        let offset = origin.to_vec2();
        let painted = match &content.mask {
            Some(mask) => {
                let mask = mask.translated(offset);
                canvas.fill_where(mask.bounds(), color, |pt| mask.covers(pt))
            }
            None => canvas.fill(&content.geometry.translated(offset), color),
        };
        painted > 0
    }

    /// Ask for `layer` to be redrawn. Ignored for nodes that are not layers.
    pub fn request_repaint(&mut self, layer: NodeId) {
        if self.role(layer) == Some(NodeRole::Layer) {
            self.repaint.push(layer);
        }
    }

    /// Ask for every layer to be redrawn.
    pub fn request_repaint_all(&mut self) {
        self.repaint.all = true;
    }

    /// Repaint requests accumulated so far.
    pub fn pending_repaint(&self) -> &Repaint {
        &self.repaint
    }

    /// Take and reset the accumulated repaint requests.
    pub fn take_repaint(&mut self) -> Repaint {
        core::mem::take(&mut self.repaint)
    }

    /// `id` and all its live descendants, parents before children.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(n) = self.node(current) else {
                continue;
            };
            out.push(current);
            // Reverse so children come out in insertion order.
            stack.extend(n.children.iter().rev().copied());
        }
        out
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn alloc(&mut self, mut node: Node) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            (idx, generation)
        } else {
            let generation = 1_u32;
            node.generation = generation;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId stores 32-bit slot indices."
        )]
        NodeId::new(idx as u32, generation)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }

    fn check_child_parent(&self, role: NodeRole, parent: NodeId) -> Result<(), SceneError> {
        let parent_role = self.role(parent).ok_or(SceneError::StaleNode(parent))?;
        match (role, parent_role) {
            (NodeRole::Stage, _) => Err(SceneError::StageHasNoParent),
            (NodeRole::Layer, NodeRole::Stage) => Ok(()),
            (NodeRole::Layer, _) => Err(SceneError::LayerParentMustBeStage),
            (_, NodeRole::Stage) => Err(SceneError::StageChildMustBeLayer),
            (_, NodeRole::Shape) => Err(SceneError::NotAContainer(parent)),
            _ => Ok(()),
        }
    }

    fn check_drag(local: &LocalNode) -> Result<(), SceneError> {
        if let Some(o) = &local.drag {
            o.validate()?;
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent_of(node) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    fn request_repaint_of(&mut self, id: NodeId) {
        if id == self.stage {
            self.repaint.all = true;
        } else if let Some(layer) = self.layer_of(id) {
            self.repaint.push(layer);
        }
    }
}
