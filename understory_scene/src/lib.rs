// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scene --heading-base-level=0

//! Understory Scene: a small retained 2D scene graph for interactive canvases.
//!
//! The scene is a strict hierarchy:
//!
//! - one **stage**, created with the scene, sized to the drawing surface;
//! - **layers**, the direct children of the stage, each an independent repaint unit;
//! - **groups**, containers nested anywhere below a layer;
//! - **shapes**, leaves carrying hit-testable [`ShapeContent`].
//!
//! Nodes are addressed by generational [`NodeId`]s: once a node is removed,
//! its identifier is stale forever, even if the slot is reused.
//!
//! Each node has an offset from its parent, [`NodeFlags`] for visibility and
//! input participation, and optional drag constraints
//! ([`understory_event_state::drag::DragOptions`]). Shapes describe their
//! silhouette with an [`understory_precise_hit::HitGeometry`], optionally
//! refined by an [`AlphaMask`] for pixel-exact hit testing.
//!
//! ## Not a renderer
//!
//! The scene does not draw. Edits record which layers need redrawing in a
//! [`Repaint`] summary that a renderer collects with [`Scene::take_repaint`].
//! The only painting it does is into a hit canvas, via
//! [`Scene::paint_hit_region`].
//!
//! ## API overview
//!
//! - [`Scene::add_layer`], [`Scene::add_group`], [`Scene::add_shape`] → [`NodeId`]
//! - [`Scene::remove`] → removed subtree; [`Scene::reparent`]; [`Scene::move_to_top`]
//! - [`Scene::set_visible`] / [`Scene::set_listening`] / [`Scene::set_draggable`] /
//!   [`Scene::set_local_position`] / [`Scene::set_absolute_position`]
//! - [`Scene::children_of`], [`Scene::parent_of`], [`Scene::layer_of`]
//! - [`Scene::world_geometry`] and [`Scene::paint_hit_region`] for hit testing
//!
//! Structural edits that would break the hierarchy return a [`SceneError`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod mask;
mod repaint;
mod scene;
mod types;

pub use error::SceneError;
pub use mask::AlphaMask;
pub use repaint::Repaint;
pub use scene::Scene;
pub use types::{LocalNode, NodeFlags, NodeId, NodeRole, ShapeContent};
