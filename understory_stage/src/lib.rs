// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_stage --heading-base-level=0

//! Understory Stage: input routing for retained 2D scenes.
//!
//! ## Overview
//!
//! A [`Stage`] sits between a windowing layer and a scene graph. It receives
//! raw pointer and touch signals ([`RawEvent`]) for one drawing surface and
//! produces semantic events ([`StageEvent`]) targeted at scene nodes:
//! press/release, click and double click (tap and double tap on touch),
//! enter/exit, move, and drag start/move/end.
//!
//! The scene is reached only through the [`SceneAccess`] trait, so any scene
//! graph can be routed into. An implementation for `understory_scene` ships
//! in [`adapters`].
//!
//! ## Hit testing
//!
//! Shapes are tested one at a time by a [`HitTester`], front to back:
//!
//! - analytically, against the shape's [`HitGeometry`](understory_precise_hit::HitGeometry);
//! - or, for shapes flagged `pixel_exact`, by painting the shape alone in a
//!   unique color into a scratch canvas that is never displayed, and reading
//!   back the pixel under the point.
//!
//! ## Walk order
//!
//! See [`traverse`]: topmost layer first, last child first, and the first
//! shape that claims the event stops the walk for the whole stage.
//!
//! ## State
//!
//! One stage owns, for its surface:
//!
//! - a record per [`Channel`] (pointer, touch) with press/release/move flags,
//!   the last position and the node a click was armed on;
//! - one hover target, shared by both channels;
//! - double-click windows per channel and node;
//! - at most one drag session;
//! - a move-rate throttle.
//!
//! The building blocks live in `understory_event_state`; this crate wires
//! them to a scene.
//!
//! ## Delivering events
//!
//! [`Stage::handle`] returns the events of one raw input, in order, after all
//! stage state is updated. Run application code afterwards with
//! [`dispatcher::deliver`] or a [`dispatcher::Listeners`] registry.
//!
//! ```
//! # #[cfg(feature = "scene_adapter")]
//! # {
//! use kurbo::{Circle, Size};
//! use understory_scene::{LocalNode, Scene, ShapeContent};
//! use understory_stage::dispatcher::{Listeners, Outcome};
//! use understory_stage::{EventKind, RawEvent, Stage};
//!
//! let mut scene = Scene::new(Size::new(100.0, 100.0));
//! let layer = scene.add_layer(LocalNode::default()).unwrap();
//! let dot = scene
//!     .add_shape(layer, LocalNode::default(), ShapeContent::new(Circle::new((50.0, 50.0), 10.0)))
//!     .unwrap();
//!
//! let mut listeners: Listeners<_, u32> = Listeners::new();
//! listeners.on(dot, EventKind::Enter, |_, hovered| {
//!     *hovered += 1;
//!     Outcome::Continue
//! });
//!
//! let mut stage = Stage::default();
//! let mut hovered = 0;
//! let events = stage.handle(&mut scene, &RawEvent::pointer_move(0, (52.0, 50.0)));
//! listeners.emit(&events, &mut hovered);
//! assert_eq!(hovered, 1);
//! assert_eq!(stage.target(), Some(dot));
//! # }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod config;
pub mod dispatcher;
mod error;
mod event;
mod hit;
mod input;
mod scene;
mod stage;
pub mod traverse;

pub use config::{DEFAULT_MOVE_RATE_HZ, StageConfig};
pub use error::StageError;
pub use event::{EventKind, StageEvent};
pub use hit::HitTester;
pub use input::{Channel, ChannelState, Contacts, RawEvent, RawInput, TouchPoint};
pub use scene::{NodeKind, SceneAccess};
pub use stage::{Stage, StageEvents};
