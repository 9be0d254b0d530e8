// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the core stays free of any
//! particular scene graph.
//!
//! ## Available Adapters
//!
//! - [`scene`] (`scene_adapter` feature): implements [`SceneAccess`](crate::SceneAccess)
//!   for [`understory_scene::Scene`].

#[cfg(feature = "scene_adapter")]
pub mod scene;
