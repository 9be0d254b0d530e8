// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-to-back scene walk with early termination.
//!
//! Layers are visited topmost first, and inside every container the last
//! child is visited first, so the walk meets shapes in reverse paint order.
//! A visitor returning `true` consumes the event: the walk stops at once and
//! every enclosing frame returns `true` as well, so no layer below is ever
//! visited.
//!
//! Subtrees rooted at a node that does not listen are skipped entirely.
//! Layers must also be visible to be entered.

use crate::scene::{NodeKind, SceneAccess};

/// Walk every listening, visible layer of the scene, topmost first.
///
/// Returns `true` if `visit` consumed the event on some shape.
pub fn walk_stage<S, F>(scene: &S, mut visit: F) -> bool
where
    S: SceneAccess,
    F: FnMut(S::Key) -> bool,
{
    let stage = scene.stage();
    if !scene.is_listening(stage) {
        return false;
    }
    for &layer in scene.children_of(stage).iter().rev() {
        if !scene.is_visible(layer) || !scene.is_listening(layer) {
            continue;
        }
        if walk(scene, layer, &mut visit) {
            return true;
        }
    }
    false
}

/// Walk the children of `container`, last child first.
///
/// Shapes are handed to `visit`; containers are descended into.
pub fn walk<S, F>(scene: &S, container: S::Key, visit: &mut F) -> bool
where
    S: SceneAccess,
    F: FnMut(S::Key) -> bool,
{
    for &child in scene.children_of(container).iter().rev() {
        if !scene.is_listening(child) {
            continue;
        }
        let consumed = match scene.kind(child) {
            Some(NodeKind::Shape { .. }) => visit(child),
            Some(NodeKind::Container) => walk(scene, child, visit),
            None => false,
        };
        if consumed {
            return true;
        }
    }
    false
}
