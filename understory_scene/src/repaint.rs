// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint requests accumulated between frames.

use alloc::vec::Vec;

use crate::NodeId;

/// Layers that asked to be redrawn since the last [`crate::Scene::take_repaint`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Repaint {
    /// Layers to redraw, in request order, without duplicates.
    pub layers: Vec<NodeId>,
    /// Every layer must be redrawn.
    pub all: bool,
}

impl Repaint {
    /// Returns `true` when nothing needs to be redrawn.
    pub fn is_empty(&self) -> bool {
        !self.all && self.layers.is_empty()
    }

    /// Returns `true` if `layer` must be redrawn.
    pub fn includes(&self, layer: NodeId) -> bool {
        self.all || self.layers.contains(&layer)
    }

    pub(crate) fn push(&mut self, layer: NodeId) {
        if !self.layers.contains(&layer) {
            self.layers.push(layer);
        }
    }
}
