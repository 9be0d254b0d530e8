// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pixel coverage for shapes whose silhouette is not a simple outline.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

/// An 8-bit alpha grid, one cell per unit, placed at `origin` in shape coordinates.
///
/// A cell counts as covered when its alpha is at least `threshold`. Images
/// with transparent regions are the usual source.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMask {
    origin: Point,
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    threshold: u8,
}

impl AlphaMask {
    /// Build a mask from row-major alpha values.
    ///
    /// Returns `None` if `alpha.len()` does not equal `width * height`.
    pub fn new(origin: Point, width: u32, height: u32, alpha: Vec<u8>) -> Option<Self> {
        if alpha.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            origin,
            width,
            height,
            alpha,
            threshold: 1,
        })
    }

    /// Minimum alpha that counts as covered. Defaults to 1.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Area covered by the grid, in shape coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(
            self.origin,
            (f64::from(self.width), f64::from(self.height)),
        )
    }

    /// Returns `true` when the cell containing `pt` (shape coordinates) is covered.
    pub fn covers(&self, pt: Point) -> bool {
        let local = pt - self.origin.to_vec2();
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return false;
        }
        let (x, y) = (local.x.floor(), local.y.floor());
        if x >= f64::from(self.width) || y >= f64::from(self.height) {
            return false;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Both coordinates were checked against the grid size."
        )]
        let at = y as usize * self.width as usize + x as usize;
        self.alpha.get(at).is_some_and(|a| *a >= self.threshold)
    }

    /// The same mask moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            origin: self.origin + offset,
            ..self.clone()
        }
    }
}
