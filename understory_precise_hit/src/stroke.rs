// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke-oriented helpers for precise hit testing.
//!
//! Only straight segments are modeled here. Joins, caps, dashes and variable
//! width belong to the renderer; when a node needs those to be exact, flag it
//! for the pixel-exact path instead.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, ParamCurveNearest, Point, Rect, Vec2};

use crate::{HitKind, HitParams, HitScore, PreciseHitTest};

/// A stroked line segment: centerline plus half of the stroke width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokedLine {
    /// The centerline segment in local coordinates.
    pub line: Line,
    /// Half of the stroke width in local units.
    pub half_width: f64,
}

impl StrokedLine {
    /// Create a stroked segment from a centerline and a full stroke width.
    pub fn new(line: Line, width: f64) -> Self {
        Self {
            line,
            half_width: width * 0.5,
        }
    }

    /// Distance from `pt` to the centerline.
    pub fn centerline_distance(&self, pt: Point) -> f64 {
        self.line.nearest(pt, 1e-9).distance_sq.sqrt()
    }

    /// Axis-aligned box covering the stroke (square caps).
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(self.line.p0, self.line.p1).inflate(self.half_width, self.half_width)
    }

    /// The same stroke moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            line: Line::new(self.line.p0 + offset, self.line.p1 + offset),
            half_width: self.half_width,
        }
    }

    /// A stroke with no width or no length covers nothing.
    pub fn is_degenerate(&self) -> bool {
        self.half_width <= 0.0 || self.line.p0 == self.line.p1
    }
}

impl PreciseHitTest for StrokedLine {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        if self.is_degenerate() {
            return None;
        }
        let distance = self.centerline_distance(pt);
        (distance <= self.half_width + params.stroke_tolerance).then_some(HitScore {
            distance,
            kind: HitKind::Stroke,
        })
    }
}
