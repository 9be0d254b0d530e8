// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_precise_hit --heading-base-level=0

//! Understory Precise Hit: narrow-phase hit testing for 2D scene nodes.
//!
//! This crate answers one question: "does this point land on this shape?"
//! It offers two strategies that a stage or scene graph can mix per node:
//!
//! - **Analytic** tests through the [`PreciseHitTest`] trait, implemented for
//!   the common [`kurbo`] primitives and for the closed [`HitGeometry`] enum.
//! - **Pixel-exact** tests through [`HitCanvas`], a scratch raster that is
//!   never displayed. A node is painted alone in a unique flat color key
//!   (see [`color_key`]) without anti-aliasing, and the pixel under the query
//!   point is read back. This is the fallback for silhouettes that are not
//!   cheap to describe analytically, such as glyph runs or images with alpha.
//!
//! Neither strategy knows anything about trees, layers, or event routing.
//!
//! ## Analytic example
//!
//! ```
//! use kurbo::{Circle, Point};
//! use understory_precise_hit::{HitGeometry, HitParams, PreciseHitTest};
//!
//! let disk = HitGeometry::Circle(Circle::new((50.0, 50.0), 10.0));
//! assert!(disk.hit_test_local(Point::new(55.0, 50.0), &HitParams::default()).is_some());
//! assert!(disk.hit_test_local(Point::new(65.0, 50.0), &HitParams::default()).is_none());
//! ```
//!
//! ## Pixel-exact example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_precise_hit::{HitCanvas, HitGeometry, color_key};
//!
//! let mut canvas = HitCanvas::new(64, 64).unwrap();
//! let key = color_key(7);
//! canvas.clear();
//! canvas.fill(&HitGeometry::Rect(Rect::new(8.0, 8.0, 24.0, 24.0)), key);
//! assert!(canvas.is_key_at(Point::new(10.0, 10.0), key));
//! assert!(!canvas.is_key_at(Point::new(30.0, 10.0), key));
//! ```
//!
//! ## Scores
//!
//! Analytic tests return a [`HitScore`]. Interior hits have distance `0`; hits
//! accepted only thanks to a tolerance in [`HitParams`] report how far outside
//! the geometry they were. Callers that only need a yes/no answer can ignore
//! the score.

#![no_std]

extern crate alloc;

use core::cmp::Ordering;

use kurbo::Point;

mod geometry;
mod pixel;
mod shapes;
/// Stroke-oriented helpers and primitives.
pub mod stroke;

pub use geometry::HitGeometry;
pub use pixel::{HitCanvas, MAX_CANVAS_PIXELS, color_key};
pub use shapes::hit_test_shape;

/// Kind of hit produced by a precise test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HitKind {
    /// Hit the interior/fill of a shape.
    Fill,
    /// Hit the stroked outline of a shape.
    Stroke,
    /// Hit, but kind is unspecified/other.
    Other,
}

/// Parameters controlling precise hit tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitParams {
    /// Extra radius, in local units, accepted around filled regions.
    ///
    /// Useful to make small targets easier to hit with a finger.
    pub fill_tolerance: f64,
    /// Extra radius, in local units, accepted around stroked outlines.
    pub stroke_tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            fill_tolerance: 0.0,
            stroke_tolerance: 0.0,
        }
    }
}

impl HitParams {
    /// Parameters with the same tolerance for fills and strokes.
    pub const fn uniform(tolerance: f64) -> Self {
        Self {
            fill_tolerance: tolerance,
            stroke_tolerance: tolerance,
        }
    }
}

/// Score returned from a precise hit.
///
/// Lower distance is a closer hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitScore {
    /// Distance from the geometry in local coordinate space; `0` inside.
    pub distance: f64,
    /// Classification of what was hit.
    pub kind: HitKind,
}

impl HitScore {
    /// A filled hit at distance 0.
    pub const fn filled() -> Self {
        Self {
            distance: 0.0,
            kind: HitKind::Fill,
        }
    }

    /// A fill hit accepted through tolerance, `distance` outside the shape.
    pub const fn near_fill(distance: f64) -> Self {
        Self {
            distance,
            kind: HitKind::Fill,
        }
    }

    /// Compare two scores by distance; incomparable values are equal.
    pub fn cmp_distance(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Trait for precise 2D hit testing in local coordinates.
///
/// Implementors should treat the tolerances in [`HitParams`] as inclusive
/// radii and must never report a hit for degenerate (zero-area) geometry.
pub trait PreciseHitTest {
    /// Test `pt`, expressed in the shape's own coordinate space.
    ///
    /// Returns `Some(HitScore)` when the point is considered a hit.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;

    /// Convenience wrapper returning only whether `pt` hits.
    fn hits(&self, pt: Point, params: &HitParams) -> bool {
        self.hit_test_local(pt, params).is_some()
    }
}
