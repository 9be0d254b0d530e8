// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed set of hit geometries a scene node can report.

use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect, Shape, Vec2};

use crate::stroke::StrokedLine;
use crate::{HitParams, HitScore, PreciseHitTest};

/// Geometry of a node as seen by hit testing.
///
/// This is deliberately a closed enum rather than a trait object: a stage
/// resolves it once per probe and both the analytic path
/// ([`PreciseHitTest`]) and the raster path ([`crate::HitCanvas::fill`])
/// match on it directly.
#[derive(Clone, Debug, PartialEq)]
pub enum HitGeometry {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Rectangle with rounded corners.
    RoundedRect(RoundedRect),
    /// Filled disk.
    Circle(Circle),
    /// Arbitrary filled path (non-zero fill rule).
    Path(BezPath),
    /// Stroked straight segment.
    Line(StrokedLine),
}

impl HitGeometry {
    /// Axis-aligned bounds of the geometry.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Rect(r) => r.abs(),
            Self::RoundedRect(rr) => rr.bounding_box(),
            Self::Circle(c) => c.bounding_box(),
            Self::Path(p) => p.bounding_box(),
            Self::Line(l) => l.bounding_box(),
        }
    }

    /// Returns `true` when the geometry covers no area and can never be hit.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Circle(c) => c.radius <= 0.0,
            Self::Line(l) => l.is_degenerate(),
            _ => self.bounding_box().area() <= 0.0,
        }
    }

    /// The same geometry moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            Self::Rect(r) => Self::Rect(*r + offset),
            Self::RoundedRect(rr) => Self::RoundedRect(*rr + offset),
            Self::Circle(c) => Self::Circle(*c + offset),
            Self::Path(p) => {
                let mut moved = p.clone();
                moved.apply_affine(Affine::translate(offset));
                Self::Path(moved)
            }
            Self::Line(l) => Self::Line(l.translated(offset)),
        }
    }

    /// Sample coverage at a single point, with no tolerance.
    ///
    /// This is the predicate the raster path evaluates at pixel centers, so it
    /// matches the fill rule of the analytic path exactly.
    pub fn covers(&self, pt: Point) -> bool {
        self.hit_test_local(pt, &HitParams::default()).is_some()
    }
}

impl PreciseHitTest for HitGeometry {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        if self.is_degenerate() || !pt.is_finite() {
            return None;
        }
        match self {
            Self::Rect(r) => r.hit_test_local(pt, params),
            Self::RoundedRect(rr) => rr.hit_test_local(pt, params),
            Self::Circle(c) => c.hit_test_local(pt, params),
            Self::Path(p) => p.hit_test_local(pt, params),
            Self::Line(l) => l.hit_test_local(pt, params),
        }
    }
}

impl From<Rect> for HitGeometry {
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<Circle> for HitGeometry {
    fn from(value: Circle) -> Self {
        Self::Circle(value)
    }
}

impl From<RoundedRect> for HitGeometry {
    fn from(value: RoundedRect) -> Self {
        Self::RoundedRect(value)
    }
}

impl From<BezPath> for HitGeometry {
    fn from(value: BezPath) -> Self {
        Self::Path(value)
    }
}

impl From<StrokedLine> for HitGeometry {
    fn from(value: StrokedLine) -> Self {
        Self::Line(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Line;

    fn triangle() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((20.0, 0.0));
        path.line_to((0.0, 20.0));
        path.close_path();
        path
    }

    #[test]
    fn translated_geometry_moves_the_hit_region() {
        let params = HitParams::default();
        let offset = Vec2::new(100.0, 50.0);
        let shapes: [HitGeometry; 4] = [
            Rect::new(0.0, 0.0, 10.0, 10.0).into(),
            Circle::new((5.0, 5.0), 5.0).into(),
            RoundedRect::new(0.0, 0.0, 10.0, 10.0, 2.0).into(),
            triangle().into(),
        ];
        for shape in shapes {
            let moved = shape.translated(offset);
            assert!(shape.hits(Point::new(4.0, 4.0), &params), "{shape:?}");
            assert!(!moved.hits(Point::new(4.0, 4.0), &params), "{moved:?}");
            assert!(moved.hits(Point::new(104.0, 54.0), &params), "{moved:?}");
        }
    }

    #[test]
    fn degenerate_geometry_reports_no_hit() {
        let params = HitParams::uniform(10.0);
        let zero: [HitGeometry; 3] = [
            Rect::new(5.0, 5.0, 5.0, 5.0).into(),
            Circle::new((5.0, 5.0), 0.0).into(),
            StrokedLine::new(Line::new((0.0, 0.0), (10.0, 0.0)), 0.0).into(),
        ];
        for shape in zero {
            assert!(shape.is_degenerate());
            assert!(!shape.hits(Point::new(5.0, 5.0), &params), "{shape:?}");
        }
    }

    #[test]
    fn non_finite_points_never_hit() {
        let rect = HitGeometry::from(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!rect.covers(Point::new(f64::NAN, 5.0)));
        assert!(!rect.covers(Point::new(5.0, f64::INFINITY)));
    }

    #[test]
    fn triangle_respects_the_diagonal() {
        let tri = HitGeometry::from(triangle());
        assert!(tri.covers(Point::new(2.0, 2.0)));
        assert!(!tri.covers(Point::new(15.0, 15.0)));
        assert_eq!(tri.bounding_box(), Rect::new(0.0, 0.0, 20.0, 20.0));
    }
}
