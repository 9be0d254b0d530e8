// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`PreciseHitTest`] implementations for kurbo primitives.

use kurbo::{BezPath, Circle, Point, Rect, RoundedRect, Shape};

use crate::{HitParams, HitScore, PreciseHitTest};

/// Distance from `pt` to the closest point of `rect` (0 inside or on the edge).
fn distance_to_rect(rect: Rect, pt: Point) -> f64 {
    let nearest = Point::new(pt.x.clamp(rect.x0, rect.x1), pt.y.clamp(rect.y0, rect.y1));
    pt.distance(nearest)
}

/// Axis-aligned rectangle, edges inclusive.
impl PreciseHitTest for Rect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let rect = self.abs();
        if rect.area() <= 0.0 {
            return None;
        }
        let distance = distance_to_rect(rect, pt);
        (distance <= params.fill_tolerance).then_some(HitScore::near_fill(distance))
    }
}

/// Filled disk.
impl PreciseHitTest for Circle {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        if self.radius <= 0.0 {
            return None;
        }
        let from_center = pt.distance(self.center);
        if from_center > self.radius + params.fill_tolerance {
            return None;
        }
        Some(HitScore::near_fill((from_center - self.radius).max(0.0)))
    }
}

impl PreciseHitTest for RoundedRect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        hit_test_shape(self, pt, params)
    }
}

/// Fill-only test; the fill rule is whatever [`Shape::contains`] uses (non-zero).
impl PreciseHitTest for BezPath {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        hit_test_shape(self, pt, params)
    }
}

/// Fill test for any [`kurbo::Shape`].
///
/// Inside the exact outline the score is 0. Outside it, only the bounding box
/// distance is known, so a tolerant near miss reports the configured
/// tolerance as its distance. Shapes with an empty bounding box never hit.
pub fn hit_test_shape<S: Shape>(shape: &S, pt: Point, params: &HitParams) -> Option<HitScore> {
    let bounds = shape.bounding_box();
    if bounds.area() <= 0.0 {
        return None;
    }
    if shape.contains(pt) {
        return Some(HitScore::filled());
    }
    let tolerance = params.fill_tolerance;
    (tolerance > 0.0 && distance_to_rect(bounds, pt) <= tolerance)
        .then_some(HitScore::near_fill(tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_path() -> BezPath {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn rect_interior_and_edges_hit() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let params = HitParams::default();
        assert_eq!(
            r.hit_test_local(Point::new(5.0, 5.0), &params),
            Some(HitScore::filled())
        );
        assert!(r.hits(Point::new(10.0, 10.0), &params));
        assert!(!r.hits(Point::new(10.5, 5.0), &params));
    }

    #[test]
    fn inverted_rect_is_normalized() {
        let r = Rect::new(10.0, 10.0, 0.0, 0.0);
        assert!(r.hits(Point::new(5.0, 5.0), &HitParams::default()));
    }

    #[test]
    fn rect_tolerance_reports_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let score = r
            .hit_test_local(Point::new(12.0, 5.0), &HitParams::uniform(3.0))
            .expect("within tolerance");
        assert_eq!(score.distance, 2.0);
    }

    #[test]
    fn zero_area_never_hits_even_with_tolerance() {
        let params = HitParams::uniform(5.0);
        assert!(!Rect::new(0.0, 0.0, 0.0, 10.0).hits(Point::new(0.0, 5.0), &params));
        assert!(!Circle::new((0.0, 0.0), 0.0).hits(Point::ZERO, &params));

        let mut flat = BezPath::new();
        flat.move_to((0.0, 0.0));
        flat.line_to((10.0, 0.0));
        assert!(!flat.hits(Point::new(5.0, 0.0), &params));
    }

    #[test]
    fn circle_hit_and_miss() {
        let c = Circle::new((0.0, 0.0), 5.0);
        let params = HitParams::default();
        assert!(c.hits(Point::new(3.0, 3.0), &params));
        assert!(!c.hits(Point::new(4.0, 4.0), &params));
        let score = c
            .hit_test_local(Point::new(6.0, 0.0), &HitParams::uniform(2.0))
            .expect("tolerant hit");
        assert_eq!(score.distance, 1.0);
    }

    #[test]
    fn rounded_rect_corner_is_a_miss() {
        let rr = RoundedRect::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 4.0);
        let params = HitParams::default();
        assert!(rr.hits(Point::new(5.0, 5.0), &params));
        assert!(!rr.hits(Point::new(0.3, 0.3), &params));
    }

    #[test]
    fn path_uses_exact_outline() {
        let path = square_path();
        let params = HitParams::default();
        assert!(path.hits(Point::new(5.0, 5.0), &params));
        assert!(!path.hits(Point::new(20.0, 20.0), &params));
        assert_eq!(
            path.hit_test_local(Point::new(11.0, 5.0), &HitParams::uniform(2.0))
                .map(|s| s.distance),
            Some(2.0)
        );
    }
}
