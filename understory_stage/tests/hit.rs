// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-node hit tests, analytic and pixel-exact.

#![cfg(feature = "scene_adapter")]

use kurbo::{BezPath, Circle, Point, Rect, Size};
use understory_precise_hit::HitParams;
use understory_scene::{AlphaMask, LocalNode, NodeId, Scene, ShapeContent};
use understory_stage::{
    EventKind, HitTester, RawEvent, Stage, StageConfig, StageError, StageEvent,
};

fn kinds(events: &[StageEvent<NodeId>]) -> Vec<(EventKind, NodeId)> {
    events.iter().map(|e| (e.kind, e.node)).collect()
}

/// A square with a notch cut out of its top edge.
fn notched() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((0.0, 0.0));
    p.line_to((30.0, 0.0));
    p.line_to((30.0, 60.0));
    p.line_to((70.0, 60.0));
    p.line_to((70.0, 0.0));
    p.line_to((100.0, 0.0));
    p.line_to((100.0, 100.0));
    p.line_to((0.0, 100.0));
    p.close_path();
    p
}

/// 10x10 mask: left half opaque, right half transparent.
fn half_mask() -> AlphaMask {
    let alpha = (0..100)
        .map(|i| if i % 10 < 5 { 255 } else { 0 })
        .collect();
    AlphaMask::new(Point::ZERO, 10, 10, alpha).unwrap()
}

#[test]
fn analytic_and_pixel_paths_agree_on_a_notch() {
    let mut scene = Scene::new(Size::new(120.0, 120.0));
    let layer = scene.add_layer(LocalNode::default()).unwrap();
    let analytic = scene
        .add_shape(layer, LocalNode::default(), ShapeContent::new(notched()))
        .unwrap();
    let exact = scene
        .add_shape(
            layer,
            LocalNode::default(),
            ShapeContent::new(notched()).pixel_exact(),
        )
        .unwrap();

    let mut hit = HitTester::new(HitParams::default());
    for node in [analytic, exact] {
        assert!(!hit.hit_test(&scene, node, Point::new(50.0, 30.0)));
        assert!(hit.hit_test(&scene, node, Point::new(50.0, 80.0)));
        assert!(hit.hit_test(&scene, node, Point::new(15.0, 30.0)));
    }
    assert!(hit.canvas().is_some());
}

#[test]
fn containers_and_off_surface_points_never_hit() {
    let mut scene = Scene::new(Size::new(50.0, 50.0));
    let layer = scene.add_layer(LocalNode::default()).unwrap();
    let big = scene
        .add_shape(
            layer,
            LocalNode::default(),
            ShapeContent::new(Circle::new((25.0, 25.0), 100.0)),
        )
        .unwrap();
    let mut hit = HitTester::default();

    assert!(hit.hit_test(&scene, big, Point::new(25.0, 25.0)));
    assert!(!hit.hit_test(&scene, layer, Point::new(25.0, 25.0)));
    assert!(!hit.hit_test(&scene, big, Point::new(60.0, 25.0)));
    assert!(!hit.hit_test(&scene, big, Point::new(-1.0, 25.0)));
    assert!(!hit.hit_test(&scene, big, Point::new(f64::NAN, 25.0)));

    scene.remove(big).unwrap();
    assert!(!hit.hit_test(&scene, big, Point::new(25.0, 25.0)));
}

#[test]
fn transparent_mask_pixels_fall_through() {
    let mut scene = Scene::new(Size::new(100.0, 100.0));
    let layer = scene.add_layer(LocalNode::default()).unwrap();
    let below = scene
        .add_shape(
            layer,
            LocalNode::at((20.0, 20.0)),
            ShapeContent::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
        )
        .unwrap();
    let sprite = scene
        .add_shape(
            layer,
            LocalNode::at((20.0, 20.0)),
            ShapeContent::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_mask(half_mask()),
        )
        .unwrap();
    let mut stage = Stage::new(StageConfig::default().with_move_rate_hz(None)).unwrap();

    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(0, (22.5, 25.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, sprite)]);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(10, (27.5, 25.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, below)]);

    // The mask follows the node.
    scene.set_local_position(sprite, Point::new(60.0, 60.0));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(20, (62.5, 65.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, sprite)]);
}

#[test]
fn surface_resize_follows_the_scene() {
    let mut scene = Scene::new(Size::new(40.0, 40.0));
    let layer = scene.add_layer(LocalNode::default()).unwrap();
    let exact = scene
        .add_shape(
            layer,
            LocalNode::at((50.0, 50.0)),
            ShapeContent::new(Rect::new(0.0, 0.0, 10.0, 10.0)).pixel_exact(),
        )
        .unwrap();
    let mut hit = HitTester::default();
    assert!(!hit.hit_test(&scene, exact, Point::new(55.0, 55.0)));

    scene.set_size(Size::new(80.0, 80.0));
    assert!(hit.hit_test(&scene, exact, Point::new(55.0, 55.0)));
    let canvas = hit.canvas().unwrap();
    assert_eq!((canvas.width(), canvas.height()), (80, 80));
}

#[test]
fn oversized_surface_misses_pixel_exact_shapes_only() {
    let mut scene = Scene::new(Size::new(1e9, 1e9));
    let layer = scene.add_layer(LocalNode::default()).unwrap();
    let analytic = scene
        .add_shape(
            layer,
            LocalNode::default(),
            ShapeContent::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
        )
        .unwrap();
    let exact = scene
        .add_shape(
            layer,
            LocalNode::at((20.0, 0.0)),
            ShapeContent::new(Rect::new(0.0, 0.0, 10.0, 10.0)).pixel_exact(),
        )
        .unwrap();

    let mut hit = HitTester::default();
    assert!(hit.hit_test(&scene, analytic, Point::new(5.0, 5.0)));
    assert!(!hit.hit_test(&scene, exact, Point::new(25.0, 5.0)));
    assert!(hit.canvas().is_none());

    let mut stage = Stage::<NodeId>::default();
    assert!(matches!(
        stage.resize_surface(Size::new(1e9, 1e9)),
        Err(StageError::SurfaceTooLarge { .. })
    ));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(0, (25.0, 5.0)));
    assert!(ev.is_empty());

    // Shrinking the surface brings pixel-exact hits back.
    scene.set_size(Size::new(100.0, 100.0));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(10, (25.0, 5.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, exact)]);
}
