// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end routing through a real scene: clicks, hover, throttling, walk order.

#![cfg(feature = "scene_adapter")]

use std::cell::RefCell;

use kurbo::{Point, Rect, Size};
use peniko::Color;
use understory_event_state::drag::DragOptions;
use understory_precise_hit::{HitCanvas, HitGeometry};
use understory_scene::{LocalNode, NodeId, Scene, ShapeContent};
use understory_stage::{
    Channel, EventKind, NodeKind, RawEvent, SceneAccess, Stage, StageConfig, StageError,
    StageEvent,
};

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> ShapeContent {
    ShapeContent::new(Rect::new(x0, y0, x1, y1))
}

fn unthrottled() -> Stage<NodeId> {
    Stage::new(StageConfig::default().with_move_rate_hz(None)).unwrap()
}

fn kinds(events: &[StageEvent<NodeId>]) -> Vec<(EventKind, NodeId)> {
    events.iter().map(|e| (e.kind, e.node)).collect()
}

/// One layer with `a` at (10,10)-(50,50) and `b` at (60,10)-(100,50); `b` is on top.
fn two_shapes() -> (Scene, NodeId, NodeId) {
    let mut scene = Scene::new(Size::new(200.0, 200.0));
    let layer = scene.add_layer(LocalNode::default()).unwrap();
    let a = scene
        .add_shape(layer, LocalNode::default(), square(10.0, 10.0, 50.0, 50.0))
        .unwrap();
    let b = scene
        .add_shape(layer, LocalNode::default(), square(60.0, 10.0, 100.0, 50.0))
        .unwrap();
    (scene, a, b)
}

#[test]
fn click_then_double_click() {
    let (mut scene, a, _) = two_shapes();
    let mut stage = unthrottled();

    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(0, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, a)]);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_up(10, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, a), (EventKind::Click, a)]);

    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(100, (21.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, a)]);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_up(150, (21.0, 20.0)));
    assert_eq!(
        kinds(&ev),
        [
            (EventKind::Release, a),
            (EventKind::Click, a),
            (EventKind::DoubleClick, a)
        ]
    );
    assert_eq!(
        ev.iter().map(StageEvent::name).collect::<Vec<_>>(),
        ["mouseup", "click", "dblclick"]
    );

    // Long after the window closed: a plain click again.
    stage.handle(&mut scene, &RawEvent::pointer_down(1_000, (20.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_up(1_010, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, a), (EventKind::Click, a)]);
}

#[test]
fn press_and_release_on_different_nodes_is_not_a_click() {
    let (mut scene, _, b) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_down(0, (20.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_up(10, (70.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, b)]);
    assert_eq!(stage.channel(Channel::Pointer).armed(), None);
}

#[test]
fn windows_do_not_pair_across_nodes() {
    let (mut scene, a, b) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_down(0, (20.0, 20.0)));
    stage.handle(&mut scene, &RawEvent::pointer_up(10, (20.0, 20.0)));
    stage.handle(&mut scene, &RawEvent::pointer_down(20, (70.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_up(30, (70.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, b), (EventKind::Click, b)]);
    assert!(stage.is_double_click_pending(Channel::Pointer, a, 30));
    assert!(stage.is_double_click_pending(Channel::Pointer, b, 30));
}

#[test]
fn click_lands_while_another_shape_is_the_target() {
    let (mut scene, a, b) = two_shapes();
    let mut stage = Stage::default();

    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(0, (70.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, b)]);
    // Dropped by the throttle, so `b` is still the target at the press.
    assert!(
        stage
            .handle(&mut scene, &RawEvent::pointer_move(5, (20.0, 20.0)))
            .is_empty()
    );
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(6, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, b), (EventKind::Press, a)]);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_up(50, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, a), (EventKind::Click, a)]);
    assert_eq!(stage.target(), None);

    // Same on the release side: the exit does not swallow the release.
    stage.handle(&mut scene, &RawEvent::pointer_down(1_000, (20.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(1_001, (70.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, b)]);
    stage.handle(&mut scene, &RawEvent::pointer_move(1_005, (20.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::pointer_up(1_008, (20.0, 20.0)));
    assert_eq!(
        kinds(&ev),
        [
            (EventKind::Exit, b),
            (EventKind::Release, a),
            (EventKind::Click, a)
        ]
    );
}

#[test]
fn tap_lands_after_touching_another_shape() {
    let (mut scene, a, b) = two_shapes();
    let mut stage = unthrottled();

    stage.handle(&mut scene, &RawEvent::touch_start(0, 1, (70.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::touch_move(10, 1, (72.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, b)]);
    let ev = stage.handle(&mut scene, &RawEvent::touch_end(20, 1, (72.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, b), (EventKind::Click, b)]);
    assert_eq!(stage.target(), Some(b));

    let ev = stage.handle(&mut scene, &RawEvent::touch_start(1_000, 2, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, b), (EventKind::Press, a)]);
    let ev = stage.handle(&mut scene, &RawEvent::touch_end(1_050, 2, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, a), (EventKind::Click, a)]);
    assert_eq!(
        ev.iter().map(StageEvent::name).collect::<Vec<_>>(),
        ["touchend", "tap"]
    );
}

#[test]
fn touch_and_pointer_share_one_target() {
    let (mut scene, a, b) = two_shapes();
    let mut stage = unthrottled();

    stage.handle(&mut scene, &RawEvent::touch_start(0, 1, (70.0, 20.0)));
    stage.handle(&mut scene, &RawEvent::touch_move(10, 1, (72.0, 20.0)));
    assert_eq!(stage.target(), Some(b));

    // The mouse exits what the finger entered.
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(20, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, b)]);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(30, (21.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, a)]);
    assert_eq!(ev[0].channel, Channel::Pointer);
}

#[test]
fn window_expiry_runs_on_advance() {
    let (mut scene, a, _) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_down(0, (20.0, 20.0)));
    stage.handle(&mut scene, &RawEvent::pointer_up(10, (20.0, 20.0)));
    assert_eq!(stage.next_deadline(), Some(410));
    assert_eq!(stage.advance(&scene, 409), 0);
    assert_eq!(stage.advance(&scene, 410), 1);
    assert!(!stage.is_double_click_pending(Channel::Pointer, a, 410));
    assert_eq!(stage.next_deadline(), None);
}

#[test]
fn exit_precedes_enter_and_stops_the_walk() {
    let (mut scene, a, b) = two_shapes();
    let mut stage = unthrottled();

    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(0, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, a)]);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(10, (25.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Move, a)]);

    // `b` is visited first and is entered directly.
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(20, (70.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, a), (EventKind::Enter, b)]);

    // Back onto `a`: `b` is visited first, exits, and ends the walk.
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(30, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, b)]);
    assert_eq!(stage.target(), None);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(40, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, a)]);

    let ev = stage.handle(&mut scene, &RawEvent::pointer_leave(50));
    assert_eq!(kinds(&ev), [(EventKind::Exit, a)]);
    assert_eq!(ev[0].position, None);
    assert_eq!(stage.channel(Channel::Pointer).position(), None);
}

#[test]
fn enters_and_exits_stay_balanced() {
    let (mut scene, _, _) = two_shapes();
    let mut stage = unthrottled();
    let path = [
        (20.0, 20.0),
        (70.0, 20.0),
        (150.0, 150.0),
        (70.0, 20.0),
        (20.0, 20.0),
        (30.0, 30.0),
        (150.0, 20.0),
        (20.0, 20.0),
        (55.0, 20.0),
        (90.0, 40.0),
    ];
    let mut inside: Option<NodeId> = None;
    let mut time = 0;
    for round in 0..3 {
        for &(x, y) in &path {
            time += 16;
            let at = if round == 1 { (y, x) } else { (x, y) };
            for e in stage.handle(&mut scene, &RawEvent::pointer_move(time, at)) {
                match e.kind {
                    EventKind::Enter => {
                        assert_eq!(inside, None, "enter while inside {inside:?}");
                        inside = Some(e.node);
                    }
                    EventKind::Exit => {
                        assert_eq!(inside, Some(e.node), "exit without matching enter");
                        inside = None;
                    }
                    _ => {}
                }
            }
            assert_eq!(stage.target(), inside);
        }
    }
    for e in stage.handle(&mut scene, &RawEvent::pointer_leave(time + 1)) {
        assert_eq!(e.kind, EventKind::Exit);
        assert_eq!(inside.take(), Some(e.node));
    }
    assert_eq!(inside, None);
}

#[test]
fn fast_moves_are_dropped_entirely() {
    let (mut scene, a, _) = two_shapes();
    let mut stage = Stage::default();

    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(0, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, a)]);

    // 80 Hz: anything closer than 12.5ms to the last processed move is dropped,
    // including its position.
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(5, (150.0, 150.0)));
    assert!(ev.is_empty());
    assert_eq!(
        stage.channel(Channel::Pointer).position(),
        Some(Point::new(20.0, 20.0))
    );
    assert_eq!(stage.target(), Some(a));

    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(13, (22.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Move, a)]);

    // Presses are never throttled.
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(14, (22.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, a)]);
}

#[test]
fn hidden_or_deaf_shapes_let_events_through() {
    let (mut scene, a, _) = two_shapes();
    let layer = scene.layer_of(a).unwrap();
    // Overlap: `c` covers `a` and sits on top.
    let c = scene
        .add_shape(layer, LocalNode::default(), square(0.0, 0.0, 60.0, 60.0))
        .unwrap();
    let mut stage = unthrottled();

    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(0, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, c)]);

    scene.set_visible(c, false);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(10, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, a)]);

    scene.set_visible(c, true);
    scene.set_listening(c, false);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_down(20, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, a)]);
}

#[test]
fn target_that_stops_listening_is_flushed() {
    let (mut scene, a, _) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_move(0, (20.0, 20.0)));
    assert_eq!(stage.target(), Some(a));

    // `a` is no longer visited at all, so only the stage-level flush can exit it.
    scene.set_listening(a, false);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(10, (21.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, a)]);
    assert_eq!(stage.target(), None);
}

#[test]
fn hidden_target_exits_on_next_move() {
    let (mut scene, a, _) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_move(0, (20.0, 20.0)));
    scene.set_visible(a, false);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(10, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, a)]);
}

#[test]
fn removed_target_never_exits() {
    let (mut scene, a, b) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_move(0, (20.0, 20.0)));
    stage.nodes_removed(scene.remove(a).unwrap());
    assert_eq!(stage.target(), None);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(10, (70.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, b)]);
}

#[test]
fn stale_target_is_dropped_silently_without_notification() {
    let (mut scene, a, b) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_move(0, (20.0, 20.0)));
    // The stage is not told about the removal.
    scene.remove(a).unwrap();
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(10, (70.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Enter, b)]);
    let ev = stage.handle(&mut scene, &RawEvent::pointer_move(20, (150.0, 150.0)));
    assert_eq!(kinds(&ev), [(EventKind::Exit, b)]);
}

#[test]
fn touch_taps_and_double_taps() {
    let (mut scene, a, _) = two_shapes();
    let mut stage = unthrottled();

    let ev = stage.handle(&mut scene, &RawEvent::touch_start(0, 7, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, a)]);
    assert_eq!(ev[0].name(), "touchstart");
    assert_eq!(stage.primary_touch(), Some(7));

    // A second finger is ignored while the first is down.
    assert!(
        stage
            .handle(&mut scene, &RawEvent::touch_start(5, 8, (70.0, 20.0)))
            .is_empty()
    );
    assert!(
        stage
            .handle(&mut scene, &RawEvent::touch_end(6, 8, (70.0, 20.0)))
            .is_empty()
    );

    let ev = stage.handle(&mut scene, &RawEvent::touch_end(10, 7, (20.0, 20.0)));
    assert_eq!(
        ev.iter().map(StageEvent::name).collect::<Vec<_>>(),
        ["touchend", "tap"]
    );
    assert!(ev.iter().all(|e| e.channel == Channel::Touch));

    stage.handle(&mut scene, &RawEvent::touch_start(100, 9, (20.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::touch_end(120, 9, (20.0, 20.0)));
    assert_eq!(
        ev.iter().map(StageEvent::name).collect::<Vec<_>>(),
        ["touchend", "tap", "dbltap"]
    );
}

#[test]
fn pointer_and_touch_windows_are_separate() {
    let (mut scene, a, _) = two_shapes();
    let mut stage = unthrottled();
    stage.handle(&mut scene, &RawEvent::pointer_down(0, (20.0, 20.0)));
    stage.handle(&mut scene, &RawEvent::pointer_up(10, (20.0, 20.0)));
    stage.handle(&mut scene, &RawEvent::touch_start(20, 1, (20.0, 20.0)));
    let ev = stage.handle(&mut scene, &RawEvent::touch_end(30, 1, (20.0, 20.0)));
    assert_eq!(kinds(&ev), [(EventKind::Release, a), (EventKind::Click, a)]);
}

#[test]
fn invalid_configuration_is_rejected() {
    let bad = StageConfig::default().with_double_click_window_ms(0);
    assert!(matches!(
        Stage::<NodeId>::new(bad),
        Err(StageError::InvalidDoubleClickWindow)
    ));
    let mut stage = unthrottled();
    assert!(
        stage
            .set_config(StageConfig::default().with_move_rate_hz(Some(-2.0)))
            .is_err()
    );
    assert_eq!(stage.config().move_rate_hz, None);
    assert!(matches!(
        stage.resize_surface(Size::new(0.0, 10.0)),
        Err(StageError::EmptySurface { .. })
    ));
}

/// Delegates to a [`Scene`] and records which containers had their children listed.
struct Recording<'a> {
    scene: &'a mut Scene,
    listed: RefCell<Vec<NodeId>>,
}

impl SceneAccess for Recording<'_> {
    type Key = NodeId;

    fn stage(&self) -> NodeId {
        SceneAccess::stage(&*self.scene)
    }
    fn is_alive(&self, node: NodeId) -> bool {
        SceneAccess::is_alive(&*self.scene, node)
    }
    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        SceneAccess::kind(&*self.scene, node)
    }
    fn is_visible(&self, node: NodeId) -> bool {
        SceneAccess::is_visible(&*self.scene, node)
    }
    fn is_listening(&self, node: NodeId) -> bool {
        SceneAccess::is_listening(&*self.scene, node)
    }
    fn children_of(&self, node: NodeId) -> &[NodeId] {
        self.listed.borrow_mut().push(node);
        SceneAccess::children_of(&*self.scene, node)
    }
    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        SceneAccess::parent_of(&*self.scene, node)
    }
    fn layer_of(&self, node: NodeId) -> Option<NodeId> {
        SceneAccess::layer_of(&*self.scene, node)
    }
    fn hit_geometry(&self, node: NodeId) -> Option<HitGeometry> {
        SceneAccess::hit_geometry(&*self.scene, node)
    }
    fn paint_hit_region(&self, node: NodeId, canvas: &mut HitCanvas, color: Color) -> bool {
        SceneAccess::paint_hit_region(&*self.scene, node, canvas, color)
    }
    fn position_of(&self, node: NodeId) -> Option<Point> {
        SceneAccess::position_of(&*self.scene, node)
    }
    fn set_position(&mut self, node: NodeId, position: Point) {
        SceneAccess::set_position(self.scene, node, position);
    }
    fn drag_options(&self, node: NodeId) -> Option<DragOptions> {
        SceneAccess::drag_options(&*self.scene, node)
    }
    fn repaint(&mut self, layer: NodeId) {
        SceneAccess::repaint(self.scene, layer);
    }
    fn repaint_all(&mut self) {
        SceneAccess::repaint_all(self.scene);
    }
    fn surface_size(&self) -> Size {
        SceneAccess::surface_size(&*self.scene)
    }
}

#[test]
fn layers_below_a_consuming_layer_are_never_visited() {
    let mut scene = Scene::new(Size::new(200.0, 200.0));
    let bottom = scene.add_layer(LocalNode::default()).unwrap();
    let low = scene
        .add_shape(bottom, LocalNode::default(), square(0.0, 0.0, 100.0, 100.0))
        .unwrap();
    let top = scene.add_layer(LocalNode::default()).unwrap();
    let high = scene
        .add_shape(top, LocalNode::default(), square(0.0, 0.0, 50.0, 50.0))
        .unwrap();
    let mut stage = unthrottled();

    let mut rec = Recording {
        scene: &mut scene,
        listed: RefCell::new(Vec::new()),
    };
    let ev = stage.handle(&mut rec, &RawEvent::pointer_down(0, (25.0, 25.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, high)]);
    let listed = rec.listed.take();
    assert!(listed.contains(&top));
    assert!(!listed.contains(&bottom), "bottom layer visited: {listed:?}");

    // Outside the top shape the walk falls through to the bottom layer.
    let ev = stage.handle(&mut rec, &RawEvent::pointer_down(10, (75.0, 75.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, low)]);
    let listed = rec.listed.take();
    assert!(listed.contains(&top) && listed.contains(&bottom));

    // A hidden top layer is skipped without being listed.
    rec.scene.set_visible(top, false);
    let ev = stage.handle(&mut rec, &RawEvent::pointer_down(20, (25.0, 25.0)));
    assert_eq!(kinds(&ev), [(EventKind::Press, low)]);
    assert!(!rec.listed.take().contains(&top));
}
