// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-surface interaction state machine.
//!
//! ## Overview
//!
//! A [`Stage`] turns raw input into [`StageEvent`]s. For every raw event it:
//!
//! 1. closes double-click windows that expired by the event's timestamp;
//! 2. reduces the event to one channel action (touch keeps only its primary contact);
//! 3. drops move actions that arrive faster than the configured rate;
//! 4. updates the channel record and walks the scene front to back, letting
//!    the first shape that claims the event decide what fires;
//! 5. runs the drag session (arm on press, follow on move, end on release or leave).
//!
//! All of this happens before [`Stage::handle`] returns the event list, so no
//! application code runs while the stage is mid-update.
//!
//! ## Per-shape decision
//!
//! When the point is inside a visible shape, exactly one of these fires, in
//! priority order:
//!
//! - **press** (not dragging): arm a click on the shape, emit `Press`;
//! - **release**: emit `Release`; if the click was armed on this shape and no
//!   drag is moving, emit `Click`, plus `DoubleClick` if the shape's window was
//!   still open, then re-open the window;
//! - **hover** (not dragging, shape is not the target): `Exit` the old target
//!   if it still exists, `Enter` the shape;
//! - **move** (not dragging): emit `Move`.
//!
//! When the point is outside the shape and the shape is the target (and no
//! drag is moving), the shape gets `Exit`. On a move the walk stops there; a
//! press or release keeps walking so the shape under the point still gets it.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "scene_adapter")]
//! # {
//! use kurbo::{Rect, Size};
//! use understory_scene::{LocalNode, Scene, ShapeContent};
//! use understory_stage::{EventKind, RawEvent, Stage};
//!
//! let mut scene = Scene::new(Size::new(100.0, 100.0));
//! let layer = scene.add_layer(LocalNode::default()).unwrap();
//! let button = scene
//!     .add_shape(layer, LocalNode::default(), ShapeContent::new(Rect::new(10.0, 10.0, 40.0, 30.0)))
//!     .unwrap();
//!
//! let mut stage = Stage::default();
//! stage.handle(&mut scene, &RawEvent::pointer_down(0, (20.0, 20.0)));
//! let events = stage.handle(&mut scene, &RawEvent::pointer_up(50, (20.0, 20.0)));
//!
//! let kinds: Vec<_> = events.iter().map(|e| (e.kind, e.node)).collect();
//! assert_eq!(kinds, [(EventKind::Release, button), (EventKind::Click, button)]);
//! # }
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Size};
use understory_event_state::click::GestureWindows;
use understory_event_state::drag::{DragPhase, DragSession};
use understory_event_state::hover::{HoverEvent, TargetTracker};
use understory_event_state::throttle::MoveThrottle;

use crate::config::StageConfig;
use crate::error::StageError;
use crate::event::{EventKind, StageEvent};
use crate::hit::HitTester;
use crate::input::{Action, Channel, ChannelState, PrimaryContact, RawEvent};
use crate::scene::SceneAccess;
use crate::traverse;

/// Events produced for one raw input, in emission order.
pub type StageEvents<K> = Vec<StageEvent<K>>;

/// Input routing state for one drawing surface.
///
/// `K` is the scene's node key. A stage can be driven with any
/// [`SceneAccess`] implementation using that key; it never stores references
/// into the scene between calls.
#[derive(Debug)]
pub struct Stage<K> {
    config: StageConfig,
    hit: HitTester,
    channels: [ChannelState<K>; 2],
    primary: PrimaryContact,
    target: TargetTracker<K>,
    windows: GestureWindows<(Channel, K)>,
    drag: DragSession<K>,
    throttle: MoveThrottle,
}

impl<K: Copy + Eq + Hash + Debug> Default for Stage<K> {
    fn default() -> Self {
        Self::with_valid_config(StageConfig::default())
    }
}

/// Scratch for one dispatch cycle.
struct Cycle<K> {
    channel: Channel,
    time: u64,
    events: StageEvents<K>,
    pressed: Option<K>,
}

impl<K: Copy> Cycle<K> {
    fn emit(&mut self, kind: EventKind, node: K, position: Option<Point>) {
        self.events.push(StageEvent {
            kind,
            node,
            channel: self.channel,
            position,
            time: self.time,
        });
    }
}

impl<K: Copy + Eq + Hash + Debug> Stage<K> {
    /// Create a stage with `config`.
    pub fn new(config: StageConfig) -> Result<Self, StageError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: StageConfig) -> Self {
        Self {
            config,
            hit: HitTester::new(config.hit_params),
            channels: [ChannelState::default(), ChannelState::default()],
            primary: PrimaryContact::default(),
            target: TargetTracker::new(),
            windows: GestureWindows::new(config.double_click_window_ms),
            drag: DragSession::new(),
            throttle: MoveThrottle::new(config.move_rate_hz),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// Open double-click windows keep their deadlines; the move throttle restarts.
    pub fn set_config(&mut self, config: StageConfig) -> Result<(), StageError> {
        config.validate()?;
        self.config = config;
        self.hit.set_params(config.hit_params);
        self.windows.set_window_ms(config.double_click_window_ms);
        self.throttle = MoveThrottle::new(config.move_rate_hz);
        Ok(())
    }

    /// Prepare the pixel-exact hit canvas for a surface of `size`.
    ///
    /// Optional: the canvas is otherwise allocated on the first pixel-exact probe.
    pub fn resize_surface(&mut self, size: Size) -> Result<(), StageError> {
        self.hit.resize(size)
    }

    /// The node the pointer is currently inside, if any.
    pub fn target(&self) -> Option<K> {
        self.target.current()
    }

    /// Record of one channel.
    pub fn channel(&self, channel: Channel) -> &ChannelState<K> {
        &self.channels[channel.index()]
    }

    /// Identifier of the touch contact driving the touch channel, if any.
    pub fn primary_touch(&self) -> Option<u64> {
        self.primary.current()
    }

    /// The node being dragged, if a session is armed or moving.
    pub fn dragged(&self) -> Option<K> {
        self.drag.node()
    }

    /// Phase of the drag session.
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Returns `true` while a dragged node is following the pointer.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_moving()
    }

    /// Returns `true` if a second click on `node` at `now` would be a double click.
    pub fn is_double_click_pending(&self, channel: Channel, node: K, now: u64) -> bool {
        self.windows.is_pending(&(channel, node), now)
    }

    /// Earliest double-click window deadline, for hosts that drive time explicitly.
    pub fn next_deadline(&self) -> Option<u64> {
        self.windows.next_deadline()
    }

    /// Close double-click windows that expired by `now`.
    ///
    /// [`Stage::handle`] does this with each event's timestamp; hosts with an
    /// idle timer can call it directly. Returns the number of windows closed.
    pub fn advance<S: SceneAccess<Key = K>>(&mut self, scene: &S, now: u64) -> usize {
        self.windows.expire(now, |(_, node)| scene.is_alive(*node))
    }

    /// Forget everything held about `node` after it left the scene.
    ///
    /// No events are produced: a removed target gets no exit and a removed
    /// dragged node gets no drag end.
    pub fn node_removed(&mut self, node: K) {
        let was_target = self.target.forget(&node);
        let was_dragged = self.drag.forget(&node);
        let windows = self.windows.cancel_where(|(_, n)| *n == node);
        for ch in &mut self.channels {
            if ch.armed == Some(node) {
                ch.armed = None;
            }
        }
        if was_target || was_dragged || windows > 0 {
            tracing::debug!(?node, was_target, was_dragged, windows, "purged removed node");
        }
    }

    /// [`Stage::node_removed`] for every node in `nodes`.
    pub fn nodes_removed(&mut self, nodes: impl IntoIterator<Item = K>) {
        for node in nodes {
            self.node_removed(node);
        }
    }

    /// Process one raw event and return the synthetic events it produced.
    pub fn handle<S: SceneAccess<Key = K>>(
        &mut self,
        scene: &mut S,
        event: &RawEvent,
    ) -> StageEvents<K> {
        let now = event.time;
        self.advance(scene, now);

        let Some((channel, action)) = self.primary.resolve(&event.input) else {
            return StageEvents::new();
        };
        let mut cx = Cycle {
            channel,
            time: now,
            events: StageEvents::new(),
            pressed: None,
        };
        match action {
            Action::Press(at) => self.on_press(scene, &mut cx, at),
            Action::Move(at) => {
                if !self.throttle.admit(now) {
                    return cx.events;
                }
                self.on_move(scene, &mut cx, at);
            }
            Action::Release(at) => self.on_release(scene, &mut cx, at),
            Action::Leave => self.on_leave(scene, &mut cx),
        }
        cx.events
    }

    fn on_press<S: SceneAccess<Key = K>>(&mut self, scene: &mut S, cx: &mut Cycle<K>, at: Point) {
        // A press always starts from a clean drag state.
        if let Some(stale) = self.drag.end() {
            tracing::debug!(node = ?stale.node, "dropped stale drag session on press");
        }
        let ch = &mut self.channels[cx.channel.index()];
        ch.clear_flags();
        ch.position = Some(at);
        ch.pressed = true;
        ch.armed = None;

        self.run_cycle(scene, cx);
        self.channels[cx.channel.index()].pressed = false;

        let start = cx.pressed.unwrap_or_else(|| scene.stage());
        if let Some(node) = draggable_ancestor_or_self(scene, start)
            && let (Some(options), Some(position)) =
                (scene.drag_options(node), scene.position_of(node))
        {
            self.drag.arm(node, at, position, options);
        }
    }

    fn on_move<S: SceneAccess<Key = K>>(&mut self, scene: &mut S, cx: &mut Cycle<K>, at: Point) {
        let ch = &mut self.channels[cx.channel.index()];
        ch.position = Some(at);
        ch.moved = true;

        self.run_cycle(scene, cx);
        self.channels[cx.channel.index()].moved = false;

        self.follow_drag(scene, cx, at);
    }

    fn on_release<S: SceneAccess<Key = K>>(
        &mut self,
        scene: &mut S,
        cx: &mut Cycle<K>,
        at: Point,
    ) {
        let ch = &mut self.channels[cx.channel.index()];
        ch.position = Some(at);
        ch.released = true;

        self.run_cycle(scene, cx);
        let ch = &mut self.channels[cx.channel.index()];
        ch.released = false;
        ch.armed = None;

        self.end_drag(scene, cx, Some(at));
    }

    fn on_leave<S: SceneAccess<Key = K>>(&mut self, scene: &S, cx: &mut Cycle<K>) {
        if let Some(old) = self.target.leave()
            && scene.is_alive(old)
        {
            tracing::debug!(node = ?old, "target left surface");
            cx.emit(EventKind::Exit, old, None);
        }
        let ch = &mut self.channels[cx.channel.index()];
        ch.clear_flags();
        ch.position = None;
        ch.armed = None;
        self.throttle.reset();
        self.end_drag(scene, cx, None);
    }

    /// Walk the scene for the current channel action, then flush a stale target.
    fn run_cycle<S: SceneAccess<Key = K>>(&mut self, scene: &S, cx: &mut Cycle<K>) {
        let consumed = traverse::walk_stage(scene, |node| self.decide(scene, node, cx));
        if consumed || self.drag.is_moving() {
            return;
        }
        // Nothing claimed the event but a target is still tracked: it was
        // hidden, stopped listening or left, and never got a chance to exit.
        if let Some(old) = self.target.leave()
            && scene.is_alive(old)
        {
            tracing::debug!(node = ?old, "flushing stale target");
            cx.emit(EventKind::Exit, old, self.channels[cx.channel.index()].position);
        }
    }

    fn decide<S: SceneAccess<Key = K>>(&mut self, scene: &S, node: K, cx: &mut Cycle<K>) -> bool {
        let dragging = self.drag.is_moving();
        let idx = cx.channel.index();
        let position = self.channels[idx].position;
        let inside = match position {
            Some(pt) => scene.is_visible(node) && self.hit.hit_test(scene, node, pt),
            None => false,
        };

        if !inside {
            if !dragging && self.target.is_current(&node) {
                self.target.leave();
                tracing::debug!(?node, "target exited");
                cx.emit(EventKind::Exit, node, position);
                // Presses and releases still need the shape under the point.
                let ch = &self.channels[idx];
                return !(ch.pressed || ch.released);
            }
            return false;
        }

        let ch = &mut self.channels[idx];
        if ch.pressed && !dragging {
            ch.pressed = false;
            ch.armed = Some(node);
            cx.pressed = Some(node);
            cx.emit(EventKind::Press, node, position);
            return true;
        }

        if ch.released {
            ch.released = false;
            let armed_here = ch.armed == Some(node);
            cx.emit(EventKind::Release, node, position);
            let key = (cx.channel, node);
            if dragging {
                // A drag ending here consumes any pending pair.
                self.windows.cancel(&key);
            } else if armed_here {
                cx.emit(EventKind::Click, node, position);
                if self.windows.take_pending(&key, cx.time) {
                    cx.emit(EventKind::DoubleClick, node, position);
                }
                self.windows.arm(key, cx.time);
            }
            return true;
        }

        if !dragging && !self.target.is_current(&node) {
            for change in self.target.enter(node) {
                match change {
                    HoverEvent::Leave(old) => {
                        if scene.is_alive(old) {
                            cx.emit(EventKind::Exit, old, position);
                        }
                    }
                    HoverEvent::Enter(new) => {
                        tracing::debug!(node = ?new, "target entered");
                        cx.emit(EventKind::Enter, new, position);
                    }
                }
            }
            return true;
        }

        let ch = &mut self.channels[idx];
        if !dragging && ch.moved {
            ch.moved = false;
            cx.emit(EventKind::Move, node, position);
            return true;
        }

        // Still over the current target with nothing to report.
        self.target.is_current(&node)
    }

    fn follow_drag<S: SceneAccess<Key = K>>(
        &mut self,
        scene: &mut S,
        cx: &mut Cycle<K>,
        at: Point,
    ) {
        let Some(node) = self.drag.node() else {
            return;
        };
        if !scene.is_alive(node) {
            self.drag.forget(&node);
            return;
        }
        let Some(step) = self.drag.update(at) else {
            return;
        };
        let position = Some(at);
        if step.started {
            // Drag activity cancels every pending double click.
            self.windows.clear();
            cx.emit(EventKind::DragStart, node, position);
        }
        scene.set_position(node, step.position);
        cx.emit(EventKind::DragMove, node, position);
        if node == scene.stage() {
            scene.repaint_all();
        } else if let Some(layer) = scene.layer_of(node) {
            scene.repaint(layer);
        }
    }

    fn end_drag<S: SceneAccess<Key = K>>(
        &mut self,
        scene: &S,
        cx: &mut Cycle<K>,
        at: Option<Point>,
    ) {
        if let Some(end) = self.drag.end()
            && end.moved
            && scene.is_alive(end.node)
        {
            cx.emit(EventKind::DragEnd, end.node, at);
        }
    }
}

/// Nearest node at or above `node` that has drag options.
fn draggable_ancestor_or_self<S: SceneAccess>(scene: &S, node: S::Key) -> Option<S::Key> {
    let mut cursor = Some(node);
    while let Some(n) = cursor {
        if scene.drag_options(n).is_some() {
            return Some(n);
        }
        cursor = scene.parent_of(n);
    }
    None
}
