// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted input routed through a small scene.
//!
//! The scene has:
//! - a button (analytic rectangle) that counts clicks and double clicks,
//! - a slider knob that drags horizontally between two bounds,
//! - a sprite whose alpha mask is hit pixel-exactly over a background panel.
//!
//! Events are delivered with `Listeners`, bubbling from shapes to their layers.
//!
//! Run:
//! - `cargo run -p understory_demos --example stage_routing`
//! - `RUST_LOG=understory_stage=debug cargo run -p understory_demos --example stage_routing`

use std::error::Error;

use kurbo::{Point, Rect, RoundedRect, Size};
use understory_event_state::drag::{DragAxis, DragBounds, DragOptions};
use understory_scene::{AlphaMask, LocalNode, NodeId, Scene, ShapeContent};
use understory_stage::dispatcher::{Listeners, Outcome};
use understory_stage::{EventKind, RawEvent, Stage, StageConfig};

#[derive(Debug, Default)]
struct App {
    clicks: u32,
    double_clicks: u32,
    knob_moves: u32,
    log: Vec<String>,
}

/// A diamond of opaque cells in a 16x16 grid.
fn diamond_mask() -> Option<AlphaMask> {
    let alpha = (0..16 * 16)
        .map(|i| {
            let (x, y) = (i % 16, i / 16);
            let d = (x - 8_i32).abs() + (y - 8_i32).abs();
            if d <= 7 { 255 } else { 0 }
        })
        .collect();
    AlphaMask::new(Point::ZERO, 16, 16, alpha)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut scene = Scene::new(Size::new(320.0, 200.0));

    let controls = scene.add_layer(LocalNode::default())?;
    let button = scene.add_shape(
        controls,
        LocalNode::at((20.0, 20.0)),
        ShapeContent::new(RoundedRect::new(0.0, 0.0, 80.0, 30.0, 6.0)),
    )?;
    let track = scene.add_group(controls, LocalNode::at((20.0, 100.0)))?;
    let knob = scene.add_shape(
        track,
        LocalNode::default().draggable(DragOptions {
            axis: DragAxis::Horizontal,
            bounds: DragBounds::new().with_left(20.0).with_right(180.0),
        }),
        ShapeContent::new(Rect::new(0.0, 0.0, 12.0, 24.0)),
    )?;

    let art = scene.add_layer(LocalNode::default())?;
    let panel = scene.add_shape(
        art,
        LocalNode::at((220.0, 20.0)),
        ShapeContent::new(Rect::new(0.0, 0.0, 16.0, 16.0)),
    )?;
    let sprite = scene.add_shape(
        art,
        LocalNode::at((220.0, 20.0)),
        ShapeContent::new(Rect::new(0.0, 0.0, 16.0, 16.0))
            .with_mask(diamond_mask().ok_or("mask size mismatch")?),
    )?;

    let mut listeners: Listeners<NodeId, App> = Listeners::new();
    listeners.on(button, EventKind::Click, |_, app| {
        app.clicks += 1;
        Outcome::Continue
    });
    listeners.on(button, EventKind::DoubleClick, |_, app| {
        app.double_clicks += 1;
        Outcome::Continue
    });
    listeners.on(knob, EventKind::DragMove, |_, app| {
        app.knob_moves += 1;
        Outcome::Continue
    });
    for (node, label) in [(sprite, "sprite"), (panel, "panel")] {
        listeners.on(node, EventKind::Press, move |_, app| {
            app.log.push(format!("pressed {label}"));
            Outcome::Stop
        });
    }
    // Anything that bubbles up to a layer without being stopped.
    for layer in [controls, art] {
        listeners.on(layer, EventKind::Press, |e, app| {
            app.log.push(format!("layer saw press on {:?}", e.node));
            Outcome::Continue
        });
    }

    let script = [
        // Double click on the button.
        RawEvent::pointer_move(0, (40.0, 30.0)),
        RawEvent::pointer_down(10, (40.0, 30.0)),
        RawEvent::pointer_up(60, (40.0, 30.0)),
        RawEvent::pointer_down(150, (40.0, 30.0)),
        RawEvent::pointer_up(200, (40.0, 30.0)),
        // Drag the knob far right, then past its left bound.
        RawEvent::pointer_down(1_000, (25.0, 110.0)),
        RawEvent::pointer_move(1_020, (120.0, 160.0)),
        RawEvent::pointer_move(1_040, (400.0, 110.0)),
        RawEvent::pointer_move(1_060, (-50.0, 110.0)),
        RawEvent::pointer_up(1_080, (-50.0, 110.0)),
        // Sprite center, then a transparent corner over the panel.
        RawEvent::pointer_down(2_000, (228.0, 28.0)),
        RawEvent::pointer_up(2_010, (228.0, 28.0)),
        RawEvent::pointer_down(2_100, (221.0, 21.0)),
        RawEvent::pointer_up(2_110, (221.0, 21.0)),
        RawEvent::pointer_leave(3_000),
    ];

    let mut stage = Stage::new(StageConfig::default())?;
    let mut app = App::default();
    for raw in &script {
        let events = stage.handle(&mut scene, raw);
        for e in &events {
            tracing::info!(time = e.time, node = ?e.node, "{}", e.name());
        }
        listeners.emit_bubbling(&events, &mut app, |n| scene.parent_of(n));
        let repaint = scene.take_repaint();
        if !repaint.is_empty() {
            tracing::info!(layers = repaint.layers.len(), all = repaint.all, "repaint");
        }
    }

    println!("clicks: {}, double clicks: {}", app.clicks, app.double_clicks);
    println!(
        "knob moved {} times, now at {:?}",
        app.knob_moves,
        scene.absolute_position(knob)
    );
    for line in &app.log {
        println!("{line}");
    }
    Ok(())
}
