// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event State: small state machines for stateful pointer interactions.
//!
//! Each module tracks one interaction pattern across a stream of already
//! resolved input events. None of them knows about scenes, hit testing or
//! callbacks: they take node keys, positions and timestamps, and answer with
//! transitions the caller turns into notifications.
//!
//! - [`hover`]: which node the pointer is inside, with leave/enter transitions.
//! - [`click`]: per-key double-click windows that slide with every click.
//! - [`drag`]: one dragged node with grab offset, axis lock and bounds.
//! - [`throttle`]: drop move events that arrive faster than a given rate.
//! - [`timer`]: deadline queue used for window expiry.
//!
//! Time is always a `u64` count of milliseconds taken from the input events
//! themselves. Nothing in this crate reads a clock.
//!
//! ## Putting them together
//!
//! ```rust
//! # #[cfg(all(feature = "click", feature = "drag"))]
//! # fn example() {
//! use kurbo::Point;
//! use understory_event_state::click::GestureWindows;
//! use understory_event_state::drag::{DragOptions, DragSession};
//! use understory_event_state::hover::{HoverEvent, TargetTracker};
//! use understory_event_state::throttle::MoveThrottle;
//!
//! let mut hover = TargetTracker::new();
//! let mut windows = GestureWindows::new(400);
//! let mut drag = DragSession::new();
//! let mut throttle = MoveThrottle::new(Some(60.0));
//!
//! // Pointer moves onto node 3 and presses it.
//! assert!(throttle.admit(0));
//! assert_eq!(hover.enter(3_u32).as_slice(), &[HoverEvent::Enter(3)]);
//! drag.arm(3, Point::new(5.0, 5.0), Point::ZERO, DragOptions::default());
//!
//! // Released without moving: a click, and the window opens.
//! assert!(!drag.end().unwrap().moved);
//! assert!(!windows.take_pending(&3, 80));
//! windows.arm(3, 80);
//!
//! // A second click soon after is a double click.
//! assert!(windows.take_pending(&3, 200));
//! # }
//! ```
//!
//! ## Features
//!
//! - `click`: [`click::GestureWindows`] (pulls in `hashbrown`).
//! - `drag`: [`drag::DragSession`] (pulls in `kurbo`).
//! - `std` / `libm`: forwarded to `kurbo` for float math.
//!
//! This crate is `no_std` compatible (with `alloc`) for all modules.

#![no_std]

extern crate alloc;

#[cfg(feature = "click")]
pub mod click;

#[cfg(feature = "drag")]
pub mod drag;
pub mod hover;
pub mod throttle;
pub mod timer;
