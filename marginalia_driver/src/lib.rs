// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=marginalia_driver --heading-base-level=0

//! Marginalia Driver: deterministic footnote-popover orchestration.
//!
//! ## Overview
//!
//! This crate coordinates the show/hide lifecycle of footnote popovers: which
//! popover is on screen, the delayed phase transitions that get it there and
//! away again, hover intent, mutual exclusion, and the fan-out of placement
//! passes when the viewport moves.
//! Geometry itself lives in [`marginalia_placement`]; this crate decides
//! *when* to run it and pushes the results, along with the boundary-contract
//! state classes, through the host document.
//!
//! ## Inputs
//!
//! The embedding implements [`DocumentHost`](crate::host::DocumentHost) over
//! its real document: enumerate triggers, render and remove popovers, apply
//! classes and measured geometry.
//! Raw input binding stays outside; an external router resolves document
//! events to [`InputEvent`](crate::driver::InputEvent) values and feeds them
//! to [`Driver::handle_event`](crate::driver::Driver::handle_event).
//!
//! ## Determinism
//!
//! There is no wall clock and no hidden timer queue.
//! Delays live in a [`Scheduler`](crate::schedule::Scheduler) keyed by a
//! virtual millisecond clock the embedding pumps through
//! [`Driver::advance`](crate::driver::Driver::advance); rate limiting is an
//! explicit [`FrameThrottle`](crate::schedule::FrameThrottle) over the same
//! clock.
//! Tests advance time explicitly and observe exactly which transitions fire,
//! in which order.
//!
//! ## Lifecycle
//!
//! Per entity: `Idle → Entering → Active → Leaving → Idle`, with the two
//! timer edges scheduled rather than immediate. A transition requested while
//! one is in flight is dropped, never queued; pending task handles are stored
//! on the entity and canceled on teardown, so no stale activation can fire
//! against a released popover.
//!
//! ## Minimal example
//!
//! ```no_run
//! use marginalia_driver::driver::{Driver, InputEvent};
//! use marginalia_driver::host::DocumentHost;
//! use marginalia_driver::settings::Settings;
//!
//! fn run<H: DocumentHost>(host: H) {
//!     let mut driver = Driver::new(host, Settings::default());
//!     driver.handle_event(InputEvent::TriggerPointer { id: "1" });
//!     driver.advance(100); // the popover for "1" is now active
//! }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod driver;
pub mod entity;
pub mod host;
pub mod schedule;
pub mod settings;
