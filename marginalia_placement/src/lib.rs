// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=marginalia_placement --heading-base-level=0

//! Marginalia Placement: viewport-aware popover placement math.
//!
//! ## Overview
//!
//! This crate computes where a popover anchored to an inline trigger must sit
//! so that it never overflows the viewport: the vertical side (above or below
//! the trigger), the clamped content height for the chosen side, the popover
//! width and horizontal offset, and whether the content overflows enough to
//! need internal scrolling.
//! It also contains the wheel-bounds arithmetic that keeps a scroll gesture
//! inside overflowing popover content instead of leaking into the page.
//!
//! Everything here is a pure function of measured geometry.
//! The crate holds no state, performs no scheduling, and never touches a
//! document; feed it a trigger rectangle, the viewport size, and popover
//! metrics, and it returns a decision for a driver to apply.
//!
//! ## Inputs
//!
//! - [`room_for`](crate::room::room_for) condenses a trigger rectangle and the
//!   viewport into [`Room`](crate::room::Room): the vertical pixel room on
//!   each side of the trigger and the trigger's horizontal center as a
//!   fraction of the viewport width.
//! - [`vertical_layout`](crate::layout::vertical_layout) picks the side and
//!   clamps the content height. Side selection is hysteretic: callers pass the
//!   previously applied [`Side`](crate::layout::Side) and only restyle when
//!   the decision actually changes.
//! - [`horizontal_layout`](crate::layout::horizontal_layout) clamps the width
//!   and derives the left offset that centers the popover over its trigger.
//!   It is meant to run on resize-class triggers only; plain repositions get
//!   by with the vertical pass.
//! - [`intercept`](crate::scroll::intercept) classifies one wheel step against
//!   the content's scroll bounds and says whether the step must be clamped and
//!   suppressed.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use marginalia_placement::layout::{Side, VerticalInputs, vertical_layout};
//! use marginalia_placement::room::room_for;
//!
//! // A trigger close to the bottom edge of an 800x600 viewport.
//! let room = room_for(Rect::new(390.0, 560.0, 410.0, 575.0), Size::new(800.0, 600.0));
//! let layout = vertical_layout(&VerticalInputs {
//!     room,
//!     rendered_height: 120.0,
//!     margin: 10.0,
//!     max_height: 10_000.0,
//!     edge_gap: 15.0,
//! });
//! assert_eq!(layout.side, Side::Top);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod layout;
pub mod room;
pub mod scroll;
