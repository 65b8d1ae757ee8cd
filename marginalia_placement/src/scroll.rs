// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel-bounds arithmetic for overflowing popover content.
//!
//! ## Overview
//!
//! When popover content scrolls internally, a wheel gesture that reaches the
//! content's bounds must not leak into the page: the step that would travel
//! past the bottom (or top) is clamped to the bound and consumed. Everything
//! in between passes through untouched.
//!
//! [`intercept`] classifies a single normalized wheel step against the
//! content's scroll metrics. The caller applies the returned clamp (if any),
//! records the new [`ScrollState`], and suppresses the event's default action
//! when told to.
//!
//! Sign convention: positive `delta` scrolls toward the top of the content,
//! negative toward the bottom (the wheel handler's `-deltaY`).

/// Position of popover content relative to its scroll bounds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ScrollState {
    /// Content rests at its top bound (initial position).
    #[default]
    AtBounds,
    /// Content has been scrolled somewhere between its bounds.
    Scrolled,
    /// Content has been scrolled to its bottom bound.
    FullyScrolled,
}

/// Measured scroll geometry of a popover's content region.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top.
    pub scroll_top: f64,
    /// Visible height of the content region.
    pub client_height: f64,
    /// Total scrollable height of the content.
    pub scroll_height: f64,
}

impl ScrollMetrics {
    /// Scrollable distance left below the current position.
    pub fn remaining(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Verdict for one wheel step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WheelOutcome {
    /// Offset the content must be clamped to, when the step hit a bound.
    pub clamp_to: Option<f64>,
    /// Scroll state after the step is applied.
    pub state: ScrollState,
    /// Whether the event's default action and propagation must be suppressed.
    pub suppress: bool,
}

/// Classify one wheel step of `delta` pixels against `metrics`.
///
/// A downward step at least as large as the remaining scrollable distance
/// clamps to the bottom bound and is consumed. An upward step larger than the
/// current offset clamps to the top bound and is consumed. Any upward step
/// clears [`ScrollState::FullyScrolled`]. Steps that stay inside the bounds
/// pass through with no clamp and no suppression.
pub fn intercept(delta: f64, metrics: &ScrollMetrics) -> WheelOutcome {
    if delta <= 0.0 && -delta >= metrics.remaining() {
        return WheelOutcome {
            clamp_to: Some(metrics.max_scroll_top()),
            state: ScrollState::FullyScrolled,
            suppress: true,
        };
    }
    if delta > 0.0 && metrics.scroll_top < delta {
        return WheelOutcome {
            clamp_to: Some(0.0),
            state: ScrollState::AtBounds,
            suppress: true,
        };
    }
    let predicted = metrics.scroll_top - delta;
    WheelOutcome {
        clamp_to: None,
        state: if predicted <= 0.0 {
            ScrollState::AtBounds
        } else {
            ScrollState::Scrolled
        },
        suppress: false,
    }
}
