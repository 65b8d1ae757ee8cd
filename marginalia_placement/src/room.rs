// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Available room around a trigger within the viewport.

use kurbo::{Rect, Size};

/// Vertical room on each side of a trigger, plus its horizontal position.
///
/// Produced by [`room_for`] and consumed by the
/// [`layout`](crate::layout) functions. Distances are in viewport pixels;
/// `left_fraction` is the trigger's horizontal center divided by the viewport
/// width, in `0.0..=1.0` for an on-screen trigger.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Room {
    /// Distance from the trigger's top edge to the viewport's top edge.
    pub above: f64,
    /// Distance from the trigger's bottom edge to the viewport's bottom edge.
    pub below: f64,
    /// Trigger center as a fraction of viewport width.
    pub left_fraction: f64,
}

/// Measure the room around `trigger` inside a viewport of size `viewport`.
///
/// The trigger rectangle is expected in viewport coordinates (the host's
/// bounding-rect convention). A trigger partially scrolled out of view yields
/// negative room on that side, which the side decision treats the same as
/// "no room".
pub fn room_for(trigger: Rect, viewport: Size) -> Room {
    let left_fraction = if viewport.width > 0.0 {
        trigger.center().x / viewport.width
    } else {
        0.5
    };
    Room {
        above: trigger.y0,
        below: viewport.height - trigger.y1,
        left_fraction,
    }
}
