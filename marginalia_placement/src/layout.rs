// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side selection and size clamping.
//!
//! ## Overview
//!
//! The vertical pass decides whether a popover opens above or below its
//! trigger and clamps the content height to the room on the chosen side.
//! The horizontal pass clamps the popover width and derives the offset that
//! keeps the popover visually centered over the trigger regardless of where
//! the trigger sits in the line.
//!
//! Vertical runs on every reposition trigger (scrolling moves the trigger
//! relative to the viewport); horizontal only on resize-class triggers, since
//! width and offset depend on the viewport width alone.
//!
//! ## Side selection
//!
//! A popover prefers to open below its trigger. It flips above only when the
//! room below cannot fit the rendered popover *and* there is more room above
//! than below. Callers keep the previously applied [`Side`] and restyle only
//! on an actual change, so sub-pixel room oscillation near the flip point
//! never causes visual flicker.

use crate::room::Room;

/// Largest viewport width considered when resolving fractional max widths.
///
/// Mirrors the clamp the side decision inherits from the observed behavior;
/// viewports wider than this are treated as this wide.
pub const VIEWPORT_WIDTH_CEILING: f64 = 10_000.0;

/// Vertical side of the trigger a popover opens toward.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// The popover opens above the trigger.
    Top,
    /// The popover opens below the trigger.
    Bottom,
}

/// Inputs to [`vertical_layout`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VerticalInputs {
    /// Room around the trigger, from [`room_for`](crate::room::room_for).
    pub room: Room,
    /// The popover's current rendered height, margins excluded.
    pub rendered_height: f64,
    /// The popover's vertical margin (one side; it is counted once per side).
    pub margin: f64,
    /// Author-specified max content height, captured when the popover was
    /// materialized.
    pub max_height: f64,
    /// Buffer kept between the popover edge and the viewport edge.
    pub edge_gap: f64,
}

/// Result of the vertical pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VerticalLayout {
    /// Chosen side.
    pub side: Side,
    /// Clamped max height for the popover content on that side.
    pub content_max_height: f64,
}

/// Total vertical footprint of the popover: rendered height plus both margins.
pub fn required_height(rendered_height: f64, margin: f64) -> f64 {
    rendered_height + 2.0 * margin
}

/// Decide the vertical side and clamp the content height.
///
/// The side flips to [`Side::Top`] only when the room below cannot fit
/// [`required_height`] and the room above beats the room below; in every
/// other case the popover stays below. The content max height is the room on
/// the chosen side minus the margin and edge gap, never exceeding the author
/// maximum.
pub fn vertical_layout(inputs: &VerticalInputs) -> VerticalLayout {
    let required = required_height(inputs.rendered_height, inputs.margin);
    let side = if inputs.room.below < required && inputs.room.above > inputs.room.below {
        Side::Top
    } else {
        Side::Bottom
    };
    let on_side = match side {
        Side::Top => inputs.room.above,
        Side::Bottom => inputs.room.below,
    };
    VerticalLayout {
        side,
        content_max_height: (on_side - inputs.margin - inputs.edge_gap).min(inputs.max_height),
    }
}

/// Inputs to [`horizontal_layout`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HorizontalInputs {
    /// Room around the trigger, from [`room_for`](crate::room::room_for).
    pub room: Room,
    /// Current viewport width.
    pub viewport_width: f64,
    /// Author-specified max width. Values `<= 1` are fractions of the
    /// viewport width (capped at [`VIEWPORT_WIDTH_CEILING`]).
    pub max_width: f64,
    /// Natural width of the popover content.
    pub content_width: f64,
    /// Width of the trigger element.
    pub trigger_width: f64,
    /// Left margin of the trigger element.
    pub trigger_margin_left: f64,
}

/// Result of the horizontal pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HorizontalLayout {
    /// Offset of the popover's left edge relative to the trigger.
    pub offset: f64,
    /// Clamped popover width.
    pub max_width: f64,
    /// Fractional position for an internal pointer/tooltip indicator.
    pub indicator_fraction: f64,
}

/// Clamp the popover width and compute its horizontal offset.
///
/// The offset shifts the popover left in proportion to how far along the
/// viewport the trigger sits, so a trigger near the right edge gets a popover
/// hanging mostly to its left. The indicator fraction places the pointer back
/// over the trigger.
pub fn horizontal_layout(inputs: &HorizontalInputs) -> HorizontalLayout {
    let mut max_width = inputs.max_width;
    if max_width <= 1.0 {
        max_width *= inputs.viewport_width.min(VIEWPORT_WIDTH_CEILING);
    }
    // Content wider than the author allowance is cut off; content narrower
    // shrinks the popover to fit (plus one pixel against rounding).
    max_width = max_width.min(inputs.content_width + 1.0);
    HorizontalLayout {
        offset: -inputs.room.left_fraction * max_width
            + inputs.trigger_margin_left
            + inputs.trigger_width / 2.0,
        max_width,
        indicator_fraction: inputs.room.left_fraction,
    }
}

/// Whether the popover content overflows its rendered box and needs internal
/// scrolling.
pub fn is_scrollable(rendered_height: f64, content_scroll_height: f64) -> bool {
    rendered_height < content_scroll_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::room_for;
    use kurbo::{Rect, Size};

    fn inputs(room: Room) -> VerticalInputs {
        VerticalInputs {
            room,
            rendered_height: 120.0,
            margin: 10.0,
            max_height: 10_000.0,
            edge_gap: 15.0,
        }
    }

    // Trigger near the bottom edge of an 800x600 viewport opens above.
    #[test]
    fn cramped_bottom_opens_top() {
        let room = room_for(Rect::new(390.0, 560.0, 410.0, 575.0), Size::new(800.0, 600.0));
        let layout = vertical_layout(&inputs(room));
        assert_eq!(layout.side, Side::Top);
        // 560 above - 10 margin - 15 gap
        assert_eq!(layout.content_max_height, 535.0);
    }

    // Same trigger scrolled near the top edge opens below again.
    #[test]
    fn roomy_bottom_opens_bottom() {
        let room = room_for(Rect::new(390.0, 20.0, 410.0, 35.0), Size::new(800.0, 600.0));
        let layout = vertical_layout(&inputs(room));
        assert_eq!(layout.side, Side::Bottom);
        assert_eq!(layout.content_max_height, 540.0);
    }

    // Cramped on both sides: stays below unless above is strictly roomier.
    #[test]
    fn equal_room_prefers_bottom() {
        let layout = vertical_layout(&inputs(Room {
            above: 60.0,
            below: 60.0,
            left_fraction: 0.5,
        }));
        assert_eq!(layout.side, Side::Bottom);
    }

    #[test]
    fn author_max_height_caps_the_clamp() {
        let mut i = inputs(Room {
            above: 10.0,
            below: 500.0,
            left_fraction: 0.5,
        });
        i.max_height = 200.0;
        let layout = vertical_layout(&i);
        assert_eq!(layout.side, Side::Bottom);
        assert_eq!(layout.content_max_height, 200.0);
    }

    #[test]
    fn required_height_counts_both_margins() {
        assert_eq!(required_height(120.0, 10.0), 140.0);
    }

    #[test]
    fn fractional_max_width_scales_with_viewport() {
        let layout = horizontal_layout(&HorizontalInputs {
            room: Room {
                above: 0.0,
                below: 0.0,
                left_fraction: 0.5,
            },
            viewport_width: 800.0,
            max_width: 0.5,
            content_width: 10_000.0,
            trigger_width: 20.0,
            trigger_margin_left: 0.0,
        });
        assert_eq!(layout.max_width, 400.0);
        assert_eq!(layout.offset, -0.5 * 400.0 + 10.0);
        assert_eq!(layout.indicator_fraction, 0.5);
    }

    #[test]
    fn narrow_content_shrinks_the_popover() {
        let layout = horizontal_layout(&HorizontalInputs {
            room: Room {
                above: 0.0,
                below: 0.0,
                left_fraction: 0.25,
            },
            viewport_width: 800.0,
            max_width: 600.0,
            content_width: 180.0,
            trigger_width: 16.0,
            trigger_margin_left: 2.0,
        });
        assert_eq!(layout.max_width, 181.0);
        assert_eq!(layout.offset, -0.25 * 181.0 + 2.0 + 8.0);
    }

    #[test]
    fn absolute_max_width_passes_through() {
        let layout = horizontal_layout(&HorizontalInputs {
            room: Room {
                above: 0.0,
                below: 0.0,
                left_fraction: 0.9,
            },
            viewport_width: 30_000.0,
            max_width: 500.0,
            content_width: 499.0,
            trigger_width: 10.0,
            trigger_margin_left: 0.0,
        });
        assert_eq!(layout.max_width, 500.0);
    }

    #[test]
    fn scrollability_is_strict_overflow() {
        assert!(is_scrollable(200.0, 500.0));
        assert!(!is_scrollable(200.0, 200.0));
        assert!(!is_scrollable(200.0, 150.0));
    }
}
