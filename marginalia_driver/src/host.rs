// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document boundary: capability traits the driver consumes.
//!
//! ## Overview
//!
//! The driver never scans a document, renders markup, or binds raw input
//! events. Those concerns live behind [`DocumentHost`], a minimal capability
//! surface an embedding implements over its real document (or over an
//! in-memory model, for tests and demos).
//!
//! Node references are small copyable keys owned by the host; the driver
//! only threads them back into host calls and tracks which popover node each
//! entity currently owns.
//!
//! [`RouterBinding`] is the matching teardown half of the event-router
//! collaborator: whatever the embedding bound at setup, the instance unbinds
//! exactly once on destroy, so several instances on one page never interfere.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size};
use marginalia_placement::layout::HorizontalLayout;
use marginalia_placement::scroll::ScrollMetrics;

use crate::entity::StateClass;
use crate::settings::Settings;

/// A trigger discovered by the host during setup.
#[derive(Clone, Debug)]
pub struct TriggerBinding<N> {
    /// Stable identifier carried by the trigger element.
    pub id: String,
    /// The trigger node.
    pub trigger: N,
}

/// Measured popover geometry consumed by the placement engine.
///
/// `max_height` and `max_width` are the author-specified dimensions captured
/// when the popover was materialized (the original records them as element
/// attributes); the rest is live layout measurement.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PopoverMetrics {
    /// Current rendered height of the popover, margins excluded.
    pub rendered_height: f64,
    /// Vertical margin of the popover (one side).
    pub vertical_margin: f64,
    /// Author max height for the content.
    pub max_height: f64,
    /// Author max width; values `<= 1` are viewport fractions.
    pub max_width: f64,
    /// Natural width of the content.
    pub content_width: f64,
    /// Natural scrollable height of the content.
    pub content_scroll_height: f64,
}

/// Capability surface the driver needs from the hosting document.
///
/// Every method is infallible except [`DocumentHost::materialize`], whose
/// `None` is the collaborator-failure case: the driver treats it as
/// not-found and leaves the entity idle.
pub trait DocumentHost {
    /// Copyable reference to a trigger or popover element.
    type Node: Copy + Eq + core::fmt::Debug;

    /// Enumerate the trigger elements this instance will manage.
    ///
    /// Called once at construction. Selection and markup parsing are the
    /// host's concern; the collaborator-facing [`Settings`] keys tell it
    /// what to look for.
    fn setup(&mut self, settings: &Settings) -> Vec<TriggerBinding<Self::Node>>;

    /// Render the popover for `id` next to its trigger and return it.
    fn materialize(&mut self, id: &str, trigger: Self::Node) -> Option<Self::Node>;

    /// Physically remove a previously materialized popover.
    fn release(&mut self, popover: Self::Node);

    /// Set or clear one boundary-contract state class on an element.
    fn set_class(&mut self, node: Self::Node, class: StateClass, on: bool);

    /// The trigger's rectangle in viewport coordinates.
    fn trigger_rect(&self, trigger: Self::Node) -> Rect;

    /// The trigger's left margin, part of the horizontal offset formula.
    fn trigger_margin_left(&self, trigger: Self::Node) -> f64;

    /// Current viewport size.
    fn viewport(&self) -> Size;

    /// Measured popover geometry for the placement engine.
    fn metrics(&self, popover: Self::Node) -> PopoverMetrics;

    /// Live scroll geometry of the popover's content region.
    fn scroll_metrics(&self, popover: Self::Node) -> ScrollMetrics;

    /// Apply the clamped content max height from the vertical pass.
    fn set_content_max_height(&mut self, popover: Self::Node, height: f64);

    /// Apply width, offset, and indicator position from the horizontal pass.
    fn apply_horizontal(&mut self, popover: Self::Node, layout: &HorizontalLayout);

    /// Clamp the content's scroll offset (wheel interception hit a bound).
    fn set_scroll_top(&mut self, popover: Self::Node, value: f64);
}

/// Teardown handle for an instance's event-router binding.
///
/// Implementations unbind whatever document-level listeners the embedding
/// registered for this instance. [`unbind`](RouterBinding::unbind) is called
/// at most once.
pub trait RouterBinding {
    /// Remove this instance's listeners from the document.
    fn unbind(&mut self);
}

/// A binding for embeddings that route events by hand (tests, demos).
#[derive(Copy, Clone, Debug, Default)]
pub struct NoRouter;

impl RouterBinding for NoRouter {
    fn unbind(&mut self) {}
}
