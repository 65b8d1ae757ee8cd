// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The orchestration driver: activation state machine, hover intent, and
//! bulk operations.
//!
//! ## Overview
//!
//! [`Driver`] owns the registry of [`Entity`] records, the [`Scheduler`]
//! carrying deferred phase transitions, and the mutual-exclusion policy from
//! [`Settings`]. Every operation resolves an entity by id, mutates its state,
//! and pushes the resulting geometry and class tokens through the
//! [`DocumentHost`].
//!
//! ## State machine
//!
//! Per entity: `Idle --activate--> Entering --timer--> Active --dismiss-->
//! Leaving --timer--> Idle`. A transition requested while one is in flight is
//! silently dropped, never queued. Timer edges are scheduler tasks whose
//! handles live on the entity, so teardown cancels them outright; a stale
//! activation can never fire against a released popover.
//!
//! ## Event routing
//!
//! [`Driver::handle_event`] implements the document-level routing table over
//! already-resolved ids: pointer on a trigger toggles, pointer outside or the
//! cancel key dismisses everything, viewport scroll and resize fan out
//! rate-limited placement passes, hover enter/leave drive the hover-intent
//! timers, and wheel steps over popover content go through the scroll guard.
//! The returned [`EventOutcome`] tells the embedding whether to suppress the
//! event's default action.
//!
//! ## Time
//!
//! The driver never reads a wall clock. The embedding pumps
//! [`Driver::advance`] with its monotonic millisecond time; due tasks fire in
//! `(due, schedule order)` and operations schedule relative to the most
//! recent tick.

use alloc::vec::Vec;

use marginalia_placement::layout::{
    HorizontalInputs, Side, VerticalInputs, horizontal_layout, is_scrollable, vertical_layout,
};
use marginalia_placement::room::room_for;
use marginalia_placement::scroll::{ScrollState, intercept};

use crate::entity::{Activity, Entity, StateClass};
use crate::host::{DocumentHost, RouterBinding, TriggerBinding};
use crate::schedule::{FrameThrottle, Scheduler, TaskHandle};
use crate::settings::{Settings, SettingsError, Value};

/// Hook invoked when an entity completes entering `Active`.
///
/// Receives the popover and trigger nodes. Absent by default; set with
/// [`Driver::with_activate_callback`].
pub type ActivateCallback<N> = fn(popover: N, trigger: N);

/// Scheduler payloads: deferred phase edges and trailing throttle runs.
#[derive(Copy, Clone, Debug)]
enum Task {
    /// `Entering → Active` for the entity at this registry index.
    Ready(usize),
    /// `Leaving → Idle` (physical removal) for the entity at this index.
    Remove(usize),
    /// The deferred unhover check over the whole registry.
    HoverCheck,
    /// Trailing reposition after a throttled scroll burst.
    Reposition,
    /// Trailing resize after a throttled resize burst.
    Resize,
}

/// A document-level event, resolved to entity ids by the external router.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent<'a> {
    /// Pointer or touch activation on a trigger element.
    TriggerPointer {
        /// Footnote id carried by the trigger.
        id: &'a str,
    },
    /// Pointer or touch outside any trigger or popover.
    OutsidePointer,
    /// The designated cancel key.
    CancelKey,
    /// The viewport scrolled.
    ViewportScrolled,
    /// The viewport was resized.
    ViewportResized,
    /// Hover entered a trigger or popover region.
    HoverEnter {
        /// Footnote id of the hovered region.
        id: &'a str,
    },
    /// Hover left a trigger or popover region.
    HoverLeave {
        /// Footnote id of the region left.
        id: &'a str,
    },
    /// A wheel step over popover content.
    Wheel {
        /// Footnote id owning the content.
        id: &'a str,
        /// Normalized scroll amount; positive is toward the top.
        delta: f64,
    },
}

/// What the embedding must do with the routed event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EventOutcome {
    /// Not handled here; let the event proceed natively.
    Pass,
    /// Handled; the default action may still proceed.
    Handled,
    /// Handled; suppress the default action and further propagation.
    HandledAndSuppress,
}

/// Orchestrates the popover registry against a [`DocumentHost`].
pub struct Driver<H: DocumentHost> {
    host: H,
    settings: Settings,
    entities: Vec<Entity<H::Node>>,
    scheduler: Scheduler<Task>,
    now: u64,
    hover_check: Option<TaskHandle>,
    reposition_gate: FrameThrottle,
    resize_gate: FrameThrottle,
    wheel_gate: FrameThrottle,
    trailing_reposition: Option<TaskHandle>,
    trailing_resize: Option<TaskHandle>,
    on_activate: Option<ActivateCallback<H::Node>>,
}

impl<H: DocumentHost> core::fmt::Debug for Driver<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Driver")
            .field("entities", &self.entities.len())
            .field("now", &self.now)
            .field("pending_tasks", &self.scheduler.len())
            .finish_non_exhaustive()
    }
}

impl<H: DocumentHost> Driver<H> {
    /// Build a driver over `host`, enumerating its triggers once.
    pub fn new(mut host: H, settings: Settings) -> Self {
        let entities = host
            .setup(&settings)
            .into_iter()
            .map(|TriggerBinding { id, trigger }| Entity::new(id, trigger))
            .collect();
        Self {
            host,
            settings,
            entities,
            scheduler: Scheduler::new(),
            now: 0,
            hover_check: None,
            reposition_gate: FrameThrottle::new(FrameThrottle::FRAME_MS),
            resize_gate: FrameThrottle::new(FrameThrottle::FRAME_MS),
            wheel_gate: FrameThrottle::new(FrameThrottle::FRAME_MS),
            trailing_reposition: None,
            trailing_resize: None,
            on_activate: None,
        }
    }

    /// Install the optional activation hook.
    pub fn with_activate_callback(mut self, callback: ActivateCallback<H::Node>) -> Self {
        self.on_activate = Some(callback);
        self
    }

    /// Current configuration.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a partial configuration update through the entry parser.
    pub fn update_settings<'a, I>(&mut self, entries: I) -> Result<(), SettingsError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        self.settings.apply(entries)
    }

    /// The most recent clock tick, in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Borrow the host document.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the host document.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Look up an entity by id.
    pub fn entity(&self, id: &str) -> Option<&Entity<H::Node>> {
        self.find(id).map(|idx| &self.entities[idx])
    }

    /// Iterate the registry in its deterministic order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity<H::Node>> {
        self.entities.iter()
    }

    /// Whether the entity with `id` is fully active.
    pub fn is_active(&self, id: &str) -> bool {
        self.entity(id)
            .is_some_and(|e| e.activity() == Activity::Active)
    }

    /// Whether the entity with `id` has a phase transition in flight.
    pub fn is_changing(&self, id: &str) -> bool {
        self.entity(id).is_some_and(Entity::is_changing)
    }

    /// Whether the entity with `id` registers hover.
    pub fn is_hovered(&self, id: &str) -> bool {
        self.entity(id).is_some_and(Entity::is_hovered)
    }

    /// Advance the virtual clock and run every task that came due.
    ///
    /// Tasks scheduled by other firing tasks (a zero-delay dismissal out of
    /// the hover check, say) run within the same call once due.
    pub fn advance(&mut self, now: u64) {
        if now > self.now {
            self.now = now;
        }
        loop {
            let due = self.scheduler.due(self.now);
            if due.is_empty() {
                break;
            }
            for (_, task) in due {
                self.run_task(task);
            }
        }
    }

    /// Route one resolved document event.
    pub fn handle_event(&mut self, event: InputEvent<'_>) -> EventOutcome {
        match event {
            InputEvent::TriggerPointer { id } => match self.find(id) {
                Some(idx) => {
                    self.toggle_at(idx);
                    EventOutcome::Handled
                }
                None => EventOutcome::Pass,
            },
            InputEvent::OutsidePointer | InputEvent::CancelKey => {
                self.dismiss_all();
                EventOutcome::Handled
            }
            InputEvent::ViewportScrolled => {
                if self.reposition_gate.admit(self.now) {
                    self.reposition_all();
                } else if self.trailing_reposition.is_none() {
                    self.trailing_reposition = Some(
                        self.scheduler
                            .schedule(self.reposition_gate.reopens_at(), Task::Reposition),
                    );
                }
                EventOutcome::Handled
            }
            InputEvent::ViewportResized => {
                if self.resize_gate.admit(self.now) {
                    self.resize_all();
                } else if self.trailing_resize.is_none() {
                    self.trailing_resize = Some(
                        self.scheduler
                            .schedule(self.resize_gate.reopens_at(), Task::Resize),
                    );
                }
                EventOutcome::Handled
            }
            InputEvent::HoverEnter { id } => {
                if let Some(idx) = self.find(id) {
                    self.hover_at(idx, self.settings.hover_delay);
                    EventOutcome::Handled
                } else {
                    EventOutcome::Pass
                }
            }
            InputEvent::HoverLeave { id } => {
                if let Some(idx) = self.find(id) {
                    self.unhover_at(idx, self.settings.hover_delay);
                    EventOutcome::Handled
                } else {
                    EventOutcome::Pass
                }
            }
            InputEvent::Wheel { id, delta } => self.wheel(id, delta),
        }
    }

    /// Activate the entity with `id` after the configured delay.
    pub fn activate(&mut self, id: &str) {
        self.activate_with_delay(id, self.settings.activate_delay);
    }

    /// Activate the entity with `id` after `delay` milliseconds.
    pub fn activate_with_delay(&mut self, id: &str, delay: u64) {
        if let Some(idx) = self.find(id) {
            self.activate_at(idx, delay);
        }
    }

    /// Dismiss the entity with `id` after the configured delay.
    pub fn dismiss(&mut self, id: &str) {
        self.dismiss_with_delay(id, self.settings.dismiss_delay);
    }

    /// Dismiss the entity with `id` after `delay` milliseconds.
    pub fn dismiss_with_delay(&mut self, id: &str, delay: u64) {
        if let Some(idx) = self.find(id) {
            self.dismiss_at(idx, delay);
        }
    }

    /// Toggle the entity with `id`: dismiss when active, activate otherwise
    /// (dismissing all others first unless multiples are allowed).
    pub fn toggle(&mut self, id: &str) {
        if let Some(idx) = self.find(id) {
            self.toggle_at(idx);
        }
    }

    /// Record hover on the entity with `id`, activating it when configured.
    pub fn hover(&mut self, id: &str) {
        if let Some(idx) = self.find(id) {
            self.hover_at(idx, self.settings.hover_delay);
        }
    }

    /// Record the end of hover on the entity with `id`, scheduling the
    /// deferred dismiss-all check when configured.
    pub fn unhover(&mut self, id: &str) {
        if let Some(idx) = self.find(id) {
            self.unhover_at(idx, self.settings.hover_delay);
        }
    }

    /// Dismiss every entity after the configured delay.
    pub fn dismiss_all(&mut self) {
        self.dismiss_all_with_delay(self.settings.dismiss_delay);
    }

    /// Dismiss every entity after `delay` milliseconds, in registry order.
    pub fn dismiss_all_with_delay(&mut self, delay: u64) {
        for idx in 0..self.entities.len() {
            self.dismiss_at(idx, delay);
        }
    }

    /// Run the vertical placement pass over every materialized popover.
    pub fn reposition_all(&mut self) {
        for idx in 0..self.entities.len() {
            self.place(idx, false);
        }
    }

    /// Run the full placement pass (vertical and horizontal) over every
    /// materialized popover.
    pub fn resize_all(&mut self) {
        for idx in 0..self.entities.len() {
            self.place(idx, true);
        }
    }

    /// Cancel all pending transitions, release every owned popover, and
    /// clear the registry.
    pub fn teardown(&mut self) {
        self.scheduler.clear();
        self.hover_check = None;
        self.trailing_reposition = None;
        self.trailing_resize = None;
        for idx in 0..self.entities.len() {
            let entity = &mut self.entities[idx];
            entity.pending = None;
            let trigger = entity.trigger;
            let popover = entity.popover.take();
            if let Some(popover) = popover {
                self.host.release(popover);
            }
            self.host.set_class(trigger, StateClass::Active, false);
            self.host.set_class(trigger, StateClass::Changing, false);
            self.host.set_class(trigger, StateClass::Hovered, false);
        }
        self.entities.clear();
    }

    // --- internals ---

    fn find(&self, id: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Ready(idx) => self.ready(idx),
            Task::Remove(idx) => self.remove(idx),
            Task::HoverCheck => self.run_hover_check(),
            Task::Reposition => {
                self.trailing_reposition = None;
                self.reposition_gate.admit(self.now);
                self.reposition_all();
            }
            Task::Resize => {
                self.trailing_resize = None;
                self.resize_gate.admit(self.now);
                self.resize_all();
            }
        }
    }

    fn activate_at(&mut self, idx: usize, delay: u64) {
        let entity = &self.entities[idx];
        if entity.is_changing() || entity.activity == Activity::Active {
            return;
        }
        let trigger = entity.trigger;
        let Some(popover) = self.host.materialize(&self.entities[idx].id, trigger) else {
            return;
        };
        let entity = &mut self.entities[idx];
        entity.popover = Some(popover);
        entity.activity = Activity::Entering;
        self.host.set_class(trigger, StateClass::Active, true);
        self.host.set_class(trigger, StateClass::Changing, true);
        self.place(idx, true);
        let handle = self.scheduler.schedule(self.now + delay, Task::Ready(idx));
        self.entities[idx].pending = Some(handle);
    }

    fn ready(&mut self, idx: usize) {
        let entity = &mut self.entities[idx];
        entity.pending = None;
        entity.activity = Activity::Active;
        let trigger = entity.trigger;
        let popover = entity.popover;
        self.host.set_class(trigger, StateClass::Changing, false);
        if let Some(popover) = popover {
            self.host.set_class(popover, StateClass::Active, true);
            if let Some(callback) = self.on_activate {
                callback(popover, trigger);
            }
        }
    }

    fn dismiss_at(&mut self, idx: usize, delay: u64) {
        let entity = &self.entities[idx];
        if entity.is_changing() || entity.activity != Activity::Active {
            return;
        }
        let trigger = entity.trigger;
        let popover = entity.popover;
        self.entities[idx].activity = Activity::Leaving;
        self.host.set_class(trigger, StateClass::Active, false);
        if let Some(popover) = popover {
            self.host.set_class(popover, StateClass::Active, false);
        }
        self.host.set_class(trigger, StateClass::Changing, true);
        let handle = self.scheduler.schedule(self.now + delay, Task::Remove(idx));
        self.entities[idx].pending = Some(handle);
    }

    fn remove(&mut self, idx: usize) {
        let entity = &mut self.entities[idx];
        entity.pending = None;
        entity.activity = Activity::Idle;
        entity.placement = None;
        entity.scroll = ScrollState::AtBounds;
        let trigger = entity.trigger;
        let popover = entity.popover.take();
        if let Some(popover) = popover {
            self.host.release(popover);
        }
        self.host.set_class(trigger, StateClass::Changing, false);
    }

    fn toggle_at(&mut self, idx: usize) {
        if self.entities[idx].activity == Activity::Active {
            self.dismiss_at(idx, self.settings.dismiss_delay);
        } else {
            if !self.settings.allow_multiple {
                self.dismiss_others(idx);
            }
            self.activate_at(idx, self.settings.activate_delay);
        }
    }

    fn dismiss_others(&mut self, idx: usize) {
        for other in 0..self.entities.len() {
            if other != idx {
                self.dismiss_at(other, self.settings.dismiss_delay);
            }
        }
    }

    fn hover_at(&mut self, idx: usize, delay: u64) {
        self.entities[idx].hovered = true;
        let trigger = self.entities[idx].trigger;
        self.host.set_class(trigger, StateClass::Hovered, true);
        if self.settings.activate_on_hover && self.entities[idx].activity != Activity::Active {
            if !self.settings.allow_multiple {
                self.dismiss_others(idx);
            }
            self.activate_at(idx, delay);
        }
    }

    fn unhover_at(&mut self, idx: usize, delay: u64) {
        self.entities[idx].hovered = false;
        let trigger = self.entities[idx].trigger;
        self.host.set_class(trigger, StateClass::Hovered, false);
        if self.settings.dismiss_on_unhover {
            // Re-issuing replaces the previous check instead of piling up.
            if let Some(handle) = self.hover_check.take() {
                self.scheduler.cancel(handle);
            }
            self.hover_check = Some(self.scheduler.schedule(self.now + delay, Task::HoverCheck));
        }
    }

    fn run_hover_check(&mut self) {
        self.hover_check = None;
        // Hover state is read at fire time; a hover during the delay window
        // keeps everything up.
        if self.entities.iter().any(|e| e.hovered) {
            return;
        }
        self.dismiss_all();
    }

    fn place(&mut self, idx: usize, with_horizontal: bool) {
        let Some(popover) = self.entities[idx].popover else {
            return;
        };
        let trigger = self.entities[idx].trigger;
        let trigger_rect = self.host.trigger_rect(trigger);
        let viewport = self.host.viewport();
        let room = room_for(trigger_rect, viewport);
        let metrics = self.host.metrics(popover);

        let vertical = vertical_layout(&VerticalInputs {
            room,
            rendered_height: metrics.rendered_height,
            margin: metrics.vertical_margin,
            max_height: metrics.max_height,
            edge_gap: self.settings.edge_gap,
        });
        if self.entities[idx].placement != Some(vertical.side) {
            self.entities[idx].placement = Some(vertical.side);
            self.host
                .set_class(popover, StateClass::PositionedTop, vertical.side == Side::Top);
            self.host.set_class(
                popover,
                StateClass::PositionedBottom,
                vertical.side == Side::Bottom,
            );
        }
        self.host
            .set_content_max_height(popover, vertical.content_max_height);

        if with_horizontal {
            let horizontal = horizontal_layout(&HorizontalInputs {
                room,
                viewport_width: viewport.width,
                max_width: metrics.max_width,
                content_width: metrics.content_width,
                trigger_width: trigger_rect.width(),
                trigger_margin_left: self.host.trigger_margin_left(trigger),
            });
            self.host.apply_horizontal(popover, &horizontal);
        }

        if is_scrollable(metrics.rendered_height, metrics.content_scroll_height) {
            self.host.set_class(popover, StateClass::Scrollable, true);
        }
    }

    fn wheel(&mut self, id: &str, delta: f64) -> EventOutcome {
        let Some(idx) = self.find(id) else {
            return EventOutcome::Pass;
        };
        if self.entities[idx].activity != Activity::Active {
            return EventOutcome::Pass;
        }
        let Some(popover) = self.entities[idx].popover else {
            return EventOutcome::Pass;
        };
        if !self.wheel_gate.admit(self.now) {
            return EventOutcome::Pass;
        }
        let metrics = self.host.scroll_metrics(popover);
        let outcome = intercept(delta, &metrics);
        if let Some(top) = outcome.clamp_to {
            self.host.set_scroll_top(popover, top);
        }
        let was = self.entities[idx].scroll;
        self.entities[idx].scroll = outcome.state;
        if outcome.state == ScrollState::FullyScrolled {
            self.host.set_class(popover, StateClass::FullyScrolled, true);
        } else if was == ScrollState::FullyScrolled {
            self.host.set_class(popover, StateClass::FullyScrolled, false);
        }
        if outcome.suppress {
            EventOutcome::HandledAndSuppress
        } else {
            EventOutcome::Pass
        }
    }
}

/// An assembled instance: a driver plus its event-router binding.
///
/// [`Instance::destroy`] is deterministic and total: it unbinds the router
/// exactly once, cancels every pending transition, and releases every owned
/// popover. Dropping the instance destroys it as well.
pub struct Instance<H: DocumentHost, B: RouterBinding> {
    driver: Driver<H>,
    binding: Option<B>,
}

impl<H: DocumentHost, B: RouterBinding> core::fmt::Debug for Instance<H, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance")
            .field("driver", &self.driver)
            .field("bound", &self.binding.is_some())
            .finish()
    }
}

impl<H: DocumentHost, B: RouterBinding> Instance<H, B> {
    /// Assemble a driver with the router binding the embedding registered.
    pub fn new(driver: Driver<H>, binding: B) -> Self {
        Self {
            driver,
            binding: Some(binding),
        }
    }

    /// Borrow the driver.
    pub fn driver(&self) -> &Driver<H> {
        &self.driver
    }

    /// Mutably borrow the driver.
    pub fn driver_mut(&mut self) -> &mut Driver<H> {
        &mut self.driver
    }

    /// Unbind the router and tear the driver down. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(mut binding) = self.binding.take() {
            binding.unbind();
        }
        self.driver.teardown();
    }
}

impl<H: DocumentHost, B: RouterBinding> Drop for Instance<H, B> {
    fn drop(&mut self) {
        self.destroy();
    }
}
