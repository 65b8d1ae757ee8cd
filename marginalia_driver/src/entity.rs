// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity state: one trigger/popover pair, its lifecycle phase, and the
//! class tokens surfaced to the host.

use alloc::string::String;

use marginalia_placement::layout::Side;
use marginalia_placement::scroll::ScrollState;

use crate::schedule::TaskHandle;

/// Lifecycle phase of a popover, mirroring on-screen presence.
///
/// Transitions run `Idle → Entering → Active → Leaving → Idle`; the
/// `Entering → Active` and `Leaving → Idle` edges fire from scheduled tasks
/// after the configured delays. Any transition requested while a phase
/// transition is in flight is dropped, never queued.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Activity {
    /// No popover on screen.
    #[default]
    Idle,
    /// Popover materialized, activation delay pending.
    Entering,
    /// Popover fully shown.
    Active,
    /// Popover demoted, removal delay pending.
    Leaving,
}

/// A boundary-contract state class applied to a trigger or popover element.
///
/// The token strings are part of the public contract external styling
/// depends on and must not be renamed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StateClass {
    /// The pair is active (trigger immediately, popover once ready).
    Active,
    /// A phase transition is in flight.
    Changing,
    /// The popover opens above its trigger.
    PositionedTop,
    /// The popover opens below its trigger.
    PositionedBottom,
    /// The popover content overflows and scrolls internally.
    Scrollable,
    /// The popover content has been scrolled to its bottom bound.
    FullyScrolled,
    /// The trigger or popover region is hovered.
    Hovered,
}

impl StateClass {
    /// The class token applied to the host element.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Changing => "changing",
            Self::PositionedTop => "positioned-top",
            Self::PositionedBottom => "positioned-bottom",
            Self::Scrollable => "scrollable",
            Self::FullyScrolled => "fully-scrolled",
            Self::Hovered => "hovered",
        }
    }

    /// The corresponding bit for set-valued host bookkeeping.
    pub const fn bit(self) -> Classes {
        match self {
            Self::Active => Classes::ACTIVE,
            Self::Changing => Classes::CHANGING,
            Self::PositionedTop => Classes::POSITIONED_TOP,
            Self::PositionedBottom => Classes::POSITIONED_BOTTOM,
            Self::Scrollable => Classes::SCROLLABLE,
            Self::FullyScrolled => Classes::FULLY_SCROLLED,
            Self::Hovered => Classes::HOVERED,
        }
    }
}

bitflags::bitflags! {
    /// Set of state classes currently applied to one host element.
    ///
    /// Hosts that track classes as a set (rather than forwarding tokens to a
    /// live class list) can use this directly; see [`StateClass::bit`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Classes: u8 {
        /// [`StateClass::Active`].
        const ACTIVE = 0b0000_0001;
        /// [`StateClass::Changing`].
        const CHANGING = 0b0000_0010;
        /// [`StateClass::PositionedTop`].
        const POSITIONED_TOP = 0b0000_0100;
        /// [`StateClass::PositionedBottom`].
        const POSITIONED_BOTTOM = 0b0000_1000;
        /// [`StateClass::Scrollable`].
        const SCROLLABLE = 0b0001_0000;
        /// [`StateClass::FullyScrolled`].
        const FULLY_SCROLLED = 0b0010_0000;
        /// [`StateClass::Hovered`].
        const HOVERED = 0b0100_0000;
    }
}

/// One trigger/popover pair tracked by the driver.
///
/// The trigger node is borrowed from the host document; the popover node is
/// owned by the entity from materialization until removal releases it.
#[derive(Clone, Debug)]
pub struct Entity<N> {
    pub(crate) id: String,
    pub(crate) trigger: N,
    pub(crate) popover: Option<N>,
    pub(crate) activity: Activity,
    pub(crate) hovered: bool,
    pub(crate) placement: Option<Side>,
    pub(crate) scroll: ScrollState,
    // Outstanding deferred transition, canceled on teardown.
    pub(crate) pending: Option<TaskHandle>,
}

impl<N: Copy> Entity<N> {
    pub(crate) fn new(id: String, trigger: N) -> Self {
        Self {
            id,
            trigger,
            popover: None,
            activity: Activity::Idle,
            hovered: false,
            placement: None,
            scroll: ScrollState::AtBounds,
            pending: None,
        }
    }

    /// Stable identifier correlating the trigger and its popover.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The trigger node in the host document.
    pub fn trigger(&self) -> N {
        self.trigger
    }

    /// The owned popover node, present between materialization and removal.
    pub fn popover(&self) -> Option<N> {
        self.popover
    }

    /// Current lifecycle phase.
    pub fn activity(&self) -> Activity {
        self.activity
    }

    /// Re-entrancy guard: true while a phase transition is in flight.
    pub fn is_changing(&self) -> bool {
        matches!(self.activity, Activity::Entering | Activity::Leaving)
    }

    /// Whether the trigger or popover region registers hover.
    ///
    /// Independent of [`Activity`]; a dismissed popover's trigger may still
    /// be hovered.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Last applied vertical side, `None` until the first placement pass.
    pub fn placement(&self) -> Option<Side> {
        self.placement
    }

    /// Scroll position of the popover content. Meaningful only while
    /// [`Activity::Active`].
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn changing_covers_both_transitional_phases() {
        let mut e: Entity<u32> = Entity::new("1".to_string(), 7);
        assert!(!e.is_changing());
        e.activity = Activity::Entering;
        assert!(e.is_changing());
        e.activity = Activity::Active;
        assert!(!e.is_changing());
        e.activity = Activity::Leaving;
        assert!(e.is_changing());
    }

    #[test]
    fn tokens_match_the_boundary_contract() {
        assert_eq!(StateClass::Active.token(), "active");
        assert_eq!(StateClass::Changing.token(), "changing");
        assert_eq!(StateClass::PositionedTop.token(), "positioned-top");
        assert_eq!(StateClass::PositionedBottom.token(), "positioned-bottom");
        assert_eq!(StateClass::Scrollable.token(), "scrollable");
        assert_eq!(StateClass::FullyScrolled.token(), "fully-scrolled");
        assert_eq!(StateClass::Hovered.token(), "hovered");
    }

    #[test]
    fn bits_are_distinct() {
        let all = [
            StateClass::Active,
            StateClass::Changing,
            StateClass::PositionedTop,
            StateClass::PositionedBottom,
            StateClass::Scrollable,
            StateClass::FullyScrolled,
            StateClass::Hovered,
        ];
        let mut seen = Classes::empty();
        for class in all {
            assert!(!seen.intersects(class.bit()), "duplicate class bit");
            seen |= class.bit();
        }
    }
}
