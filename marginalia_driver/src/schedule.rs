// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic deferred-task scheduling over a virtual clock.
//!
//! ## Overview
//!
//! The driver never touches a wall clock. All delays (activation, removal,
//! the hover-intent check) are tasks in a [`Scheduler`] keyed by a
//! millisecond timestamp the host advances explicitly. Tests drive the clock
//! forward and observe exactly which transitions fire, in which order.
//!
//! Handles are generational: canceling a task frees its slot, and a handle
//! whose generation no longer matches is simply ignored. A stale handle can
//! therefore never cancel (or be confused with) a later task that happens to
//! reuse the same slot.
//!
//! [`FrameThrottle`] is the companion rate limiter for high-frequency
//! reposition/resize/wheel input: at most one admission per frame window,
//! measured on the same virtual clock.

use alloc::vec::Vec;

/// Generational handle for a scheduled task.
///
/// Stays unique across slot reuse: a freed slot's generation increments, so
/// handles from a previous occupancy never match again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u32, u32);

impl TaskHandle {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Task handles are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Pending<T> {
    due: u64,
    seq: u64,
    payload: T,
}

/// Deferred-task store with cancellation, drained by due time.
///
/// Payloads are opaque to the scheduler; the driver stores its own task enum.
/// Due tasks are returned in `(due, schedule order)` order so interleavings
/// are reproducible.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    slots: Vec<Option<Pending<T>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            seq: 0,
        }
    }

    /// Schedule `payload` to fire once the clock reaches `due`.
    pub fn schedule(&mut self, due: u64, payload: T) -> TaskHandle {
        let seq = self.seq;
        self.seq += 1;
        let pending = Pending { due, seq, payload };
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(pending);
            TaskHandle::new(idx, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(pending));
            self.generations.push(generation);
            TaskHandle::new(self.slots.len() - 1, generation)
        }
    }

    /// Cancel a pending task. Returns whether the handle was still live.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if !self.is_pending(handle) {
            return false;
        }
        self.slots[handle.idx()] = None;
        self.free_list.push(handle.idx());
        true
    }

    /// Whether `handle` refers to a task that has neither fired nor been
    /// canceled.
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.generations.get(handle.idx()) == Some(&handle.1)
            && self.slots[handle.idx()].is_some()
    }

    /// Remove and return every task due at or before `now`, ordered by
    /// `(due, schedule order)`.
    pub fn due(&mut self, now: u64) -> Vec<(TaskHandle, T)> {
        let mut fired: Vec<(u64, u64, TaskHandle)> = Vec::new();
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some(pending) = slot
                && pending.due <= now
            {
                fired.push((
                    pending.due,
                    pending.seq,
                    TaskHandle::new(idx, self.generations[idx]),
                ));
            }
        }
        fired.sort_unstable_by_key(|&(due, seq, _)| (due, seq));
        fired
            .into_iter()
            .map(|(_, _, handle)| {
                let pending = self.slots[handle.idx()].take().expect("dangling TaskHandle");
                self.free_list.push(handle.idx());
                (handle, pending.payload)
            })
            .collect()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Frame-window rate limiter over the virtual clock.
///
/// Admits at most one call per window. Callers that want trailing-edge
/// behavior schedule a task for [`FrameThrottle::reopens_at`] when an
/// admission is refused; the work then runs against the live state at fire
/// time, never a stale snapshot.
#[derive(Copy, Clone, Debug)]
pub struct FrameThrottle {
    window: u64,
    last: Option<u64>,
}

impl FrameThrottle {
    /// One display frame at 60Hz, the default window.
    pub const FRAME_MS: u64 = 16;

    /// Create a throttle admitting one call per `window` milliseconds.
    pub fn new(window: u64) -> Self {
        Self { window, last: None }
    }

    /// Try to admit a call at `now`. Returns false inside a closed window.
    pub fn admit(&mut self, now: u64) -> bool {
        match self.last {
            Some(last) if now < last + self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Earliest instant at which the window reopens.
    pub fn reopens_at(&self) -> u64 {
        self.last.map(|last| last + self.window).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn due_tasks_fire_in_due_then_schedule_order() {
        let mut s: Scheduler<&str> = Scheduler::new();
        s.schedule(30, "late");
        s.schedule(10, "first");
        s.schedule(10, "second");
        let fired: Vec<&str> = s.due(30).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["first", "second", "late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn tasks_not_yet_due_stay_pending() {
        let mut s: Scheduler<u32> = Scheduler::new();
        let h = s.schedule(100, 1);
        assert!(s.due(99).is_empty());
        assert!(s.is_pending(h));
        assert_eq!(s.due(100).len(), 1);
        assert!(!s.is_pending(h));
    }

    #[test]
    fn canceled_tasks_never_fire() {
        let mut s: Scheduler<u32> = Scheduler::new();
        let h = s.schedule(10, 1);
        assert!(s.cancel(h));
        assert!(s.due(100).is_empty());
        // A second cancel of the same handle is a no-op.
        assert!(!s.cancel(h));
    }

    #[test]
    fn stale_handles_do_not_alias_reused_slots() {
        let mut s: Scheduler<u32> = Scheduler::new();
        let first = s.schedule(10, 1);
        assert!(s.cancel(first));
        // Reuses the freed slot with a bumped generation.
        let second = s.schedule(20, 2);
        assert!(!s.is_pending(first));
        assert!(!s.cancel(first));
        assert!(s.is_pending(second));
        assert_eq!(s.due(20).len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut s: Scheduler<u32> = Scheduler::new();
        s.schedule(10, 1);
        s.schedule(20, 2);
        s.clear();
        assert!(s.is_empty());
        assert!(s.due(100).is_empty());
    }

    #[test]
    fn throttle_admits_once_per_window() {
        let mut t = FrameThrottle::new(16);
        assert!(t.admit(0));
        assert!(!t.admit(5));
        assert!(!t.admit(15));
        assert_eq!(t.reopens_at(), 16);
        assert!(t.admit(16));
        assert!(!t.admit(17));
    }

    #[test]
    fn throttle_admits_immediately_when_idle() {
        let mut t = FrameThrottle::new(16);
        assert!(t.admit(1000));
        assert!(t.admit(2000));
    }
}
