// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of deferred tasks on a host-driven clock.
//!
//! The registry never reads a system clock. The host advances time with
//! [`TimeoutRegistry::advance_to`] (typically from its frame or timer loop)
//! and pops due tasks with [`TimeoutRegistry::pop_due`]. Time is measured in
//! caller-chosen units; the combobox engine uses milliseconds.
//!
//! ## Ordering
//!
//! Tasks fire in order of their deadline. Tasks sharing a deadline fire in
//! the order they were scheduled (FIFO).
//!
//! ## Cancellation
//!
//! Cancellation is registry-wide: [`TimeoutRegistry::cancel_all`] drops every
//! outstanding task. Individual schedules are fire-and-forget and do not hand
//! out handles.
//!
//! ```
//! use understory_combobox::timeout::TimeoutRegistry;
//!
//! let mut registry: TimeoutRegistry<&str> = TimeoutRegistry::new();
//! registry.schedule("later", 10);
//! registry.schedule("first", 0);
//! registry.schedule("second", 0);
//!
//! assert_eq!(registry.pop_due(), Some("first"));
//! assert_eq!(registry.pop_due(), Some("second"));
//! // "later" is not due yet.
//! assert_eq!(registry.pop_due(), None);
//!
//! registry.advance_to(10);
//! assert_eq!(registry.pop_due(), Some("later"));
//! assert!(registry.is_empty());
//! ```

use alloc::collections::BTreeMap;
use core::fmt;

/// Deadline-ordered queue of deferred tasks.
pub struct TimeoutRegistry<T> {
    /// Pending tasks keyed by `(deadline, sequence)`.
    pending: BTreeMap<(u64, u64), T>,
    /// Current time on the host clock.
    now: u64,
    /// Monotonic insertion counter used to keep equal deadlines FIFO.
    seq: u64,
}

impl<T> TimeoutRegistry<T> {
    /// Create an empty registry at time `0`.
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            now: 0,
            seq: 0,
        }
    }

    /// Current time on the registry clock.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward to `now`.
    ///
    /// The clock never moves backwards; earlier values are ignored.
    pub fn advance_to(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Enqueue `task` to become due `delay` time units from now.
    pub fn schedule(&mut self, task: T, delay: u64) {
        let deadline = self.now.saturating_add(delay);
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        self.pending.insert((deadline, seq), task);
        tracing::trace!(deadline, pending = self.pending.len(), "scheduled task");
    }

    /// Deadline of the earliest pending task, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Remove and return the earliest task whose deadline has passed.
    ///
    /// The task's slot is released before it is returned, so a task that
    /// schedules more work does not observe itself as pending.
    pub fn pop_due(&mut self) -> Option<T> {
        let (&key, _) = self.pending.first_key_value()?;
        if key.0 > self.now {
            return None;
        }
        self.pending.remove(&key)
    }

    /// Drop every pending task.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            tracing::trace!(cancelled = self.pending.len(), "cancelled pending tasks");
        }
        self.pending.clear();
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for TimeoutRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TimeoutRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeoutRegistry")
            .field("pending", &self.pending.len())
            .field("now", &self.now)
            .field("seq", &self.seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn drain(registry: &mut TimeoutRegistry<u32>) -> Vec<u32> {
        let mut fired = Vec::new();
        while let Some(task) = registry.pop_due() {
            fired.push(task);
        }
        fired
    }

    #[test]
    fn zero_delay_tasks_fire_fifo() {
        let mut registry = TimeoutRegistry::new();
        registry.schedule(1, 0);
        registry.schedule(2, 0);
        registry.schedule(3, 0);

        assert_eq!(drain(&mut registry), [1, 2, 3]);
        assert!(registry.is_empty());
    }

    #[test]
    fn deadlines_order_before_insertion() {
        let mut registry = TimeoutRegistry::new();
        registry.schedule(1, 30);
        registry.schedule(2, 10);
        registry.schedule(3, 20);

        registry.advance_to(30);
        assert_eq!(drain(&mut registry), [2, 3, 1]);
    }

    #[test]
    fn tasks_wait_for_their_deadline() {
        let mut registry = TimeoutRegistry::new();
        registry.schedule(7, 250);

        registry.advance_to(249);
        assert_eq!(registry.pop_due(), None);
        assert_eq!(registry.next_deadline(), Some(250));

        registry.advance_to(250);
        assert_eq!(registry.pop_due(), Some(7));
        assert_eq!(registry.next_deadline(), None);
    }

    #[test]
    fn delay_is_relative_to_current_time() {
        let mut registry = TimeoutRegistry::new();
        registry.advance_to(100);
        registry.schedule(1, 5);

        assert_eq!(registry.next_deadline(), Some(105));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut registry: TimeoutRegistry<u32> = TimeoutRegistry::new();
        registry.advance_to(50);
        registry.advance_to(10);

        assert_eq!(registry.now(), 50);
    }

    #[test]
    fn cancel_all_drops_everything() {
        let mut registry = TimeoutRegistry::new();
        registry.schedule(1, 0);
        registry.schedule(2, 100);
        assert_eq!(registry.len(), 2);

        registry.cancel_all();
        registry.advance_to(1_000);

        assert!(registry.is_empty());
        assert_eq!(registry.pop_due(), None);
    }

    #[test]
    fn saturating_deadline() {
        let mut registry = TimeoutRegistry::new();
        registry.advance_to(u64::MAX - 1);
        registry.schedule(1, 10);

        assert_eq!(registry.next_deadline(), Some(u64::MAX));
    }
}
