// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessibility status messages.
//!
//! Status text is produced in two stages:
//!
//! 1. A pure message builder maps a [`StatusContext`] snapshot to a string.
//!    [`default_status_message`] implements the default policy and can be
//!    called directly, without any timing involved.
//! 2. A [`StatusNotifier`] debounces *when* the builder runs, so that bursts
//!    of interaction (for example, a held arrow key) are announced once the
//!    user pauses, and remembers the previously reported result count.
//!
//! Non-empty messages are handed to a [`StatusSink`], typically a live region
//! maintained by the host.
//!
//! ```
//! use understory_combobox::status::{StatusContext, default_status_message};
//!
//! let to_string = |item: &&str| String::from(*item);
//! let ctx = StatusContext {
//!     is_open: true,
//!     selected_item: None,
//!     highlighted_item: None,
//!     result_count: 2,
//!     previous_result_count: 0,
//!     item_to_string: &to_string,
//! };
//! assert_eq!(
//!     default_status_message(&ctx),
//!     "2 results are available, use up and down arrow keys to navigate. Press Enter key to select."
//! );
//! ```

use alloc::format;
use alloc::string::String;
use core::fmt;

/// Default quiescence window before a status update runs.
pub const DEFAULT_STATUS_DEBOUNCE: u64 = 200;

/// Message announced when the menu is open without any results.
pub const NO_RESULTS_MESSAGE: &str = "No results are available.";

/// Inputs to a status message builder.
pub struct StatusContext<'a, I> {
    /// Whether the menu is open.
    pub is_open: bool,
    /// The current selection.
    pub selected_item: Option<&'a I>,
    /// The item at the highlighted index, if one is registered there.
    pub highlighted_item: Option<&'a I>,
    /// Number of results available for navigation.
    pub result_count: usize,
    /// Result count at the previous status update.
    pub previous_result_count: usize,
    /// Display string for an item.
    pub item_to_string: &'a dyn Fn(&I) -> String,
}

impl<I: fmt::Debug> fmt::Debug for StatusContext<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusContext")
            .field("is_open", &self.is_open)
            .field("selected_item", &self.selected_item)
            .field("highlighted_item", &self.highlighted_item)
            .field("result_count", &self.result_count)
            .field("previous_result_count", &self.previous_result_count)
            .finish_non_exhaustive()
    }
}

/// The default status policy.
///
/// - Closed: the selection's display string, or nothing.
/// - Open with no results: [`NO_RESULTS_MESSAGE`].
/// - Open with a changed result count: a count and navigation hint.
/// - Open with an unchanged result count: nothing, to avoid repeating the
///   previous announcement.
pub fn default_status_message<I>(ctx: &StatusContext<'_, I>) -> String {
    if !ctx.is_open {
        return ctx
            .selected_item
            .map(|item| (ctx.item_to_string)(item))
            .unwrap_or_default();
    }

    if ctx.result_count == 0 {
        return String::from(NO_RESULTS_MESSAGE);
    }

    if ctx.result_count != ctx.previous_result_count {
        let verb = if ctx.result_count == 1 {
            " is"
        } else {
            "s are"
        };
        return format!(
            "{} result{verb} available, use up and down arrow keys to navigate. Press Enter key to select.",
            ctx.result_count
        );
    }

    String::new()
}

/// Destination for status announcements, such as an ARIA live region.
pub trait StatusSink {
    /// Publish `message`. Called with non-empty messages only.
    fn publish(&mut self, message: &str);
}

/// A sink that discards every message.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopStatusSink;

impl StatusSink for NoopStatusSink {
    fn publish(&mut self, _message: &str) {}
}

/// Trailing-edge debounce on a host-driven clock.
///
/// Each [`trigger`](Self::trigger) pushes the deadline out to `now + window`;
/// the pending run becomes due only once the clock passes a deadline without
/// a further trigger.
#[derive(Copy, Clone, Debug)]
pub struct Debounce {
    window: u64,
    deadline: Option<u64>,
}

impl Debounce {
    /// Create a debounce with the given quiescence window.
    pub const fn new(window: u64) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// The quiescence window.
    pub fn window(&self) -> u64 {
        self.window
    }

    /// Change the quiescence window for future triggers.
    pub fn set_window(&mut self, window: u64) {
        self.window = window;
    }

    /// Restart the window at `now`.
    pub fn trigger(&mut self, now: u64) {
        self.deadline = Some(now.saturating_add(self.window));
    }

    /// Deadline of the pending run, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Consume the pending run if it is due at `now`.
    pub fn take_due(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending run.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Debounced status reporting with result-count memory.
#[derive(Copy, Clone, Debug)]
pub struct StatusNotifier {
    debounce: Debounce,
    previous_result_count: usize,
}

impl StatusNotifier {
    /// Create a notifier with the given debounce window.
    pub const fn new(window: u64) -> Self {
        Self {
            debounce: Debounce::new(window),
            previous_result_count: 0,
        }
    }

    /// Result count reported by the last update.
    pub fn previous_result_count(&self) -> usize {
        self.previous_result_count
    }

    /// The debounce driving this notifier.
    pub fn debounce(&self) -> &Debounce {
        &self.debounce
    }

    /// Mutable access to the debounce, for example to change its window.
    pub fn debounce_mut(&mut self) -> &mut Debounce {
        &mut self.debounce
    }

    /// Request an update; restarts the debounce window.
    pub fn schedule(&mut self, now: u64) {
        self.debounce.trigger(now);
    }

    /// Drop any pending update.
    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }

    /// Whether an update is due at `now`; consumes it if so.
    pub fn take_due(&mut self, now: u64) -> bool {
        self.debounce.take_due(now)
    }

    /// Build and publish a message, then remember `ctx.result_count`.
    ///
    /// `ctx.previous_result_count` is overwritten with the remembered count
    /// before the builder runs.
    pub fn update<I>(
        &mut self,
        mut ctx: StatusContext<'_, I>,
        build: &dyn Fn(&StatusContext<'_, I>) -> String,
        sink: &mut dyn StatusSink,
    ) -> String {
        ctx.previous_result_count = self.previous_result_count;
        let message = build(&ctx);
        self.previous_result_count = ctx.result_count;
        if !message.is_empty() {
            tracing::trace!(%message, "publishing status");
            sink.publish(&message);
        }
        message
    }
}

impl Default for StatusNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn to_string(item: &u32) -> String {
        item.to_string()
    }

    fn ctx(is_open: bool, result_count: usize, previous: usize) -> StatusContext<'static, u32> {
        StatusContext {
            is_open,
            selected_item: None,
            highlighted_item: None,
            result_count,
            previous_result_count: previous,
            item_to_string: &to_string,
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl StatusSink for Recorder {
        fn publish(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    #[test]
    fn closed_without_selection_is_silent() {
        assert_eq!(default_status_message(&ctx(false, 3, 0)), "");
    }

    #[test]
    fn closed_with_selection_announces_it() {
        let item = 42;
        let mut c = ctx(false, 3, 0);
        c.selected_item = Some(&item);
        assert_eq!(default_status_message(&c), "42");
    }

    #[test]
    fn open_without_results() {
        assert_eq!(default_status_message(&ctx(true, 0, 5)), NO_RESULTS_MESSAGE);
    }

    #[test]
    fn singular_and_plural_counts() {
        assert_eq!(
            default_status_message(&ctx(true, 1, 0)),
            "1 result is available, use up and down arrow keys to navigate. Press Enter key to select."
        );
        assert_eq!(
            default_status_message(&ctx(true, 3, 1)),
            "3 results are available, use up and down arrow keys to navigate. Press Enter key to select."
        );
    }

    #[test]
    fn unchanged_count_is_silent() {
        assert_eq!(default_status_message(&ctx(true, 3, 3)), "");
    }

    #[test]
    fn debounce_waits_for_quiet_window() {
        let mut debounce = Debounce::new(200);
        debounce.trigger(0);
        debounce.trigger(150);

        assert!(!debounce.take_due(200));
        assert!(debounce.take_due(350));
        // Consumed.
        assert!(!debounce.take_due(1_000));
    }

    #[test]
    fn debounce_cancel_drops_pending_run() {
        let mut debounce = Debounce::new(10);
        debounce.trigger(0);
        debounce.cancel();

        assert_eq!(debounce.deadline(), None);
        assert!(!debounce.take_due(100));
    }

    #[test]
    fn notifier_never_repeats_the_same_count_while_open() {
        let mut notifier = StatusNotifier::default();
        let mut sink = Recorder::default();

        notifier.update(ctx(true, 3, 0), &default_status_message, &mut sink);
        notifier.update(ctx(true, 3, 0), &default_status_message, &mut sink);
        notifier.update(ctx(true, 2, 0), &default_status_message, &mut sink);

        assert_eq!(sink.0.len(), 2);
        assert!(sink.0[0].starts_with("3 results"));
        assert!(sink.0[1].starts_with("2 results"));
        assert_eq!(notifier.previous_result_count(), 2);
    }

    #[test]
    fn empty_messages_are_not_published() {
        let mut notifier = StatusNotifier::default();
        let mut sink = Recorder::default();

        let message = notifier.update(ctx(false, 0, 0), &default_status_message, &mut sink);

        assert!(message.is_empty());
        assert!(sink.0.is_empty());
    }
}
