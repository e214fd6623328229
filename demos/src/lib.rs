// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared scaffolding for the combobox demos.
//!
//! The demos drive a [`Combobox`] the way a host toolkit would: render passes
//! that request prop bundles, a simulated clock, and a status sink that writes
//! announcements to the log.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use understory_combobox::{Combobox, ControlledState, StatusSink};

/// Install a `tracing` subscriber filtered by `RUST_LOG`, `info` by default.
///
/// Run with `RUST_LOG=understory_combobox=trace` to see every transition.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when demos run under a harness.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .try_init();
}

/// Writes status announcements to the log at `info`.
#[derive(Copy, Clone, Debug, Default)]
pub struct LoggedStatus;

impl StatusSink for LoggedStatus {
    fn publish(&mut self, message: &str) {
        tracing::info!(%message, "live region");
    }
}

/// A host clock that advances in fixed frames.
#[derive(Copy, Clone, Debug, Default)]
pub struct FrameClock {
    now: u64,
}

impl FrameClock {
    /// Frame length used by [`FrameClock::frame`].
    pub const FRAME: u64 = 16;

    /// Current time.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance one frame and let `combobox` catch up.
    pub fn frame<I: Clone + PartialEq + 'static>(&mut self, combobox: &mut Combobox<I>) {
        self.idle(Self::FRAME, combobox);
    }

    /// Advance by `duration` and let `combobox` catch up.
    pub fn idle<I: Clone + PartialEq + 'static>(
        &mut self,
        duration: u64,
        combobox: &mut Combobox<I>,
    ) {
        self.now += duration;
        combobox.advance_to(self.now);
    }
}

/// Run one render pass over `items` and log what a host would draw.
pub fn render(
    combobox: &mut Combobox<&'static str>,
    items: &[&'static str],
    controlled: ControlledState<&'static str>,
) {
    combobox.begin_pass(controlled);
    let input = combobox.input_props(false);
    let toggle = combobox.toggle_button_props(false);
    let is_open = combobox.state().is_open;
    let mut menu = Vec::new();
    // Items stay registered while the menu is hidden.
    for &item in items {
        let props = combobox.item_props(item, None, false);
        if is_open {
            let marker = if props.aria_selected { ">" } else { " " };
            menu.push(format!("{marker}{item}"));
        }
    }
    combobox.commit_pass();

    tracing::info!(
        value = %input.value,
        toggle = toggle.aria_label,
        menu = %menu.join(" "),
        "render"
    );
}
