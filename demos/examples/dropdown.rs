// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A select-style dropdown driven by the toggle control.
//!
//! Opens with a click, navigates with the arrow keys, selects with Enter,
//! and closes again on a click outside the widget.
//!
//! Run:
//! - `cargo run -p understory_demos --example dropdown`
//! - `RUST_LOG=understory_combobox=trace cargo run -p understory_demos --example dropdown`

use understory_combobox::actions::{Key, KeyEvent};
use understory_combobox::{Combobox, ComboboxConfig, ControlledState};
use understory_demos::{FrameClock, LoggedStatus, init_logging, render};

const COLORS: &[&str] = &["Black", "Red", "Green", "Blue", "Orange", "Purple"];

fn settle(combobox: &mut Combobox<&'static str>, clock: &mut FrameClock) {
    render(combobox, COLORS, ControlledState::default());
    clock.frame(combobox);
    render(combobox, COLORS, ControlledState::default());
}

fn main() {
    init_logging();
    let mut clock = FrameClock::default();
    let mut combobox = Combobox::new(
        ComboboxConfig::default()
            .with_id("color")
            .with_status_sink(LoggedStatus)
            .on_select(|item, _| {
                tracing::info!(selected = item.copied().unwrap_or("none"), "selection");
            })
            .on_outer_click(|snapshot| {
                tracing::info!(id = %snapshot.id, "closed by outer click");
            }),
    );
    render(&mut combobox, COLORS, ControlledState::default());

    tracing::info!("click the toggle control");
    combobox.toggle_button_click();
    settle(&mut combobox, &mut clock);

    tracing::info!("arrow down twice");
    for _ in 0..2 {
        combobox.toggle_button_key_down(KeyEvent::new(Key::ArrowDown));
        settle(&mut combobox, &mut clock);
    }
    clock.idle(250, &mut combobox);

    tracing::info!("press Enter");
    combobox.toggle_button_key_down(KeyEvent::new(Key::Enter));
    settle(&mut combobox, &mut clock);
    clock.idle(250, &mut combobox);

    tracing::info!("open again, then click elsewhere");
    combobox.toggle_button_click();
    settle(&mut combobox, &mut clock);
    combobox.pointer_down();
    combobox.pointer_up(false);
    settle(&mut combobox, &mut clock);

    combobox.teardown();
}
