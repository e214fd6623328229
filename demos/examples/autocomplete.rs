// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An autocomplete whose host filters the items by the typed text.
//!
//! Run:
//! - `cargo run -p understory_demos --example autocomplete`

use understory_combobox::actions::{Key, KeyEvent};
use understory_combobox::{Combobox, ComboboxConfig, ControlledState};
use understory_demos::{FrameClock, LoggedStatus, init_logging, render};

const FRUITS: &[&str] = &[
    "Apple",
    "Apricot",
    "Banana",
    "Blackberry",
    "Blueberry",
    "Cherry",
    "Mango",
    "Papaya",
];

fn matching(input: &str) -> Vec<&'static str> {
    let needle = input.to_lowercase();
    FRUITS
        .iter()
        .copied()
        .filter(|fruit| fruit.to_lowercase().contains(&needle))
        .collect()
}

fn settle(combobox: &mut Combobox<&'static str>, clock: &mut FrameClock) {
    for _ in 0..2 {
        let items = matching(&combobox.state().input_value);
        render(combobox, &items, ControlledState::default());
        clock.frame(combobox);
    }
}

fn main() {
    init_logging();
    let mut clock = FrameClock::default();
    let mut combobox = Combobox::new(
        ComboboxConfig::default()
            .with_id("fruit")
            .with_status_sink(LoggedStatus)
            .on_input_value_change(|value, _| tracing::info!(%value, "input text")),
    );
    settle(&mut combobox, &mut clock);

    for typed in ["b", "bl", "blu"] {
        combobox.input_change(typed);
        settle(&mut combobox, &mut clock);
    }
    clock.idle(250, &mut combobox);

    tracing::info!("erase back to one letter");
    combobox.input_change("b");
    settle(&mut combobox, &mut clock);
    clock.idle(250, &mut combobox);

    combobox.input_key_down(KeyEvent::new(Key::ArrowDown));
    settle(&mut combobox, &mut clock);
    combobox.input_key_down(KeyEvent::new(Key::End));
    settle(&mut combobox, &mut clock);
    combobox.input_key_down(KeyEvent::new(Key::Enter));
    settle(&mut combobox, &mut clock);

    let state = combobox.state();
    tracing::info!(
        selected = state.selected_item.unwrap_or("none"),
        input = %state.input_value,
        "committed"
    );

    tracing::info!("Escape clears the field");
    combobox.input_key_down(KeyEvent::new(Key::Escape));
    settle(&mut combobox, &mut clock);
    clock.idle(250, &mut combobox);

    combobox.teardown();
}
