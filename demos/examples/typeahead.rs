// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A typeahead with a host-owned selection.
//!
//! The state reducer highlights the first item starting with the typed
//! text. The selection is controlled: the host stores what `on_select`
//! reports and hands it back on every render pass, and the engine keeps the
//! input text in sync.
//!
//! Run:
//! - `cargo run -p understory_demos --example typeahead`

use std::cell::Cell;
use std::rc::Rc;

use understory_combobox::actions::{Key, KeyEvent};
use understory_combobox::{Combobox, ComboboxConfig, ControlledState, StateChangeType};
use understory_demos::{FrameClock, LoggedStatus, init_logging, render};

const CITIES: &[&str] = &[
    "Amsterdam", "Berlin", "Bern", "Brussels", "Lisbon", "London", "Madrid", "Paris",
];

fn first_prefix_match(typed: &str) -> Option<usize> {
    let typed = typed.to_lowercase();
    CITIES
        .iter()
        .position(|city| city.to_lowercase().starts_with(&typed))
}

fn main() {
    init_logging();
    let selected: Rc<Cell<Option<&'static str>>> = Rc::default();
    let store = selected.clone();

    let mut clock = FrameClock::default();
    let mut combobox = Combobox::new(
        ComboboxConfig::default()
            .with_id("city")
            .with_status_sink(LoggedStatus)
            .with_state_reducer(|_, proposed| {
                if proposed.change_type() != StateChangeType::ChangeInput {
                    return proposed;
                }
                let first = proposed.input_value.as_deref().and_then(first_prefix_match);
                proposed.highlighted_index(first)
            })
            .on_select(move |item, _| store.set(item.copied()))
            .on_state_change(|change, snapshot| {
                tracing::info!(
                    kind = %change.kind,
                    fields = ?change.fields(),
                    input = %snapshot.state.input_value,
                    "state change"
                );
            }),
    );

    let pass = |combobox: &mut Combobox<&'static str>, clock: &mut FrameClock| {
        for _ in 0..2 {
            let controlled = ControlledState::default().with_selected_item(selected.get());
            render(combobox, CITIES, controlled);
            clock.frame(combobox);
        }
    };
    pass(&mut combobox, &mut clock);

    for typed in ["B", "Br"] {
        combobox.input_change(typed);
        pass(&mut combobox, &mut clock);
    }
    combobox.input_key_down(KeyEvent::new(Key::Enter));
    pass(&mut combobox, &mut clock);
    tracing::info!(host_selection = selected.get().unwrap_or("none"), "after Enter");

    tracing::info!("the host replaces the selection on its own");
    selected.set(Some("Lisbon"));
    pass(&mut combobox, &mut clock);
    tracing::info!(input = %combobox.state().input_value, "input follows the host");

    clock.idle(250, &mut combobox);
    combobox.teardown();
}
