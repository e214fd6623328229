// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Combobox: a headless interaction engine for combobox-family
//! widgets such as dropdowns, autocompletes and typeaheads.
//!
//! The crate owns the behavior of a combobox and none of its presentation:
//!
//! - **State** ([`State`]): the highlighted index, the input text, whether
//!   the menu is open, and the selected item. Any field may be *controlled*
//!   by the host through [`ControlledState`], in which case the engine reads
//!   the host's value and never writes its own.
//! - **Transitions** ([`Combobox::apply_transition`]): every change flows
//!   through one pipeline with a host-supplied reducer and deferred,
//!   ordered notifications.
//! - **Action handlers** ([`actions`]): keyboard, pointer, focus and input
//!   events mapped to transitions.
//! - **Prop bundles** ([`props`]): ARIA attributes and handler bindings for
//!   each element role.
//! - **Status messages** ([`status`]): debounced announcements for assistive
//!   technology.
//!
//! The engine has no clock of its own. Deferred work runs when the host calls
//! [`Combobox::advance_to`] or [`Combobox::flush`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_combobox::actions::{Key, KeyEvent};
//! use understory_combobox::{Combobox, ComboboxConfig, ControlledState};
//!
//! let mut combobox = Combobox::new(ComboboxConfig::<&str>::default().with_id("fruit"));
//!
//! // One render pass: request item props, which registers the items.
//! combobox.begin_pass(ControlledState::default());
//! for fruit in ["apple", "banana", "cherry"] {
//!     let props = combobox.item_props(fruit, None, false);
//!     assert!(props.id.starts_with("fruit-item-"));
//! }
//! combobox.commit_pass();
//!
//! // Down opens the menu; the first item is highlighted once it commits.
//! combobox.input_key_down(KeyEvent::new(Key::ArrowDown));
//! combobox.flush();
//! assert_eq!(combobox.state().highlighted_index, Some(0));
//!
//! combobox.input_key_down(KeyEvent::new(Key::ArrowDown));
//! combobox.input_key_down(KeyEvent::new(Key::Enter));
//! combobox.flush();
//!
//! let state = combobox.state();
//! assert_eq!(state.selected_item, Some("banana"));
//! assert_eq!(state.input_value, "banana");
//! assert!(!state.is_open);
//! ```
//!
//! ## Controlled state
//!
//! ```rust
//! use understory_combobox::{Combobox, ComboboxConfig, ControlledState, StatePatch};
//!
//! let mut combobox = Combobox::new(ComboboxConfig::<u32>::default());
//! combobox.begin_pass(ControlledState::default().with_is_open(false));
//!
//! combobox.set_state(StatePatch::new().is_open(true));
//!
//! // The host decides; the engine only reports the proposal.
//! assert!(!combobox.state().is_open);
//! ```
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`State`], [`StatePatch`],
//!   [`ControlledState`] and [`StateChangeType`].
//!
//! Logging goes through `tracing`; install a subscriber in the host to see it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod actions;
pub mod config;
pub mod engine;
pub mod ids;
pub mod navigation;
pub mod platform;
pub mod props;
pub mod state;
pub mod status;
pub mod timeout;

pub use actions::{EventResponse, Key, KeyEvent, UnknownKey};
pub use config::ComboboxConfig;
pub use engine::{Combobox, Proposal, Snapshot, Task};
pub use navigation::next_wrapping_index;
pub use platform::{EventSource, FocusProbe, FocusedElement, GlobalEvents, ScrollIntoView};
pub use state::{
    ControlledState, Fields, State, StateChange, StateChangeType, StatePatch, effective_state,
};
pub use status::{StatusContext, StatusSink, default_status_message};
