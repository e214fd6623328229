// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget configuration: identifiers, defaults, callbacks, and collaborators.
//!
//! Every field has a default, so a configuration only names what it wants to
//! change:
//!
//! ```
//! use understory_combobox::ComboboxConfig;
//!
//! let config = ComboboxConfig::<String>::default()
//!     .with_id("fruit")
//!     .with_default_highlighted_index(Some(0))
//!     .on_change(|item, _| {
//!         let _ = item;
//!     });
//! assert_eq!(config.default_highlighted_index, Some(0));
//! ```
//!
//! Identifiers are resolved once, when the configuration is handed to
//! [`Combobox::new`](crate::Combobox::new). Everything else may be changed
//! between render passes through
//! [`Combobox::config_mut`](crate::Combobox::config_mut).

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use crate::engine::Snapshot;
use crate::ids::ItemIdFn;
use crate::platform::{FocusProbe, NoFocus, NoScroll, ScrollIntoView};
use crate::state::{State, StateChange, StatePatch};
use crate::status::{
    DEFAULT_STATUS_DEBOUNCE, NoopStatusSink, StatusContext, StatusSink, default_status_message,
};

/// Default window during which pointer hover suppresses scroll-into-view.
pub const DEFAULT_HOVER_SCROLL_SUPPRESSION: u64 = 250;

/// Display string for an item.
pub type ItemToString<I> = Box<dyn Fn(&I) -> String>;
/// Rewrites or vetoes a proposed transition: `(current, proposed) -> final`.
pub type StateReducer<I> = Box<dyn Fn(&State<I>, StatePatch<I>) -> StatePatch<I>>;
/// Reports whether a selection meaningfully changed: `(previous, next)`.
pub type SelectedItemChanged<I> = Box<dyn Fn(Option<&I>, Option<&I>) -> bool>;
/// Builds status text from a status snapshot.
pub type StatusMessage<I> = Box<dyn Fn(&StatusContext<'_, I>) -> String>;
/// Receives a selection together with a snapshot.
pub type SelectionCallback<I> = Box<dyn FnMut(Option<&I>, &Snapshot<I>)>;
/// Receives a transition's changes together with a snapshot.
pub type StateChangeCallback<I> = Box<dyn FnMut(&StateChange<I>, &Snapshot<I>)>;
/// Receives proposed input text together with a snapshot.
pub type InputValueCallback<I> = Box<dyn FnMut(&str, &Snapshot<I>)>;
/// Receives a snapshot.
pub type SnapshotCallback<I> = Box<dyn FnMut(&Snapshot<I>)>;

/// Configuration for a [`Combobox`](crate::Combobox).
pub struct ComboboxConfig<I> {
    /// Instance identifier; generated when `None`.
    pub id: Option<String>,
    /// Menu identifier; `{id}-menu` when `None`.
    pub menu_id: Option<String>,
    /// Label identifier; `{id}-label` when `None`.
    pub label_id: Option<String>,
    /// Input identifier; `{id}-input` when `None`.
    pub input_id: Option<String>,
    /// Item identifier generator; `{id}-item-{index}` when `None`.
    pub item_id: Option<ItemIdFn>,

    /// Open state after construction and after reset-style transitions.
    pub default_is_open: bool,
    /// Highlight after construction and after reset-style transitions.
    pub default_highlighted_index: Option<usize>,
    /// Navigation bound overriding the number of registered items.
    pub item_count: Option<usize>,
    /// Quiescence window for status updates.
    pub status_debounce: u64,
    /// How long hovering an item suppresses scroll-into-view.
    pub hover_scroll_suppression: u64,

    /// Display string for an item.
    pub item_to_string: ItemToString<I>,
    /// Transition interceptor. Its output is authoritative.
    pub state_reducer: StateReducer<I>,
    /// Selection change predicate.
    pub selected_item_changed: SelectedItemChanged<I>,
    /// Status message builder.
    pub status_message: StatusMessage<I>,

    /// Called when the selection changes.
    pub on_change: SelectionCallback<I>,
    /// Called when a transition selects a different item.
    pub on_select: SelectionCallback<I>,
    /// Called when a transition changes any field.
    pub on_state_change: StateChangeCallback<I>,
    /// Called, before reduction, whenever a transition proposes input text.
    pub on_input_value_change: InputValueCallback<I>,
    /// Called after an outer pointer or touch release closed the menu.
    pub on_outer_click: SnapshotCallback<I>,
    /// Called after every transition, changed or not.
    pub on_user_action: StateChangeCallback<I>,

    /// Receives status announcements.
    pub status_sink: Box<dyn StatusSink>,
    /// Reports the focused element.
    pub focus: Box<dyn FocusProbe>,
    /// Scrolls items into view.
    pub scroller: Box<dyn ScrollIntoView>,
}

impl<I: PartialEq + 'static> ComboboxConfig<I> {
    /// A default configuration using `item_to_string` for display strings.
    pub fn new(item_to_string: impl Fn(&I) -> String + 'static) -> Self {
        Self {
            id: None,
            menu_id: None,
            label_id: None,
            input_id: None,
            item_id: None,
            default_is_open: false,
            default_highlighted_index: None,
            item_count: None,
            status_debounce: DEFAULT_STATUS_DEBOUNCE,
            hover_scroll_suppression: DEFAULT_HOVER_SCROLL_SUPPRESSION,
            item_to_string: Box::new(item_to_string),
            state_reducer: Box::new(|_, proposed| proposed),
            selected_item_changed: Box::new(|previous, next| previous != next),
            status_message: Box::new(default_status_message::<I>),
            on_change: Box::new(|_, _| {}),
            on_select: Box::new(|_, _| {}),
            on_state_change: Box::new(|_, _| {}),
            on_input_value_change: Box::new(|_, _| {}),
            on_outer_click: Box::new(|_| {}),
            on_user_action: Box::new(|_, _| {}),
            status_sink: Box::new(NoopStatusSink),
            focus: Box::new(NoFocus),
            scroller: Box::new(NoScroll),
        }
    }
}

impl<I: fmt::Display + PartialEq + 'static> Default for ComboboxConfig<I> {
    fn default() -> Self {
        Self::new(|item: &I| item.to_string())
    }
}

impl<I> ComboboxConfig<I> {
    /// Display string for an optional item; empty for `None`.
    pub fn display(&self, item: Option<&I>) -> String {
        item.map(|item| (self.item_to_string)(item))
            .unwrap_or_default()
    }

    /// Set the instance identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the menu identifier.
    pub fn with_menu_id(mut self, id: impl Into<String>) -> Self {
        self.menu_id = Some(id.into());
        self
    }

    /// Set the label identifier.
    pub fn with_label_id(mut self, id: impl Into<String>) -> Self {
        self.label_id = Some(id.into());
        self
    }

    /// Set the input identifier.
    pub fn with_input_id(mut self, id: impl Into<String>) -> Self {
        self.input_id = Some(id.into());
        self
    }

    /// Set the item identifier generator.
    pub fn with_item_id(mut self, item_id: impl Fn(usize) -> String + 'static) -> Self {
        self.item_id = Some(Box::new(item_id));
        self
    }

    /// Set the default open state.
    pub fn with_default_is_open(mut self, open: bool) -> Self {
        self.default_is_open = open;
        self
    }

    /// Set the default highlight.
    pub fn with_default_highlighted_index(mut self, index: Option<usize>) -> Self {
        self.default_highlighted_index = index;
        self
    }

    /// Override the navigation bound.
    pub fn with_item_count(mut self, count: Option<usize>) -> Self {
        self.item_count = count;
        self
    }

    /// Set the status debounce window.
    pub fn with_status_debounce(mut self, window: u64) -> Self {
        self.status_debounce = window;
        self
    }

    /// Set the hover scroll suppression window.
    pub fn with_hover_scroll_suppression(mut self, window: u64) -> Self {
        self.hover_scroll_suppression = window;
        self
    }

    /// Set the display string function.
    pub fn with_item_to_string(mut self, f: impl Fn(&I) -> String + 'static) -> Self {
        self.item_to_string = Box::new(f);
        self
    }

    /// Set the state reducer.
    pub fn with_state_reducer(
        mut self,
        f: impl Fn(&State<I>, StatePatch<I>) -> StatePatch<I> + 'static,
    ) -> Self {
        self.state_reducer = Box::new(f);
        self
    }

    /// Set the selection change predicate.
    pub fn with_selected_item_changed(
        mut self,
        f: impl Fn(Option<&I>, Option<&I>) -> bool + 'static,
    ) -> Self {
        self.selected_item_changed = Box::new(f);
        self
    }

    /// Set the status message builder.
    pub fn with_status_message(
        mut self,
        f: impl Fn(&StatusContext<'_, I>) -> String + 'static,
    ) -> Self {
        self.status_message = Box::new(f);
        self
    }

    /// Set the change callback.
    pub fn on_change(mut self, f: impl FnMut(Option<&I>, &Snapshot<I>) + 'static) -> Self {
        self.on_change = Box::new(f);
        self
    }

    /// Set the select callback.
    pub fn on_select(mut self, f: impl FnMut(Option<&I>, &Snapshot<I>) + 'static) -> Self {
        self.on_select = Box::new(f);
        self
    }

    /// Set the state-change callback.
    pub fn on_state_change(
        mut self,
        f: impl FnMut(&StateChange<I>, &Snapshot<I>) + 'static,
    ) -> Self {
        self.on_state_change = Box::new(f);
        self
    }

    /// Set the input-value callback.
    pub fn on_input_value_change(mut self, f: impl FnMut(&str, &Snapshot<I>) + 'static) -> Self {
        self.on_input_value_change = Box::new(f);
        self
    }

    /// Set the outer-click callback.
    pub fn on_outer_click(mut self, f: impl FnMut(&Snapshot<I>) + 'static) -> Self {
        self.on_outer_click = Box::new(f);
        self
    }

    /// Set the user-action callback.
    pub fn on_user_action(
        mut self,
        f: impl FnMut(&StateChange<I>, &Snapshot<I>) + 'static,
    ) -> Self {
        self.on_user_action = Box::new(f);
        self
    }

    /// Set the status sink.
    pub fn with_status_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.status_sink = Box::new(sink);
        self
    }

    /// Set the focus probe.
    pub fn with_focus_probe(mut self, probe: impl FocusProbe + 'static) -> Self {
        self.focus = Box::new(probe);
        self
    }

    /// Set the scroll-into-view collaborator.
    pub fn with_scroller(mut self, scroller: impl ScrollIntoView + 'static) -> Self {
        self.scroller = Box::new(scroller);
        self
    }
}

impl<I> fmt::Debug for ComboboxConfig<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboboxConfig")
            .field("id", &self.id)
            .field("menu_id", &self.menu_id)
            .field("label_id", &self.label_id)
            .field("input_id", &self.input_id)
            .field("default_is_open", &self.default_is_open)
            .field("default_highlighted_index", &self.default_highlighted_index)
            .field("item_count", &self.item_count)
            .field("status_debounce", &self.status_debounce)
            .field("hover_scroll_suppression", &self.hover_scroll_suppression)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_closed_and_unhighlighted() {
        let config = ComboboxConfig::<u32>::default();

        assert!(!config.default_is_open);
        assert_eq!(config.default_highlighted_index, None);
        assert_eq!(config.status_debounce, 200);
        assert_eq!(config.hover_scroll_suppression, 250);
    }

    #[test]
    fn display_of_none_is_empty() {
        let config = ComboboxConfig::<u32>::default();

        assert_eq!(config.display(None), "");
        assert_eq!(config.display(Some(&7)), "7");
    }

    #[test]
    fn default_selection_predicate_is_inequality() {
        let config = ComboboxConfig::<u32>::default();

        assert!((config.selected_item_changed)(None, Some(&1)));
        assert!(!(config.selected_item_changed)(Some(&1), Some(&1)));
    }

    #[test]
    fn default_reducer_is_identity() {
        let config = ComboboxConfig::<u32>::default();
        let proposed = StatePatch::new().is_open(true);

        let reduced = (config.state_reducer)(&State::default(), proposed.clone());

        assert_eq!(reduced, proposed);
    }
}
