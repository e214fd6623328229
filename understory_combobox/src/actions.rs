// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Action handlers: translate platform events into transitions.
//!
//! Each handler returns an [`EventResponse`] describing what the host should
//! do with the platform event. Handlers that depend on where focus lands
//! (blur) are deferred by a zero-delay task so the focus probe sees the new
//! focus target.
//!
//! ```
//! use understory_combobox::{Combobox, ComboboxConfig, ControlledState};
//! use understory_combobox::actions::{Key, KeyEvent};
//!
//! let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
//! combobox.begin_pass(ControlledState::default());
//! for item in ["a", "b", "c"] {
//!     combobox.register_item(item, None, false);
//! }
//! combobox.commit_pass();
//!
//! let response = combobox.input_key_down(KeyEvent::new(Key::ArrowDown));
//! assert!(response.prevent_default);
//! combobox.flush();
//! assert_eq!(combobox.state().highlighted_index, Some(0));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use core::str::FromStr;

use understory_event_state::outer::{Containment, ReleaseResult};

use crate::engine::Combobox;
use crate::navigation::next_wrapping_index;
use crate::platform::FocusedElement;
use crate::state::{StateChangeType, StatePatch};

/// Highlight step for shift-modified arrow keys.
pub const SHIFT_STEP: isize = 5;

/// Keys the handlers react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Home.
    Home,
    /// End.
    End,
    /// Space bar.
    Space,
}

/// A key name that does not map to any [`Key`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized key name `{0}`")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    /// Parse a platform key name, accepting legacy spellings.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Home" => Self::Home,
            "End" => Self::End,
            " " | "Spacebar" => Self::Space,
            other => return Err(UnknownKey(other.into())),
        })
    }
}

/// A key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Whether shift was held.
    pub shift: bool,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub const fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// Set the shift modifier.
    pub const fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// Parse a platform key name.
    pub fn parse(name: &str, shift: bool) -> Result<Self, UnknownKey> {
        Ok(Self::new(name.parse()?).with_shift(shift))
    }
}

/// What the host should do with the platform event after a handler ran.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the platform's default action.
    pub prevent_default: bool,
    /// Move focus to the event target.
    pub request_focus: bool,
}

impl EventResponse {
    /// Let the platform proceed.
    pub const IGNORED: Self = Self {
        prevent_default: false,
        request_focus: false,
    };

    /// Suppress the platform default.
    pub const PREVENT_DEFAULT: Self = Self {
        prevent_default: true,
        request_focus: false,
    };
}

impl<I: Clone + PartialEq + 'static> Combobox<I> {
    // --- Keyboard --------------------------------------------------------

    /// Key-down on the input.
    pub fn input_key_down(&mut self, event: KeyEvent) -> EventResponse {
        match event.key {
            Key::Home => self.highlight_edge(true),
            Key::End => self.highlight_edge(false),
            _ => self.common_key_down(event),
        }
    }

    /// Key-down on the toggle control.
    pub fn toggle_button_key_down(&mut self, event: KeyEvent) -> EventResponse {
        match event.key {
            Key::Space => {
                self.toggle_menu(StatePatch::of_kind(StateChangeType::KeyDownSpaceButton));
                EventResponse::PREVENT_DEFAULT
            }
            _ => self.common_key_down(event),
        }
    }

    /// Key-up on the toggle control.
    ///
    /// Keeps the platform from synthesizing a click after Space.
    pub fn toggle_button_key_up(&mut self, _event: KeyEvent) -> EventResponse {
        EventResponse::PREVENT_DEFAULT
    }

    fn common_key_down(&mut self, event: KeyEvent) -> EventResponse {
        match event.key {
            Key::ArrowDown => self.arrow(event.shift, 1, StateChangeType::KeyDownArrowDown),
            Key::ArrowUp => self.arrow(event.shift, -1, StateChangeType::KeyDownArrowUp),
            Key::Enter => self.enter(),
            Key::Escape => {
                self.reset(
                    StatePatch::of_kind(StateChangeType::KeyDownEscape)
                        .selected_item(None)
                        .input_value(""),
                );
                EventResponse::PREVENT_DEFAULT
            }
            _ => EventResponse::IGNORED,
        }
    }

    fn arrow(&mut self, shift: bool, step: isize, kind: StateChangeType) -> EventResponse {
        if self.state().is_open {
            let amount = if shift { step * SHIFT_STEP } else { step };
            self.move_highlighted_index(amount, StatePatch::of_kind(kind));
        } else {
            self.apply_transition(
                StatePatch::of_kind(kind).is_open(true),
                Some(Box::new(move |combobox: &mut Self| {
                    let next = next_wrapping_index(
                        step,
                        combobox.state().highlighted_index,
                        combobox.item_count(),
                    );
                    if let Some(next) = next {
                        combobox.set_highlighted_index(
                            Some(next),
                            StatePatch::of_kind(kind).is_open(true),
                        );
                    }
                })),
            );
        }
        EventResponse::PREVENT_DEFAULT
    }

    fn enter(&mut self) -> EventResponse {
        let state = self.state();
        let (true, Some(index)) = (state.is_open, state.highlighted_index) else {
            return EventResponse::IGNORED;
        };
        if self.item(index).is_some() && !self.is_item_disabled(index) {
            self.select_item_at_index(index, StatePatch::of_kind(StateChangeType::KeyDownEnter));
        }
        EventResponse::PREVENT_DEFAULT
    }

    fn highlight_edge(&mut self, first: bool) -> EventResponse {
        let count = self.item_count();
        if !self.state().is_open || count == 0 {
            return EventResponse::IGNORED;
        }
        let (index, kind) = if first {
            (0, StateChangeType::KeyDownHome)
        } else {
            (count - 1, StateChangeType::KeyDownEnd)
        };
        self.set_highlighted_index(Some(index), StatePatch::of_kind(kind));
        EventResponse::PREVENT_DEFAULT
    }

    // --- Input -----------------------------------------------------------

    /// The input's text changed.
    pub fn input_change(&mut self, value: impl Into<String>) -> EventResponse {
        let patch = StatePatch::of_kind(StateChangeType::ChangeInput)
            .is_open(true)
            .input_value(value)
            .highlighted_index(self.config.default_highlighted_index);
        self.apply_transition(patch, None);
        EventResponse::IGNORED
    }

    /// The input lost focus.
    ///
    /// After a zero-delay deferral, resets unless a pointer press is in
    /// progress or focus moved to this widget's toggle control.
    pub fn input_blur(&mut self) -> EventResponse {
        self.schedule(
            |combobox| {
                let toggle_focused = combobox
                    .config
                    .focus
                    .active_element()
                    .is_some_and(|element| element.is_widget_toggle());
                if !combobox.outer.is_pointer_down() && !toggle_focused {
                    tracing::debug!(id = %combobox.ids.id, "input blur closes menu");
                    combobox.reset(StatePatch::of_kind(StateChangeType::BlurInput));
                }
            },
            0,
        );
        EventResponse::IGNORED
    }

    // --- Toggle control --------------------------------------------------

    /// The toggle control was clicked.
    ///
    /// The toggle runs after a zero-delay deferral. When nothing holds focus
    /// the host is asked to focus the control.
    pub fn toggle_button_click(&mut self) -> EventResponse {
        let request_focus = self.config.focus.active_element().is_none();
        self.schedule(
            |combobox| combobox.toggle_menu(StatePatch::of_kind(StateChangeType::ClickButton)),
            0,
        );
        EventResponse {
            prevent_default: true,
            request_focus,
        }
    }

    /// The toggle control lost focus.
    ///
    /// After a zero-delay deferral, resets unless a pointer press is in
    /// progress or focus moved to this widget's input or stayed on the
    /// control.
    pub fn toggle_button_blur(&mut self) -> EventResponse {
        self.schedule(
            |combobox| {
                let active = combobox.config.focus.active_element();
                let on_input = active.as_ref().and_then(|element| element.id.as_deref())
                    == Some(combobox.ids.input_id.as_str());
                let on_toggle = active
                    .as_ref()
                    .is_some_and(FocusedElement::is_widget_toggle);
                if !combobox.outer.is_pointer_down() && !on_input && !on_toggle {
                    tracing::debug!(id = %combobox.ids.id, "toggle blur closes menu");
                    combobox.reset(StatePatch::of_kind(StateChangeType::BlurButton));
                }
            },
            0,
        );
        EventResponse::IGNORED
    }

    // --- Items -----------------------------------------------------------

    /// The pointer moved over the item at `index`.
    ///
    /// Highlights it and suppresses scroll-into-view for the configured
    /// window. Disabled or already highlighted items are ignored.
    pub fn item_mouse_move(&mut self, index: usize) -> EventResponse {
        if self.is_item_disabled(index) || self.state().highlighted_index == Some(index) {
            return EventResponse::IGNORED;
        }
        self.set_highlighted_index(
            Some(index),
            StatePatch::of_kind(StateChangeType::ItemMouseEnter),
        );
        self.avoid_scrolling = true;
        let window = self.config.hover_scroll_suppression;
        self.schedule(|combobox| combobox.avoid_scrolling = false, window);
        EventResponse::IGNORED
    }

    /// Pointer pressed on an item; keeps focus in the input.
    pub fn item_mouse_down(&mut self, _index: usize) -> EventResponse {
        EventResponse::PREVENT_DEFAULT
    }

    /// The item at `index` was clicked.
    pub fn item_click(&mut self, index: usize) -> EventResponse {
        if !self.is_item_disabled(index) {
            self.select_item_at_index(index, StatePatch::of_kind(StateChangeType::ClickItem));
        }
        EventResponse::IGNORED
    }

    // --- Global events ---------------------------------------------------

    /// Pointer pressed anywhere.
    pub fn pointer_down(&mut self) {
        self.outer.on_pointer_down();
    }

    /// Pointer released anywhere.
    ///
    /// `target_inside` reports whether the release target lies within the
    /// root container or the menu. Focus inside the widget also counts as
    /// inside.
    pub fn pointer_up(&mut self, target_inside: bool) {
        let focus_inside = self
            .config
            .focus
            .active_element()
            .is_some_and(|element| element.within_widget);
        let release = self
            .outer
            .on_pointer_up(Containment::new(target_inside, focus_inside));
        if release == ReleaseResult::Outside && self.state().is_open {
            self.outer_close(StateChangeType::MouseUp);
        }
    }

    /// Touch started anywhere.
    pub fn touch_start(&mut self) {
        self.outer.on_touch_start();
    }

    /// Touch moved anywhere.
    pub fn touch_move(&mut self) {
        self.outer.on_touch_move();
    }

    /// Touch ended anywhere.
    ///
    /// Only the target is considered; a drag since touch start is ignored.
    pub fn touch_end(&mut self, target_inside: bool) {
        let release = self
            .outer
            .on_touch_end(Containment::new(target_inside, false));
        if release == ReleaseResult::Outside && self.state().is_open {
            self.outer_close(StateChangeType::TouchEnd);
        }
    }

    fn outer_close(&mut self, kind: StateChangeType) {
        tracing::debug!(id = %self.ids.id, %kind, "outer interaction closes menu");
        self.reset(StatePatch::of_kind(kind));
        let snapshot = self.snapshot();
        (self.config.on_outer_click)(&snapshot);
    }
}
