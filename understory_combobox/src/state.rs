// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State records, partial updates, and the controlled/uncontrolled merge.
//!
//! ## Controlled vs. internal fields
//!
//! Every [`State`] field is either *controlled* (the host supplies its value
//! through [`ControlledState`] on every render pass) or *internal* (the
//! engine keeps the authoritative copy). The choice is made per field and can
//! differ between fields of the same widget.
//!
//! [`effective_state`] is the single read path: it overlays controlled values
//! on top of the internal store. Writes go through
//! [`StatePatch::without`], which drops controlled fields before the patch is
//! applied to the internal store with [`State::apply`].
//!
//! ```
//! use understory_combobox::{ControlledState, State, StatePatch, effective_state};
//!
//! let internal: State<&str> = State::default();
//! let controlled = ControlledState::<&str>::default().with_is_open(true);
//!
//! let effective = effective_state(&internal, &controlled);
//! assert!(effective.is_open);
//!
//! // A patch that closes the menu does not reach the internal store,
//! // because `is_open` is controlled.
//! let patch = StatePatch::new().is_open(false).input_value("a");
//! let mut next = internal.clone();
//! next.apply(&patch.without(controlled.fields()));
//! assert!(!next.is_open);
//! assert_eq!(next.input_value, "a");
//! ```

use alloc::string::String;
use core::fmt;

bitflags::bitflags! {
    /// A set of [`State`] fields.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Fields: u8 {
        /// [`State::highlighted_index`].
        const HIGHLIGHTED_INDEX = 1 << 0;
        /// [`State::input_value`].
        const INPUT_VALUE = 1 << 1;
        /// [`State::is_open`].
        const IS_OPEN = 1 << 2;
        /// [`State::selected_item`].
        const SELECTED_ITEM = 1 << 3;
    }
}

/// The combobox state record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State<I> {
    /// Index of the emphasized candidate, if any.
    ///
    /// This may briefly point past the registered items, for example when it is
    /// set before the next render pass registers them.
    pub highlighted_index: Option<usize>,
    /// Text of the free-text input.
    pub input_value: String,
    /// Whether the option list is visible.
    pub is_open: bool,
    /// The committed selection.
    pub selected_item: Option<I>,
}

impl<I> Default for State<I> {
    fn default() -> Self {
        Self {
            highlighted_index: None,
            input_value: String::new(),
            is_open: false,
            selected_item: None,
        }
    }
}

impl<I: Clone> State<I> {
    /// Overwrite every field present in `patch`.
    pub fn apply(&mut self, patch: &StatePatch<I>) {
        if let Some(index) = patch.highlighted_index {
            self.highlighted_index = index;
        }
        if let Some(value) = &patch.input_value {
            self.input_value.clone_from(value);
        }
        if let Some(open) = patch.is_open {
            self.is_open = open;
        }
        if let Some(item) = &patch.selected_item {
            self.selected_item.clone_from(item);
        }
    }

    /// Return a copy with `patch` applied.
    pub fn with_patch(&self, patch: &StatePatch<I>) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }
}

/// Classification of a state transition's origin.
///
/// The tag travels with every transition for diagnostics and for state
/// reducers that want to special-case particular interactions. It is never
/// stored as part of [`State`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateChangeType {
    /// No tag was supplied.
    #[default]
    Unknown,
    /// Global pointer release outside the widget.
    MouseUp,
    /// Pointer moved over an item.
    ItemMouseEnter,
    /// Up arrow key.
    KeyDownArrowUp,
    /// Down arrow key.
    KeyDownArrowDown,
    /// Escape key.
    KeyDownEscape,
    /// Enter key.
    KeyDownEnter,
    /// Home key on the input.
    KeyDownHome,
    /// End key on the input.
    KeyDownEnd,
    /// Item clicked.
    ClickItem,
    /// Input lost focus.
    BlurInput,
    /// Input text changed.
    ChangeInput,
    /// Space key on the toggle button.
    KeyDownSpaceButton,
    /// Toggle button clicked.
    ClickButton,
    /// Toggle button lost focus.
    BlurButton,
    /// The host changed a controlled selection.
    ControlledPropUpdatedSelectedItem,
    /// Global touch release outside the widget.
    TouchEnd,
}

impl StateChangeType {
    /// Stable diagnostic name for this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "__use-downshift_unknown__",
            Self::MouseUp => "__use-downshift_mouseup__",
            Self::ItemMouseEnter => "__use-downshift_item_mouseenter__",
            Self::KeyDownArrowUp => "__use-downshift_keydown_arrow_up__",
            Self::KeyDownArrowDown => "__use-downshift_keydown_arrow_down__",
            Self::KeyDownEscape => "__use-downshift_keydown_escape__",
            Self::KeyDownEnter => "__use-downshift_keydown_enter__",
            Self::KeyDownHome => "__use-downshift_keydown_home__",
            Self::KeyDownEnd => "__use-downshift_keydown_end__",
            Self::ClickItem => "__use-downshift_click_item__",
            Self::BlurInput => "__use-downshift_blur_input__",
            Self::ChangeInput => "__use-downshift_change_input__",
            Self::KeyDownSpaceButton => "__use-downshift_keydown_space_button__",
            Self::ClickButton => "__use-downshift_click_button__",
            Self::BlurButton => "__use-downshift_blur_button__",
            Self::ControlledPropUpdatedSelectedItem => {
                "__use-downshift_controlled_prop_updated_selected_item__"
            }
            Self::TouchEnd => "__use-downshift_touchend__",
        }
    }
}

impl fmt::Display for StateChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partial state update plus its origin tag.
///
/// `None` means "leave the field alone". For optional fields the inner
/// `Option` is the new value, so `highlighted_index: Some(None)` clears the
/// highlight.
///
/// With the `serde` feature, an untouched `highlighted_index` or
/// `selected_item` is omitted, and a serialized `null` means "set to none".
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "I: serde::Serialize", deserialize = "I: serde::Deserialize<'de>"))
)]
pub struct StatePatch<I> {
    /// New highlight.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "double_option")
    )]
    pub highlighted_index: Option<Option<usize>>,
    /// New input text.
    pub input_value: Option<String>,
    /// New open state.
    pub is_open: Option<bool>,
    /// New selection.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "double_option")
    )]
    pub selected_item: Option<Option<I>>,
    /// Origin tag; `None` is reported as [`StateChangeType::Unknown`].
    pub kind: Option<StateChangeType>,
}

impl<I> Default for StatePatch<I> {
    fn default() -> Self {
        Self {
            highlighted_index: None,
            input_value: None,
            is_open: None,
            selected_item: None,
            kind: None,
        }
    }
}

impl<I> StatePatch<I> {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty patch carrying an origin tag.
    pub fn of_kind(kind: StateChangeType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Set the highlight.
    pub fn highlighted_index(mut self, index: Option<usize>) -> Self {
        self.highlighted_index = Some(index);
        self
    }

    /// Set the input text.
    pub fn input_value(mut self, value: impl Into<String>) -> Self {
        self.input_value = Some(value.into());
        self
    }

    /// Set the open state.
    pub fn is_open(mut self, open: bool) -> Self {
        self.is_open = Some(open);
        self
    }

    /// Set the selection.
    pub fn selected_item(mut self, item: Option<I>) -> Self {
        self.selected_item = Some(item);
        self
    }

    /// Set the origin tag.
    pub fn kind(mut self, kind: StateChangeType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The origin tag, defaulting to [`StateChangeType::Unknown`].
    pub fn change_type(&self) -> StateChangeType {
        self.kind.unwrap_or_default()
    }

    /// Fields this patch sets (the tag is not a field).
    pub fn fields(&self) -> Fields {
        let mut fields = Fields::empty();
        fields.set(Fields::HIGHLIGHTED_INDEX, self.highlighted_index.is_some());
        fields.set(Fields::INPUT_VALUE, self.input_value.is_some());
        fields.set(Fields::IS_OPEN, self.is_open.is_some());
        fields.set(Fields::SELECTED_ITEM, self.selected_item.is_some());
        fields
    }

    /// Whether the patch sets no field.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(mut self, other: Self) -> Self {
        if other.highlighted_index.is_some() {
            self.highlighted_index = other.highlighted_index;
        }
        if other.input_value.is_some() {
            self.input_value = other.input_value;
        }
        if other.is_open.is_some() {
            self.is_open = other.is_open;
        }
        if other.selected_item.is_some() {
            self.selected_item = other.selected_item;
        }
        if other.kind.is_some() {
            self.kind = other.kind;
        }
        self
    }

    /// Keep only the fields in `fields` (the tag is always kept).
    pub fn only(mut self, fields: Fields) -> Self {
        if !fields.contains(Fields::HIGHLIGHTED_INDEX) {
            self.highlighted_index = None;
        }
        if !fields.contains(Fields::INPUT_VALUE) {
            self.input_value = None;
        }
        if !fields.contains(Fields::IS_OPEN) {
            self.is_open = None;
        }
        if !fields.contains(Fields::SELECTED_ITEM) {
            self.selected_item = None;
        }
        self
    }

    /// Drop the fields in `fields` (the tag is always kept).
    pub fn without(self, fields: Fields) -> Self {
        self.only(!fields)
    }
}

impl<I: PartialEq> StatePatch<I> {
    /// Fields this patch sets to a value different from `state`.
    pub fn differing_fields(&self, state: &State<I>) -> Fields {
        let mut fields = Fields::empty();
        fields.set(
            Fields::HIGHLIGHTED_INDEX,
            self.highlighted_index
                .is_some_and(|index| index != state.highlighted_index),
        );
        fields.set(
            Fields::INPUT_VALUE,
            self.input_value
                .as_ref()
                .is_some_and(|value| *value != state.input_value),
        );
        fields.set(
            Fields::IS_OPEN,
            self.is_open.is_some_and(|open| open != state.is_open),
        );
        fields.set(
            Fields::SELECTED_ITEM,
            self.selected_item
                .as_ref()
                .is_some_and(|item| *item != state.selected_item),
        );
        fields
    }
}

/// Values the host supplies for controlled fields on each render pass.
///
/// A field set to `Some` is controlled for that pass. Serialized the same
/// way as [`StatePatch`]: omitted fields are uncontrolled.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "I: serde::Serialize", deserialize = "I: serde::Deserialize<'de>"))
)]
pub struct ControlledState<I> {
    /// Controlled highlight.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "double_option")
    )]
    pub highlighted_index: Option<Option<usize>>,
    /// Controlled input text.
    pub input_value: Option<String>,
    /// Controlled open state.
    pub is_open: Option<bool>,
    /// Controlled selection.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none", with = "double_option")
    )]
    pub selected_item: Option<Option<I>>,
}

impl<I> Default for ControlledState<I> {
    fn default() -> Self {
        Self {
            highlighted_index: None,
            input_value: None,
            is_open: None,
            selected_item: None,
        }
    }
}

impl<I> ControlledState<I> {
    /// Control the highlight.
    pub fn with_highlighted_index(mut self, index: Option<usize>) -> Self {
        self.highlighted_index = Some(index);
        self
    }

    /// Control the input text.
    pub fn with_input_value(mut self, value: impl Into<String>) -> Self {
        self.input_value = Some(value.into());
        self
    }

    /// Control the open state.
    pub fn with_is_open(mut self, open: bool) -> Self {
        self.is_open = Some(open);
        self
    }

    /// Control the selection.
    pub fn with_selected_item(mut self, item: Option<I>) -> Self {
        self.selected_item = Some(item);
        self
    }

    /// The set of controlled fields.
    pub fn fields(&self) -> Fields {
        let mut fields = Fields::empty();
        fields.set(Fields::HIGHLIGHTED_INDEX, self.highlighted_index.is_some());
        fields.set(Fields::INPUT_VALUE, self.input_value.is_some());
        fields.set(Fields::IS_OPEN, self.is_open.is_some());
        fields.set(Fields::SELECTED_ITEM, self.selected_item.is_some());
        fields
    }
}

/// Serde adapter that keeps "absent" and "present but none" apart.
///
/// Used together with `default` and `skip_serializing_if = "Option::is_none"`,
/// so the outer `None` is never serialized.
#[cfg(feature = "serde")]
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<T, S>(
        value: &Option<Option<T>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, T, D>(
        deserializer: D,
    ) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Overlay controlled values on the internal store.
pub fn effective_state<I: Clone>(internal: &State<I>, controlled: &ControlledState<I>) -> State<I> {
    State {
        highlighted_index: controlled
            .highlighted_index
            .unwrap_or(internal.highlighted_index),
        input_value: controlled
            .input_value
            .clone()
            .unwrap_or_else(|| internal.input_value.clone()),
        is_open: controlled.is_open.unwrap_or(internal.is_open),
        selected_item: match &controlled.selected_item {
            Some(item) => item.clone(),
            None => internal.selected_item.clone(),
        },
    }
}

/// The fields a transition actually changed, plus its origin tag.
///
/// Delivered to state-change and user-action callbacks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateChange<I> {
    /// The transition's origin.
    pub kind: StateChangeType,
    /// Only the fields whose value differed from the state before the
    /// transition.
    pub changes: StatePatch<I>,
}

impl<I> StateChange<I> {
    /// Whether any field changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The set of changed fields.
    pub fn fields(&self) -> Fields {
        self.changes.fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_state_prefers_controlled_values() {
        let internal = State {
            highlighted_index: Some(1),
            input_value: String::from("internal"),
            is_open: false,
            selected_item: Some(1_u32),
        };
        let controlled = ControlledState::default()
            .with_input_value("controlled")
            .with_selected_item(None);

        let effective = effective_state(&internal, &controlled);

        assert_eq!(effective.highlighted_index, Some(1));
        assert_eq!(effective.input_value, "controlled");
        assert!(!effective.is_open);
        // A controlled `None` selection overrides the internal selection.
        assert_eq!(effective.selected_item, None);
    }

    #[test]
    fn without_drops_controlled_fields_but_keeps_tag() {
        let patch = StatePatch::<u32>::new()
            .is_open(true)
            .highlighted_index(Some(2))
            .kind(StateChangeType::KeyDownArrowDown);

        let writable = patch.without(Fields::IS_OPEN);

        assert_eq!(writable.is_open, None);
        assert_eq!(writable.highlighted_index, Some(Some(2)));
        assert_eq!(writable.kind, Some(StateChangeType::KeyDownArrowDown));
    }

    #[test]
    fn merge_prefers_right_hand_fields() {
        let base = StatePatch::<u32>::new()
            .is_open(false)
            .input_value("base")
            .kind(StateChangeType::Unknown);
        let other = StatePatch::new()
            .input_value("other")
            .kind(StateChangeType::KeyDownEscape);

        let merged = base.merge(other);

        assert_eq!(merged.is_open, Some(false));
        assert_eq!(merged.input_value.as_deref(), Some("other"));
        assert_eq!(merged.change_type(), StateChangeType::KeyDownEscape);
    }

    #[test]
    fn differing_fields_ignores_equal_values() {
        let state = State {
            highlighted_index: Some(0),
            input_value: String::from("a"),
            is_open: true,
            selected_item: Some(7_u32),
        };
        let patch = StatePatch::new()
            .highlighted_index(Some(0))
            .input_value("b")
            .is_open(true)
            .selected_item(None);

        assert_eq!(
            patch.differing_fields(&state),
            Fields::INPUT_VALUE | Fields::SELECTED_ITEM
        );
    }

    #[test]
    fn apply_clears_optional_fields() {
        let mut state = State {
            highlighted_index: Some(3),
            input_value: String::new(),
            is_open: true,
            selected_item: Some(1_u32),
        };

        state.apply(&StatePatch::new().highlighted_index(None).selected_item(None));

        assert_eq!(state.highlighted_index, None);
        assert_eq!(state.selected_item, None);
        assert!(state.is_open);
    }

    #[test]
    fn missing_tag_reports_unknown() {
        let patch = StatePatch::<u32>::new().is_open(true);
        assert_eq!(patch.change_type(), StateChangeType::Unknown);
        assert_eq!(
            patch.change_type().as_str(),
            "__use-downshift_unknown__"
        );
    }
}
