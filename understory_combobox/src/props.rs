// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prop bundles: ARIA attributes and handler bindings per element role.
//!
//! Each getter returns a plain struct. [`attributes`](RootProps::attributes)
//! flattens it into ordered `(name, value)` pairs for hosts that render
//! attribute maps, and a [`Handlers`] set says which [`Combobox`] handler
//! methods the host should wire to the element:
//!
//! | Flag | Input | Toggle control | Item |
//! |---|---|---|---|
//! | `CHANGE` | [`input_change`](Combobox::input_change) | | |
//! | `KEY_DOWN` | [`input_key_down`](Combobox::input_key_down) | [`toggle_button_key_down`](Combobox::toggle_button_key_down) | |
//! | `KEY_UP` | | [`toggle_button_key_up`](Combobox::toggle_button_key_up) | |
//! | `BLUR` | [`input_blur`](Combobox::input_blur) | [`toggle_button_blur`](Combobox::toggle_button_blur) | |
//! | `CLICK` | | [`toggle_button_click`](Combobox::toggle_button_click) | [`item_click`](Combobox::item_click) |
//! | `MOUSE_MOVE` | | | [`item_mouse_move`](Combobox::item_mouse_move) |
//! | `MOUSE_DOWN` | | | [`item_mouse_down`](Combobox::item_mouse_down) |
//!
//! All getters read the effective state.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::engine::Combobox;

bitflags::bitflags! {
    /// Handler bindings for an element.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Handlers: u8 {
        /// Text change.
        const CHANGE = 1 << 0;
        /// Key press.
        const KEY_DOWN = 1 << 1;
        /// Key release.
        const KEY_UP = 1 << 2;
        /// Focus loss.
        const BLUR = 1 << 3;
        /// Click.
        const CLICK = 1 << 4;
        /// Pointer movement.
        const MOUSE_MOVE = 1 << 5;
        /// Pointer press.
        const MOUSE_DOWN = 1 << 6;
    }
}

/// An attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// Text.
    Str(String),
    /// Boolean, rendered as `true`/`false`.
    Bool(bool),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Ordered attribute list.
pub type Attributes = Vec<(&'static str, AttrValue)>;

fn push(attrs: &mut Attributes, name: &'static str, value: impl Into<AttrValue>) {
    attrs.push((name, value.into()));
}

/// Props for the root container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootProps {
    /// Always `combobox`.
    pub role: &'static str,
    /// Whether the menu is open.
    pub aria_expanded: bool,
    /// Always `listbox`.
    pub aria_haspopup: &'static str,
    /// Menu id while open.
    pub aria_owns: Option<String>,
    /// Label id.
    pub aria_labelledby: String,
}

impl RootProps {
    /// Flatten into attribute pairs.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        push(&mut attrs, "role", self.role);
        push(&mut attrs, "aria-expanded", self.aria_expanded);
        push(&mut attrs, "aria-haspopup", self.aria_haspopup);
        if let Some(owns) = &self.aria_owns {
            push(&mut attrs, "aria-owns", owns.as_str());
        }
        push(&mut attrs, "aria-labelledby", self.aria_labelledby.as_str());
        attrs
    }
}

/// Props for the label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelProps {
    /// Label id.
    pub id: String,
    /// Input id.
    pub html_for: String,
}

impl LabelProps {
    /// Flatten into attribute pairs.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        push(&mut attrs, "id", self.id.as_str());
        push(&mut attrs, "htmlFor", self.html_for.as_str());
        attrs
    }
}

/// Props for the text input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputProps {
    /// Always `list`.
    pub aria_autocomplete: &'static str,
    /// Highlighted item id while open and highlighted.
    pub aria_activedescendant: Option<String>,
    /// Menu id while open.
    pub aria_controls: Option<String>,
    /// Label id.
    pub aria_labelledby: String,
    /// Always `off`.
    pub auto_complete: &'static str,
    /// Current input text.
    pub value: String,
    /// Input id.
    pub id: String,
    /// Whether the input is disabled.
    pub disabled: bool,
    /// Bound handlers.
    pub handlers: Handlers,
}

impl InputProps {
    /// Flatten into attribute pairs.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        push(&mut attrs, "aria-autocomplete", self.aria_autocomplete);
        if let Some(descendant) = &self.aria_activedescendant {
            push(&mut attrs, "aria-activedescendant", descendant.as_str());
        }
        if let Some(controls) = &self.aria_controls {
            push(&mut attrs, "aria-controls", controls.as_str());
        }
        push(&mut attrs, "aria-labelledby", self.aria_labelledby.as_str());
        push(&mut attrs, "autoComplete", self.auto_complete);
        push(&mut attrs, "value", self.value.as_str());
        push(&mut attrs, "id", self.id.as_str());
        if self.disabled {
            push(&mut attrs, "disabled", true);
        }
        attrs
    }
}

/// Props for the toggle control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleButtonProps {
    /// Always `button`.
    pub button_type: &'static str,
    /// Always `button`.
    pub role: &'static str,
    /// `close menu` while open, `open menu` otherwise.
    pub aria_label: &'static str,
    /// Always true.
    pub aria_haspopup: bool,
    /// Marks the element as the toggle control; always true.
    pub data_toggle: bool,
    /// Whether the control is disabled.
    pub disabled: bool,
    /// Bound handlers.
    pub handlers: Handlers,
}

impl ToggleButtonProps {
    /// Flatten into attribute pairs.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        push(&mut attrs, "type", self.button_type);
        push(&mut attrs, "role", self.role);
        push(&mut attrs, "aria-label", self.aria_label);
        push(&mut attrs, "aria-haspopup", self.aria_haspopup);
        push(&mut attrs, "data-toggle", self.data_toggle);
        if self.disabled {
            push(&mut attrs, "disabled", true);
        }
        attrs
    }
}

/// Props for the menu (listbox).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuProps {
    /// Always `listbox`.
    pub role: &'static str,
    /// Label id, unless an explicit label was supplied.
    pub aria_labelledby: Option<String>,
    /// Explicit accessible label.
    pub aria_label: Option<String>,
    /// Menu id.
    pub id: String,
}

impl MenuProps {
    /// Flatten into attribute pairs.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        push(&mut attrs, "role", self.role);
        if let Some(labelledby) = &self.aria_labelledby {
            push(&mut attrs, "aria-labelledby", labelledby.as_str());
        }
        if let Some(label) = &self.aria_label {
            push(&mut attrs, "aria-label", label.as_str());
        }
        push(&mut attrs, "id", self.id.as_str());
        attrs
    }
}

/// Props for an item (option).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemProps {
    /// Index the item was registered at.
    pub index: usize,
    /// Item id.
    pub id: String,
    /// Always `option`.
    pub role: &'static str,
    /// Whether the item is highlighted.
    pub aria_selected: bool,
    /// Whether the item is disabled.
    pub disabled: bool,
    /// Bound handlers.
    pub handlers: Handlers,
}

impl ItemProps {
    /// Flatten into attribute pairs.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        push(&mut attrs, "id", self.id.as_str());
        push(&mut attrs, "role", self.role);
        push(&mut attrs, "aria-selected", self.aria_selected);
        if self.disabled {
            push(&mut attrs, "disabled", true);
        }
        attrs
    }
}

impl<I: Clone + PartialEq + 'static> Combobox<I> {
    /// Props for the root container.
    pub fn root_props(&self) -> RootProps {
        let is_open = self.state().is_open;
        RootProps {
            role: "combobox",
            aria_expanded: is_open,
            aria_haspopup: "listbox",
            aria_owns: is_open.then(|| self.ids.menu_id.clone()),
            aria_labelledby: self.ids.label_id.clone(),
        }
    }

    /// Props for the label.
    pub fn label_props(&self) -> LabelProps {
        LabelProps {
            id: self.ids.label_id.clone(),
            html_for: self.ids.input_id.clone(),
        }
    }

    /// Props for the text input.
    pub fn input_props(&self, disabled: bool) -> InputProps {
        let state = self.state();
        let aria_activedescendant = state
            .highlighted_index
            .filter(|_| state.is_open)
            .map(|index| self.ids.item_id(index));
        InputProps {
            aria_autocomplete: "list",
            aria_activedescendant,
            aria_controls: state.is_open.then(|| self.ids.menu_id.clone()),
            aria_labelledby: self.ids.label_id.clone(),
            auto_complete: "off",
            value: state.input_value,
            id: self.ids.input_id.clone(),
            disabled,
            handlers: if disabled {
                Handlers::empty()
            } else {
                Handlers::CHANGE | Handlers::KEY_DOWN | Handlers::BLUR
            },
        }
    }

    /// Props for the toggle control.
    pub fn toggle_button_props(&self, disabled: bool) -> ToggleButtonProps {
        ToggleButtonProps {
            button_type: "button",
            role: "button",
            aria_label: if self.state().is_open {
                "close menu"
            } else {
                "open menu"
            },
            aria_haspopup: true,
            data_toggle: true,
            disabled,
            handlers: if disabled {
                Handlers::empty()
            } else {
                Handlers::CLICK | Handlers::KEY_DOWN | Handlers::KEY_UP | Handlers::BLUR
            },
        }
    }

    /// Props for the menu. An explicit `aria_label` suppresses
    /// `aria-labelledby`.
    pub fn menu_props(&self, aria_label: Option<&str>) -> MenuProps {
        MenuProps {
            role: "listbox",
            aria_labelledby: match aria_label {
                Some(_) => None,
                None => Some(self.ids.label_id.clone()),
            },
            aria_label: aria_label.map(String::from),
            id: self.ids.menu_id.clone(),
        }
    }

    /// Props for an item; registers `item` for the current pass.
    ///
    /// With `index` the item is registered at that position, otherwise it is
    /// appended. Disabled items only bind pointer-down.
    pub fn item_props(&mut self, item: I, index: Option<usize>, disabled: bool) -> ItemProps {
        let index = self.register_item(item, index, disabled);
        ItemProps {
            index,
            id: self.ids.item_id(index),
            role: "option",
            aria_selected: self.state().highlighted_index == Some(index),
            disabled,
            handlers: if disabled {
                Handlers::MOUSE_DOWN
            } else {
                Handlers::MOUSE_MOVE | Handlers::MOUSE_DOWN | Handlers::CLICK
            },
        }
    }
}
