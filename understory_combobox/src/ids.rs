// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identifiers used for ARIA relationships.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Generate a fresh instance identifier, `use-downshift-{n}`.
///
/// The counter is process-wide and sequential.
pub fn generate_id() -> String {
    let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("use-downshift-{n}")
}

/// Maps an item index to its element identifier.
pub type ItemIdFn = Box<dyn Fn(usize) -> String>;

/// Resolved identifiers for one widget instance.
pub struct Ids {
    /// Instance identifier.
    pub id: String,
    /// Menu (listbox) identifier.
    pub menu_id: String,
    /// Label identifier.
    pub label_id: String,
    /// Input identifier.
    pub input_id: String,
    item_id: Option<ItemIdFn>,
}

impl Ids {
    /// Resolve identifiers, generating an instance id when none is given and
    /// deriving `{id}-menu`, `{id}-label` and `{id}-input` for missing roles.
    pub fn resolve(
        id: Option<String>,
        menu_id: Option<String>,
        label_id: Option<String>,
        input_id: Option<String>,
        item_id: Option<ItemIdFn>,
    ) -> Self {
        let id = id.unwrap_or_else(generate_id);
        Self {
            menu_id: menu_id.unwrap_or_else(|| format!("{id}-menu")),
            label_id: label_id.unwrap_or_else(|| format!("{id}-label")),
            input_id: input_id.unwrap_or_else(|| format!("{id}-input")),
            item_id,
            id,
        }
    }

    /// Identifier of the item at `index`, `{id}-item-{index}` by default.
    pub fn item_id(&self, index: usize) -> String {
        match &self.item_id {
            Some(item_id) => item_id(index),
            None => format!("{}-item-{index}", self.id),
        }
    }
}

impl fmt::Debug for Ids {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ids")
            .field("id", &self.id)
            .field("menu_id", &self.menu_id)
            .field("label_id", &self.label_id)
            .field("input_id", &self.input_id)
            .field("custom_item_id", &self.item_id.is_some())
            .finish()
    }
}
