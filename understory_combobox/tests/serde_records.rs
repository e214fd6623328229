// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serialized forms of patches and controlled values.
//!
//! Run with `cargo test --features serde`.

#![cfg(feature = "serde")]

use understory_combobox::{ControlledState, Fields, StateChangeType, StatePatch};

#[test]
fn clearing_patch_survives_json() {
    let patch = StatePatch::<String>::new()
        .highlighted_index(None)
        .selected_item(None)
        .kind(StateChangeType::KeyDownEscape);

    let json = serde_json::to_string(&patch).unwrap();
    let back: StatePatch<String> = serde_json::from_str(&json).unwrap();

    assert_eq!(back, patch);
    assert_eq!(back.fields(), Fields::HIGHLIGHTED_INDEX | Fields::SELECTED_ITEM);
}

#[test]
fn untouched_fields_are_omitted() {
    let patch = StatePatch::<String>::new().is_open(true);

    let json = serde_json::to_value(&patch).unwrap();

    assert!(json.get("highlighted_index").is_none());
    assert!(json.get("selected_item").is_none());
    let back: StatePatch<String> = serde_json::from_value(json).unwrap();
    assert_eq!(back.fields(), Fields::IS_OPEN);
}

#[test]
fn controlled_none_stays_controlled() {
    let controlled = ControlledState::<String>::default()
        .with_selected_item(None)
        .with_highlighted_index(Some(2));

    let json = serde_json::to_string(&controlled).unwrap();
    let back: ControlledState<String> = serde_json::from_str(&json).unwrap();

    assert_eq!(back.fields(), Fields::SELECTED_ITEM | Fields::HIGHLIGHTED_INDEX);
    assert_eq!(back.selected_item, Some(None));
    assert_eq!(back.highlighted_index, Some(Some(2)));
}

#[test]
fn missing_keys_mean_uncontrolled() {
    let back: ControlledState<String> = serde_json::from_str(r#"{"is_open":false}"#).unwrap();

    assert_eq!(back.fields(), Fields::IS_OPEN);
    assert_eq!(back, ControlledState::default().with_is_open(false));
}
