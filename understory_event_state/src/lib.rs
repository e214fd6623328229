// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event State: pointer and touch state machines for widgets.
//!
//! Widgets frequently need to remember a little bit of pointer history in
//! order to interpret the next event correctly. This crate collects those
//! small state machines so they can be shared across widget implementations.
//!
//! - [`outer::OuterInteractionState`]: tracks global pointer-down and
//!   touch-move activity and decides whether a pointer or touch release
//!   counts as an interaction *outside* a widget (for example, to close an
//!   open popup).
//!
//! The host is responsible for delivering global (window-level) pointer and
//! touch events and for answering containment questions about the release
//! target; the state machines only interpret the resulting facts.
//!
//! ```
//! use understory_event_state::outer::{Containment, OuterInteractionState, ReleaseResult};
//!
//! let mut state = OuterInteractionState::new();
//! state.on_pointer_down();
//! assert!(state.is_pointer_down());
//!
//! let result = state.on_pointer_up(Containment::OUTSIDE);
//! assert_eq!(result, ReleaseResult::Outside);
//! assert!(!state.is_pointer_down());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod outer;
