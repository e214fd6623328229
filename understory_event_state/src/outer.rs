// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outer interaction detection for popup-style widgets.
//!
//! A popup (menu, listbox, dropdown) usually closes when the user releases a
//! pointer or lifts a finger somewhere outside of it. Getting this right
//! requires a little history:
//!
//! - Whether a pointer press is currently in progress. Blur handlers consult
//!   this so that pressing inside the popup (which moves focus away from the
//!   input) does not close it.
//! - Whether the current touch sequence moved. A touch that scrolls the page
//!   should not be treated as a tap outside the popup.
//!
//! ## Release Rules
//!
//! 1. **Pointer up**: outside when neither the release target nor the
//!    focused element lies within the widget.
//! 2. **Touch end**: outside when the release target lies outside the widget
//!    and no touch-move was seen since the last touch-start. The focused
//!    element is not consulted, since touch does not move focus reliably.
//!
//! Whether the popup is open is a widget-level concern; callers combine a
//! [`ReleaseResult::Outside`] with their own open state.
//!
//! ```
//! # use understory_event_state::outer::{Containment, OuterInteractionState, ReleaseResult};
//! let mut state = OuterInteractionState::new();
//!
//! // A touch that moves is a scroll, not a tap.
//! state.on_touch_start();
//! state.on_touch_move();
//! assert_eq!(state.on_touch_end(Containment::OUTSIDE), ReleaseResult::Dragged);
//!
//! // A still touch outside is an outer tap.
//! state.on_touch_start();
//! assert_eq!(state.on_touch_end(Containment::OUTSIDE), ReleaseResult::Outside);
//! ```

/// Containment facts about a release event, answered by the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Containment {
    /// The event target is within the widget (root container or popup).
    pub target_inside: bool,
    /// The currently focused element is within the widget.
    pub focus_inside: bool,
}

impl Containment {
    /// Neither the target nor focus lies within the widget.
    pub const OUTSIDE: Self = Self {
        target_inside: false,
        focus_inside: false,
    };

    /// The event target lies within the widget.
    pub const TARGET_INSIDE: Self = Self {
        target_inside: true,
        focus_inside: false,
    };

    /// Create containment facts from the two flags.
    pub const fn new(target_inside: bool, focus_inside: bool) -> Self {
        Self {
            target_inside,
            focus_inside,
        }
    }
}

/// Result of interpreting a pointer or touch release.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReleaseResult {
    /// The release happened outside the widget.
    Outside,
    /// The release happened inside the widget (or focus is inside it).
    Inside,
    /// A touch sequence moved before it ended; not treated as a tap.
    Dragged,
}

/// Global pointer/touch history for outer interaction detection.
#[derive(Copy, Clone, Debug, Default)]
pub struct OuterInteractionState {
    pointer_down: bool,
    touch_moved: bool,
}

impl OuterInteractionState {
    /// Create a state with no press in progress.
    pub const fn new() -> Self {
        Self {
            pointer_down: false,
            touch_moved: false,
        }
    }

    /// Record a global pointer down.
    pub fn on_pointer_down(&mut self) {
        self.pointer_down = true;
    }

    /// Record a global pointer up and classify it.
    pub fn on_pointer_up(&mut self, containment: Containment) -> ReleaseResult {
        self.pointer_down = false;
        if containment.target_inside || containment.focus_inside {
            ReleaseResult::Inside
        } else {
            tracing::trace!("pointer released outside widget");
            ReleaseResult::Outside
        }
    }

    /// Record the start of a touch sequence.
    pub fn on_touch_start(&mut self) {
        self.touch_moved = false;
    }

    /// Record touch movement.
    pub fn on_touch_move(&mut self) {
        self.touch_moved = true;
    }

    /// Record the end of a touch sequence and classify it.
    ///
    /// Only the target is considered; `containment.focus_inside` is ignored.
    pub fn on_touch_end(&mut self, containment: Containment) -> ReleaseResult {
        if self.touch_moved {
            ReleaseResult::Dragged
        } else if containment.target_inside {
            ReleaseResult::Inside
        } else {
            tracing::trace!("touch ended outside widget");
            ReleaseResult::Outside
        }
    }

    /// Whether a pointer press is currently in progress.
    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Whether the current touch sequence has moved.
    pub fn has_touch_moved(&self) -> bool {
        self.touch_moved
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
