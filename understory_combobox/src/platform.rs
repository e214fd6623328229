// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary traits toward the host platform.
//!
//! The engine never touches a platform directly. Instead the host provides:
//!
//! - a [`FocusProbe`] that reports the currently focused element, consulted
//!   by deferred blur checks and outer-click detection;
//! - a [`ScrollIntoView`] collaborator that brings the highlighted item into
//!   view inside the menu;
//! - an [`EventSource`] that delivers global pointer and touch events to the
//!   engine while a [`Subscription`] is alive.
//!
//! Every trait has a no-op implementation so hosts only wire up what they
//! support.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

bitflags::bitflags! {
    /// Global (window-level) events the engine listens to.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GlobalEvents: u8 {
        /// Pointer (mouse) button pressed anywhere.
        const POINTER_DOWN = 1 << 0;
        /// Pointer (mouse) button released anywhere.
        const POINTER_UP = 1 << 1;
        /// Touch sequence started anywhere.
        const TOUCH_START = 1 << 2;
        /// Touch moved anywhere.
        const TOUCH_MOVE = 1 << 3;
        /// Touch sequence ended anywhere.
        const TOUCH_END = 1 << 4;
    }
}

impl GlobalEvents {
    /// The events needed for outer interaction detection.
    pub const OUTER_INTERACTION: Self = Self::all();
}

/// Description of the currently focused element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusedElement {
    /// The element's identifier, if it has one.
    pub id: Option<String>,
    /// The element carries the toggle-control marker (`data-toggle`).
    pub is_toggle: bool,
    /// The element lies within the widget's root container or menu.
    pub within_widget: bool,
}

impl FocusedElement {
    /// A focused element with the given id inside the widget.
    pub fn inside(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            is_toggle: false,
            within_widget: true,
        }
    }

    /// A focused element with the given id outside the widget.
    pub fn outside(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            is_toggle: false,
            within_widget: false,
        }
    }

    /// The widget's own toggle control.
    pub fn toggle_button() -> Self {
        Self {
            id: None,
            is_toggle: true,
            within_widget: true,
        }
    }

    /// Whether this is the toggle control of the widget it is inside.
    pub fn is_widget_toggle(&self) -> bool {
        self.is_toggle && self.within_widget
    }
}

/// Reports which element currently holds focus.
pub trait FocusProbe {
    /// The focused element, or `None` when focus is on the document body or
    /// nowhere.
    fn active_element(&self) -> Option<FocusedElement>;
}

/// A probe that always reports no focused element.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoFocus;

impl FocusProbe for NoFocus {
    fn active_element(&self) -> Option<FocusedElement> {
        None
    }
}

/// Scrolls an item into view within the menu.
///
/// Geometry is the host's concern; the engine only decides *when* to scroll.
pub trait ScrollIntoView {
    /// Bring the element `item_id` into view inside the menu `menu_id`.
    fn scroll_into_view(&mut self, item_id: &str, menu_id: &str);
}

/// A scroller that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoScroll;

impl ScrollIntoView for NoScroll {
    fn scroll_into_view(&mut self, _item_id: &str, _menu_id: &str) {}
}

/// Host-side delivery of global events.
///
/// `subscribe` is called once on activation and `unsubscribe` once on
/// release, with the same event set. After `unsubscribe` the host must stop
/// delivering events to the engine.
pub trait EventSource {
    /// Start delivering `events`.
    fn subscribe(&mut self, events: GlobalEvents);
    /// Stop delivering `events`.
    fn unsubscribe(&mut self, events: GlobalEvents);
}

/// Scoped subscription to global events.
///
/// Created by [`Subscription::new`], which subscribes immediately; released
/// by [`Subscription::release`] or on drop, whichever comes first. Release
/// happens exactly once.
pub struct Subscription {
    source: Option<Box<dyn EventSource>>,
    events: GlobalEvents,
}

impl Subscription {
    /// Subscribe `source` to `events`.
    pub fn new(mut source: Box<dyn EventSource>, events: GlobalEvents) -> Self {
        source.subscribe(events);
        tracing::debug!(?events, "subscribed to global events");
        Self {
            source: Some(source),
            events,
        }
    }

    /// The subscribed events.
    pub fn events(&self) -> GlobalEvents {
        self.events
    }

    /// Whether the subscription is still active.
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Unsubscribe now. Later calls, and the eventual drop, do nothing.
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.unsubscribe(self.events);
            tracing::debug!(events = ?self.events, "released global events");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
