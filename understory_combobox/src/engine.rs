// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transition engine and render-pass lifecycle.
//!
//! ## Transitions
//!
//! All state changes go through [`Combobox::apply_transition`]:
//!
//! 1. Function-form proposals are resolved against the effective state.
//! 2. Proposed input text is reported to `on_input_value_change` right away.
//! 3. The state reducer rewrites the proposal; its output is final.
//! 4. The fields that differ from the effective state form the
//!    [`StateChange`] payload.
//! 5. Fields that are not controlled are written to the internal store.
//! 6. A zero-delay task is scheduled that runs the optional continuation and
//!    then the outward callbacks: state-change, select, change, user-action.
//!
//! Callbacks therefore observe committed state, and [`Combobox::teardown`]
//! can cancel notifications that have not fired yet.
//!
//! ## Render passes
//!
//! The host brackets each render with [`Combobox::begin_pass`] and
//! [`Combobox::commit_pass`]. Between the two it requests prop bundles; item
//! bundles register items for navigation. Committing a pass reconciles a
//! changed controlled selection, scrolls the highlighted item into view when
//! needed, and restarts the status debounce.
//!
//! ## Time
//!
//! The engine never reads a clock. The host reports time with
//! [`Combobox::advance_to`], which fires due tasks and the status update in
//! deadline order; [`Combobox::flush`] runs whatever is due right now.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use understory_event_state::outer::OuterInteractionState;

use crate::config::ComboboxConfig;
use crate::ids::Ids;
use crate::navigation::next_wrapping_index;
use crate::platform::{EventSource, GlobalEvents, Subscription};
use crate::state::{
    ControlledState, State, StateChange, StateChangeType, StatePatch, effective_state,
};
use crate::status::{StatusContext, StatusNotifier};
use crate::timeout::TimeoutRegistry;

/// Work deferred to a later point on the engine clock.
pub type Task<I> = Box<dyn FnOnce(&mut Combobox<I>)>;

/// A proposed transition: a patch, or a function computing one from the
/// effective state.
pub enum Proposal<I> {
    /// A ready patch.
    Patch(StatePatch<I>),
    /// A patch computed from the effective state at application time.
    Compute(Box<dyn FnOnce(&State<I>) -> StatePatch<I>>),
}

impl<I> Proposal<I> {
    /// A function-form proposal.
    pub fn compute(f: impl FnOnce(&State<I>) -> StatePatch<I> + 'static) -> Self {
        Self::Compute(Box::new(f))
    }
}

impl<I> From<StatePatch<I>> for Proposal<I> {
    fn from(patch: StatePatch<I>) -> Self {
        Self::Patch(patch)
    }
}

impl<I: fmt::Debug> fmt::Debug for Proposal<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch(patch) => f.debug_tuple("Patch").field(patch).finish(),
            Self::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// State handed to callbacks.
///
/// A snapshot is a copy. Callbacks receive no handle to the engine and cannot
/// re-enter it; a host that wants to react with another transition does so
/// from its own event loop, or through [`Combobox::schedule`] and the
/// continuation argument of [`Combobox::apply_transition`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<I> {
    /// Instance identifier.
    pub id: String,
    /// Effective state.
    pub state: State<I>,
    /// Navigation bound at the time of the snapshot.
    pub item_count: usize,
}

#[derive(Clone, Debug)]
struct RegisteredItem<I> {
    item: I,
    disabled: bool,
}

/// Headless combobox interaction engine.
///
/// See the [crate documentation](crate) for an overview.
pub struct Combobox<I> {
    pub(crate) config: ComboboxConfig<I>,
    pub(crate) ids: Ids,
    internal: State<I>,
    controlled: ControlledState<I>,
    items: BTreeMap<usize, RegisteredItem<I>>,
    item_count_override: Option<usize>,
    timeouts: TimeoutRegistry<Task<I>>,
    status: StatusNotifier,
    pub(crate) outer: OuterInteractionState,
    pub(crate) avoid_scrolling: bool,
    previous_state: Option<State<I>>,
    previous_controlled_selection: Option<Option<I>>,
    committed_once: bool,
    subscription: Option<Subscription>,
}

impl<I: Clone + PartialEq + 'static> Combobox<I> {
    /// Create an engine, resolving identifiers from `config`.
    ///
    /// The initial state is closed (unless `default_is_open`), highlighted at
    /// `default_highlighted_index`, with no selection and empty input.
    pub fn new(mut config: ComboboxConfig<I>) -> Self {
        let ids = Ids::resolve(
            config.id.take(),
            config.menu_id.take(),
            config.label_id.take(),
            config.input_id.take(),
            config.item_id.take(),
        );
        let internal = State {
            is_open: config.default_is_open,
            highlighted_index: config.default_highlighted_index,
            ..State::default()
        };
        let status = StatusNotifier::new(config.status_debounce);
        tracing::debug!(id = %ids.id, "created combobox");
        Self {
            config,
            ids,
            internal,
            controlled: ControlledState::default(),
            items: BTreeMap::new(),
            item_count_override: None,
            timeouts: TimeoutRegistry::new(),
            status,
            outer: OuterInteractionState::new(),
            avoid_scrolling: false,
            previous_state: None,
            previous_controlled_selection: None,
            committed_once: false,
            subscription: None,
        }
    }

    /// Resolved identifiers.
    pub fn ids(&self) -> &Ids {
        &self.ids
    }

    /// Instance identifier.
    pub fn id(&self) -> &str {
        &self.ids.id
    }

    /// The configuration.
    pub fn config(&self) -> &ComboboxConfig<I> {
        &self.config
    }

    /// Mutable access to the configuration.
    ///
    /// Identifier fields are ignored after construction.
    pub fn config_mut(&mut self) -> &mut ComboboxConfig<I> {
        &mut self.config
    }

    /// The effective state: controlled values over the internal store.
    pub fn state(&self) -> State<I> {
        effective_state(&self.internal, &self.controlled)
    }

    /// The internal store, without controlled values applied.
    ///
    /// Useful for inspecting what the engine holds on behalf of the host.
    pub fn internal_state(&self) -> &State<I> {
        &self.internal
    }

    /// Controlled values supplied for the current pass.
    pub fn controlled(&self) -> &ControlledState<I> {
        &self.controlled
    }

    /// Snapshot of the effective state for callbacks.
    pub fn snapshot(&self) -> Snapshot<I> {
        self.snapshot_of(self.state())
    }

    fn snapshot_of(&self, state: State<I>) -> Snapshot<I> {
        Snapshot {
            id: self.ids.id.clone(),
            state,
            item_count: self.item_count(),
        }
    }

    // --- Time ------------------------------------------------------------

    /// Current time on the engine clock.
    pub fn now(&self) -> u64 {
        self.timeouts.now()
    }

    /// Number of scheduled tasks that have not fired.
    pub fn pending_tasks(&self) -> usize {
        self.timeouts.len()
    }

    /// Whether a status update is waiting for its debounce window.
    pub fn has_pending_status(&self) -> bool {
        self.status.debounce().deadline().is_some()
    }

    /// Schedule `task` to run `delay` time units from now.
    ///
    /// Tasks are cancelled by [`teardown`](Self::teardown).
    pub fn schedule(&mut self, task: impl FnOnce(&mut Self) + 'static, delay: u64) {
        self.timeouts.schedule(Box::new(task), delay);
    }

    /// Advance the clock to `now`, running due tasks and the status update in
    /// deadline order.
    ///
    /// Tasks scheduled while advancing run in the same call if they become
    /// due by `now`.
    pub fn advance_to(&mut self, now: u64) {
        loop {
            let task_due = self.timeouts.next_deadline().filter(|&at| at <= now);
            let status_due = self.status.debounce().deadline().filter(|&at| at <= now);
            match (task_due, status_due) {
                (Some(task_at), Some(status_at)) if status_at < task_at => {
                    self.run_status_at(status_at);
                }
                (Some(task_at), _) => {
                    self.timeouts.advance_to(task_at);
                    if let Some(task) = self.timeouts.pop_due() {
                        task(self);
                    }
                }
                (None, Some(status_at)) => self.run_status_at(status_at),
                (None, None) => break,
            }
        }
        self.timeouts.advance_to(now);
    }

    /// Run everything that is due at the current time.
    pub fn flush(&mut self) {
        self.advance_to(self.now());
    }

    fn run_status_at(&mut self, at: u64) {
        self.timeouts.advance_to(at);
        if self.status.take_due(at) {
            self.update_status();
        }
    }

    /// Build and publish the status message now.
    ///
    /// Normally called by the debounce; exposed for hosts that announce on
    /// their own schedule.
    pub fn update_status(&mut self) -> String {
        let state = self.state();
        let result_count = self.item_count();
        let highlighted_item = state
            .highlighted_index
            .and_then(|index| self.items.get(&index))
            .map(|registered| &registered.item);
        let ctx = StatusContext {
            is_open: state.is_open,
            selected_item: state.selected_item.as_ref(),
            highlighted_item,
            result_count,
            previous_result_count: 0,
            item_to_string: &*self.config.item_to_string,
        };
        self.status.update(
            ctx,
            &*self.config.status_message,
            &mut *self.config.status_sink,
        )
    }

    // --- Lifecycle -------------------------------------------------------

    /// Subscribe to global events through `source`.
    ///
    /// An existing subscription is released first.
    pub fn activate(&mut self, source: impl EventSource + 'static) {
        if let Some(mut previous) = self.subscription.take() {
            previous.release();
        }
        self.subscription = Some(Subscription::new(
            Box::new(source),
            GlobalEvents::OUTER_INTERACTION,
        ));
    }

    /// Whether a global event subscription is active.
    pub fn is_active(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Cancel all pending tasks and the pending status update, and release
    /// the global event subscription.
    ///
    /// Nothing scheduled before teardown fires afterwards.
    pub fn teardown(&mut self) {
        tracing::debug!(
            id = %self.ids.id,
            pending = self.timeouts.len(),
            "tearing down combobox"
        );
        self.timeouts.cancel_all();
        self.status.cancel();
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        self.outer.clear();
        self.avoid_scrolling = false;
    }

    /// Start a render pass: clear item registrations and take this pass's
    /// controlled values.
    pub fn begin_pass(&mut self, controlled: ControlledState<I>) {
        self.items.clear();
        self.controlled = controlled;
    }

    /// Finish a render pass.
    ///
    /// - A controlled selection that changed since the previous pass sets the
    ///   input text to its display string.
    /// - The highlighted item is scrolled into view when the highlight moved,
    ///   or the menu just opened with a highlight, unless hover suppression
    ///   is active.
    /// - The status debounce restarts.
    pub fn commit_pass(&mut self) {
        let controlled_selection = self.controlled.selected_item.clone();
        if let Some(selected) = &controlled_selection {
            let previous = if self.committed_once {
                self.previous_controlled_selection.clone().flatten()
            } else {
                selected.clone()
            };
            if (self.config.selected_item_changed)(previous.as_ref(), selected.as_ref()) {
                let input_value = self.config.display(selected.as_ref());
                self.apply_transition(
                    StatePatch::of_kind(StateChangeType::ControlledPropUpdatedSelectedItem)
                        .input_value(input_value),
                    None,
                );
            }
        }
        self.previous_controlled_selection = controlled_selection;

        let state = self.state();
        if !self.avoid_scrolling && self.should_scroll(&state) {
            self.scroll_highlighted_into_view(&state);
        }
        self.previous_state = Some(state);
        self.committed_once = true;

        self.status
            .debounce_mut()
            .set_window(self.config.status_debounce);
        self.status.schedule(self.now());
    }

    fn should_scroll(&self, state: &State<I>) -> bool {
        let Some(previous) = &self.previous_state else {
            return false;
        };
        let just_opened = state.highlighted_index.is_some() && state.is_open && !previous.is_open;
        let navigated = state.highlighted_index != previous.highlighted_index;
        just_opened || navigated
    }

    fn scroll_highlighted_into_view(&mut self, state: &State<I>) {
        let Some(index) = state.highlighted_index else {
            return;
        };
        if self.item(index).is_none() {
            return;
        }
        let item_id = self.ids.item_id(index);
        tracing::trace!(%item_id, "scrolling highlighted item into view");
        self.config
            .scroller
            .scroll_into_view(&item_id, &self.ids.menu_id);
    }

    // --- Items -----------------------------------------------------------

    /// Register `item` for this pass and return its index.
    ///
    /// With `index` the item is placed at that position; otherwise it is
    /// placed after the highest registered index. Registrations are sparse,
    /// so a large explicit index costs no more than a small one.
    pub fn register_item(&mut self, item: I, index: Option<usize>, disabled: bool) -> usize {
        let index = index.unwrap_or_else(|| self.registered_slots());
        self.items.insert(index, RegisteredItem { item, disabled });
        index
    }

    /// One past the highest registered index, saturating at `usize::MAX`.
    fn registered_slots(&self) -> usize {
        self.items
            .last_key_value()
            .map_or(0, |(&index, _)| index.saturating_add(1))
    }

    /// The item registered at `index` in the current pass.
    pub fn item(&self, index: usize) -> Option<&I> {
        self.items.get(&index).map(|registered| &registered.item)
    }

    /// Whether the item registered at `index` is disabled.
    pub fn is_item_disabled(&self, index: usize) -> bool {
        self.items
            .get(&index)
            .is_some_and(|registered| registered.disabled)
    }

    /// Drop every item registration.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Navigation bound: the runtime override, else the configured count,
    /// else one past the highest registered index.
    pub fn item_count(&self) -> usize {
        self.item_count_override
            .or(self.config.item_count)
            .unwrap_or_else(|| self.registered_slots())
    }

    /// Override the navigation bound at runtime.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count_override = Some(count);
    }

    /// Remove the runtime navigation bound override.
    pub fn unset_item_count(&mut self) {
        self.item_count_override = None;
    }

    // --- Transition engine -----------------------------------------------

    /// Apply a transition; see the [module docs](self) for the steps.
    ///
    /// `on_applied` runs once the transition's notification task fires,
    /// before the callbacks.
    pub fn apply_transition(
        &mut self,
        proposal: impl Into<Proposal<I>>,
        on_applied: Option<Task<I>>,
    ) {
        let current = self.state();
        let proposed = match proposal.into() {
            Proposal::Patch(patch) => patch,
            Proposal::Compute(compute) => compute(&current),
        };

        if let Some(value) = &proposed.input_value {
            let snapshot = self.snapshot_of(current.with_patch(&proposed));
            (self.config.on_input_value_change)(value, &snapshot);
        }

        let reduced = (self.config.state_reducer)(&current, proposed);
        let kind = reduced.change_type();
        let changed = reduced.differing_fields(&current);
        let selection_changed = reduced.selected_item.as_ref().is_some_and(|next| {
            (self.config.selected_item_changed)(current.selected_item.as_ref(), next.as_ref())
        });
        let selected = reduced.selected_item.clone();
        let change = StateChange {
            kind,
            changes: reduced.clone().only(changed),
        };

        self.internal
            .apply(&reduced.without(self.controlled.fields()));
        tracing::trace!(%kind, ?changed, "applied transition");

        self.schedule(
            move |combobox| combobox.notify(&change, selection_changed, selected, on_applied),
            0,
        );
    }

    /// Apply a transition without a continuation.
    pub fn set_state(&mut self, proposal: impl Into<Proposal<I>>) {
        self.apply_transition(proposal, None);
    }

    fn notify(
        &mut self,
        change: &StateChange<I>,
        selection_changed: bool,
        selected: Option<Option<I>>,
        on_applied: Option<Task<I>>,
    ) {
        if let Some(on_applied) = on_applied {
            on_applied(self);
        }
        let snapshot = self.snapshot();
        if !change.is_empty() {
            (self.config.on_state_change)(change, &snapshot);
        }
        if selection_changed {
            (self.config.on_select)(selected.as_ref().and_then(Option::as_ref), &snapshot);
        }
        if let Some(item) = &change.changes.selected_item {
            (self.config.on_change)(item.as_ref(), &snapshot);
        }
        (self.config.on_user_action)(change, &snapshot);
    }

    // --- Helper actions --------------------------------------------------

    /// Close and restore defaults, keeping the selection and setting the
    /// input text to its display string. `other` overrides any field.
    pub fn reset(&mut self, other: StatePatch<I>) {
        let current = self.state();
        let patch = StatePatch::new()
            .is_open(self.config.default_is_open)
            .highlighted_index(self.config.default_highlighted_index)
            .input_value(self.config.display(current.selected_item.as_ref()))
            .merge(other);
        self.apply_transition(patch, None);
    }

    /// Open the menu.
    pub fn open_menu(&mut self) {
        self.apply_transition(StatePatch::new().is_open(true), None);
    }

    /// Close the menu.
    pub fn close_menu(&mut self) {
        self.apply_transition(StatePatch::new().is_open(false), None);
    }

    /// Flip the open state; closing also restores the default highlight.
    ///
    /// When the result is open, items exist and a highlight was proposed
    /// (through `other`), that highlight is applied again after the toggle
    /// commits.
    pub fn toggle_menu(&mut self, other: StatePatch<I>) {
        let current = self.state();
        let mut patch = StatePatch::new().is_open(!current.is_open);
        if current.is_open {
            patch = patch.highlighted_index(self.config.default_highlighted_index);
        }
        let patch = patch.merge(other.clone());
        let opened = patch.is_open == Some(true);
        let highlight = patch.highlighted_index.flatten();

        self.apply_transition(
            patch,
            Some(Box::new(move |combobox: &mut Self| {
                if let (true, Some(index)) = (opened, highlight) {
                    if combobox.item_count() > 0 {
                        combobox.set_highlighted_index(Some(index), other);
                    }
                }
            })),
        );
    }

    /// Commit `item` as the selection, close, and restore the default
    /// highlight.
    pub fn select_item(&mut self, item: Option<I>, other: StatePatch<I>) {
        let input_value = self.config.display(item.as_ref());
        let patch = StatePatch::new()
            .is_open(self.config.default_is_open)
            .highlighted_index(self.config.default_highlighted_index)
            .selected_item(item)
            .input_value(input_value)
            .merge(other);
        self.apply_transition(patch, None);
    }

    /// Select the item registered at `index`.
    ///
    /// Does nothing when no item is registered there or it is disabled.
    pub fn select_item_at_index(&mut self, index: usize, other: StatePatch<I>) {
        if self.is_item_disabled(index) {
            return;
        }
        let Some(item) = self.item(index).cloned() else {
            return;
        };
        self.select_item(Some(item), other);
    }

    /// Select the highlighted item, if any.
    pub fn select_highlighted_item(&mut self, other: StatePatch<I>) {
        if let Some(index) = self.state().highlighted_index {
            self.select_item_at_index(index, other);
        }
    }

    /// Set the highlight.
    pub fn set_highlighted_index(&mut self, index: Option<usize>, other: StatePatch<I>) {
        self.apply_transition(StatePatch::new().highlighted_index(index).merge(other), None);
    }

    /// Move the highlight by `amount` with wrap-around.
    ///
    /// Does nothing when there are no items.
    pub fn move_highlighted_index(&mut self, amount: isize, other: StatePatch<I>) {
        let next = next_wrapping_index(
            amount,
            self.state().highlighted_index,
            self.item_count(),
        );
        if let Some(next) = next {
            self.set_highlighted_index(Some(next), other);
        }
    }

    /// Clear the selection and input text and restore the default open state
    /// and highlight.
    pub fn clear_selection(&mut self) {
        let patch = StatePatch::new()
            .selected_item(None)
            .input_value("")
            .highlighted_index(self.config.default_highlighted_index)
            .is_open(self.config.default_is_open);
        self.apply_transition(patch, None);
    }
}

impl<I: fmt::Debug> fmt::Debug for Combobox<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combobox")
            .field("ids", &self.ids)
            .field("internal", &self.internal)
            .field("controlled", &self.controlled)
            .field("items", &self.items)
            .field("item_count_override", &self.item_count_override)
            .field("timeouts", &self.timeouts)
            .field("status", &self.status)
            .field("outer", &self.outer)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use crate::state::Fields;
    use crate::status::StatusSink;

    type Log = Rc<RefCell<Vec<String>>>;

    struct SharedSink(Log);

    impl StatusSink for SharedSink {
        fn publish(&mut self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn recording_config(log: &Log) -> ComboboxConfig<&'static str> {
        let on_state = log.clone();
        let on_select = log.clone();
        let on_change = log.clone();
        let on_action = log.clone();
        let on_input = log.clone();
        ComboboxConfig::default()
            .with_id("test")
            .on_state_change(move |change, _| {
                on_state
                    .borrow_mut()
                    .push(alloc::format!("state:{}", change.kind));
            })
            .on_select(move |item, _| {
                on_select
                    .borrow_mut()
                    .push(alloc::format!("select:{}", item.unwrap_or(&"-")));
            })
            .on_change(move |item, _| {
                on_change
                    .borrow_mut()
                    .push(alloc::format!("change:{}", item.unwrap_or(&"-")));
            })
            .on_user_action(move |_, _| on_action.borrow_mut().push("action".to_string()))
            .on_input_value_change(move |value, _| {
                on_input.borrow_mut().push(alloc::format!("input:{value}"));
            })
    }

    fn register(combobox: &mut Combobox<&'static str>, items: &[&'static str]) {
        combobox.begin_pass(ControlledState::default());
        for &item in items {
            combobox.register_item(item, None, false);
        }
        combobox.commit_pass();
    }

    #[test]
    fn initial_state_uses_defaults() {
        let combobox = Combobox::new(
            ComboboxConfig::<&str>::default()
                .with_default_is_open(true)
                .with_default_highlighted_index(Some(1)),
        );

        let state = combobox.state();
        assert!(state.is_open);
        assert_eq!(state.highlighted_index, Some(1));
        assert_eq!(state.selected_item, None);
        assert_eq!(state.input_value, "");
    }

    #[test]
    fn notifications_are_deferred_until_flush() {
        let log = Log::default();
        let mut combobox = Combobox::new(recording_config(&log));

        combobox.open_menu();
        assert!(combobox.state().is_open);
        assert!(log.borrow().is_empty());
        assert_eq!(combobox.pending_tasks(), 1);

        combobox.flush();
        assert_eq!(
            *log.borrow(),
            vec!["state:__use-downshift_unknown__", "action"]
        );
    }

    #[test]
    fn selection_fires_select_then_change() {
        let log = Log::default();
        let mut combobox = Combobox::new(recording_config(&log));

        combobox.select_item(Some("apple"), StatePatch::new());
        // Input text is reported immediately, before reduction.
        assert_eq!(*log.borrow(), vec!["input:apple"]);

        combobox.flush();
        assert_eq!(
            *log.borrow(),
            vec![
                "input:apple",
                "state:__use-downshift_unknown__",
                "select:apple",
                "change:apple",
                "action"
            ]
        );
    }

    #[test]
    fn reselecting_the_current_item_does_not_fire_select() {
        let log = Log::default();
        let mut combobox = Combobox::new(recording_config(&log));
        combobox.select_item(Some("apple"), StatePatch::new());
        combobox.flush();
        log.borrow_mut().clear();

        combobox.select_item(Some("apple"), StatePatch::new());
        combobox.flush();

        assert!(!log.borrow().iter().any(|entry| entry.starts_with("select:")));
        assert!(!log.borrow().iter().any(|entry| entry.starts_with("change:")));
    }

    #[test]
    fn custom_selection_predicate_decides_select() {
        let log = Log::default();
        // Items are equal when their first letter matches.
        let mut combobox = Combobox::new(recording_config(&log).with_selected_item_changed(
            |previous: Option<&&'static str>, next: Option<&&'static str>| {
                previous.map(|item| item.chars().next()) != next.map(|item| item.chars().next())
            },
        ));
        combobox.select_item(Some("apple"), StatePatch::new());
        combobox.flush();
        log.borrow_mut().clear();

        combobox.select_item(Some("avocado"), StatePatch::new());
        combobox.flush();
        assert!(!log.borrow().iter().any(|entry| entry.starts_with("select:")));
        // The value still changed, so `on_change` reports it.
        assert!(log.borrow().contains(&"change:avocado".to_string()));

        combobox.select_item(Some("banana"), StatePatch::new());
        combobox.flush();
        assert!(log.borrow().contains(&"select:banana".to_string()));
    }

    #[test]
    fn status_debounce_follows_config_changes() {
        let published = Log::default();
        let mut combobox = Combobox::new(
            ComboboxConfig::<&str>::default()
                .with_default_is_open(true)
                .with_status_sink(SharedSink(published.clone())),
        );
        combobox.config_mut().status_debounce = 50;

        register(&mut combobox, &["a"]);
        combobox.advance_to(49);
        assert!(published.borrow().is_empty());
        combobox.advance_to(50);

        assert_eq!(published.borrow().len(), 1);
    }

    #[test]
    fn unchanged_transition_only_reports_user_action() {
        let log = Log::default();
        let mut combobox = Combobox::new(recording_config(&log));

        combobox.close_menu();
        combobox.flush();

        assert_eq!(*log.borrow(), vec!["action"]);
    }

    #[test]
    fn reducer_output_is_authoritative() {
        let mut combobox = Combobox::new(
            ComboboxConfig::<&str>::default().with_state_reducer(|_, mut proposed| {
                // Keep the menu open no matter what.
                if proposed.is_open == Some(false) {
                    proposed.is_open = None;
                }
                proposed
            }),
        );

        combobox.open_menu();
        combobox.close_menu();
        combobox.flush();

        assert!(combobox.state().is_open);
    }

    #[test]
    fn controlled_fields_are_not_written_internally() {
        let changes: Rc<RefCell<Vec<Fields>>> = Rc::default();
        let sink = changes.clone();
        let mut combobox = Combobox::new(
            ComboboxConfig::<&str>::default()
                .on_state_change(move |change, _| sink.borrow_mut().push(change.fields())),
        );
        combobox.begin_pass(ControlledState::default().with_is_open(false));

        combobox.apply_transition(StatePatch::new().is_open(true).input_value("x"), None);
        combobox.flush();

        assert!(!combobox.internal_state().is_open);
        assert_eq!(combobox.internal_state().input_value, "x");
        assert!(!combobox.state().is_open);
        // The proposed value is still reported.
        assert_eq!(
            *changes.borrow(),
            vec![Fields::IS_OPEN | Fields::INPUT_VALUE]
        );
    }

    #[test]
    fn function_proposals_resolve_against_effective_state() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.begin_pass(ControlledState::default().with_is_open(true));

        combobox.set_state(Proposal::compute(|state: &State<&'static str>| {
            StatePatch::new().input_value(if state.is_open { "open" } else { "closed" })
        }));

        assert_eq!(combobox.state().input_value, "open");
    }

    #[test]
    fn continuation_runs_before_callbacks() {
        let log = Log::default();
        let mut combobox = Combobox::new(recording_config(&log));
        let marker = log.clone();

        combobox.apply_transition(
            StatePatch::new().is_open(true),
            Some(Box::new(move |_: &mut Combobox<&'static str>| {
                marker.borrow_mut().push("continued".to_string());
            })),
        );
        combobox.flush();

        assert_eq!(log.borrow()[0], "continued");
    }

    #[test]
    fn select_item_at_unregistered_index_is_a_no_op() {
        let log = Log::default();
        let mut combobox = Combobox::new(recording_config(&log));
        register(&mut combobox, &["a"]);

        combobox.select_item_at_index(5, StatePatch::new());

        assert_eq!(combobox.pending_tasks(), 0);
        assert_eq!(combobox.state().selected_item, None);
    }

    #[test]
    fn disabled_items_cannot_be_selected() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.begin_pass(ControlledState::default());
        combobox.register_item("a", None, true);
        combobox.commit_pass();

        combobox.select_item_at_index(0, StatePatch::new());

        assert_eq!(combobox.state().selected_item, None);
    }

    #[test]
    fn item_count_override_precedence() {
        let mut combobox =
            Combobox::new(ComboboxConfig::<&str>::default().with_item_count(Some(10)));
        register(&mut combobox, &["a", "b"]);
        assert_eq!(combobox.item_count(), 10);

        combobox.set_item_count(3);
        assert_eq!(combobox.item_count(), 3);

        combobox.unset_item_count();
        combobox.config_mut().item_count = None;
        assert_eq!(combobox.item_count(), 2);
    }

    #[test]
    fn explicit_index_registration_fills_gaps() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.begin_pass(ControlledState::default());

        assert_eq!(combobox.register_item("c", Some(2), false), 2);
        assert_eq!(combobox.register_item("a", Some(0), false), 0);

        assert_eq!(combobox.item_count(), 3);
        assert_eq!(combobox.item(1), None);
        assert_eq!(combobox.item(2), Some(&"c"));
    }

    #[test]
    fn huge_explicit_index_registers_sparsely() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.begin_pass(ControlledState::default());

        let far = usize::MAX / 2;
        assert_eq!(combobox.register_item("far", Some(far), false), far);
        assert_eq!(combobox.item_count(), far + 1);
        assert_eq!(combobox.register_item("next", None, false), far + 1);

        assert_eq!(combobox.register_item("last", Some(usize::MAX), false), usize::MAX);
        assert_eq!(combobox.item(usize::MAX), Some(&"last"));
        assert_eq!(combobox.item_count(), usize::MAX);
        assert_eq!(combobox.item(0), None);
    }

    #[test]
    fn begin_pass_clears_registrations() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        register(&mut combobox, &["a", "b", "c"]);
        assert_eq!(combobox.item_count(), 3);

        combobox.begin_pass(ControlledState::default());
        assert_eq!(combobox.item_count(), 0);
    }

    #[test]
    fn controlled_selection_change_updates_input() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.begin_pass(ControlledState::default().with_selected_item(None));
        combobox.commit_pass();
        assert_eq!(combobox.state().input_value, "");

        combobox.begin_pass(ControlledState::default().with_selected_item(Some("pear")));
        combobox.commit_pass();
        assert_eq!(combobox.state().input_value, "pear");
        assert_eq!(combobox.internal_state().selected_item, None);
    }

    #[test]
    fn first_controlled_pass_does_not_rewrite_input() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.begin_pass(ControlledState::default().with_selected_item(Some("pear")));
        combobox.commit_pass();

        assert_eq!(combobox.state().input_value, "");
        assert_eq!(combobox.pending_tasks(), 0);
    }

    #[test]
    fn toggle_menu_resets_highlight_when_closing() {
        let mut combobox = Combobox::new(
            ComboboxConfig::<&str>::default().with_default_highlighted_index(Some(0)),
        );
        register(&mut combobox, &["a", "b"]);

        combobox.toggle_menu(StatePatch::new());
        combobox.flush();
        assert!(combobox.state().is_open);

        combobox.set_highlighted_index(Some(1), StatePatch::new());
        combobox.toggle_menu(StatePatch::new());
        combobox.flush();

        let state = combobox.state();
        assert!(!state.is_open);
        assert_eq!(state.highlighted_index, Some(0));
    }

    #[test]
    fn toggle_menu_reapplies_proposed_highlight() {
        let highlights: Rc<RefCell<Vec<StateChangeType>>> = Rc::default();
        let sink = highlights.clone();
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default().on_state_change(
            move |change, _| {
                if change.fields().contains(Fields::HIGHLIGHTED_INDEX) {
                    sink.borrow_mut().push(change.kind);
                }
            },
        ));
        register(&mut combobox, &["a", "b"]);

        combobox.toggle_menu(StatePatch::new().highlighted_index(Some(1)));
        combobox.flush();

        assert_eq!(combobox.state().highlighted_index, Some(1));
        // Only the toggle itself changed the highlight; the re-application is
        // a no-op diff.
        assert_eq!(highlights.borrow().len(), 1);
        assert_eq!(combobox.pending_tasks(), 0);
    }

    #[test]
    fn clear_selection_restores_defaults() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.select_item(Some("a"), StatePatch::new().is_open(true));
        assert!(combobox.state().is_open);

        combobox.clear_selection();

        let state = combobox.state();
        assert_eq!(state.selected_item, None);
        assert_eq!(state.input_value, "");
        assert!(!state.is_open);
    }

    #[test]
    fn teardown_cancels_pending_notifications() {
        let log = Log::default();
        let mut combobox = Combobox::new(recording_config(&log));
        register(&mut combobox, &["a"]);
        combobox.select_item(Some("a"), StatePatch::new());
        log.borrow_mut().clear();

        combobox.teardown();
        combobox.advance_to(10_000);

        assert!(log.borrow().is_empty());
        assert!(!combobox.has_pending_status());
        assert_eq!(combobox.pending_tasks(), 0);
    }

    #[test]
    fn scheduled_tasks_respect_delay() {
        let mut combobox = Combobox::new(ComboboxConfig::<&str>::default());
        combobox.schedule(|c| c.open_menu(), 100);

        combobox.advance_to(99);
        assert!(!combobox.state().is_open);

        combobox.advance_to(100);
        assert!(combobox.state().is_open);
    }
}
