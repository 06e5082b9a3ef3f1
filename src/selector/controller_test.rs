use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use super::*;
use crate::config::SENTINEL_LABEL;

type Response = Result<Vec<ChildOption>, LookupError>;

// =============================================================
// Fakes
// =============================================================

/// In-memory `<select>`; clones share state so tests can poke the control
/// the controller owns.
#[derive(Clone, Default)]
struct FakeSelect {
    value: Rc<RefCell<String>>,
    options: Rc<RefCell<Vec<ChildOption>>>,
    disabled: Rc<Cell<bool>>,
    installed: Rc<RefCell<Vec<Vec<String>>>>,
}

impl FakeSelect {
    fn with_value(value: &str) -> Self {
        let select = Self::default();
        select.set_value(value);
        select
    }

    fn with_options(labels: &[(&str, &str)]) -> Self {
        let select = Self::default();
        *select.options.borrow_mut() = labels.iter().map(|(id, name)| ChildOption::new(*id, *name)).collect();
        select
    }

    fn labels(&self) -> Vec<String> {
        self.options.borrow().iter().map(|o| o.display_name.clone()).collect()
    }

    fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    fn installed(&self) -> Vec<Vec<String>> {
        self.installed.borrow().clone()
    }
}

impl SelectControl for FakeSelect {
    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn replace_options(&self, options: &ChildOptionList) {
        // A browser selects the first option after the list is replaced.
        *self.value.borrow_mut() = options.options().first().map(|o| o.id.clone()).unwrap_or_default();
        *self.options.borrow_mut() = options.options().to_vec();
        self.installed
            .borrow_mut()
            .push(options.labels().into_iter().map(str::to_owned).collect());
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_owned();
    }
}

/// Lookup that answers immediately from a fixed table.
#[derive(Clone, Default)]
struct MapLookup {
    responses: Rc<RefCell<HashMap<String, Response>>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MapLookup {
    fn respond(self, parent: &str, response: Response) -> Self {
        self.responses.borrow_mut().insert(parent.to_owned(), response);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl SubcategoryLookup for MapLookup {
    async fn fetch_children(&self, parent: &ParentId) -> Response {
        self.requests.borrow_mut().push(parent.to_string());
        self.responses
            .borrow()
            .get(parent.as_str())
            .cloned()
            .unwrap_or_else(|| Err(LookupError::NetworkFailure("no route".to_owned())))
    }
}

/// Lookup whose requests stay pending until the test releases them.
#[derive(Clone, Default)]
struct GatedLookup {
    pending: Rc<RefCell<Vec<(String, oneshot::Sender<Response>)>>>,
}

impl GatedLookup {
    fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    fn release(&self, parent: &str, response: Response) {
        let sender = {
            let mut pending = self.pending.borrow_mut();
            let index = pending.iter().position(|(p, _)| p == parent).unwrap();
            pending.remove(index).1
        };
        sender.send(response).unwrap();
    }
}

impl SubcategoryLookup for GatedLookup {
    async fn fetch_children(&self, parent: &ParentId) -> Response {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push((parent.to_string(), tx));
        rx.await
            .unwrap_or_else(|_| Err(LookupError::NetworkFailure("request dropped".to_owned())))
    }
}

fn food_children() -> Vec<ChildOption> {
    vec![ChildOption::new("10", "Groceries"), ChildOption::new("11", "Dining")]
}

fn transport_children() -> Vec<ChildOption> {
    vec![ChildOption::new("20", "Fuel"), ChildOption::new("21", "Bus")]
}

fn attach<L: SubcategoryLookup + 'static>(
    parent: &FakeSelect,
    child: &FakeSelect,
    lookup: L,
) -> DependentSelector<FakeSelect, FakeSelect, L> {
    DependentSelector::attach(parent.clone(), child.clone(), lookup, ChildOption::sentinel(SENTINEL_LABEL))
}

fn parent_id(value: &str) -> ParentId {
    ParentId::parse(value).unwrap()
}

// =============================================================
// Attach
// =============================================================

#[test]
fn attach_with_empty_parent_clears_stale_child_options() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::with_options(&[("99", "Leftover")]);

    let selector = attach(&parent, &child, MapLookup::default());

    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::DisabledEmpty);
}

/// Edit form markup: parent pre-selected, child disabled and listing the
/// subcategories of every parent, with the saved subcategory selected.
fn edit_form_child() -> FakeSelect {
    let child = FakeSelect::with_options(&[("", SENTINEL_LABEL), ("10", "Groceries"), ("20", "Fuel")]);
    child.set_disabled(true);
    child.set_value("10");
    child
}

#[test]
fn attach_with_selected_parent_waits_for_sync() {
    let parent = FakeSelect::with_value("1");
    let child = edit_form_child();
    let lookup = MapLookup::default().respond("1", Ok(food_children()));

    let selector = attach(&parent, &child, lookup.clone());

    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert!(lookup.requests().is_empty());
    assert_eq!(selector.state(), ChildControlState::DisabledEmpty);
    assert_eq!(selector.parent_value(), "1");
}

#[test]
fn sync_with_selected_parent_loads_children_and_restores_selection() {
    let parent = FakeSelect::with_value("1");
    let child = edit_form_child();
    let lookup = MapLookup::default().respond("1", Ok(food_children()));
    let selector = attach(&parent, &child, lookup.clone());

    let outcome = block_on(selector.sync());

    assert_eq!(outcome, LookupOutcome::Applied { parent: parent_id("1"), count: 2 });
    assert_eq!(lookup.requests(), vec!["1"]);
    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Groceries", "Dining"]);
    assert_eq!(child.value(), "10");
    assert!(!child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::EnabledPopulated);
}

#[test]
fn sync_skips_selection_missing_from_lookup() {
    let parent = FakeSelect::with_value("2");
    let child = edit_form_child();
    let lookup = MapLookup::default().respond("2", Ok(transport_children()));
    let selector = attach(&parent, &child, lookup);

    block_on(selector.sync());

    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Fuel", "Bus"]);
    assert_eq!(child.value(), "");
    assert!(!child.is_disabled());
}

#[test]
fn sync_failure_leaves_child_disabled() {
    let parent = FakeSelect::with_value("1");
    let child = edit_form_child();
    let selector = attach(&parent, &child, MapLookup::default());

    let outcome = block_on(selector.sync());

    assert!(matches!(outcome, LookupOutcome::Failed { .. }));
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::DisabledEmpty);
}

#[test]
fn parent_change_drops_server_selection() {
    let parent = FakeSelect::with_value("1");
    let child = edit_form_child();
    let lookup = MapLookup::default().respond("1", Ok(food_children()));
    let selector = attach(&parent, &child, lookup);

    block_on(selector.on_parent_change("1"));
    block_on(selector.sync());

    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Groceries", "Dining"]);
    assert_eq!(child.value(), "");
}

#[test]
fn sync_with_empty_parent_clears() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::with_options(&[("99", "Leftover")]);
    let lookup = MapLookup::default();
    let selector = attach(&parent, &child, lookup.clone());

    assert_eq!(block_on(selector.sync()), LookupOutcome::Cleared);
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(lookup.requests().is_empty());
}

// =============================================================
// Parent changes
// =============================================================

#[test]
fn selecting_parent_populates_child_then_clearing_resets_it() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = MapLookup::default().respond("1", Ok(food_children()));
    let selector = attach(&parent, &child, lookup.clone());

    parent.set_value("1");
    let outcome = block_on(selector.on_parent_change("1"));

    assert_eq!(outcome, LookupOutcome::Applied { parent: parent_id("1"), count: 2 });
    assert_eq!(lookup.requests(), vec!["1"]);
    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Groceries", "Dining"]);
    assert!(!child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::EnabledPopulated);

    parent.set_value("");
    let outcome = block_on(selector.on_parent_change(""));

    assert_eq!(outcome, LookupOutcome::Cleared);
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::DisabledEmpty);
}

#[test]
fn clearing_parent_never_issues_request() {
    let parent = FakeSelect::with_value("1");
    let child = FakeSelect::with_options(&[("10", "Groceries")]);
    let lookup = MapLookup::default();
    let selector = attach(&parent, &child, lookup.clone());

    parent.set_value("");
    let continuation = selector.on_parent_change("  ");

    // Reset is synchronous, before the continuation runs.
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert_eq!(block_on(continuation), LookupOutcome::Cleared);
    assert!(lookup.requests().is_empty());
}

#[test]
fn change_keeps_child_disabled_while_lookup_pending() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = GatedLookup::default();
    let selector = attach(&parent, &child, lookup.clone());
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    parent.set_value("1");
    let handle = spawner.spawn_local_with_handle(selector.on_parent_change("1")).unwrap();
    pool.run_until_stalled();

    assert_eq!(lookup.pending_count(), 1);
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::DisabledEmpty);

    lookup.release("1", Ok(food_children()));
    let outcome = pool.run_until(handle);

    assert_eq!(outcome, LookupOutcome::Applied { parent: parent_id("1"), count: 2 });
    assert!(!child.is_disabled());
}

#[test]
fn empty_lookup_result_enables_sentinel_only_child() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = MapLookup::default().respond("3", Ok(Vec::new()));
    let selector = attach(&parent, &child, lookup);

    parent.set_value("3");
    let outcome = block_on(selector.on_parent_change("3"));

    assert_eq!(outcome, LookupOutcome::Applied { parent: parent_id("3"), count: 0 });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(!child.is_disabled());
}

#[test]
fn repeated_change_with_same_value_matches_single_change() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = MapLookup::default().respond("1", Ok(food_children()));
    let selector = attach(&parent, &child, lookup);

    parent.set_value("1");
    block_on(selector.on_parent_change("1"));
    let once = (child.labels(), child.is_disabled(), selector.state());

    block_on(selector.on_parent_change("1"));
    let twice = (child.labels(), child.is_disabled(), selector.state());

    assert_eq!(once, twice);
}

#[test]
fn overlapping_changes_with_same_value_apply_latest_only() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = MapLookup::default().respond("1", Ok(food_children()));
    let selector = attach(&parent, &child, lookup);

    parent.set_value("1");
    let first = selector.on_parent_change("1");
    let second = selector.on_parent_change("1");

    assert_eq!(block_on(second), LookupOutcome::Applied { parent: parent_id("1"), count: 2 });
    assert_eq!(block_on(first), LookupOutcome::Stale { parent: parent_id("1") });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Groceries", "Dining"]);
    assert!(!child.is_disabled());
}

// =============================================================
// Stale responses
// =============================================================

#[test]
fn older_result_resolving_last_does_not_overwrite_newer() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = GatedLookup::default();
    let selector = attach(&parent, &child, lookup.clone());
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    parent.set_value("1");
    let first = spawner.spawn_local_with_handle(selector.on_parent_change("1")).unwrap();
    pool.run_until_stalled();
    parent.set_value("2");
    let second = spawner.spawn_local_with_handle(selector.on_parent_change("2")).unwrap();
    pool.run_until_stalled();
    assert_eq!(lookup.pending_count(), 2);

    lookup.release("2", Ok(transport_children()));
    pool.run_until_stalled();
    lookup.release("1", Ok(food_children()));

    assert_eq!(pool.run_until(second), LookupOutcome::Applied { parent: parent_id("2"), count: 2 });
    assert_eq!(pool.run_until(first), LookupOutcome::Stale { parent: parent_id("1") });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Fuel", "Bus"]);
    assert!(!child.is_disabled());
}

#[test]
fn older_result_resolving_first_is_dropped() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = GatedLookup::default();
    let selector = attach(&parent, &child, lookup.clone());
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    parent.set_value("1");
    let first = spawner.spawn_local_with_handle(selector.on_parent_change("1")).unwrap();
    pool.run_until_stalled();
    parent.set_value("2");
    let second = spawner.spawn_local_with_handle(selector.on_parent_change("2")).unwrap();
    pool.run_until_stalled();

    lookup.release("1", Ok(food_children()));
    assert_eq!(pool.run_until(first), LookupOutcome::Stale { parent: parent_id("1") });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());

    lookup.release("2", Ok(transport_children()));
    assert_eq!(pool.run_until(second), LookupOutcome::Applied { parent: parent_id("2"), count: 2 });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Fuel", "Bus"]);
}

#[test]
fn result_arriving_after_clear_is_dropped() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = GatedLookup::default();
    let selector = attach(&parent, &child, lookup.clone());
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    parent.set_value("1");
    let pending = spawner.spawn_local_with_handle(selector.on_parent_change("1")).unwrap();
    pool.run_until_stalled();

    parent.set_value("");
    assert_eq!(block_on(selector.on_parent_change("")), LookupOutcome::Cleared);

    lookup.release("1", Ok(food_children()));
    assert_eq!(pool.run_until(pending), LookupOutcome::Stale { parent: parent_id("1") });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::DisabledEmpty);
}

#[test]
fn failure_for_superseded_value_is_dropped() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = GatedLookup::default();
    let selector = attach(&parent, &child, lookup.clone());
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    parent.set_value("1");
    let first = spawner.spawn_local_with_handle(selector.on_parent_change("1")).unwrap();
    pool.run_until_stalled();
    parent.set_value("2");
    let second = spawner.spawn_local_with_handle(selector.on_parent_change("2")).unwrap();
    pool.run_until_stalled();

    lookup.release("2", Ok(transport_children()));
    pool.run_until_stalled();
    lookup.release("1", Err(LookupError::NetworkFailure("timeout".to_owned())));

    assert_eq!(pool.run_until(first), LookupOutcome::Stale { parent: parent_id("1") });
    assert!(matches!(pool.run_until(second), LookupOutcome::Applied { .. }));
    assert_eq!(child.labels(), vec![SENTINEL_LABEL, "Fuel", "Bus"]);
    assert!(!child.is_disabled());
}

// =============================================================
// Failures
// =============================================================

#[test]
fn network_failure_leaves_child_disabled_and_empty() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let error = LookupError::NetworkFailure("lookup returned status 500".to_owned());
    let lookup = MapLookup::default()
        .respond("1", Ok(food_children()))
        .respond("2", Err(error.clone()));
    let selector = attach(&parent, &child, lookup);

    parent.set_value("1");
    block_on(selector.on_parent_change("1"));
    parent.set_value("2");
    let outcome = block_on(selector.on_parent_change("2"));

    assert_eq!(outcome, LookupOutcome::Failed { parent: parent_id("2"), error });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
    assert_eq!(selector.state(), ChildControlState::DisabledEmpty);
}

#[test]
fn malformed_response_leaves_child_disabled_and_empty() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let error = LookupError::MalformedResponse("empty body".to_owned());
    let lookup = MapLookup::default().respond("1", Err(error.clone()));
    let selector = attach(&parent, &child, lookup);

    parent.set_value("1");
    let outcome = block_on(selector.on_parent_change("1"));

    assert_eq!(outcome, LookupOutcome::Failed { parent: parent_id("1"), error });
    assert_eq!(child.labels(), vec![SENTINEL_LABEL]);
    assert!(child.is_disabled());
}

// =============================================================
// Atomic replacement
// =============================================================

#[test]
fn child_only_ever_receives_complete_lists() {
    let parent = FakeSelect::with_value("");
    let child = FakeSelect::default();
    let lookup = MapLookup::default()
        .respond("1", Ok(food_children()))
        .respond("2", Ok(transport_children()));
    let selector = attach(&parent, &child, lookup);

    for value in ["1", "2", "", "1"] {
        parent.set_value(value);
        block_on(selector.on_parent_change(value));
    }

    let sentinel_only = vec![SENTINEL_LABEL.to_owned()];
    let food: Vec<String> = [SENTINEL_LABEL, "Groceries", "Dining"].map(str::to_owned).to_vec();
    let transport: Vec<String> = [SENTINEL_LABEL, "Fuel", "Bus"].map(str::to_owned).to_vec();
    for installed in child.installed() {
        assert!(
            installed == sentinel_only || installed == food || installed == transport,
            "partial list installed: {installed:?}"
        );
    }
    assert_eq!(child.labels(), food);
}
