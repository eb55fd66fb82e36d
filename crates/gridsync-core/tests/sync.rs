//! End-to-end synchronization scenarios over the headless grid.

use gridsync_core::{
    GridEvent, GridWidget, MemoryNavigation, Navigation, SyncOptions, SyncPhase, headless_session,
};
use gridsync_model::{
    ColumnId, ColumnPredicate, ColumnSet, FilterCondition, NumberFilter, SortDirective,
    TextFilter, TextOperator,
};
use serde_json::json;

fn id(name: &str) -> ColumnId {
    ColumnId::new(name).unwrap()
}

fn ford() -> FilterCondition {
    TextFilter::new(TextOperator::Equals, "Ford").into()
}

const ALL_NULL: &str = "make=null&model=null&price=null";

#[test]
fn restores_filter_model_from_address_bar() {
    let nav = MemoryNavigation::from_address("make=%22Ford%22&model=null");
    let mut session = headless_session(ColumnSet::default(), SyncOptions::default(), nav);
    session.widget().mount();
    session.run_until_idle();

    assert_eq!(session.sync().phase(), SyncPhase::Ready);
    let model = session.widget().filter_model();
    assert_eq!(model.len(), 1);
    assert_eq!(model.get(&id("make")).unwrap().to_value(), json!("Ford"));
    assert!(model.get(&id("model")).is_none());

    // The restore canonicalizes the address bar, and the widget's echoed
    // FilterChanged does not write it a second time.
    assert_eq!(session.navigation().history().len(), 1);
    assert_eq!(
        session.navigation().address(),
        "make=%2522Ford%2522&model=null&price=null"
    );
}

#[test]
fn empty_address_bar_leaves_widget_untouched() {
    let mut session = headless_session(
        ColumnSet::default(),
        SyncOptions::default(),
        MemoryNavigation::new(),
    );
    session.widget().mount();
    session.run_until_idle();

    assert_eq!(session.sync().phase(), SyncPhase::Ready);
    assert!(session.widget().filter_model().is_empty());
    assert!(session.navigation().history().is_empty());
}

#[test]
fn malformed_address_bar_recovers_to_empty_state() {
    let nav = MemoryNavigation::from_address("make=%7Bbroken&model=null");
    let mut session = headless_session(ColumnSet::default(), SyncOptions::default(), nav);
    session.widget().mount();
    session.run_until_idle();

    assert_eq!(session.sync().phase(), SyncPhase::Ready);
    assert!(session.sync().predicates().is_empty());
    assert!(session.widget().filter_model().is_empty());
}

#[test]
fn user_filter_edit_is_published() {
    let mut session = headless_session(
        ColumnSet::default(),
        SyncOptions::default(),
        MemoryNavigation::new(),
    );
    session.widget().mount();
    session.run_until_idle();

    session.widget_mut().user_set_filter(&id("make"), Some(ford()));
    session.run_until_idle();

    let query = session.navigation().query();
    assert_eq!(query.len(), 3);
    assert_ne!(query.get("make"), Some("null"));
    assert_eq!(query.get("model"), Some("null"));
    assert_eq!(query.get("price"), Some("null"));
    assert_eq!(
        session.sync().predicates().get(&id("make")),
        Some(&ColumnPredicate::filtered(ford()))
    );
}

#[test]
fn clearing_all_filters_nulls_every_column() {
    let mut session = headless_session(
        ColumnSet::default(),
        SyncOptions::default(),
        MemoryNavigation::new(),
    );
    session.widget().mount();
    session.run_until_idle();
    session.widget_mut().user_set_filter(&id("make"), Some(ford()));
    session.widget_mut().user_set_filter(
        &id("price"),
        Some(NumberFilter::in_range(10000.0, 40000.0).unwrap().into()),
    );
    session.run_until_idle();

    session.widget_mut().user_clear_filters();
    session.run_until_idle();

    assert!(session.sync().predicates().is_empty());
    assert_eq!(session.navigation().address(), ALL_NULL);
    let history = session.navigation().history();
    assert_eq!(history.last().map(String::as_str), Some(ALL_NULL));
}

#[test]
fn filter_change_replaces_previous_columns() {
    let mut session = headless_session(
        ColumnSet::default(),
        SyncOptions::default(),
        MemoryNavigation::new(),
    );
    session.widget().mount();
    session.run_until_idle();
    session
        .widget_mut()
        .user_set_filter(&id("model"), Some(TextFilter::new(TextOperator::Contains, "B").into()));
    session.run_until_idle();

    let mut model = gridsync_model::FilterModel::new();
    model.insert(id("make"), ford());
    session.widget_mut().set_filter_model(&model);
    session.run_until_idle();

    let predicates = session.sync().predicates();
    assert_eq!(predicates.len(), 1);
    assert!(predicates.get(&id("model")).is_none());
}

#[test]
fn notifications_before_ready_are_dropped() {
    let nav = MemoryNavigation::from_address("make=%22Ford%22");
    let mut session = headless_session(ColumnSet::default(), SyncOptions::default(), nav);

    session.widget_mut().user_clear_filters();
    session.run_until_idle();
    assert_eq!(session.sync().phase(), SyncPhase::Uninitialized);
    assert!(session.navigation().history().is_empty());

    session.widget().mount();
    session.run_until_idle();
    assert_eq!(
        session.widget().filter_model().get(&id("make")).unwrap().to_value(),
        json!("Ford")
    );
}

#[test]
fn repeated_ready_is_ignored() {
    let nav = MemoryNavigation::from_address("make=%22Ford%22");
    let mut session = headless_session(ColumnSet::default(), SyncOptions::default(), nav);
    session.dispatch(GridEvent::Ready);
    session.run_until_idle();
    session.widget_mut().user_clear_filters();
    session.run_until_idle();

    session.dispatch(GridEvent::Ready);
    session.run_until_idle();
    assert!(session.widget().filter_model().is_empty());
    assert_eq!(session.navigation().address(), ALL_NULL);
}

#[test]
fn sort_changes_ignored_without_persistence() {
    let mut session = headless_session(
        ColumnSet::default(),
        SyncOptions::default(),
        MemoryNavigation::new(),
    );
    session.widget().mount();
    session.run_until_idle();
    session
        .widget_mut()
        .user_sort(&id("price"), Some(SortDirective::Descending));
    session.run_until_idle();

    assert!(session.sync().predicates().is_empty());
    assert!(session.navigation().history().is_empty());
}

#[test]
fn sort_changes_are_merged_additively_when_persisted() {
    let options = SyncOptions {
        persist_sort: true,
        restore_sort: false,
    };
    let mut session = headless_session(ColumnSet::default(), options, MemoryNavigation::new());
    session.widget().mount();
    session.run_until_idle();

    session.widget_mut().user_set_filter(&id("make"), Some(ford()));
    session
        .widget_mut()
        .user_sort(&id("make"), Some(SortDirective::Ascending));
    session.run_until_idle();
    // Single-column sort: make loses its direction in the widget, but the
    // merge never clears an existing directive.
    session
        .widget_mut()
        .user_sort(&id("price"), Some(SortDirective::Descending));
    session.run_until_idle();

    let predicates = session.sync().predicates();
    assert_eq!(
        predicates.get(&id("make")),
        Some(&ColumnPredicate::filtered(ford()).with_sort(Some(SortDirective::Ascending)))
    );
    assert_eq!(
        predicates.get(&id("price")),
        Some(&ColumnPredicate::sorted(SortDirective::Descending))
    );
}

#[test]
fn sort_state_restored_when_enabled() {
    let options = SyncOptions {
        persist_sort: true,
        restore_sort: true,
    };
    let nav = MemoryNavigation::from_address("price=%7B%22sort%22%3A%22desc%22%7D");
    let mut session = headless_session(ColumnSet::default(), options, nav);
    session.widget().mount();
    session.run_until_idle();

    let sorted: Vec<_> = session
        .widget()
        .sort_state()
        .into_iter()
        .filter(|entry| entry.sort.is_some())
        .collect();
    assert_eq!(sorted.len(), 1);
    assert_eq!(sorted[0].column, id("price"));
    assert_eq!(sorted[0].sort, Some(SortDirective::Descending));
    assert_eq!(session.navigation().history().len(), 1);
}

#[test]
fn sort_state_restored_without_persistence() {
    let options = SyncOptions {
        persist_sort: false,
        restore_sort: true,
    };
    let nav = MemoryNavigation::from_address("price=%7B%22sort%22%3A%22desc%22%7D");
    let mut session = headless_session(ColumnSet::default(), options, nav);
    session.widget().mount();
    session.run_until_idle();

    let sorted: Vec<_> = session
        .widget()
        .sort_state()
        .into_iter()
        .filter(|entry| entry.sort.is_some())
        .map(|entry| (entry.column, entry.sort))
        .collect();
    assert_eq!(sorted, vec![(id("price"), Some(SortDirective::Descending))]);
    assert_eq!(session.navigation().address(), ALL_NULL);
    assert!(
        session
            .sync()
            .predicates()
            .get(&id("price"))
            .is_none_or(|p| p.sort.is_none())
    );
}

#[test]
fn sort_state_not_restored_by_default() {
    let nav = MemoryNavigation::from_address("price=%7B%22sort%22%3A%22desc%22%7D");
    let mut session = headless_session(ColumnSet::default(), SyncOptions::default(), nav);
    session.widget().mount();
    session.run_until_idle();

    assert!(session.widget().sort_state().iter().all(|e| e.sort.is_none()));
    // With sort persistence off the restored sort is not written back.
    assert_eq!(session.navigation().address(), ALL_NULL);
}

#[test]
fn unchanged_filter_notification_does_not_republish() {
    let mut session = headless_session(
        ColumnSet::default(),
        SyncOptions::default(),
        MemoryNavigation::new(),
    );
    session.widget().mount();
    session.run_until_idle();
    session.widget_mut().user_set_filter(&id("make"), Some(ford()));
    session.run_until_idle();
    let writes = session.navigation().history().len();

    session.dispatch(GridEvent::FilterChanged);
    session.dispatch(GridEvent::FilterChanged);
    assert_eq!(session.navigation().history().len(), writes);
}

#[test]
fn navigation_replacement_is_wholesale() {
    let nav = MemoryNavigation::from_address("make=null&utm_source=mail");
    let mut session = headless_session(ColumnSet::default(), SyncOptions::default(), nav);
    session.widget().mount();
    session.run_until_idle();
    session.widget_mut().user_set_filter(&id("make"), Some(ford()));
    session.run_until_idle();

    let query = session.navigation().query();
    assert_eq!(query.get("utm_source"), None);
    assert_eq!(query.keys().collect::<Vec<_>>(), vec!["make", "model", "price"]);
}
