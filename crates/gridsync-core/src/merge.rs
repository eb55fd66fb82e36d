//! Merging widget change notifications into the predicate set.

use gridsync_model::{ColumnSet, ColumnSortState, FilterModel, PredicateSet};
use tracing::warn;

/// Replace the filter portion with the widget's full filter model.
///
/// Every declared column takes the model's condition, or none when the model
/// does not mention it. Sort directives are kept. Model entries for columns
/// outside the declared set are dropped.
pub fn merge_filter_model(
    columns: &ColumnSet,
    current: &PredicateSet,
    model: &FilterModel,
) -> PredicateSet {
    for column in model.columns().filter(|c| !columns.contains(c.as_str())) {
        warn!(column = %column, "widget reported a filter for an undeclared column");
    }
    let mut next = current.clone();
    for id in columns.ids() {
        next.set_filter(id, model.get(id).cloned());
    }
    next
}

/// Merge the widget's column sort state.
///
/// Columns reporting a concrete direction overwrite their sort; columns with
/// no direction are left as they are.
pub fn merge_sort_state(
    columns: &ColumnSet,
    current: &PredicateSet,
    state: &[ColumnSortState],
) -> PredicateSet {
    let mut next = current.clone();
    for entry in state {
        let Some(sort) = entry.sort else {
            continue;
        };
        if !columns.contains(entry.column.as_str()) {
            warn!(column = %entry.column, "widget reported a sort for an undeclared column");
            continue;
        }
        next.set_sort(&entry.column, Some(sort));
    }
    next
}

#[cfg(test)]
mod tests {
    use gridsync_model::{
        ColumnId, ColumnPredicate, FilterCondition, NumberFilter, SortDirective, TextFilter,
        TextOperator,
    };

    use super::*;

    fn id(name: &str) -> ColumnId {
        ColumnId::new(name).unwrap()
    }

    fn text(value: &str) -> FilterCondition {
        TextFilter::new(TextOperator::Equals, value).into()
    }

    #[test]
    fn filter_merge_is_a_full_replace() {
        let columns = ColumnSet::default();
        let mut current = PredicateSet::new();
        current.insert(id("make"), ColumnPredicate::filtered(text("A")));
        current.insert(id("model"), ColumnPredicate::filtered(text("B")));

        let model: FilterModel = [(id("make"), text("C"))].into_iter().collect();
        let merged = merge_filter_model(&columns, &current, &model);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(&id("make")), Some(&ColumnPredicate::filtered(text("C"))));
        assert!(merged.get(&id("model")).is_none());
    }

    #[test]
    fn filter_merge_keeps_sort_directives() {
        let columns = ColumnSet::default();
        let mut current = PredicateSet::new();
        current.insert(
            id("model"),
            ColumnPredicate::filtered(text("B")).with_sort(Some(SortDirective::Descending)),
        );
        let merged = merge_filter_model(&columns, &current, &FilterModel::new());
        assert_eq!(
            merged.get(&id("model")),
            Some(&ColumnPredicate::sorted(SortDirective::Descending))
        );
    }

    #[test]
    fn filter_merge_ignores_undeclared_columns() {
        let columns = ColumnSet::default();
        let model: FilterModel = [(id("year"), text("2020"))].into_iter().collect();
        let merged = merge_filter_model(&columns, &PredicateSet::new(), &model);
        assert!(merged.is_empty());
    }

    #[test]
    fn sort_merge_is_additive() {
        let columns = ColumnSet::default();
        let mut current = PredicateSet::new();
        current.insert(id("make"), ColumnPredicate::filtered(text("A")));
        current.insert(
            id("price"),
            ColumnPredicate::filtered(NumberFilter::in_range(1.0, 9.0).unwrap()),
        );

        let state = vec![
            ColumnSortState::new(id("make"), Some(SortDirective::Ascending)),
            ColumnSortState::new(id("price"), None),
        ];
        let merged = merge_sort_state(&columns, &current, &state);

        assert_eq!(
            merged.get(&id("make")),
            Some(&ColumnPredicate::filtered(text("A")).with_sort(Some(SortDirective::Ascending)))
        );
        assert_eq!(merged.get(&id("price")), current.get(&id("price")));
    }

    #[test]
    fn sort_merge_never_clears_an_existing_direction() {
        let columns = ColumnSet::default();
        let mut current = PredicateSet::new();
        current.set_sort(&id("model"), Some(SortDirective::Descending));
        let state = vec![ColumnSortState::new(id("model"), None)];
        let merged = merge_sort_state(&columns, &current, &state);
        assert_eq!(merged, current);
    }
}
