//! Table rendering for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use gridsync_core::cell_label;
use gridsync_model::{ColumnSet, ColumnSortState, FilterModel, PredicateSet, RowRecord, SortDirective};
use serde_json::Value;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Declared columns with their current predicate, if any.
pub fn columns_table(columns: &ColumnSet, predicates: &PredicateSet) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Filter"),
        header_cell("Sortable"),
        header_cell("Query value"),
    ]);
    apply_table_style(&mut table);
    for column in columns {
        let value = predicates
            .get(&column.id)
            .map_or_else(|| dim_cell("null"), |p| Cell::new(p.to_json()));
        table.add_row(vec![
            Cell::new(&column.id).add_attribute(Attribute::Bold),
            flag_cell(column.filter),
            flag_cell(column.sortable),
            value,
        ]);
    }
    table
}

/// Visible grid rows under the grid's header, at most `limit` of them.
pub fn rows_table(
    columns: &ColumnSet,
    filters: &FilterModel,
    sorts: &[ColumnSortState],
    rows: &[&RowRecord],
    limit: usize,
) -> Table {
    let mut table = Table::new();
    table.set_header(columns.iter().map(|column| {
        let mut label = column.id.to_string();
        if filters.get(&column.id).is_some() {
            label.push_str(" *");
        }
        let sort = sorts
            .iter()
            .find(|entry| entry.column == column.id)
            .and_then(|entry| entry.sort);
        match sort {
            Some(SortDirective::Ascending) => label.push_str(" ^"),
            Some(SortDirective::Descending) => label.push_str(" v"),
            None => {}
        }
        header_cell(&label)
    }));
    apply_table_style(&mut table);

    for row in rows.iter().take(limit) {
        table.add_row(columns.iter().map(|column| {
            match row.get(column.id.as_str()).unwrap_or(&Value::Null) {
                Value::Null => dim_cell("-"),
                value @ Value::Number(_) => {
                    Cell::new(cell_label(value)).set_alignment(CellAlignment::Right)
                }
                value => Cell::new(cell_label(value)),
            }
        }));
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn flag_cell(enabled: bool) -> Cell {
    if enabled {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    }
}

#[cfg(test)]
mod tests {
    use gridsync_model::{ColumnId, ColumnPredicate, RowData};
    use serde_json::json;

    use super::*;

    #[test]
    fn columns_table_shows_query_values() {
        let mut predicates = PredicateSet::new();
        predicates.insert(
            ColumnId::new("price").unwrap(),
            ColumnPredicate::sorted(SortDirective::Descending),
        );
        let mut table = columns_table(&ColumnSet::default(), &predicates);
        table.force_no_tty();
        let text = table.to_string();
        assert!(text.contains("make"));
        assert!(text.contains(r#"{"sort":"desc"}"#));
        assert!(text.contains("null"));
    }

    #[test]
    fn rows_table_respects_limit_and_marks_sort() {
        let rows: RowData = serde_json::from_value(json!([
            {"make": "Toyota", "model": "Celica", "price": 35000},
            {"make": "Ford", "model": "Mondeo", "price": 32000}
        ]))
        .unwrap();
        let visible: Vec<&RowRecord> = rows.rows().iter().collect();
        let sorts = vec![ColumnSortState::new(
            ColumnId::new("price").unwrap(),
            Some(SortDirective::Ascending),
        )];
        let mut table = rows_table(&ColumnSet::default(), &FilterModel::new(), &sorts, &visible, 1);
        table.force_no_tty();
        let text = table.to_string();
        assert!(text.contains("price ^"));
        assert!(text.contains("Celica"));
        assert!(!text.contains("Mondeo"));
    }
}
