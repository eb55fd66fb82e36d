//! In-memory collaborators: a headless grid and a navigation layer without a
//! browser. Used by the CLI and by tests.

use std::cmp::Ordering;
use std::sync::mpsc::Sender;

use gridsync_model::{
    ColumnId, ColumnSet, ColumnSortState, FilterCondition, FilterModel, QueryString, RowData,
    RowRecord, SortDirective,
};
use serde_json::Value;
use tracing::trace;

use crate::session::Session;
use crate::sync::SyncOptions;
use crate::widget::{GridEvent, GridWidget, LoadState, Navigation};

/// A grid that evaluates its own filters and sorts over in-memory rows.
///
/// Like a browser grid it fires `FilterChanged`/`SortChanged` for both user
/// edits and programmatic model updates.
#[derive(Debug)]
pub struct HeadlessGrid {
    columns: ColumnSet,
    rows: RowData,
    filters: FilterModel,
    sorts: Vec<ColumnSortState>,
    load_state: LoadState,
    notifier: Option<Sender<GridEvent>>,
}

impl HeadlessGrid {
    pub fn new(columns: ColumnSet) -> Self {
        let sorts = columns
            .ids()
            .map(|id| ColumnSortState::new(id.clone(), None))
            .collect();
        Self {
            columns,
            rows: RowData::default(),
            filters: FilterModel::new(),
            sorts,
            load_state: LoadState::Idle,
            notifier: None,
        }
    }

    pub fn set_notifier(&mut self, sender: Sender<GridEvent>) {
        self.notifier = Some(sender);
    }

    /// Signal that construction finished.
    pub fn mount(&self) {
        self.notify(GridEvent::Ready);
    }

    /// A user edit of one column's filter.
    pub fn user_set_filter(&mut self, column: &ColumnId, condition: Option<FilterCondition>) {
        match condition {
            Some(condition) => self.filters.insert(column.clone(), condition),
            None => {
                self.filters.remove(column);
            }
        }
        self.notify(GridEvent::FilterChanged);
    }

    /// The user pressed "clear all filters".
    pub fn user_clear_filters(&mut self) {
        self.filters.clear();
        self.notify(GridEvent::FilterChanged);
    }

    /// A user click on a column header: single-column sort, other columns
    /// lose their direction. Headers of non-sortable columns do nothing.
    pub fn user_sort(&mut self, column: &ColumnId, sort: Option<SortDirective>) {
        if self.columns.get(column.as_str()).is_some_and(|spec| !spec.sortable) {
            trace!(%column, "column is not sortable; ignoring sort");
            return;
        }
        for entry in &mut self.sorts {
            if &entry.column == column {
                entry.sort = sort;
                entry.sort_index = sort.map(|_| 0);
            } else {
                entry.sort = None;
                entry.sort_index = None;
            }
        }
        self.notify(GridEvent::SortChanged);
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn rows(&self) -> &RowData {
        &self.rows
    }

    /// Rows that pass every filter, in sort order.
    pub fn visible_rows(&self) -> Vec<&RowRecord> {
        let mut visible: Vec<&RowRecord> = self
            .rows
            .rows()
            .iter()
            .filter(|row| {
                self.filters.iter().all(|(column, condition)| {
                    condition.matches(row.get(column.as_str()).unwrap_or(&Value::Null))
                })
            })
            .collect();

        let mut keys: Vec<&ColumnSortState> =
            self.sorts.iter().filter(|entry| entry.sort.is_some()).collect();
        keys.sort_by_key(|entry| entry.sort_index.unwrap_or(u32::MAX));
        if !keys.is_empty() {
            visible.sort_by(|a, b| {
                for key in &keys {
                    let left = a.get(key.column.as_str()).unwrap_or(&Value::Null);
                    let right = b.get(key.column.as_str()).unwrap_or(&Value::Null);
                    let ordering = match key.sort {
                        Some(SortDirective::Descending) => compare_cells(right, left),
                        _ => compare_cells(left, right),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                Ordering::Equal
            });
        }
        visible
    }

    fn notify(&self, event: GridEvent) {
        if let Some(sender) = &self.notifier {
            trace!(?event, "grid notification");
            let _ = sender.send(event);
        }
    }
}

impl GridWidget for HeadlessGrid {
    fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    fn filter_model(&self) -> FilterModel {
        self.filters.clone()
    }

    fn set_filter_model(&mut self, model: &FilterModel) {
        self.filters = model.clone();
        self.notify(GridEvent::FilterChanged);
    }

    fn sort_state(&self) -> Vec<ColumnSortState> {
        self.sorts.clone()
    }

    fn apply_sort_state(&mut self, state: &[ColumnSortState]) {
        let mut next_index = 0;
        for entry in &mut self.sorts {
            let sort = state
                .iter()
                .find(|s| s.column == entry.column)
                .and_then(|s| s.sort);
            entry.sort = sort;
            entry.sort_index = sort.map(|_| {
                next_index += 1;
                next_index - 1
            });
        }
        self.notify(GridEvent::SortChanged);
    }

    fn set_rows(&mut self, rows: RowData) {
        self.rows = rows;
    }

    fn set_load_state(&mut self, state: LoadState) {
        self.load_state = state;
    }
}

/// Nulls first, then numbers, then everything else as case-insensitive text.
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => cell_label(a).to_lowercase().cmp(&cell_label(b).to_lowercase()),
    }
}

/// Display text of a cell.
pub fn cell_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Navigation layer backed by a string, recording every replacement.
#[derive(Debug, Default)]
pub struct MemoryNavigation {
    query: QueryString,
    history: Vec<String>,
}

impl MemoryNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an address-bar query such as `?make=%22Ford%22`.
    pub fn from_address(raw: &str) -> Self {
        Self {
            query: QueryString::parse(raw),
            history: Vec::new(),
        }
    }

    /// Current address-bar query text.
    pub fn address(&self) -> String {
        self.query.to_query()
    }

    /// Address-bar text after each replacement, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Navigation for MemoryNavigation {
    fn query(&self) -> QueryString {
        self.query.clone()
    }

    fn replace_query(&mut self, query: QueryString) {
        self.history.push(query.to_query());
        self.query = query;
    }
}

/// A session over a headless grid whose notifications feed the session queue.
pub fn headless_session(
    columns: ColumnSet,
    options: SyncOptions,
    navigation: MemoryNavigation,
) -> Session<HeadlessGrid, MemoryNavigation> {
    let mut session = Session::new(options, HeadlessGrid::new(columns), navigation);
    let sender = session.sender();
    session.widget_mut().set_notifier(sender);
    session
}
