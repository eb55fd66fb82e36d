//! Seams to the external collaborators: the grid widget and the navigation
//! (location) layer.

use gridsync_model::{ColumnSet, ColumnSortState, FilterModel, QueryString, RowData};

use crate::error::LoadError;
use crate::loader::LoadId;

/// A grid widget the synchronizer drives.
///
/// The widget's own filter model is a write target during restore and an event
/// source afterwards; the synchronizer never treats it as the source of truth.
pub trait GridWidget {
    /// Declared column configuration.
    fn columns(&self) -> &ColumnSet;

    /// The widget's current full filter model.
    fn filter_model(&self) -> FilterModel;

    /// Replace the widget's filter model.
    fn set_filter_model(&mut self, model: &FilterModel);

    /// Current column order with each column's sort.
    fn sort_state(&self) -> Vec<ColumnSortState>;

    /// Apply column sort state; columns not listed lose their sort.
    fn apply_sort_state(&mut self, state: &[ColumnSortState]);

    /// Hand the loaded rows to the widget.
    fn set_rows(&mut self, rows: RowData);

    /// Show loading progress or failure.
    fn set_load_state(&mut self, state: LoadState);
}

/// Read/replace access to the current page's query parameters.
pub trait Navigation {
    fn query(&self) -> QueryString;

    /// Replace all parameters at once (no page reload).
    fn replace_query(&mut self, query: QueryString);
}

/// Notifications processed by the session, one at a time.
#[derive(Debug)]
pub enum GridEvent {
    /// The widget finished constructing itself and accepts model calls.
    Ready,
    /// The user edited a filter.
    FilterChanged,
    /// The user changed sort or column order.
    SortChanged,
    /// The one-shot row load finished. `load` names the spawn that produced it.
    RowsLoaded {
        load: LoadId,
        result: Result<RowData, LoadError>,
    },
}

/// What the grid shows in place of (or alongside) its rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded {
        rows: usize,
    },
    Failed {
        message: String,
        retryable: bool,
    },
}

impl LoadState {
    pub fn failed(error: &LoadError) -> Self {
        Self::Failed {
            message: error.user_message().to_string(),
            retryable: error.is_retryable(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
