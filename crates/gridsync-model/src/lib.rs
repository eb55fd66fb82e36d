//! Data model for synchronizing grid filter state with a URL query string.

pub mod column;
pub mod error;
pub mod filter;
pub mod predicate;
pub mod query;
pub mod row;
pub mod sort;

pub use column::{ColumnId, ColumnSet, ColumnSpec};
pub use error::{ModelError, Result};
pub use filter::{
    FilterCondition, FilterModel, NumberFilter, NumberOperator, OpaqueFilter, TextFilter,
    TextOperator,
};
pub use predicate::{ColumnPredicate, PredicateSet};
pub use query::QueryString;
pub use row::{RowData, RowRecord};
pub use sort::{ColumnSortState, SortDirective};
