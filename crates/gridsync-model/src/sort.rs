use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::error::ModelError;

/// Sort direction of one column. "Unset" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirective {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirective::Ascending => "asc",
            SortDirective::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirective {
    type Err = ModelError;

    /// Accepts the wire forms plus the long names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirective::Ascending),
            "desc" | "descending" => Ok(SortDirective::Descending),
            _ => Err(ModelError::InvalidSort(s.to_string())),
        }
    }
}

/// One column's entry in the widget's current declared column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSortState {
    #[serde(rename = "colId")]
    pub column: ColumnId,
    #[serde(default)]
    pub sort: Option<SortDirective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<u32>,
}

impl ColumnSortState {
    pub fn new(column: ColumnId, sort: Option<SortDirective>) -> Self {
        Self {
            column,
            sort,
            sort_index: None,
        }
    }
}
