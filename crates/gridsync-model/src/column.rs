//! Declared grid columns.
//!
//! The column set is fixed by the grid's column configuration. It is the only
//! source of column identifiers the codec will ever encode or decode.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnId(String);

impl ColumnId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidColumnId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ColumnId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ColumnId> for String {
    fn from(id: ColumnId) -> Self {
        id.0
    }
}

impl AsRef<str> for ColumnId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One entry of the grid's declarative column configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column identifier (the row field it displays).
    pub id: ColumnId,
    /// Whether the widget offers a filter for this column.
    #[serde(default)]
    pub filter: bool,
    /// Whether the widget allows sorting by this column.
    #[serde(default = "default_sortable")]
    pub sortable: bool,
}

fn default_sortable() -> bool {
    true
}

impl ColumnSpec {
    pub fn new(id: ColumnId) -> Self {
        Self {
            id,
            filter: false,
            sortable: true,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, enable: bool) -> Self {
        self.filter = enable;
        self
    }

    #[must_use]
    pub fn with_sortable(mut self, enable: bool) -> Self {
        self.sortable = enable;
        self
    }
}

/// Ordered, duplicate-free set of declared columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSet {
    columns: Vec<ColumnSpec>,
}

impl ColumnSet {
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(ModelError::DuplicateColumn(column.id.to_string()));
            }
        }
        Ok(Self { columns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ColumnId> {
        self.columns.iter().map(|column| &column.id)
    }

    pub fn get(&self, id: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Default for ColumnSet {
    /// The car-sales example grid: `make`, `model` and `price`.
    fn default() -> Self {
        let column = |id: &str, filter: bool| ColumnSpec {
            id: ColumnId(id.to_string()),
            filter,
            sortable: true,
        };
        Self {
            columns: vec![
                column("make", true),
                column("model", true),
                column("price", false),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for ColumnSet {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let columns = Vec::<ColumnSpec>::deserialize(deserializer)?;
        Self::new(columns).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
