//! Per-column predicates and the predicate set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::column::{ColumnId, ColumnSet};
use crate::error::{ModelError, Result};
use crate::filter::{FilterCondition, FilterModel, RAW_FILTER_KEY, SORT_KEY};
use crate::sort::{ColumnSortState, SortDirective};

/// One column's filter condition plus its optional sort directive.
///
/// A predicate with neither part is empty and means the same as an absent
/// column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPredicate {
    pub filter: Option<FilterCondition>,
    pub sort: Option<SortDirective>,
}

impl ColumnPredicate {
    pub fn filtered(filter: impl Into<FilterCondition>) -> Self {
        Self {
            filter: Some(filter.into()),
            sort: None,
        }
    }

    pub fn sorted(sort: SortDirective) -> Self {
        Self {
            filter: None,
            sort: Some(sort),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Option<SortDirective>) -> Self {
        self.sort = sort;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.sort.is_none()
    }

    /// Wire form: the filter object with `sort` merged in. Non-object filters
    /// that carry a sort are wrapped under `$filter`.
    pub fn to_json(&self) -> Value {
        let sort = self.sort.map(|s| Value::from(s.as_str()));
        match (&self.filter, sort) {
            (None, None) => Value::Null,
            (None, Some(sort)) => {
                let mut map = Map::new();
                map.insert(SORT_KEY.to_string(), sort);
                Value::Object(map)
            }
            (Some(filter), sort) => match (filter.to_value(), sort) {
                (Value::Object(mut map), Some(sort)) => {
                    map.insert(SORT_KEY.to_string(), sort);
                    Value::Object(map)
                }
                (raw, Some(sort)) => {
                    let mut map = Map::new();
                    map.insert(RAW_FILTER_KEY.to_string(), raw);
                    map.insert(SORT_KEY.to_string(), sort);
                    Value::Object(map)
                }
                (value, None) => value,
            },
        }
    }

    /// Inverse of [`ColumnPredicate::to_json`]. `None` when the value carries
    /// neither a filter nor a sort.
    pub fn from_json(value: Value) -> Result<Option<Self>> {
        let Value::Object(mut map) = value else {
            return Ok(FilterCondition::from_value(value)?.map(Self::filtered));
        };
        let sort = match map.remove(SORT_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(raw.parse::<SortDirective>()?),
            Some(other) => return Err(ModelError::InvalidSort(other.to_string())),
        };
        let filter = match map.remove(RAW_FILTER_KEY) {
            Some(raw) => {
                if !map.is_empty() || matches!(raw, Value::Object(_) | Value::Null) {
                    return Err(ModelError::ReservedKey(RAW_FILTER_KEY));
                }
                FilterCondition::from_value(raw)?
            }
            None => FilterCondition::from_value(Value::Object(map))?,
        };
        let predicate = Self { filter, sort };
        Ok((!predicate.is_empty()).then_some(predicate))
    }
}

/// Column identifier → predicate. The single source of truth for the view
/// state; never stores empty predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    columns: BTreeMap<ColumnId, ColumnPredicate>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &ColumnId) -> Option<&ColumnPredicate> {
        self.columns.get(column)
    }

    /// Insert or replace a column's predicate. An empty predicate removes it.
    pub fn insert(&mut self, column: ColumnId, predicate: ColumnPredicate) {
        if predicate.is_empty() {
            self.columns.remove(&column);
        } else {
            self.columns.insert(column, predicate);
        }
    }

    pub fn remove(&mut self, column: &ColumnId) -> Option<ColumnPredicate> {
        self.columns.remove(column)
    }

    pub fn set_filter(&mut self, column: &ColumnId, filter: Option<FilterCondition>) {
        let mut predicate = self.columns.remove(column).unwrap_or_default();
        predicate.filter = filter;
        self.insert(column.clone(), predicate);
    }

    pub fn set_sort(&mut self, column: &ColumnId, sort: Option<SortDirective>) {
        let mut predicate = self.columns.remove(column).unwrap_or_default();
        predicate.sort = sort;
        self.insert(column.clone(), predicate);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnId, &ColumnPredicate)> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The filter portion, as the widget expects it.
    pub fn filter_model(&self) -> FilterModel {
        self.columns
            .iter()
            .filter_map(|(id, predicate)| {
                predicate
                    .filter
                    .as_ref()
                    .map(|filter| (id.clone(), filter.clone()))
            })
            .collect()
    }

    /// The sort portion, in declared column order, for every declared column.
    pub fn sort_state(&self, columns: &ColumnSet) -> Vec<ColumnSortState> {
        columns
            .ids()
            .map(|id| {
                let sort = self.columns.get(id).and_then(|predicate| predicate.sort);
                ColumnSortState::new(id.clone(), sort)
            })
            .collect()
    }
}

impl FromIterator<(ColumnId, ColumnPredicate)> for PredicateSet {
    fn from_iter<I: IntoIterator<Item = (ColumnId, ColumnPredicate)>>(iter: I) -> Self {
        let mut set = PredicateSet::new();
        for (column, predicate) in iter {
            set.insert(column, predicate);
        }
        set
    }
}

impl Serialize for PredicateSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, predicate) in &self.columns {
            map.serialize_entry(column.as_str(), &predicate.to_json())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PredicateSet {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<ColumnId, Value>::deserialize(deserializer)?;
        let mut set = PredicateSet::new();
        for (column, value) in raw {
            if let Some(predicate) =
                ColumnPredicate::from_json(value).map_err(serde::de::Error::custom)?
            {
                set.insert(column, predicate);
            }
        }
        Ok(set)
    }
}
