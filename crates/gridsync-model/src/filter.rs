//! Column filter conditions as reported by the grid widget.
//!
//! The widget's filter payload is loosely structured. The operators the grid
//! actually offers (text and number filters) are parsed into typed variants;
//! anything else is kept verbatim as an [`OpaqueFilter`] so it survives a trip
//! through the query string without being interpreted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::column::ColumnId;
use crate::error::{ModelError, Result};

/// Keys owned by the predicate wire form. They never appear inside a filter.
pub const SORT_KEY: &str = "sort";
pub const RAW_FILTER_KEY: &str = "$filter";

const FILTER_TYPE_KEY: &str = "filterType";

/// Text filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextOperator {
    Equals,
    NotEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Blank,
    NotBlank,
}

impl TextOperator {
    pub const ALL: [TextOperator; 8] = [
        TextOperator::Equals,
        TextOperator::NotEqual,
        TextOperator::Contains,
        TextOperator::NotContains,
        TextOperator::StartsWith,
        TextOperator::EndsWith,
        TextOperator::Blank,
        TextOperator::NotBlank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextOperator::Equals => "equals",
            TextOperator::NotEqual => "notEqual",
            TextOperator::Contains => "contains",
            TextOperator::NotContains => "notContains",
            TextOperator::StartsWith => "startsWith",
            TextOperator::EndsWith => "endsWith",
            TextOperator::Blank => "blank",
            TextOperator::NotBlank => "notBlank",
        }
    }
}

/// Number filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberOperator {
    Equals,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    InRange,
    Blank,
    NotBlank,
}

impl NumberOperator {
    pub const ALL: [NumberOperator; 9] = [
        NumberOperator::Equals,
        NumberOperator::NotEqual,
        NumberOperator::LessThan,
        NumberOperator::LessThanOrEqual,
        NumberOperator::GreaterThan,
        NumberOperator::GreaterThanOrEqual,
        NumberOperator::InRange,
        NumberOperator::Blank,
        NumberOperator::NotBlank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberOperator::Equals => "equals",
            NumberOperator::NotEqual => "notEqual",
            NumberOperator::LessThan => "lessThan",
            NumberOperator::LessThanOrEqual => "lessThanOrEqual",
            NumberOperator::GreaterThan => "greaterThan",
            NumberOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            NumberOperator::InRange => "inRange",
            NumberOperator::Blank => "blank",
            NumberOperator::NotBlank => "notBlank",
        }
    }
}

/// `{"filterType":"text","type":"contains","filter":"Ford"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextFilter {
    #[serde(rename = "type")]
    pub kind: TextOperator,
    #[serde(default)]
    pub filter: Option<String>,
}

impl TextFilter {
    pub fn new(kind: TextOperator, filter: impl Into<String>) -> Self {
        Self {
            kind,
            filter: Some(filter.into()),
        }
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(FILTER_TYPE_KEY.to_string(), Value::from("text"));
        map.insert("type".to_string(), Value::from(self.kind.as_str()));
        if let Some(filter) = &self.filter {
            map.insert("filter".to_string(), Value::from(filter.as_str()));
        }
        map
    }

    /// Case-insensitive match against a cell value, the way the grid's text
    /// filter compares.
    pub fn matches(&self, cell: &Value) -> bool {
        let text = cell_text(cell);
        let blank = text.as_deref().is_none_or(|t| t.trim().is_empty());
        match self.kind {
            TextOperator::Blank => return blank,
            TextOperator::NotBlank => return !blank,
            _ => {}
        }
        let Some(needle) = self.filter.as_deref().map(str::to_lowercase) else {
            return true;
        };
        let haystack = text.unwrap_or_default().to_lowercase();
        match self.kind {
            TextOperator::Equals => haystack == needle,
            TextOperator::NotEqual => haystack != needle,
            TextOperator::Contains => haystack.contains(&needle),
            TextOperator::NotContains => !haystack.contains(&needle),
            TextOperator::StartsWith => haystack.starts_with(&needle),
            TextOperator::EndsWith => haystack.ends_with(&needle),
            TextOperator::Blank | TextOperator::NotBlank => unreachable!("handled above"),
        }
    }
}

/// `{"filterType":"number","type":"inRange","filter":10,"filterTo":20}`
///
/// Bounds are always finite: JSON has no NaN or infinity, so the constructors
/// reject them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NumberFilter {
    #[serde(rename = "type")]
    pub kind: NumberOperator,
    #[serde(default)]
    filter: Option<f64>,
    #[serde(default)]
    filter_to: Option<f64>,
}

impl NumberFilter {
    pub fn try_new(
        kind: NumberOperator,
        filter: Option<f64>,
        filter_to: Option<f64>,
    ) -> Result<Self> {
        for bound in [filter, filter_to].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(ModelError::NonFiniteNumber(bound));
            }
        }
        Ok(Self {
            kind,
            filter,
            filter_to,
        })
    }

    pub fn new(kind: NumberOperator, filter: f64) -> Result<Self> {
        Self::try_new(kind, Some(filter), None)
    }

    pub fn in_range(from: f64, to: f64) -> Result<Self> {
        Self::try_new(NumberOperator::InRange, Some(from), Some(to))
    }

    pub fn filter(&self) -> Option<f64> {
        self.filter
    }

    pub fn filter_to(&self) -> Option<f64> {
        self.filter_to
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(FILTER_TYPE_KEY.to_string(), Value::from("number"));
        map.insert("type".to_string(), Value::from(self.kind.as_str()));
        if let Some(filter) = self.filter {
            map.insert("filter".to_string(), Value::from(filter));
        }
        if let Some(filter_to) = self.filter_to {
            map.insert("filterTo".to_string(), Value::from(filter_to));
        }
        map
    }

    /// Numeric comparison against a cell value. `inRange` excludes both bounds.
    pub fn matches(&self, cell: &Value) -> bool {
        let number = cell_number(cell);
        match self.kind {
            NumberOperator::Blank => return number.is_none(),
            NumberOperator::NotBlank => return number.is_some(),
            _ => {}
        }
        let Some(filter) = self.filter else {
            return true;
        };
        let Some(number) = number else {
            return false;
        };
        match self.kind {
            NumberOperator::Equals => number == filter,
            NumberOperator::NotEqual => number != filter,
            NumberOperator::LessThan => number < filter,
            NumberOperator::LessThanOrEqual => number <= filter,
            NumberOperator::GreaterThan => number > filter,
            NumberOperator::GreaterThanOrEqual => number >= filter,
            NumberOperator::InRange => match self.filter_to {
                Some(to) => number > filter && number < to,
                None => number > filter,
            },
            NumberOperator::Blank | NumberOperator::NotBlank => unreachable!("handled above"),
        }
    }
}

/// A filter payload the synchronizer does not interpret.
///
/// Only produced by [`FilterCondition::from_value`], which guarantees the value
/// is not null, not an empty object, free of reserved keys, and not parseable
/// as a typed filter.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueFilter(Value);

impl OpaqueFilter {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// One column's filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Text(TextFilter),
    Number(NumberFilter),
    Opaque(OpaqueFilter),
}

impl FilterCondition {
    /// Parse a widget filter payload.
    ///
    /// `null` and `{}` mean "no filter". Objects carrying a reserved key are
    /// rejected; the predicate layer strips those before calling this.
    pub fn from_value(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(map) => {
                if map.is_empty() {
                    return Ok(None);
                }
                for key in [SORT_KEY, RAW_FILTER_KEY] {
                    if map.contains_key(key) {
                        return Err(ModelError::ReservedKey(key));
                    }
                }
                Ok(Some(Self::from_object(map)))
            }
            other => Ok(Some(Self::Opaque(OpaqueFilter(other)))),
        }
    }

    fn from_object(map: Map<String, Value>) -> Self {
        let typed = match map.get(FILTER_TYPE_KEY).and_then(Value::as_str) {
            Some("text") => serde_json::from_value::<TextFilter>(without_filter_type(&map))
                .ok()
                .map(Self::Text),
            Some("number") => serde_json::from_value::<NumberFilter>(without_filter_type(&map))
                .ok()
                .map(Self::Number),
            _ => None,
        };
        typed.unwrap_or_else(|| Self::Opaque(OpaqueFilter(Value::Object(map))))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(filter) => Value::Object(filter.to_object()),
            Self::Number(filter) => Value::Object(filter.to_object()),
            Self::Opaque(opaque) => opaque.0.clone(),
        }
    }

    /// Evaluate against a cell. Opaque filters are never evaluated and keep
    /// every row.
    pub fn matches(&self, cell: &Value) -> bool {
        match self {
            Self::Text(filter) => filter.matches(cell),
            Self::Number(filter) => filter.matches(cell),
            Self::Opaque(_) => true,
        }
    }
}

impl From<TextFilter> for FilterCondition {
    fn from(filter: TextFilter) -> Self {
        Self::Text(filter)
    }
}

impl From<NumberFilter> for FilterCondition {
    fn from(filter: NumberFilter) -> Self {
        Self::Number(filter)
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

fn without_filter_type(map: &Map<String, Value>) -> Value {
    let mut fields = map.clone();
    fields.remove(FILTER_TYPE_KEY);
    Value::Object(fields)
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn cell_number(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The widget-facing filter model: column → condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterModel(BTreeMap<ColumnId, FilterCondition>);

impl FilterModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &ColumnId) -> Option<&FilterCondition> {
        self.0.get(column)
    }

    pub fn insert(&mut self, column: ColumnId, condition: FilterCondition) {
        self.0.insert(column, condition);
    }

    pub fn remove(&mut self, column: &ColumnId) -> Option<FilterCondition> {
        self.0.remove(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnId, &FilterCondition)> {
        self.0.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(ColumnId, FilterCondition)> for FilterModel {
    fn from_iter<I: IntoIterator<Item = (ColumnId, FilterCondition)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for FilterModel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, condition) in &self.0 {
            map.serialize_entry(column.as_str(), &condition.to_value())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterModel {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<ColumnId, Value>::deserialize(deserializer)?;
        let mut model = FilterModel::new();
        for (column, value) in raw {
            if let Some(condition) =
                FilterCondition::from_value(value).map_err(serde::de::Error::custom)?
            {
                model.insert(column, condition);
            }
        }
        Ok(model)
    }
}
