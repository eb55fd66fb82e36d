use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};

/// One row from the data feed. The synchronizer never looks inside.
pub type RowRecord = Map<String, Value>;

/// The row collection handed to the widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowData(Vec<RowRecord>);

impl RowData {
    pub fn new(rows: Vec<RowRecord>) -> Self {
        Self(rows)
    }

    /// Parse a JSON array of objects.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        let Value::Array(items) = value else {
            return Err(ModelError::UnexpectedShape {
                expected: "array",
                found: kind_of(&value),
            });
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(ModelError::UnexpectedShape {
                    expected: "object",
                    found: kind_of(&other),
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RowRecord>> for RowData {
    fn from(rows: Vec<RowRecord>) -> Self {
        Self(rows)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
