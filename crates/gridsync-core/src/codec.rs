//! PredicateSet ⇄ QueryString codec.
//!
//! Each declared column becomes exactly one query parameter whose value is the
//! `encodeURIComponent` form of the column's JSON predicate, or the literal
//! `null` when the column has none.

use gridsync_model::{ColumnPredicate, ColumnSet, PredicateSet, QueryString};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::{debug, warn};

use crate::error::DecodeError;

/// Query value of a column with no predicate.
pub const NULL_MARKER: &str = "null";

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode every declared column, in declaration order. Columns outside the
/// declared set are not encoded.
pub fn encode(columns: &ColumnSet, set: &PredicateSet) -> QueryString {
    columns
        .ids()
        .map(|id| {
            let value = match set.get(id) {
                Some(predicate) => encode_predicate(predicate),
                None => NULL_MARKER.to_string(),
            };
            (id.as_str(), value)
        })
        .collect()
}

fn encode_predicate(predicate: &ColumnPredicate) -> String {
    let json = predicate.to_json().to_string();
    utf8_percent_encode(&json, COMPONENT).to_string()
}

/// Decode the navigation layer's query parameters.
///
/// `Ok(None)` when the query has no parameters at all: there is nothing to
/// restore, which is different from restoring an empty set. A declared column
/// missing from a non-empty query decodes as `null`.
pub fn decode(columns: &ColumnSet, query: &QueryString) -> Result<Option<PredicateSet>, DecodeError> {
    if query.is_empty() {
        return Ok(None);
    }
    for key in query.keys().filter(|key| !columns.contains(key)) {
        debug!(parameter = key, "ignoring query parameter outside the column set");
    }

    let mut set = PredicateSet::new();
    for id in columns.ids() {
        let raw = query.get(id.as_str()).unwrap_or(NULL_MARKER);
        if let Some(predicate) = decode_predicate(id.as_str(), raw)? {
            set.insert(id.clone(), predicate);
        }
    }
    Ok(Some(set))
}

fn decode_predicate(column: &str, raw: &str) -> Result<Option<ColumnPredicate>, DecodeError> {
    let text = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| DecodeError::Utf8 {
            column: column.to_string(),
        })?;
    let value = serde_json::from_str(&text).map_err(|source| DecodeError::Json {
        column: column.to_string(),
        source,
    })?;
    ColumnPredicate::from_json(value).map_err(|source| DecodeError::Predicate {
        column: column.to_string(),
        source,
    })
}

/// [`decode`] with malformed input recovered as "nothing to restore".
pub fn decode_or_empty(columns: &ColumnSet, query: &QueryString) -> Option<PredicateSet> {
    match decode(columns, query) {
        Ok(set) => set,
        Err(error) => {
            warn!(column = error.column(), %error, "discarding malformed filter state from query");
            None
        }
    }
}
