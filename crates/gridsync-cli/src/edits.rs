//! Parsing of predicate arguments given on the command line.

use anyhow::{Context, Result, bail};
use gridsync_model::{ColumnId, ColumnSet, FilterCondition, PredicateSet, SortDirective};

/// `column=<widget filter JSON>`; `column=null` clears the column.
pub fn parse_filter_arg(raw: &str) -> Result<(ColumnId, Option<FilterCondition>)> {
    let (column, json) = split_assignment(raw)?;
    let value: serde_json::Value = serde_json::from_str(json)
        .with_context(|| format!("filter for `{column}` is not valid JSON"))?;
    let condition = FilterCondition::from_value(value)
        .with_context(|| format!("filter for `{column}`"))?;
    Ok((column, condition))
}

/// `column=asc` or `column=desc`.
pub fn parse_sort_arg(raw: &str) -> Result<(ColumnId, SortDirective)> {
    let (column, direction) = split_assignment(raw)?;
    let direction = direction
        .parse::<SortDirective>()
        .with_context(|| format!("sort for `{column}`"))?;
    Ok((column, direction))
}

/// Comma-separated `column=direction` pairs.
pub fn parse_sort_list(raw: &str) -> Result<Vec<(ColumnId, SortDirective)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_sort_arg)
        .collect()
}

/// Build a predicate set from a JSON object of column filters plus sorts.
///
/// Every column must be declared.
pub fn build_predicates(
    columns: &ColumnSet,
    filters_json: Option<&str>,
    sorts: &[(ColumnId, SortDirective)],
) -> Result<PredicateSet> {
    let mut set: PredicateSet = match filters_json {
        Some(json) => serde_json::from_str(json).context("parse --filters")?,
        None => PredicateSet::new(),
    };
    for (column, _) in set.iter() {
        ensure_declared(columns, column)?;
    }
    for (column, direction) in sorts {
        ensure_declared(columns, column)?;
        set.set_sort(column, Some(*direction));
    }
    Ok(set)
}

pub fn ensure_declared(columns: &ColumnSet, column: &ColumnId) -> Result<()> {
    if !columns.contains(column.as_str()) {
        let declared: Vec<&str> = columns.ids().map(ColumnId::as_str).collect();
        bail!(
            "unknown column `{column}` (declared: {})",
            declared.join(", ")
        );
    }
    Ok(())
}

pub fn ensure_sortable(columns: &ColumnSet, column: &ColumnId) -> Result<()> {
    ensure_declared(columns, column)?;
    if columns.get(column.as_str()).is_some_and(|spec| !spec.sortable) {
        bail!("column `{column}` is not sortable");
    }
    Ok(())
}

fn split_assignment(raw: &str) -> Result<(ColumnId, &str)> {
    let Some((column, value)) = raw.split_once('=') else {
        bail!("expected COLUMN=VALUE, got `{raw}`");
    };
    Ok((ColumnId::new(column)?, value.trim()))
}
