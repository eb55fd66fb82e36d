//! A full synchronizer session against the headless grid.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use gridsync_core::{
    FileRowSource, HeadlessGrid, HttpRowSource, MemoryNavigation, RowSource, Session,
    headless_session,
};
use gridsync_model::{ColumnId, FilterCondition, SortDirective};
use tracing::{debug, info_span};

use crate::config::Settings;
use crate::edits::{ensure_declared, ensure_sortable};

pub type HeadlessSession = Session<HeadlessGrid, MemoryNavigation>;

/// What to run: the starting address bar, the row feed, then user edits.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub query: String,
    pub data: String,
    pub filters: Vec<(ColumnId, Option<FilterCondition>)>,
    pub sorts: Vec<(ColumnId, SortDirective)>,
    pub timeout: Duration,
}

/// HTTP(S) URLs are fetched; anything else is read as a local file.
pub fn row_source(data: &str) -> Result<Arc<dyn RowSource>> {
    if data.starts_with("http://") || data.starts_with("https://") {
        Ok(Arc::new(HttpRowSource::new(data)?))
    } else {
        Ok(Arc::new(FileRowSource::new(data)))
    }
}

/// Mount the grid, restore from the query, load rows, then replay the edits.
///
/// A failed load is not an error here; the grid shows it through its load
/// state. Running out of time is.
pub fn run_view(settings: &Settings, request: &ViewRequest) -> Result<HeadlessSession> {
    for (column, _) in &request.filters {
        ensure_declared(&settings.columns, column)?;
    }
    for (column, _) in &request.sorts {
        ensure_sortable(&settings.columns, column)?;
    }
    let source = row_source(&request.data)?;

    let span = info_span!("view", data = %request.data);
    let _guard = span.enter();

    let mut session = headless_session(
        settings.columns.clone(),
        settings.sync,
        MemoryNavigation::from_address(&request.query),
    );
    session.widget().mount();
    session.start_load(source);
    if !session.wait_for_rows(request.timeout) {
        session.cancel_load();
        bail!(
            "row data did not arrive within {}s",
            request.timeout.as_secs()
        );
    }

    for (column, condition) in &request.filters {
        debug!(%column, "applying filter edit");
        session.widget_mut().user_set_filter(column, condition.clone());
        session.run_until_idle();
    }
    for (column, direction) in &request.sorts {
        debug!(%column, %direction, "applying sort edit");
        session.widget_mut().user_sort(column, Some(*direction));
        session.run_until_idle();
    }
    Ok(session)
}
