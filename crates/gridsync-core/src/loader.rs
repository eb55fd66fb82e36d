//! One-shot row data load.
//!
//! The fetch runs on a background thread and reports back through the
//! session's event channel. There is no automatic retry.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use gridsync_model::RowData;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::widget::GridEvent;

/// Row feed used by the car-sales example grid.
pub const DEFAULT_DATA_URL: &str = "https://www.ag-grid.com/example-assets/row-data.json";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where rows come from.
pub trait RowSource: Send + Sync {
    fn fetch(&self) -> Result<RowData, LoadError>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// GET a JSON array of rows over HTTP.
pub struct HttpRowSource {
    client: Client,
    url: String,
}

impl HttpRowSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("gridsync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RowSource for HttpRowSource {
    fn fetch(&self) -> Result<RowData, LoadError> {
        debug!(url = %self.url, "fetching row data");
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes()?;
        Ok(RowData::from_json_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Read a JSON array of rows from a local file.
pub struct FileRowSource {
    path: PathBuf,
}

impl FileRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for FileRowSource {
    fn fetch(&self) -> Result<RowData, LoadError> {
        debug!(path = %self.path.display(), "reading row data");
        let bytes = std::fs::read(&self.path)?;
        Ok(RowData::from_json_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Identifies one spawned load. Results carry it so the session can tell a
/// current result from one that was cancelled or superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadId(u64);

impl LoadId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an in-flight load. Cancelling (or dropping the handle) suppresses
/// delivery of the result.
#[derive(Debug)]
pub struct LoadHandle {
    id: LoadId,
    cancel_flag: Arc<AtomicBool>,
}

impl LoadHandle {
    fn new(id: LoadId) -> Self {
        Self {
            id,
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> LoadId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawn the fetch on a background thread.
///
/// The result arrives as [`GridEvent::RowsLoaded`] tagged with `id`, unless
/// the handle was cancelled before the fetch returned. A result already queued
/// when the handle is cancelled still arrives; the receiver matches the tag.
pub fn spawn_row_load(
    id: LoadId,
    source: Arc<dyn RowSource>,
    sender: Sender<GridEvent>,
) -> LoadHandle {
    let handle = LoadHandle::new(id);
    let cancel_flag = Arc::clone(&handle.cancel_flag);

    std::thread::spawn(move || {
        let start = Instant::now();
        let result = source.fetch();
        if cancel_flag.load(Ordering::SeqCst) {
            debug!(load = %id, source = %source.describe(), "row load cancelled; dropping result");
            return;
        }
        match &result {
            Ok(rows) => info!(
                load = %id,
                source = %source.describe(),
                rows = rows.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "row data loaded"
            ),
            Err(error) => debug!(load = %id, source = %source.describe(), %error, "row load failed"),
        }
        let _ = sender.send(GridEvent::RowsLoaded { load: id, result });
    });

    handle
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    struct Fixed(Vec<u8>);

    impl RowSource for Fixed {
        fn fetch(&self) -> Result<RowData, LoadError> {
            Ok(RowData::from_json_slice(&self.0)?)
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[test]
    fn delivers_rows_through_channel() {
        let (sender, receiver) = mpsc::channel();
        let source = Arc::new(Fixed(br#"[{"make":"Ford"}]"#.to_vec()));
        let _handle = spawn_row_load(LoadId::new(7), source, sender);
        match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
            GridEvent::RowsLoaded {
                load,
                result: Ok(rows),
            } => {
                assert_eq!(load, LoadId::new(7));
                assert_eq!(rows.len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parse_failures_are_reported() {
        let (sender, receiver) = mpsc::channel();
        let source = Arc::new(Fixed(b"<html>".to_vec()));
        let _handle = spawn_row_load(LoadId::new(1), source, sender);
        match receiver.recv_timeout(Duration::from_secs(5)).unwrap() {
            GridEvent::RowsLoaded {
                result: Err(LoadError::Parse(_)),
                ..
            } => {}
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = FileRowSource::new("/nonexistent/gridsync/rows.json");
        assert!(matches!(source.fetch(), Err(LoadError::Io(_))));
    }

    #[test]
    fn http_source_keeps_url() {
        let source = HttpRowSource::new(DEFAULT_DATA_URL).unwrap();
        assert_eq!(source.url(), DEFAULT_DATA_URL);
        assert_eq!(source.describe(), DEFAULT_DATA_URL);
    }
}
