//! Single-threaded event loop tying the synchronizer to its collaborators.
//!
//! Every notification (widget events and the row-load completion) goes through
//! one channel and is handled to completion before the next, so merge and
//! re-encode/publish never interleave.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::loader::{LoadHandle, LoadId, RowSource, spawn_row_load};
use crate::sync::{FilterSync, SyncOptions};
use crate::widget::{GridEvent, GridWidget, LoadState, Navigation};

pub struct Session<W, N> {
    sync: FilterSync,
    widget: W,
    navigation: N,
    sender: Sender<GridEvent>,
    receiver: Receiver<GridEvent>,
    source: Option<Arc<dyn RowSource>>,
    load: Option<LoadHandle>,
    loads_started: u64,
    load_failed: bool,
}

impl<W: std::fmt::Debug, N: std::fmt::Debug> std::fmt::Debug for Session<W, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("sync", &self.sync)
            .field("widget", &self.widget)
            .field("navigation", &self.navigation)
            .field("source", &self.source.is_some())
            .field("load", &self.load)
            .field("loads_started", &self.loads_started)
            .field("load_failed", &self.load_failed)
            .finish_non_exhaustive()
    }
}

impl<W: GridWidget, N: Navigation> Session<W, N> {
    pub fn new(options: SyncOptions, widget: W, navigation: N) -> Self {
        let (sender, receiver) = mpsc::channel();
        let sync = FilterSync::new(widget.columns().clone(), options);
        Self {
            sync,
            widget,
            navigation,
            sender,
            receiver,
            source: None,
            load: None,
            loads_started: 0,
            load_failed: false,
        }
    }

    /// Sender for posting notifications into this session.
    pub fn sender(&self) -> Sender<GridEvent> {
        self.sender.clone()
    }

    pub fn sync(&self) -> &FilterSync {
        &self.sync
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    /// Whether the last row load failed and can be retried.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Start the one-shot row load. Any load already in flight is cancelled.
    pub fn start_load(&mut self, source: Arc<dyn RowSource>) {
        info!(source = %source.describe(), "loading row data");
        if let Some(previous) = self.load.take() {
            previous.cancel();
        }
        self.widget.set_load_state(LoadState::Loading);
        self.load_failed = false;
        self.loads_started += 1;
        let id = LoadId::new(self.loads_started);
        self.load = Some(spawn_row_load(id, Arc::clone(&source), self.sender.clone()));
        self.source = Some(source);
    }

    /// Re-issue the load after a failure. Returns false when there is nothing
    /// to retry.
    pub fn retry_load(&mut self) -> bool {
        if !self.load_failed {
            return false;
        }
        let Some(source) = self.source.clone() else {
            return false;
        };
        info!("retrying row load");
        self.start_load(source);
        true
    }

    /// Cancel the in-flight load, if any.
    pub fn cancel_load(&mut self) {
        if let Some(handle) = self.load.take() {
            handle.cancel();
            self.widget.set_load_state(LoadState::Idle);
        }
    }

    /// Handle one notification to completion.
    pub fn dispatch(&mut self, event: GridEvent) {
        match event {
            GridEvent::Ready => self.sync.on_grid_ready(&mut self.widget, &mut self.navigation),
            GridEvent::FilterChanged => {
                self.sync.on_filter_changed(&self.widget, &mut self.navigation);
            }
            GridEvent::SortChanged => {
                self.sync.on_sort_changed(&self.widget, &mut self.navigation);
            }
            GridEvent::RowsLoaded { load, result } => {
                if self.load.as_ref().map(LoadHandle::id) != Some(load) {
                    debug!(%load, "ignoring result of a cancelled or superseded load");
                    return;
                }
                self.load = None;
                match result {
                    Ok(rows) => {
                        self.widget
                            .set_load_state(LoadState::Loaded { rows: rows.len() });
                        self.widget.set_rows(rows);
                    }
                    Err(error) => {
                        warn!(%load, %error, retryable = error.is_retryable(), "row load failed");
                        self.load_failed = true;
                        self.widget.set_load_state(LoadState::failed(&error));
                    }
                }
            }
        }
    }

    /// Drain and handle every queued notification. Returns how many ran.
    pub fn run_until_idle(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Handle notifications until no row load is pending or `timeout` passes.
    /// Returns false on timeout.
    pub fn wait_for_rows(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.load.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(event) => self.dispatch(event),
                Err(RecvTimeoutError::Timeout) => {
                    debug!("timed out waiting for row data");
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        self.run_until_idle();
        true
    }
}
