//! The filter-state synchronizer.
//!
//! `FilterSync` owns the predicate set (through a [`StateCell`]) and is the
//! only writer of the navigation layer's query. The widget's filter model is
//! written once during restore and read-only afterwards.

use std::fmt;

use gridsync_model::{ColumnSet, PredicateSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::codec;
use crate::merge::{merge_filter_model, merge_sort_state};
use crate::state::StateCell;
use crate::widget::{GridWidget, Navigation};

/// Optional parts of the synchronization contract.
///
/// Filter sync is always on. Sort sync is split in two because writing sort
/// state to the URL and restoring it on load are independent features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Merge sort-change notifications into the predicate set (and the URL).
    #[serde(default)]
    pub persist_sort: bool,
    /// Push decoded sort state into the widget on load.
    #[serde(default)]
    pub restore_sort: bool,
}

/// Bootstrap state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPhase {
    /// Waiting for the widget's readiness notification.
    #[default]
    Uninitialized,
    /// Reading the query and pushing it into the widget.
    Restoring,
    /// Terminal: change notifications are merged and published.
    Ready,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncPhase::Uninitialized => "uninitialized",
            SyncPhase::Restoring => "restoring",
            SyncPhase::Ready => "ready",
        };
        f.write_str(label)
    }
}

#[derive(Debug)]
pub struct FilterSync {
    columns: ColumnSet,
    options: SyncOptions,
    phase: SyncPhase,
    state: StateCell<PredicateSet>,
    /// State version last written to the navigation layer.
    published: u64,
}

impl FilterSync {
    pub fn new(columns: ColumnSet, options: SyncOptions) -> Self {
        Self {
            columns,
            options,
            phase: SyncPhase::Uninitialized,
            state: StateCell::new(PredicateSet::new()),
            published: 0,
        }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// The current predicate set.
    pub fn predicates(&self) -> &PredicateSet {
        self.state.get()
    }

    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Handle the widget's readiness notification: restore from the query,
    /// then become ready. Later readiness notifications are ignored.
    pub fn on_grid_ready<W, N>(&mut self, widget: &mut W, navigation: &mut N)
    where
        W: GridWidget + ?Sized,
        N: Navigation + ?Sized,
    {
        if self.phase != SyncPhase::Uninitialized {
            debug!(phase = %self.phase, "ignoring repeated grid readiness");
            return;
        }
        let span = info_span!("restore");
        let _guard = span.enter();
        self.phase = SyncPhase::Restoring;

        let query = navigation.query();
        match codec::decode_or_empty(&self.columns, &query) {
            Some(mut restored) => {
                widget.set_filter_model(&restored.filter_model());
                if self.options.restore_sort {
                    widget.apply_sort_state(&restored.sort_state(&self.columns));
                }
                // Sorts pushed into the widget stay out of the address.
                if !self.options.persist_sort {
                    for id in self.columns.ids() {
                        restored.set_sort(id, None);
                    }
                }
                info!(columns = restored.len(), "restored filter state from query");
                self.state.replace(restored);
                self.write_query(navigation);
            }
            None => debug!("no filter state to restore"),
        }

        self.phase = SyncPhase::Ready;
        info!("filter sync ready");
    }

    /// Merge the widget's full filter model and publish. Returns whether the
    /// query was rewritten.
    pub fn on_filter_changed<W, N>(&mut self, widget: &W, navigation: &mut N) -> bool
    where
        W: GridWidget + ?Sized,
        N: Navigation + ?Sized,
    {
        if self.phase != SyncPhase::Ready {
            debug!(phase = %self.phase, "dropping filter change before restore completed");
            return false;
        }
        let model = widget.filter_model();
        let columns = &self.columns;
        let changed = self
            .state
            .update(|current| merge_filter_model(columns, current, &model));
        debug!(changed, filters = model.len(), "merged filter model");
        self.publish(navigation)
    }

    /// Merge the widget's sort state and publish, when sort persistence is on.
    pub fn on_sort_changed<W, N>(&mut self, widget: &W, navigation: &mut N) -> bool
    where
        W: GridWidget + ?Sized,
        N: Navigation + ?Sized,
    {
        if !self.options.persist_sort {
            debug!("sort persistence disabled; ignoring sort change");
            return false;
        }
        if self.phase != SyncPhase::Ready {
            debug!(phase = %self.phase, "dropping sort change before restore completed");
            return false;
        }
        let state = widget.sort_state();
        let columns = &self.columns;
        let changed = self
            .state
            .update(|current| merge_sort_state(columns, current, &state));
        debug!(changed, "merged sort state");
        self.publish(navigation)
    }

    /// Write the query only when the state moved past the last published
    /// version. An echoed notification that merges to the same state is a no-op.
    fn publish<N: Navigation + ?Sized>(&mut self, navigation: &mut N) -> bool {
        if self.state.version() == self.published {
            debug!(version = self.published, "query already up to date");
            return false;
        }
        self.write_query(navigation);
        true
    }

    fn write_query<N: Navigation + ?Sized>(&mut self, navigation: &mut N) {
        let query = codec::encode(&self.columns, self.state.get());
        debug!(version = self.state.version(), query = %query, "replacing query");
        navigation.replace_query(query);
        self.published = self.state.version();
    }
}
