//! Filter-state synchronizer: keeps a grid widget's filter (and optionally
//! sort) state mirrored in the page's query string.
//!
//! Data flow:
//!
//! ```text
//! widget change event -> merge into PredicateSet -> encode -> replace query
//! widget ready        -> decode query -> set widget filter model -> Ready
//! ```

pub mod codec;
pub mod error;
pub mod headless;
pub mod loader;
pub mod merge;
pub mod session;
pub mod state;
pub mod sync;
pub mod widget;

pub use codec::{NULL_MARKER, decode, decode_or_empty, encode};
pub use error::{DecodeError, LoadError};
pub use headless::{HeadlessGrid, MemoryNavigation, cell_label, headless_session};
pub use loader::{
    DEFAULT_DATA_URL, FileRowSource, HttpRowSource, LoadHandle, LoadId, RowSource, spawn_row_load,
};
pub use merge::{merge_filter_model, merge_sort_state};
pub use session::Session;
pub use state::StateCell;
pub use sync::{FilterSync, SyncOptions, SyncPhase};
pub use widget::{GridEvent, GridWidget, LoadState, Navigation};
