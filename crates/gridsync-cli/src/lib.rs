//! Library components of the `gridsync` command.

pub mod config;
pub mod edits;
pub mod logging;
pub mod summary;
pub mod view;
