//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "gridsync",
    version,
    about = "Mirror grid filter and sort state in a URL query string",
    long_about = "Encode and decode grid filter state as URL query parameters.\n\n\
                  `view` runs a full session against a headless grid: restore from\n\
                  an address bar, load rows, apply edits and print the result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: ./gridsync.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write sort changes to the query string.
    #[arg(long = "persist-sort", global = true)]
    pub persist_sort: bool,

    /// Push sort state from the query string into the grid on load.
    #[arg(long = "restore-sort", global = true)]
    pub restore_sort: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Encode filters and sorts as a query string.
    Encode(EncodeArgs),

    /// Decode a query string into column predicates.
    Decode(DecodeArgs),

    /// Run a headless grid session and print the visible rows.
    View(ViewArgs),

    /// List the declared columns.
    Columns(ColumnsArgs),

    /// Print the effective settings as TOML.
    Config,
}

#[derive(Parser)]
pub struct EncodeArgs {
    /// JSON object of column filters, e.g. '{"make":"Ford"}'.
    #[arg(long = "filters", value_name = "JSON")]
    pub filters: Option<String>,

    /// Comma-separated sorts, e.g. 'make=asc,price=desc'.
    #[arg(long = "sorts", value_name = "COL=DIR,...")]
    pub sorts: Option<String>,
}

#[derive(Parser)]
pub struct DecodeArgs {
    /// Address-bar query, with or without the leading '?'.
    #[arg(value_name = "QUERY")]
    pub query: String,
}

#[derive(Parser)]
pub struct ViewArgs {
    /// Address-bar query to restore from.
    #[arg(long = "query", value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Row feed URL or local JSON file (overrides the settings file).
    #[arg(long = "data", value_name = "URL|PATH")]
    pub data: Option<String>,

    /// Filter edit after load: COLUMN=JSON (repeatable; JSON null clears).
    #[arg(long = "filter", value_name = "COL=JSON")]
    pub filters: Vec<String>,

    /// Sort edit after load: COLUMN=asc|desc (repeatable).
    #[arg(long = "sort", value_name = "COL=DIR")]
    pub sorts: Vec<String>,

    /// Maximum number of rows to print.
    #[arg(long = "limit", value_name = "N", default_value_t = 20)]
    pub limit: usize,

    /// Seconds to wait for row data.
    #[arg(long = "timeout", value_name = "SECS", default_value_t = 60)]
    pub timeout: u64,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Show each column's query value for this address-bar query.
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
