use std::time::Duration;

use anyhow::{Context, Result};
use gridsync_core::{GridWidget, LoadState, decode, decode_or_empty, encode};
use gridsync_model::QueryString;
use tracing::info;

use gridsync_cli::config::Settings;
use gridsync_cli::edits::{build_predicates, parse_filter_arg, parse_sort_arg, parse_sort_list};
use gridsync_cli::summary::{columns_table, rows_table};
use gridsync_cli::view::{ViewRequest, run_view as run_session};

use crate::cli::{ColumnsArgs, DecodeArgs, EncodeArgs, ViewArgs};

pub fn run_encode(args: &EncodeArgs, settings: &Settings) -> Result<()> {
    let sorts = match &args.sorts {
        Some(raw) => parse_sort_list(raw)?,
        None => Vec::new(),
    };
    let predicates = build_predicates(&settings.columns, args.filters.as_deref(), &sorts)?;
    println!("{}", encode(&settings.columns, &predicates).to_query());
    Ok(())
}

pub fn run_decode(args: &DecodeArgs, settings: &Settings) -> Result<()> {
    let query = QueryString::parse(&args.query);
    match decode(&settings.columns, &query).context("decode query")? {
        Some(predicates) => println!("{}", serde_json::to_string_pretty(&predicates)?),
        None => println!("nothing to restore"),
    }
    Ok(())
}

/// Returns false when the grid ended in its load-failure state.
pub fn run_view(args: &ViewArgs, settings: &Settings) -> Result<bool> {
    let filters = args
        .filters
        .iter()
        .map(|raw| parse_filter_arg(raw))
        .collect::<Result<Vec<_>>>()?;
    let sorts = args
        .sorts
        .iter()
        .map(|raw| parse_sort_arg(raw))
        .collect::<Result<Vec<_>>>()?;
    let request = ViewRequest {
        query: args.query.clone(),
        data: args.data.clone().unwrap_or_else(|| settings.data_url.clone()),
        filters,
        sorts,
        timeout: Duration::from_secs(args.timeout),
    };

    let session = run_session(settings, &request)?;
    let grid = session.widget();
    let ok = match grid.load_state() {
        LoadState::Failed { message, retryable } => {
            eprintln!("error: {message}");
            if *retryable {
                eprintln!("hint: the load can be retried");
            }
            false
        }
        _ => {
            let visible = grid.visible_rows();
            let table = rows_table(
                grid.columns(),
                &grid.filter_model(),
                &grid.sort_state(),
                &visible,
                args.limit,
            );
            println!("{table}");
            println!(
                "Showing {} of {} matching rows ({} loaded)",
                visible.len().min(args.limit),
                visible.len(),
                grid.rows().len()
            );
            true
        }
    };
    let address = session.navigation().address();
    info!(phase = %session.sync().phase(), "session finished");
    println!("Address: ?{address}");
    Ok(ok)
}

pub fn run_columns(args: &ColumnsArgs, settings: &Settings) -> Result<()> {
    let predicates = args
        .query
        .as_deref()
        .and_then(|raw| decode_or_empty(&settings.columns, &QueryString::parse(raw)))
        .unwrap_or_default();
    println!("{}", columns_table(&settings.columns, &predicates));
    Ok(())
}

pub fn run_config(settings: &Settings) -> Result<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}
