pub mod access;
pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod io_utils;
pub mod normalize;
pub mod periods;
pub mod sales;
pub mod search;
pub mod sources;
pub mod stock;
pub mod store;
pub mod table;
pub mod variance;

use std::{env, sync::OnceLock};

use anyhow::{Result, bail};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("outlet_insight", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sales(args) => sales::execute(&args),
        Commands::Variance(args) => variance::execute(&args),
        Commands::Outlets(args) => handle_outlets(&args),
    }
}

fn handle_outlets(args: &cli::OutletsArgs) -> Result<()> {
    let grant = access::Grant::from_env();
    grant.ensure(None)?;

    let (specs, periods) = config::resolve_run_inputs(
        &args.sources,
        args.config.as_deref(),
        &args.periods,
        args.period_year,
    )?;
    if specs.is_empty() {
        bail!("No sales sources given; pass SOURCE arguments or --config");
    }
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;

    let mut cache = store::StoreCache::new();
    let store = cache.load(&specs, &periods, args.delimiter, encoding)?;

    let rows: Vec<Vec<String>> = store
        .outlets_sorted()
        .into_iter()
        .map(|outlet| vec![outlet])
        .collect();
    table::print_table(&["outlet"], &rows);
    info!(
        "Listed {} outlet(s) across {} source(s)",
        rows.len(),
        specs.len()
    );
    Ok(())
}
