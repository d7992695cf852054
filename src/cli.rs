use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::variance::DEFAULT_TOP_MOVERS;

#[derive(Debug, Parser)]
#[command(author, version, about = "Consolidate and query outlet sales and stock-variance exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search consolidated sales sources and aggregate item movement
    Sales(SalesArgs),
    /// Compute stock variance, valuation, and top-mover rankings for one outlet
    Variance(VarianceArgs),
    /// List the distinct outlets present in the sales sources
    Outlets(OutletsArgs),
}

#[derive(Debug, Args)]
pub struct SalesArgs {
    /// Source CSV exports; `path` or `path=Outlet Label` for single-outlet files
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,
    /// YAML config naming sources and period order (alternative to SOURCE args)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Search terms separated by whitespace; each term is resolved independently
    #[arg(short, long)]
    pub query: String,
    /// Restrict matching and aggregation to one outlet
    #[arg(long)]
    pub outlet: Option<String>,
    /// Disambiguation picks of the form `term=Item Name`
    #[arg(long = "pick", action = clap::ArgAction::Append)]
    pub picks: Vec<String>,
    /// Comma-separated canonical period labels overriding the default order
    #[arg(long, value_delimiter = ',')]
    pub periods: Vec<String>,
    /// Calendar year for the default Jan..Dec period labels
    #[arg(long = "period-year")]
    pub period_year: Option<i32>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the report as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct VarianceArgs {
    /// Physical-count export for one outlet
    #[arg(short, long)]
    pub input: PathBuf,
    /// Outlet the export belongs to
    #[arg(long)]
    pub outlet: String,
    /// Restrict the report to one category
    #[arg(long)]
    pub category: Option<String>,
    /// Number of rows in each top-movers list
    #[arg(long, default_value_t = DEFAULT_TOP_MOVERS)]
    pub top: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the report as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct OutletsArgs {
    /// Source CSV exports; `path` or `path=Outlet Label` for single-outlet files
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,
    /// YAML config naming sources and period order (alternative to SOURCE args)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Comma-separated canonical period labels overriding the default order
    #[arg(long, value_delimiter = ',')]
    pub periods: Vec<String>,
    /// Calendar year for the default Jan..Dec period labels
    #[arg(long = "period-year")]
    pub period_year: Option<i32>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

fn parse_delimiter(raw: &str) -> Result<u8, String> {
    let trimmed = raw.trim();
    match trimmed {
        "tab" | "\\t" => Ok(b'\t'),
        _ if trimmed.len() == 1 => Ok(trimmed.as_bytes()[0]),
        _ => Err(format!("Unsupported delimiter '{raw}'")),
    }
}
