//! The `sales` subcommand: consolidate sources, resolve the query, and
//! render per-term movement reports.

use std::collections::HashMap;

use anyhow::{Result, anyhow, bail};
use log::warn;
use serde::Serialize;

use crate::{
    access::Grant,
    aggregate::{self, SalesAggregate},
    cli::SalesArgs,
    config, io_utils,
    search::{self, MatchOutcome, TermMatch},
    store::{FactStore, StoreCache},
    table,
};

#[derive(Debug, Serialize)]
pub struct TermReport {
    pub term: String,
    pub outcome: MatchOutcome,
    /// The identity aggregation ran against: the resolved name, or the
    /// caller's pick for an ambiguous term.
    pub item: Option<String>,
    pub aggregate: Option<SalesAggregate>,
}

#[derive(Debug, Serialize)]
pub struct SalesReport {
    pub terms: Vec<TermReport>,
}

pub fn execute(args: &SalesArgs) -> Result<()> {
    let grant = Grant::from_env();
    grant.ensure(args.outlet.as_deref())?;

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
    let picks = parse_picks(&args.picks)?;

    let mut cache = StoreCache::new();
    let store = cache.load(&specs, &periods, args.delimiter, encoding)?;

    let matches = search::resolve(&store, &args.query, args.outlet.as_deref());
    if matches.is_empty() {
        bail!("Query contains no search terms");
    }

    let report = build_report(&store, matches, &picks, args.outlet.as_deref());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    render_report(&report);
    Ok(())
}

/// Pairs every term outcome with its aggregation. A `NotFound` term never
/// blocks the others; an `Ambiguous` term aggregates only once the caller's
/// pick names one of its candidates.
pub fn build_report(
    store: &FactStore,
    matches: Vec<TermMatch>,
    picks: &HashMap<String, String>,
    outlet: Option<&str>,
) -> SalesReport {
    let terms = matches
        .into_iter()
        .map(|matched| {
            let item = match &matched.outcome {
                MatchOutcome::Resolved(name) => Some(name.clone()),
                MatchOutcome::Ambiguous(candidates) => match picks.get(&matched.term) {
                    Some(pick) if candidates.iter().any(|c| c == pick) => Some(pick.clone()),
                    Some(pick) => {
                        warn!(
                            "Pick '{pick}' for term '{}' is not among its candidates",
                            matched.term
                        );
                        None
                    }
                    None => None,
                },
                MatchOutcome::NotFound => None,
            };
            let aggregate = item
                .as_deref()
                .map(|name| aggregate::aggregate(store, name, outlet));
            TermReport {
                term: matched.term,
                outcome: matched.outcome,
                item,
                aggregate,
            }
        })
        .collect();
    SalesReport { terms }
}

fn parse_picks(raw: &[String]) -> Result<HashMap<String, String>> {
    let mut picks = HashMap::new();
    for entry in raw {
        let (term, item) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("Pick '{entry}' must look like term=Item Name"))?;
        picks.insert(term.trim().to_string(), item.trim().to_string());
    }
    Ok(picks)
}

fn render_report(report: &SalesReport) {
    for (idx, term) in report.terms.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("Results for: {}", term.term);
        match &term.outcome {
            MatchOutcome::NotFound => println!("No item matches '{}'.", term.term),
            MatchOutcome::Resolved(item) => render_aggregate(item, term.aggregate.as_ref()),
            MatchOutcome::Ambiguous(candidates) => match &term.item {
                Some(picked) => render_aggregate(picked, term.aggregate.as_ref()),
                None => {
                    println!(
                        "{} items match; re-run with --pick '{}=<item>':",
                        candidates.len(),
                        term.term
                    );
                    let rows: Vec<Vec<String>> = candidates
                        .iter()
                        .map(|candidate| vec![candidate.clone()])
                        .collect();
                    table::print_table(&["item"], &rows);
                }
            },
        }
    }
}

fn render_aggregate(item: &str, aggregate: Option<&SalesAggregate>) {
    match aggregate {
        Some(aggregate) if !aggregate.chart.is_empty() => {
            let rows: Vec<Vec<String>> = aggregate
                .table
                .iter()
                .map(|point| {
                    vec![
                        point.outlet.clone(),
                        point.period.clone(),
                        format_qty(point.quantity),
                    ]
                })
                .collect();
            table::print_table(&["outlet", "period", "qty"], &rows);
            println!("Total sold ({item}): {}", format_qty(aggregate.grand_total));
            let totals: Vec<Vec<String>> = aggregate
                .per_outlet_total
                .iter()
                .map(|(outlet, qty)| vec![outlet.clone(), format_qty(*qty)])
                .collect();
            table::print_table(&["outlet", "total_qty"], &totals);
        }
        _ => println!("No sales recorded for {item}."),
    }
}

fn format_qty(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_picks_splits_on_first_equals() {
        let picks =
            parse_picks(&["milk=Almond Milk".to_string(), "1=Item = Odd".to_string()]).unwrap();
        assert_eq!(picks.get("milk").map(String::as_str), Some("Almond Milk"));
        assert_eq!(picks.get("1").map(String::as_str), Some("Item = Odd"));
        assert!(parse_picks(&["broken".to_string()]).is_err());
    }

    #[test]
    fn format_qty_drops_trailing_zeroes() {
        assert_eq!(format_qty(12.0), "12");
        assert_eq!(format_qty(2.5), "2.50");
    }
}
