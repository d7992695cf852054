//! Stock-variance computation: diff/value enrichment, totals, and top-mover
//! rankings, plus the `variance` subcommand.
//!
//! The two rankings deliberately disagree: quantity ranks by |diff stock|
//! while value ranks by signed diff value, so overages outrank shrinkage on
//! the value list. Both orderings are preserved as observed in the reporting
//! screens this engine consolidates; see DESIGN.md before unifying them.

use std::collections::HashSet;

use anyhow::Result;
use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    access::Grant,
    cli::VarianceArgs,
    io_utils,
    sources::{self, SourceSpec},
    stock::{self, StockRow},
    table,
};

pub const DEFAULT_TOP_MOVERS: usize = 30;

/// One fully enriched stock record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockFact {
    pub outlet: String,
    pub category: String,
    pub item_no: String,
    pub item_name: String,
    pub barcode: String,
    pub book_stock: Decimal,
    pub phys_stock: Decimal,
    pub cost_price: Option<Decimal>,
    pub diff_stock: Decimal,
    pub book_value: Option<Decimal>,
    pub phys_value: Option<Decimal>,
    pub diff_value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceSummary {
    pub book_stock: Decimal,
    pub phys_stock: Decimal,
    pub diff_stock: Decimal,
    pub book_value: Option<Decimal>,
    pub phys_value: Option<Decimal>,
    pub diff_value: Option<Decimal>,
    /// Diff over book stock, in percent. Exactly zero when the book total is
    /// zero.
    pub variance_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceReport {
    pub rows: Vec<StockFact>,
    pub summary: VarianceSummary,
    /// Largest |diff stock| first; ties keep original row order.
    pub top_by_qty: Vec<StockFact>,
    /// Largest signed diff value first; rows without a value are not
    /// rankable here.
    pub top_by_value: Vec<StockFact>,
    /// Everything outside both top lists, category ascending then diff stock
    /// descending.
    pub remaining: Vec<StockFact>,
}

pub fn execute(args: &VarianceArgs) -> Result<()> {
    let grant = Grant::from_env();
    grant.ensure(Some(&args.outlet))?;

    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let spec = SourceSpec::new(&args.input);
    let raw = sources::read_table(&spec, args.delimiter, encoding)?;
    let mut rows = stock::parse_stock_rows(&raw, &args.outlet)?;
    if let Some(category) = &args.category {
        rows.retain(|row| row.category == *category);
    }
    info!(
        "Loaded {} stock row(s) for outlet '{}'",
        rows.len(),
        args.outlet
    );

    let report = compute_variance(rows, args.top);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    render_report(&report, args.top);
    Ok(())
}

/// Fills in diff stock when the source carried none, and derives the three
/// value fields when a cost price is present. An absent cost price keeps the
/// values absent; "unknown" never turns into zero.
pub fn enrich(row: StockRow) -> StockFact {
    let diff_stock = row
        .diff_stock
        .unwrap_or(row.phys_stock - row.book_stock);
    let value = |stock: Decimal| row.cost_price.map(|price| stock * price);
    StockFact {
        book_value: value(row.book_stock),
        phys_value: value(row.phys_stock),
        diff_value: value(diff_stock),
        outlet: row.outlet,
        category: row.category,
        item_no: row.item_no,
        item_name: row.item_name,
        barcode: row.barcode,
        book_stock: row.book_stock,
        phys_stock: row.phys_stock,
        cost_price: row.cost_price,
        diff_stock,
    }
}

pub fn compute_variance(rows: Vec<StockRow>, top: usize) -> VarianceReport {
    let facts: Vec<StockFact> = rows.into_iter().map(enrich).collect();
    let summary = summarize(&facts);

    let mut by_qty: Vec<usize> = (0..facts.len()).collect();
    by_qty.sort_by(|&a, &b| {
        facts[b]
            .diff_stock
            .abs()
            .cmp(&facts[a].diff_stock.abs())
    });
    by_qty.truncate(top);

    let mut by_value: Vec<usize> = facts
        .iter()
        .enumerate()
        .filter(|(_, fact)| fact.diff_value.is_some())
        .map(|(idx, _)| idx)
        .collect();
    by_value.sort_by(|&a, &b| facts[b].diff_value.cmp(&facts[a].diff_value));
    by_value.truncate(top);

    let ranked: HashSet<usize> = by_qty.iter().chain(by_value.iter()).copied().collect();
    let mut remaining: Vec<usize> = (0..facts.len())
        .filter(|idx| !ranked.contains(idx))
        .collect();
    remaining.sort_by(|&a, &b| {
        facts[a]
            .category
            .cmp(&facts[b].category)
            .then(facts[b].diff_stock.cmp(&facts[a].diff_stock))
    });

    let materialize =
        |indices: &[usize]| indices.iter().map(|&idx| facts[idx].clone()).collect();
    VarianceReport {
        top_by_qty: materialize(&by_qty),
        top_by_value: materialize(&by_value),
        remaining: materialize(&remaining),
        summary,
        rows: facts,
    }
}

fn summarize(facts: &[StockFact]) -> VarianceSummary {
    let book_stock: Decimal = facts.iter().map(|fact| fact.book_stock).sum();
    let phys_stock: Decimal = facts.iter().map(|fact| fact.phys_stock).sum();
    let diff_stock: Decimal = facts.iter().map(|fact| fact.diff_stock).sum();
    let variance_pct = if book_stock.is_zero() {
        Decimal::ZERO
    } else {
        diff_stock / book_stock * Decimal::ONE_HUNDRED
    };
    VarianceSummary {
        book_stock,
        phys_stock,
        diff_stock,
        book_value: sum_present(facts, |fact| fact.book_value),
        phys_value: sum_present(facts, |fact| fact.phys_value),
        diff_value: sum_present(facts, |fact| fact.diff_value),
        variance_pct,
    }
}

/// Totals over the rows that carry a value; `None` when no row does.
fn sum_present(
    facts: &[StockFact],
    pick: impl Fn(&StockFact) -> Option<Decimal>,
) -> Option<Decimal> {
    facts
        .iter()
        .filter_map(pick)
        .fold(None, |acc, value| Some(acc.unwrap_or(Decimal::ZERO) + value))
}

const STOCK_HEADERS: [&str; 8] = [
    "category",
    "item_no",
    "item_name",
    "barcode",
    "book",
    "phys",
    "diff",
    "diff_value",
];

fn render_report(report: &VarianceReport, top: usize) {
    let summary = &report.summary;
    println!("Variance summary ({} row(s))", report.rows.len());
    let summary_rows = vec![
        summary_line("book", summary.book_stock, summary.book_value),
        summary_line("phys", summary.phys_stock, summary.phys_value),
        summary_line("diff", summary.diff_stock, summary.diff_value),
        vec![
            "variance %".to_string(),
            summary.variance_pct.round_dp(2).to_string(),
            String::new(),
        ],
    ];
    table::print_table(&["measure", "stock", "value"], &summary_rows);

    println!();
    println!("Top {top} by quantity variance");
    table::print_table(&STOCK_HEADERS, &stock_lines(&report.top_by_qty));

    println!();
    println!("Top {top} by value variance");
    table::print_table(&STOCK_HEADERS, &stock_lines(&report.top_by_value));

    println!();
    println!("Remaining ({} row(s))", report.remaining.len());
    table::print_table(&STOCK_HEADERS, &stock_lines(&report.remaining));
}

fn summary_line(measure: &str, stock: Decimal, value: Option<Decimal>) -> Vec<String> {
    vec![measure.to_string(), stock.to_string(), decimal_cell(value)]
}

fn stock_lines(facts: &[StockFact]) -> Vec<Vec<String>> {
    facts
        .iter()
        .map(|fact| {
            vec![
                fact.category.clone(),
                fact.item_no.clone(),
                fact.item_name.clone(),
                fact.barcode.clone(),
                fact.book_stock.to_string(),
                fact.phys_stock.to_string(),
                fact.diff_stock.to_string(),
                decimal_cell(fact.diff_value),
            ]
        })
        .collect()
}

fn decimal_cell(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(book: i64, phys: i64, cost: Option<i64>) -> StockRow {
        StockRow {
            outlet: "Main".to_string(),
            category: "Dairy".to_string(),
            item_no: "1".to_string(),
            item_name: "Milk".to_string(),
            barcode: "111".to_string(),
            book_stock: Decimal::from(book),
            phys_stock: Decimal::from(phys),
            cost_price: cost.map(Decimal::from),
            diff_stock: None,
        }
    }

    #[test]
    fn enrich_computes_diff_and_values() {
        let fact = enrich(row(10, 8, Some(3)));
        assert_eq!(fact.diff_stock, Decimal::from(-2));
        assert_eq!(fact.book_value, Some(Decimal::from(30)));
        assert_eq!(fact.phys_value, Some(Decimal::from(24)));
        assert_eq!(fact.diff_value, Some(Decimal::from(-6)));
    }

    #[test]
    fn enrich_keeps_values_absent_without_cost_price() {
        let fact = enrich(row(10, 8, None));
        assert_eq!(fact.book_value, None);
        assert_eq!(fact.phys_value, None);
        assert_eq!(fact.diff_value, None);
    }

    #[test]
    fn enrich_prefers_source_diff_when_present() {
        let mut source = row(10, 8, None);
        source.diff_stock = Some(Decimal::from(5));
        assert_eq!(enrich(source).diff_stock, Decimal::from(5));
    }

    #[test]
    fn zero_book_total_yields_zero_percent() {
        let report = compute_variance(vec![row(0, 3, None)], DEFAULT_TOP_MOVERS);
        assert_eq!(report.summary.variance_pct, Decimal::ZERO);
    }

    #[test]
    fn value_totals_stay_absent_without_any_cost_price() {
        let report = compute_variance(vec![row(1, 1, None)], DEFAULT_TOP_MOVERS);
        assert_eq!(report.summary.book_value, None);
        assert_eq!(report.summary.diff_value, None);
    }
}
