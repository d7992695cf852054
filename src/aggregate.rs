//! Group-sum and reshape of sales facts into chart- and table-ready views.
//!
//! Duplicate (outlet, period) rows from different source files merge here by
//! summation — never by overwrite. The long-form result feeds two
//! projections of the same data: `table` keeps zero-quantity rows for audit
//! display, `chart` drops them because a zero-length bar segment carries no
//! information. Absent periods are never back-filled as zero rows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::FactStore;

/// One (outlet, period, quantity) triple in long form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPoint {
    pub outlet: String,
    pub period: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesAggregate {
    /// Every (outlet, period) pair seen for the item, zeros included.
    pub table: Vec<SalesPoint>,
    /// The same pairs minus zero-quantity triples.
    pub chart: Vec<SalesPoint>,
    /// Total quantity over the chart projection.
    pub grand_total: f64,
    /// Per-outlet totals over the chart projection, for end-of-bar labels.
    pub per_outlet_total: BTreeMap<String, f64>,
}

/// Aggregates movement of one resolved item identity, optionally restricted
/// to a single outlet. Output is ordered by period (chronological) then
/// outlet.
pub fn aggregate(store: &FactStore, item_name: &str, outlet: Option<&str>) -> SalesAggregate {
    let mut sums: BTreeMap<(usize, String), f64> = BTreeMap::new();
    for fact in store.facts() {
        if fact.item_name != item_name {
            continue;
        }
        if let Some(wanted) = outlet
            && fact.outlet != wanted
        {
            continue;
        }
        let Some(ordinal) = store.period_ordinal(&fact.period) else {
            continue;
        };
        *sums.entry((ordinal, fact.outlet.clone())).or_insert(0.0) += fact.quantity;
    }

    let table: Vec<SalesPoint> = sums
        .into_iter()
        .map(|((ordinal, outlet), quantity)| SalesPoint {
            outlet,
            period: store.periods()[ordinal].clone(),
            quantity,
        })
        .collect();
    let chart: Vec<SalesPoint> = table
        .iter()
        .filter(|point| point.quantity != 0.0)
        .cloned()
        .collect();

    let grand_total = chart.iter().map(|point| point.quantity).sum();
    let mut per_outlet_total = BTreeMap::new();
    for point in &chart {
        *per_outlet_total.entry(point.outlet.clone()).or_insert(0.0) += point.quantity;
    }

    SalesAggregate {
        table,
        chart,
        grand_total,
        per_outlet_total,
    }
}
