//! Sales-shape normalization: N raw tables into one canonical fact table.
//!
//! The sales shape is an explicit column declaration — an outlet identity
//! column (canonical, aliased, or injected per file), `Item Code`, `Items`,
//! and whatever period columns the active [`PeriodOrder`] recognizes.
//! Unrecognized columns are dropped. Non-numeric and missing quantity cells
//! coerce to zero; that is documented cleaning policy, not an error.
//!
//! Sources are unioned row-wise with no deduplication. Duplicate
//! (outlet, item, period) rows are merged by summation at aggregation time,
//! which keeps ingestion a single pass per file.

use log::debug;

use crate::{
    error::LoadError,
    periods::PeriodOrder,
    sources::{RawTable, cell_text, require_column},
    store::{FactStore, SalesFact},
};

pub const OUTLET_COLUMN: &str = "Outlet";
pub const OUTLET_ALIASES: &[&str] = &["Company Name"];
pub const ITEM_CODE_COLUMN: &str = "Item Code";
pub const ITEM_NAME_COLUMN: &str = "Items";

enum OutletIdentity {
    Column(usize),
    Injected(String),
}

/// Builds the canonical fact table from every source, or fails on the first
/// source whose identity columns cannot be determined. Never returns a
/// partially loaded store.
pub fn normalize(sources: &[RawTable], periods: &PeriodOrder) -> Result<FactStore, LoadError> {
    let mut facts = Vec::new();
    let mut store_periods: Vec<String> = Vec::new();
    let mut outlets: Vec<String> = Vec::new();

    for table in sources {
        let headers = table.trimmed_headers();
        let identity = resolve_outlet_identity(table, &headers)?;
        let code_idx = require_column(&table.name, &headers, ITEM_CODE_COLUMN)?;
        let name_idx = require_column(&table.name, &headers, ITEM_NAME_COLUMN)?;

        let period_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| periods.contains(header))
            .map(|(idx, header)| (idx, header.clone()))
            .collect();

        let recognized: Vec<usize> = {
            let mut known = vec![code_idx, name_idx];
            if let OutletIdentity::Column(idx) = &identity {
                known.push(*idx);
            }
            known.extend(period_columns.iter().map(|(idx, _)| *idx));
            known
        };
        let dropped: Vec<&String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !recognized.contains(idx))
            .map(|(_, header)| header)
            .collect();
        if !dropped.is_empty() {
            debug!(
                "Dropping {} unrecognized column(s) from '{}': {:?}",
                dropped.len(),
                table.name,
                dropped
            );
        }

        for (_, label) in &period_columns {
            if !store_periods.contains(label) {
                store_periods.push(label.clone());
            }
        }

        for row in &table.rows {
            let outlet = match &identity {
                OutletIdentity::Column(idx) => cell_text(row, *idx),
                OutletIdentity::Injected(label) => label.clone(),
            };
            if !outlets.contains(&outlet) {
                outlets.push(outlet.clone());
            }
            let item_code = cell_text(row, code_idx);
            let item_name = cell_text(row, name_idx);
            for (idx, label) in &period_columns {
                facts.push(SalesFact {
                    outlet: outlet.clone(),
                    item_code: item_code.clone(),
                    item_name: item_name.clone(),
                    period: label.clone(),
                    quantity: coerce_quantity(row.get(*idx)),
                });
            }
        }
    }

    store_periods.sort_by_key(|label| periods.ordinal(label));
    Ok(FactStore::new(facts, store_periods, outlets))
}

fn resolve_outlet_identity(
    table: &RawTable,
    headers: &[String],
) -> Result<OutletIdentity, LoadError> {
    if let Some(idx) = headers.iter().position(|header| header == OUTLET_COLUMN) {
        return Ok(OutletIdentity::Column(idx));
    }
    for alias in OUTLET_ALIASES {
        if let Some(idx) = headers.iter().position(|header| header == alias) {
            debug!(
                "Canonicalizing aliased outlet column '{alias}' in '{}'",
                table.name
            );
            return Ok(OutletIdentity::Column(idx));
        }
    }
    if let Some(label) = &table.outlet_label {
        return Ok(OutletIdentity::Injected(label.clone()));
    }
    Err(LoadError::schema(
        &table.name,
        "no 'Outlet' column, no known alias, and no outlet label was supplied",
    ))
}

/// Quantity cells always land as a number: empty and non-numeric values
/// become zero.
fn coerce_quantity(raw: Option<&String>) -> f64 {
    raw.map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .and_then(|cell| cell.parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_quantity_handles_bad_cells() {
        assert_eq!(coerce_quantity(Some(&"12".to_string())), 12.0);
        assert_eq!(coerce_quantity(Some(&" 3.5 ".to_string())), 3.5);
        assert_eq!(coerce_quantity(Some(&"bad".to_string())), 0.0);
        assert_eq!(coerce_quantity(Some(&String::new())), 0.0);
        assert_eq!(coerce_quantity(None), 0.0);
    }
}
