//! Variance-shape ingestion: physical-count sheets, one file per outlet.
//!
//! The shape is an explicit column declaration, never inferred by excluding
//! known columns. `Cost Price` and `Diff Stock` are the only optional
//! columns; a missing cost price stays absent ("unknown"), it is never
//! defaulted to zero.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    error::LoadError,
    sources::{RawTable, cell_text, require_column},
};

pub const CATEGORY_COLUMN: &str = "Category";
pub const ITEM_NAME_COLUMN: &str = "Item Name";
pub const ITEM_NO_COLUMN: &str = "Item No";
pub const BARCODE_COLUMN: &str = "Barcode";
pub const BOOK_STOCK_COLUMN: &str = "Book Stock";
pub const PHYS_STOCK_COLUMN: &str = "Phys Stock";
pub const COST_PRICE_COLUMN: &str = "Cost Price";
pub const DIFF_STOCK_COLUMN: &str = "Diff Stock";

/// One parsed physical-count row, before variance enrichment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRow {
    pub outlet: String,
    pub category: String,
    pub item_no: String,
    pub item_name: String,
    pub barcode: String,
    pub book_stock: Decimal,
    pub phys_stock: Decimal,
    pub cost_price: Option<Decimal>,
    /// Carried from the source when the sheet already has a diff column;
    /// otherwise filled in during enrichment.
    pub diff_stock: Option<Decimal>,
}

/// Parses one outlet's physical-count export. The outlet key comes from the
/// caller because these sheets carry no outlet column of their own.
pub fn parse_stock_rows(table: &RawTable, outlet: &str) -> Result<Vec<StockRow>, LoadError> {
    let headers = table.trimmed_headers();
    let category_idx = require_column(&table.name, &headers, CATEGORY_COLUMN)?;
    let name_idx = require_column(&table.name, &headers, ITEM_NAME_COLUMN)?;
    let no_idx = require_column(&table.name, &headers, ITEM_NO_COLUMN)?;
    let barcode_idx = require_column(&table.name, &headers, BARCODE_COLUMN)?;
    let book_idx = require_column(&table.name, &headers, BOOK_STOCK_COLUMN)?;
    let phys_idx = require_column(&table.name, &headers, PHYS_STOCK_COLUMN)?;
    let cost_idx = headers.iter().position(|header| header == COST_PRICE_COLUMN);
    let diff_idx = headers.iter().position(|header| header == DIFF_STOCK_COLUMN);

    let rows = table
        .rows
        .iter()
        .map(|row| StockRow {
            outlet: outlet.to_string(),
            category: cell_text(row, category_idx),
            item_no: cell_text(row, no_idx),
            item_name: cell_text(row, name_idx),
            barcode: cell_text(row, barcode_idx),
            book_stock: coerce_decimal(row.get(book_idx)),
            phys_stock: coerce_decimal(row.get(phys_idx)),
            cost_price: cost_idx.and_then(|idx| optional_decimal(row.get(idx))),
            diff_stock: diff_idx.and_then(|idx| optional_decimal(row.get(idx))),
        })
        .collect();
    Ok(rows)
}

/// Stock counts always land as a number: empty and non-numeric cells become
/// zero.
fn coerce_decimal(raw: Option<&String>) -> Decimal {
    optional_decimal(raw).unwrap_or(Decimal::ZERO)
}

fn optional_decimal(raw: Option<&String>) -> Option<Decimal> {
    raw.map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .and_then(|cell| cell.parse::<Decimal>().ok())
}
