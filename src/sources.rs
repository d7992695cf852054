//! Source specifications and raw table loading.
//!
//! A [`RawTable`] is the unit the normalizers consume: headers, string cells,
//! and the metadata needed to pin down outlet identity (an optional per-file
//! outlet label for single-outlet exports). Reading also captures a SHA-256
//! content digest so the store cache can key on source identity.

use std::{fs, path::PathBuf};

use encoding_rs::Encoding;
use log::debug;
use sha2::{Digest, Sha256};

use crate::{error::LoadError, io_utils};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub outlet_label: Option<String>,
}

impl SourceSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            outlet_label: None,
        }
    }

    pub fn with_outlet(path: impl Into<PathBuf>, outlet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            outlet_label: Some(outlet.into()),
        }
    }

    /// Parses `path` or `path=Outlet Label` (single-outlet ingestion mode).
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('=') {
            Some((path, label)) if !label.trim().is_empty() => {
                Self::with_outlet(path.trim(), label.trim())
            }
            _ => Self::new(raw.trim()),
        }
    }

    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub outlet_label: Option<String>,
    pub digest: [u8; 32],
}

impl RawTable {
    /// Headers with surrounding whitespace stripped, ready for matching.
    pub fn trimmed_headers(&self) -> Vec<String> {
        self.headers
            .iter()
            .map(|header| header.trim().to_string())
            .collect()
    }
}

/// Reads one CSV export into memory. Absent or unparseable files abort the
/// load; there is no skip-and-continue mode.
pub fn read_table(
    spec: &SourceSpec,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<RawTable, LoadError> {
    let bytes = fs::read(&spec.path)
        .map_err(|err| LoadError::missing_source(&spec.path, err.to_string()))?;
    let digest: [u8; 32] = Sha256::digest(&bytes).into();

    let delimiter = io_utils::resolve_input_delimiter(&spec.path, delimiter);
    let mut reader = io_utils::open_csv_reader(bytes.as_slice(), delimiter, true);
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .map_err(|err| LoadError::missing_source(&spec.path, err.to_string()))?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|err| {
            LoadError::missing_source(&spec.path, format!("row {}: {err}", row_idx + 2))
        })?;
        let decoded = io_utils::decode_record(&record, encoding).map_err(|err| {
            LoadError::missing_source(&spec.path, format!("row {}: {err}", row_idx + 2))
        })?;
        rows.push(decoded);
    }

    debug!(
        "Read {} row(s) and {} column(s) from {:?}",
        rows.len(),
        headers.len(),
        spec.path
    );

    Ok(RawTable {
        name: spec.display_name(),
        headers,
        rows,
        outlet_label: spec.outlet_label.clone(),
        digest,
    })
}

/// Locates a required column in a trimmed header list.
pub(crate) fn require_column(
    source_name: &str,
    headers: &[String],
    column: &str,
) -> Result<usize, LoadError> {
    headers.iter().position(|header| header == column).ok_or_else(|| {
        LoadError::schema(source_name, format!("required column '{column}' not found"))
    })
}

pub(crate) fn cell_text(row: &[String], idx: usize) -> String {
    row.get(idx).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_outlet_label() {
        let spec = SourceSpec::parse("exports/main.csv=Main Street");
        assert_eq!(spec.path, PathBuf::from("exports/main.csv"));
        assert_eq!(spec.outlet_label.as_deref(), Some("Main Street"));
    }

    #[test]
    fn parse_without_label_keeps_path_only() {
        let spec = SourceSpec::parse(" exports/all.csv ");
        assert_eq!(spec.path, PathBuf::from("exports/all.csv"));
        assert_eq!(spec.outlet_label, None);
    }

    #[test]
    fn parse_ignores_empty_label() {
        let spec = SourceSpec::parse("exports/all.csv=");
        assert_eq!(spec.outlet_label, None);
    }
}
