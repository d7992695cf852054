//! The immutable canonical fact table and its derived indexes.
//!
//! A [`FactStore`] is built once per distinct source set and never mutated;
//! every query produces new derived structures instead of touching shared
//! state. [`StoreCache`] memoizes construction, keyed by each source's path
//! and content digest plus the active period order, so re-running a query in
//! the same session skips the rebuild when nothing changed on disk.

use std::{collections::HashMap, sync::Arc};

use encoding_rs::Encoding;
use log::{debug, info};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{
    error::LoadError,
    normalize,
    periods::PeriodOrder,
    sources::{RawTable, SourceSpec, read_table},
};

/// One canonical (outlet, item, period, quantity) record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesFact {
    pub outlet: String,
    pub item_code: String,
    pub item_name: String,
    pub period: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactStore {
    facts: Vec<SalesFact>,
    periods: Vec<String>,
    outlets: Vec<String>,
}

impl FactStore {
    pub(crate) fn new(facts: Vec<SalesFact>, periods: Vec<String>, outlets: Vec<String>) -> Self {
        Self {
            facts,
            periods,
            outlets,
        }
    }

    pub fn facts(&self) -> &[SalesFact] {
        &self.facts
    }

    /// Recognized period labels in chronological order. Only periods that
    /// actually appeared as source columns are present.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// Distinct outlets by first appearance in the underlying table.
    pub fn outlets(&self) -> &[String] {
        &self.outlets
    }

    /// Alphabetical outlet list, the order pickers display.
    pub fn outlets_sorted(&self) -> Vec<String> {
        let mut sorted = self.outlets.clone();
        sorted.sort();
        sorted
    }

    pub fn period_ordinal(&self, label: &str) -> Option<usize> {
        self.periods.iter().position(|known| known == label)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Memoizes [`FactStore`] construction per source set. Invalidation is
/// coarse: a changed file content or period order produces a new key, and the
/// cache dies with the process.
#[derive(Debug, Default)]
pub struct StoreCache {
    entries: HashMap<String, Arc<FactStore>>,
}

impl StoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every source and returns the cached store when all paths,
    /// content digests, and the period order are unchanged; otherwise
    /// normalizes from scratch. Any unreadable or schema-broken source fails
    /// the whole call.
    pub fn load(
        &mut self,
        specs: &[SourceSpec],
        periods: &PeriodOrder,
        delimiter: Option<u8>,
        encoding: &'static Encoding,
    ) -> Result<Arc<FactStore>, LoadError> {
        let tables = specs
            .iter()
            .map(|spec| read_table(spec, delimiter, encoding))
            .collect::<Result<Vec<_>, _>>()?;
        let key = cache_key(&tables, periods);
        if let Some(store) = self.entries.get(&key) {
            debug!("Reusing cached fact store for {} source(s)", specs.len());
            return Ok(Arc::clone(store));
        }
        let store = Arc::new(normalize::normalize(&tables, periods)?);
        info!(
            "Consolidated {} fact(s) across {} source(s)",
            store.len(),
            specs.len()
        );
        self.entries.insert(key, Arc::clone(&store));
        Ok(store)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn cache_key(tables: &[RawTable], periods: &PeriodOrder) -> String {
    let mut hasher = Sha256::new();
    for table in tables {
        hasher.update(table.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(table.digest);
        if let Some(label) = &table.outlet_label {
            hasher.update(label.as_bytes());
        }
        hasher.update([0u8]);
    }
    for label in periods.labels() {
        hasher.update(label.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
