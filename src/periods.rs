//! Canonical period labels and their chronological order.
//!
//! A source column is a time dimension only if its trimmed header exactly
//! matches one of these labels. Anything else is not a period, no matter how
//! date-like the header looks.

use anyhow::{Result, bail};
use chrono::NaiveDate;

pub const DEFAULT_PERIOD_YEAR: i32 = 2025;

/// Ordered sequence of canonical period labels, e.g. `Jan-2025`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodOrder {
    labels: Vec<String>,
}

impl PeriodOrder {
    /// The twelve calendar months of `year` rendered as `%b-%Y`.
    pub fn calendar_year(year: i32) -> Self {
        let labels = (1..=12)
            .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
            .map(|date| date.format("%b-%Y").to_string())
            .collect();
        Self { labels }
    }

    /// Builds an explicit order from caller-supplied labels. Labels are
    /// trimmed; empty fragments are dropped; duplicates are rejected.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        if labels.is_empty() {
            bail!("Period order requires at least one label");
        }
        for (idx, label) in labels.iter().enumerate() {
            if labels[..idx].contains(label) {
                bail!("Duplicate period label '{label}'");
            }
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Chronological position of `label`, or `None` for unrecognized headers.
    pub fn ordinal(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|known| known == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.ordinal(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for PeriodOrder {
    fn default() -> Self {
        Self::calendar_year(DEFAULT_PERIOD_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_year_renders_month_labels() {
        let order = PeriodOrder::calendar_year(2025);
        assert_eq!(order.len(), 12);
        assert_eq!(order.labels()[0], "Jan-2025");
        assert_eq!(order.labels()[11], "Dec-2025");
    }

    #[test]
    fn ordinal_follows_label_order() {
        let order = PeriodOrder::from_labels(["Jan-2025", "Feb-2025"]).unwrap();
        assert_eq!(order.ordinal("Jan-2025"), Some(0));
        assert_eq!(order.ordinal("Feb-2025"), Some(1));
        assert_eq!(order.ordinal("Dec-2026"), None);
    }

    #[test]
    fn from_labels_trims_and_rejects_duplicates() {
        let order = PeriodOrder::from_labels([" Jan-2025 ", "Feb-2025"]).unwrap();
        assert!(order.contains("Jan-2025"));
        assert!(PeriodOrder::from_labels(["Jan-2025", "Jan-2025"]).is_err());
        assert!(PeriodOrder::from_labels(Vec::<String>::new()).is_err());
    }
}
