//! Dashboard aggregations over the full record set.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::expense::{Category, ExpenseRecord};

/// Totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Sum of `total_value` per category, in category declaration order
    pub by_category: Vec<(Category, f64)>,
    /// Sum of `total_value` per date, oldest first
    pub by_date: Vec<(NaiveDate, f64)>,
    pub grand_total: f64,
    pub record_count: usize,
}

/// Compute both aggregations, or `None` when there is nothing to show.
pub fn summarize(records: &[ExpenseRecord]) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }

    Some(Summary {
        by_category: totals_by_category(records),
        by_date: totals_by_date(records),
        grand_total: records.iter().map(|r| r.total_value).sum(),
        record_count: records.len(),
    })
}

/// Group by category and sum. Only categories that occur are listed.
pub fn totals_by_category(records: &[ExpenseRecord]) -> Vec<(Category, f64)> {
    sum_by(records, |record| record.category)
}

/// Group by calendar date and sum, for the time series.
pub fn totals_by_date(records: &[ExpenseRecord]) -> Vec<(NaiveDate, f64)> {
    sum_by(records, |record| record.date)
}

fn sum_by<K: Ord>(records: &[ExpenseRecord], key: impl Fn(&ExpenseRecord) -> K) -> Vec<(K, f64)> {
    records
        .iter()
        .fold(BTreeMap::new(), |mut groups, record| {
            *groups.entry(key(record)).or_insert(0.0) += record.total_value;
            groups
        })
        .into_iter()
        .collect()
}
