//! Grouped totals for chart-ready series
//!
//! Every grouping here is ordered by first appearance in the input, not by
//! key or chronology. Callers that want chronological charts should sort the
//! input before aggregating.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::{
    week_label, BucketTotal, Calendar, CategoryShare, CategoryTotal, ExpenseRecord, Granularity,
    WeeklyTotal,
};

/// Sums keyed by first appearance
///
/// Keeps the key sequence separately from the accumulator map so iteration
/// order never depends on hashing.
#[derive(Debug, Clone)]
pub struct OrderedTotals<K> {
    order: Vec<K>,
    totals: HashMap<K, f64>,
}

impl<K: Eq + Hash + Clone> OrderedTotals<K> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            totals: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: K, amount: f64) {
        match self.totals.get_mut(&key) {
            Some(total) => *total += amount,
            None => {
                self.order.push(key.clone());
                self.totals.insert(key, amount);
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.totals.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume into `(key, total)` pairs in first-seen order
    pub fn into_vec(mut self) -> Vec<(K, f64)> {
        self.order
            .into_iter()
            .map(|key| {
                let total = self.totals.remove(&key).unwrap_or_default();
                (key, total)
            })
            .collect()
    }
}

impl<K: Eq + Hash + Clone> Default for OrderedTotals<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum amounts per category, in order of first appearance
pub fn aggregate_by_category(records: &[ExpenseRecord]) -> Vec<CategoryTotal> {
    let mut totals = OrderedTotals::new();
    for record in records {
        totals.add(record.category.clone(), record.amount);
    }

    totals
        .into_vec()
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect()
}

/// Attach percentage-of-total (0-100) to each category total
///
/// A zero grand total yields 0% everywhere rather than NaN.
pub fn category_shares(totals: &[CategoryTotal]) -> Vec<CategoryShare> {
    let grand_total: f64 = totals.iter().map(|t| t.total).sum();

    totals
        .iter()
        .map(|t| CategoryShare {
            category: t.category.clone(),
            total: t.total,
            percentage: percentage_of(t.total, grand_total),
        })
        .collect()
}

pub(crate) fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Whole seven day periods between `occurred_at` and `now`, floored
///
/// Records dated after `now` give negative indices.
pub fn week_index(occurred_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let week_ms = Duration::weeks(1).num_milliseconds();
    (now - occurred_at).num_milliseconds().div_euclid(week_ms)
}

/// Week-relative totals in first-seen order, with raw week indices
pub fn weekly_totals(records: &[ExpenseRecord], now: DateTime<Utc>) -> Vec<WeeklyTotal> {
    let mut totals = OrderedTotals::new();
    for record in records {
        totals.add(week_index(record.occurred_at, now), record.amount);
    }

    totals
        .into_vec()
        .into_iter()
        .map(|(week_index, total)| WeeklyTotal { week_index, total })
        .collect()
}

/// Bucket label for a single record
pub fn bucket_label(
    record: &ExpenseRecord,
    granularity: Granularity,
    calendar: &Calendar,
    now: DateTime<Utc>,
) -> String {
    let date = record.date_in(calendar);
    match granularity {
        Granularity::Daily => date.format("%b %-d").to_string(),
        Granularity::Monthly => date.format("%b").to_string(),
        Granularity::Yearly => format!("{:04}", date.year()),
        Granularity::WeekRelative => week_label(week_index(record.occurred_at, now)),
    }
}

/// Sum amounts per time bucket, in order of first appearance
///
/// `now` only matters for [`Granularity::WeekRelative`]; re-running later
/// with a different `now` can move a record into another bucket.
pub fn aggregate_by_period(
    records: &[ExpenseRecord],
    granularity: Granularity,
    calendar: &Calendar,
    now: DateTime<Utc>,
) -> Vec<BucketTotal> {
    let mut totals = OrderedTotals::new();
    for record in records {
        totals.add(
            bucket_label(record, granularity, calendar, now),
            record.amount,
        );
    }

    let buckets: Vec<BucketTotal> = totals
        .into_vec()
        .into_iter()
        .map(|(label, total)| BucketTotal { label, total })
        .collect();

    tracing::debug!(
        granularity = granularity.as_str(),
        records = records.len(),
        buckets = buckets.len(),
        "Aggregated expenses by period"
    );

    buckets
}

/// Plain sum of all amounts
pub fn total_spending(records: &[ExpenseRecord]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}
