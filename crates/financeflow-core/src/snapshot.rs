//! One-shot view model for a dashboard
//!
//! Runs filter -> {breakdown, period series} over the filtered view, and the
//! budget and insights over the full collection, in a single call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_by_category, aggregate_by_period, category_shares};
use crate::budget::BudgetStatus;
use crate::filter::ExpenseFilter;
use crate::insights::InsightSummary;
use crate::models::{BucketTotal, CategorySet, CategoryShare, ExpenseRecord, Granularity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSnapshot {
    pub generated_at: DateTime<Utc>,
    pub granularity: Granularity,
    pub record_count: usize,
    pub filtered_count: usize,
    pub breakdown: Vec<CategoryShare>,
    pub series: Vec<BucketTotal>,
    /// Budget compared against total spending, ignoring the filter
    pub budget: BudgetStatus,
    /// Always computed over every record, ignoring the filter
    pub insights: InsightSummary,
}

impl SpendingSnapshot {
    pub fn build(
        records: &[ExpenseRecord],
        categories: &CategorySet,
        budget: f64,
        filter: &ExpenseFilter<'_>,
        granularity: Granularity,
        now: DateTime<Utc>,
    ) -> Self {
        let filtered = filter.apply(records);
        let calendar = filter.calendar;

        Self {
            generated_at: now,
            granularity,
            record_count: records.len(),
            filtered_count: filtered.len(),
            breakdown: category_shares(&aggregate_by_category(&filtered)),
            series: aggregate_by_period(&filtered, granularity, &calendar, now),
            budget: BudgetStatus::compute(budget, records),
            insights: InsightSummary::compute(records, categories, &calendar),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }
}
