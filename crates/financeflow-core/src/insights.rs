//! Global spending insights
//!
//! These run over the full, unfiltered record collection: they describe the
//! whole book, not the current filter view.

use std::collections::HashSet;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::aggregate::{total_spending, OrderedTotals};
use crate::models::{ActiveWeekday, Calendar, CategorySet, ExpenseRecord, TopCategory};

/// Highest-spending declared category
///
/// Every declared category takes part (unused ones at 0). Ties go to the
/// category declared first. Records in undeclared categories are ignored.
pub fn top_category(records: &[ExpenseRecord], categories: &CategorySet) -> TopCategory {
    let mut best: Option<(&str, f64)> = None;

    for name in categories.iter() {
        let total: f64 = records
            .iter()
            .filter(|r| r.category == name)
            .map(|r| r.amount)
            .sum();

        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((name, total)),
        }
    }

    match best {
        Some((category, total)) if total != 0.0 => TopCategory::Leader {
            category: category.to_string(),
            total,
        },
        _ => TopCategory::NoSpending,
    }
}

/// Total spending divided by the number of distinct days with any record
pub fn average_daily_spend(records: &[ExpenseRecord], calendar: &Calendar) -> f64 {
    let days: HashSet<_> = records.iter().map(|r| r.date_in(calendar)).collect();
    if days.is_empty() {
        return 0.0;
    }
    total_spending(records) / days.len() as f64
}

/// Weekday with the most records; ties go to the weekday seen first
pub fn most_active_weekday(records: &[ExpenseRecord], calendar: &Calendar) -> ActiveWeekday {
    let mut counts = OrderedTotals::new();
    for record in records {
        counts.add(record.date_in(calendar).weekday(), 1.0);
    }

    let mut best = None;
    for (weekday, count) in counts.into_vec() {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((weekday, count)),
        }
    }

    match best {
        Some((weekday, _)) => ActiveWeekday::Day { weekday },
        None => ActiveWeekday::NoData,
    }
}

/// The three global insights together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub top_category: TopCategory,
    pub average_daily_spend: f64,
    pub most_active_weekday: ActiveWeekday,
}

impl InsightSummary {
    pub fn compute(
        records: &[ExpenseRecord],
        categories: &CategorySet,
        calendar: &Calendar,
    ) -> Self {
        let summary = Self {
            top_category: top_category(records, categories),
            average_daily_spend: average_daily_spend(records, calendar),
            most_active_weekday: most_active_weekday(records, calendar),
        };

        tracing::debug!(
            records = records.len(),
            top = %summary.top_category,
            weekday = %summary.most_active_weekday,
            "Computed insights"
        );

        summary
    }
}
