//! Record filter builder
//!
//! Narrows an expense collection by an inclusive date range and/or a single
//! category. Filtering is stable and never mutates its input.

use chrono::NaiveDate;

use crate::models::{Calendar, DateRange, ExpenseRecord};

/// Builder for narrowing an expense collection
///
/// The lifetime `'query` ties the category name to the caller's storage so
/// building a filter never allocates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseFilter<'query> {
    pub range: DateRange,
    pub category: Option<&'query str>,
    pub calendar: Calendar,
}

impl<'query> ExpenseFilter<'query> {
    /// Create a filter that passes everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive date range
    pub fn range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// Set the lower bound (inclusive)
    pub fn from(mut self, start: Option<NaiveDate>) -> Self {
        self.range.start = start;
        self
    }

    /// Set the upper bound (inclusive)
    pub fn to(mut self, end: Option<NaiveDate>) -> Self {
        self.range.end = end;
        self
    }

    /// Set the exact category match
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// Set the calendar used to resolve record dates against the range
    pub fn calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// True when neither a range bound nor a category is set
    pub fn is_empty(&self) -> bool {
        self.range.is_unbounded() && self.category.is_none()
    }

    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        let in_range =
            self.range.is_unbounded() || self.range.contains(record.date_in(&self.calendar));
        let in_category = self.category.map_or(true, |c| record.category == c);
        in_range && in_category
    }

    /// Return the matching records in input order
    pub fn apply(&self, records: &[ExpenseRecord]) -> Vec<ExpenseRecord> {
        let filtered: Vec<ExpenseRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        tracing::debug!(
            input = records.len(),
            output = filtered.len(),
            category = self.category,
            "Filtered expenses"
        );

        filtered
    }
}

/// Filter `records` by an optional range and an optional category
pub fn filter_records(
    records: &[ExpenseRecord],
    range: Option<DateRange>,
    category: Option<&str>,
    calendar: Calendar,
) -> Vec<ExpenseRecord> {
    ExpenseFilter::new()
        .range(range.unwrap_or_default())
        .category(category)
        .calendar(calendar)
        .apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(category: &str, amount: f64, y: i32, m: u32, d: u32) -> ExpenseRecord {
        ExpenseRecord {
            category: category.to_string(),
            amount,
            occurred_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            record("Food", 20.0, 2024, 1, 1),
            record("Rent", 100.0, 2024, 1, 15),
            record("Food", 30.0, 2024, 1, 2),
            record("Fun", 15.0, 2024, 2, 3),
        ]
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_no_criteria_returns_same_records() {
        let records = sample();
        let filtered = ExpenseFilter::new().apply(&records);
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_empty_input() {
        let filtered = ExpenseFilter::new().category(Some("Food")).apply(&[]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_category_filter_preserves_order() {
        let filtered = ExpenseFilter::new().category(Some("Food")).apply(&sample());
        let amounts: Vec<f64> = filtered.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![20.0, 30.0]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let filtered = ExpenseFilter::new()
            .from(date(2024, 1, 2))
            .to(date(2024, 1, 15))
            .apply(&sample());
        let amounts: Vec<f64> = filtered.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![100.0, 30.0]);
    }

    #[test]
    fn test_open_ended_range() {
        let after = ExpenseFilter::new().from(date(2024, 1, 15)).apply(&sample());
        assert_eq!(after.len(), 2);

        let before = ExpenseFilter::new().to(date(2024, 1, 1)).apply(&sample());
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_range_and_category_combined() {
        let filtered = filter_records(
            &sample(),
            Some(DateRange::new(date(2024, 1, 1), date(2024, 1, 31))),
            Some("Food"),
            Calendar::utc(),
        );
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let filtered = ExpenseFilter::new()
            .from(date(2024, 2, 1))
            .to(date(2024, 1, 1))
            .apply(&sample());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = ExpenseFilter::new()
            .from(date(2024, 1, 2))
            .category(Some("Food"));
        let once = filter.apply(&sample());
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_range_bounds_use_calendar_date() {
        let records = vec![ExpenseRecord {
            category: "Food".into(),
            amount: 7.0,
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap(),
        }];
        let tokyo = Calendar::with_offset(chrono::FixedOffset::east_opt(9 * 3600).unwrap());

        let until_jan_1 = ExpenseFilter::new().to(date(2024, 1, 1));
        assert_eq!(until_jan_1.calendar(Calendar::utc()).apply(&records).len(), 1);
        assert!(until_jan_1.calendar(tokyo).apply(&records).is_empty());

        let from_jan_2 = ExpenseFilter::new().from(date(2024, 1, 2));
        assert!(from_jan_2.calendar(Calendar::utc()).apply(&records).is_empty());
        assert_eq!(from_jan_2.calendar(tokyo).apply(&records).len(), 1);
    }
}
