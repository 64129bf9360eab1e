//! FinanceFlow Core Library
//!
//! The expense analytics engine behind the FinanceFlow tracker:
//! - Filtering by inclusive date range and category
//! - Category and time-bucket aggregation in first-seen order
//! - Global insights (top category, daily average, busiest weekday)
//! - Budget comparison
//! - Pluggable forecast backends behind a never-failing adapter
//! - CSV/JSON export
//! - Expense book storage and TOML configuration for callers
//!
//! Everything except the forecast adapter is synchronous and pure: inputs are
//! borrowed snapshots, outputs are new values, and "now" plus the calendar
//! offset are explicit parameters.

pub mod aggregate;
pub mod book;
pub mod budget;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod forecast;
pub mod insights;
pub mod models;
pub mod snapshot;

/// Test utilities including mock forecast server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{
    aggregate_by_category, aggregate_by_period, category_shares, total_spending, weekly_totals,
    OrderedTotals,
};
pub use book::ExpenseBook;
pub use budget::BudgetStatus;
pub use config::{AppConfig, BookDefaults, ForecastConfig};
pub use error::{Error, Result};
pub use export::{export, export_csv, export_json, ExportFormat, EXPORT_MIME_TYPE};
pub use filter::{filter_records, ExpenseFilter};
pub use forecast::{
    ForecastAdapter, ForecastBackend, ForecastClient, ForecastOutcome, ForecastPoint,
    HttpForecastBackend, LatestForecast, MockForecastBackend,
};
pub use insights::{average_daily_spend, most_active_weekday, top_category, InsightSummary};
pub use models::{
    ActiveWeekday, BucketTotal, Calendar, CategorySet, CategoryShare, CategoryTotal, DateRange,
    ExpenseRecord, Granularity, TopCategory, WeeklyTotal,
};
pub use snapshot::SpendingSnapshot;
