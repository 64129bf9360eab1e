//! Domain models for FinanceFlow

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub category: String,
    pub amount: f64,
    pub occurred_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Build a record, validating the shape at the ingestion boundary.
    ///
    /// The engine itself never rejects records; callers that construct
    /// records by hand take responsibility for their shape.
    pub fn new(
        category: impl Into<String>,
        amount: f64,
        occurred_at: DateTime<Utc>,
    ) -> Result<Self> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(Error::InvalidData("category must not be empty".into()));
        }
        if !amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "amount must be a finite number, got {}",
                amount
            )));
        }
        Ok(Self {
            category,
            amount,
            occurred_at,
        })
    }

    /// Calendar date of this record as seen from `calendar`
    pub fn date_in(&self, calendar: &Calendar) -> NaiveDate {
        calendar.date_of(self.occurred_at)
    }
}

/// Ordered set of category names
///
/// Insertion order is preserved for display. Records may reference names
/// missing from the set; the analytics functions tolerate that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name; returns false for duplicates and blank names
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.names.push(trimmed.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Remove a category that no record references
    pub fn remove(&mut self, name: &str, records: &[ExpenseRecord]) -> Result<()> {
        let position = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| Error::NotFound(format!("category '{}'", name)))?;

        let count = records.iter().filter(|r| r.category == name).count();
        if count > 0 {
            return Err(Error::CategoryInUse {
                name: name.to_string(),
                count,
            });
        }

        self.names.remove(position);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Inclusive calendar date range; a missing bound is unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Calendar used for every calendar-dependent derivation
/// (day/month/year labels, weekdays, distinct days, date range bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// The machine's time zone. The offset is resolved for each instant, so
    /// records on either side of a daylight saving change get their own
    /// local day.
    Local,
    /// A constant offset from UTC
    Fixed(FixedOffset),
}

impl Calendar {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    pub fn local() -> Self {
        Self::Local
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }

    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => instant.with_timezone(&Local).date_naive(),
            Self::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// First instant of `date` in this calendar
    ///
    /// When local midnight falls in a daylight saving gap, the first whole
    /// hour that exists is used instead.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        match self {
            Self::Local => first_instant(&Local, date),
            Self::Fixed(offset) => first_instant(offset, date),
        }
    }
}

fn first_instant<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    (0..24).find_map(|hour| {
        let naive = date.and_hms_opt(hour, 0, 0)?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|instant| instant.with_timezone(&Utc))
    })
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

/// Time granularity for period aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// "Jan 5" style labels
    Daily,
    /// Short month name only. Records from different years in the same
    /// month share one bucket.
    Monthly,
    /// Four digit year
    Yearly,
    /// Whole seven day periods before "now", labelled "Week N"
    WeekRelative,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::WeekRelative => "weekly",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            "weekly" | "week" | "week-relative" | "week_relative" => Ok(Self::WeekRelative),
            _ => Err(format!(
                "Unknown granularity: {} (valid: daily, monthly, yearly, weekly)",
                s
            )),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Total spending for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Category total with its share of the overall total (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    pub percentage: f64,
}

/// Total spending for one time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTotal {
    pub label: String,
    pub total: f64,
}

/// Week-relative total; `week_index` is whole weeks before "now" and is
/// negative for records dated after "now"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTotal {
    pub week_index: i64,
    pub total: f64,
}

impl WeeklyTotal {
    pub fn label(&self) -> String {
        week_label(self.week_index)
    }
}

pub(crate) fn week_label(week_index: i64) -> String {
    format!("Week {}", week_index + 1)
}

/// Highest-spending declared category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopCategory {
    Leader { category: String, total: f64 },
    NoSpending,
}

impl fmt::Display for TopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leader { category, total } => write!(f, "{} (${:.2})", category, total),
            Self::NoSpending => write!(f, "No spending yet"),
        }
    }
}

/// Weekday with the most records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActiveWeekday {
    Day { weekday: Weekday },
    NoData,
}

impl fmt::Display for ActiveWeekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day { weekday } => write!(f, "{}", weekday_name(*weekday)),
            Self::NoData => write!(f, "No data yet"),
        }
    }
}

/// Full English weekday name
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
