//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_book` / `save_book` - Shared utilities to read and write the expense book
//! - `build_filter` - Turn `--from/--to/--category` into a record filter
//! - `cmd_init` - Create a new expense book

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use financeflow_core::{AppConfig, Calendar, ExpenseBook, ExpenseFilter, Granularity};

use crate::cli::FilterArgs;

/// Open the expense book at `path`
pub fn open_book(path: &Path) -> Result<ExpenseBook> {
    if !path.exists() {
        anyhow::bail!(
            "No expense book at {}. Run 'financeflow init' first.",
            path.display()
        );
    }
    ExpenseBook::load(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn save_book(book: &ExpenseBook, path: &Path) -> Result<()> {
    book.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Load config from an explicit path, the data dir override, or the built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => AppConfig::load().context("Failed to load config"),
    }
}

/// Local time zone unless `--utc` was given
pub fn calendar(utc: bool) -> Calendar {
    if utc {
        Calendar::utc()
    } else {
        Calendar::local()
    }
}

pub fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date '{}' (use YYYY-MM-DD)", flag, value))
}

/// Start of `date` in the calendar, or now when no date was given
pub fn resolve_instant(date: Option<&str>, calendar: Calendar) -> Result<DateTime<Utc>> {
    let Some(date) = date else {
        return Ok(Utc::now());
    };

    let day = parse_date(date, "--date")?;
    calendar
        .start_of_day(day)
        .with_context(|| format!("Date '{}' is out of range", date))
}

pub fn build_filter(args: &FilterArgs, calendar: Calendar) -> Result<ExpenseFilter<'_>> {
    let from = args
        .from
        .as_deref()
        .map(|d| parse_date(d, "--from"))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|d| parse_date(d, "--to"))
        .transpose()?;

    Ok(ExpenseFilter::new()
        .from(from)
        .to(to)
        .category(args.category.as_deref())
        .calendar(calendar))
}

pub fn parse_granularity(value: &str) -> Result<Granularity> {
    value.parse().map_err(|e: String| anyhow::anyhow!(e))
}

pub fn cmd_init(book_path: &Path, config: &AppConfig, force: bool) -> Result<()> {
    if book_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to start over.",
            book_path.display()
        );
    }

    println!("🔧 Creating expense book at {}...", book_path.display());

    let book = ExpenseBook::with_defaults(&config.defaults);
    save_book(&book, book_path)?;

    let names: Vec<&str> = book.categories.iter().collect();
    println!("   Categories: {}", names.join(", "));
    if book.budget > 0.0 {
        println!("   Budget: ${:.2}", book.budget);
    }

    println!("✅ Expense book created!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: financeflow add --category Food --amount 12.50");
    println!("  2. See the breakdown: financeflow summary");

    Ok(())
}
