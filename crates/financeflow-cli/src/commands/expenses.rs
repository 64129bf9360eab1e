//! Expense commands (add, edit, delete, list)
//!
//! Expense numbers shown to the user start at 1; the book stores positions
//! from 0.

use std::path::Path;

use anyhow::{Context, Result};
use financeflow_core::{Calendar, ExpenseBook, ExpenseFilter, ExpenseRecord};

use super::{open_book, resolve_instant, save_book, truncate};

fn position(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .context("Expense numbers start at 1 (see 'financeflow list')")
}

pub fn cmd_add(
    book_path: &Path,
    category: &str,
    amount: f64,
    date: Option<&str>,
    calendar: Calendar,
) -> Result<()> {
    let mut book = open_book(book_path)?;

    let occurred_at = resolve_instant(date, calendar)?;
    let record = ExpenseRecord::new(category, amount, occurred_at)?;
    let index = book.add_expense(record)?;
    save_book(&book, book_path)?;

    println!(
        "✓ Recorded #{}: {} ${:.2} on {}",
        index + 1,
        category,
        amount,
        calendar.date_of(occurred_at)
    );
    Ok(())
}

pub fn cmd_edit(
    book_path: &Path,
    number: usize,
    category: Option<&str>,
    amount: Option<f64>,
    date: Option<&str>,
    calendar: Calendar,
) -> Result<()> {
    let index = position(number)?;
    let mut book = open_book(book_path)?;

    let current = book
        .expenses
        .get(index)
        .with_context(|| format!("Expense #{} not found", number))?;

    let occurred_at = match date {
        Some(_) => resolve_instant(date, calendar)?,
        None => current.occurred_at,
    };
    let record = ExpenseRecord::new(
        category.unwrap_or(&current.category),
        amount.unwrap_or(current.amount),
        occurred_at,
    )?;

    let old = book.replace_expense(index, record)?;
    save_book(&book, book_path)?;

    let new = &book.expenses[index];
    println!(
        "✓ Updated #{}: {} ${:.2} -> {} ${:.2}",
        number, old.category, old.amount, new.category, new.amount
    );
    Ok(())
}

pub fn cmd_delete(book_path: &Path, number: usize) -> Result<()> {
    let index = position(number)?;
    let mut book = open_book(book_path)?;

    let removed = book
        .remove_expense(index)
        .with_context(|| format!("Expense #{} not found", number))?;
    save_book(&book, book_path)?;

    println!(
        "✓ Deleted #{}: {} ${:.2}",
        number, removed.category, removed.amount
    );
    Ok(())
}

pub fn cmd_list(book: &ExpenseBook, filter: &ExpenseFilter<'_>) -> Result<()> {
    println!();
    println!("📋 Expenses");

    // Keep book positions so the numbers work with edit/delete
    let rows: Vec<(usize, &ExpenseRecord)> = book
        .expenses
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .collect();

    if rows.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }

    println!(
        "   {:>5} │ {:10} │ {:20} │ {:>10}",
        "#", "Date", "Category", "Amount"
    );
    println!("   ──────┼────────────┼──────────────────────┼───────────");

    let mut total = 0.0;
    for (index, record) in &rows {
        println!(
            "   {:>5} │ {:10} │ {:20} │ {:>10.2}",
            index + 1,
            record.date_in(&filter.calendar),
            truncate(&record.category, 20),
            record.amount
        );
        total += record.amount;
    }

    println!("   ──────┴────────────┴──────────────────────┴───────────");
    println!("   {} expenses, ${:.2} total", rows.len(), total);
    Ok(())
}
