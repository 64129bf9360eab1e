//! Category management commands

use std::path::Path;

use anyhow::Result;
use financeflow_core::{aggregate_by_category, ExpenseBook};

use super::{open_book, save_book};

pub fn cmd_categories_list(book: &ExpenseBook) -> Result<()> {
    println!();
    println!("🏷️  Categories");

    if book.categories.is_empty() {
        println!("   No categories. Add one with 'financeflow categories add NAME'.");
        return Ok(());
    }

    let totals = aggregate_by_category(&book.expenses);
    for name in book.categories.iter() {
        let spent = totals
            .iter()
            .find(|t| t.category == name)
            .map(|t| t.total)
            .unwrap_or(0.0);
        println!("   {:20} ${:>10.2}", name, spent);
    }
    Ok(())
}

pub fn cmd_categories_add(book_path: &Path, name: &str) -> Result<()> {
    let mut book = open_book(book_path)?;

    if !book.add_category(name)? {
        println!("Category '{}' already exists", name);
        return Ok(());
    }
    save_book(&book, book_path)?;

    println!("✓ Added category '{}'", name);
    Ok(())
}

pub fn cmd_categories_remove(book_path: &Path, name: &str) -> Result<()> {
    let mut book = open_book(book_path)?;

    book.remove_category(name)?;
    save_book(&book, book_path)?;

    println!("✓ Removed category '{}'", name);
    Ok(())
}
