//! Expense book: the caller-held record store
//!
//! Holds the ordered expenses, the declared categories and the budget. The
//! analytics functions never see this type; callers pass its slices in.
//! Edits replace a record at a position and deletes remove it, so any
//! previously computed aggregates stay valid snapshots.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::BookDefaults;
use crate::error::{Error, Result};
use crate::models::{CategorySet, ExpenseRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBook {
    #[serde(default)]
    pub categories: CategorySet,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub budget: f64,
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: &BookDefaults) -> Self {
        Self {
            categories: defaults.categories.clone(),
            expenses: Vec::new(),
            budget: defaults.budget,
        }
    }

    /// Append a record whose category is declared
    pub fn add_expense(&mut self, record: ExpenseRecord) -> Result<usize> {
        self.check_category(&record.category)?;
        self.expenses.push(record);
        Ok(self.expenses.len() - 1)
    }

    /// Replace the record at `index`, returning the old one
    pub fn replace_expense(
        &mut self,
        index: usize,
        record: ExpenseRecord,
    ) -> Result<ExpenseRecord> {
        self.check_category(&record.category)?;
        let slot = self
            .expenses
            .get_mut(index)
            .ok_or_else(|| Error::NotFound(format!("expense #{}", index)))?;
        Ok(std::mem::replace(slot, record))
    }

    /// Remove the record at `index`
    pub fn remove_expense(&mut self, index: usize) -> Result<ExpenseRecord> {
        if index >= self.expenses.len() {
            return Err(Error::NotFound(format!("expense #{}", index)));
        }
        Ok(self.expenses.remove(index))
    }

    /// Declare a category; returns false if it already exists
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        if name.trim().is_empty() {
            return Err(Error::InvalidData("category name must not be empty".into()));
        }
        Ok(self.categories.insert(name))
    }

    /// Remove a category no expense references
    pub fn remove_category(&mut self, name: &str) -> Result<()> {
        self.categories.remove(name, &self.expenses)
    }

    pub fn set_budget(&mut self, budget: f64) -> Result<()> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(Error::InvalidData(format!(
                "budget must be a non-negative number, got {}",
                budget
            )));
        }
        self.budget = budget;
        Ok(())
    }

    fn check_category(&self, category: &str) -> Result<()> {
        if self.categories.contains(category) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("category '{}'", category)))
        }
    }

    /// Read a book from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let book: ExpenseBook = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            expenses = book.expenses.len(),
            categories = book.categories.len(),
            "Loaded expense book"
        );
        Ok(book)
    }

    /// Write the book as JSON, replacing `path` atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!(
            path = %path.display(),
            expenses = self.expenses.len(),
            "Saved expense book"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(category: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(
            category,
            amount,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn book() -> ExpenseBook {
        let mut book = ExpenseBook::new();
        book.add_category("Food").unwrap();
        book.add_category("Rent").unwrap();
        book
    }

    #[test]
    fn test_add_requires_declared_category() {
        let mut book = book();
        assert_eq!(book.add_expense(record("Food", 10.0)).unwrap(), 0);
        assert!(matches!(
            book.add_expense(record("Travel", 10.0)),
            Err(Error::NotFound(_))
        ));
        assert_eq!(book.expenses.len(), 1);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut book = book();
        book.add_expense(record("Food", 10.0)).unwrap();
        book.add_expense(record("Rent", 500.0)).unwrap();

        let old = book.replace_expense(0, record("Food", 12.0)).unwrap();
        assert_eq!(old.amount, 10.0);
        assert_eq!(book.expenses[0].amount, 12.0);

        let removed = book.remove_expense(1).unwrap();
        assert_eq!(removed.category, "Rent");
        assert_eq!(book.expenses.len(), 1);

        assert!(book.remove_expense(5).is_err());
        assert!(book.replace_expense(5, record("Food", 1.0)).is_err());
    }

    #[test]
    fn test_remove_category_in_use() {
        let mut book = book();
        book.add_expense(record("Food", 10.0)).unwrap();

        assert!(matches!(
            book.remove_category("Food"),
            Err(Error::CategoryInUse { .. })
        ));
        book.remove_category("Rent").unwrap();
        assert!(!book.categories.contains("Rent"));
    }

    #[test]
    fn test_set_budget_validation() {
        let mut book = book();
        book.set_budget(250.0).unwrap();
        assert_eq!(book.budget, 250.0);
        assert!(book.set_budget(-1.0).is_err());
        assert!(book.set_budget(f64::INFINITY).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");

        let mut saved = book();
        saved.add_expense(record("Food", 10.5)).unwrap();
        saved.set_budget(100.0).unwrap();
        saved.save(&path).unwrap();

        let loaded = ExpenseBook::load(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ExpenseBook::load(&dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_with_defaults() {
        let defaults = BookDefaults {
            categories: ["Food", "Bills"].into_iter().collect(),
            budget: 300.0,
        };
        let book = ExpenseBook::with_defaults(&defaults);
        assert_eq!(book.categories.len(), 2);
        assert_eq!(book.budget, 300.0);
        assert!(book.expenses.is_empty());
    }
}
