//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init plus shared utilities (open_book, build_filter, date parsing)
//! - `expenses` - Expense commands (add, edit, delete, list)
//! - `categories` - Category management commands
//! - `reports` - Summary, trends, insights, budget and dashboard
//! - `forecast` - Next-week spending prediction
//! - `export` - CSV/JSON export

pub mod categories;
pub mod core;
pub mod expenses;
pub mod export;
pub mod forecast;
pub mod reports;

// Re-export command functions for main.rs
pub use categories::*;
pub use self::core::*;
pub use expenses::*;
pub use export::*;
pub use forecast::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
