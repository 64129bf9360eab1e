//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// FinanceFlow - Track expenses and see where the money goes
#[derive(Parser)]
#[command(name = "financeflow")]
#[command(about = "Personal expense tracker with spending analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Expense book path
    #[arg(long, default_value = "financeflow.json", global = true)]
    pub data: PathBuf,

    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use UTC instead of the local time zone for day boundaries
    #[arg(long, global = true)]
    pub utc: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Date range and category filters shared by the report commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only include this category
    #[arg(short, long)]
    pub category: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new expense book with the default categories
    Init {
        /// Overwrite an existing book
        #[arg(long)]
        force: bool,
    },

    /// Record an expense
    Add {
        /// Category (must already exist)
        #[arg(short, long)]
        category: String,

        /// Amount spent
        #[arg(short, long, allow_negative_numbers = true)]
        amount: f64,

        /// Date of the expense (YYYY-MM-DD, defaults to now)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Replace fields of a recorded expense
    Edit {
        /// Expense number as shown by `list`
        index: usize,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, allow_negative_numbers = true)]
        amount: Option<f64>,

        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a recorded expense
    Delete {
        /// Expense number as shown by `list`
        index: usize,
    },

    /// List expenses
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Show or set the budget
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Spending by category with percentages
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending over time
    Trends {
        /// Bucket size: daily, monthly, yearly, weekly
        #[arg(short, long, default_value = "monthly")]
        granularity: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Top category, daily average and busiest weekday over all expenses
    Insights,

    /// Predict next week's spending from weekly totals
    Forecast,

    /// Export expenses
    Export {
        /// Output file (prints to stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show everything at once
    Dashboard {
        /// Bucket size for the spending series
        #[arg(short, long, default_value = "daily")]
        granularity: String,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
    /// Remove a category no expense uses
    Remove {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set the budget amount (0 clears it)
    Set {
        /// Budget amount
        amount: f64,
    },
}
