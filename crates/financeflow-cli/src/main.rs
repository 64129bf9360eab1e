//! FinanceFlow CLI - Personal expense tracker
//!
//! Usage:
//!   financeflow init                               Create an expense book
//!   financeflow add --category Food --amount 12    Record an expense
//!   financeflow summary --from 2024-01-01          Category breakdown
//!   financeflow export --out expenses.csv          Export to CSV

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let calendar = commands::calendar(cli.utc);

    match cli.command {
        Commands::Init { force } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_init(&cli.data, &config, force)
        }
        Commands::Add {
            category,
            amount,
            date,
        } => commands::cmd_add(&cli.data, &category, amount, date.as_deref(), calendar),
        Commands::Edit {
            index,
            category,
            amount,
            date,
        } => commands::cmd_edit(
            &cli.data,
            index,
            category.as_deref(),
            amount,
            date.as_deref(),
            calendar,
        ),
        Commands::Delete { index } => commands::cmd_delete(&cli.data, index),
        Commands::List { filter } => {
            let book = commands::open_book(&cli.data)?;
            let filter = commands::build_filter(&filter, calendar)?;
            commands::cmd_list(&book, &filter)
        }
        Commands::Categories { action } => match action {
            None => {
                let book = commands::open_book(&cli.data)?;
                commands::cmd_categories_list(&book)
            }
            Some(CategoriesAction::Add { name }) => commands::cmd_categories_add(&cli.data, &name),
            Some(CategoriesAction::Remove { name }) => {
                commands::cmd_categories_remove(&cli.data, &name)
            }
        },
        Commands::Budget { action } => match action {
            Some(BudgetAction::Set { amount }) => commands::cmd_budget_set(&cli.data, amount),
            None => {
                let book = commands::open_book(&cli.data)?;
                commands::cmd_budget(&book)
            }
        },
        Commands::Summary { filter } => {
            let book = commands::open_book(&cli.data)?;
            let filter = commands::build_filter(&filter, calendar)?;
            commands::cmd_summary(&book, &filter)
        }
        Commands::Trends {
            granularity,
            filter,
        } => {
            let book = commands::open_book(&cli.data)?;
            let filter = commands::build_filter(&filter, calendar)?;
            let granularity = commands::parse_granularity(&granularity)?;
            commands::cmd_trends(&book, &filter, granularity)
        }
        Commands::Insights => {
            let book = commands::open_book(&cli.data)?;
            commands::cmd_insights(&book, calendar)
        }
        Commands::Forecast => {
            let book = commands::open_book(&cli.data)?;
            let config = commands::load_config(cli.config.as_deref())?;
            commands::cmd_forecast(&book, &config.forecast)
                .await
                .map(|_| ())
        }
        Commands::Export {
            out,
            format,
            filter,
        } => {
            let book = commands::open_book(&cli.data)?;
            let filter = commands::build_filter(&filter, calendar)?;
            let format = format
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            commands::cmd_export(&book, &filter, format, out.as_deref())
        }
        Commands::Dashboard {
            granularity,
            json,
            filter,
        } => {
            let book = commands::open_book(&cli.data)?;
            let filter = commands::build_filter(&filter, calendar)?;
            let granularity = commands::parse_granularity(&granularity)?;
            commands::cmd_dashboard(&book, &filter, granularity, json)
        }
    }
}
