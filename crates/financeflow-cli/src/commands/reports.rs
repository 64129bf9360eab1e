//! Report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use financeflow_core::{
    aggregate_by_category, aggregate_by_period, category_shares, total_spending, BudgetStatus,
    Calendar, ExpenseBook, ExpenseFilter, Granularity, InsightSummary, SpendingSnapshot,
};

use super::{open_book, save_book, truncate};

fn print_period(filter: &ExpenseFilter<'_>) {
    let from = filter
        .range
        .start
        .map(|d| d.to_string())
        .unwrap_or_else(|| "start".into());
    let to = filter
        .range
        .end
        .map(|d| d.to_string())
        .unwrap_or_else(|| "today".into());
    println!("   Period: {} to {}", from, to);
    if let Some(category) = filter.category {
        println!("   Category: {}", category);
    }
}

fn print_budget(status: &BudgetStatus) {
    if !status.has_budget() {
        println!("   No budget set. Use 'financeflow budget set AMOUNT'.");
        return;
    }

    println!("   Budget:    ${:.2}", status.budget);
    println!("   Spent:     ${:.2} ({:.1}%)", status.spent, status.percent_used);
    if status.over_budget {
        println!("   ⚠️  Over budget by ${:.2}", -status.remaining);
    } else {
        println!("   Remaining: ${:.2}", status.remaining);
    }
}

pub fn cmd_summary(book: &ExpenseBook, filter: &ExpenseFilter<'_>) -> Result<()> {
    let filtered = filter.apply(&book.expenses);
    let shares = category_shares(&aggregate_by_category(&filtered));

    println!();
    println!("📊 Spending Summary");
    print_period(filter);
    println!("   ─────────────────────────────────────────────");

    if shares.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!("   Total: ${:.2}", total_spending(&filtered));
    println!();
    println!("   {:25} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────────────────┼────────────┼────────");
    for share in &shares {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}%",
            truncate(&share.category, 25),
            share.total,
            share.percentage
        );
    }

    if book.budget > 0.0 {
        println!();
        print_budget(&BudgetStatus::compute(book.budget, &book.expenses));
    }
    Ok(())
}

pub fn cmd_trends(
    book: &ExpenseBook,
    filter: &ExpenseFilter<'_>,
    granularity: Granularity,
) -> Result<()> {
    let filtered = filter.apply(&book.expenses);
    let series = aggregate_by_period(&filtered, granularity, &filter.calendar, Utc::now());

    println!();
    println!("📈 Spending Trends ({})", granularity);
    print_period(filter);
    println!("   ─────────────────────────────────────────────");

    if series.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    let max = series
        .iter()
        .map(|b| b.total)
        .fold(0.0_f64, f64::max);

    for bucket in &series {
        let bar_len = if max > 0.0 {
            ((bucket.total.max(0.0) / max) * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "   {:10} │ {:>10.2} │ {}",
            bucket.label,
            bucket.total,
            "█".repeat(bar_len)
        );
    }
    Ok(())
}

pub fn cmd_insights(book: &ExpenseBook, calendar: Calendar) -> Result<()> {
    let insights = InsightSummary::compute(&book.expenses, &book.categories, &calendar);

    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────");
    println!("   Top category:        {}", insights.top_category);
    println!("   Average daily spend: ${:.2}", insights.average_daily_spend);
    println!("   Most active day:     {}", insights.most_active_weekday);
    Ok(())
}

/// Budget against total spending; filters do not apply
pub fn cmd_budget(book: &ExpenseBook) -> Result<()> {
    println!();
    println!("💰 Budget");
    println!("   ─────────────────────────────────────────────");
    print_budget(&BudgetStatus::compute(book.budget, &book.expenses));
    Ok(())
}

pub fn cmd_budget_set(book_path: &Path, amount: f64) -> Result<()> {
    let mut book = open_book(book_path)?;

    book.set_budget(amount)?;
    save_book(&book, book_path)?;

    if amount > 0.0 {
        println!("✓ Budget set to ${:.2}", amount);
    } else {
        println!("✓ Budget cleared");
    }
    Ok(())
}

pub fn cmd_dashboard(
    book: &ExpenseBook,
    filter: &ExpenseFilter<'_>,
    granularity: Granularity,
    json: bool,
) -> Result<()> {
    let snapshot = SpendingSnapshot::build(
        &book.expenses,
        &book.categories,
        book.budget,
        filter,
        granularity,
        Utc::now(),
    );

    if json {
        let text =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize dashboard")?;
        println!("{}", text);
        return Ok(());
    }

    println!();
    println!("📊 FinanceFlow Dashboard");
    print_period(filter);
    println!(
        "   Expenses: {} shown of {}",
        snapshot.filtered_count, snapshot.record_count
    );
    println!("   ─────────────────────────────────────────────");

    if snapshot.is_empty() {
        println!("   No spending found in this period.");
    } else {
        println!("   By category:");
        for share in &snapshot.breakdown {
            println!(
                "     {:20} ${:>10.2} {:>5.1}%",
                truncate(&share.category, 20),
                share.total,
                share.percentage
            );
        }
        println!();
        println!("   Over time ({}):", snapshot.granularity);
        for bucket in &snapshot.series {
            println!("     {:20} ${:>10.2}", bucket.label, bucket.total);
        }
    }

    println!();
    print_budget(&snapshot.budget);

    println!();
    println!("   💡 Top category:        {}", snapshot.insights.top_category);
    println!(
        "   💡 Average daily spend: ${:.2}",
        snapshot.insights.average_daily_spend
    );
    println!(
        "   💡 Most active day:     {}",
        snapshot.insights.most_active_weekday
    );
    Ok(())
}
