//! Forecast command

use anyhow::Result;
use chrono::Utc;
use financeflow_core::forecast::forecast_points;
use financeflow_core::{
    ExpenseBook, ForecastAdapter, ForecastBackend, ForecastClient, ForecastConfig, ForecastOutcome,
};

/// Predict next week's spending from the whole book
///
/// Forecasts always use every expense; filters do not apply. Returns None
/// when no forecast service is configured.
pub async fn cmd_forecast(
    book: &ExpenseBook,
    config: &ForecastConfig,
) -> Result<Option<ForecastOutcome>> {
    println!();
    println!("🔮 Spending Forecast");

    let Some(client) = ForecastClient::from_config(config) else {
        println!("   Forecasting is not configured.");
        println!("   💡 Tip: Set FORECAST_URL or [forecast].endpoint in the config file");
        return Ok(None);
    };

    let now = Utc::now();
    let weeks = forecast_points(&book.expenses, now).len();
    println!("   Service: {}", client.endpoint());
    println!("   Weekly totals: {}", weeks);

    let adapter = ForecastAdapter::new(client).with_timeout(config.timeout());
    let outcome = adapter.forecast(&book.expenses, now).await;

    println!("   Next week: {}", outcome);
    Ok(Some(outcome))
}
