//! Pluggable forecast backend and the adapter that feeds it
//!
//! The prediction service is an external collaborator: given two or more
//! weekly spending totals it returns a single predicted number, or fails.
//! The adapter never surfaces its failures; they collapse into
//! [`ForecastOutcome::Failed`].
//!
//! # Architecture
//!
//! - `ForecastBackend` trait: the interface every backend implements
//! - `ForecastClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HttpForecastBackend`, `MockForecastBackend`
//! - `ForecastAdapter`: weekly bucketing, the minimum-data gate, timeout and
//!   failure mapping
//!
//! # Configuration
//!
//! Environment variables (override the config file):
//! - `FORECAST_BACKEND`: Backend to use (http, mock). Default: http
//! - `FORECAST_URL`: Prediction endpoint (required for the http backend)
//! - `FORECAST_TIMEOUT_SECS`: Request timeout in seconds (default: 5)

mod http;
mod mock;

pub use http::HttpForecastBackend;
pub use mock::MockForecastBackend;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::weekly_totals;
use crate::config::ForecastConfig;
use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

/// Minimum number of weekly totals worth sending to the service
pub const MIN_FORECAST_WEEKS: usize = 2;

/// Default bound on a single forecast call
pub const DEFAULT_FORECAST_TIMEOUT: Duration = Duration::from_secs(5);

/// One element of the forecast request body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub amount: f64,
}

/// Forecast response body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub prediction: f64,
}

/// Trait defining the interface for forecast backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait ForecastBackend: Send + Sync {
    /// Predict the next value from weekly totals, given in bucket order
    async fn predict(&self, points: &[ForecastPoint]) -> Result<f64>;

    /// Get the endpoint (for logging)
    fn endpoint(&self) -> &str;
}

/// Concrete forecast client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ForecastClient {
    /// HTTP JSON prediction service
    Http(HttpForecastBackend),
    /// Mock backend for testing
    Mock(MockForecastBackend),
}

impl ForecastClient {
    /// Create a forecast client from config
    ///
    /// Checks `FORECAST_BACKEND` to determine which backend to use:
    /// - `http` (default): posts to the configured endpoint
    /// - `mock`: a mock backend that always predicts 0
    ///
    /// Returns None if no endpoint is configured.
    pub fn from_config(config: &ForecastConfig) -> Option<Self> {
        let backend = std::env::var("FORECAST_BACKEND").unwrap_or_else(|_| "http".to_string());
        let timeout = config.timeout();

        match backend.to_lowercase().as_str() {
            "http" => Self::http_from_config(config, timeout),
            "mock" => Some(ForecastClient::Mock(MockForecastBackend::new(0.0))),
            _ => {
                tracing::warn!(
                    backend = %backend,
                    "Unknown FORECAST_BACKEND, falling back to http"
                );
                Self::http_from_config(config, timeout)
            }
        }
    }

    fn http_from_config(config: &ForecastConfig, timeout: Duration) -> Option<Self> {
        let endpoint = config.endpoint.as_deref()?;
        Some(ForecastClient::Http(HttpForecastBackend::new(endpoint, timeout)))
    }

    /// Create an HTTP backend directly
    pub fn http(endpoint: &str, timeout: Duration) -> Self {
        ForecastClient::Http(HttpForecastBackend::new(endpoint, timeout))
    }

    /// Create a mock backend for testing
    pub fn mock(prediction: f64) -> Self {
        ForecastClient::Mock(MockForecastBackend::new(prediction))
    }

    /// Get a reference to the inner backend as a trait object
    pub fn as_backend(&self) -> &dyn ForecastBackend {
        match self {
            ForecastClient::Http(b) => b,
            ForecastClient::Mock(b) => b,
        }
    }
}

#[async_trait]
impl ForecastBackend for ForecastClient {
    async fn predict(&self, points: &[ForecastPoint]) -> Result<f64> {
        self.as_backend().predict(points).await
    }

    fn endpoint(&self) -> &str {
        self.as_backend().endpoint()
    }
}

/// Display value of a forecast attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Predicted { value: f64 },
    /// Fewer than two weekly totals; no call was made
    InsufficientData,
    /// The call failed, timed out or returned something unusable
    Failed,
}

impl ForecastOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Predicted { value } => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for ForecastOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicted { value } => write!(f, "${:.2}", value),
            Self::InsufficientData => write!(f, "Insufficient data"),
            Self::Failed => write!(f, "Prediction failed"),
        }
    }
}

/// Request body for a set of records: week-relative totals in bucket order
pub fn forecast_points(records: &[ExpenseRecord], now: DateTime<Utc>) -> Vec<ForecastPoint> {
    weekly_totals(records, now)
        .into_iter()
        .map(|w| ForecastPoint { amount: w.total })
        .collect()
}

/// Turns the full record collection into a forecast display value
pub struct ForecastAdapter<B> {
    backend: B,
    timeout: Duration,
}

impl<B: ForecastBackend> ForecastAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: DEFAULT_FORECAST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Forecast the next week's spending
    ///
    /// Makes at most one call. Never returns an error: too little data gives
    /// `InsufficientData` without touching the backend, and any backend
    /// failure or timeout gives `Failed`.
    pub async fn forecast(
        &self,
        records: &[ExpenseRecord],
        now: DateTime<Utc>,
    ) -> ForecastOutcome {
        let points = forecast_points(records, now);
        if points.len() < MIN_FORECAST_WEEKS {
            tracing::debug!(weeks = points.len(), "Not enough weekly data to forecast");
            return ForecastOutcome::InsufficientData;
        }

        let call = self.backend.predict(&points);
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.timeout)),
        };

        match result {
            Ok(value) if value.is_finite() => {
                tracing::debug!(weeks = points.len(), prediction = value, "Forecast complete");
                ForecastOutcome::Predicted { value }
            }
            Ok(value) => {
                tracing::warn!(
                    endpoint = self.backend.endpoint(),
                    prediction = value,
                    "Forecast returned a non-finite prediction"
                );
                ForecastOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = self.backend.endpoint(),
                    error = %e,
                    "Forecast failed"
                );
                ForecastOutcome::Failed
            }
        }
    }
}

/// Identity of one issued forecast request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ForecastTicket(u64);

/// Last-write-wins holder for concurrently issued forecasts
///
/// Each request takes a ticket before it starts; a completion is kept only
/// if no later-issued request has already completed.
#[derive(Debug, Default)]
pub struct LatestForecast {
    next: AtomicU64,
    settled: Mutex<Option<(ForecastTicket, ForecastOutcome)>>,
}

impl LatestForecast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> ForecastTicket {
        ForecastTicket(self.next.fetch_add(1, Ordering::SeqCst))
    }

    /// Record a completion; returns false if it was superseded
    pub fn settle(&self, ticket: ForecastTicket, outcome: ForecastOutcome) -> bool {
        let mut settled = match self.settled.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match *settled {
            Some((current, _)) if current > ticket => {
                tracing::debug!(?ticket, ?current, "Discarding superseded forecast");
                false
            }
            _ => {
                *settled = Some((ticket, outcome));
                true
            }
        }
    }

    /// Outcome of the latest-issued request that has completed
    pub fn current(&self) -> Option<ForecastOutcome> {
        let settled = match self.settled.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        settled.map(|(_, outcome)| outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn record(amount: f64, occurred_at: DateTime<Utc>) -> ExpenseRecord {
        ExpenseRecord {
            category: "Food".into(),
            amount,
            occurred_at,
        }
    }

    fn two_weeks() -> Vec<ExpenseRecord> {
        vec![
            record(10.0, at(2024, 1, 28)),
            record(15.0, at(2024, 1, 27)),
            record(40.0, at(2024, 1, 20)),
        ]
    }

    #[test]
    fn test_forecast_points_shape() {
        let points = forecast_points(&two_weeks(), at(2024, 1, 29));
        assert_eq!(
            points,
            vec![ForecastPoint { amount: 25.0 }, ForecastPoint { amount: 40.0 }]
        );

        let body = serde_json::to_string(&points).unwrap();
        assert_eq!(body, r#"[{"amount":25.0},{"amount":40.0}]"#);
    }

    #[tokio::test]
    async fn test_single_week_skips_backend() {
        let mock = MockForecastBackend::new(99.0);
        let adapter = ForecastAdapter::new(mock.clone());
        let records = vec![record(10.0, at(2024, 1, 28)), record(5.0, at(2024, 1, 27))];

        let outcome = adapter.forecast(&records, at(2024, 1, 29)).await;

        assert_eq!(outcome, ForecastOutcome::InsufficientData);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_records_skip_backend() {
        let mock = MockForecastBackend::new(99.0);
        let adapter = ForecastAdapter::new(mock.clone());

        assert_eq!(
            adapter.forecast(&[], at(2024, 1, 29)).await,
            ForecastOutcome::InsufficientData
        );
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_prediction_success() {
        let mock = MockForecastBackend::new(42.5);
        let adapter = ForecastAdapter::new(mock.clone());

        let outcome = adapter.forecast(&two_weeks(), at(2024, 1, 29)).await;

        assert_eq!(outcome, ForecastOutcome::Predicted { value: 42.5 });
        assert_eq!(mock.calls(), 1);
        assert_eq!(
            mock.last_request(),
            Some(vec![ForecastPoint { amount: 25.0 }, ForecastPoint { amount: 40.0 }])
        );
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_failed() {
        let mock = MockForecastBackend::failing();
        let adapter = ForecastAdapter::new(mock.clone());

        let outcome = adapter.forecast(&two_weeks(), at(2024, 1, 29)).await;

        assert_eq!(outcome, ForecastOutcome::Failed);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_finite_prediction_maps_to_failed() {
        let adapter = ForecastAdapter::new(MockForecastBackend::new(f64::NAN));
        assert_eq!(
            adapter.forecast(&two_weeks(), at(2024, 1, 29)).await,
            ForecastOutcome::Failed
        );
    }

    #[tokio::test]
    async fn test_timeout_maps_to_failed() {
        let mock = MockForecastBackend::new(1.0).with_delay(Duration::from_millis(500));
        let adapter = ForecastAdapter::new(mock).with_timeout(Duration::from_millis(20));

        assert_eq!(
            adapter.forecast(&two_weeks(), at(2024, 1, 29)).await,
            ForecastOutcome::Failed
        );
    }

    #[tokio::test]
    async fn test_client_enum_dispatch() {
        let adapter = ForecastAdapter::new(ForecastClient::mock(7.0));
        assert_eq!(adapter.backend().endpoint(), "mock://forecast");
        assert_eq!(
            adapter.forecast(&two_weeks(), at(2024, 1, 29)).await,
            ForecastOutcome::Predicted { value: 7.0 }
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ForecastOutcome::InsufficientData.to_string(), "Insufficient data");
        assert_eq!(ForecastOutcome::Failed.to_string(), "Prediction failed");
        assert_eq!(
            ForecastOutcome::Predicted { value: 12.345 }.to_string(),
            "$12.35"
        );
        assert_eq!(ForecastOutcome::Failed.value(), None);
    }

    #[test]
    fn test_latest_forecast_last_issued_wins() {
        let latest = LatestForecast::new();
        let first = latest.issue();
        let second = latest.issue();

        // The newer request finishes first
        assert!(latest.settle(second, ForecastOutcome::Predicted { value: 2.0 }));
        // The older one arrives late and is discarded
        assert!(!latest.settle(first, ForecastOutcome::Predicted { value: 1.0 }));

        assert_eq!(
            latest.current(),
            Some(ForecastOutcome::Predicted { value: 2.0 })
        );
    }

    #[test]
    fn test_latest_forecast_in_order_completion() {
        let latest = LatestForecast::new();
        assert_eq!(latest.current(), None);

        let first = latest.issue();
        let second = latest.issue();
        assert!(latest.settle(first, ForecastOutcome::Failed));
        assert!(latest.settle(second, ForecastOutcome::InsufficientData));
        assert_eq!(latest.current(), Some(ForecastOutcome::InsufficientData));
    }
}
