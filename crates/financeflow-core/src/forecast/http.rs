//! HTTP forecast backend
//!
//! Posts weekly totals as a JSON array of `{"amount": n}` objects and reads
//! back `{"prediction": n}`. One attempt per call, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};

use super::{ForecastBackend, ForecastPoint, ForecastResponse};

#[derive(Clone)]
pub struct HttpForecastBackend {
    http_client: Client,
    endpoint: String,
}

impl HttpForecastBackend {
    /// Create a new HTTP backend
    ///
    /// `timeout` bounds the whole request at the transport level; the
    /// adapter applies its own bound on top.
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to build HTTP client, using defaults");
                Client::new()
            });

        Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ForecastBackend for HttpForecastBackend {
    async fn predict(&self, points: &[ForecastPoint]) -> Result<f64> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(points)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Forecast(format!(
                "forecast service returned {}",
                status
            )));
        }

        let body = response.text().await?;
        debug!("Forecast response: {}", body);

        let parsed: ForecastResponse = serde_json::from_str(&body)?;
        Ok(parsed.prediction)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{ForecastAdapter, ForecastOutcome};
    use crate::models::ExpenseRecord;
    use crate::test_utils::MockForecastServer;
    use chrono::{TimeZone, Utc};

    fn points() -> Vec<ForecastPoint> {
        vec![ForecastPoint { amount: 30.0 }, ForecastPoint { amount: 50.0 }]
    }

    #[tokio::test]
    async fn test_predict_against_mock_server() {
        let server = MockForecastServer::start().await;
        let backend = HttpForecastBackend::new(&server.endpoint("predict"), Duration::from_secs(5));

        let prediction = backend.predict(&points()).await.unwrap();
        assert_eq!(prediction, 40.0);
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockForecastServer::start().await;
        let backend = HttpForecastBackend::new(&server.endpoint("error"), Duration::from_secs(5));

        let err = backend.predict(&points()).await.unwrap_err();
        assert!(matches!(err, Error::Forecast(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockForecastServer::start().await;
        let backend = HttpForecastBackend::new(&server.endpoint("garbage"), Duration::from_secs(5));

        let err = backend.predict(&points()).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_adapter_over_http() {
        let server = MockForecastServer::start().await;
        let now = Utc.with_ymd_and_hms(2024, 1, 29, 12, 0, 0).unwrap();
        let records = vec![
            ExpenseRecord::new("Food", 30.0, now - chrono::Duration::days(1)).unwrap(),
            ExpenseRecord::new("Food", 50.0, now - chrono::Duration::days(8)).unwrap(),
        ];

        let ok = ForecastAdapter::new(HttpForecastBackend::new(
            &server.endpoint("predict"),
            Duration::from_secs(5),
        ));
        assert_eq!(
            ok.forecast(&records, now).await,
            ForecastOutcome::Predicted { value: 40.0 }
        );

        let failing = ForecastAdapter::new(HttpForecastBackend::new(
            &server.endpoint("error"),
            Duration::from_secs(5),
        ));
        assert_eq!(failing.forecast(&records, now).await, ForecastOutcome::Failed);

        let slow = ForecastAdapter::new(HttpForecastBackend::new(
            &server.endpoint("slow"),
            Duration::from_secs(5),
        ))
        .with_timeout(Duration::from_millis(100));
        assert_eq!(slow.forecast(&records, now).await, ForecastOutcome::Failed);
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let backend =
            HttpForecastBackend::new("http://localhost:5000/predict/", Duration::from_secs(1));
        assert_eq!(backend.endpoint(), "http://localhost:5000/predict");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP
        let backend =
            HttpForecastBackend::new("http://127.0.0.1:9/predict", Duration::from_millis(500));
        let result = backend
            .predict(&[ForecastPoint { amount: 1.0 }, ForecastPoint { amount: 2.0 }])
            .await;
        assert!(result.is_err());
    }
}
