//! Mock backend for testing
//!
//! Counts calls and returns a scripted prediction (or failure). Clones share
//! the same call log, so a test can keep one handle and give another to the
//! adapter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{ForecastBackend, ForecastPoint};

#[derive(Clone, Default)]
pub struct MockForecastBackend {
    /// Prediction to return; None makes every call fail
    pub prediction: Option<f64>,
    /// Artificial latency before answering
    pub delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<Vec<ForecastPoint>>>>,
}

impl MockForecastBackend {
    /// Create a mock that always predicts `prediction`
    pub fn new(prediction: f64) -> Self {
        Self {
            prediction: Some(prediction),
            ..Default::default()
        }
    }

    /// Create a mock whose calls always fail
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `predict` was invoked
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Points passed to the most recent call
    pub fn last_request(&self) -> Option<Vec<ForecastPoint>> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ForecastBackend for MockForecastBackend {
    async fn predict(&self, points: &[ForecastPoint]) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(points.to_vec());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.prediction
            .ok_or_else(|| Error::Forecast("mock forecast failure".into()))
    }

    fn endpoint(&self) -> &str {
        "mock://forecast"
    }
}
