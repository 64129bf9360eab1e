//! Test utilities for financeflow-core
//!
//! This module provides a mock forecast server that can be used for
//! development and integration tests of the HTTP backend.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::Json, http::StatusCode, routing::post, Router};
use tokio::sync::oneshot;

use crate::forecast::{ForecastPoint, ForecastResponse};

/// Mock forecast server for testing and development
///
/// Routes:
/// - `POST /predict`: mean of the submitted amounts
/// - `POST /error`: HTTP 500
/// - `POST /garbage`: a 200 whose body is not a forecast response
/// - `POST /slow`: answers after two seconds
pub struct MockForecastServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockForecastServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/predict", post(handle_predict))
            .route("/error", post(handle_error))
            .route("/garbage", post(handle_garbage))
            .route("/slow", post(handle_slow));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of one of the routes, e.g. `endpoint("predict")`
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.url(), route)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockForecastServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_predict(Json(points): Json<Vec<ForecastPoint>>) -> Json<ForecastResponse> {
    let prediction = if points.is_empty() {
        0.0
    } else {
        points.iter().map(|p| p.amount).sum::<f64>() / points.len() as f64
    };
    Json(ForecastResponse { prediction })
}

async fn handle_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable")
}

async fn handle_garbage() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "result": "soon" }))
}

async fn handle_slow(points: Json<Vec<ForecastPoint>>) -> Json<ForecastResponse> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    handle_predict(points).await
}
