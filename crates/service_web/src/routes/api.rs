//! JSON pricing endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::pricing::{self, PayoffMode, PricingInputs};

fn default_spot() -> f64 {
    100.0
}
fn default_strike() -> f64 {
    100.0
}
fn default_maturity() -> f64 {
    1.0
}
fn default_rate() -> f64 {
    0.05
}
fn default_volatility() -> f64 {
    0.2
}
fn default_steps() -> usize {
    252
}
fn default_paths() -> usize {
    20_000
}
fn default_payoff() -> PayoffMode {
    PayoffMode::Call
}

/// POST /api/v1/price request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PriceRequest {
    #[serde(default = "default_spot")]
    pub spot: f64,
    #[serde(default = "default_strike")]
    pub strike: f64,
    #[serde(default = "default_maturity")]
    pub maturity: f64,
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default = "default_paths")]
    pub paths: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_payoff")]
    pub payoff_mode: PayoffMode,
    #[serde(default)]
    pub payoff_expr: Option<String>,
}

/// Successful pricing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    /// Discounted Monte Carlo estimate
    pub price: f64,
    /// Standard error of the estimate
    pub std_error: f64,
    /// 95% confidence half-width (1.96 · stdError)
    pub ci95: f64,
    /// Seed that produced the estimate, for replay
    pub seed: u64,
}

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the API routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/price", post(price))
}

/// POST /api/v1/price - Monte Carlo pricing.
async fn price(Json(request): Json<PriceRequest>) -> impl IntoResponse {
    info!(
        paths = request.paths,
        steps = request.steps,
        "pricing request received"
    );

    let inputs = PricingInputs {
        spot: request.spot,
        strike: request.strike,
        maturity: request.maturity,
        rate: request.rate,
        volatility: request.volatility,
        steps: request.steps,
        paths: request.paths,
        seed: request.seed,
        payoff_mode: request.payoff_mode,
        custom_expr: request.payoff_expr,
    };

    // The estimation is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || pricing::estimate(&inputs)).await;

    match outcome {
        Ok(Ok(outcome)) => (
            StatusCode::OK,
            Json(PriceResponse {
                price: outcome.result.price,
                std_error: outcome.result.std_error,
                ci95: outcome.result.confidence_95(),
                seed: outcome.seed,
            }),
        )
            .into_response(),
        Ok(Err(failure)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: failure.to_string(),
            }),
        )
            .into_response(),
        Err(join_error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("pricing task failed: {}", join_error),
            }),
        )
            .into_response(),
    }
}
