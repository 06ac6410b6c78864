//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sentiment_core::{ClassificationResult, Error};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, warn};

use crate::state::AppState;

pub fn create_router(state: AppState, allow_any_origin: bool) -> Router {
    let router = Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/classify", post(classify))
        .with_state(state);

    if allow_any_origin {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}

async fn home() -> &'static str {
    "Sentiment service is up"
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model": &*state.info,
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub phrase: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassifyResponse {
    pub sentiment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_positive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_negative: Option<f64>,
}

impl From<ClassificationResult> for ClassifyResponse {
    fn from(result: ClassificationResult) -> Self {
        Self {
            sentiment: result.sentiment.as_str().to_string(),
            confidence_positive: result.confidence.map(|c| c.positive),
            confidence_negative: result.confidence.map(|c| c.negative),
        }
    }
}

async fn classify(
    State(state): State<AppState>,
    body: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, AppError> {
    metrics::counter!("sentiment_requests_total").increment(1);

    let Json(request) = body.map_err(|rejection| {
        warn!("Rejected classify body: {}", rejection.body_text());
        AppError::InvalidBody(rejection.body_text())
    })?;

    let phrase = request
        .phrase
        .filter(|p| !p.trim().is_empty())
        .ok_or(AppError::NoPhrase)?;

    let result = state.classifier.classify(&phrase).await?;
    debug!(
        "Classified {:?} as {} in {}us",
        phrase, result.sentiment, result.latency_us
    );

    metrics::counter!("sentiment_predictions_total", "sentiment" => result.sentiment.as_str())
        .increment(1);
    metrics::histogram!("sentiment_inference_latency_us").record(result.latency_us as f64);

    Ok(Json(result.into()))
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    NoPhrase,
    InvalidBody(String),
    Internal(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::EmptyInput => AppError::NoPhrase,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::NoPhrase => (
                StatusCode::BAD_REQUEST,
                "no_phrase",
                Error::EmptyInput.to_string(),
            ),
            AppError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, "invalid_body", msg),
            AppError::Internal(msg) => {
                error!("Classification failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
        };
        metrics::counter!("sentiment_errors_total", "kind" => kind).increment(1);

        (status, Json(json!({ "error": message }))).into_response()
    }
}
