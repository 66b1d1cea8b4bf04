use crate::config::Config;
use crate::errors::AppError;
use crate::models::{FeedbackRecord, FeedbackResponse};
use crate::pipeline::FeedbackPipeline;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Submission pipeline. Holds the classifier handle, which is
    /// constructed once at startup and read-only thereafter.
    pub pipeline: FeedbackPipeline,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "bank-feedback-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/feedback
///
/// Accepts one feedback record from the form layer, classifies the
/// review's sentiment, and forwards the merged record to the sheet
/// webhook. The response tells the operator what happened; on failure
/// the operator may simply resubmit the form.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(record): Json<FeedbackRecord>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    tracing::info!(
        "POST /api/v1/feedback - customer_id={}, branch={}",
        record.customer_id,
        record.bank_branch
    );

    let start = std::time::Instant::now();
    let outcome = state.pipeline.process(record).await?;
    let latency_ms = start.elapsed().as_millis();

    tracing::info!(
        "Feedback accepted: sentiment={}, webhook_status={} ({}ms)",
        outcome.sentiment,
        outcome.webhook_status,
        latency_ms
    );

    Ok((
        StatusCode::OK,
        Json(FeedbackResponse {
            success: true,
            message: format!(
                "Feedback sent to the online sheet. Sentiment detected: {}",
                outcome.sentiment
            ),
            sentiment: outcome.sentiment,
            webhook_status: outcome.webhook_status,
        }),
    ))
}
