use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// One variant per failure class of the submission pipeline: validation,
/// classification, webhook delivery, plus internal errors. All errors are
/// terminal for the current submission only.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Operator input rejected before classification (e.g. empty review).
    Validation(String),
    /// The sentiment model call failed. Never silently mapped to Neutral.
    Classification(String),
    /// The sheet webhook answered with a non-accepted status code.
    WebhookRejected {
        /// HTTP status returned by the webhook.
        status: u16,
        /// Response body, kept for operator display.
        body: String,
    },
    /// Transport-level failure reaching the webhook (DNS, connect, etc.).
    WebhookTransport(String),
    /// Internal server error.
    Internal(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Classification(msg) => write!(f, "Classification error: {}", msg),
            AppError::WebhookRejected { status, body } => {
                write!(f, "Webhook rejected submission with status {}: {}", status, body)
            }
            AppError::WebhookTransport(msg) => write!(f, "Webhook transport error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each variant to a status code and a JSON body the operator can
    /// act on. Webhook failures keep the remote status and body so the
    /// operator sees why the submission was refused.
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(msg) => {
                let body = Json(json!({
                    "success": false,
                    "error": msg,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::Classification(msg) => {
                tracing::error!("Sentiment classification failed: {}", msg);
                let body = Json(json!({
                    "success": false,
                    "error": format!("Sentiment classification failed: {}", msg),
                }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            AppError::WebhookRejected { status, body } => {
                tracing::error!("Sheet webhook rejected submission: {} {}", status, body);
                let body = Json(json!({
                    "success": false,
                    "error": "Sheet webhook rejected the submission",
                    "webhook_status": status,
                    "webhook_body": body,
                }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            AppError::WebhookTransport(msg) => {
                tracing::error!("Sheet webhook unreachable: {}", msg);
                let body = Json(json!({
                    "success": false,
                    "error": format!("Sheet webhook unreachable: {}", msg),
                }));
                (StatusCode::BAD_GATEWAY, body).into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                let body = Json(json!({
                    "success": false,
                    "error": "Internal server error",
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            AppError::WithContext { source, context } => {
                // Log full context chain, delegate to the underlying error
                tracing::error!("Error with context: {} -> {}", context, source);
                source.clone().into_response()
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::WebhookTransport(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}
