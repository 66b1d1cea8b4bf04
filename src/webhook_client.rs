use crate::config::Config;
use crate::errors::AppError;
use reqwest::Client;
use serde_json::Value;

/// Statuses the workflow webhook answers with when it accepts a row.
/// 202 covers flows that queue the append asynchronously.
const ACCEPTED_STATUSES: [u16; 2] = [200, 202];

/// Outcome of a successful webhook delivery.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionReceipt {
    pub status: u16,
}

/// Client for the workflow-automation webhook that appends feedback rows
/// to the online spreadsheet.
///
/// One POST per submission, no retry and no idempotency key: a failed
/// delivery is terminal for that submission and the operator resubmits.
pub struct SheetWebhookClient {
    client: Client,
    webhook_url: String,
}

impl SheetWebhookClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            webhook_url: config.sheet_webhook_url.clone(),
        }
    }

    /// Deliver one feedback payload to the sheet webhook.
    ///
    /// Succeeds iff the webhook answers 200 or 202. Any other status is
    /// surfaced with its body so the operator sees why the row was
    /// refused; transport failures surface as `WebhookTransport`.
    pub async fn forward(&self, payload: &Value) -> Result<SubmissionReceipt, AppError> {
        tracing::info!("Forwarding feedback record to sheet webhook");

        let response = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::WebhookTransport(format!("Webhook request failed: {}", e)))?;

        let status = response.status().as_u16();
        if !ACCEPTED_STATUSES.contains(&status) {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Sheet webhook returned error {}: {}", status, body);
            return Err(AppError::WebhookRejected { status, body });
        }

        tracing::info!("Sheet webhook accepted feedback row (status {})", status);
        Ok(SubmissionReceipt { status })
    }
}
