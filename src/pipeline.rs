/// Submission pipeline shared by the HTTP handler and tests.
///
/// One operator submission runs the full sequence before control
/// returns: validate -> classify -> merge -> forward -> report. There is
/// no cancellation once classification starts, and nothing is retained
/// after the webhook call returns.
use crate::errors::AppError;
use crate::models::FeedbackRecord;
use crate::sentiment::{SentimentClassifier, SentimentLabel};
use crate::webhook_client::SheetWebhookClient;

/// Result of a completed submission, for operator display.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionOutcome {
    pub sentiment: SentimentLabel,
    pub webhook_status: u16,
}

pub struct FeedbackPipeline {
    classifier: SentimentClassifier,
    webhook: SheetWebhookClient,
}

impl FeedbackPipeline {
    pub fn new(classifier: SentimentClassifier, webhook: SheetWebhookClient) -> Self {
        Self { classifier, webhook }
    }

    /// Process a single feedback submission end to end.
    ///
    /// An empty review halts the pipeline before classification; the
    /// webhook is never called in that case. Classification and webhook
    /// failures are terminal for this submission only.
    pub async fn process(&self, record: FeedbackRecord) -> Result<SubmissionOutcome, AppError> {
        if record.review.trim().is_empty() {
            return Err(AppError::Validation(
                "Please enter a review before submitting".to_string(),
            ));
        }

        let sentiment = self.classifier.classify(&record.review).await?;

        let payload = record.into_payload(sentiment)?;
        let receipt = self.webhook.forward(&payload).await?;

        tracing::info!(
            "Feedback submission complete: sentiment={}, webhook_status={}",
            sentiment,
            receipt.status
        );

        Ok(SubmissionOutcome {
            sentiment,
            webhook_status: receipt.status,
        })
    }
}
