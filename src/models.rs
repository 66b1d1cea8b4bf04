use crate::errors::AppError;
use crate::sentiment::SentimentLabel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single customer feedback submission, as collected by the form layer.
///
/// This is the one canonical wire schema: every key is strict PascalCase
/// (`CustomerId`, `BankBranch`, `CreatedAt`, ...). Dates are ISO
/// `YYYY-MM-DD` strings on the wire, so the whole record is plain JSON
/// scalars at submission time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedbackRecord {
    // Identity
    pub customer_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub occupation: String,
    pub address: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub region: String,

    // Account metadata
    pub bank_branch: String,
    pub mobile_no: String,
    pub email: String,
    pub segment: String,
    pub account_no: String,
    pub created_at: NaiveDate,
    /// Null for accounts still open.
    pub closed_at: Option<NaiveDate>,
    pub kyc_status: String,
    pub cibil_score: i32,
    pub income: f64,

    // Product metadata
    pub product_name: String,
    pub category: String,
    pub revenue_type: String,
    pub product_type: String,

    // Transaction metadata
    pub transaction_date: NaiveDate,
    pub transaction_type: String,
    pub amount: f64,
    pub channel: String,
    pub is_digital: bool,
    pub transaction_scope: String,
    pub transaction_mode: String,

    /// Free-text review; the only field the classifier reads.
    pub review: String,
}

impl FeedbackRecord {
    /// Build the outbound webhook payload: the full record with the
    /// derived `Sentiment` field appended. No field is dropped or
    /// renamed on the way out.
    pub fn into_payload(self, sentiment: SentimentLabel) -> Result<Value, AppError> {
        let mut value = serde_json::to_value(&self)
            .map_err(|e| AppError::Internal(format!("Failed to serialize record: {}", e)))?;

        let obj = value
            .as_object_mut()
            .ok_or_else(|| AppError::Internal("Record did not serialize to an object".to_string()))?;
        obj.insert(
            "Sentiment".to_string(),
            Value::String(sentiment.to_string()),
        );

        Ok(value)
    }
}

/// Operator-facing result of a feedback submission.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// Success status.
    pub success: bool,
    /// Response message.
    pub message: String,
    /// Sentiment derived from the review text.
    pub sentiment: SentimentLabel,
    /// Status code the sheet webhook answered with.
    pub webhook_status: u16,
}
