use crate::config::Config;
use crate::errors::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Closed set of sentiment labels attached to a feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Map a raw model label onto the closed set.
    ///
    /// Case-insensitive; anything not recognized as positive or negative
    /// falls back to `Neutral`.
    pub fn from_model_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
            SentimentLabel::Negative => write!(f, "Negative"),
        }
    }
}

/// Raw prediction as returned by the underlying model.
#[derive(Debug, Clone)]
pub struct ModelPrediction {
    pub label: String,
    pub score: f64,
}

/// Seam over the pretrained sentiment model.
///
/// The production implementation calls a hosted inference endpoint;
/// tests substitute a mock to assert call counts and captured inputs.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Run the model once over `text` and return its top prediction.
    async fn predict(&self, text: &str) -> Result<ModelPrediction, AppError>;

    /// Model name, for logging.
    fn name(&self) -> &str;
}

/// Client for a hosted pretrained three-class sentiment model.
///
/// Speaks the inference-API shape used by hosted text-classification
/// models: POST `{"inputs": text}`, bearer token auth, response is a
/// ranked list of `{label, score}` objects (sometimes nested one level).
pub struct HostedSentimentModel {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl HostedSentimentModel {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.sentiment_api_url.clone(),
            api_token: config.sentiment_api_token.clone(),
        }
    }

    /// Flatten the endpoint's response into (label, score) pairs,
    /// tolerating both the nested and the flat list shape.
    fn label_scores(body: &Value) -> Vec<(String, f64)> {
        let items: Vec<Value> = match body {
            Value::Array(outer) if outer.first().map_or(false, Value::is_array) => {
                outer[0].as_array().cloned().unwrap_or_default()
            }
            Value::Array(outer) => outer.clone(),
            Value::Object(_) => vec![body.clone()],
            _ => Vec::new(),
        };

        items
            .iter()
            .filter_map(|item| {
                let label = item.get("label")?.as_str()?.to_string();
                let score = item.get("score").and_then(Value::as_f64).unwrap_or(0.0);
                Some((label, score))
            })
            .collect()
    }
}

#[async_trait]
impl SentimentModel for HostedSentimentModel {
    async fn predict(&self, text: &str) -> Result<ModelPrediction, AppError> {
        tracing::debug!("Calling sentiment model for {} chars of review text", text.chars().count());

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| AppError::Classification(format!("Sentiment API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Sentiment API returned error {}: {}", status, error_text);
            return Err(AppError::Classification(format!(
                "Sentiment API returned status {}: {}",
                status, error_text
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            AppError::Classification(format!("Failed to parse sentiment API response: {}", e))
        })?;

        let (label, score) = Self::label_scores(&body)
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| {
                AppError::Classification("Sentiment API response contained no predictions".to_string())
            })?;

        Ok(ModelPrediction { label, score })
    }

    fn name(&self) -> &str {
        "hosted-sentiment"
    }
}

/// Sentiment classifier for free-text reviews.
///
/// Constructed once at startup and shared read-only through the app
/// state; the model handle never mutates after construction.
pub struct SentimentClassifier {
    model: Box<dyn SentimentModel>,
    max_chars: usize,
}

impl SentimentClassifier {
    pub fn new(model: Box<dyn SentimentModel>, max_chars: usize) -> Self {
        Self { model, max_chars }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(HostedSentimentModel::new(config)),
            config.review_max_chars,
        )
    }

    /// Classify `text` into the closed label set.
    ///
    /// Empty or whitespace-only text maps to `Neutral` by convention,
    /// without consulting the model. Longer text is cut to the first
    /// `max_chars` characters before inference; this is a character
    /// count, not the model's token count, so the boundary is
    /// approximate (TODO: switch to token-aware truncation once the
    /// serving layer exposes its tokenizer limit).
    ///
    /// A model failure is returned as an error, never silently mapped
    /// to `Neutral`.
    pub async fn classify(&self, text: &str) -> Result<SentimentLabel, AppError> {
        if text.trim().is_empty() {
            tracing::debug!("Blank review, skipping model and returning Neutral");
            return Ok(SentimentLabel::Neutral);
        }

        let input: String = text.chars().take(self.max_chars).collect();
        let prediction = self.model.predict(&input).await?;

        let label = SentimentLabel::from_model_label(&prediction.label);
        tracing::info!(
            "Review classified as {} (raw label '{}', score {:.3}, model '{}')",
            label,
            prediction.label,
            prediction.score,
            self.model.name()
        );

        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Mock model that records call count and the exact input received.
    /// Clones share state, so a test can box one handle and inspect the other.
    #[derive(Clone)]
    struct RecordingModel {
        label: String,
        calls: Arc<AtomicUsize>,
        last_input: Arc<Mutex<Option<String>>>,
    }

    impl RecordingModel {
        fn new(label: &str) -> Self {
            Self {
                label: label.to_string(),
                calls: Arc::new(AtomicUsize::new(0)),
                last_input: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl SentimentModel for RecordingModel {
        async fn predict(&self, text: &str) -> Result<ModelPrediction, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = Some(text.to_string());
            Ok(ModelPrediction {
                label: self.label.clone(),
                score: 0.99,
            })
        }

        fn name(&self) -> &str {
            "recording-mock"
        }
    }

    /// Mock model that always fails.
    struct FailingModel;

    #[async_trait]
    impl SentimentModel for FailingModel {
        async fn predict(&self, _text: &str) -> Result<ModelPrediction, AppError> {
            Err(AppError::Classification("model unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "failing-mock"
        }
    }

    #[tokio::test]
    async fn blank_text_is_neutral_without_model_call() {
        for text in ["", "   ", "\t\n  \r\n"] {
            let model = RecordingModel::new("positive");
            let classifier = SentimentClassifier::new(Box::new(model.clone()), 512);
            let label = classifier.classify(text).await.unwrap();
            assert_eq!(label, SentimentLabel::Neutral);
            assert_eq!(model.calls.load(Ordering::SeqCst), 0, "model was consulted for {:?}", text);
        }
    }

    #[tokio::test]
    async fn long_text_is_cut_to_first_max_chars() {
        let text: String = "ab".repeat(400); // 800 chars
        let model = RecordingModel::new("positive");
        let classifier = SentimentClassifier::new(Box::new(model.clone()), 512);

        classifier.classify(&text).await.unwrap();

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        let seen = model.last_input.lock().unwrap().clone().unwrap();
        assert_eq!(seen.chars().count(), 512);
        assert_eq!(seen, text.chars().take(512).collect::<String>());
    }

    #[tokio::test]
    async fn short_text_reaches_model_untruncated() {
        let model = RecordingModel::new("negative");
        let classifier = SentimentClassifier::new(Box::new(model.clone()), 512);

        classifier.classify("  slow teller queue  ").await.unwrap();

        let seen = model.last_input.lock().unwrap().clone().unwrap();
        // Whitespace is only used for the blank check, not stripped from input
        assert_eq!(seen, "  slow teller queue  ");
    }

    #[tokio::test]
    async fn raw_label_casing_is_normalized() {
        for (raw, expected) in [
            ("POSITIVE", SentimentLabel::Positive),
            ("positive", SentimentLabel::Positive),
            ("Positive", SentimentLabel::Positive),
            ("NEGATIVE", SentimentLabel::Negative),
            ("neutral", SentimentLabel::Neutral),
            ("5 stars", SentimentLabel::Neutral),
        ] {
            let classifier = SentimentClassifier::new(Box::new(RecordingModel::new(raw)), 512);
            assert_eq!(classifier.classify("some review").await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn model_failure_surfaces_as_error() {
        let classifier = SentimentClassifier::new(Box::new(FailingModel), 512);
        let result = classifier.classify("the branch was closed").await;
        assert!(matches!(result, Err(AppError::Classification(_))));
    }

    #[test]
    fn response_shapes_are_tolerated() {
        let nested = json!([[{"label": "positive", "score": 0.98}, {"label": "neutral", "score": 0.01}]]);
        let flat = json!([{"label": "negative", "score": 0.70}, {"label": "neutral", "score": 0.25}]);
        let single = json!({"label": "neutral", "score": 0.5});

        let top = |v: &Value| {
            HostedSentimentModel::label_scores(v)
                .into_iter()
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .unwrap()
                .0
        };
        assert_eq!(top(&nested), "positive");
        assert_eq!(top(&flat), "negative");
        assert_eq!(top(&single), "neutral");
        assert!(HostedSentimentModel::label_scores(&json!("oops")).is_empty());
    }

    #[test]
    fn display_matches_wire_spelling() {
        assert_eq!(SentimentLabel::Positive.to_string(), "Positive");
        assert_eq!(
            serde_json::to_value(SentimentLabel::Negative).unwrap(),
            "Negative"
        );
    }
}
