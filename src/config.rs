use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Workflow-automation webhook that appends feedback rows to the
    /// online spreadsheet. Carries an access signature, so it is a secret
    /// and only ever comes from the environment.
    pub sheet_webhook_url: String,
    pub sentiment_api_url: String,
    pub sentiment_api_token: String,
    /// Review text passed to the model is cut to this many characters.
    pub review_max_chars: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            sheet_webhook_url: std::env::var("SHEET_WEBHOOK_URL")
                .map_err(|_| anyhow::anyhow!("SHEET_WEBHOOK_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("SHEET_WEBHOOK_URL cannot be empty");
                    }
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("SHEET_WEBHOOK_URL must start with http:// or https://");
                    }
                    url::Url::parse(&url)
                        .map_err(|e| anyhow::anyhow!("SHEET_WEBHOOK_URL is not a valid URL: {}", e))?;
                    Ok(url)
                })?,
            sentiment_api_url: std::env::var("SENTIMENT_API_URL")
                .map_err(|_| anyhow::anyhow!("SENTIMENT_API_URL environment variable required"))
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("SENTIMENT_API_URL cannot be empty");
                    }
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("SENTIMENT_API_URL must start with http:// or https://");
                    }
                    Ok(url)
                })?,
            sentiment_api_token: std::env::var("SENTIMENT_API_TOKEN")
                .map_err(|_| anyhow::anyhow!("SENTIMENT_API_TOKEN environment variable required"))
                .and_then(|token| {
                    if token.trim().is_empty() {
                        anyhow::bail!("SENTIMENT_API_TOKEN cannot be empty");
                    }
                    Ok(token)
                })?,
            review_max_chars: std::env::var("REVIEW_MAX_CHARS")
                .unwrap_or_else(|_| "512".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REVIEW_MAX_CHARS must be a positive number"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Sentiment API URL: {}", config.sentiment_api_url);
        tracing::debug!("Review max chars: {}", config.review_max_chars);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
