use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bank_feedback_api::config::Config;
use bank_feedback_api::handlers::{self, AppState};
use bank_feedback_api::pipeline::FeedbackPipeline;
use bank_feedback_api::sentiment::SentimentClassifier;
use bank_feedback_api::webhook_client::SheetWebhookClient;

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, constructs the sentiment
/// classifier and webhook client once, and starts the Axum server with
/// rate limiting and request size limits on the feedback endpoint.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bank_feedback_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Construct the classifier once; the handle is immutable afterwards
    // and shared across all submissions.
    let classifier = SentimentClassifier::from_config(&config);
    tracing::info!("Sentiment classifier initialized");

    let webhook = SheetWebhookClient::new(&config);
    tracing::info!("Sheet webhook client initialized");

    let app_state = Arc::new(AppState {
        pipeline: FeedbackPipeline::new(classifier, webhook),
        config: config.clone(),
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/feedback", post(handlers::submit_feedback))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload, records are small
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
