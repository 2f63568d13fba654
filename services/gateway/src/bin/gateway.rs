//! services/gateway/src/bin/gateway.rs

use gateway_lib::{
    adapters::{
        connect, GrpcAnalyzerAdapter, GrpcAuthAdapter, GrpcStorageAdapter, GrpcSuggestionAdapter,
        GrpcTicketAdapter,
    },
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting gateway...");

    // --- 2. Open Backend Channels ---
    // Channels connect on first use, so the gateway starts even if a backend is down.
    let auth_channel = connect(&config.auth_service)?;
    let ticket_channel = connect(&config.ticket_service)?;
    let s3_channel = connect(&config.s3_service)?;
    let analyzer_channel = connect(&config.analyzer_service)?;
    let suggestions_channel = connect(&config.suggestions_service)?;
    info!(
        auth = %config.auth_service.uri(),
        tickets = %config.ticket_service.uri(),
        s3 = %config.s3_service.uri(),
        analyzer = %config.analyzer_service.uri(),
        suggestions = %config.suggestions_service.uri(),
        "Backend channels configured."
    );

    // --- 3. Initialize Service Adapters ---
    let auth_adapter = Arc::new(GrpcAuthAdapter::new(auth_channel));
    let ticket_adapter = Arc::new(GrpcTicketAdapter::new(ticket_channel));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        auth: auth_adapter.clone(),
        users: auth_adapter,
        tickets: ticket_adapter.clone(),
        summaries: ticket_adapter,
        storage: Arc::new(GrpcStorageAdapter::new(s3_channel)),
        analyzer: Arc::new(GrpcAnalyzerAdapter::new(analyzer_channel)),
        suggestions: Arc::new(GrpcSuggestionAdapter::new(suggestions_channel)),
    });

    // --- 5. Create the Web Router ---
    let app = build_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections...");
}
