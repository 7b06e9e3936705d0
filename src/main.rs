// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Giftwell API Server
//!
//! Backend for shareable wishlists: users curate lists, share them via a
//! public link, and anonymous visitors claim items with a secret token.

use giftwell::{
    config::Config, db::FirestoreDb, middleware::rate_limit::RateLimiter,
    services::MetadataService, AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Giftwell API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize URL metadata collaborator
    let metadata_service =
        MetadataService::new(Duration::from_secs(config.metadata_timeout_secs))
            .expect("Failed to initialize metadata client");
    tracing::info!(
        timeout_secs = config.metadata_timeout_secs,
        "Metadata service initialized"
    );

    // Rate limiters are constructed once here and injected via AppState,
    // never held as module-level globals.
    let auth_limiter = RateLimiter::new(
        config.auth_rate_limit_per_minute,
        Duration::from_secs(60),
    );
    let api_limiter = RateLimiter::new(
        config.api_rate_limit_per_minute,
        Duration::from_secs(60),
    );
    tracing::info!(
        auth_per_minute = config.auth_rate_limit_per_minute,
        api_per_minute = config.api_rate_limit_per_minute,
        "Rate limiters initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        metadata_service,
        auth_limiter,
        api_limiter,
    });

    // Build router
    let app = giftwell::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("giftwell=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
