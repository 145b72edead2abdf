//! boxoffice-gateway server entry point.
//!
//! Starts the Axum HTTP server backed by the PostgreSQL ledger.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use boxoffice_gateway::api;
use boxoffice_gateway::app_state::AppState;
use boxoffice_gateway::config::BoxOfficeConfig;
use boxoffice_gateway::ledger::PostgresLedger;
use boxoffice_gateway::service::BookingService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BoxOfficeConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting boxoffice-gateway");

    // Connect to PostgreSQL and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Build service layer over the constraint-enforcing ledger
    let ledger = Arc::new(PostgresLedger::new(pool));
    let booking_service = Arc::new(BookingService::new(ledger));

    // Build application state
    let app_state = AppState { booking_service };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
