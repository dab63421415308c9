//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development when only the HTTP API (with OpenAPI/Swagger UI) is wanted. The
//! workspace's main `medinext-run` binary serves the same router.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medinext_core::constants::ENV_DATASET_PATH;
use medinext_core::{resolve_dataset_path, CoreConfig, DashboardService};
use medinext_insight::{SuperwiseClient, SuperwiseConfig};

/// Main entry point for the MediNext REST API server
///
/// # Environment Variables
/// - `MEDINEXT_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MEDINEXT_DATASET`: Dataset file (default: `data/synthetic_ehr_data.csv`)
/// - `SUPERWISE_*`, `API_TIMEOUT`, `MAX_RETRIES`, `RETRY_DELAY`: AI analysis settings
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a numeric AI setting is malformed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("medinext_core=info".parse()?)
                .add_directive("medinext_insight=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDINEXT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let dataset_path = resolve_dataset_path(std::env::var(ENV_DATASET_PATH).ok().map(PathBuf::from));
    let core_cfg = CoreConfig::new(dataset_path);
    let superwise_cfg = Arc::new(SuperwiseConfig::from_env()?);
    if !superwise_cfg.is_valid() {
        tracing::warn!("Superwise API is not configured; AI analysis will report a configuration error");
    }

    let state = AppState::new(
        DashboardService::from_config(&core_cfg),
        Arc::new(SuperwiseClient::new(superwise_cfg)),
    );

    tracing::info!("-- Starting MediNext REST API on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
