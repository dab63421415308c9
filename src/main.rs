use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use api_shared::HealthService;
use medinext_core::constants::ENV_DATASET_PATH;
use medinext_core::{CoreConfig, DashboardService, DatasetSource, resolve_dataset_path};
use medinext_insight::{SuperwiseClient, SuperwiseConfig};

/// Main entry point for the MediNext application
///
/// Loads the patient dataset once, resolves the Superwise settings and serves the dashboard
/// REST API (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `MEDINEXT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDINEXT_DATASET`: Patient dataset, CSV or JSON (default: "data/synthetic_ehr_data.csv")
/// - `SUPERWISE_API_URL`, `SUPERWISE_APP_ID`: required for AI analysis
/// - `SUPERWISE_API_VERSION`, `API_TIMEOUT`, `MAX_RETRIES`, `RETRY_DELAY`: optional tuning
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is malformed or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medinext_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("medinext_core=info".parse()?)
                .add_directive("medinext_insight=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDINEXT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let core_cfg = CoreConfig::new(resolve_dataset_path(
        std::env::var(ENV_DATASET_PATH).ok().map(PathBuf::from),
    ));
    let superwise_cfg = Arc::new(SuperwiseConfig::from_env()?);

    let dashboard = DashboardService::from_config(&core_cfg);
    match dashboard.dataset().source() {
        DatasetSource::File(path) => tracing::info!(
            "++ Loaded {} patients from {}",
            dashboard.dataset().len(),
            path.display()
        ),
        DatasetSource::Sample => tracing::warn!(
            "++ Using built-in sample data ({} patients)",
            dashboard.dataset().len()
        ),
    }
    if !superwise_cfg.is_valid() {
        tracing::warn!(
            "++ Superwise API not configured; set SUPERWISE_API_URL and SUPERWISE_APP_ID"
        );
    }

    tracing::info!("++ {}", HealthService::check_health().message);
    tracing::info!("++ Starting MediNext REST on {}", rest_addr);

    let app = router(AppState::new(
        dashboard,
        Arc::new(SuperwiseClient::new(superwise_cfg)),
    ));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
