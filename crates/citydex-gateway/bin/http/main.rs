mod cli;

use std::sync::Arc;

use anyhow::Context;
use citydex_enrichment::{Enricher, EnrichmentConfig};
use citydex_gateway::{App, AppState};
use citydex_storage::{InMemoryRepository, Repository, SqliteRepository};
use citydex_telemetry::TelemetryConfig;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;

    let _telemetry = citydex_telemetry::init(
        TelemetryConfig::builder()
            .service_name(env!("CARGO_PKG_NAME"))
            .format(config.log_format.into())
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        weather_enabled = config.weather_api_key.is_some(),
        "starting citydex gateway"
    );

    let repository: Arc<dyn Repository> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(InMemoryRepository::new()),
        StorageBackendArg::Sqlite => {
            let repository = SqliteRepository::connect(&config.sqlite_url)
                .await
                .with_context(|| format!("failed to open {}", config.sqlite_url))?;
            repository.migrate().await?;
            Arc::new(repository)
        }
    };

    let enrichment = EnrichmentConfig::builder()
        .countries_url(config.countries_url.clone())
        .weather_url(config.weather_url.clone())
        .weather_api_key(config.weather_api_key.clone())
        .build();
    let enricher = Enricher::from_config(&enrichment).context("failed to build enricher")?;
    if config.weather_api_key.is_none() {
        warn!("{} is not set, weather lookups are disabled", cli::WEATHER_API_KEY_ENV);
    }

    let state = AppState::new(repository, Arc::new(enricher));
    let mut router = App::router(state);
    if let Some(dir) = &config.static_dir {
        info!(static_dir = %dir.display(), "serving static files");
        router = App::with_static_dir(router, dir);
    }
    let router = router.layer(App::cors(&config.cors_origins));

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "failed to listen for shutdown signal");
    }
}
