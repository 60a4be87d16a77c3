//! Filegate server binary

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use filegate::aggregator::StorageAggregator;
use filegate::api::{create_router, AppState};
use filegate::config::{AppConfig, LogFormat};
use filegate::storage::repository::S3Repository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    let repository = Arc::new(S3Repository::from_config(&config.s3).await);
    let aggregator = Arc::new(StorageAggregator::new(&config.storage, repository));

    if config.storage.use_s3 {
        tracing::info!(region = %config.s3.region, "S3 provider enabled");
    } else {
        tracing::info!(
            local_root = %config.storage.local_root,
            "S3 provider disabled; S3 requests will be emulated on local storage",
        );
    }

    let router = create_router(AppState::new(aggregator));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("filegate=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
