//! QRPG Dashboard binary entry point.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use qrpg_core::QrpgConfig;
use qrpg_core::config::LoggingConfig;
use qrpg_dashboard::{AppState, create_router};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "qrpg_dashboard={level},qrpg_core={level},qrpg_hal={level},tower_http=info",
            level = logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("QRPG_CONFIG").map(PathBuf::from);
    let config = QrpgConfig::load(config_path.as_deref())?;
    init_tracing(&config.logging);

    let state = Arc::new(AppState::from_config(&config)?);
    let bind_addr = state.config.bind_address;
    let app = create_router(state);

    tracing::info!("Starting QRPG Dashboard at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
