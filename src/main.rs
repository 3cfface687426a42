// Saju Intake - HTTP server entry point

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use saju_intake::storage::ConfigService;
use saju_intake::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_service = ConfigService::new().context("failed to load configuration")?;
    let state = AppState::initialize(&config_service, ConfigService::api_key_from_env())
        .context("failed to initialize application state")?;

    let bind = state.config().bind_address.clone();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    tracing::info!(
        bind = %bind,
        config = %config_service.config_path().display(),
        model = %state.config().model,
        "saju-intake listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await
        .context("server error")?;

    Ok(())
}
