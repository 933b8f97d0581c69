// FreeWork - personal productivity web backend
// Entry point and server setup

use anyhow::Context;
use freework::api::build_router;
use freework::app::AppState;
use freework::config::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freework=debug,tower_http=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting FreeWork server");

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    let state = AppState::initialize(config)
        .await
        .context("failed to initialize application state")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
