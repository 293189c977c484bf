use med42_gateway::{AppState, build_router, config::{Config, ConfigError}};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env()?;
    if cfg.med42_api_key.is_none() {
        warn!("MED42_API_KEY is not set; Med42 calls will be sent without a bearer token");
    }
    // Compute before moving cfg into state
    let addr = cfg.bind_addr();

    let state = AppState::new(cfg, reqwest::Client::new());
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;

    info!("Med42 gateway listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
