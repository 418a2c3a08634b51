use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use water_tracker::{
    clock::SystemClock, render::FrameBuffer, AppState, Config, FileStore, StorageAdapter, Tracker,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Err(err) = fs::create_dir_all(&config.data_dir).await {
        error!("failed to create data dir {}: {err}", config.data_dir.display());
    }

    let tracker = Tracker::bootstrap(
        StorageAdapter::new(FileStore::new(config.data_dir.clone())),
        Arc::new(SystemClock),
        FrameBuffer::new(),
        config.nav_cooldown,
    );
    let app = match tracker {
        Ok(tracker) => water_tracker::router(AppState::new(tracker)),
        Err(err) => {
            error!("{err}");
            water_tracker::fallback_router()
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(data_dir = %config.data_dir.display(), "listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
