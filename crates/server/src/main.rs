mod api;
mod cli;
mod router;
mod state;

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::ServerArgs;
use crate::state::AppState;

fn load_config() -> burner_core::Config {
    burner_core::config::load_dotenv();
    burner_core::Config::from_env()
}

/// Bind the configured address; a busy port falls back to any free one.
async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    match TcpListener::bind((host, port)).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            let listener = TcpListener::bind((host, 0)).await?;
            let fallback = listener.local_addr()?.port();
            warn!("Port {} is in use. Switched to random free port {}.", port, fallback);
            Ok(listener)
        }
        Err(e) => Err(e.into()),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn serve(config: burner_core::Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config));

    // Seed the board before accepting requests.
    {
        let store = state.store.lock().await;
        let board = store.load()?;
        info!(
            "Board ready: {} tasks from {}",
            board.tasks.len(),
            store.state_path().display()
        );
    }

    let listener = bind(&state.config.server.host, state.config.server.port).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let app = router::build_router(state);

    info!("Serving on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let args = ServerArgs::parse();
    let mut config = load_config();
    args.apply(&mut config);
    config.log_summary();

    serve(config).await
}
