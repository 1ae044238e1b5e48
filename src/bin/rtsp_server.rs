// ABOUTME: Process entry point: installs logging, loads configuration, and runs the acceptor
// ABOUTME: Grounded on `original_source/videoRTSPServer/videoRTSPserver.cpp`'s signal_set-driven shutdown

use tracing_subscriber::EnvFilter;

use rtsp_server::config::Config;
use rtsp_server::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    tokio::select! {
        result = server::run(config) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}

/// Resolves once either `SIGINT` or `SIGTERM` arrives, matching the
/// original's `boost::asio::signal_set(ioc, SIGINT, SIGTERM)`.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
