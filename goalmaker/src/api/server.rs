use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::Result;
use crate::llm::CompletionRequester;

/// Binds `host:port` from the config and serves until Ctrl+C or SIGTERM.
/// A bind or accept failure comes back as [`crate::error::GoalsError::Io`].
pub async fn serve(config: Config, requester: Arc<dyn CompletionRequester>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let app = create_router(AppState::new(config, requester));

    tracing::info!("Goalmaker starting on http://{}", addr);
    tracing::info!("  Suggestions:  http://{}/receive-ai-suggestion", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
