use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use mailmerge_service::config::Settings;
use mailmerge_service::error::AppError;
use mailmerge_service::server::{create_app, AppState};
use mailmerge_service::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().map_err(AppError::from)?;

    init_tracing(&settings.log)?;
    tracing::info!("Configuration loaded");

    let state = AppState::new(settings.clone());
    tracing::info!(
        unsubscribe_base = %settings.merge.unsubscribe_base,
        max_batch_size = settings.merge.max_batch_size,
        "Mail-merge engine initialized"
    );

    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
