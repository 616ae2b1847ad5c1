use anyhow::Context;
use syncar::bootstrap;
use syncar::config::Config;
use syncar::infrastructure::http::router::build_router;
use syncar::infrastructure::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let _guard = observability::init(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize observability: {}", e))?;
    tracing::info!("Configuration loaded");

    // Restores session and job before the listener opens
    let app = bootstrap::build_app_state(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build application state: {}", e))?;

    let poller_handle = app.poller.start();
    let router = build_router(app.state);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    app.poller.stop();
    if let Err(e) = poller_handle.await {
        tracing::error!("Job poller ended abnormally: {}", e);
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
