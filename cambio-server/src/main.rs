use cambio_server::{AppState, ServerConfig, StartupError, app, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    init_tracing();

    let cfg = ServerConfig::load()?;
    let state = AppState::from_config(&cfg)?;

    let listener = TcpListener::bind(&cfg.server.bind).await?;
    tracing::info!(
        addr = %cfg.server.bind,
        fallback = cfg.resolver.fallback,
        priority = ?cfg.resolver.priority,
        "cambio-server listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("cambio-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
