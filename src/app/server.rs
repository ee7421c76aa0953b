use crate::app::handlers::AppState;
use crate::app::router::build_router;
use crate::config::ServerConfig;
use crate::domain::ports::MapService;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Binds the configured host and port.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Listening on port {}", listener.local_addr()?.port());
    Ok(listener)
}

/// Serves both map routes on `listener` until the process stops.
pub async fn serve(listener: TcpListener, maps: Arc<dyn MapService>) -> Result<()> {
    let app = build_router(AppState::new(maps));
    axum::serve(listener, app).await?;
    Ok(())
}
