use crate::app::handlers::{self, AppState};
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// The two fixed routes, with permissive CORS so browser map clients can
/// call the proxy directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/mapid", get(handlers::mapid))
        .route("/radd", get(handlers::radd))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
