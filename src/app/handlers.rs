use crate::core::queries::{self, MapQuery};
use crate::domain::ports::MapService;
use crate::utils::error::Result;
use axum::extract::State;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub maps: Arc<dyn MapService>,
}

impl AppState {
    pub fn new(maps: Arc<dyn MapService>) -> Self {
        Self { maps }
    }
}

/// `GET /mapid`: cloud-filtered Sentinel-2 mosaic.
pub async fn mapid(State(state): State<AppState>) -> Result<String> {
    serve_query(&state, "mapid", queries::sentinel2_composite()).await
}

/// `GET /radd`: RADD alerts clipped to the boundary.
pub async fn radd(State(state): State<AppState>) -> Result<String> {
    serve_query(&state, "radd", queries::radd_alerts()).await
}

async fn serve_query(state: &AppState, route: &str, query: MapQuery) -> Result<String> {
    let map = state.maps.get_map(&query.image, &query.vis).await?;
    tracing::info!("🗺️ /{} -> {}", route, map.url_format);
    Ok(map.url_format)
}
