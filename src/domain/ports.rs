use crate::core::ee::Image;
use crate::domain::model::{TileMap, VisParams};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Something that can turn an image expression into a tile map.
#[async_trait]
pub trait MapService: Send + Sync {
    async fn get_map(&self, image: &Image, vis: &VisParams) -> Result<TileMap>;
}
