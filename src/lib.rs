pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use app::{handlers::AppState, router::build_router};
pub use config::{credentials::ServiceAccountKey, ServerConfig};
pub use self::core::client::EarthEngineClient;
pub use utils::error::{ProxyError, Result};
