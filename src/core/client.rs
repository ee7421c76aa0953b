use crate::config::credentials::ServiceAccountKey;
use crate::config::ServerConfig;
use crate::core::auth::ServiceAccountAuthenticator;
use crate::core::ee::Image;
use crate::core::expression::Expression;
use crate::domain::model::{ImageFormat, TileMap, VisParams};
use crate::domain::ports::MapService;
use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = concat!("ee-tile-proxy/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMapRequest<'a> {
    expression: &'a Expression,
    file_format: ImageFormat,
}

#[derive(Debug, Deserialize)]
struct CreateMapResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Thin client over the Earth Engine REST API.
pub struct EarthEngineClient {
    client: Client,
    api_root: String,
    project: String,
    auth: ServiceAccountAuthenticator,
}

impl EarthEngineClient {
    pub fn new(config: &ServerConfig, key: ServiceAccountKey) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        let project = key.project_id.clone();
        let auth = ServiceAccountAuthenticator::new(key, client.clone())?;

        Ok(Self {
            client,
            api_root: config.api_root().to_string(),
            project,
            auth,
        })
    }

    /// Authenticate, then make sure the project is usable. Any failure here
    /// should stop the server from starting.
    pub async fn connect(config: &ServerConfig, key: ServiceAccountKey) -> Result<Self> {
        let client = Self::new(config, key)?;

        tracing::info!("Authenticating Earth Engine API using private key...");
        client.authenticate().await?;
        tracing::info!("Authentication successful.");

        client.initialize().await?;
        tracing::info!("Earth Engine client library initialized.");

        Ok(client)
    }

    pub async fn authenticate(&self) -> Result<()> {
        self.auth.access_token().await.map(|_| ())
    }

    /// Cheapest authenticated call available: list at most one asset in the
    /// project root.
    pub async fn initialize(&self) -> Result<()> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/v1/projects/{}:listAssets", self.api_root, self.project);

        tracing::debug!("📡 Checking project access: {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[("pageSize", "1")])
            .header(reqwest::header::AUTHORIZATION, token.authorization_header())
            .send()
            .await?;

        if !response.status().is_success() {
            let err = remote_error(response).await;
            return Err(ProxyError::InitializationError {
                message: err.to_string(),
            });
        }
        Ok(())
    }

    pub async fn create_map(&self, expression: &Expression, format: ImageFormat) -> Result<TileMap> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/v1/projects/{}/maps", self.api_root, self.project);

        tracing::debug!("📡 Creating map: POST {}", url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, token.authorization_header())
            .json(&CreateMapRequest {
                expression,
                file_format: format,
            })
            .send()
            .await?;

        tracing::debug!("📡 Map response status: {}", response.status());
        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        let created: CreateMapResponse = response.json().await?;
        Ok(TileMap {
            url_format: self.tile_url_format(&created.name),
            name: created.name,
        })
    }

    pub fn tile_url_format(&self, map_name: &str) -> String {
        format!("{}/v1/{}/tiles/{{z}}/{{x}}/{{y}}", self.api_root, map_name)
    }
}

#[async_trait]
impl MapService for EarthEngineClient {
    async fn get_map(&self, image: &Image, vis: &VisParams) -> Result<TileMap> {
        vis.validate()?;

        let expression = if vis.has_visualization() {
            image.clone().visualize(vis).expression()
        } else {
            image.expression()
        };
        self.create_map(&expression, vis.file_format()).await
    }
}

/// Turn a non-2xx response into `RemoteError`, keeping Google's message
/// when the body has one.
async fn remote_error(response: Response) -> ProxyError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<GoogleErrorBody>(&body) {
        Ok(parsed) => match parsed.error.status {
            Some(code) => format!("{} ({})", parsed.error.message, code),
            None => parsed.error.message,
        },
        Err(_) if body.is_empty() => "empty response body".to_string(),
        Err(_) => body,
    };

    ProxyError::RemoteError { status, message }
}
