//! OAuth 2.0 JWT-bearer flow for service accounts.

use crate::config::credentials::ServiceAccountKey;
use crate::domain::model::AccessToken;
use crate::utils::error::{ProxyError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const EARTH_ENGINE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/earthengine",
    "https://www.googleapis.com/auth/cloud-platform",
];
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Google caps assertion lifetime at one hour.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Longest token lifetime accepted from the token endpoint.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(default = "default_token_type")]
    token_type: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Token expiry for an `expires_in` reported by the token endpoint.
pub fn expiry_after(now: DateTime<Utc>, expires_in: i64) -> Result<DateTime<Utc>> {
    if !(0..=MAX_TOKEN_LIFETIME_SECS).contains(&expires_in) {
        return Err(ProxyError::AuthError {
            message: format!("token endpoint returned an invalid expires_in: {}", expires_in),
        });
    }
    Ok(now + Duration::seconds(expires_in))
}

pub struct ServiceAccountAuthenticator {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: Client,
    cached: Mutex<Option<AccessToken>>,
}

impl ServiceAccountAuthenticator {
    pub fn new(key: ServiceAccountKey, client: Client) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            ProxyError::AuthError {
                message: format!("PRIVATE_KEY is not a usable RSA key: {}", e),
            }
        })?;

        Ok(Self {
            key,
            encoding_key,
            client,
            cached: Mutex::new(None),
        })
    }

    pub fn claims_at(&self, now: DateTime<Utc>) -> Claims {
        let iat = now.timestamp();
        Claims {
            iss: self.key.client_email.clone(),
            scope: EARTH_ENGINE_SCOPES.join(" "),
            aud: self.key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }

    pub fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key.private_key_id.clone());
        Ok(encode(&header, &self.claims_at(now), &self.encoding_key)?)
    }

    /// Always goes to the token endpoint, bypassing the cache.
    pub async fn fetch_token(&self) -> Result<AccessToken> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        tracing::debug!("🔑 Requesting access token from {}", self.key.token_uri);
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(ProxyError::AuthError {
                message: format!("token endpoint returned {}: {}", status.as_u16(), message),
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ProxyError::AuthError {
                message: format!("unexpected token response: {}", e),
            })?;

        let expires_at = expiry_after(now, token.expires_in)?;

        tracing::debug!("🔑 Access token valid for {}s", token.expires_in);
        Ok(AccessToken {
            token: token.access_token,
            token_type: token.token_type,
            expires_at,
        })
    }

    /// Cached token, refreshed once it gets close to expiry.
    pub async fn access_token(&self) -> Result<AccessToken> {
        // 持鎖期間刷新，並發請求只會觸發一次換發
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.clone());
        }

        tracing::info!("🔄 Refreshing Earth Engine access token");
        let token = self.fetch_token().await?;
        *cached = Some(token.clone());
        Ok(token)
    }
}
