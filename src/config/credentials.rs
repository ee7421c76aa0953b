use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_pem_private_key, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const AUTH_PROVIDER_CERT_URL: &str = "https://www.googleapis.com/oauth2/v1/certs";
pub const CLIENT_CERT_URL_BASE: &str = "https://www.googleapis.com/robot/v1/metadata/x509/";
pub const UNIVERSE_DOMAIN: &str = "googleapis.com";

/// Service-account key, same field names as the JSON key file Google hands out.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
    pub universe_domain: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("client_id", &self.client_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 從任意來源讀取變數，測試時不必改動行程環境
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ProxyError::MissingConfigError {
                    field: name.to_string(),
                })
        };

        let client_email = required("CLIENT_EMAIL")?;
        let client_x509_cert_url = format!(
            "{}{}",
            CLIENT_CERT_URL_BASE,
            url::form_urlencoded::byte_serialize(client_email.as_bytes()).collect::<String>()
        );

        Ok(Self {
            key_type: "service_account".to_string(),
            project_id: required("PROJECT_ID")?,
            private_key_id: required("PRIVATE_KEY_ID")?,
            private_key: normalize_private_key(&required("PRIVATE_KEY")?),
            client_email,
            client_id: required("CLIENT_ID")?,
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: lookup("TOKEN_URI").unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            auth_provider_x509_cert_url: AUTH_PROVIDER_CERT_URL.to_string(),
            client_x509_cert_url,
            universe_domain: UNIVERSE_DOMAIN.to_string(),
        })
    }
}

/// Keys pasted into a `.env` file usually keep `\n` escaped and may be quoted.
fn normalize_private_key(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .replace("\\n", "\n")
}

impl Validate for ServiceAccountKey {
    fn validate(&self) -> Result<()> {
        if self.key_type != "service_account" {
            return Err(ProxyError::InvalidConfigValueError {
                field: "type".to_string(),
                value: self.key_type.clone(),
                reason: "Only service_account keys are supported".to_string(),
            });
        }
        validate_non_empty_string("PROJECT_ID", &self.project_id)?;
        validate_non_empty_string("PRIVATE_KEY_ID", &self.private_key_id)?;
        validate_non_empty_string("CLIENT_ID", &self.client_id)?;
        validate_email("CLIENT_EMAIL", &self.client_email)?;
        validate_pem_private_key("PRIVATE_KEY", &self.private_key)?;
        validate_url("TOKEN_URI", &self.token_uri)?;

        tracing::debug!("✅ Service account configuration validation passed");
        Ok(())
    }
}
