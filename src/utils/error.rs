use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("JWT signing error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Earth Engine initialization failed: {message}")]
    InitializationError { message: String },

    #[error("Earth Engine returned {status}: {message}")]
    RemoteError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ProxyError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ProxyError::ApiError(_) | ProxyError::RemoteError { .. } => ErrorSeverity::Medium,
            ProxyError::MissingConfigError { .. }
            | ProxyError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ProxyError::AuthError { .. }
            | ProxyError::InitializationError { .. }
            | ProxyError::JwtError(_)
            | ProxyError::IoError(_)
            | ProxyError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// 對外回應時使用的 HTTP 狀態碼
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::ApiError(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::ApiError(_)
            | ProxyError::RemoteError { .. }
            | ProxyError::AuthError { .. }
            | ProxyError::JwtError(_)
            | ProxyError::InitializationError { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProxyError::MissingConfigError { field } => {
                format!("Required setting {} is not set", field)
            }
            ProxyError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting {} is invalid: {}", field, reason)
            }
            ProxyError::AuthError { .. } | ProxyError::JwtError(_) => {
                "Could not authenticate with Earth Engine".to_string()
            }
            ProxyError::InitializationError { .. } => {
                "Earth Engine client could not be initialized".to_string()
            }
            ProxyError::RemoteError { status, .. } => {
                format!("Earth Engine request failed with status {}", status)
            }
            ProxyError::ApiError(_) => "Earth Engine could not be reached".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ProxyError::MissingConfigError { .. } | ProxyError::InvalidConfigValueError { .. } => {
                "Check the service-account variables in the environment or .env file"
            }
            ProxyError::AuthError { .. } | ProxyError::JwtError(_) => {
                "Make sure PRIVATE_KEY is the PEM key of the service account named by CLIENT_EMAIL"
            }
            ProxyError::InitializationError { .. } => {
                "Please make sure you have created a service account and have been approved. \
                 Visit https://developers.google.com/earth-engine/service_account#how-do-i-create-a-service-account to learn more."
            }
            ProxyError::ApiError(_) | ProxyError::RemoteError { .. } => {
                "Retry the request; if it keeps failing check the Earth Engine status page"
            }
            _ => "Check the logs for details",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!("❌ {} (status {})", self, status.as_u16());
        (status, self.user_friendly_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
