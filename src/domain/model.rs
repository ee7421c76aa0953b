use crate::utils::error::{ProxyError, Result};
use crate::utils::validation::{validate_hex_color, validate_non_empty_string, validate_range, Validate};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 提前多久視為過期，避免請求途中 token 失效
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageFormat {
    #[default]
    AutoJpegPng,
    Png,
    Jpeg,
}

/// Visualization parameters for a map request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisParams {
    pub bands: Vec<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub opacity: Option<f64>,
    pub palette: Vec<String>,
    pub format: Option<ImageFormat>,
}

impl VisParams {
    /// Whether anything besides the output format is set, i.e. whether the
    /// image has to go through `Image.visualize` before rendering.
    pub fn has_visualization(&self) -> bool {
        !self.bands.is_empty()
            || self.min.is_some()
            || self.max.is_some()
            || self.opacity.is_some()
            || !self.palette.is_empty()
    }

    pub fn file_format(&self) -> ImageFormat {
        self.format.unwrap_or_default()
    }
}

impl Validate for VisParams {
    fn validate(&self) -> Result<()> {
        if !matches!(self.bands.len(), 0 | 1 | 3) {
            return Err(ProxyError::InvalidConfigValueError {
                field: "bands".to_string(),
                value: self.bands.join(","),
                reason: "Exactly one or three bands can be visualized".to_string(),
            });
        }
        for band in &self.bands {
            validate_non_empty_string("bands", band)?;
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ProxyError::InvalidConfigValueError {
                    field: "min".to_string(),
                    value: min.to_string(),
                    reason: format!("min must not exceed max ({})", max),
                });
            }
        }

        if let Some(opacity) = self.opacity {
            validate_range("opacity", opacity, 0.0, 1.0)?;
        }

        if !self.palette.is_empty() && self.bands.len() > 1 {
            return Err(ProxyError::InvalidConfigValueError {
                field: "palette".to_string(),
                value: self.palette.join(","),
                reason: "A palette can only be applied to a single band".to_string(),
            });
        }
        for color in &self.palette {
            validate_hex_color("palette", color)?;
        }

        Ok(())
    }
}

/// A map created on the Earth Engine side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    /// Resource name, `projects/{project}/maps/{id}`.
    pub name: String,
    /// Template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}
