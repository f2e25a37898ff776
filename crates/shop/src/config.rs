//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TAILORDESK_UPLOAD_URL` - Image host unsigned upload endpoint
//! - `TAILORDESK_UPLOAD_PRESET` - Unsigned upload preset name
//!
//! ## Optional
//! - `TAILORDESK_UPLOAD_API_KEY` - Image host API key (only for hosts that
//!   require one alongside the preset)
//!
//! A `.env` file in the working directory is honored for local development.

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Image host configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ImageHostConfig {
    /// Unsigned upload endpoint (one POST per file).
    pub upload_url: String,
    /// Unsigned upload preset configured host-side.
    pub upload_preset: String,
    /// Optional API key.
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for ImageHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHostConfig")
            .field("upload_url", &self.upload_url)
            .field("upload_preset", &self.upload_preset)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Library configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Image host settings for order photo uploads.
    pub image_host: ImageHostConfig,
}

impl ShopConfig {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or
    /// malformed.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is fine; real deployments set variables directly.
        dotenvy::dotenv().ok();

        let upload_url = require_var("TAILORDESK_UPLOAD_URL")?;
        if !upload_url.starts_with("http://") && !upload_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "TAILORDESK_UPLOAD_URL".to_owned(),
                "must be an absolute http(s) URL".to_owned(),
            ));
        }

        Ok(Self {
            image_host: ImageHostConfig {
                upload_url,
                upload_preset: require_var("TAILORDESK_UPLOAD_PRESET")?,
                api_key: optional_var("TAILORDESK_UPLOAD_API_KEY").map(SecretString::from),
            },
        })
    }
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
