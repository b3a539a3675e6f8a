//! Configuration for the routing backend client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default backend URL (the Flask development server)
const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development backend
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    #[default]
    Production,
}

impl Environment {
    /// Parse from the `RUTEKITA_ENV` environment variable
    pub fn from_env() -> Self {
        Self::parse(&env::var("RUTEKITA_ENV").unwrap_or_default())
    }

    /// Parse a name; anything unrecognised is production
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            "staging" | "stage" => Self::Staging,
            _ => Self::Production,
        }
    }

    fn default_timeout(self) -> Duration {
        match self {
            Self::Development => Duration::from_secs(10),
            Self::Staging | Self::Production => Duration::from_secs(30),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the routing backend
    pub base_url: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Send `ngrok-skip-browser-warning` for tunnelled backends
    pub skip_ngrok_warning: bool,
    /// Current environment
    pub environment: Environment,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            skip_ngrok_warning: false,
            environment: Environment::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `RUTEKITA_API_URL`: Base URL of the routing backend
    /// - `RUTEKITA_ENV`: Environment (development/staging/production)
    /// - `RUTEKITA_TIMEOUT_SECS`: Request timeout in seconds
    /// - `RUTEKITA_NGROK`: Set to `1`/`true` when the backend sits behind ngrok
    pub fn from_env() -> ApiResult<Self> {
        let environment = Environment::from_env();

        let base_url = env::var("RUTEKITA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout = match env::var("RUTEKITA_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ApiError::config(format!("RUTEKITA_TIMEOUT_SECS is not a number: {raw}")))?,
            Err(_) => environment.default_timeout(),
        };

        let skip_ngrok_warning = env::var("RUTEKITA_NGROK")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let config = Self {
            base_url,
            timeout,
            skip_ngrok_warning,
            environment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create development configuration (local backend)
    #[must_use]
    pub fn development() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Environment::Development.default_timeout(),
            skip_ngrok_warning: false,
            environment: Environment::Development,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to toggle the ngrok header
    #[must_use]
    pub fn with_skip_ngrok_warning(mut self, skip: bool) -> Self {
        self.skip_ngrok_warning = skip;
        self
    }

    /// Absolute URL for an endpoint path
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "{} (must start with http:// or https://)",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
