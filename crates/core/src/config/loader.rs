//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Result, RouteSearchError};
use rutekita_api_client::{ChainedCredentials, ClientConfig, EnvToken, SessionFile};
use rutekita_geo::GeoPoint;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Loaded configuration and where it came from
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a file path, a standard location, or defaults
    ///
    /// An explicit path must exist; standard locations are optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };
        schema.validate()?;

        debug!(path = ?config_path, "Configuration loaded");
        Ok(Self {
            schema,
            path: config_path,
        })
    }

    pub fn depot(&self) -> GeoPoint {
        self.schema.map.depot.point()
    }

    /// Client settings from the environment, overridden by `[api]`
    pub fn client_config(&self) -> Result<ClientConfig> {
        let api = &self.schema.api;
        let mut config = ClientConfig::from_env().map_err(|e| RouteSearchError::config(e.to_string()))?;
        if let Some(url) = &api.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(secs) = api.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(skip) = api.skip_ngrok_warning {
            config = config.with_skip_ngrok_warning(skip);
        }
        config.validate().map_err(|e| RouteSearchError::config(e.to_string()))?;
        Ok(config)
    }

    /// Token sources in priority order: environment variable, session file
    pub fn credentials(&self) -> ChainedCredentials {
        let session = &self.schema.session;
        let chain = ChainedCredentials::new().with(EnvToken::new(session.token_env.clone()));
        match session.session_path() {
            Some(path) => chain.with(SessionFile::new(path)),
            None => chain,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = ["rutekita.toml", ".rutekita.toml"].map(PathBuf::from);
    let user = dirs::config_dir().map(|d| d.join("rutekita").join("config.toml"));

    local.into_iter().chain(user).find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        RouteSearchError::config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        RouteSearchError::config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::BaseMap;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert!(config.path.is_none());
        assert_eq!(config.depot(), crate::map::DEPOT);
        assert!(!config.credentials().is_empty());
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/rutekita.toml")));
        assert!(matches!(result, Err(RouteSearchError::Config(_))));
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[map]
base_map = "satellite"

[api]
base_url = "https://routing.example.com"
timeout_secs = 5
skip_ngrok_warning = true
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.path.as_deref(), Some(file.path()));
        assert_eq!(config.schema.map.base_map, BaseMap::Satellite);

        let client = config.client_config().unwrap();
        assert_eq!(client.base_url, "https://routing.example.com");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert!(client.skip_ngrok_warning);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[map\nzoom = ").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_config_load_rejects_invalid_depot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[map.depot]\nlatitude = -200.0\nlongitude = 106.8").unwrap();

        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
