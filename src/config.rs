//! Service configuration, loadable from a TOML file.
//!
//! Every section has full defaults, so a missing or partial file is never
//! fatal on its own — the one thing a usable deployment must supply is at
//! least one `[[connector]]` entry:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8700
//!
//! [search]
//! request_timeout_ms = 5000
//! cache_ttl_secs = 900
//!
//! [[connector]]
//! source = "amazon"
//! endpoint = "https://products.example/amazon/search"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use agora_search::SearchConfig;

use crate::error::ServiceError;

/// Top-level configuration for the search service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Aggregation engine settings, passed through verbatim.
    pub search: SearchConfig,
    /// Registered product sources.
    #[serde(rename = "connector")]
    pub connectors: Vec<ConnectorSettings>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8700,
        }
    }
}

/// One registered product source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSettings {
    /// Unique source tag used for attribution and health tracking.
    pub source: String,
    /// JSON search endpoint for this source.
    pub endpoint: String,
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Io`] if the file cannot be read and
    /// [`ServiceError::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))
    }

    /// Load configuration from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ServiceError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::warn!("no config file given, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_listener_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8700);
        assert!(config.connectors.is_empty());
    }

    #[test]
    fn loads_full_config_from_toml() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            r#"
[server]
host = "0.0.0.0"
port = 9000

[search]
request_timeout_ms = 2500
cache_ttl_secs = 60

[search.weights]
brand_match = 5.0

[[connector]]
source = "amazon"
endpoint = "https://products.example/amazon/search"

[[connector]]
source = "ebay"
endpoint = "https://products.example/ebay/search"
"#
        )
        .expect("write");

        let config = ServiceConfig::load(file.path()).expect("load");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.search.request_timeout_ms, 2500);
        assert_eq!(config.search.cache_ttl_secs, 60);
        assert!((config.search.weights.brand_match - 5.0).abs() < f64::EPSILON);
        // Unset weights keep their defaults.
        assert!((config.search.weights.token_overlap - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.connectors.len(), 2);
        assert_eq!(config.connectors[0].source, "amazon");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[server]\nport = 8080").expect("write");

        let config = ServiceConfig::load(file.path()).expect("load");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.search.cache_ttl_secs, 900);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[server\nport=").expect("write");

        let err = ServiceConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ServiceConfig::load(Path::new("/nonexistent/agora.toml")).unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }

    #[test]
    fn no_path_yields_defaults() {
        let config = ServiceConfig::load_or_default(None).expect("defaults");
        assert_eq!(config.server.port, 8700);
    }
}
