//! # Storefront Configuration
//!
//! Configuration management for the web server.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_PORT=8080                                               │
//! │     SANITY_TOKEN=sk...                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.storefront/... (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     port 3000, project jl66lkg9, dataset production                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 3000
//!
//! [content]
//! project_id = "jl66lkg9"
//! dataset = "production"
//! api_version = "2022-12-21"
//! use_cdn = true
//! timeout_secs = 10
//! # fixture_path = "apps/web/fixtures/catalog.json"  # serve offline
//!
//! [store]
//! name = "The Headphones Store"
//!
//! [session]
//! cookie_name = "storefront_session"
//! idle_timeout_secs = 3600
//! max_sessions = 10000
//! ```
//!
//! The content token is never read from the file: set `SANITY_TOKEN`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use storefront_content::ContentConfig;

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Server Settings
// =============================================================================

/// Where the HTTP server listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (default: 0.0.0.0 for all interfaces).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Content Settings
// =============================================================================

/// Content source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(default = "default_project_id")]
    pub project_id: String,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_true")]
    pub use_cdn: bool,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the content API host.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Serve products and banners from this JSON file instead of the API.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,

    /// Bearer token; environment only.
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_project_id() -> String {
    "jl66lkg9".to_string()
}

fn default_dataset() -> String {
    storefront_content::config::DEFAULT_DATASET.to_string()
}

fn default_api_version() -> String {
    storefront_content::config::DEFAULT_API_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ContentSettings {
    fn default() -> Self {
        ContentSettings {
            project_id: default_project_id(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            use_cdn: true,
            timeout_secs: default_timeout_secs(),
            base_url: None,
            fixture_path: None,
            token: None,
        }
    }
}

impl ContentSettings {
    /// Builds the content client configuration.
    pub fn to_content_config(&self) -> ContentConfig {
        let mut config = ContentConfig::new(self.project_id.clone())
            .dataset(self.dataset.clone())
            .api_version(self.api_version.clone())
            .use_cdn(self.use_cdn)
            .timeout(Duration::from_secs(self.timeout_secs));

        if let Some(token) = &self.token {
            config = config.token(token.clone());
        }
        if let Some(base_url) = &self.base_url {
            config = config.base_url(base_url.clone());
        }
        config
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// Shop-facing text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Shown in the navbar and page titles.
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_products_heading")]
    pub products_heading: String,

    #[serde(default = "default_products_subheading")]
    pub products_subheading: String,
}

fn default_store_name() -> String {
    "The Headphones Store".to_string()
}

fn default_products_heading() -> String {
    "Best Selling Products".to_string()
}

fn default_products_subheading() -> String {
    "Speakers of many variations".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            products_heading: default_products_heading(),
            products_subheading: default_products_subheading(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// Cart session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Carts untouched for this long are dropped (seconds).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// How often idle carts are swept (seconds).
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,

    /// Live carts kept at once; the least recently seen is evicted first.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_cookie_name() -> String {
    "storefront_session".to_string()
}

fn default_idle_timeout() -> u64 {
    60 * 60
}

fn default_purge_interval() -> u64 {
    60
}

fn default_max_sessions() -> usize {
    10_000
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout(),
            purge_interval_secs: default_purge_interval(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub content: ContentSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`storefront.toml`), if present
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// production, a map in tests).
    ///
    /// ## Variables
    /// | Variable                       | Field                        |
    /// |--------------------------------|------------------------------|
    /// | `STOREFRONT_BIND_ADDR`         | server.bind_addr             |
    /// | `STOREFRONT_PORT`              | server.port                  |
    /// | `STOREFRONT_PROJECT_ID`        | content.project_id           |
    /// | `STOREFRONT_DATASET`           | content.dataset              |
    /// | `STOREFRONT_USE_CDN`           | content.use_cdn              |
    /// | `STOREFRONT_CONTENT_URL`       | content.base_url             |
    /// | `STOREFRONT_FIXTURE`           | content.fixture_path         |
    /// | `SANITY_TOKEN`                 | content.token                |
    /// | `STOREFRONT_STORE_NAME`        | store.name                   |
    /// | `STOREFRONT_SESSION_IDLE_SECS` | session.idle_timeout_secs    |
    /// | `STOREFRONT_MAX_SESSIONS`      | session.max_sessions         |
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("STOREFRONT_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("STOREFRONT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("STOREFRONT_PORT", format!("'{}' is not a port", port)))?;
            debug!(port = self.server.port, "Overriding port from environment");
        }

        if let Some(project) = lookup("STOREFRONT_PROJECT_ID") {
            self.content.project_id = project;
        }

        if let Some(dataset) = lookup("STOREFRONT_DATASET") {
            self.content.dataset = dataset;
        }

        if let Some(use_cdn) = lookup("STOREFRONT_USE_CDN") {
            self.content.use_cdn = match use_cdn.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(ConfigError::invalid(
                        "STOREFRONT_USE_CDN",
                        format!("'{}' is not a boolean", other),
                    ))
                }
            };
        }

        if let Some(url) = lookup("STOREFRONT_CONTENT_URL") {
            self.content.base_url = Some(url);
        }

        if let Some(path) = lookup("STOREFRONT_FIXTURE") {
            debug!(path = %path, "Serving catalog from fixture");
            self.content.fixture_path = Some(PathBuf::from(path));
        }

        if let Some(token) = lookup("SANITY_TOKEN").filter(|t| !t.is_empty()) {
            self.content.token = Some(token);
        }

        if let Some(name) = lookup("STOREFRONT_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(secs) = lookup("STOREFRONT_SESSION_IDLE_SECS") {
            self.session.idle_timeout_secs = secs.parse().map_err(|_| {
                ConfigError::invalid(
                    "STOREFRONT_SESSION_IDLE_SECS",
                    format!("'{}' is not a number of seconds", secs),
                )
            })?;
        }

        if let Some(max) = lookup("STOREFRONT_MAX_SESSIONS") {
            self.session.max_sessions = max.parse().map_err(|_| {
                ConfigError::invalid(
                    "STOREFRONT_MAX_SESSIONS",
                    format!("'{}' is not a session count", max),
                )
            })?;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::invalid("store.name", "must not be empty"));
        }

        let cookie = &self.session.cookie_name;
        if cookie.is_empty()
            || !cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::invalid(
                "session.cookie_name",
                "must be letters, digits, '_' or '-'",
            ));
        }

        if self.session.idle_timeout_secs == 0 {
            return Err(ConfigError::invalid("session.idle_timeout_secs", "must be greater than 0"));
        }

        if self.session.purge_interval_secs == 0 {
            return Err(ConfigError::invalid("session.purge_interval_secs", "must be greater than 0"));
        }

        if self.session.max_sessions == 0 {
            return Err(ConfigError::invalid("session.max_sessions", "must be greater than 0"));
        }

        // The live client is only built without a fixture.
        if self.content.fixture_path.is_none() {
            self.content
                .to_content_config()
                .validate()
                .map_err(|e| ConfigError::invalid("content", e.to_string()))?;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.content.project_id, "jl66lkg9");
        assert_eq!(config.content.dataset, "production");
        assert_eq!(config.store.name, "The Headphones Store");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[content]
dataset = "staging"
use_cdn = false

[store]
name = "Sound Shop"
"#
        )
        .unwrap();

        let config = StorefrontConfig::load(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.content.dataset, "staging");
        assert!(!config.content.use_cdn);
        assert_eq!(config.store.name, "Sound Shop");
        assert_eq!(config.store.products_heading, "Best Selling Products");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = StorefrontConfig::load(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StorefrontConfig::default();
        config
            .apply_env_overrides_from(env(&[
                ("STOREFRONT_PORT", "9000"),
                ("STOREFRONT_USE_CDN", "false"),
                ("STOREFRONT_FIXTURE", "catalog.json"),
                ("SANITY_TOKEN", "sk-abc"),
                ("STOREFRONT_SESSION_IDLE_SECS", "120"),
                ("STOREFRONT_MAX_SESSIONS", "500"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert!(!config.content.use_cdn);
        assert_eq!(config.content.fixture_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.content.token.as_deref(), Some("sk-abc"));
        assert_eq!(config.session.idle_timeout(), Duration::from_secs(120));
        assert_eq!(config.session.max_sessions, 500);
        assert_eq!(config.content.to_content_config().token.as_deref(), Some("sk-abc"));
    }

    #[test]
    fn test_env_override_rejects_bad_numbers() {
        let mut config = StorefrontConfig::default();
        let err = config
            .apply_env_overrides_from(env(&[("STOREFRONT_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "STOREFRONT_PORT"));

        let err = config
            .apply_env_overrides_from(env(&[("STOREFRONT_USE_CDN", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = StorefrontConfig::default();
        config.session.cookie_name = "bad cookie;".to_string();
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.session.idle_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.session.max_sessions = 0;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.content.api_version = "latest".to_string();
        assert!(config.validate().is_err());

        // Content settings are not checked when serving a fixture.
        config.content.fixture_path = Some(PathBuf::from("catalog.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_token_never_serialized() {
        let mut config = StorefrontConfig::default();
        config.content.token = Some("sk-secret".to_string());
        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("sk-secret"));
    }
}
