//! Configuration management for the MCP server.
//!
//! Configuration is layered, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A YAML file (`config.yaml`, or the path in `MCP_CONFIG_PATH`)
//! 3. Environment variables, including those loaded from `.env`
//!
//! The result is built once in `main` and handed to [`McpServer::new`];
//! nothing reads configuration from global state afterwards.
//!
//! [`McpServer::new`]: super::McpServer::new

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::amap::{
    AmapResult, ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY,
};

/// Config file read when `MCP_CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Directory for rotating log files unless configured otherwise.
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Upstream AMap API settings.
    pub amap: AmapConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Settings for the AMap REST client.
#[derive(Clone, Serialize, Deserialize)]
pub struct AmapConfig {
    /// API origin, e.g. `https://restapi.amap.com`.
    pub base_url: String,

    /// Web service key. Overridden by the `API_KEY` environment variable.
    pub api_key: String,

    /// Total attempts per request for transient failures.
    pub max_retries: u32,

    /// Per-attempt timeout in seconds. Unset means no timeout.
    pub timeout_secs: Option<u64>,

    /// Fixed pause between attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for AmapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmapConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_key",
                &(!self.api_key.is_empty()).then_some("[REDACTED]"),
            )
            .field("max_retries", &self.max_retries)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Directory for rotating log files, `./logs` by default.
    /// An empty `log_dir` or `MCP_LOG_DIR` turns file logging off.
    pub dir: Option<PathBuf>,

    /// Whether to include timestamps in console output
    /// (`log_timestamps` / `MCP_LOG_TIMESTAMPS`).
    pub with_timestamps: bool,
}

/// Flat key layout of `config.yaml`.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_name: Option<String>,
    base_url: Option<String>,
    api_key: Option<String>,
    max_retries: Option<u32>,
    timeout_secs: Option<u64>,
    retry_delay_ms: Option<u64>,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
    log_timestamps: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "amap-maps".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: None,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: Some(PathBuf::from(DEFAULT_LOG_DIR)),
            with_timestamps: true,
        }
    }
}

impl AmapConfig {
    /// Build the immutable client configuration, checking its invariants.
    pub fn client_config(&self) -> AmapResult<ClientConfig> {
        let mut config = ClientConfig::new(&self.base_url, &self.api_key)
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms));
        if let Some(secs) = self.timeout_secs.filter(|s| *s > 0) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the config file and the environment.
    ///
    /// `.env` is loaded first. If `MCP_CONFIG_PATH` names a file it must
    /// exist; otherwise `config.yaml` is read when present.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match std::env::var("MCP_CONFIG_PATH") {
            Ok(path) => Self::from_file(Path::new(&path), true)?,
            Err(_) => Self::from_file(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.transport = TransportConfig::from_env();

        Ok(config)
    }

    /// Defaults overlaid with the keys found in a YAML file.
    pub fn from_file(path: &Path, required: bool) -> Result<Self> {
        let mut config = Self::default();

        if !required && !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(config);
        }

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Yaml)
                    .required(required),
            )
            .build()
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;

        let file: FileConfig = settings
            .try_deserialize()
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;

        config.merge_file(file);
        info!("Configuration loaded from {}", path.display());

        Ok(config)
    }

    fn merge_file(&mut self, file: FileConfig) {
        if let Some(name) = file.server_name {
            self.server.name = name;
        }
        if let Some(base_url) = file.base_url {
            self.amap.base_url = base_url;
        }
        if let Some(api_key) = file.api_key {
            self.amap.api_key = api_key;
        }
        if let Some(max_retries) = file.max_retries {
            self.amap.max_retries = max_retries;
        }
        if file.timeout_secs.is_some() {
            self.amap.timeout_secs = file.timeout_secs;
        }
        if let Some(delay) = file.retry_delay_ms {
            self.amap.retry_delay_ms = delay;
        }
        if let Some(level) = file.log_level {
            self.logging.level = level;
        }
        if let Some(dir) = file.log_dir {
            self.logging.dir = non_empty_dir(dir);
        }
        if let Some(timestamps) = file.log_timestamps {
            self.logging.with_timestamps = timestamps;
        }
    }

    /// Apply environment overrides on top of the current values.
    ///
    /// `lookup` abstracts `std::env::var` so the precedence rules can be
    /// tested without touching the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("MCP_SERVER_NAME") {
            self.server.name = name;
        }

        if let Some(api_key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            self.amap.api_key = api_key;
            info!("AMap API key loaded from environment");
        }

        if let Some(base_url) = lookup("MCP_AMAP_BASE_URL") {
            self.amap.base_url = base_url;
        }

        if let Some(value) = lookup("MCP_AMAP_MAX_RETRIES") {
            match value.parse() {
                Ok(n) => self.amap.max_retries = n,
                Err(_) => warn!("Ignoring invalid MCP_AMAP_MAX_RETRIES: {}", value),
            }
        }

        if let Some(value) = lookup("MCP_AMAP_TIMEOUT_SECS") {
            match value.parse() {
                Ok(n) => self.amap.timeout_secs = Some(n),
                Err(_) => warn!("Ignoring invalid MCP_AMAP_TIMEOUT_SECS: {}", value),
            }
        }

        if let Some(value) = lookup("MCP_AMAP_RETRY_DELAY_MS") {
            match value.parse() {
                Ok(n) => self.amap.retry_delay_ms = n,
                Err(_) => warn!("Ignoring invalid MCP_AMAP_RETRY_DELAY_MS: {}", value),
            }
        }

        if let Some(level) = lookup("MCP_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(dir) = lookup("MCP_LOG_DIR") {
            self.logging.dir = non_empty_dir(PathBuf::from(dir.trim()));
        }

        if let Some(value) = lookup("MCP_LOG_TIMESTAMPS") {
            match parse_bool(&value) {
                Some(flag) => self.logging.with_timestamps = flag,
                None => warn!("Ignoring invalid MCP_LOG_TIMESTAMPS: {}", value),
            }
        }
    }
}

fn non_empty_dir(dir: PathBuf) -> Option<PathBuf> {
    (!dir.as_os_str().is_empty()).then_some(dir)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_config_file() {
        let file = yaml_file(
            "base_url: https://restapi.amap.com\napi_key: test\nmax_retries: 2\nlog_level: INFO\nlog_dir: /var/log/amap\nlog_timestamps: false\n",
        );
        let config = Config::from_file(file.path(), true).unwrap();
        assert_eq!(config.amap.api_key, "test");
        assert_eq!(config.amap.max_retries, 2);
        assert_eq!(config.logging.level, "INFO");
        assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/amap")));
        assert!(!config.logging.with_timestamps);
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let config = Config::from_file(Path::new("does/not/exist.yaml"), false).unwrap();
        assert_eq!(config.amap.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.amap.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.amap.api_key.is_empty());
        assert_eq!(config.logging.dir, Some(PathBuf::from("./logs")));
        assert!(config.logging.with_timestamps);
    }

    #[test]
    fn test_empty_log_dir_disables_file_logging() {
        let file = yaml_file("log_dir: \"\"\n");
        let config = Config::from_file(file.path(), true).unwrap();
        assert_eq!(config.logging.dir, None);

        let mut config = Config::default();
        config.apply_env(env(&[("MCP_LOG_DIR", "")]));
        assert_eq!(config.logging.dir, None);

        config.apply_env(env(&[("MCP_LOG_DIR", "/tmp/amap-logs")]));
        assert_eq!(config.logging.dir, Some(PathBuf::from("/tmp/amap-logs")));
    }

    #[test]
    fn test_env_log_timestamps() {
        let mut config = Config::default();
        config.apply_env(env(&[("MCP_LOG_TIMESTAMPS", "false")]));
        assert!(!config.logging.with_timestamps);

        config.apply_env(env(&[("MCP_LOG_TIMESTAMPS", "maybe")]));
        assert!(!config.logging.with_timestamps);

        config.apply_env(env(&[("MCP_LOG_TIMESTAMPS", "1")]));
        assert!(config.logging.with_timestamps);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Config::from_file(Path::new("does/not/exist.yaml"), true);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_env_api_key_overrides_file() {
        let file = yaml_file("api_key: from-file\n");
        let mut config = Config::from_file(file.path(), true).unwrap();

        config.apply_env(env(&[("API_KEY", "from-env")]));
        assert_eq!(config.amap.api_key, "from-env");
    }

    #[test]
    fn test_empty_env_api_key_ignored() {
        let file = yaml_file("api_key: from-file\n");
        let mut config = Config::from_file(file.path(), true).unwrap();

        config.apply_env(env(&[("API_KEY", "")]));
        assert_eq!(config.amap.api_key, "from-file");
    }

    #[test]
    fn test_env_numeric_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("MCP_AMAP_MAX_RETRIES", "5"),
            ("MCP_AMAP_TIMEOUT_SECS", "10"),
            ("MCP_AMAP_RETRY_DELAY_MS", "not-a-number"),
            ("MCP_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.amap.max_retries, 5);
        assert_eq!(config.amap.timeout_secs, Some(10));
        assert_eq!(config.amap.retry_delay_ms, 100);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_client_config_requires_key() {
        let config = Config::default();
        assert!(config.amap.client_config().is_err());
    }

    #[test]
    fn test_client_config_carries_settings() {
        let mut config = Config::default();
        config.amap.api_key = "key".to_string();
        config.amap.max_retries = 4;
        config.amap.timeout_secs = Some(3);
        config.amap.retry_delay_ms = 0;

        let client = config.amap.client_config().unwrap();
        assert_eq!(client.max_retries, 4);
        assert_eq!(client.timeout, Some(Duration::from_secs(3)));
        assert!(client.retry_delay.is_zero());
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let mut config = AmapConfig::default();
        config.api_key = "super_secret_key".to_string();
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }
}
