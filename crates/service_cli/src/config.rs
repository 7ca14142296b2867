//! Client configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use adapter_backend::HttpBackendConfig;
use report_pipeline::PipelineConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "AML_";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid base URL: {0}. Must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Invalid request timeout: {0}. Must be at least one second")]
    InvalidTimeout(u64),

    #[error("Invalid concurrency: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid environment: {0}. Must be one of: development, staging, production")]
    InvalidEnvironment(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Deployment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s = String::deserialize(deserializer)?;
    T::from_str(&s).map_err(serde::de::Error::custom)
}

/// Client configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Reporting backend base URL, including any path prefix
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Upper bound on validation calls in flight during a batch
    pub max_concurrent_validations: usize,
    /// Log level
    #[serde(deserialize_with = "deserialize_from_str")]
    pub log_level: LogLevel,
    /// Environment (development, staging, production)
    #[serde(deserialize_with = "deserialize_from_str")]
    pub environment: Environment,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            request_timeout_secs: 30,
            max_concurrent_validations: 8,
            log_level: LogLevel::Info,
            environment: Environment::Development,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Override fields from `AML_*` variables found by `lookup`; unset keys leave the field alone
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(url) = var("BASE_URL") {
            self.base_url = url;
        }
        if let Some(token) = var("API_TOKEN") {
            self.api_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(secs) = var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs.parse().map_err(|_| {
                ConfigError::EnvError(format!("{}REQUEST_TIMEOUT_SECS={}", ENV_PREFIX, secs))
            })?;
        }
        if let Some(max) = var("MAX_CONCURRENT_VALIDATIONS") {
            self.max_concurrent_validations = max.parse().map_err(|_| {
                ConfigError::EnvError(format!("{}MAX_CONCURRENT_VALIDATIONS={}", ENV_PREFIX, max))
            })?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(env) = var("ENV") {
            self.environment = Environment::from_str(&env)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.request_timeout_secs));
        }
        if self.max_concurrent_validations == 0 {
            return Err(ConfigError::InvalidConcurrency(self.max_concurrent_validations));
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(url) = &cli.base_url {
            self.base_url = url.clone();
        }
        if let Some(token) = &cli.api_token {
            self.api_token = Some(token.clone());
        }
        if let Some(secs) = cli.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(max) = cli.max_concurrent_validations {
            self.max_concurrent_validations = max;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        Ok(())
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Settings for the HTTP adapter
    pub fn backend_config(&self) -> HttpBackendConfig {
        let config = HttpBackendConfig::new(&self.base_url).with_timeout(self.request_timeout());
        match &self.api_token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    /// Settings for the pipeline
    pub fn pipeline_config(&self, actor: &str) -> PipelineConfig {
        PipelineConfig::new()
            .with_call_timeout(self.request_timeout())
            .with_max_concurrent_validations(self.max_concurrent_validations)
            .with_actor(actor)
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Token override
    pub api_token: Option<String>,
    /// Timeout override
    pub request_timeout_secs: Option<u64>,
    /// Concurrency override
    pub max_concurrent_validations: Option<usize>,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ClientConfig, ConfigError> {
    build_config_with_env(cli, |key| std::env::var(key).ok())
}

fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };

    config.apply_env_from(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
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
        move |key| map.get(key).cloned()
    }

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert!(config.api_token.is_none());
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_concurrent_validations, 8);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str("prod").unwrap(), Environment::Production);
        assert_eq!(Environment::from_str("stage").unwrap(), Environment::Staging);
        assert!(Environment::from_str("qa").is_err());
    }

    #[test]
    fn test_from_file() {
        let file = config_file(
            r#"
base_url = "https://aml.bank.example/api"
api_token = "s3cret"
request_timeout_secs = 10
log_level = "debug"
environment = "production"
"#,
        );

        let config = ClientConfig::from_file(file.path()).unwrap();

        assert_eq!(config.base_url, "https://aml.bank.example/api");
        assert_eq!(config.api_token.as_deref(), Some("s3cret"));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.max_concurrent_validations, 8);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn test_from_file_rejects_bad_values() {
        let file = config_file("log_level = \"loud\"\n");
        assert!(matches!(
            ClientConfig::from_file(file.path()),
            Err(ConfigError::FileError(_))
        ));

        let file = config_file("base_url = \"ftp://aml.bank.example\"\n");
        assert!(matches!(
            ClientConfig::from_file(file.path()),
            Err(ConfigError::InvalidBaseUrl(_))
        ));

        assert!(ClientConfig::from_file(Path::new("/nonexistent/amlctl.toml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config
            .apply_env_from(env(&[
                ("AML_BASE_URL", "https://staging.example/api"),
                ("AML_MAX_CONCURRENT_VALIDATIONS", "2"),
                ("AML_ENV", "staging"),
            ]))
            .unwrap();

        assert_eq!(config.base_url, "https://staging.example/api");
        assert_eq!(config.max_concurrent_validations, 2);
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_env_parse_error() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_env_from(env(&[("AML_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
    }

    #[test]
    fn test_priority_cli_over_env_over_file() {
        let file = config_file(
            r#"
base_url = "https://file.example/api"
request_timeout_secs = 5
max_concurrent_validations = 3
"#,
        );
        let cli = CliArgs {
            config_file: Some(file.path().to_path_buf()),
            base_url: Some("https://cli.example/api".to_string()),
            ..CliArgs::default()
        };
        let lookup = env(&[
            ("AML_BASE_URL", "https://env.example/api"),
            ("AML_REQUEST_TIMEOUT_SECS", "7"),
        ]);

        let config = build_config_with_env(&cli, lookup).unwrap();

        assert_eq!(config.base_url, "https://cli.example/api");
        assert_eq!(config.request_timeout_secs, 7);
        assert_eq!(config.max_concurrent_validations, 3);
    }

    #[test]
    fn test_zero_values_rejected() {
        let cli = CliArgs {
            max_concurrent_validations: Some(0),
            ..CliArgs::default()
        };
        assert!(matches!(
            build_config_with_env(&cli, env(&[])),
            Err(ConfigError::InvalidConcurrency(0))
        ));

        let cli = CliArgs {
            request_timeout_secs: Some(0),
            ..CliArgs::default()
        };
        assert!(matches!(
            build_config_with_env(&cli, env(&[])),
            Err(ConfigError::InvalidTimeout(0))
        ));
    }

    #[test]
    fn test_pipeline_and_backend_settings() {
        let config = ClientConfig {
            request_timeout_secs: 12,
            max_concurrent_validations: 4,
            api_token: Some("t".to_string()),
            ..ClientConfig::default()
        };

        let pipeline = config.pipeline_config("mlro");
        assert_eq!(pipeline.call_timeout, Duration::from_secs(12));
        assert_eq!(pipeline.max_concurrent_validations, 4);
        assert_eq!(pipeline.actor, "mlro");

        let backend = config.backend_config();
        assert_eq!(backend.timeout, Duration::from_secs(12));
        assert_eq!(backend.api_token.as_deref(), Some("t"));
    }
}
