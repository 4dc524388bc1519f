use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::notification::Priority;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub ntfy: NtfyConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted webhook body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NtfyConfig {
    #[serde(default = "default_ntfy_base_url")]
    pub base_url: String,
    pub topic: String,
    #[serde(default)]
    pub priority: Priority,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub auth: Option<NtfyAuthConfig>,
}

/// Credentials for a protected ntfy topic. A token wins over basic auth.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NtfyAuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

/// Template sources, compiled once at startup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesConfig {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Label tag template; unset means one `key = value` tag per label
    pub labels: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_ntfy_base_url() -> String {
    "https://ntfy.sh".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", 8080)?
            .set_default("ntfy.base_url", default_ntfy_base_url())?
            .set_default("logging.level", default_log_level())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        if let Ok(path) = env::var("CONFIG_FILE") {
            builder = builder.add_source(File::with_name(&path));
        }

        // Load from environment variables
        // NTFY__TOPIC, NTFY__BASE_URL, SERVER__PORT, TEMPLATES__LABELS, etc.
        let config = builder
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize settings from an already assembled configuration
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;

        if settings.ntfy.topic.trim().is_empty() {
            return Err(ConfigError::Message("ntfy.topic must not be empty".to_string()));
        }

        Ok(settings)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Settings::from_config(config)
    }

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert_eq!(server.max_body_bytes, 1024 * 1024);

        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_minimal_config() {
        let settings = parse(
            r#"
            [ntfy]
            topic = "alerts"
            "#,
        )
        .unwrap();

        assert_eq!(settings.ntfy.topic, "alerts");
        assert_eq!(settings.ntfy.base_url, "https://ntfy.sh");
        assert_eq!(settings.ntfy.priority, Priority::Normal);
        assert_eq!(settings.ntfy.timeout_seconds, 10);
        assert!(settings.ntfy.auth.is_none());
        assert!(settings.templates.labels.is_none());
        assert_eq!(settings.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_full_config() {
        let settings = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9095

            [ntfy]
            base_url = "https://ntfy.example.com"
            topic = "ops"
            priority = "urgent"

            [ntfy.auth]
            token = "tk_secret"

            [templates]
            title = "{{labels.alertname}}"
            labels = '{{#each this}}{{@key}}={{this}} {{/each}}'

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server_addr(), "127.0.0.1:9095");
        assert_eq!(settings.ntfy.priority, Priority::Urgent);
        assert_eq!(
            settings.ntfy.auth.unwrap().token.as_deref(),
            Some("tk_secret")
        );
        assert_eq!(settings.templates.title.as_deref(), Some("{{labels.alertname}}"));
        assert!(settings.templates.labels.is_some());
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_missing_topic_is_rejected() {
        assert!(parse("[ntfy]\nbase_url = \"https://ntfy.sh\"").is_err());
        assert!(parse("[ntfy]\ntopic = \"  \"").is_err());
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        assert!(parse("[ntfy]\ntopic = \"a\"\npriority = \"extreme\"").is_err());
    }
}
