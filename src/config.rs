use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "kindsearch.toml";

/// Environment override for the text index URL.
pub const ENV_ELASTICSEARCH_URL: &str = "ELASTICSEARCH_URL";
/// Environment override for the HTTP port.
pub const ENV_PORT: &str = "PORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub collections: CollectionsConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the external text index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the Elasticsearch cluster
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,

    /// Tag inserted before each highlighted term
    #[serde(default = "default_pre_tag")]
    pub pre_tag: String,

    /// Tag inserted after each highlighted term
    #[serde(default = "default_post_tag")]
    pub post_tag: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            timeout_secs: default_gateway_timeout(),
            pre_tag: default_pre_tag(),
            post_tag: default_post_tag(),
        }
    }
}

fn default_gateway_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_gateway_timeout() -> u64 {
    10
}

fn default_pre_tag() -> String {
    "<em>".to_string()
}

fn default_post_tag() -> String {
    "</em>".to_string()
}

/// Collection (index) names and field layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    /// People-records collection
    #[serde(default = "default_people_collection")]
    pub people: String,

    /// Article-records collection
    #[serde(default = "default_articles_collection")]
    pub articles: String,

    /// Article field holding the author's record id
    #[serde(default = "default_author_field")]
    pub author_field: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            people: default_people_collection(),
            articles: default_articles_collection(),
            author_field: default_author_field(),
        }
    }
}

fn default_people_collection() -> String {
    "authors".to_string()
}

fn default_articles_collection() -> String {
    "news".to_string()
}

fn default_author_field() -> String {
    "authorID".to_string()
}

/// Ranking and sizing knobs for the federated search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Weight of non-best field scores in multi-field matches
    #[serde(default = "default_tie_breaker")]
    pub tie_breaker: f64,

    /// Additive boost weight for articles by the resolved author
    #[serde(default = "default_author_boost")]
    pub author_boost: f64,

    /// Top-N people returned per search
    #[serde(default = "default_people_limit")]
    pub people_limit: usize,

    /// Top-N articles returned per search
    #[serde(default = "default_article_limit")]
    pub article_limit: usize,

    /// Overall deadline for one federated search, in milliseconds
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tie_breaker: default_tie_breaker(),
            author_boost: default_author_boost(),
            people_limit: default_people_limit(),
            article_limit: default_article_limit(),
            timeout_ms: default_search_timeout_ms(),
        }
    }
}

fn default_tie_breaker() -> f64 {
    0.3
}

fn default_author_boost() -> f64 {
    2.0
}

fn default_people_limit() -> usize {
    10
}

fn default_article_limit() -> usize {
    1000
}

fn default_search_timeout_ms() -> u64 {
    5000
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_http_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Reject searches that carry no `username`
    #[serde(default)]
    pub require_username: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            require_username: false,
        }
    }
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Level for file logs: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory (relative paths resolve against the working directory)
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Log file name prefix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Rotation: minutely, hourly, daily, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: true,
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_file_prefix() -> String {
    "kindsearch.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from `kindsearch.toml` in `root`, falling back to
    /// defaults when the file is absent. Environment overrides are applied last.
    pub fn load(root: &Path) -> Result<Self> {
        let mut config = Self::load_file(&Self::config_path(root))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        let mut config = Self::load_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `kindsearch.toml` in `root`
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_path = Self::config_path(root);

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Path of the config file inside `root`
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_ELASTICSEARCH_URL).ok(),
            std::env::var(ENV_PORT).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, port: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.gateway.url = url;
        }

        if let Some(port) = port {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid {} override", ENV_PORT),
            }
        }
    }
}
