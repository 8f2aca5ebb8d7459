use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Allow the card to be fetched from any origin
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub card: CardSettings,
}

/// Connection settings for the GitHub GraphQL API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Card rendering knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSettings {
    /// Max-age advertised in Cache-Control, in seconds
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,

    #[serde(default = "default_window_days")]
    pub window_days: usize,

    #[serde(default = "default_top_languages")]
    pub top_languages: usize,

    /// Extra fonts for PNG output
    #[serde(default)]
    pub font_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_enable_cors() -> bool {
    true
}

fn default_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_user_agent() -> String {
    concat!("streak-backend/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_max_age_secs() -> u64 {
    4 * 60 * 60
}

fn default_window_days() -> usize {
    crate::module::stats::DEFAULT_WINDOW_DAYS
}

fn default_top_languages() -> usize {
    crate::module::stats::DEFAULT_TOP_LANGUAGES
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            enable_cors: default_enable_cors(),
            github: GitHubConfig::default(),
            card: CardSettings::default(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            cache_max_age_secs: default_cache_max_age_secs(),
            window_days: default_window_days(),
            top_languages: default_top_languages(),
            font_dir: None,
        }
    }
}

impl CardSettings {
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age_secs)
    }
}

impl BackendConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: BackendConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
