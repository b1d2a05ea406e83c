use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable naming an alternative TOML config file.
pub const CONFIG_PATH_ENV: &str = "ADS_CONSOLE_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "ads-console.toml";

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `ADS_CONSOLE__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub delete: DeleteConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteConfig {
    #[serde(default)]
    pub cascade: CascadeMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub seed_demo_data: bool,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Prometheus exporter port; disabled when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

/// Who is responsible for removing the dependents of a deleted entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// The backend removes dependents in the same call.
    #[default]
    Server,
    /// The client deletes dependent ads one by one before deleting a creative.
    Client,
}

impl CascadeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeMode::Server => "server",
            CascadeMode::Client => "client",
        }
    }
}

impl fmt::Display for CascadeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CascadeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(CascadeMode::Server),
            "client" => Ok(CascadeMode::Client),
            other => Err(format!("unknown cascade mode '{other}' (expected server or client)")),
        }
    }
}

// Default functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_session_path() -> PathBuf {
    PathBuf::from(".ads-console").join("session.json")
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_token_ttl_hours() -> i64 {
    24
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_demo_data: false,
            token_ttl_hours: default_token_ttl_hours(),
            metrics_port: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `ads-console.toml` (or the file named by
    /// `ADS_CONSOLE_CONFIG`) and `ADS_CONSOLE__*` environment variables.
    pub fn load() -> CoreResult<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("ADS_CONSOLE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(CoreError::Invalid(format!(
                "api.base_url must be an http(s) URL, got '{base}'"
            )));
        }
        if self.server.token_ttl_hours <= 0 {
            return Err(CoreError::Invalid(
                "server.token_ttl_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
