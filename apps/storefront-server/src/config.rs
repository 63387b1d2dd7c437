use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use storefront::StorefrontConfig;
use storefront_db::ConnectOpts;

/// Environment variables with this prefix override file values;
/// `__` separates nesting levels (`STOREFRONT__SERVER__BIND_ADDR`).
pub const ENV_PREFIX: &str = "STOREFRONT__";

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub storefront: StorefrontConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Requests running longer than this are answered with 504.
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
    /// Path the storefront resources are mounted under. Empty mounts them at the root.
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
            request_timeout_secs: 30,
            body_limit_bytes: 1024 * 1024,
            api_prefix: "/api".to_owned(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub sqlx_logging: bool,
    /// Apply pending migrations before serving.
    pub migrate_on_start: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://storefront.db?mode=rwc".to_owned(),
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout_secs: Some(5),
            sqlx_logging: false,
            migrate_on_start: true,
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn connect_opts(&self) -> ConnectOpts {
        ConnectOpts {
            max_conns: self.max_conns,
            min_conns: self.min_conns,
            acquire_timeout: self.acquire_timeout_secs.map(Duration::from_secs),
            sqlx_logging: self.sqlx_logging,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Layer defaults, the optional YAML file and `STOREFRONT__*` variables.
#[must_use]
pub fn figment(path: Option<&Path>) -> Figment {
    let mut fig = Figment::from(Serialized::defaults(AppConfig::default()));
    if let Some(path) = path {
        fig = fig.merge(Yaml::file(path));
    }
    fig.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load the configuration.
///
/// # Errors
/// Fails if `path` does not exist, a value has the wrong type, or a key is unknown.
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(path) = path
        && !path.is_file()
    {
        bail!("config file {} does not exist", path.display());
    }
    let cfg: AppConfig = figment(path)
        .extract()
        .context("invalid configuration")?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    let sf = &cfg.storefront;
    if sf.default_page_size == 0 || sf.max_page_size == 0 {
        bail!("storefront page sizes must be positive");
    }
    if sf.default_page_size > sf.max_page_size {
        bail!(
            "storefront.default_page_size ({}) exceeds max_page_size ({})",
            sf.default_page_size,
            sf.max_page_size
        );
    }
    if cfg.database.dsn.trim().is_empty() {
        bail!("database.dsn must not be empty");
    }
    Ok(())
}
