use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Redis instance used when `REDIS_URL` is not provided.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
/// Upper bound on a single extraction, including the upstream fetch.
pub const DEFAULT_EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);
/// Number of entries returned by the recent listing when the caller gives no limit.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was installed twice during process start.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the readability server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL of the Redis instance backing the article cache.
    pub redis_url: String,
    /// Prefix prepended to every Redis key, empty by default.
    pub cache_key_prefix: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Deadline applied to each extraction.
    pub extract_timeout: Duration,
    /// Optional expiry for cached articles; `None` keeps them indefinitely.
    pub article_ttl: Option<Duration>,
    /// Default size of the recent and popular listings.
    pub recent_limit: usize,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            redis_url: load_env_optional("REDIS_URL")
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            cache_key_prefix: load_env_optional("CACHE_KEY_PREFIX").unwrap_or_default(),
            server_port: parse_optional("SERVER_PORT")?,
            extract_timeout: parse_optional::<u64>("EXTRACT_TIMEOUT_SECS")?
                .map(|secs| {
                    if secs == 0 {
                        Err(ConfigError::InvalidValue("EXTRACT_TIMEOUT_SECS".into()))
                    } else {
                        Ok(Duration::from_secs(secs))
                    }
                })
                .transpose()?
                .unwrap_or(DEFAULT_EXTRACT_TIMEOUT),
            article_ttl: parse_optional::<u64>("ARTICLE_TTL_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            recent_limit: parse_optional("RECENT_LIMIT")?.unwrap_or(DEFAULT_RECENT_LIMIT),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Read `.env` (when present) and build a configuration from the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    Config::from_env()
}

/// Install the configuration in the global cache and return a reference to it.
pub fn init_config(config: Config) -> Result<&'static Config, ConfigError> {
    tracing::debug!(
        server_port = ?config.server_port,
        key_prefix = %config.cache_key_prefix,
        extract_timeout = ?config.extract_timeout,
        article_ttl = ?config.article_ttl,
        recent_limit = config.recent_limit,
        "Loaded configuration"
    );
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    CONFIG.get().ok_or(ConfigError::AlreadyInitialized)
}

/// Default listing size, falling back to [`DEFAULT_RECENT_LIMIT`] before initialization.
pub fn recent_limit() -> usize {
    CONFIG
        .get()
        .map_or(DEFAULT_RECENT_LIMIT, |config| config.recent_limit)
}
