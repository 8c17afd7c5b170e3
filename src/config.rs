use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub embedding: EmbeddingSettings,
    pub fallback: FallbackSettings,
    pub ranking: RankingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which embedding model the embedder loads on first use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Hashed,
    Remote,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_backend")]
    pub backend: EmbeddingBackend,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub remote: Option<RemoteEmbeddingSettings>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            dimension: default_dimension(),
            cache_capacity: default_cache_capacity(),
            timeout_ms: default_timeout_ms(),
            remote: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEmbeddingSettings {
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_backend() -> EmbeddingBackend {
    EmbeddingBackend::Hashed
}
fn default_dimension() -> usize {
    384
}
fn default_cache_capacity() -> u64 {
    100_000
}
fn default_timeout_ms() -> u64 {
    2_000
}

/// Where synthetic fallback profiles are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStoreKind {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FallbackSettings {
    #[serde(default = "default_store")]
    pub store: PoolStoreKind,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            store: default_store(),
            redis_url: None,
            key_prefix: default_key_prefix(),
            seed: None,
        }
    }
}

fn default_store() -> PoolStoreKind {
    PoolStoreKind::Memory
}
fn default_key_prefix() -> String {
    "fallback:profiles".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_scoring_concurrency")]
    pub scoring_concurrency: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            scoring_concurrency: default_scoring_concurrency(),
        }
    }
}

fn default_scoring_concurrency() -> usize {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration file (config/default.toml)
    /// 3. Local configuration file (config/local.toml)
    /// 4. Environment variables (prefixed with KINDRED__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., KINDRED__EMBEDDING__TIMEOUT_MS -> embedding.timeout_ms
            .add_source(
                Environment::with_prefix("KINDRED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = with_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("KINDRED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("embedding.backend", "hashed")?
        .set_default("fallback.store", "memory")?
        .set_default(
            "ranking.scoring_concurrency",
            default_scoring_concurrency() as u64,
        )?
        .set_default("logging.level", default_log_level())?
        .set_default("logging.format", default_log_format())
}

/// Apply un-prefixed overrides commonly set by deployment tooling
///
/// `REDIS_URL` feeds the fallback pool store and `EMBEDDING_API_KEY` the
/// remote embedding model.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let redis_url = env::var("REDIS_URL").ok();
    // only meaningful once a remote endpoint is configured
    let embedding_api_key = env::var("EMBEDDING_API_KEY")
        .ok()
        .filter(|_| settings.get_string("embedding.remote.endpoint").is_ok());

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = redis_url {
        builder = builder.set_override("fallback.redis_url", url)?;
    }
    if let Some(api_key) = embedding_api_key {
        builder = builder.set_override("embedding.remote.api_key", api_key)?;
    }

    builder.build()
}
