use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn config_ref() -> &'static Config {
    CONFIG.get().unwrap()
}

#[derive(Debug, Deserialize)]
pub struct Config {
    // artifact storage area
    pub storage: StorageConfig,
    // repository index cache, disabled by default
    #[serde(default)]
    pub cache: CacheConfig,
    // read-only artifact file server
    #[serde(default)]
    pub file_server: FileServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
    /// host:port to advertise to clients; empty means derive it from
    /// the bind address at bootstrap.
    #[serde(default)]
    pub advertise_address: String,
    #[serde(default = "default_retention_ttl")]
    #[serde(with = "humantime_serde")]
    pub retention_ttl: Duration,
    #[serde(default = "default_retention_records")]
    pub retention_records: usize,
    #[serde(default = "default_digest_algorithm")]
    pub digest_algorithm: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached index files; zero or negative disables
    /// caching entirely.
    #[serde(default)]
    pub max_size: i64,
    #[serde(default = "default_cache_item_ttl")]
    pub item_ttl: String,
    #[serde(default = "default_cache_purge_interval")]
    pub purge_interval: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 0,
            item_ttl: default_cache_item_ttl(),
            purge_interval: default_cache_purge_interval(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileServerConfig {
    /// File server port; zero falls back to the default at bootstrap.
    #[serde(default)]
    pub port: u16,
}

fn default_retention_ttl() -> Duration {
    Duration::from_secs(60)
}

fn default_retention_records() -> usize {
    2
}

fn default_digest_algorithm() -> String {
    "sha256".to_string()
}

fn default_cache_item_ttl() -> String {
    "15m".to_string()
}

fn default_cache_purge_interval() -> String {
    "1m".to_string()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<&'static Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&content).context("Failed to parse YAML config")?;
    Ok(CONFIG.get_or_init(|| cfg))
}

mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
