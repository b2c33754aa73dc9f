use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;

use crate::cache::ArtifactCache;
use crate::config::{CacheConfig, StorageConfig};
use crate::digest::{self, Algorithm};
use crate::error::{BootstrapError, ConfigError};
use crate::fileserver;
use crate::manager::ClusterManager;
use crate::recorder::Recorders;
use crate::resolver::determine_advertised_address;
use crate::storage::Storage;

pub const CONTROLLER_NAME: &str = "rkdist-controller";
pub const DEFAULT_FILE_SERVER_PORT: u16 = 9090;

/// Everything a reconciler receives from the bootstrap phase.
#[derive(Clone)]
pub struct ReconcilerContext {
    pub storage: Arc<Storage>,
    pub cache: Option<ArtifactCache>,
    pub cache_ttl: Option<Duration>,
    pub recorders: Recorders,
}

/// Contract for the reconcilers registered at bootstrap. Their
/// reconciliation logic is opaque here; bootstrap only hands them the
/// storage and cache handles and reports setup failures to its caller.
#[async_trait]
pub trait Reconciler: Send + Sync + 'static {
    /// Name used for identifying the reconciler.
    fn name(&self) -> &'static str;

    /// One-time setup with the shared handles. Runs to completion
    /// before the file server is spawned.
    async fn setup(&self, ctx: ReconcilerContext) -> anyhow::Result<()>;
}

/// Bootstrap-facing view of the daemon configuration.
pub struct DistAdapter {
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub file_server_port: u16,
    pub recorders: Recorders,
}

impl DistAdapter {
    /// Bind address of the artifact file server. Port 0 falls back to
    /// the default; the daemon always binds all interfaces and relies
    /// on the resolver for the advertised name.
    pub fn file_server_address(&self) -> String {
        let port = if self.file_server_port == 0 {
            DEFAULT_FILE_SERVER_PORT
        } else {
            self.file_server_port
        };
        format!("0.0.0.0:{port}")
    }
}

/// Builds the storage handle. An empty advertise override is resolved
/// from the bind address, so callers must pass one in host:port form.
/// A digest algorithm other than the compiled-in default also pins the
/// process-wide canonical algorithm, exactly once.
pub fn init_storage(cfg: &StorageConfig, bind_address: &str) -> Result<Storage, ConfigError> {
    let advertised_address = if cfg.advertise_address.is_empty() {
        determine_advertised_address(bind_address)?
    } else {
        cfg.advertise_address.clone()
    };

    let algorithm = if cfg.digest_algorithm != digest::CANONICAL_DEFAULT.as_str() {
        let algorithm = Algorithm::from_name(&cfg.digest_algorithm)?;
        digest::set_canonical(algorithm);
        algorithm
    } else {
        digest::CANONICAL_DEFAULT
    };

    Storage::new(
        &cfg.path,
        advertised_address,
        cfg.retention_ttl,
        cfg.retention_records,
        algorithm,
    )
    .map_err(ConfigError::Storage)
}

/// Builds the repository index cache, or disables caching when the
/// configured size is not positive. The returned TTL is applied by
/// callers per item, not by the cache itself; `None` means disabled.
pub fn init_cache(
    cfg: &CacheConfig,
) -> Result<(Option<ArtifactCache>, Option<Duration>), ConfigError> {
    if cfg.max_size <= 0 {
        info!(target: "rkdist::bootstrap", "caching of repository index files is disabled");
        return Ok((None, None));
    }

    let purge_interval = humantime::parse_duration(&cfg.purge_interval).map_err(|source| {
        ConfigError::InvalidDuration {
            field: "cache purge interval",
            source,
        }
    })?;
    let item_ttl = humantime::parse_duration(&cfg.item_ttl).map_err(|source| {
        ConfigError::InvalidDuration {
            field: "cache item TTL",
            source,
        }
    })?;

    let cache = ArtifactCache::new(cfg.max_size as u64, purge_interval);
    Ok((Some(cache), Some(item_ttl)))
}

/// Bootstrap entry point: constructs storage and cache, registers each
/// reconciler with the shared handles, then spawns the leader-gated
/// file server. Registration runs to completion before the server is
/// spawned, so a failed registration never leaves a listener behind.
pub async fn setup_reconcilers(
    manager: &ClusterManager,
    adapter: DistAdapter,
    reconcilers: &[Arc<dyn Reconciler>],
) -> Result<Arc<Storage>, BootstrapError> {
    let bind_address = adapter.file_server_address();
    let storage = Arc::new(init_storage(&adapter.storage, &bind_address)?);
    let (cache, cache_ttl) = init_cache(&adapter.cache)?;

    for reconciler in reconcilers {
        let ctx = ReconcilerContext {
            storage: storage.clone(),
            cache: cache.clone(),
            cache_ttl,
            recorders: adapter.recorders.clone(),
        };
        reconciler
            .setup(ctx)
            .await
            .map_err(|source| BootstrapError::Registration {
                name: reconciler.name(),
                source,
            })?;
        info!(
            target: "rkdist::bootstrap",
            "registered reconciler {}",
            reconciler.name()
        );
    }

    fileserver::spawn_file_server(storage.clone(), bind_address, manager.elected());

    Ok(storage)
}
