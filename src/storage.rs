use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::digest::Algorithm;

/// Handle to the local artifact storage area. Created once during
/// bootstrap and shared read-only with the file server and every
/// reconciler for the remainder of the process lifetime.
#[derive(Debug)]
pub struct Storage {
    base_path: PathBuf,
    advertised_address: String,
    retention_ttl: Duration,
    retention_records: usize,
    algorithm: Algorithm,
}

impl Storage {
    /// Creates the storage root if needed and returns the handle. A
    /// root that cannot be created or is not a directory is a
    /// construction failure.
    pub fn new<P: AsRef<Path>>(
        path: P,
        advertised_address: String,
        retention_ttl: Duration,
        retention_records: usize,
        algorithm: Algorithm,
    ) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).with_context(|| {
            format!("Failed to create storage root {}", base_path.display())
        })?;
        let meta = fs::metadata(&base_path).with_context(|| {
            format!("Failed to stat storage root {}", base_path.display())
        })?;
        if !meta.is_dir() {
            bail!("storage root {} is not a directory", base_path.display());
        }

        Ok(Self {
            base_path,
            advertised_address,
            retention_ttl,
            retention_records,
            algorithm,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The host:port remote clients use to reach the file server.
    pub fn advertised_address(&self) -> &str {
        &self.advertised_address
    }

    pub fn retention_ttl(&self) -> Duration {
        self.retention_ttl
    }

    pub fn retention_records(&self) -> usize {
        self.retention_records
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Absolute path of an artifact below the storage root.
    pub fn local_path(&self, relative: &str) -> PathBuf {
        self.base_path.join(relative.trim_start_matches('/'))
    }

    /// URL remote clients fetch an artifact from.
    pub fn artifact_url(&self, relative: &str) -> String {
        format!(
            "http://{}/{}",
            self.advertised_address,
            relative.trim_start_matches('/')
        )
    }

    /// Digest of a stored artifact in `<algorithm>:<hex>` form, using
    /// the algorithm this storage was configured with.
    pub fn digest_of<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let hex = self.algorithm.digest_file(path)?;
        Ok(format!("{}:{hex}", self.algorithm))
    }
}
