use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;

use rkdist::bootstrap::{self, DistAdapter};
use rkdist::config::{CacheConfig, StorageConfig};
use rkdist::manager::ClusterManager;
use rkdist::recorder::Recorders;

const PORT: u16 = 19321;

fn test_adapter(root: std::path::PathBuf) -> DistAdapter {
    DistAdapter {
        storage: StorageConfig {
            path: root,
            advertise_address: String::new(),
            retention_ttl: Duration::from_secs(60),
            retention_records: 2,
            digest_algorithm: "sha256".to_string(),
        },
        cache: CacheConfig {
            max_size: 0,
            item_ttl: "15m".to_string(),
            purge_interval: "1m".to_string(),
        },
        file_server_port: PORT,
        recorders: Recorders::default(),
    }
}

/// Polls until the file server accepts requests or the deadline passes.
async fn get_with_retry(url: &str, timeout: Duration) -> Result<reqwest::Response> {
    let deadline = Instant::now() + timeout;
    loop {
        match reqwest::get(url).await {
            Ok(resp) => return Ok(resp),
            Err(err) => {
                if Instant::now() > deadline {
                    anyhow::bail!("file server did not come up at {url}: {err:?}");
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn serves_storage_tree_after_election() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("podinfo"))?;
    std::fs::write(
        dir.path().join("podinfo/artifact.tar.gz"),
        b"artifact bytes",
    )?;

    let manager = ClusterManager::new();
    bootstrap::setup_reconcilers(&manager, test_adapter(dir.path().to_path_buf()), &[]).await?;

    manager.grant_leadership();
    // a second fire is a no-op
    manager.grant_leadership();

    let resp = get_with_retry(
        &format!("http://127.0.0.1:{PORT}/podinfo/artifact.tar.gz"),
        Duration::from_secs(5),
    )
    .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.bytes().await?.as_ref(), b"artifact bytes");

    let resp = reqwest::get(format!("http://127.0.0.1:{PORT}/podinfo/missing.tar.gz")).await?;
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}
