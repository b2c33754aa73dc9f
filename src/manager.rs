use anyhow::anyhow;
use tokio::sync::watch;

/// One-shot leadership signal handed out by the [`ClusterManager`].
/// Cloneable; every clone resolves once the process is elected leader.
#[derive(Clone)]
pub struct ElectedSignal {
    rx: watch::Receiver<bool>,
}

impl ElectedSignal {
    /// Waits until leadership is granted. The wait is unbounded; it
    /// fails only if the manager is dropped before an election.
    pub async fn wait(mut self) -> anyhow::Result<()> {
        self.rx
            .wait_for(|elected| *elected)
            .await
            .map(|_| ())
            .map_err(|_| anyhow!("cluster manager dropped before leadership was acquired"))
    }
}

/// Owns the leadership channel for this process. In a multi-replica
/// deployment `grant_leadership` is driven by the election mechanism;
/// a standalone daemon grants it to itself once bootstrap completes.
pub struct ClusterManager {
    elected_tx: watch::Sender<bool>,
}

impl ClusterManager {
    pub fn new() -> Self {
        let (elected_tx, _) = watch::channel(false);
        Self { elected_tx }
    }

    pub fn elected(&self) -> ElectedSignal {
        ElectedSignal {
            rx: self.elected_tx.subscribe(),
        }
    }

    /// Marks this process as elected leader. Firing a second time is a
    /// no-op; leadership is never revoked within a process lifetime.
    pub fn grant_leadership(&self) {
        self.elected_tx.send_if_modified(|elected| {
            if *elected {
                false
            } else {
                *elected = true;
                true
            }
        });
    }
}

impl Default for ClusterManager {
    fn default() -> Self {
        Self::new()
    }
}
