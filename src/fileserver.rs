use std::sync::Arc;

use axum::Router;
use log::{error, info};
use tower_http::services::ServeDir;

use crate::manager::ElectedSignal;
use crate::storage::Storage;

/// Spawns the artifact file server as a background task and returns
/// immediately. The task stays parked until the leadership signal
/// fires, so only the elected leader ever binds the listener; replicas
/// with stale local storage never serve.
///
/// Bind and serve errors are logged and end the task. The surrounding
/// supervisor restarts the whole process if serving is essential.
pub fn spawn_file_server(storage: Arc<Storage>, address: String, elected: ElectedSignal) {
    tokio::spawn(async move {
        if let Err(err) = elected.wait().await {
            info!(
                target: "rkdist::fileserver",
                "leadership channel closed before election, not serving: {err:?}"
            );
            return;
        }

        serve(storage, &address).await;
    });
}

async fn serve(storage: Arc<Storage>, address: &str) {
    info!(
        target: "rkdist::fileserver",
        "starting file server for {} on {}",
        storage.base_path().display(),
        address
    );

    let app = Router::new().fallback_service(ServeDir::new(storage.base_path()));

    let listener = match tokio::net::TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(target: "rkdist::fileserver", "file server failed to bind {address}: {err:?}");
            return;
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        error!(target: "rkdist::fileserver", "file server error: {err:?}");
    }
}
