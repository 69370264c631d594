//! Shutdown signal plumbing.

use std::future::Future;

use tokio::sync::watch;
use tracing::{info, warn};

/// Spawn a task that flips the returned receiver to `true` once `signal`
/// resolves.
///
/// If the signal cannot be awaited, the sender is kept alive forever so the
/// receiver never reports a change and the daemon runs until input ends.
pub fn spawn_shutdown_signal<F>(signal: F) -> watch::Receiver<bool>
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal.await {
            Ok(()) => {
                info!("shutdown signal received");
                let _ = tx.send(true);
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
                drop(tx);
            }
        }
    });
    rx
}
