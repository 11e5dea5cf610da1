/*!
 * External Spawn Registry
 * Awaitable handles for host programs spawned on behalf of the virtual OS
 */

use std::time::Duration;

use parking_lot::Mutex;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default grace period for outstanding host programs at shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Tracks host programs spawned by "open external resource" operations so
/// shutdown can wait for them instead of racing their pipes.
///
/// Each spawn is an explicit awaitable handle rather than fire-and-forget;
/// `shutdown` performs a bounded-timeout join over everything still
/// outstanding and proceeds with a warning once the deadline passes.
#[derive(Default)]
pub struct SpawnRegistry {
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl SpawnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a path or URL with the platform opener and track the child
    /// until it exits.
    pub fn open_external(&self, target: &str) -> std::io::Result<()> {
        let mut command = platform_opener(target);
        let mut child = command.spawn()?;
        debug!(target, "spawned external opener");

        let target = target.to_string();
        let handle = tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(target, %status, "external opener exited"),
                Err(e) => warn!(target, error = %e, "failed waiting on external opener"),
            }
        });
        self.pending.lock().push(handle);
        Ok(())
    }

    /// Number of children not yet known to have exited
    pub fn outstanding(&self) -> usize {
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        pending.len()
    }

    /// Join all outstanding children, bounded by `timeout`. On expiry the
    /// shutdown proceeds anyway and a warning is surfaced.
    pub async fn shutdown(&self, timeout: Duration) {
        let pending: Vec<_> = std::mem::take(&mut *self.pending.lock());
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        let joined = tokio::time::timeout(timeout, futures::future::join_all(pending)).await;
        match joined {
            Ok(_) => debug!(count, "all external programs finished"),
            Err(_) => warn!(
                count,
                timeout_secs = timeout.as_secs(),
                "external programs still running at shutdown, proceeding"
            ),
        }
    }
}

fn platform_opener(target: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(target);
        c
    } else if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", target]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(target);
        c
    }
}
