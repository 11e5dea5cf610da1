/*!
 * Change Watcher
 * Recursive host-filesystem observer that emits cache invalidations keyed
 * by virtual path
 */

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::paths::SandboxRoot;
use super::types::{CacheInvalidation, VfsError, VfsResult};

/// Default broadcast buffer; a slow consumer drops old invalidations rather
/// than blocking the watcher (at-least-once, not exactly-once).
const EVENT_BUFFER: usize = 1024;

/// Observes the sandbox root recursively and broadcasts one
/// [`CacheInvalidation`] per reported path, normalized back to a virtual
/// path before emission.
///
/// The underlying notification callback is reentrant-safe and never
/// propagates a failure: a path that cannot be normalized is warned about
/// and dropped, so one bad event cannot kill the watcher.
pub struct ChangeWatcher {
    watcher: Mutex<Option<RecommendedWatcher>>,
    root: PathBuf,
    sender: broadcast::Sender<CacheInvalidation>,
}

impl ChangeWatcher {
    /// Start watching the sandbox root for the lifetime of the adapter
    pub fn spawn(sandbox: SandboxRoot) -> VfsResult<Self> {
        let root = sandbox.path().to_path_buf();
        let (sender, _) = broadcast::channel(EVENT_BUFFER);

        let emit_sender = sender.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    let created = matches!(event.kind, EventKind::Create(_));
                    for path in &event.paths {
                        emit(&sandbox, &emit_sender, path);
                        // The platform watch for a freshly created directory
                        // is installed after entries may already have landed
                        // inside it; sweep the subtree so those entries get
                        // invalidations too.
                        if created && path.is_dir() {
                            emit_subtree(&sandbox, &emit_sender, path);
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "filesystem watch error, event dropped");
                }
            }
        })
        .map_err(|e| VfsError::IoError(format!("start watcher: {e}")))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| VfsError::IoError(format!("watch {}: {e}", root.display())))?;

        debug!(root = %root.display(), "change watcher started");

        Ok(Self {
            watcher: Mutex::new(Some(watcher)),
            root,
            sender,
        })
    }

    /// Subscribe to future invalidation events
    pub fn subscribe(&self) -> broadcast::Receiver<CacheInvalidation> {
        self.sender.subscribe()
    }

    /// Stop observing. Idempotent; safe to call during teardown and again
    /// from `erase_all`.
    pub fn stop(&self) {
        if let Some(mut watcher) = self.watcher.lock().take() {
            if let Err(e) = watcher.unwatch(&self.root) {
                debug!(error = %e, "unwatch on stop");
            }
            debug!(root = %self.root.display(), "change watcher stopped");
        }
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn emit(sandbox: &SandboxRoot, sender: &broadcast::Sender<CacheInvalidation>, path: &Path) {
    match sandbox.to_virtual(path) {
        Some(virtual_path) => {
            // No subscribers is fine; the send result only reports that
            // nobody is listening.
            let _ = sender.send(CacheInvalidation { virtual_path });
        }
        None => {
            warn!(path = %path.display(), "change event outside sandbox root, dropped");
        }
    }
}

fn emit_subtree(sandbox: &SandboxRoot, sender: &broadcast::Sender<CacheInvalidation>, dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // Directory may already be gone again; nothing to invalidate
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        emit(sandbox, sender, &path);
        if path.is_dir() {
            emit_subtree(sandbox, sender, &path);
        }
    }
}
