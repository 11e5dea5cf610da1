/*!
 * Path Sandboxer
 * Confines virtual path resolution to a single host root directory
 */

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use super::types::{VfsError, VfsResult};

/// Resolves virtual paths against a sandbox root.
///
/// A virtual path is `/`-rooted and forward-slash; its resolution must be
/// the root itself or lie strictly beneath it. The prefix check runs on the
/// normalized result, not the raw input, since naive string checks are
/// bypassable via `..` segments.
#[derive(Debug, Clone)]
pub struct SandboxRoot {
    root: PathBuf,
}

impl SandboxRoot {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into().clean(),
        }
    }

    /// The host directory all resolutions are confined to
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a virtual path into a host path.
    ///
    /// Backslashes are treated as separators regardless of host (a virtual
    /// path carries no host-specific bytes), then leading separators are
    /// stripped, the remainder joined against the root, lexically
    /// normalized, and the result verified to never have left the root.
    /// The root itself is a valid resolution (listing `/`).
    pub fn resolve(&self, virtual_path: &str) -> VfsResult<PathBuf> {
        let forward = virtual_path.replace('\\', "/");
        let stripped = forward.trim_start_matches('/');
        let resolved = self.root.join(stripped).clean();

        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(VfsError::PathTraversal(virtual_path.to_string()))
        }
    }

    /// Map a host path under the root back to its virtual path.
    ///
    /// Host separators become forward slashes and the result is re-rooted.
    /// Returns None for paths outside the sandbox.
    pub fn to_virtual(&self, host_path: &Path) -> Option<String> {
        let relative = host_path.strip_prefix(&self.root).ok()?;

        let mut virtual_path = String::from("/");
        for (i, component) in relative.components().enumerate() {
            if i > 0 {
                virtual_path.push('/');
            }
            virtual_path.push_str(&component.as_os_str().to_string_lossy().replace('\\', "/"));
        }
        Some(virtual_path)
    }
}
