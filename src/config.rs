/*!
 * Host Configuration
 * Per-user application-data layout for the persisted sandbox
 */

use std::env;
use std::path::{Path, PathBuf};

/// Directory name under the per-user application-data root
const APP_DIR: &str = "vos";

/// Resolve the per-user application-data root for the current platform:
/// `%APPDATA%` on Windows, `~/Library/Application Support` on macOS,
/// `~/.config` elsewhere.
pub fn appdata_root() -> PathBuf {
    if let Ok(appdata) = env::var("APPDATA") {
        return PathBuf::from(appdata);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    if cfg!(target_os = "macos") {
        PathBuf::from(home).join("Library/Application Support")
    } else {
        PathBuf::from(home).join(".config")
    }
}

/// Host-side storage layout: a sandbox root holding the virtual
/// filesystem's tree verbatim, plus one sibling JSON document for the
/// readonly path list.
#[derive(Debug, Clone)]
pub struct HostConfig {
    data_dir: PathBuf,
}

impl HostConfig {
    /// Layout under the per-user application-data directory
    pub fn new() -> Self {
        Self {
            data_dir: appdata_root().join(APP_DIR),
        }
    }

    /// Layout under an explicit directory (tests, portable installs)
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The sandbox root all virtual paths resolve under
    pub fn sandbox_root(&self) -> PathBuf {
        self.data_dir.join("fs")
    }

    /// The persisted readonly path list, sibling of the sandbox root
    pub fn readonly_store_path(&self) -> PathBuf {
        self.data_dir.join("fs_readonly_list.json")
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}
