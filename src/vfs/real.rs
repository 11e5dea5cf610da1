/*!
 * Real Filesystem Backend
 * Sandboxed host-filesystem implementation of the virtual filesystem
 * contract
 */

use std::fs;
use std::path::Path;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::HostConfig;

use super::paths::SandboxRoot;
use super::readonly::ReadonlyStore;
use super::traits::FileSystem;
use super::types::*;
use super::watcher::ChangeWatcher;

/// Host-backed filesystem confined to a sandbox root.
///
/// Every path-taking operation resolves through the [`SandboxRoot`] first;
/// a traversal attempt aborts before any host syscall. Mutations rely on
/// the [`ChangeWatcher`] for downstream cache invalidation rather than
/// invalidating synchronously, so external edits and the adapter's own
/// writes take the same path to the cache layer.
pub struct RealFS {
    sandbox: SandboxRoot,
    readonly: ReadonlyStore,
    watcher: ChangeWatcher,
}

impl RealFS {
    /// Open (or initialize) the sandbox described by `config` and start
    /// watching it.
    pub fn new(config: &HostConfig) -> VfsResult<Self> {
        let root = config.sandbox_root();
        fs::create_dir_all(&root).map_err(|e| VfsError::io(e, "create sandbox root"))?;

        let sandbox = SandboxRoot::new(&root);
        let readonly = ReadonlyStore::load_or_create(config.readonly_store_path())?;
        let watcher = ChangeWatcher::spawn(sandbox.clone())?;

        info!(root = %root.display(), "real filesystem ready");

        Ok(Self {
            sandbox,
            readonly,
            watcher,
        })
    }

    /// Subscribe to cache invalidation events for the sandbox subtree
    pub fn subscribe(&self) -> broadcast::Receiver<CacheInvalidation> {
        self.watcher.subscribe()
    }

    // lstat-style probe: does not follow a dangling symlink into NotFound
    fn stat(path: &Path) -> Option<fs::Metadata> {
        fs::symlink_metadata(path).ok()
    }

    fn require_file(&self, virtual_path: &str) -> VfsResult<std::path::PathBuf> {
        let host = self.sandbox.resolve(virtual_path)?;
        match Self::stat(&host) {
            Some(md) if md.is_file() => Ok(host),
            _ => Err(VfsError::NotFound(virtual_path.to_string())),
        }
    }

    fn require_dir(&self, virtual_path: &str) -> VfsResult<std::path::PathBuf> {
        let host = self.sandbox.resolve(virtual_path)?;
        match Self::stat(&host) {
            Some(md) if md.is_dir() => Ok(host),
            _ => Err(VfsError::NotFound(virtual_path.to_string())),
        }
    }
}

impl FileSystem for RealFS {
    fn fs_type_name(&self) -> &str {
        "real"
    }

    fn ready(&self) -> VfsResult<()> {
        if !self.sandbox.path().is_dir() {
            return Err(VfsError::NotFound(
                self.sandbox.path().display().to_string(),
            ));
        }
        // Surfaces StoreCorruption early instead of on first query
        self.readonly.is_readonly("/")?;
        Ok(())
    }

    fn make_dir(&self, path: &str) -> VfsResult<()> {
        let host = self.sandbox.resolve(path)?;
        if host.exists() {
            return Ok(());
        }
        fs::create_dir_all(&host).map_err(|e| VfsError::io(e, format!("make_dir {path}")))
    }

    fn list_dir(&self, path: &str, dirs_first: bool) -> VfsResult<Vec<Entry>> {
        let host = self.require_dir(path)?;

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        let entries =
            fs::read_dir(&host).map_err(|e| VfsError::io(e, format!("list_dir {path}")))?;
        for entry in entries {
            let entry = entry.map_err(|e| VfsError::io(e, format!("list_dir {path}")))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry
                .file_type()
                .map_err(|e| VfsError::io(e, format!("stat {name}")))?;
            if file_type.is_dir() {
                dirs.push(Entry::new(name, FileType::Directory));
            } else {
                files.push(Entry::new(name, FileType::File));
            }
        }

        // Partitioned output; order within a partition is host-default
        let mut result = Vec::with_capacity(files.len() + dirs.len());
        if dirs_first {
            result.extend(dirs);
            result.extend(files);
        } else {
            result.extend(files);
            result.extend(dirs);
        }
        Ok(result)
    }

    fn read_file(&self, path: &str, as_binary: bool) -> VfsResult<FileData> {
        let host = self.require_file(path)?;
        let data = fs::read(&host).map_err(|e| VfsError::io(e, format!("read_file {path}")))?;
        if as_binary {
            Ok(FileData::Binary(data))
        } else {
            Ok(FileData::Text(String::from_utf8_lossy(&data).into_owned()))
        }
    }

    fn write_file(&self, path: &str, data: &[u8]) -> VfsResult<()> {
        let host = self.sandbox.resolve(path)?;
        if let Some(parent) = host.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VfsError::io(e, format!("create parent dirs for {path}")))?;
        }
        fs::write(&host, data).map_err(|e| VfsError::io(e, format!("write_file {path}")))
    }

    fn delete_file(&self, path: &str) -> VfsResult<()> {
        let host = self.require_file(path)?;
        fs::remove_file(&host).map_err(|e| VfsError::io(e, format!("delete_file {path}")))
    }

    fn delete_dir(&self, path: &str, recursive: bool) -> VfsResult<()> {
        let host = self.require_dir(path)?;

        if recursive {
            return fs::remove_dir_all(&host)
                .map_err(|e| VfsError::io(e, format!("delete_dir {path}")));
        }

        let occupied = fs::read_dir(&host)
            .map_err(|e| VfsError::io(e, format!("delete_dir {path}")))?
            .next()
            .is_some();
        if occupied {
            return Err(VfsError::NonRecursiveDirectory(path.to_string()));
        }
        fs::remove_dir(&host).map_err(|e| VfsError::io(e, format!("delete_dir {path}")))
    }

    fn move_file(&self, src: &str, dest: &str) -> VfsResult<()> {
        let src_host = self.require_file(src)?;
        let dest_host = self.sandbox.resolve(dest)?;

        if let Some(parent) = dest_host.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VfsError::io(e, format!("create parent dirs for {dest}")))?;
        }
        fs::rename(&src_host, &dest_host)
            .map_err(|e| VfsError::io(e, format!("move_file {src} -> {dest}")))
    }

    fn move_dir(&self, src: &str, dest: &str, move_inside: bool) -> VfsResult<()> {
        let src_host = self.require_dir(src)?;
        let dest_host = self.sandbox.resolve(dest)?;

        // move_inside treats dest as the new parent; the source keeps its
        // own name under it. Otherwise dest is the exact target.
        let target = if move_inside {
            let name = src_host
                .file_name()
                .ok_or_else(|| VfsError::PathTraversal(src.to_string()))?;
            dest_host.join(name)
        } else {
            dest_host
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VfsError::io(e, format!("create parent dirs for {dest}")))?;
        }
        fs::rename(&src_host, &target)
            .map_err(|e| VfsError::io(e, format!("move_dir {src} -> {dest}")))
    }

    fn exists(&self, path: &str) -> VfsResult<bool> {
        let host = self.sandbox.resolve(path)?;
        Ok(Self::stat(&host).is_some())
    }

    fn dir_exists(&self, path: &str) -> VfsResult<bool> {
        let host = self.sandbox.resolve(path)?;
        Ok(Self::stat(&host).map(|md| md.is_dir()).unwrap_or(false))
    }

    fn is_readonly(&self, path: &str) -> VfsResult<bool> {
        self.readonly.is_readonly(path)
    }

    fn set_readonly(&self, path: &str, readonly: bool) -> VfsResult<()> {
        self.readonly.set_readonly(path, readonly)
    }

    fn erase_all(&self) -> VfsResult<()> {
        debug!("erasing sandbox");
        self.watcher.stop();

        match fs::remove_dir_all(self.sandbox.path()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(VfsError::io(e, "erase sandbox root")),
        }

        self.readonly.erase()
    }
}
