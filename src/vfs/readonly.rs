/*!
 * Readonly Attribute Store
 * Persisted overlay of paths marked read-only, independent of host
 * permission bits
 */

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::types::{VfsError, VfsResult};

/// Persisted set of virtual paths marked read-only.
///
/// Backed by a small JSON document (a flat path list) that is loaded and
/// rewritten in full on every mutation. The read-modify-write cycle is the
/// one place requiring explicit mutual exclusion; all access goes through a
/// single per-process critical section.
#[derive(Debug)]
pub struct ReadonlyStore {
    store_path: PathBuf,
    lock: Mutex<()>,
}

impl ReadonlyStore {
    /// Open the store, creating an empty record on first use
    pub fn load_or_create<P: Into<PathBuf>>(store_path: P) -> VfsResult<Self> {
        let store_path = store_path.into();

        if !store_path.exists() {
            if let Some(parent) = store_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| VfsError::io(e, "create readonly store dir"))?;
            }
            fs::write(&store_path, "[]").map_err(|e| VfsError::io(e, "create readonly store"))?;
        }

        Ok(Self {
            store_path,
            lock: Mutex::new(()),
        })
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// Pure query against the persisted set
    pub fn is_readonly(&self, path: &str) -> VfsResult<bool> {
        let _guard = self.lock.lock();
        let list = self.read_list()?;
        Ok(list.iter().any(|p| p == path))
    }

    /// Idempotent add/remove. The full set is written back on every
    /// mutating call; no partial updates.
    pub fn set_readonly(&self, path: &str, readonly: bool) -> VfsResult<()> {
        let _guard = self.lock.lock();
        let mut list = self.read_list()?;

        let position = list.iter().position(|p| p == path);
        let changed = match (readonly, position) {
            (true, None) => {
                list.push(path.to_string());
                true
            }
            (false, Some(index)) => {
                list.remove(index);
                true
            }
            _ => false,
        };

        if changed {
            self.write_list(&list)?;
        }
        Ok(())
    }

    /// Delete the backing document; safe when it never existed
    pub fn erase(&self) -> VfsResult<()> {
        let _guard = self.lock.lock();
        match fs::remove_file(&self.store_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VfsError::io(e, "erase readonly store")),
        }
    }

    // A corrupt or unreadable record is an error, never silently treated
    // as all read-write or all read-only.
    fn read_list(&self) -> VfsResult<Vec<String>> {
        let raw = fs::read_to_string(&self.store_path)
            .map_err(|e| VfsError::StoreCorruption(format!("read: {e}")))?;
        serde_json::from_str(&raw).map_err(|e| VfsError::StoreCorruption(format!("parse: {e}")))
    }

    fn write_list(&self, list: &[String]) -> VfsResult<()> {
        let raw = serde_json::to_string_pretty(list)
            .map_err(|e| VfsError::StoreCorruption(format!("serialize: {e}")))?;
        fs::write(&self.store_path, raw).map_err(|e| VfsError::io(e, "write readonly store"))
    }
}
