/*!
 * VFS Traits
 * The abstract filesystem contract consumed by the virtual OS
 */

use super::types::*;

/// Virtual filesystem contract.
///
/// The virtual OS kernel programs against exactly this method set; an
/// implementation must provide every method and must not grow extras.
/// Paths are virtual: `/`-rooted, forward-slash, independent of host
/// separators. Operations are synchronous from the caller's perspective;
/// callers that must not stall input delivery offload them to a blocking
/// task.
pub trait FileSystem: Send + Sync {
    /// Unique name identifying this filesystem implementation
    fn fs_type_name(&self) -> &str;

    /// Readiness probe: backing storage exists and is loadable
    fn ready(&self) -> VfsResult<()>;

    /// Create a directory, including intermediate directories.
    /// No-op if the directory already exists.
    fn make_dir(&self, path: &str) -> VfsResult<()>;

    /// List directory entries, partitioned into directories and files.
    /// `dirs_first` controls which partition comes first; order within a
    /// partition is host-default.
    fn list_dir(&self, path: &str, dirs_first: bool) -> VfsResult<Vec<Entry>>;

    /// Read entire file contents, decoded as text unless `as_binary`
    fn read_file(&self, path: &str, as_binary: bool) -> VfsResult<FileData>;

    /// Write entire file contents, creating parent directories as needed.
    /// Full overwrite; no partial-write recovery guarantee.
    fn write_file(&self, path: &str, data: &[u8]) -> VfsResult<()>;

    /// Delete a file
    fn delete_file(&self, path: &str) -> VfsResult<()>;

    /// Delete a directory. Fails with `NonRecursiveDirectory` if non-empty
    /// and `recursive` is false.
    fn delete_dir(&self, path: &str, recursive: bool) -> VfsResult<()>;

    /// Move/rename a file. Host-level rename; not guaranteed atomic across
    /// filesystem boundaries.
    fn move_file(&self, src: &str, dest: &str) -> VfsResult<()>;

    /// Move a directory. With `move_inside` the source is nested under
    /// `dest` (keeping its own name); otherwise `dest` is the exact target.
    fn move_dir(&self, src: &str, dest: &str, move_inside: bool) -> VfsResult<()>;

    /// Check if a path exists (file or directory)
    fn exists(&self, path: &str) -> VfsResult<bool>;

    /// Check if a path exists and is a directory
    fn dir_exists(&self, path: &str) -> VfsResult<bool>;

    /// Query the readonly overlay (filesystem-external marker, independent
    /// of host permission bits)
    fn is_readonly(&self, path: &str) -> VfsResult<bool>;

    /// Add or remove a path from the readonly overlay; idempotent
    fn set_readonly(&self, path: &str, readonly: bool) -> VfsResult<()>;

    /// Tear down all persisted state: stop watching, delete the sandbox
    /// root and the readonly record. Safe to call even if nothing was ever
    /// created.
    fn erase_all(&self) -> VfsResult<()>;
}
