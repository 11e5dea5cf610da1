/*!
 * VFS Types
 * Shared types for sandboxed filesystem operations
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// VFS operation result
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum VfsError {
    /// Resolution escaped the sandbox root. Always fatal to the operation,
    /// never silently clamped.
    #[error("Path traversal detected: {0}")]
    PathTraversal(String),

    #[error("Path not found: {0}")]
    NotFound(String),

    /// Non-empty directory deleted without the recursive flag.
    #[error("Directory not empty: {0}")]
    NonRecursiveDirectory(String),

    /// The readonly record is unreadable or malformed.
    #[error("Readonly store corrupt: {0}")]
    StoreCorruption(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl VfsError {
    pub(crate) fn io(e: std::io::Error, context: impl Into<String>) -> Self {
        VfsError::IoError(format!("{}: {}", context.into(), e))
    }
}

/// Entry type, as seen by the virtual OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    File,
    Directory,
}

/// Directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub file_type: FileType,
}

impl Entry {
    pub fn new(name: String, file_type: FileType) -> Self {
        Self { name, file_type }
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/// File contents, decoded per the caller's `as_binary` flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileData {
    Text(String),
    Binary(Vec<u8>),
}

impl FileData {
    /// Raw byte view regardless of variant
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileData::Text(s) => s.as_bytes(),
            FileData::Binary(b) => b,
        }
    }
}

/// Invalidation signal for the external cache layer.
///
/// Emitted whenever the host filesystem changes under the sandbox root,
/// including changes made outside the adapter's own write path. The path is
/// always forward-slash, rooted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInvalidation {
    pub virtual_path: String,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileType::File => write!(f, "file"),
            FileType::Directory => write!(f, "directory"),
        }
    }
}
