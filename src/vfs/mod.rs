/*!
 * Virtual Filesystem Module
 * Sandboxed host-backed implementation of the virtual OS filesystem
 * contract
 */

pub mod paths;
pub mod readonly;
pub mod real;
pub mod traits;
pub mod types;
pub mod watcher;

// Re-exports
pub use paths::SandboxRoot;
pub use readonly::ReadonlyStore;
pub use real::RealFS;
pub use traits::FileSystem;
pub use types::{CacheInvalidation, Entry, FileData, FileType, VfsError, VfsResult};
pub use watcher::ChangeWatcher;
