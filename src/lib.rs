/*!
 * VOS Host Library
 * Host-integration layer for a browser-oriented virtual OS: a sandboxed
 * real-filesystem backend and a raw-terminal keyboard adapter
 */

pub mod config;
pub mod host;
pub mod input;
pub mod monitoring;
pub mod vfs;

// Re-exports
pub use config::HostConfig;
pub use host::SpawnRegistry;
pub use input::{KeyEvent, KeypressController};
pub use monitoring::init_tracing;
pub use vfs::{CacheInvalidation, FileSystem, RealFS, VfsError, VfsResult};
