/*!
 * Host Process Integration
 * Externally spawned program tracking
 */

pub mod spawn;

pub use spawn::{SpawnRegistry, SHUTDOWN_GRACE};
