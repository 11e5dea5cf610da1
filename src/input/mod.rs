/*!
 * Input Module
 * Raw terminal keyboard adapter: byte streams in, structured key events
 * out
 */

pub mod codes;
pub mod parser;
pub mod stream;
pub mod types;

// Re-exports
pub use codes::{canonical_payload, physical_code, synthesize};
pub use parser::KeypressParser;
pub use stream::{KeypressController, RawModeGuard};
pub use types::{InputError, KeyEvent, RawKeyMeta, RawKeypress, UNIDENTIFIED};
