/*!
 * Input Types
 * Structured key events and raw key metadata
 */

use thiserror::Error;

/// Input subsystem errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// A single-key wait was requested while another is outstanding. The
    /// caller contract allows at most one waiter; no runtime queuing is
    /// provided.
    #[error("A key wait is already pending")]
    WaitPending,

    /// The pending key wait was cancelled by controller teardown
    #[error("Key wait cancelled")]
    Cancelled,

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Physical-code fallback; consumers never observe an absent code field.
pub const UNIDENTIFIED: &str = "Unidentified";

/// Normalized key-press event delivered to the virtual OS input queue.
///
/// Replaces DOM-event emulation with a plain record: every field is
/// explicit and always populated. Constructed per raw input chunk,
/// consumed once, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Raw character payload, canonical terminal escape bytes for special
    /// keys
    pub raw_char: String,
    /// Logical key name ("a", "Enter", "ArrowUp", "F6")
    pub logical_name: String,
    /// DOM-style physical classification ("KeyA", "Digit4", "ArrowUp");
    /// falls back to [`UNIDENTIFIED`], never absent
    pub physical_code: String,
    /// Code point of the first raw character (0 for an empty payload)
    pub key_code: u32,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// Key metadata as reconstructed from the raw byte stream, before
/// synthesis into a [`KeyEvent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawKeyMeta {
    /// Logical key name, if the sequence was recognized
    pub name: Option<String>,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl RawKeyMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One key chunk split off the raw stream: the bytes consumed plus the
/// reconstructed metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeypress {
    pub raw: String,
    pub meta: RawKeyMeta,
}
