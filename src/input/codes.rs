/*!
 * Key Event Synthesizer
 * Physical-code classification and canonical escape payloads for raw key
 * metadata
 */

use tracing::warn;

use super::types::{KeyEvent, RawKeyMeta, UNIDENTIFIED};

/// Classify a logical key name as a DOM-style physical code.
///
/// Single letters map to `Key<UPPER>`, single digits to `Digit<N>`,
/// function keys to `F<n>`, and a fixed symbol/control table covers the
/// rest. Returns None for anything unmapped; callers substitute the
/// `Unidentified` sentinel.
pub fn physical_code(name: &str) -> Option<String> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(format!("Key{}", c.to_ascii_uppercase()));
        }
        if c.is_ascii_digit() {
            return Some(format!("Digit{c}"));
        }
    }

    if let Some(n) = function_key_number(name) {
        return Some(format!("F{n}"));
    }

    let code = match name {
        "Enter" => "Enter",
        "Backspace" => "Backspace",
        "Tab" => "Tab",
        " " | "Space" => "Space",
        "Escape" | "Esc" => "Escape",
        // Side is not recoverable from the byte stream; assume left
        "Shift" => "ShiftLeft",
        "Control" => "ControlLeft",
        "Alt" => "AltLeft",
        "Meta" => "MetaLeft",
        "ArrowUp" => "ArrowUp",
        "ArrowDown" => "ArrowDown",
        "ArrowLeft" => "ArrowLeft",
        "ArrowRight" => "ArrowRight",
        "-" => "Minus",
        "=" => "Equal",
        "[" => "BracketLeft",
        "]" => "BracketRight",
        "\\" => "Backslash",
        ";" => "Semicolon",
        "'" => "Quote",
        "," => "Comma",
        "." => "Period",
        "/" => "Slash",
        "`" => "Backquote",
        "Delete" => "Delete",
        "Home" => "Home",
        "End" => "End",
        "PageUp" => "PageUp",
        "PageDown" => "PageDown",
        "Insert" => "Insert",
        _ => return None,
    };
    Some(code.to_string())
}

/// Canonical raw escape-sequence payload for special logical keys, so
/// downstream consumers receive byte-identical input regardless of host
/// terminal-library quirks.
///
/// The function-key numbering is fixed: F1-F4 are SS3 (`ESC O P/Q/R/S`),
/// F5 is `ESC [ 15 ~`, F6-F10 use `n + 11`, F11 and up use `n + 12`.
pub fn canonical_payload(name: &str) -> Option<String> {
    if let Some(n) = function_key_number(name) {
        return Some(match n {
            1 => "\x1bOP".to_string(),
            2 => "\x1bOQ".to_string(),
            3 => "\x1bOR".to_string(),
            4 => "\x1bOS".to_string(),
            5 => "\x1b[15~".to_string(),
            6..=10 => format!("\x1b[{}~", n + 11),
            _ => format!("\x1b[{}~", n + 12),
        });
    }

    let payload = match name {
        "Escape" | "Esc" => "\x1b",
        "Delete" => "\x7f",
        "ArrowUp" => "\x1b[A",
        "ArrowDown" => "\x1b[B",
        "ArrowRight" => "\x1b[C",
        "ArrowLeft" => "\x1b[D",
        _ => return None,
    };
    Some(payload.to_string())
}

/// Build a normalized [`KeyEvent`] from a raw character payload and the
/// reconstructed key metadata.
///
/// Never fails: unmapped keys degrade to the `Unidentified` code plus a
/// diagnostic warning, preserving liveness of the input stream.
pub fn synthesize(raw_char: &str, meta: &RawKeyMeta) -> KeyEvent {
    let logical_name = match &meta.name {
        Some(name) => title_case(name),
        None => String::new(),
    };

    let physical = match physical_code(&logical_name) {
        Some(code) => code,
        None => {
            warn!(key = %logical_name, "unmapped key, using Unidentified code");
            UNIDENTIFIED.to_string()
        }
    };

    // Special keys carry their canonical terminal bytes, whatever the
    // host library reported.
    let raw = canonical_payload(&logical_name).unwrap_or_else(|| raw_char.to_string());
    let key_code = raw.chars().next().map(|c| c as u32).unwrap_or(0);

    KeyEvent {
        raw_char: raw,
        logical_name,
        physical_code: physical,
        key_code,
        ctrl: meta.ctrl,
        alt: meta.alt,
        shift: meta.shift,
        meta: meta.meta,
    }
}

fn function_key_number(name: &str) -> Option<u32> {
    let digits = name.strip_prefix('F')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// Multi-character names arrive in whatever casing the parser produced;
// the contract's logical names are title case ("Enter", "ArrowUp").
fn title_case(name: &str) -> String {
    if name.chars().count() <= 1 {
        return name.to_string();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
