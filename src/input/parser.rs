/*!
 * Keypress Parser
 * Incremental reconstruction of key chunks from raw terminal bytes
 */

use super::types::{RawKeyMeta, RawKeypress};

const ESC: u8 = 0x1b;
const CSI: u8 = b'[';
const SS3: u8 = b'O';

/// Buffer compaction threshold: compact once consumed bytes exceed this.
const COMPACT_THRESHOLD: usize = 2048;

/// Splits a raw byte stream into key chunks.
///
/// Escape sequences are parsed when complete; a partial sequence stays in
/// the buffer until the next read appends the rest. A lone ESC byte is
/// emitted immediately as the Escape key (sequences arrive atomically from
/// real terminals, so a solitary ESC is the key itself).
#[derive(Debug, Default)]
pub struct KeypressParser {
    buffer: Vec<u8>,
    consumed: usize,
}

impl KeypressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly read bytes
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Take the next complete key chunk, or None if the buffer holds no
    /// complete sequence yet.
    pub fn next_key(&mut self) -> Option<RawKeypress> {
        let buf = &self.buffer[self.consumed..];
        let (keypress, len) = parse_one(buf)?;
        self.advance(len);
        Some(keypress)
    }

    fn advance(&mut self, count: usize) {
        self.consumed += count;
        if self.consumed > COMPACT_THRESHOLD {
            self.buffer.drain(..self.consumed);
            self.consumed = 0;
        }
    }
}

fn parse_one(buf: &[u8]) -> Option<(RawKeypress, usize)> {
    let first = *buf.first()?;

    if first == ESC {
        return parse_escape(buf);
    }

    let keypress = match first {
        b'\r' | b'\n' => key("\r", RawKeyMeta::named("enter")),
        b'\t' => key("\t", RawKeyMeta::named("tab")),
        0x7f | 0x08 => key("\x7f", RawKeyMeta::named("backspace")),
        0x03 => ctrl_key('c'),
        // Remaining C0 bytes are Ctrl+letter
        0x01..=0x1a => ctrl_key((first + 0x60) as char),
        b' ' => key(" ", RawKeyMeta::named(" ")),
        _ => return parse_text(buf),
    };
    Some((keypress, 1))
}

fn parse_escape(buf: &[u8]) -> Option<(RawKeypress, usize)> {
    match buf.get(1) {
        // Solitary ESC is the Escape key itself
        None => Some((key("\x1b", RawKeyMeta::named("escape")), 1)),
        Some(&CSI) => parse_csi(buf),
        Some(&SS3) => parse_ss3(buf),
        // ESC + printable arrives atomically as the terminal's Alt+key
        // encoding
        Some(&b) if (0x20..=0x7e).contains(&b) => {
            let c = b as char;
            let meta = RawKeyMeta {
                name: Some(c.to_string()),
                alt: true,
                shift: c.is_ascii_uppercase(),
                ..Default::default()
            };
            Some((key(format!("\x1b{c}"), meta), 2))
        }
        // ESC + anything else: emit Escape, leave the rest for the next
        // parse round
        Some(_) => Some((key("\x1b", RawKeyMeta::named("escape")), 1)),
    }
}

fn parse_csi(buf: &[u8]) -> Option<(RawKeypress, usize)> {
    // A CSI sequence ends at its first final byte (0x40-0x7e); everything
    // between is numeric parameters separated by ';'.
    let final_pos = buf[2..].iter().position(|b| (0x40..=0x7e).contains(b))? + 2;
    let final_byte = buf[final_pos];
    let len = final_pos + 1;
    let raw = String::from_utf8_lossy(&buf[..len]).into_owned();

    let params = csi_params(&buf[2..final_pos]);
    let modifiers = params.get(1).copied().unwrap_or(0);

    let name = match final_byte {
        b'A' => Some("ArrowUp".to_string()),
        b'B' => Some("ArrowDown".to_string()),
        b'C' => Some("ArrowRight".to_string()),
        b'D' => Some("ArrowLeft".to_string()),
        b'H' => Some("Home".to_string()),
        b'F' => Some("End".to_string()),
        b'~' => tilde_key_name(params.first().copied().unwrap_or(0)),
        _ => None,
    };

    let mut meta = RawKeyMeta {
        name,
        ..Default::default()
    };
    apply_xterm_modifiers(&mut meta, modifiers);
    Some((key(raw, meta), len))
}

// ESC [ <n> ~ function and edit keys
fn tilde_key_name(number: u32) -> Option<String> {
    match number {
        1 | 7 => Some("Home".to_string()),
        2 => Some("Insert".to_string()),
        3 => Some("Delete".to_string()),
        4 | 8 => Some("End".to_string()),
        5 => Some("PageUp".to_string()),
        6 => Some("PageDown".to_string()),
        11..=15 => Some(format!("F{}", number - 10)),
        17..=21 => Some(format!("F{}", number - 11)),
        23..=26 => Some(format!("F{}", number - 12)),
        _ => None,
    }
}

fn csi_params(bytes: &[u8]) -> Vec<u32> {
    bytes
        .split(|b| *b == b';')
        .map(|part| {
            std::str::from_utf8(part)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0)
        })
        .collect()
}

// xterm encodes modifiers as value-1 bitfield: 1=shift, 2=alt, 4=ctrl, 8=meta
fn apply_xterm_modifiers(meta: &mut RawKeyMeta, modifiers: u32) {
    if modifiers < 2 {
        return;
    }
    let bits = modifiers - 1;
    meta.shift = bits & 1 != 0;
    meta.alt = bits & 2 != 0;
    meta.ctrl = bits & 4 != 0;
    meta.meta = bits & 8 != 0;
}

// ESC O P/Q/R/S application-mode keys
fn parse_ss3(buf: &[u8]) -> Option<(RawKeypress, usize)> {
    let final_byte = *buf.get(2)?;
    let name = match final_byte {
        b'P' => Some("F1".to_string()),
        b'Q' => Some("F2".to_string()),
        b'R' => Some("F3".to_string()),
        b'S' => Some("F4".to_string()),
        _ => None,
    };
    let raw = String::from_utf8_lossy(&buf[..3]).into_owned();
    let meta = RawKeyMeta {
        name,
        ..Default::default()
    };
    Some((key(raw, meta), 3))
}

// One printable UTF-8 scalar; shift inferred from uppercase letters
fn parse_text(buf: &[u8]) -> Option<(RawKeypress, usize)> {
    let width = utf8_width(buf[0]);
    if buf.len() < width {
        return None;
    }

    match std::str::from_utf8(&buf[..width]) {
        Ok(s) => {
            let c = s.chars().next()?;
            let meta = RawKeyMeta {
                name: Some(c.to_string()),
                shift: c.is_ascii_uppercase(),
                ..Default::default()
            };
            Some((key(s, meta), width))
        }
        // Invalid UTF-8: swallow one byte as unidentified to keep the
        // stream live
        Err(_) => Some((
            key(
                String::from_utf8_lossy(&buf[..1]).into_owned(),
                RawKeyMeta::default(),
            ),
            1,
        )),
    }
}

fn utf8_width(first: u8) -> usize {
    match first {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        // Continuation and out-of-range bytes cannot start a sequence;
        // width 1 lets the invalid-byte path consume them right away
        _ => 1,
    }
}

fn key(raw: impl Into<String>, meta: RawKeyMeta) -> RawKeypress {
    RawKeypress {
        raw: raw.into(),
        meta,
    }
}

fn ctrl_key(letter: char) -> RawKeypress {
    let byte = (letter as u8 - 0x60) as char;
    RawKeypress {
        raw: byte.to_string(),
        meta: RawKeyMeta {
            name: Some(letter.to_string()),
            ctrl: true,
            ..Default::default()
        },
    }
}
