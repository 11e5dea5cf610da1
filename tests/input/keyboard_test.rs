/*!
 * Keyboard Tests
 * Raw bytes through parser and synthesizer to finished key events
 */

use pretty_assertions::assert_eq;

use vos_host::input::{synthesize, KeypressParser, UNIDENTIFIED};

fn events_for(bytes: &[u8]) -> Vec<vos_host::KeyEvent> {
    let mut parser = KeypressParser::new();
    parser.push(bytes);
    let mut events = Vec::new();
    while let Some(keypress) = parser.next_key() {
        events.push(synthesize(&keypress.raw, &keypress.meta));
    }
    events
}

#[test]
fn test_arrow_up_end_to_end() {
    let events = events_for(b"\x1b[A");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].physical_code, "ArrowUp");
    assert_eq!(events[0].logical_name, "ArrowUp");
    assert_eq!(events[0].raw_char, "\x1b[A");
    assert_eq!(events[0].key_code, 0x1b);
}

#[test]
fn test_f6_end_to_end() {
    let events = events_for(b"\x1b[17~");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].physical_code, "F6");
    // 6 + 11 = 17; the offset table is fixed
    assert_eq!(events[0].raw_char, "\x1b[17~");
}

#[test]
fn test_f1_uses_ss3_payload() {
    let events = events_for(b"\x1bOP");
    assert_eq!(events[0].physical_code, "F1");
    assert_eq!(events[0].raw_char, "\x1bOP");
}

#[test]
fn test_typed_word() {
    let events = events_for(b"Hi 9");
    let codes: Vec<_> = events.iter().map(|e| e.physical_code.as_str()).collect();
    assert_eq!(codes, ["KeyH", "KeyI", "Space", "Digit9"]);
    assert!(events[0].shift);
    assert!(!events[1].shift);
}

#[test]
fn test_enter_and_backspace() {
    let events = events_for(b"\r\x7f");
    assert_eq!(events[0].physical_code, "Enter");
    assert_eq!(events[0].logical_name, "Enter");
    assert_eq!(events[0].raw_char, "\r");
    assert_eq!(events[1].physical_code, "Backspace");
}

#[test]
fn test_escape_and_delete_payloads() {
    let events = events_for(b"\x1b");
    assert_eq!(events[0].physical_code, "Escape");
    assert_eq!(events[0].raw_char, "\x1b");

    let events = events_for(b"\x1b[3~");
    assert_eq!(events[0].logical_name, "Delete");
    // Delete normalizes to its canonical single-byte payload
    assert_eq!(events[0].raw_char, "\x7f");
}

#[test]
fn test_ctrl_modifier() {
    let events = events_for(b"\x01");
    assert!(events[0].ctrl);
    assert_eq!(events[0].physical_code, "KeyA");
}

#[test]
fn test_unknown_key_degrades_to_unidentified() {
    let events = events_for(b"\x1b[999~");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].physical_code, UNIDENTIFIED);
    // Liveness: the next key still comes through
    let events = events_for(b"\x1b[999~z");
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].physical_code, "KeyZ");
}

#[test]
fn test_every_event_has_a_code() {
    // A spread of ordinary and exotic inputs; no event may ever surface
    // without a populated physical code.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"abcXYZ019 \r\t\x7f\x1b[A\x1b[24~\x1bOS");
    bytes.extend_from_slice("é€".as_bytes());
    for event in events_for(&bytes) {
        assert!(!event.physical_code.is_empty());
    }
}
