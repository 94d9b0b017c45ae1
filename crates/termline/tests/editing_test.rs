// End-to-end line editing scenarios: scripted bytes in, accepted lines out.

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use common::ScriptedInput;
use termline::{Key, ReadError, Reader};

fn reader_over(bytes: &[u8]) -> Reader<ScriptedInput> {
    Reader::new(ScriptedInput::bytes(bytes))
}

fn read(bytes: &[u8]) -> String {
    reader_over(bytes).read_line().expect("read_line failed").line
}

#[test]
fn test_plain_line() {
    assert_eq!(read(b"hello\r"), "hello");
}

#[test]
fn test_utf8_line() {
    assert_eq!(read("héllo 🦀\r".as_bytes()), "héllo 🦀");
}

#[test]
fn test_empty_line() {
    assert_eq!(read(b"\r"), "");
}

#[test]
fn test_backspace_erases() {
    assert_eq!(read(b"ab\x7f\r"), "a");
    // Ctrl-H backspaces too
    assert_eq!(read(b"ab\x08\r"), "a");
}

#[test]
fn test_arrow_insertion_in_middle() {
    // Left arrow, then insert before the last rune
    assert_eq!(read(b"ab\x1b[Dc\r"), "acb");
}

#[test]
fn test_sequence_split_across_reads() {
    let input = ScriptedInput::chunks(&[b"ab\x1b[", b"D", b"c\r"]);
    let outcome = Reader::new(input).read_line().unwrap();
    assert_eq!(outcome.line, "acb");
}

#[test]
fn test_home_and_end_keys() {
    assert_eq!(read(b"bc\x1b[Ha\x1b[Fd\r"), "abcd");
    // Ctrl-A / Ctrl-E do the same
    assert_eq!(read(b"bc\x01a\x05d\r"), "abcd");
}

#[test]
fn test_ctrl_d_on_empty_line_is_eof() {
    let err = reader_over(b"\x04").read_line().unwrap_err();
    assert!(matches!(err, ReadError::Eof));
}

#[test]
fn test_ctrl_d_deletes_under_cursor() {
    assert_eq!(read(b"ab\x1b[D\x04\r"), "a");
}

#[test]
fn test_ctrl_u_deletes_to_beginning() {
    assert_eq!(read(b"abc\x1b[D\x15\r"), "c");
}

#[test]
fn test_ctrl_k_truncates_at_cursor() {
    assert_eq!(read(b"abcd\x1b[D\x1b[D\x0b\r"), "ab");
}

#[test]
fn test_ctrl_w_deletes_previous_word() {
    assert_eq!(read(b"hello world\x17\r"), "hello ");
    assert_eq!(read(b"hello \x17\r"), "");
}

#[test]
fn test_alt_word_motion() {
    // Alt+Left to the start of "world", insert, Alt+Right to the end
    assert_eq!(read(b"hello world\x1b\x1b[DX\r"), "hello Xworld");
    assert_eq!(read(b"hello world\x1b\x1b[D\x1b\x1b[CY\r"), "hello worldY");
}

#[test]
fn test_unknown_sequences_are_ignored() {
    assert_eq!(read(b"\x1b[99Xab\r"), "ab");
}

#[test]
fn test_control_characters_are_dropped() {
    // Ctrl-G has no binding and is not printable
    assert_eq!(read(b"a\x07b\r"), "ab");
}

#[test]
fn test_max_line_length_drops_overflow() {
    let mut reader = reader_over(b"abcdef\r");
    reader.set_max_line_length(3);
    assert_eq!(reader.read_line().unwrap().line, "abc");
}

#[test]
fn test_history_navigation() {
    let mut reader = reader_over(b"one\rtwo\r\x1b[A\x1b[A\x1b[B\r");
    assert_eq!(reader.read_line().unwrap().line, "one");
    assert_eq!(reader.read_line().unwrap().line, "two");
    // Up, Up, Down lands back on the newer entry
    assert_eq!(reader.read_line().unwrap().line, "two");
}

#[test]
fn test_history_restores_pending_line() {
    let mut reader = reader_over(b"first\rdra\x1b[A\x1b[B\r");
    assert_eq!(reader.read_line().unwrap().line, "first");
    // Browsing up and back down returns to the unfinished draft
    assert_eq!(reader.read_line().unwrap().line, "dra");
}

#[test]
fn test_up_with_no_history_is_noop() {
    let mut reader = reader_over(b"\x1b[Aab\r");
    assert_eq!(reader.read_line().unwrap().line, "ab");
}

#[test]
fn test_no_history_disables_recall() {
    let mut reader = reader_over(b"one\r\x1b[A\r");
    reader.set_no_history(true);
    assert_eq!(reader.read_line().unwrap().line, "one");
    assert_eq!(reader.read_line().unwrap().line, "");
}

#[test]
fn test_read_password_skips_history() {
    let mut reader = reader_over(b"secret\r\x1b[A\r");
    assert_eq!(reader.read_password().unwrap().line, "secret");
    assert!(!reader.no_history());
    // The password is not recallable
    assert_eq!(reader.read_line().unwrap().line, "");
}

#[test]
fn test_fully_pasted_line_is_flagged() {
    let outcome = reader_over(b"\x1b[200~hi\x1b[201~\r").read_line().unwrap();
    assert_eq!(outcome.line, "hi");
    assert!(outcome.pasted);
}

#[test]
fn test_paste_after_typing_is_not_flagged() {
    let outcome = reader_over(b"a\x1b[200~b\x1b[201~\r").read_line().unwrap();
    assert_eq!(outcome.line, "ab");
    assert!(!outcome.pasted);
}

#[test]
fn test_typing_after_paste_is_not_flagged() {
    let outcome = reader_over(b"\x1b[200~a\x1b[201~b\r").read_line().unwrap();
    assert_eq!(outcome.line, "ab");
    assert!(!outcome.pasted);
}

#[test]
fn test_paste_keeps_control_runes_verbatim() {
    // Inside a paste, a tab is data rather than a key binding
    let outcome = reader_over(b"\x1b[200~a\tb\x1b[201~\r").read_line().unwrap();
    assert_eq!(outcome.line, "a\tb");
    assert!(outcome.pasted);
}

#[test]
fn test_named_keys_without_binding_are_ignored() {
    // F-keys, Insert, Delete and Pause have no default handler
    assert_eq!(read(b"a\x1bOPb\x1b[2~c\x1b[11~\r"), "abc");
}

#[test]
fn test_enter_with_alt_still_accepts() {
    assert_eq!(read(b"ok\x1b\r"), "ok");
}

#[test]
fn test_paste_preserves_newline_rune() {
    // A linefeed inside a paste is data; only carriage return submits
    let outcome = reader_over(b"\x1b[200~a\nb\x1b[201~\r").read_line().unwrap();
    assert_eq!(outcome.line, "a\nb");
    assert!(outcome.pasted);
}

#[test]
fn test_invalid_utf8_inserts_replacement_rune() {
    assert_eq!(read(b"a\xffb\r"), "a\u{fffd}b");
}

#[test]
fn test_io_error_ends_read() {
    let err = reader_over(b"unfinished").read_line().unwrap_err();
    match err {
        ReadError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn test_line_view_reflects_unfinished_line() {
    let mut reader = reader_over(b"ab");
    let view = reader.line_view();
    // The source dries up before Enter; the typed prefix stays visible
    assert!(reader.read_line().is_err());
    assert_eq!(view.line_pos(), ("ab".to_string(), 2));
}

#[test]
fn test_auto_complete_replaces_line() {
    let mut reader = reader_over(b"he\t\r");
    reader.set_auto_complete(|line, pos, key| {
        if key == Key::Char('\t') && line == "he" && pos == 2 {
            Some(("help".to_string(), 4))
        } else {
            None
        }
    });
    assert_eq!(reader.read_line().unwrap().line, "help");
}

#[test]
fn test_auto_complete_position_is_rune_aware() {
    let mut reader = reader_over(b"x\ty\r");
    reader.set_auto_complete(|_, _, key| {
        if key == Key::Char('\t') {
            // Cursor byte offset 3 sits after the two-byte é
            Some(("éa".to_string(), 3))
        } else {
            None
        }
    });
    assert_eq!(reader.read_line().unwrap().line, "éay");
}

#[test]
fn test_static_completer_as_hook() {
    use termline::StaticCompleter;

    let completer = StaticCompleter::from_words(["help", "quit", "status"]);
    let mut reader = reader_over(b"qu\tnow\r");
    reader.set_auto_complete(move |line, pos, key| completer.complete(line, pos, key));
    assert_eq!(reader.read_line().unwrap().line, "quit now");
}

#[test]
fn test_on_keypress_can_claim_keys() {
    let mut reader = reader_over(b"axb\r");
    reader.set_on_keypress(|event| {
        if event.key == Key::Char('x') {
            event.ignore_default_handlers = true;
        }
    });
    assert_eq!(reader.read_line().unwrap().line, "ab");
}

#[test]
fn test_after_keypress_sees_updated_line() {
    let seen: Arc<Mutex<Vec<(Key, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    let mut reader = reader_over(b"ab\r");
    reader.set_after_keypress(move |event| {
        log.lock()
            .unwrap()
            .push((event.key, event.line.to_string()));
    });
    assert_eq!(reader.read_line().unwrap().line, "ab");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], (Key::Char('a'), "a".to_string()));
    assert_eq!(seen[1], (Key::Char('b'), "ab".to_string()));
    // Enter fires too, after the line was taken
    assert_eq!(seen[2], (Key::Enter, String::new()));
}
