//! Property-based tests for the core primitives.
//!
//! These verify the structural invariants the rest of the stack leans on:
//!
//! 1. **Parser bounds**: `parse_key` never consumes more bytes than it was
//!    given, and a zero-length result always carries the rune-error key.
//! 2. **Prefix stability**: appending bytes after a complete recognized
//!    sequence never changes how that sequence parses.
//! 3. **Cursor containment**: no sequence of edits moves a line buffer's
//!    cursor outside `0..=len`.
//! 4. **History order**: lookback returns entries most-recent-first.
//! 5. **Scroll clamping**: the viewport offset stays inside
//!    `[0, max(0, max_line_length - input_width)]`.

use proptest::prelude::*;

use termline_core::{key, parse_key, HistoryRing, LineBuffer, Scroller};

proptest! {
    #[test]
    fn prop_parser_bounds(bytes in prop::collection::vec(any::<u8>(), 0..64), force in any::<bool>()) {
        let (key, n, _mod) = parse_key(&bytes, force);
        prop_assert!(n <= bytes.len());
        if n == 0 {
            prop_assert_eq!(key, key::RUNE_ERROR);
        }
    }

    #[test]
    fn prop_recognized_sequences_are_suffix_stable(
        seq_index in 0usize..14,
        suffix in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let table: &[&[u8]] = &[
            b"\x1b[A", b"\x1b[D", b"\x1b[H", b"\x1b[1~", b"\x1b[5~",
            b"\x1b[[A", b"\x1b[11~", b"\x1b[24~", b"\x1bOP", b"\x1b[200~",
            b"\x1b[201~", b"\x1b[1;3C", b"\x1b[3;3~", b"\x1b[13;1~",
        ];
        let seq = table[seq_index];
        let bare = parse_key(seq, false);
        let mut extended = seq.to_vec();
        extended.extend_from_slice(&suffix);
        prop_assert_eq!(parse_key(&extended, false), bare);
    }

    #[test]
    fn prop_cursor_stays_in_bounds(ops in prop::collection::vec((0u8..12, any::<char>(), 0usize..8), 0..64)) {
        let mut line = LineBuffer::new();
        for (op, ch, n) in ops {
            match op {
                0 => line.add_rune(ch),
                1 => line.erase_n_previous(n),
                2 => line.delete_line(),
                3 => line.delete_rune_under_cursor(),
                4 => line.delete_to_beginning(),
                5 => line.move_left(),
                6 => line.move_right(),
                7 => line.move_home(),
                8 => line.move_end(),
                9 => line.move_to_left_word(),
                10 => line.move_to_right_word(),
                _ => line.clear(),
            }
            prop_assert!(line.pos() <= line.len());
        }
    }

    #[test]
    fn prop_history_is_lifo(entries in prop::collection::vec(".{0,12}", 1..40)) {
        let mut ring = HistoryRing::with_capacity(16);
        for entry in &entries {
            ring.add(entry.clone());
        }
        let expected_len = entries.len().min(16);
        prop_assert_eq!(ring.len(), expected_len);
        for n in 0..expected_len {
            prop_assert_eq!(ring.nth_previous(n), Some(entries[entries.len() - 1 - n].as_str()));
        }
        prop_assert_eq!(ring.nth_previous(expected_len), None);
    }

    #[test]
    fn prop_scroll_offset_clamped(
        width in 1usize..40,
        max_len in 1usize..120,
        positions in prop::collection::vec(0usize..100, 1..20),
    ) {
        let mut scroller = Scroller::new();
        scroller.set_input_width(width);
        scroller.set_max_line_length(max_len);

        let text: String = "x".repeat(100);
        for pos in positions {
            let mut line = LineBuffer::new();
            line.set(text.chars().collect(), pos);
            scroller.filter(&line);
            prop_assert!(scroller.scroll_offset() <= max_len.saturating_sub(width));
        }
    }
}
