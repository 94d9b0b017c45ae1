//! Byte-sequence key parser.
//!
//! [`parse_key`] classifies the prefix of a raw input buffer as one
//! recognized keypress and reports how many bytes it consumed. Terminals
//! emit overlapping variable-length sequences whose end cannot be detected
//! without peeking further, so the contract is incremental: a return of
//! ([`key::RUNE_ERROR`], 0, _) means "read more bytes and try again". The
//! `force` flag commits ambiguous prefixes instead of waiting, which is
//! how a bare Escape press or Alt+[ ever gets resolved.
//!
//! The pattern checks run in a fixed order and the order is load-bearing:
//! SS3 function keys have to be picked off before the Alt-prefix strip or
//! `ESC O P` reads as Alt+O followed by a stray P.

use crate::key::{self, Key, KeyModifier};

const ESC: u8 = 0x1b;

const PASTE_START: [u8; 6] = *b"\x1b[200~";
const PASTE_END: [u8; 6] = *b"\x1b[201~";

/// Result of decoding the first rune of a buffer.
enum Decoded {
    Rune(char, usize),
    Invalid,
    Incomplete,
}

/// Decode the first UTF-8 rune of `b`, or report that the prefix is
/// invalid or still incomplete.
fn decode_rune(b: &[u8]) -> Decoded {
    let window = &b[..b.len().min(4)];
    match std::str::from_utf8(window) {
        Ok(s) => match s.chars().next() {
            Some(c) => Decoded::Rune(c, c.len_utf8()),
            None => Decoded::Incomplete,
        },
        Err(e) if e.valid_up_to() > 0 => {
            let valid = &window[..e.valid_up_to()];
            match std::str::from_utf8(valid).ok().and_then(|s| s.chars().next()) {
                Some(c) => Decoded::Rune(c, c.len_utf8()),
                None => Decoded::Incomplete,
            }
        }
        Err(e) => {
            if e.error_len().is_some() {
                Decoded::Invalid
            } else {
                Decoded::Incomplete
            }
        }
    }
}

/// Try to parse a key sequence from the front of `b`.
///
/// Returns the key, the number of input bytes it spans, and any modifiers.
/// A length of zero (always paired with [`key::RUNE_ERROR`]) means the buffer
/// holds only part of a sequence and the caller should supply more bytes.
///
/// With `force` set, partial sequences are resolved on a best-effort basis
/// instead: a lone `ESC` becomes the Escape key, `ESC ESC` becomes
/// Alt+Escape, `ESC [` becomes Alt+[, and anything else unfinished is
/// consumed as [`key::RUNE_ERROR`]. Useful when the caller knows no more bytes
/// are coming imminently.
///
/// # Examples
///
/// ```
/// use termline_core::{parse_key, Key, KeyModifier};
///
/// assert_eq!(parse_key(b"\x1b[A", false), (Key::Up, 3, KeyModifier::empty()));
/// assert_eq!(parse_key(b"\x1b[", false), (termline_core::key::RUNE_ERROR, 0, KeyModifier::empty()));
/// assert_eq!(parse_key(b"\x1b[", true), (Key::LeftBracket, 2, KeyModifier::ALT));
/// ```
pub fn parse_key(bytes: &[u8], force: bool) -> (Key, usize, KeyModifier) {
    let mut modifier = KeyModifier::empty();
    let mut consumed = 0usize;
    let mut b: &[u8] = bytes;
    let mut l = b.len();

    if l == 0 {
        return (key::RUNE_ERROR, 0, modifier);
    }

    // F1-F4 arrive as SS3 (`ESC O` + letter) and have to be handled before
    // anything else or they get detected as Alt+letter.
    if l > 2 && b[0] == ESC && b[1] == b'O' {
        let mut fin = b[2];
        if l > 3 && b[2] == b'1' {
            consumed += 1;
            fin = b[3];
            modifier |= KeyModifier::META;
        }
        match fin {
            b'P' => return (Key::F1, consumed + 3, modifier),
            b'Q' => return (Key::F2, consumed + 3, modifier),
            b'R' => return (Key::F3, consumed + 3, modifier),
            b'S' => return (Key::F4, consumed + 3, modifier),
            _ => {}
        }
    }

    // Meta-modified sequences come wrapped in a `0x18 @ s` prefix.
    if l > 3 && b[0] == 0x18 && b[1] == b'@' && b[2] == b's' {
        b = &b[3..];
        l -= 3;
        consumed += 3;
        modifier |= KeyModifier::META;
    }

    // Alt+Escape and Alt+left-bracket are prefixes of longer sequences, so
    // they can only be committed when force says nothing else is coming.
    if l == 2 && force && b[0] == ESC {
        if b[1] == ESC {
            return (Key::Escape, consumed + 2, modifier | KeyModifier::ALT);
        }
        if b[1] == b'[' {
            return (Key::LeftBracket, consumed + 2, modifier | KeyModifier::ALT);
        }
    }

    // Some alt keys are just an extra escape byte in front of the plain
    // sequence; tmux in particular reports them this way.
    if l > 1 && b[0] == ESC && b[1] != b'[' {
        b = &b[1..];
        l -= 1;
        consumed += 1;
        modifier |= KeyModifier::ALT;
    }

    // Control characters.
    if b[0] < ESC {
        return (Key::from_rune(b[0] as char), consumed + 1, modifier);
    }

    // Anything not starting with escape is a plain rune.
    if b[0] != ESC {
        return match decode_rune(b) {
            Decoded::Rune(r, n) => (Key::from_rune(r), consumed + n, modifier),
            Decoded::Invalid => (key::RUNE_ERROR, consumed + 1, modifier),
            Decoded::Incomplete => {
                if force {
                    (key::RUNE_ERROR, consumed + l, modifier)
                } else {
                    (key::RUNE_ERROR, 0, KeyModifier::empty())
                }
            }
        };
    }

    // A lone escape is *probably* a partial sequence... but maybe not.
    if l == 1 {
        if force {
            return (Key::Escape, consumed + 1, modifier);
        }
        return key_unknown(b, consumed, force, modifier);
    }

    // Every sequence we know from here on is at least three bytes.
    if l < 3 {
        if force {
            return (key::RUNE_ERROR, consumed + l, modifier);
        }
        return key_unknown(b, consumed, force, modifier);
    }

    if b[1] != b'[' {
        return key_unknown(b, consumed, force, modifier);
    }

    // Local-terminal alt keys come through as `ESC [ 1 ; 3` + letter;
    // rewrite to the plain sequence and carry the modifier.
    let alt_letter_rewrite: Vec<u8>;
    if l >= 6 && b[2] == b'1' && b[3] == b';' && b[4] == b'3' {
        alt_letter_rewrite = [b"\x1b[" as &[u8], &b[5..]].concat();
        b = &alt_letter_rewrite;
        l -= 3;
        consumed += 3;
        modifier |= KeyModifier::ALT;
    }

    // ...and sometimes as `ESC [` + digit + `;3~`.
    let alt_tilde_rewrite: Vec<u8>;
    if l >= 6 && b[2].is_ascii_digit() && b[3] == b';' && b[4] == b'3' && b[5] == b'~' {
        alt_tilde_rewrite = [&[ESC, b'[', b[2]] as &[u8], &b[5..]].concat();
        b = &alt_tilde_rewrite;
        l -= 2;
        consumed += 2;
        modifier |= KeyModifier::ALT;
    }

    // The rewrites may have shortened the buffer.
    if l < 3 {
        return key_unknown(b, consumed, force, modifier);
    }

    match b[2] {
        b'A' => return (Key::Up, consumed + 3, modifier),
        b'B' => return (Key::Down, consumed + 3, modifier),
        b'C' => return (Key::Right, consumed + 3, modifier),
        b'D' => return (Key::Left, consumed + 3, modifier),
        b'H' => return (Key::Home, consumed + 3, modifier),
        b'F' => return (Key::End, consumed + 3, modifier),
        b'P' => return (Key::Pause, consumed + 3, modifier),
        _ => {}
    }

    if l < 4 {
        return key_unknown(b, consumed, force, modifier);
    }

    // NOTE: tmux reports these, but some never show up on a "direct"
    // terminal.
    if b[3] == b'~' {
        match b[2] {
            b'1' => return (Key::Home, consumed + 4, modifier),
            b'2' => return (Key::Insert, consumed + 4, modifier),
            b'3' => return (Key::Delete, consumed + 4, modifier),
            b'4' => return (Key::End, consumed + 4, modifier),
            b'5' => return (Key::PgUp, consumed + 4, modifier),
            b'6' => return (Key::PgDn, consumed + 4, modifier),
            _ => {}
        }
    }

    // Raw-terminal function keys (seen on consoles without a GUI).
    if b[2] == b'[' {
        match b[3] {
            b'A' => return (Key::F1, consumed + 4, modifier),
            b'B' => return (Key::F2, consumed + 4, modifier),
            b'C' => return (Key::F3, consumed + 4, modifier),
            b'D' => return (Key::F4, consumed + 4, modifier),
            b'E' => return (Key::F5, consumed + 4, modifier),
            _ => {}
        }
    }

    if l < 5 {
        return key_unknown(b, consumed, force, modifier);
    }

    // Meta + function keys carry a `;1` before the final tilde.
    let meta_fn_rewrite: Vec<u8>;
    if l > 6 && b[4] == b';' && b[5] == b'1' && b[6] == b'~' {
        meta_fn_rewrite = [&b[..4], &b[6..]].concat();
        b = &meta_fn_rewrite;
        l -= 2;
        consumed += 2;
        modifier |= KeyModifier::META;
    }

    // Two-digit function keys, shared across terminal types *except* F5,
    // which only shows up this way outside raw mode, and F1-F4, which only
    // use these codes under PuTTY.
    if b[4] == b'~' {
        match (b[2], b[3]) {
            (b'1', b'1') => return (Key::F1, consumed + 5, modifier),
            (b'1', b'2') => return (Key::F2, consumed + 5, modifier),
            (b'1', b'3') => return (Key::F3, consumed + 5, modifier),
            (b'1', b'4') => return (Key::F4, consumed + 5, modifier),
            (b'1', b'5') => return (Key::F5, consumed + 5, modifier),
            (b'1', b'7') => return (Key::F6, consumed + 5, modifier),
            (b'1', b'8') => return (Key::F7, consumed + 5, modifier),
            (b'1', b'9') => return (Key::F8, consumed + 5, modifier),
            (b'2', b'0') => return (Key::F9, consumed + 5, modifier),
            (b'2', b'1') => return (Key::F10, consumed + 5, modifier),
            (b'2', b'3') => return (Key::F11, consumed + 5, modifier),
            (b'2', b'4') => return (Key::F12, consumed + 5, modifier),
            _ => {}
        }
    }

    if l < 6 {
        return key_unknown(b, consumed, force, modifier);
    }

    if b[..6] == PASTE_END {
        return (Key::PasteEnd, consumed + 6, modifier);
    }
    if b[..6] == PASTE_START {
        return (Key::PasteStart, consumed + 6, modifier);
    }

    key_unknown(b, consumed, force, modifier)
}

/// Classify a sequence we don't have a table entry for.
///
/// Scans for the first plausible final byte and reports everything up to
/// it as [`Key::Unknown`]. Without a terminator the caller either waits
/// for more bytes, or (under force) eats the whole buffer as an error.
fn key_unknown(b: &[u8], consumed: usize, force: bool, modifier: KeyModifier) -> (Key, usize, KeyModifier) {
    // Once the buffer gets this big we are never going to recognize what's
    // in it. Shed the first byte as an error and let the caller retry.
    if b.len() > 8 && !force {
        return (key::RUNE_ERROR, 1, KeyModifier::empty());
    }

    for (i, &c) in b.iter().enumerate() {
        // There's no way to find the end of a sequence without knowing them
        // all, but [a-zA-Z~] seems to only appear as a final byte.
        if c.is_ascii_alphabetic() || c == b'~' {
            return (Key::Unknown, consumed + i + 1, modifier);
        }
    }

    if force {
        return (key::RUNE_ERROR, consumed + b.len(), modifier);
    }

    (key::RUNE_ERROR, 0, KeyModifier::empty())
}
