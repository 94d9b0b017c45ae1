//! Key identifiers, modifier flags, and the parsed keypress record.
//!
//! A [`Key`] is either a decoded rune ([`Key::Char`]) or one of the named
//! keys a terminal reports as an escape sequence. Control characters below
//! 0x1B come through as their ASCII rune (`Key::Char('\u{01}')` for Ctrl-A
//! and so on); the constants in this module name the ones the editor
//! dispatches on. Enter (`'\r'`) and Backspace (0x7F) are normalized to
//! their named variants by the parser so a single canonical value exists
//! for each.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held alongside a normal key.
    ///
    /// Shift is absent because terminals do not report it for most keys
    /// (there is no "Shift+PgUp"), and Ctrl is absent because Ctrl
    /// combinations collapse into their own codes: Ctrl-A is ASCII 1,
    /// and Ctrl-Up is a wholly separate sequence from Up.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModifier: u8 {
        const ALT = 1;
        const META = 2;
    }
}

impl Default for KeyModifier {
    fn default() -> Self {
        KeyModifier::empty()
    }
}

impl fmt::Display for KeyModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.contains(KeyModifier::META), self.contains(KeyModifier::ALT)) {
            (true, true) => write!(f, "Meta+Alt"),
            (false, true) => write!(f, "Alt"),
            (true, false) => write!(f, "Meta"),
            (false, false) => write!(f, "None"),
        }
    }
}

/// A key recognized from terminal input.
///
/// `Char` carries any decoded rune, printable or control. The remaining
/// variants name keys that arrive as multi-byte escape sequences and have
/// no rune of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A decoded rune: printable text, or a control character below 0x1B.
    Char(char),

    /// A sequence that looked complete but matched nothing we know.
    Unknown,

    // Navigation
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PgUp,
    PgDn,

    // Editing
    Insert,
    Delete,
    Backspace,
    Enter,

    // Bracketed paste markers
    PasteStart,
    PasteEnd,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    /// The Escape key itself, only reported under force-parse.
    Escape,
    /// Alt+[ under force-parse; otherwise `ESC [` is a sequence prefix.
    LeftBracket,
    Pause,
}

pub const CTRL_A: Key = Key::Char('\u{01}');
pub const CTRL_B: Key = Key::Char('\u{02}');
pub const CTRL_C: Key = Key::Char('\u{03}');
pub const CTRL_D: Key = Key::Char('\u{04}');
pub const CTRL_E: Key = Key::Char('\u{05}');
pub const CTRL_F: Key = Key::Char('\u{06}');
pub const CTRL_G: Key = Key::Char('\u{07}');
pub const CTRL_H: Key = Key::Char('\u{08}');
pub const CTRL_I: Key = Key::Char('\u{09}');
pub const CTRL_J: Key = Key::Char('\u{0a}');
pub const CTRL_K: Key = Key::Char('\u{0b}');
pub const CTRL_L: Key = Key::Char('\u{0c}');
// Ctrl-M is carriage return; it parses as Key::Enter.
pub const CTRL_N: Key = Key::Char('\u{0e}');
pub const CTRL_O: Key = Key::Char('\u{0f}');
pub const CTRL_P: Key = Key::Char('\u{10}');
pub const CTRL_Q: Key = Key::Char('\u{11}');
pub const CTRL_R: Key = Key::Char('\u{12}');
pub const CTRL_S: Key = Key::Char('\u{13}');
pub const CTRL_T: Key = Key::Char('\u{14}');
pub const CTRL_U: Key = Key::Char('\u{15}');
pub const CTRL_V: Key = Key::Char('\u{16}');
pub const CTRL_W: Key = Key::Char('\u{17}');
pub const CTRL_X: Key = Key::Char('\u{18}');
pub const CTRL_Y: Key = Key::Char('\u{19}');
pub const CTRL_Z: Key = Key::Char('\u{1a}');

/// Tab is Ctrl-I.
pub const TAB: Key = CTRL_I;

/// The replacement-character key. With a consumed size of zero it signals
/// "more bytes needed"; with a nonzero size it stands for bytes that were
/// not valid UTF-8.
pub const RUNE_ERROR: Key = Key::Char(char::REPLACEMENT_CHARACTER);

impl Key {
    /// Build the canonical key for a decoded rune. Enter and Backspace
    /// fold into their named variants.
    pub fn from_rune(r: char) -> Key {
        match r {
            '\r' => Key::Enter,
            '\u{7f}' => Key::Backspace,
            r => Key::Char(r),
        }
    }

    /// The rune this key carries, if any.
    pub fn rune(self) -> Option<char> {
        match self {
            Key::Char(c) => Some(c),
            Key::Enter => Some('\r'),
            Key::Backspace => Some('\u{7f}'),
            _ => None,
        }
    }

    /// Whether this key should be inserted into a line as text.
    ///
    /// True for runes at or above space; control characters and all named
    /// keys are not printable.
    pub fn is_printable(self) -> bool {
        matches!(self, Key::Char(c) if c >= ' ')
    }
}

impl fmt::Display for Key {
    /// Human-readable key name, for diagnostics and key-report tools.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Key::Char(c) => {
                return match c as u32 {
                    1..=26 => write!(f, "Ctrl+{}", (b'A' + c as u8 - 1) as char),
                    0..=31 => write!(f, "\\x{:02x}", c as u32),
                    _ => write!(f, "{c}"),
                }
            }
            Key::Unknown => "Unknown",
            Key::Up => "Up",
            Key::Down => "Down",
            Key::Left => "Left",
            Key::Right => "Right",
            Key::Home => "Home",
            Key::End => "End",
            Key::PgUp => "PgUp",
            Key::PgDn => "PgDn",
            Key::Insert => "Insert",
            Key::Delete => "Delete",
            Key::Backspace => "Backspace",
            Key::Enter => "Enter",
            Key::PasteStart => "PasteStart",
            Key::PasteEnd => "PasteEnd",
            Key::F1 => "F1",
            Key::F2 => "F2",
            Key::F3 => "F3",
            Key::F4 => "F4",
            Key::F5 => "F5",
            Key::F6 => "F6",
            Key::F7 => "F7",
            Key::F8 => "F8",
            Key::F9 => "F9",
            Key::F10 => "F10",
            Key::F11 => "F11",
            Key::F12 => "F12",
            Key::Escape => "Escape",
            Key::LeftBracket => "LeftBracket",
            Key::Pause => "Pause",
        };
        f.write_str(name)
    }
}

/// One parsed keypress.
///
/// `raw` aliases the key reader's staging buffer and is only valid until
/// the next `read_keypress` call; the borrow checker enforces this. Copy
/// the bytes out if they need to be held longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keypress<'a> {
    pub key: Key,
    pub modifier: KeyModifier,
    /// Number of bytes consumed from the input to produce `key`.
    pub size: usize,
    pub raw: &'a [u8],
}
