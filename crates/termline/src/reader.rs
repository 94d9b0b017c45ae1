//! The line editor: a state machine fed by parsed keypresses.
//!
//! [`Reader`] owns a [`KeyReader`] and a locked [`LineBuffer`], and turns
//! the stream of keypresses into edited lines. It stores what the user is
//! typing and where the cursor is while leaving all drawing to someone
//! else; that separation is what allows a renderer on another thread to
//! snapshot the line at any time through a [`LineView`].

use std::io::{self, Read};
use std::sync::{Arc, PoisonError, RwLock};

use termline_core::key::{
    self, Key, KeyModifier, CTRL_A, CTRL_D, CTRL_E, CTRL_H, CTRL_K, CTRL_L, CTRL_U, CTRL_W,
};
use termline_core::{HistoryRing, LineBuffer};

use crate::debug_log;
use crate::error::{ReadError, ReadResult};
use crate::key_reader::KeyReader;

/// Input beyond this many runes is silently dropped.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// A keypress as seen by observers, along with the line it acted on.
///
/// For the pre-dispatch hook the event is mutable and setting
/// `ignore_default_handlers` suppresses the editor's own handling of the
/// key. Post-dispatch observers receive the event read-only with the line
/// already updated.
pub struct KeyEvent<'a> {
    pub key: Key,
    pub modifier: KeyModifier,
    pub line: &'a LineBuffer,
    /// Set by an `on_keypress` hook to claim the key for itself.
    pub ignore_default_handlers: bool,
}

/// An accepted line and how it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub line: String,
    /// True when the entire line content arrived inside a bracketed
    /// paste. Callers may want to treat such a line as data rather than
    /// as something the user typed deliberately.
    pub pasted: bool,
}

type OnKeypress = Box<dyn FnMut(&mut KeyEvent<'_>) + Send>;
type AfterKeypress = Box<dyn FnMut(&KeyEvent<'_>) + Send>;
type AutoComplete = Box<dyn FnMut(&str, usize, Key) -> Option<(String, usize)> + Send>;

/// History browsing state layered over the ring buffer.
struct HistoryNav {
    ring: HistoryRing,
    /// Currently displayed entry; -1 means not browsing, 0 the most
    /// recent entry.
    index: isize,
    /// The in-progress line stashed when browsing begins, restored when
    /// the user arrows back down past the newest entry.
    pending: String,
    disabled: bool,
}

impl HistoryNav {
    fn new() -> Self {
        HistoryNav {
            ring: HistoryRing::new(),
            index: -1,
            pending: String::new(),
            disabled: false,
        }
    }

    fn previous(&mut self, line: &mut LineBuffer) {
        if self.disabled {
            return;
        }
        if let Some(entry) = self.ring.nth_previous((self.index + 1) as usize) {
            if self.index == -1 {
                self.pending = line.to_string();
            }
            self.index += 1;
            let runes: Vec<char> = entry.chars().collect();
            let pos = runes.len();
            line.set(runes, pos);
        }
    }

    fn next(&mut self, line: &mut LineBuffer) {
        if self.disabled {
            return;
        }
        match self.index {
            -1 => {}
            0 => {
                let runes: Vec<char> = self.pending.chars().collect();
                let pos = runes.len();
                line.set(runes, pos);
                self.index = -1;
            }
            _ => {
                if let Some(entry) = self.ring.nth_previous((self.index - 1) as usize) {
                    self.index -= 1;
                    let runes: Vec<char> = entry.chars().collect();
                    let pos = runes.len();
                    line.set(runes, pos);
                }
            }
        }
    }

    fn record(&mut self, line: String) {
        self.index = -1;
        self.ring.add(line);
    }
}

/// Reads edited lines of input from a raw-mode byte stream.
///
/// `read_line` is meant to be driven by one thread; snapshots of the line
/// state may be taken concurrently from others via [`Reader::line_view`].
/// Keys are processed strictly in arrival order, and the editor blocks
/// only on the underlying byte source.
pub struct Reader<R> {
    keys: KeyReader<R>,
    line: Arc<RwLock<LineBuffer>>,
    history: HistoryNav,
    /// True while inside a bracketed paste.
    paste_active: bool,
    max_line_length: usize,
    auto_complete: Option<AutoComplete>,
    on_keypress: Option<OnKeypress>,
    after_keypress: Option<AfterKeypress>,
}

impl<R: Read> Reader<R> {
    /// A reader over `input`. If the stream is a local terminal, the
    /// caller must have put it into raw mode first.
    pub fn new(input: R) -> Self {
        Reader {
            keys: KeyReader::new(input),
            line: Arc::new(RwLock::new(LineBuffer::new())),
            history: HistoryNav::new(),
            paste_active: false,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            auto_complete: None,
            on_keypress: None,
            after_keypress: None,
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub fn set_max_line_length(&mut self, len: usize) {
        self.max_line_length = len;
    }

    /// Skip history recording, e.g. while a password is being entered.
    pub fn set_no_history(&mut self, no_history: bool) {
        self.history.disabled = no_history;
    }

    pub fn no_history(&self) -> bool {
        self.history.disabled
    }

    pub fn force_parse(&self) -> bool {
        self.keys.force_parse()
    }

    /// See [`KeyReader::set_force_parse`].
    pub fn set_force_parse(&mut self, force: bool) {
        self.keys.set_force_parse(force);
    }

    /// Install a completion hook, called for keys with no default
    /// handling. It receives the line, the cursor as a byte offset, and
    /// the key; returning a replacement line and byte cursor applies it
    /// and swallows the key.
    pub fn set_auto_complete<F>(&mut self, complete: F)
    where
        F: FnMut(&str, usize, Key) -> Option<(String, usize)> + Send + 'static,
    {
        self.auto_complete = Some(Box::new(complete));
    }

    /// Install a hook that sees every keypress before the editor handles
    /// it. Setting `ignore_default_handlers` on the event claims the key.
    /// The hook runs inside the editor's lock and must not call back into
    /// this reader.
    pub fn set_on_keypress<F>(&mut self, hook: F)
    where
        F: FnMut(&mut KeyEvent<'_>) + Send + 'static,
    {
        self.on_keypress = Some(Box::new(hook));
    }

    /// Install an observer that runs after each keypress has been
    /// applied, with the updated line. Runs inside the editor's lock;
    /// it may read state via [`KeyEvent::line`] but must not re-enter
    /// the reader.
    pub fn set_after_keypress<F>(&mut self, observer: F)
    where
        F: FnMut(&KeyEvent<'_>) + Send + 'static,
    {
        self.after_keypress = Some(Box::new(observer));
    }

    /// The current line and cursor position, as owned copies.
    pub fn line_pos(&self) -> (String, usize) {
        let line = self.read_lock();
        (line.to_string(), line.pos())
    }

    /// The current cursor position.
    pub fn pos(&self) -> usize {
        self.read_lock().pos()
    }

    /// A cloneable handle for snapshotting the line from another thread.
    pub fn line_view(&self) -> LineView {
        LineView {
            line: Arc::clone(&self.line),
        }
    }

    /// Read one line of input.
    ///
    /// Returns when Enter is pressed. Ctrl-D on an empty line yields
    /// [`ReadError::Eof`]; failures of the byte source yield
    /// [`ReadError::Io`] and end the read.
    pub fn read_line(&mut self) -> ReadResult<ReadOutcome> {
        self.read_line_with(|_| Ok(()))
    }

    /// Read a line without recording it into history.
    pub fn read_password(&mut self) -> ReadResult<ReadOutcome> {
        let prev = self.history.disabled;
        self.history.disabled = true;
        let result = self.read_line();
        self.history.disabled = prev;
        result
    }

    /// `read_line` with an extra synchronous observer, which the prompt
    /// layer uses to redraw after every applied keypress. Observer
    /// failures abort the read.
    pub(crate) fn read_line_with<F>(&mut self, mut observer: F) -> ReadResult<ReadOutcome>
    where
        F: FnMut(&KeyEvent<'_>) -> io::Result<()>,
    {
        let mut line_is_pasted = self.paste_active;

        loop {
            let (key, modifier, size) = {
                let kp = self.keys.read_keypress()?;
                (kp.key, kp.modifier, kp.size)
            };

            // Partial sequence staged; the next read_keypress call will
            // pull more bytes.
            if size == 0 && key == key::RUNE_ERROR {
                continue;
            }

            debug_log!("keypress {:?} modifier {}", key, modifier);

            if !self.paste_active {
                if key == CTRL_D && self.line_is_empty() {
                    return Err(ReadError::Eof);
                }
                if key == Key::PasteStart {
                    self.paste_active = true;
                    if self.line_is_empty() {
                        line_is_pasted = true;
                    }
                    continue;
                }
            } else if key == Key::PasteEnd {
                self.paste_active = false;
                continue;
            }

            // Any key handled outside a paste means the line is no longer
            // pure paste content. Enter doesn't count: it only submits.
            if !self.paste_active && key != Key::Enter {
                line_is_pasted = false;
            }

            if let Some(accepted) = self.handle_key(key, modifier, &mut observer)? {
                if !self.history.disabled {
                    self.history.record(accepted.clone());
                }
                return Ok(ReadOutcome {
                    line: accepted,
                    pasted: line_is_pasted,
                });
            }
        }
    }

    /// Apply one keypress to the line under the write lock, firing the
    /// keypress hooks. Returns the finished line on Enter.
    fn handle_key<F>(
        &mut self,
        key: Key,
        modifier: KeyModifier,
        observer: &mut F,
    ) -> ReadResult<Option<String>>
    where
        F: FnMut(&KeyEvent<'_>) -> io::Result<()>,
    {
        let mut line = self.line.write().unwrap_or_else(PoisonError::into_inner);

        // In paste mode every resolved key that carries a rune is data.
        if self.paste_active && key != Key::Enter {
            if let Some(r) = key.rune() {
                line.add_rune(r);
            }
            let event = KeyEvent {
                key,
                modifier,
                line: &*line,
                ignore_default_handlers: false,
            };
            observer(&event).map_err(ReadError::Io)?;
            if let Some(cb) = self.after_keypress.as_mut() {
                cb(&event);
            }
            return Ok(None);
        }

        let mut ignore = false;
        if let Some(cb) = self.on_keypress.as_mut() {
            let mut event = KeyEvent {
                key,
                modifier,
                line: &*line,
                ignore_default_handlers: false,
            };
            cb(&mut event);
            ignore = event.ignore_default_handlers;
        }

        let mut accepted = None;
        if !ignore {
            match key {
                Key::Backspace | CTRL_H => line.erase_n_previous(1),
                Key::Left => {
                    if modifier.contains(KeyModifier::ALT) {
                        line.move_to_left_word();
                    } else {
                        line.move_left();
                    }
                }
                Key::Right => {
                    if modifier.contains(KeyModifier::ALT) {
                        line.move_to_right_word();
                    } else {
                        line.move_right();
                    }
                }
                Key::Home | CTRL_A => line.move_home(),
                Key::End | CTRL_E => line.move_end(),
                Key::Up => self.history.previous(&mut line),
                Key::Down => self.history.next(&mut line),
                Key::Enter => {
                    accepted = Some(line.to_string());
                    line.clear();
                }
                // The empty-line EOF case never reaches dispatch
                CTRL_D => line.delete_rune_under_cursor(),
                CTRL_U => line.delete_to_beginning(),
                CTRL_K => line.delete_line(),
                CTRL_W => {
                    let n = line.count_to_left_word();
                    line.erase_n_previous(n);
                }
                // Clear-screen is the host application's job
                CTRL_L => {}
                _ => {
                    let mut replaced = false;
                    if let Some(complete) = self.auto_complete.as_mut() {
                        let (prefix, suffix) = line.split();
                        let byte_pos = prefix.len();
                        let full = prefix + &suffix;
                        if let Some((new_line, new_pos)) = complete(&full, byte_pos, key) {
                            // The hook speaks byte offsets; the buffer
                            // wants a rune index.
                            let pos = new_line
                                .char_indices()
                                .take_while(|(i, _)| *i < new_pos)
                                .count();
                            line.set(new_line.chars().collect(), pos);
                            replaced = true;
                        }
                    }
                    if !replaced && key.is_printable() && line.len() < self.max_line_length {
                        if let Key::Char(r) = key {
                            line.add_rune(r);
                        }
                    }
                }
            }
        }

        let event = KeyEvent {
            key,
            modifier,
            line: &*line,
            ignore_default_handlers: ignore,
        };
        observer(&event).map_err(ReadError::Io)?;
        if let Some(cb) = self.after_keypress.as_mut() {
            cb(&event);
        }

        Ok(accepted)
    }

    fn line_is_empty(&self) -> bool {
        self.read_lock().is_empty()
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, LineBuffer> {
        self.line.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A cloneable, read-only handle to a reader's line state.
///
/// Snapshots take the read lock; returned values are owned copies with no
/// aliasing into the editor.
#[derive(Clone)]
pub struct LineView {
    line: Arc<RwLock<LineBuffer>>,
}

impl LineView {
    pub(crate) fn from_shared(line: Arc<RwLock<LineBuffer>>) -> Self {
        LineView { line }
    }

    pub fn line_pos(&self) -> (String, usize) {
        let line = self.line.read().unwrap_or_else(PoisonError::into_inner);
        (line.to_string(), line.pos())
    }

    pub fn line(&self) -> String {
        self.line_pos().0
    }

    pub fn pos(&self) -> usize {
        self.line
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav_with(entries: &[&str]) -> HistoryNav {
        let mut nav = HistoryNav::new();
        for e in entries {
            nav.record(e.to_string());
        }
        nav
    }

    #[test]
    fn test_history_browse_saves_pending_line() {
        let mut nav = nav_with(&["first", "second"]);
        let mut line = LineBuffer::from("draft");

        nav.previous(&mut line);
        assert_eq!(line.to_string(), "second");
        assert_eq!(line.pos(), 6);

        nav.previous(&mut line);
        assert_eq!(line.to_string(), "first");

        // Walking past the oldest entry is a no-op
        nav.previous(&mut line);
        assert_eq!(line.to_string(), "first");

        nav.next(&mut line);
        assert_eq!(line.to_string(), "second");
        nav.next(&mut line);
        assert_eq!(line.to_string(), "draft");
        // Down from the draft does nothing
        nav.next(&mut line);
        assert_eq!(line.to_string(), "draft");
    }

    #[test]
    fn test_history_disabled_is_inert() {
        let mut nav = nav_with(&["first"]);
        nav.disabled = true;
        let mut line = LineBuffer::from("draft");
        nav.previous(&mut line);
        assert_eq!(line.to_string(), "draft");
    }

    #[test]
    fn test_record_resets_browse_index() {
        let mut nav = nav_with(&["first"]);
        let mut line = LineBuffer::new();
        nav.previous(&mut line);
        assert_eq!(nav.index, 0);
        nav.record("second".to_string());
        assert_eq!(nav.index, -1);
        assert_eq!(nav.ring.nth_previous(0), Some("second"));
    }
}
