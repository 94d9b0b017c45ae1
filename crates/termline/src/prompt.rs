//! Prompt rendering with minimal terminal output.
//!
//! [`Prompt`] pairs a [`Reader`] with a redraw engine that keeps the
//! screen in sync with the edited line. After each applied keypress it
//! asks the scroller what should be visible, diffs that against what it
//! last wrote, and emits only the cursor motion and runes needed to
//! reconcile the two. The only control sequences it ever writes are
//! `ESC [ n C` / `ESC [ n D` cursor moves and a final CRLF.

use std::io::{self, Read, Write};

use termline_core::key::Key;
use termline_core::{LineBuffer, Scroller};

use crate::error::ReadResult;
use crate::reader::{KeyEvent, LineView, ReadOutcome, Reader, DEFAULT_MAX_LINE_LENGTH};

/// Line terminator written after each completed read.
pub const CRLF: &[u8] = b"\r\n";

/// Index of the first position where two rune sequences differ, or `None`
/// when they are identical.
fn runes_differ(a: &[char], b: &[char]) -> Option<usize> {
    let common = a.len().min(b.len());
    for i in 0..common {
        if a[i] != b[i] {
            return Some(i);
        }
    }
    if a.len() != b.len() {
        return Some(common);
    }
    None
}

/// The output half of the engine: the sink plus the cursor column we last
/// left it at. Kept separate from the scroller so redraws can borrow both
/// at once.
struct CursorWriter<W> {
    out: W,
    /// Cursor column relative to the start of the input area.
    col: usize,
    /// Reusable buffer for cursor-move sequences; the `ESC [` prefix
    /// stays put so each move only appends the count and direction.
    seq: Vec<u8>,
}

impl<W: Write> CursorWriter<W> {
    fn new(out: W) -> Self {
        CursorWriter {
            out,
            col: 0,
            seq: b"\x1b[".to_vec(),
        }
    }

    /// Emit the shortest `ESC [ n C` / `ESC [ n D` that brings the cursor
    /// to `target`. No output when already there.
    fn move_to(&mut self, target: usize) -> io::Result<()> {
        let dx = target as isize - self.col as isize;
        if dx == 0 {
            return Ok(());
        }

        let (count, dir) = if dx > 0 {
            (dx as usize, b'C')
        } else {
            (dx.unsigned_abs(), b'D')
        };

        self.seq.truncate(2);
        if count == 1 {
            self.seq.push(dir);
        } else if count < 10 {
            self.seq.push(b'0' + count as u8);
            self.seq.push(dir);
        } else {
            write!(&mut self.seq, "{count}")?;
            self.seq.push(dir);
        }

        self.out.write_all(&self.seq)?;
        self.col = target;
        Ok(())
    }
}

/// Redraw state for one prompt: what's on screen and how to update it.
struct DrawEngine<W> {
    prompt: Vec<u8>,
    /// Runes we believe the input area currently shows.
    last_output: Vec<char>,
    scroller: Scroller,
    cursor: CursorWriter<W>,
}

impl<W: Write> DrawEngine<W> {
    /// Print the prompt and forget anything previously drawn.
    fn begin(&mut self) -> io::Result<()> {
        self.last_output.clear();
        self.cursor.col = 0;
        self.scroller.reset();
        self.cursor.out.write_all(&self.prompt)?;
        self.cursor.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.cursor.out.write_all(CRLF)?;
        self.cursor.out.flush()
    }

    /// Write the smallest delta that brings the screen in sync with
    /// `line`, then park the cursor at its logical position.
    fn draw(&mut self, line: &LineBuffer) -> io::Result<()> {
        let (next, cursor_col) = self.scroller.filter(line);

        if let Some(index) = runes_differ(&self.last_output, next) {
            self.cursor.move_to(index)?;

            // Rewrite from the first difference, padded with spaces to
            // blot out any leftover tail of the previous output.
            let mut tail: String = next[index..].iter().collect();
            for _ in next.len()..self.last_output.len() {
                tail.push(' ');
            }
            let written = next.len() - index + self.last_output.len().saturating_sub(next.len());
            self.cursor.out.write_all(tail.as_bytes())?;
            self.cursor.col += written;

            self.last_output.clear();
            self.last_output.extend_from_slice(next);
        }

        self.cursor.move_to(cursor_col)?;
        self.cursor.out.flush()
    }
}

/// A [`Reader`] that also writes: prints its prompt, echoes edits with
/// minimal redraws, and scrolls long lines inside a fixed input width.
///
/// # Examples
///
/// ```no_run
/// use termline::Prompt;
///
/// // Stdin must already be in raw mode.
/// let mut prompt = Prompt::<std::io::Stdin, std::io::Stdout>::builder()
///     .with_prompt("> ")
///     .with_input_width(40)
///     .build(std::io::stdin(), std::io::stdout());
///
/// while let Ok(outcome) = prompt.read_line() {
///     println!("got: {}\r", outcome.line);
/// }
/// ```
pub struct Prompt<R, W> {
    reader: Reader<R>,
    engine: DrawEngine<W>,
}

impl<R: Read, W: Write> Prompt<R, W> {
    /// A prompt reading from `input` and drawing to `output` with default
    /// options.
    pub fn new(input: R, output: W, prompt: &str) -> Self {
        Prompt::<R, W>::builder().with_prompt(prompt).build(input, output)
    }

    pub fn builder() -> PromptBuilder {
        PromptBuilder::new()
    }

    /// Change the prompt string; takes effect on the next `read_line`.
    pub fn set_prompt(&mut self, prompt: &str) {
        self.engine.prompt = prompt.as_bytes().to_vec();
    }

    /// Scroll the input area horizontally once the line exceeds `width`
    /// runes. Zero disables scrolling.
    pub fn set_input_width(&mut self, width: usize) {
        self.engine.scroller.set_input_width(width);
    }

    /// Cap the line length for both the editor and the scroller.
    pub fn set_max_line_length(&mut self, len: usize) {
        self.reader.set_max_line_length(len);
        self.engine.scroller.set_max_line_length(len);
    }

    /// Print the prompt, interactively read one line, and finish it with
    /// CRLF.
    pub fn read_line(&mut self) -> ReadResult<ReadOutcome> {
        let engine = &mut self.engine;
        engine.begin()?;
        let result = self.reader.read_line_with(|event| {
            // The accepted line was already cleared; there is nothing to
            // draw for Enter itself.
            if event.key != Key::Enter {
                engine.draw(event.line)?;
            }
            Ok(())
        });
        let crlf = engine.finish();
        let outcome = result?;
        crlf?;
        Ok(outcome)
    }

    /// Read a line without echoing it or recording history.
    pub fn read_password(&mut self) -> ReadResult<ReadOutcome> {
        self.engine.begin()?;
        let result = self.reader.read_password();
        let crlf = self.engine.finish();
        let outcome = result?;
        crlf?;
        Ok(outcome)
    }

    /// The wrapped line editor.
    pub fn reader(&self) -> &Reader<R> {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut Reader<R> {
        &mut self.reader
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.engine.cursor.out
    }

    pub fn line_pos(&self) -> (String, usize) {
        self.reader.line_pos()
    }

    pub fn line_view(&self) -> LineView {
        self.reader.line_view()
    }

    /// See [`Reader::set_after_keypress`]. The observer runs after the
    /// prompt has redrawn for that keypress.
    pub fn set_after_keypress<F>(&mut self, observer: F)
    where
        F: FnMut(&KeyEvent<'_>) + Send + 'static,
    {
        self.reader.set_after_keypress(observer);
    }

    /// See [`Reader::set_on_keypress`].
    pub fn set_on_keypress<F>(&mut self, hook: F)
    where
        F: FnMut(&mut KeyEvent<'_>) + Send + 'static,
    {
        self.reader.set_on_keypress(hook);
    }

    /// See [`Reader::set_auto_complete`].
    pub fn set_auto_complete<F>(&mut self, complete: F)
    where
        F: FnMut(&str, usize, Key) -> Option<(String, usize)> + Send + 'static,
    {
        self.reader.set_auto_complete(complete);
    }
}

/// Configuration for a [`Prompt`], in the usual builder shape.
pub struct PromptBuilder {
    prompt: String,
    input_width: usize,
    max_line_length: usize,
    scroll_by: Option<usize>,
    left_overflow: Option<char>,
    right_overflow: Option<char>,
    no_history: bool,
    force_parse: bool,
}

impl PromptBuilder {
    pub fn new() -> Self {
        PromptBuilder {
            prompt: String::new(),
            input_width: 0,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            scroll_by: None,
            left_overflow: Some('…'),
            right_overflow: Some('…'),
            no_history: false,
            force_parse: false,
        }
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    /// Scroll the input once the line is wider than this many runes.
    pub fn with_input_width(mut self, width: usize) -> Self {
        self.input_width = width;
        self
    }

    pub fn with_max_line_length(mut self, len: usize) -> Self {
        self.max_line_length = len;
        self
    }

    pub fn with_scroll_by(mut self, step: usize) -> Self {
        self.scroll_by = Some(step);
        self
    }

    /// Glyphs marking clipped content at the viewport edges; `None`
    /// disables either side.
    pub fn with_overflow(mut self, left: Option<char>, right: Option<char>) -> Self {
        self.left_overflow = left;
        self.right_overflow = right;
        self
    }

    pub fn with_no_history(mut self, no_history: bool) -> Self {
        self.no_history = no_history;
        self
    }

    /// Commit ambiguous escape sequences instead of waiting; see
    /// [`termline_core::parse_key`].
    pub fn with_force_parse(mut self, force: bool) -> Self {
        self.force_parse = force;
        self
    }

    pub fn build<R: Read, W: Write>(self, input: R, output: W) -> Prompt<R, W> {
        let mut reader = Reader::new(input);
        reader.set_max_line_length(self.max_line_length);
        reader.set_no_history(self.no_history);
        reader.set_force_parse(self.force_parse);

        let mut scroller = Scroller::new();
        scroller.set_input_width(self.input_width);
        scroller.set_max_line_length(self.max_line_length);
        if let Some(step) = self.scroll_by {
            scroller.set_scroll_by(step);
        }
        scroller.set_left_overflow(self.left_overflow);
        scroller.set_right_overflow(self.right_overflow);

        Prompt {
            reader,
            engine: DrawEngine {
                prompt: self.prompt.into_bytes(),
                last_output: Vec::new(),
                scroller,
                cursor: CursorWriter::new(output),
            },
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
