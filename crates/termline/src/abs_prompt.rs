//! Absolute-position prompt rendering.
//!
//! [`AbsPrompt`] draws the prompt and line at a fixed screen location with
//! `ESC [ y ; x H` positioning instead of relative cursor moves. It holds
//! only a [`LineView`] into the editor, so a render thread can call
//! [`AbsPrompt::write_changes`] on its own schedule while another thread
//! sits in `read_line`. That makes it the fit for applications redrawing
//! other live data alongside the input line.

use std::io::{self, Write};

use crate::reader::LineView;

/// Number of visible glyphs in a string.
///
/// Counts every rune as one cell and skips CSI escape sequences (anything
/// from `ESC` up to the next ASCII letter), which is what makes colored
/// prompts measure correctly. It does not know about wide glyphs, and it
/// ignores cursor-motion sequences rather than interpreting them; e.g.
/// `ESC [ D` counts as zero glyphs even though it moves the cursor.
pub fn visual_length(s: &str) -> usize {
    let mut in_escape_seq = false;
    let mut length = 0;

    for r in s.chars() {
        if in_escape_seq {
            if r.is_ascii_alphabetic() {
                in_escape_seq = false;
            }
        } else if r == '\x1b' {
            in_escape_seq = true;
        } else {
            length += 1;
        }
    }

    length
}

/// A prompt pinned to fixed screen coordinates.
///
/// Unlike [`Prompt`](crate::Prompt), this type does not drive the reader;
/// it only watches line state through a [`LineView`] and draws on demand.
/// Build one with `AbsPrompt::new(reader.line_view(), out, "> ")` and call
/// a `write_*` method whenever the screen should catch up.
pub struct AbsPrompt<W> {
    view: LineView,
    out: W,
    prompt: String,
    /// 1-based screen coordinates of the prompt.
    x: usize,
    y: usize,
    /// Column where user input starts: `x` plus the prompt's visual
    /// length.
    input_x: usize,
    /// Line and cursor as last drawn.
    line: String,
    pos: usize,
    prompted: bool,
}

impl<W: Write> AbsPrompt<W> {
    pub fn new(view: LineView, out: W, prompt: &str) -> Self {
        let mut p = AbsPrompt {
            view,
            out,
            prompt: String::new(),
            x: 1,
            y: 1,
            input_x: 1,
            line: String::new(),
            pos: 0,
            prompted: false,
        };
        p.set_prompt(prompt);
        p
    }

    /// Change the prompt string. Don't call this mid-read.
    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
        self.input_x = self.x + visual_length(&self.prompt);
    }

    /// Move the prompt to 0-based screen coordinates. Calling this while
    /// a read is in progress will leave stale output behind.
    pub fn set_location(&mut self, x: usize, y: usize) {
        self.x = x + 1;
        self.input_x = self.x + visual_length(&self.prompt);
        self.y = y + 1;
    }

    /// Whether the line or cursor moved since the last write.
    pub fn need_write(&self) -> bool {
        let (line, pos) = self.view.line_pos();
        line != self.line || pos != self.pos
    }

    /// Unconditionally rewrite the prompt and the whole line.
    pub fn write_all(&mut self) -> io::Result<()> {
        let (line, pos) = self.view.line_pos();

        let text = format!("{}{}", self.prompt, line);
        self.print_at(self.x, self.y, &text)?;

        let prev_len = self.line.chars().count();
        let new_len = line.chars().count();
        self.pos = new_len;
        if prev_len > new_len {
            self.out.write_all(" ".repeat(prev_len - new_len).as_bytes())?;
            self.pos += prev_len - new_len;
        }
        self.line = line;

        if self.pos != pos {
            self.pos = pos;
            self.print_cursor_movement()?;
        }
        self.out.flush()
    }

    /// Write only what changed: the prompt if it hasn't been printed yet,
    /// the line if its text moved, the cursor if its position did.
    pub fn write_changes(&mut self) -> io::Result<()> {
        let (line, pos) = self.view.line_pos();

        if !self.prompted {
            self.print_prompt()?;
            self.prompted = true;
        }

        if self.line != line {
            let prev_len = self.line.chars().count();
            self.line = line;
            self.print_line()?;

            let new_len = self.line.chars().count();
            if prev_len > new_len {
                self.out.write_all(" ".repeat(prev_len - new_len).as_bytes())?;
                self.pos += prev_len - new_len;
            }
        }

        if self.pos != pos {
            self.pos = pos;
            self.print_cursor_movement()?;
        }
        self.out.flush()
    }

    /// Like [`AbsPrompt::write_changes`] but leaves the cursor wherever
    /// the last write put it, for applications that park the cursor
    /// themselves after drawing other screen regions.
    pub fn write_changes_no_cursor(&mut self) -> io::Result<()> {
        let (line, pos) = self.view.line_pos();
        self.pos = pos;

        if !self.prompted {
            self.print_prompt()?;
            self.prompted = true;
        }

        if self.line != line {
            let prev_len = self.line.chars().count();
            self.line = line;
            self.print_line()?;

            let new_len = self.line.chars().count();
            if prev_len > new_len {
                self.out.write_all(" ".repeat(prev_len - new_len).as_bytes())?;
                self.pos += prev_len - new_len;
            }
        }
        self.out.flush()
    }

    /// Print the prompt string at its screen location.
    pub fn print_prompt(&mut self) -> io::Result<()> {
        let prompt = self.prompt.clone();
        self.print_at(self.x, self.y, &prompt)?;
        self.pos = 0;
        Ok(())
    }

    /// Print the stored line just after the prompt.
    pub fn print_line(&mut self) -> io::Result<()> {
        let line = self.line.clone();
        self.print_at(self.input_x, self.y, &line)?;
        self.pos = self.line.chars().count();
        Ok(())
    }

    /// Reposition the terminal cursor to match the editor's cursor.
    pub fn print_cursor_movement(&mut self) -> io::Result<()> {
        self.pos = self.view.pos();
        self.print_at(self.input_x + self.pos, self.y, "")
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    fn print_at(&mut self, x: usize, y: usize, s: &str) -> io::Result<()> {
        write!(self.out, "\x1b[{y};{x}H{s}")
    }
}
