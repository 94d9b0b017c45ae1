//! Low-level keypress reader over a raw byte source.

use std::io::{self, Read};

use termline_core::key::{self, Keypress};
use termline_core::parse_key;

/// Size of the staging buffer. A single read can return at most this many
/// bytes; longer bursts are consumed across multiple keypresses.
const STAGING_LEN: usize = 256;

/// Reads raw keypresses from a byte stream, usually stdin or an ssh
/// channel. The terminal behind the stream must already be in raw mode;
/// this type never touches terminal settings.
///
/// Partial escape sequences are kept across calls, so a sequence split
/// over several reads still parses as one keypress.
pub struct KeyReader<R> {
    input: R,

    /// When set, the parser won't wait for ambiguous sequences to finish,
    /// which is the only way a bare Escape or Alt+[ press can be
    /// detected.
    force_parse: bool,

    /// Staging buffer; `buf[..filled]` holds bytes read but not yet
    /// consumed.
    buf: [u8; STAGING_LEN],
    filled: usize,

    /// Bytes handed out with the previous keypress. The shift is deferred
    /// to the start of the next call so the returned `raw` slice stays
    /// valid in between.
    pending: usize,

    /// A prior parse saw an incomplete UTF-8 prefix and we owe the parser
    /// more bytes.
    mid_rune: bool,
}

impl<R: Read> KeyReader<R> {
    pub fn new(input: R) -> Self {
        KeyReader {
            input,
            force_parse: false,
            buf: [0; STAGING_LEN],
            filled: 0,
            pending: 0,
            mid_rune: false,
        }
    }

    pub fn force_parse(&self) -> bool {
        self.force_parse
    }

    /// Commit ambiguous prefixes instead of waiting for more bytes. See
    /// [`termline_core::parse_key`].
    pub fn set_force_parse(&mut self, force: bool) {
        self.force_parse = force;
    }

    /// Read the next keypress, blocking on the underlying source only
    /// when the staging buffer has no complete sequence.
    ///
    /// The returned [`Keypress`] may be the zero-sized rune error, which
    /// means a partial sequence is staged; calling again will read more
    /// bytes. A source that returns no bytes surfaces as
    /// [`io::ErrorKind::UnexpectedEof`].
    pub fn read_keypress(&mut self) -> io::Result<Keypress<'_>> {
        // Shift out what the previous call consumed
        if self.pending > 0 {
            self.buf.copy_within(self.pending..self.filled, 0);
            self.filled -= self.pending;
            self.pending = 0;
        }

        if self.mid_rune || self.filled == 0 {
            let n = self.input.read(&mut self.buf[self.filled..])?;
            if n == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            self.mid_rune = false;
            self.filled += n;
        }

        let (key, size, modifier) = parse_key(&self.buf[..self.filled], self.force_parse);

        // A zero-length rune error means a partial rune or sequence; the
        // next call has to read more bytes before reparsing.
        if size == 0 && key == key::RUNE_ERROR {
            self.mid_rune = true;
        }

        self.pending = size;

        Ok(Keypress {
            key,
            modifier,
            size,
            raw: &self.buf[..size],
        })
    }
}
