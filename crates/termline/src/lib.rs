//! # Termline: terminal line input
//!
//! Termline reads edited lines of input from a raw-mode byte stream and
//! keeps the screen in sync with minimal terminal output. It is organized
//! in two layers:
//!
//! - **Core primitives** (`termline-core`, re-exported here): key codes,
//!   the escape-sequence parser, the line buffer, history ring, and
//!   scroller. Pure values, no I/O.
//! - **The interactive layer** (this crate): [`KeyReader`] turns a byte
//!   source into keypresses, [`Reader`] turns keypresses into edited
//!   lines, and [`Prompt`] / [`AbsPrompt`] draw the result.
//!
//! The library never toggles terminal modes itself: the caller puts the
//! terminal into raw mode (or hands over an ssh channel that already is)
//! and provides plain `Read` / `Write` endpoints.
//!
//! ## Quick start
//!
//! ```no_run
//! use termline::Prompt;
//!
//! let mut prompt = Prompt::new(std::io::stdin(), std::io::stdout(), "> ");
//! loop {
//!     match prompt.read_line() {
//!         Ok(outcome) => println!("read: {}\r", outcome.line),
//!         Err(err) => {
//!             // Ctrl-D on an empty line, or the stream went away
//!             eprintln!("{err}\r");
//!             break;
//!         }
//!     }
//! }
//! ```
//!
//! ## Separated reading and rendering
//!
//! [`Reader`] on its own stores what the user is typing without writing
//! anything, so applications rendering other live data can snapshot the
//! line from a render thread via [`Reader::line_view`] and draw it with
//! an [`AbsPrompt`] wherever it belongs on screen.

pub mod abs_prompt;
pub mod completion;
pub mod debug;
pub mod error;
pub mod key_reader;
pub mod prelude;
pub mod prompt;
pub mod reader;

// Re-export the core primitives the way callers expect to use them.
pub use termline_core::key::{self, Key, KeyModifier, Keypress};
pub use termline_core::{parse_key, HistoryRing, LineBuffer, Scroller};

pub use abs_prompt::{visual_length, AbsPrompt};
pub use completion::StaticCompleter;
pub use error::{ReadError, ReadResult};
pub use key_reader::KeyReader;
pub use prompt::{Prompt, PromptBuilder, CRLF};
pub use reader::{KeyEvent, LineView, ReadOutcome, Reader, DEFAULT_MAX_LINE_LENGTH};
