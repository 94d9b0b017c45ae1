//! Core primitives for terminal line input.
//!
//! This crate holds the pure pieces of termline: key identifiers and the
//! byte-sequence parser that recognizes them, the edited line value, the
//! history ring, and the horizontal scroller. Nothing here performs I/O;
//! the `termline` crate wires these up to real byte streams.

pub mod history;
pub mod key;
pub mod key_parser;
pub mod line;
pub mod scroller;

pub use history::{HistoryRing, DEFAULT_HISTORY_CAPACITY};
pub use key::{Key, KeyModifier, Keypress};
pub use key_parser::parse_key;
pub use line::LineBuffer;
pub use scroller::{Scroller, DEFAULT_SCROLL_BY};
