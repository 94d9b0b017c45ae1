//! Convenient re-exports for typical usage.
//!
//! ```
//! use termline::prelude::*;
//! ```

pub use crate::abs_prompt::{visual_length, AbsPrompt};
pub use crate::completion::StaticCompleter;
pub use crate::error::{ReadError, ReadResult};
pub use crate::key_reader::KeyReader;
pub use crate::prompt::{Prompt, PromptBuilder};
pub use crate::reader::{KeyEvent, LineView, ReadOutcome, Reader};
pub use termline_core::key::{Key, KeyModifier, Keypress};
pub use termline_core::{HistoryRing, LineBuffer, Scroller};
