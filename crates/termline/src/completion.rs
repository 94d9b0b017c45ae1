//! Word completion over a fixed candidate list.
//!
//! [`StaticCompleter`] adapts a list of words to the reader's
//! auto-complete hook: on the trigger key (Tab by default) it looks at
//! the word being typed under the cursor and either completes it
//! outright or extends it to the longest unambiguous prefix. Anything
//! fancier — filesystem paths, live command sets — belongs in a custom
//! hook; this type covers the common "fixed command vocabulary" case.

use termline_core::key::{Key, TAB};

/// Completes the word before the cursor from a static word list.
///
/// # Examples
///
/// ```
/// use termline::StaticCompleter;
///
/// let completer = StaticCompleter::from_words(["help", "history", "quit"]);
/// // Unambiguous prefix completes fully, with a trailing space
/// assert_eq!(
///     completer.complete("qu", 2, termline::key::TAB),
///     Some(("quit ".to_string(), 5)),
/// );
/// // Nothing unambiguous to add: the key falls through to the editor
/// assert_eq!(completer.complete("h", 1, termline::key::TAB), None);
/// ```
#[derive(Debug, Clone)]
pub struct StaticCompleter {
    words: Vec<String>,
    trigger: Key,
}

impl StaticCompleter {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticCompleter {
            words: words.into_iter().map(Into::into).collect(),
            trigger: TAB,
        }
    }

    /// Use a different trigger key than Tab.
    pub fn with_trigger(mut self, trigger: Key) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// All candidates matching the word currently under the cursor.
    pub fn matches(&self, line: &str, pos: usize) -> Vec<&str> {
        let (_, word, _) = split_word(line, pos);
        self.words
            .iter()
            .filter(|w| w.starts_with(word))
            .map(String::as_str)
            .collect()
    }

    /// The auto-complete hook body: pass through to
    /// [`Reader::set_auto_complete`](crate::Reader::set_auto_complete)
    /// as `move |l, p, k| completer.complete(l, p, k)`.
    ///
    /// `pos` is a byte offset into `line`; the returned position is a
    /// byte offset into the returned line, per the hook contract.
    pub fn complete(&self, line: &str, pos: usize, key: Key) -> Option<(String, usize)> {
        if key != self.trigger {
            return None;
        }

        let (before, word, after) = split_word(line, pos);
        let matches: Vec<&str> = self
            .words
            .iter()
            .filter(|w| w.starts_with(word))
            .map(String::as_str)
            .collect();

        let replacement = match matches.as_slice() {
            [] => return None,
            // A unique match completes the word and starts the next one
            [only] => format!("{only} "),
            // Otherwise grow the word to the longest shared prefix
            many => {
                let prefix = longest_common_prefix(many);
                if prefix.len() <= word.len() {
                    return None;
                }
                prefix.to_string()
            }
        };

        let new_pos = before.len() + replacement.len();
        Some((format!("{before}{replacement}{after}"), new_pos))
    }
}

/// Split `line` at the space-delimited word containing byte offset
/// `pos`: everything before the word, the part of the word up to the
/// cursor, and everything from the cursor on.
fn split_word(line: &str, pos: usize) -> (&str, &str, &str) {
    let pos = pos.min(line.len());
    let head = &line[..pos];
    let word_start = head.rfind(' ').map(|i| i + 1).unwrap_or(0);
    (&line[..word_start], &line[word_start..pos], &line[pos..])
}

fn longest_common_prefix<'a>(words: &[&'a str]) -> &'a str {
    let mut prefix = words[0];
    for word in &words[1..] {
        let shared = prefix
            .char_indices()
            .zip(word.chars())
            .find(|((_, a), b)| a != b)
            .map(|((i, _), _)| i)
            .unwrap_or_else(|| prefix.len().min(word.len()));
        prefix = &prefix[..shared];
    }
    prefix
}
