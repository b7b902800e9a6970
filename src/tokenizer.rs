//! Raw argument vector tokenizer
//!
//! Turns the process arguments into an ordered map of lower-cased keys to
//! raw string values. Accepted forms:
//!
//! - `-key value`, `--key value`, `/key value` (space separated)
//! - `-key=value`, `--key:value`, `/key:value` (inline)
//! - `-flag` with no value, recorded as `"true"`
//!
//! Each argument is split at most twice on a leading key marker (`-`, `--`,
//! `/`) or a separator (`=`, `:`). A bare fragment with no key waiting for it
//! is dropped. The first occurrence of a key wins.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// Value recorded for a key that never received one.
pub const FLAG_VALUE: &str = "true";

/// Keys that request the help screen.
pub const HELP_KEYS: [&str; 3] = ["?", "help", "h"];

const QUOTES: [char; 2] = ['\'', '"'];

fn splitter() -> &'static Regex {
    static SPLITTER: OnceLock<Regex> = OnceLock::new();
    SPLITTER.get_or_init(|| Regex::new(r"^-{1,2}|^/|=|:").expect("argument splitter pattern is valid"))
}

/// Ordered mapping from lower-cased key to raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    entries: IndexMap<String, String>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key = value` unless the key is already present.
    ///
    /// Returns `false` when an earlier value was kept.
    pub fn insert_first(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            trace!(key = %key, "ignoring duplicate argument");
            return false;
        }
        self.entries.insert(key, value.into());
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when any of `?`, `help` or `h` was supplied.
    pub fn wants_help(&self) -> bool {
        HELP_KEYS.iter().any(|key| self.contains_key(key))
    }
}

/// Strips one quote character from each end of `value` when both ends are quotes.
pub fn unquote(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if QUOTES.contains(&first) && QUOTES.contains(&last) => {
            &value[first.len_utf8()..value.len() - last.len_utf8()]
        }
        _ => value,
    }
}

/// Tokenizes a raw argument vector.
///
/// # Examples
///
/// ```
/// use azure_events::tokenizer::tokenize;
///
/// let tokens = tokenize(["-Directory", "contoso", "/emails:a@x.com", "-verbose"]);
/// assert_eq!(tokens.get("directory"), Some("contoso"));
/// assert_eq!(tokens.get("emails"), Some("a@x.com"));
/// assert_eq!(tokens.get("verbose"), Some("true"));
/// ```
pub fn tokenize<I, S>(args: I) -> TokenMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = TokenMap::new();
    let mut pending: Option<String> = None;

    for arg in args {
        let arg = arg.as_ref();
        let parts: Vec<&str> = splitter().splitn(arg, 3).collect();

        match parts.as_slice() {
            [value] => match pending.take() {
                Some(key) => {
                    tokens.insert_first(key, unquote(value));
                }
                None => trace!(fragment = %value, "dropping value with no key waiting for it"),
            },
            [_, key] => {
                if let Some(waiting) = pending.take() {
                    tokens.insert_first(waiting, FLAG_VALUE);
                }
                pending = Some(key.to_lowercase());
            }
            [_, key, value] => {
                if let Some(waiting) = pending.take() {
                    tokens.insert_first(waiting, FLAG_VALUE);
                }
                tokens.insert_first(key.to_lowercase(), unquote(value));
            }
            _ => {}
        }
    }

    if let Some(waiting) = pending {
        tokens.insert_first(waiting, FLAG_VALUE);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'a b'"), "a b");
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("'mixed\""), "mixed");
        assert_eq!(unquote("'open"), "'open");
        assert_eq!(unquote("close\""), "close\"");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn test_splitter_parts() {
        let parts = |s: &'static str| splitter().splitn(s, 3).collect::<Vec<_>>();

        assert_eq!(parts("value"), vec!["value"]);
        assert_eq!(parts("-key"), vec!["", "key"]);
        assert_eq!(parts("--key"), vec!["", "key"]);
        assert_eq!(parts("/key:value"), vec!["", "key", "value"]);
        assert_eq!(parts("--key=a:b"), vec!["", "key", "a:b"]);
        // Markers only count at the start of the argument
        assert_eq!(parts("a-b/c"), vec!["a-b/c"]);
    }
}
