//! # Argument-String Merge
//!
//! Runtime configurations carry their system properties as one free-form
//! string shared with unrelated settings, for example:
//!
//! ```text
//! -Xmx1024m -Dcom.ibm.mq.cfg.TCP.Connect_Timeout=30 -verbose:gc
//! ```
//!
//! This module merges a single `-D<key>=<value>` setting into such a string.
//! The merge is a pure text transformation:
//!
//! - If a token for the key exists, only its value is replaced. Every byte
//!   before and after the value stays as it was.
//! - Otherwise the token is appended, separated by a single space.
//!
//! Running the merge twice with the same value yields the same text, so the
//! caller can compare input and output to decide whether a write is needed.
//!
//! ## Matching
//!
//! A token only matches when it stands on its own: `-D` must begin the text
//! or follow whitespace or a quote, the key is matched literally (so `.` in
//! `com.ibm.mq` is not a wildcard) and the value must run up to the next
//! whitespace, quote or the end of the text. `-Dfoo.bar=1` therefore never
//! matches key `bar`, and `-Dx=12abc` never matches key `x` under
//! [`ValueSyntax::Digits`]. A quoted token such as `"-Dx=30"` is matched and
//! its quotes are kept.
//!
//! ## Example
//!
//! ```
//! use ra_tuner::merge::merge_argument;
//!
//! let merged = merge_argument("pre -Dx.y=5 post", "x.y", "7").unwrap();
//! assert_eq!(merged, "pre -Dx.y=7 post");
//!
//! let appended = merge_argument("-Xmx512m", "x.y", "10").unwrap();
//! assert_eq!(appended, "-Xmx512m -Dx.y=10");
//! ```

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which values an existing token may carry for it to be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSyntax {
    /// One or more ASCII decimal digits. Tokens with any other value are
    /// treated as absent.
    #[default]
    Digits,
    /// Any run of characters other than whitespace and quotes, including
    /// an empty value.
    Token,
}

impl ValueSyntax {
    fn pattern(self) -> &'static str {
        match self {
            ValueSyntax::Digits => "[0-9]+",
            ValueSyntax::Token => r#"[^\s"']*"#,
        }
    }

    /// Whether `value`, once written, would be recognised again by this
    /// syntax. Values that fail this check would be appended on every run.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            ValueSyntax::Digits => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            ValueSyntax::Token => !value
                .chars()
                .any(|c| c.is_whitespace() || c == '"' || c == '\''),
        }
    }
}

impl fmt::Display for ValueSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSyntax::Digits => f.write_str("digits"),
            ValueSyntax::Token => f.write_str("token"),
        }
    }
}

impl FromStr for ValueSyntax {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "digits" => Ok(ValueSyntax::Digits),
            "token" => Ok(ValueSyntax::Token),
            other => Err(format!(
                "unknown value syntax '{}' (expected 'digits' or 'token')",
                other
            )),
        }
    }
}

/// A compiled matcher for one `-D<key>=<value>` setting.
#[derive(Debug, Clone)]
pub struct ArgumentToken {
    key: String,
    pattern: Regex,
}

impl ArgumentToken {
    /// Compile a matcher for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] when the key is empty or contains
    /// whitespace or `=`, since such a key cannot form a single token.
    pub fn new(key: &str, syntax: ValueSyntax) -> Result<Self> {
        if key.is_empty() || key.contains('=') || key.chars().any(char::is_whitespace) {
            return Err(Error::ConfigParse {
                message: format!("invalid argument key '{}'", key),
                hint: Some("keys must be non-empty and contain no whitespace or '='".to_string()),
            });
        }

        let pattern = Regex::new(&format!(
            r#"(?:^|[\s"'])-D{}=(?P<value>{})(?:[\s"']|$)"#,
            regex::escape(key),
            syntax.pattern()
        ))?;

        Ok(Self {
            key: key.to_string(),
            pattern,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Byte range of the value of the first matching token, if any.
    pub fn find_value(&self, text: &str) -> Option<Range<usize>> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.name("value"))
            .map(|m| m.range())
    }

    /// The value currently set for this key, if a matching token exists.
    pub fn current_value<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.find_value(text).map(|range| &text[range])
    }

    /// Render the token for `value`, e.g. `-Dkey=value`.
    pub fn render(&self, value: &str) -> String {
        format!("-D{}={}", self.key, value)
    }

    /// Merge `value` into `text`.
    ///
    /// The returned string equals `text` when the token is already present
    /// with the same value.
    pub fn merge(&self, text: &str, value: &str) -> String {
        match self.find_value(text) {
            Some(range) => {
                let mut merged = String::with_capacity(text.len() - range.len() + value.len());
                merged.push_str(&text[..range.start]);
                merged.push_str(value);
                merged.push_str(&text[range.end..]);
                merged
            }
            None => {
                let token = self.render(value);
                let mut merged = String::with_capacity(text.len() + token.len() + 1);
                merged.push_str(text);
                if !text.is_empty() && !text.ends_with(char::is_whitespace) {
                    merged.push(' ');
                }
                merged.push_str(&token);
                merged
            }
        }
    }
}

/// Merge a numeric `-D<key>=<value>` setting into an argument string.
///
/// Shorthand for [`ArgumentToken::new`] with [`ValueSyntax::Digits`]
/// followed by [`ArgumentToken::merge`].
pub fn merge_argument(text: &str, key: &str, value: &str) -> Result<String> {
    Ok(ArgumentToken::new(key, ValueSyntax::Digits)?.merge(text, value))
}
