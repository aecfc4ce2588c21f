//! Compiles a timestamp format string into a matcher for stamped block text.

use regex::Regex;

use crate::core::format_tokens::{tokenize, FormatPiece};

/// Recognises a rendered timestamp at the start of a string.
///
/// Built by [`compile_matcher`]. The compiled expression is anchored at the
/// start and absorbs whitespace on both sides of the timestamp, so
/// `"  14:05  Buy milk"` matches `"  14:05  "` for the format `HH:mm`.
#[derive(Debug, Clone)]
pub struct TimestampMatcher {
    regex: Option<Regex>,
}

/// Builds the matcher for `format`.
///
/// Tokens become their regex fragments; everything else, including bracketed
/// literals, is escaped and matched verbatim. This never fails: a format the
/// regex engine rejects yields a matcher that matches nothing.
#[must_use]
pub fn compile_matcher(format: &str) -> TimestampMatcher {
    let pattern = matcher_source(format);
    let regex = match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::warn!("timestamp format {format:?} did not compile, stamps will not be detected: {e}");
            None
        }
    };
    TimestampMatcher { regex }
}

/// The regex source for `format`, exposed for diagnostics.
#[must_use]
pub fn matcher_source(format: &str) -> String {
    let mut body = String::new();
    for piece in tokenize(format) {
        match piece {
            FormatPiece::Token(token) => body.push_str(&token.regex_fragment()),
            FormatPiece::Literal(text) => body.push_str(&regex::escape(&text)),
        }
    }
    format!(r"^\s*(?:{body})\s*")
}

impl TimestampMatcher {
    /// Returns `true` if `text` starts with a timestamp.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Returns the matched prefix, including the whitespace around it.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.as_ref()?.find(text).map(|m| m.as_str())
    }

    /// Returns `text` with the leading timestamp removed and the remainder
    /// trimmed, or `None` if `text` is not stamped.
    #[must_use]
    pub fn strip<'t>(&self, text: &'t str) -> Option<&'t str> {
        let m = self.regex.as_ref()?.find(text)?;
        Some(text[m.end()..].trim())
    }
}
