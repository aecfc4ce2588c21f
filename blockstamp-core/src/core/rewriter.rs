//! The stamping rule: decides whether a block gets a fresh timestamp.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::pattern::{compile_matcher, TimestampMatcher};

/// Format used when the configured one is blank.
pub const DEFAULT_FORMAT: &str = "HH:mm";

/// What the rewriter learned about one block's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAnalysis<'t> {
    /// The text already starts with a timestamp in the current format.
    pub is_already_stamped: bool,
    /// The text with any leading timestamp removed, trimmed.
    pub content_without_timestamp: &'t str,
    /// Something other than whitespace and `{{...}}` placeholders remains.
    pub has_real_content: bool,
}

/// Returns the format to use for `raw`, falling back to [`DEFAULT_FORMAT`]
/// when it is blank.
#[must_use]
pub fn resolve_format(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        log::warn!("timestamp format is blank, using default {DEFAULT_FORMAT:?}");
        DEFAULT_FORMAT
    } else {
        trimmed
    }
}

/// Template placeholders such as `{{renderer :todo}}`.
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").unwrap());

/// Inspects `block_text` against `matcher`.
#[must_use]
pub fn analyze<'t>(block_text: &'t str, matcher: &TimestampMatcher) -> BlockAnalysis<'t> {
    let stripped = matcher.strip(block_text);
    let is_already_stamped = stripped.is_some();
    let content_without_timestamp = stripped.unwrap_or(block_text);

    let cleaned = PLACEHOLDER_PATTERN.replace_all(content_without_timestamp, "");
    let has_real_content = !cleaned.trim().is_empty();

    BlockAnalysis {
        is_already_stamped,
        content_without_timestamp,
        has_real_content,
    }
}

/// Returns the replacement text for `block_text`, or `None` if the block
/// should be left alone.
///
/// Blocks with real content are stamped when they carry no timestamp yet, or
/// when `force` is set, in which case an existing timestamp is replaced by
/// `now`. Empty and placeholder-only blocks are never written. A blank
/// `format` is replaced by [`DEFAULT_FORMAT`].
#[must_use]
pub fn rewrite(block_text: &str, format: &str, now: &str, force: bool) -> Option<String> {
    let matcher = compile_matcher(resolve_format(format));
    let analysis = analyze(block_text, &matcher);
    log::debug!(
        "stamp check: stamped={} real_content={} force={force}",
        analysis.is_already_stamped,
        analysis.has_real_content
    );

    let should_write = analysis.has_real_content && (force || !analysis.is_already_stamped);
    if !should_write {
        return None;
    }

    let stamped = format!("{now} {}", analysis.content_without_timestamp);
    Some(stamped.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamps_unstamped_block() {
        assert_eq!(
            rewrite("Buy milk", "HH:mm", "14:05", false),
            Some("14:05 Buy milk".to_string())
        );
    }

    #[test]
    fn test_already_stamped_block_is_left_alone() {
        assert_eq!(rewrite("14:05 Buy milk", "HH:mm", "14:05", false), None);
        assert_eq!(rewrite("09:00 Buy milk", "HH:mm", "14:05", false), None);
    }

    #[test]
    fn test_force_restamps() {
        assert_eq!(
            rewrite("14:05 Buy milk", "HH:mm", "14:30", true),
            Some("14:30 Buy milk".to_string())
        );
    }

    #[test]
    fn test_force_stamps_unstamped_block() {
        assert_eq!(
            rewrite("Buy milk", "HH:mm", "14:30", true),
            Some("14:30 Buy milk".to_string())
        );
    }

    #[test]
    fn test_empty_block_never_written() {
        assert_eq!(rewrite("", "HH:mm", "14:05", false), None);
        assert_eq!(rewrite("", "HH:mm", "14:05", true), None);
        assert_eq!(rewrite("   ", "HH:mm", "14:05", true), None);
    }

    #[test]
    fn test_placeholder_only_block_never_written() {
        assert_eq!(rewrite("{{renderer}}", "HH:mm", "14:05", false), None);
        assert_eq!(rewrite("{{renderer}}", "HH:mm", "14:05", true), None);
        assert_eq!(rewrite("{{a}} {{b :x}}", "HH:mm", "14:05", true), None);
    }

    #[test]
    fn test_stamp_only_block_never_written() {
        assert_eq!(rewrite("14:05", "HH:mm", "14:30", true), None);
        assert_eq!(rewrite("14:05 {{renderer}}", "HH:mm", "14:30", true), None);
    }

    #[test]
    fn test_placeholder_is_kept_in_written_text() {
        assert_eq!(
            rewrite("{{renderer}} standup", "HH:mm", "08:00", false),
            Some("08:00 {{renderer}} standup".to_string())
        );
    }

    #[test]
    fn test_rewrite_is_idempotent_without_force() {
        let once = rewrite("Buy milk", "HH:mm", "14:05", false).unwrap();
        assert_eq!(rewrite(&once, "HH:mm", "14:05", false), None);
        assert_eq!(rewrite(&once, "HH:mm", "14:06", false), None);
    }

    #[test]
    fn test_force_twice_does_not_stack_stamps() {
        let once = rewrite("Buy milk", "HH:mm", "14:05", true).unwrap();
        let twice = rewrite(&once, "HH:mm", "14:06", true).unwrap();
        assert_eq!(twice, "14:06 Buy milk");
    }

    #[test]
    fn test_surrounding_whitespace_is_normalised() {
        assert_eq!(
            rewrite("  14:05   Buy milk  ", "HH:mm", "14:30", true),
            Some("14:30 Buy milk".to_string())
        );
    }

    #[test]
    fn test_stamp_in_other_format_is_content() {
        // A block stamped as `HH:mm` is not recognised under a weekday format,
        // so the old stamp is kept as part of the content.
        assert_eq!(
            rewrite("14:05 Buy milk", "ddd HH:mm", "Thu 14:30", false),
            Some("Thu 14:30 14:05 Buy milk".to_string())
        );
    }

    #[test]
    fn test_analyze_reports_parts() {
        let matcher = compile_matcher("HH:mm");
        let analysis = analyze("14:05 {{renderer}}", &matcher);
        assert!(analysis.is_already_stamped);
        assert_eq!(analysis.content_without_timestamp, "{{renderer}}");
        assert!(!analysis.has_real_content);
    }

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format("HH:mm"), "HH:mm");
        assert_eq!(resolve_format("  YYYY-MM-DD "), "YYYY-MM-DD");
        assert_eq!(resolve_format(""), DEFAULT_FORMAT);
        assert_eq!(resolve_format("   "), DEFAULT_FORMAT);
    }

    #[test]
    fn test_rewrite_with_blank_format_uses_default() {
        assert_eq!(
            rewrite("Buy milk", "", "14:05", false),
            Some("14:05 Buy milk".to_string())
        );
        assert_eq!(rewrite("09:00 Buy milk", "  ", "14:05", false), None);
        assert_eq!(
            rewrite("09:00 Buy milk", "", "14:05", true),
            Some("14:05 Buy milk".to_string())
        );
    }
}
