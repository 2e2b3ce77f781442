//! Formatting applied to values that passed validation.
//!
//! Every transformer here is a fixed point on its own output, so a value
//! that is sanitized twice (once at the call site, once in the log
//! formatter) comes out the same as one sanitized once.

use super::validators::is_valid_uuid;

/// Limit for generic string values.
pub const MAX_STRING_LENGTH: usize = 1000;
/// Limit for request paths.
pub const MAX_PATH_LENGTH: usize = 512;
/// Limit for user agents that passed validation.
pub const MAX_USER_AGENT_LENGTH: usize = 256;

/// Appended to generic strings and user agents that were cut.
pub const TRUNCATION_MARKER: &str = "...";
/// Appended to cut paths. A single ellipsis char keeps `..` out of the
/// result so a truncated path still validates.
pub const PATH_TRUNCATION_MARKER: &str = "\u{2026}";

/// Shortest value that still gets the first4/last4 treatment.
pub const MIN_PARTIAL_MASK_LENGTH: usize = 8;
const MASK_KEEP: usize = 4;

/// Collapse every whitespace run (newlines and tabs included) into a
/// single space and trim both ends.
pub fn single_line(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for word in value.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Keep the first `max_chars` chars and append `marker` if anything was cut.
pub fn truncate(value: &str, max_chars: usize, marker: &str) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + marker.len());
            out.push_str(&value[..cut]);
            out.push_str(marker);
            out
        }
        None => value.to_string(),
    }
}

/// Generic string sanitization: single line, then bounded.
pub fn sanitize_string(value: &str) -> String {
    truncate(&single_line(value), MAX_STRING_LENGTH, TRUNCATION_MARKER)
}

pub fn sanitize_path(path: &str) -> String {
    truncate(path, MAX_PATH_LENGTH, PATH_TRUNCATION_MARKER)
}

pub fn sanitize_user_agent(user_agent: &str) -> String {
    truncate(
        &single_line(user_agent),
        MAX_USER_AGENT_LENGTH,
        TRUNCATION_MARKER,
    )
}

/// Partially mask an identifier.
///
/// A well-formed UUID and any other value of at least
/// [`MIN_PARTIAL_MASK_LENGTH`] chars become `first4...last4`. Shorter values
/// are replaced with one `*` per char.
pub fn mask_uuid(value: &str) -> String {
    if is_valid_uuid(value) {
        // ASCII only, byte slicing is safe
        return format!("{}...{}", &value[..MASK_KEEP], &value[value.len() - MASK_KEEP..]);
    }

    let chars: Vec<char> = single_line(value).chars().collect();
    if chars.len() < MIN_PARTIAL_MASK_LENGTH {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..MASK_KEEP].iter().collect();
    let tail: String = chars[chars.len() - MASK_KEEP..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_collapses_whitespace() {
        assert_eq!(single_line("db\ntimeout"), "db timeout");
        assert_eq!(single_line("  a \r\n\t b   c  "), "a b c");
        assert_eq!(single_line(""), "");
        assert_eq!(single_line("   "), "");
    }

    #[test]
    fn test_truncate_appends_marker_only_when_cut() {
        assert_eq!(truncate("abcdef", 10, "..."), "abcdef");
        assert_eq!(truncate("abcdef", 6, "..."), "abcdef");
        assert_eq!(truncate("abcdef", 3, "..."), "abc...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let value = "é".repeat(10);
        let cut = truncate(&value, 4, "...");
        assert_eq!(cut, "éééé...");
    }

    #[test]
    fn test_sanitize_string_limit() {
        let value = "a".repeat(2000);
        let expected = format!("{}...", "a".repeat(MAX_STRING_LENGTH));
        assert_eq!(sanitize_string(&value), expected);
    }

    #[test]
    fn test_sanitize_string_is_stable() {
        let value = format!("x{}{}", " ".repeat(5), "a\n".repeat(900));
        let once = sanitize_string(&value);
        assert_eq!(sanitize_string(&once), once);
    }

    #[test]
    fn test_path_truncation_keeps_path_valid() {
        let path = format!("/{}", "p".repeat(MAX_PATH_LENGTH * 2));
        let cut = sanitize_path(&path);
        assert!(cut.ends_with(PATH_TRUNCATION_MARKER));
        assert!(crate::sanitize::validators::is_valid_path(&cut));
        assert_eq!(sanitize_path(&cut), cut);
    }

    #[test]
    fn test_user_agent_truncation() {
        let ua = "Mozilla ".repeat(64);
        let cut = sanitize_user_agent(&ua);
        assert!(cut.ends_with(TRUNCATION_MARKER));
        assert_eq!(cut.chars().count(), MAX_USER_AGENT_LENGTH + TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_mask_uuid_valid() {
        assert_eq!(mask_uuid("12345678-1234-1234-1234-123456789012"), "1234...9012");
    }

    #[test]
    fn test_mask_uuid_invalid_uses_same_heuristic() {
        assert_eq!(mask_uuid("invalid-uuid"), "inva...uuid");
        assert_eq!(mask_uuid("abcdefgh"), "abcd...efgh");
    }

    #[test]
    fn test_mask_uuid_short_values() {
        assert_eq!(mask_uuid("42"), "**");
        assert_eq!(mask_uuid(""), "");
        assert_eq!(mask_uuid("abcdefg"), "*******");
    }

    #[test]
    fn test_mask_uuid_is_stable() {
        for value in [
            "12345678-1234-1234-1234-123456789012",
            "invalid-uuid",
            "abc",
            "ünïcödé-identifier",
            " abcdefgh",
            "ab\ncd efgh ",
        ] {
            let once = mask_uuid(value);
            assert_eq!(mask_uuid(&once), once, "mask of {:?} is not stable", value);
        }
    }
}
