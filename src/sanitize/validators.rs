//! Shape checks deciding whether a raw value may be logged at all.

/// Sentinel logged in place of a path that failed validation.
pub const INVALID_PATH: &str = "[invalid path]";

/// Sentinel logged in place of an unsafe user agent.
pub const INVALID_USER_AGENT: &str = "[invalid user agent]";

/// User agents longer than this are rejected outright rather than truncated.
pub const MAX_USER_AGENT_INPUT: usize = 1024;

const UUID_LENGTH: usize = 36;
const UUID_GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

const PATH_FORBIDDEN: &[char] = &['\\', '<', '>', '"', '\'', '\0', '\n', '\r'];
const USER_AGENT_FORBIDDEN: &[char] = &['\0', '\n', '\r', '<', '>', '"', '\''];
const USER_AGENT_INJECTION_MARKERS: &[&str] = &[
    "<script",
    "javascript:",
    "vbscript:",
    "onload=",
    "onerror=",
];

/// An absolute request path with no traversal, no doubled slashes and no
/// characters that could break out of a log line or markup context.
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path.starts_with('/')
        && !path.contains(PATH_FORBIDDEN)
        && !path.contains("..")
        && !path.contains("//")
}

pub fn is_safe_user_agent(user_agent: &str) -> bool {
    if user_agent.chars().count() > MAX_USER_AGENT_INPUT {
        return false;
    }
    if user_agent.contains(USER_AGENT_FORBIDDEN) {
        return false;
    }

    let lowered = user_agent.to_ascii_lowercase();
    !USER_AGENT_INJECTION_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Canonical hyphenated UUID text: 36 chars, groups of 8-4-4-4-12 hex digits.
///
/// Only the textual shape is checked; version and variant bits are not.
pub fn is_valid_uuid(value: &str) -> bool {
    if value.len() != UUID_LENGTH {
        return false;
    }
    if !value.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return false;
    }

    let groups: Vec<&str> = value.split('-').collect();
    groups.len() == UUID_GROUPS.len()
        && groups
            .iter()
            .zip(UUID_GROUPS.iter())
            .all(|(group, expected)| group.len() == *expected)
}
