//! Ordered rule registry. The first rule whose key predicate matches
//! decides how a field value is rendered; `Default` matches everything and
//! always comes last.

use super::sensitive::{SensitiveKeys, MASK};
use super::transform::{mask_uuid, sanitize_path, sanitize_string, sanitize_user_agent};
use super::validators::{is_safe_user_agent, is_valid_path, INVALID_PATH, INVALID_USER_AGENT};
use super::value::FieldValue;

/// The closed set of rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Path,
    UserAgent,
    Uuid,
    Error,
    Default,
}

impl FieldRule {
    /// Key predicate. `key` must already be lower-cased.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            FieldRule::Path => key == "path" || key.ends_with("_path") || key.ends_with(".path"),
            FieldRule::UserAgent => {
                matches!(key, "user_agent" | "user-agent" | "useragent" | "ua")
                    || key.ends_with("_user_agent")
                    || key.ends_with(".user_agent")
            }
            FieldRule::Uuid => {
                matches!(key, "id" | "uuid")
                    || key.ends_with("_id")
                    || key.ends_with("_uuid")
                    || key.ends_with(".id")
            }
            FieldRule::Error => {
                matches!(key, "error" | "err") || key.ends_with("_error") || key.ends_with(".error")
            }
            FieldRule::Default => true,
        }
    }

    /// Render `value` for the log record. Sensitive keys short-circuit to
    /// the mask before any type-specific handling.
    pub fn process(&self, sensitive: &SensitiveKeys, key: &str, value: &FieldValue<'_>) -> String {
        if sensitive.is_sensitive(key) {
            return MASK.to_string();
        }

        match self {
            FieldRule::Path => match value.as_str() {
                Some(path) if is_valid_path(path) => sanitize_path(path),
                _ => INVALID_PATH.to_string(),
            },
            FieldRule::UserAgent => match value.as_str() {
                Some(ua) if is_safe_user_agent(ua) => sanitize_user_agent(ua),
                _ => INVALID_USER_AGENT.to_string(),
            },
            FieldRule::Uuid => match value.as_str() {
                Some(id) => mask_uuid(id),
                None => mask_uuid(&value.render()),
            },
            FieldRule::Error => match value {
                FieldValue::Error(err) => sanitize_string(&err.to_string()),
                other => render_default(other),
            },
            FieldRule::Default => render_default(value),
        }
    }
}

fn render_default(value: &FieldValue<'_>) -> String {
    match value.as_str() {
        Some(s) => sanitize_string(s),
        None => sanitize_string(&value.render()),
    }
}

/// Immutable, ordered list of rules plus the classifier every rule consults.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
    sensitive: SensitiveKeys,
}

impl RuleSet {
    /// Path, UserAgent, Uuid, Error, then the catch-all Default.
    pub fn default_rules() -> Self {
        Self {
            rules: vec![
                FieldRule::Path,
                FieldRule::UserAgent,
                FieldRule::Uuid,
                FieldRule::Error,
                FieldRule::Default,
            ],
            sensitive: SensitiveKeys::new(),
        }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn sensitive_keys(&self) -> &SensitiveKeys {
        &self.sensitive
    }

    /// First rule whose predicate accepts `key`.
    pub fn rule_for(&self, key: &str) -> FieldRule {
        let lowered = key.to_ascii_lowercase();
        self.rules
            .iter()
            .copied()
            .find(|rule| rule.matches(&lowered))
            .unwrap_or(FieldRule::Default)
    }

    pub fn sanitize(&self, key: &str, value: &FieldValue<'_>) -> String {
        self.rule_for(key).process(&self.sensitive, key, value)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::default_rules()
    }
}
