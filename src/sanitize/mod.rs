//! Log field sanitization
//!
//! Every key/value pair headed for log output passes through [`Sanitizer`],
//! which picks the first matching rule from an ordered [`RuleSet`]:
//!
//! 1. **Path**: request paths are validated (absolute, no traversal, no
//!    markup or control characters) and bounded
//! 2. **UserAgent**: script-bearing or oversized agents are replaced
//! 3. **Uuid**: identifiers are partially masked (`1234...9012`)
//! 4. **Error**: the error message is collapsed to one bounded line
//! 5. **Default**: anything else is stringified, collapsed and bounded
//!
//! Keys that look sensitive (`password`, `token`, `session`, ...) are
//! masked by every rule before it looks at the value.
//!
//! # Failure model
//!
//! Sanitization is total. Wrong types, bad shapes and oversized values map
//! to sentinel strings or truncated output, never to an error or a panic,
//! so a log call can't disrupt the code it instruments.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use formdesk_api::sanitize::Sanitizer;
//!
//! let sanitizer = Arc::new(Sanitizer::new());
//! assert_eq!(sanitizer.sanitize("password", "hunter2"), "****");
//! assert_eq!(sanitizer.sanitize("count", 42), "42");
//! ```

pub mod options;
pub mod rules;
pub mod sensitive;
pub mod transform;
pub mod validators;
pub mod value;

pub use options::{sanitize_input, SanitizeOptions};
pub use rules::{FieldRule, RuleSet};
pub use sensitive::{SensitiveKeys, MASK};
pub use validators::{INVALID_PATH, INVALID_USER_AGENT};
pub use value::FieldValue;

/// Entry point for log call sites.
///
/// Build one at startup and share it (`Arc<Sanitizer>`); it holds no
/// mutable state, so concurrent use needs no locking.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    rules: RuleSet,
}

impl Sanitizer {
    /// Sanitizer with the default rule order.
    pub fn new() -> Self {
        Self {
            rules: RuleSet::default_rules(),
        }
    }

    /// Render `value` safely for the log field `key`.
    pub fn sanitize<'a>(&self, key: &str, value: impl Into<FieldValue<'a>>) -> String {
        self.sanitize_value(key, &value.into())
    }

    pub fn sanitize_value(&self, key: &str, value: &FieldValue<'_>) -> String {
        self.rules.sanitize(key, value)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
