/// Replacement for every value logged under a sensitive key.
pub const MASK: &str = "****";

/// Key fragments that mark a field as sensitive, matched case-insensitively
/// anywhere in the key.
pub const SENSITIVE_KEY_FRAGMENTS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "key",
    "credential",
    "auth",
    "session",
    "cookie",
    "jwt",
    "bearer",
    "oauth_",
    "private",
    "signature",
    "csrf",
];

/// Classifies field keys whose values must never reach log output.
#[derive(Debug, Clone)]
pub struct SensitiveKeys {
    fragments: &'static [&'static str],
}

impl SensitiveKeys {
    pub fn new() -> Self {
        Self {
            fragments: SENSITIVE_KEY_FRAGMENTS,
        }
    }

    /// Returns true when any fragment occurs in `key`, ignoring case.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        self.fragments.iter().any(|fragment| key.contains(fragment))
    }
}

impl Default for SensitiveKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_secret_keys_are_sensitive() {
        let keys = SensitiveKeys::new();
        for key in [
            "password",
            "new_password",
            "api_key",
            "access_token",
            "client_secret",
            "session_id",
            "Set-Cookie",
            "authorization",
            "oauth_state",
            "x-csrf-header",
            "JWT",
        ] {
            assert!(keys.is_sensitive(key), "{} should be sensitive", key);
        }
    }

    #[test]
    fn test_matching_ignores_case() {
        let keys = SensitiveKeys::new();
        assert!(keys.is_sensitive("PASSWORD"));
        assert!(keys.is_sensitive("Secret_Path"));
    }

    #[test]
    fn test_ordinary_keys_are_not_sensitive() {
        let keys = SensitiveKeys::new();
        for key in ["path", "user_agent", "user_id", "form_id", "error", "count", "message", "email"] {
            assert!(!keys.is_sensitive(key), "{} should not be sensitive", key);
        }
    }
}
