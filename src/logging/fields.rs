use std::error::Error;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing_subscriber::field::{MakeVisitor, VisitFmt, VisitOutput};
use tracing_subscriber::fmt::format::Writer;

use crate::sanitize::{FieldValue, Sanitizer};

/// Field formatter for `tracing_subscriber::fmt` that renders every event
/// and span field through the [`Sanitizer`].
///
/// The `message` field is written bare; all others as `key=value`,
/// separated by single spaces, matching the default formatter's layout.
#[derive(Debug, Clone)]
pub struct SanitizedFields {
    sanitizer: Arc<Sanitizer>,
}

impl SanitizedFields {
    pub fn new(sanitizer: Arc<Sanitizer>) -> Self {
        Self { sanitizer }
    }
}

impl<'a> MakeVisitor<Writer<'a>> for SanitizedFields {
    type Visitor = SanitizingVisitor<'a>;

    fn make_visitor(&self, target: Writer<'a>) -> Self::Visitor {
        SanitizingVisitor::new(target, Arc::clone(&self.sanitizer))
    }
}

/// Visitor that applies the sanitizer to each field as it is recorded
pub struct SanitizingVisitor<'a> {
    writer: Writer<'a>,
    sanitizer: Arc<Sanitizer>,
    is_empty: bool,
    result: fmt::Result,
}

impl<'a> SanitizingVisitor<'a> {
    fn new(writer: Writer<'a>, sanitizer: Arc<Sanitizer>) -> Self {
        Self {
            writer,
            sanitizer,
            is_empty: true,
            result: Ok(()),
        }
    }

    fn record_value(&mut self, field: &Field, value: FieldValue<'_>) {
        if self.result.is_err() {
            return;
        }
        let Some(name) = field_key(field) else {
            return;
        };

        let sanitized = self.sanitizer.sanitize_value(name, &value);
        let delimiter = if self.is_empty { "" } else { " " };
        self.result = if name == "message" {
            write!(self.writer, "{}{}", delimiter, sanitized)
        } else {
            write!(self.writer, "{}{}={}", delimiter, name, sanitized)
        };
        self.is_empty = false;
    }
}

/// Key used for sanitization, or `None` for metadata fields that are not
/// part of the record (`log.*` from the log bridge).
pub(crate) fn field_key(field: &Field) -> Option<&'static str> {
    let name = field.name();
    if name.starts_with("log.") {
        return None;
    }
    Some(name.strip_prefix("r#").unwrap_or(name))
}

/// Debug-rendered text with one pair of surrounding `"` removed, so that
/// `path = ?"/contact"` is validated as `/contact`.
pub(crate) fn debug_text(rendered: &str) -> &str {
    rendered
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(rendered)
}

impl Visit for SanitizingVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, FieldValue::Str(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, FieldValue::U64(value));
    }

    fn record_i128(&mut self, field: &Field, value: i128) {
        self.record_value(field, FieldValue::I128(value));
    }

    fn record_u128(&mut self, field: &Field, value: u128) {
        self.record_value(field, FieldValue::U128(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, FieldValue::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.record_value(field, FieldValue::Error(value));
    }

    // `%value` and `?value` both land here; the rendered text is what the
    // rules validate, so `path = %uri.path()` is treated as a path.
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        self.record_value(field, FieldValue::Str(debug_text(&rendered)));
    }
}

impl VisitOutput<fmt::Result> for SanitizingVisitor<'_> {
    fn finish(self) -> fmt::Result {
        self.result
    }
}

impl VisitFmt for SanitizingVisitor<'_> {
    fn writer(&mut self) -> &mut dyn fmt::Write {
        &mut self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::test_support::{capture, CapturedLogs};
    use crate::config::LoggingConfig;

    fn text_config() -> LoggingConfig {
        LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
            ansi: false,
        }
    }

    #[test]
    fn test_event_fields_are_sanitized() {
        let logs = CapturedLogs::new();
        capture(&text_config(), &logs, || {
            tracing::info!(
                password = "secret123",
                user_id = "12345678-1234-1234-1234-123456789012",
                path = "/../etc/passwd",
                count = 42,
                "contact form submitted"
            );
        });

        let output = logs.contents();
        assert!(output.contains("contact form submitted"), "{}", output);
        assert!(output.contains("password=****"), "{}", output);
        assert!(output.contains("user_id=1234...9012"), "{}", output);
        assert!(output.contains("path=[invalid path]"), "{}", output);
        assert!(output.contains("count=42"), "{}", output);
        assert!(!output.contains("secret123"));
        assert!(!output.contains("etc/passwd"));
    }

    #[test]
    fn test_display_values_are_validated_as_text() {
        let logs = CapturedLogs::new();
        let path = String::from("/newsletter/subscribe");
        capture(&text_config(), &logs, || {
            tracing::info!(path = %path, "subscription");
        });

        assert!(logs.contents().contains("path=/newsletter/subscribe"));
    }

    #[test]
    fn test_debug_recorded_strings_lose_their_quotes() {
        let logs = CapturedLogs::new();
        capture(&text_config(), &logs, || {
            tracing::info!(
                path = ?"/contact",
                user_id = ?"12345678-1234-1234-1234-123456789012",
                "debug formatted"
            );
        });

        let output = logs.contents();
        assert!(output.contains("path=/contact"), "{}", output);
        assert!(output.contains("user_id=1234...9012"), "{}", output);
    }

    #[test]
    fn test_debug_text_strips_one_quote_pair() {
        assert_eq!(debug_text("\"/contact\""), "/contact");
        assert_eq!(debug_text("\"\"quoted\"\""), "\"quoted\"");
        assert_eq!(debug_text("Some(3)"), "Some(3)");
        assert_eq!(debug_text("\""), "\"");
        assert_eq!(debug_text(""), "");
    }

    #[test]
    fn test_message_is_collapsed_to_one_line() {
        let logs = CapturedLogs::new();
        capture(&text_config(), &logs, || {
            tracing::warn!("first line\nforged: entry");
        });

        let output = logs.contents();
        assert!(output.contains("first line forged: entry"), "{}", output);
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_span_fields_are_sanitized() {
        let logs = CapturedLogs::new();
        capture(&text_config(), &logs, || {
            let span = tracing::info_span!("login", session_token = "abc.def.ghi");
            let _guard = span.enter();
            tracing::info!("authenticating");
        });

        let output = logs.contents();
        assert!(output.contains("session_token=****"), "{}", output);
        assert!(!output.contains("abc.def.ghi"));
    }

    #[test]
    fn test_error_fields_use_message() {
        #[derive(Debug, thiserror::Error)]
        #[error("smtp relay refused\nconnection")]
        struct MailError;

        let logs = CapturedLogs::new();
        capture(&text_config(), &logs, || {
            let err = MailError;
            tracing::error!(error = &err as &(dyn std::error::Error + 'static), "delivery failed");
        });

        assert!(logs.contents().contains("error=smtp relay refused connection"));
    }
}
