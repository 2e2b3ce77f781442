use std::error::Error;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

use super::fields::{debug_text, field_key};
use crate::sanitize::{FieldValue, Sanitizer};

/// JSON event formatter whose field values are all sanitizer output.
///
/// One object per line:
/// `{"timestamp", "level", "target", "fields": {..}, "spans": [..]}`.
/// Span fields are taken from the span's formatted fields, which the
/// subscriber renders with [`super::SanitizedFields`].
#[derive(Debug, Clone)]
pub struct SanitizedJson {
    sanitizer: Arc<Sanitizer>,
}

impl SanitizedJson {
    pub fn new(sanitizer: Arc<Sanitizer>) -> Self {
        Self { sanitizer }
    }
}

impl<S, N> FormatEvent<S, N> for SanitizedJson
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let mut collector = JsonFieldCollector::new(&self.sanitizer);
        event.record(&mut collector);

        let mut spans = Vec::new();
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let mut entry = Map::new();
                entry.insert("name".to_string(), Value::from(span.name()));
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        entry.insert("fields".to_string(), Value::from(fields.as_str()));
                    }
                }
                spans.push(Value::Object(entry));
            }
        }

        let record = json!({
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": metadata.level().to_string(),
            "target": metadata.target(),
            "fields": collector.fields,
            "spans": spans,
        });

        let line = serde_json::to_string(&record).map_err(|_| fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

struct JsonFieldCollector<'a> {
    sanitizer: &'a Sanitizer,
    fields: Map<String, Value>,
}

impl<'a> JsonFieldCollector<'a> {
    fn new(sanitizer: &'a Sanitizer) -> Self {
        Self {
            sanitizer,
            fields: Map::new(),
        }
    }

    fn insert(&mut self, field: &Field, value: FieldValue<'_>) {
        if let Some(name) = field_key(field) {
            let sanitized = self.sanitizer.sanitize_value(name, &value);
            self.fields.insert(name.to_string(), Value::String(sanitized));
        }
    }
}

impl Visit for JsonFieldCollector<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, FieldValue::Str(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, FieldValue::U64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, FieldValue::Bool(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, FieldValue::Error(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        self.insert(field, FieldValue::Str(debug_text(&rendered)));
    }
}
