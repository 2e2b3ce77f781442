//! Structured logging with field sanitization
//!
//! This module wires the [`crate::sanitize::Sanitizer`] into
//! `tracing-subscriber`:
//! - JSON format for production environments ([`SanitizedJson`])
//! - Single-line human-readable format for development
//! - Every event and span field rendered through the sanitizer
//!   ([`SanitizedFields`]), so call sites can log plainly
//!
//! ```rust,ignore
//! let sanitizer = Arc::new(Sanitizer::new());
//! init_logging(&config.logging, Arc::clone(&sanitizer))?;
//!
//! info!(user_id = %user_id, path = %uri.path(), "Contact form submitted");
//! ```

pub mod fields;
pub mod json;
pub mod subscriber;

pub use fields::SanitizedFields;
pub use json::SanitizedJson;
pub use subscriber::{build_subscriber, init_logging};
