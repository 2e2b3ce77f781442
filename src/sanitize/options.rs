use regex::Regex;
use std::sync::OnceLock;

/// Options for [`sanitize_input`], the ad hoc cleanup used on free-text
/// form input. The log rule engine does not read these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    pub trim_whitespace: bool,
    pub strip_html: bool,
    /// Maximum length in chars; `None` leaves the value uncut.
    pub max_length: Option<usize>,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            strip_html: true,
            max_length: Some(1000),
        }
    }
}

static HTML_TAG: OnceLock<Regex> = OnceLock::new();

fn html_tag_pattern() -> &'static Regex {
    HTML_TAG.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|</?[a-zA-Z][^<>]*>").expect("html tag pattern is valid"))
}

/// Clean a free-text input according to `options`.
///
/// Tags are removed before trimming so that `"<p> hi </p>"` trims to
/// `"hi"`. The length cut happens last and never splits a char.
pub fn sanitize_input(input: &str, options: &SanitizeOptions) -> String {
    let mut value = if options.strip_html {
        html_tag_pattern().replace_all(input, "").into_owned()
    } else {
        input.to_string()
    };

    if options.trim_whitespace {
        value = value.trim().to_string();
    }

    if let Some(max) = options.max_length {
        if let Some((cut, _)) = value.char_indices().nth(max) {
            value.truncate(cut);
        }
    }

    value
}
