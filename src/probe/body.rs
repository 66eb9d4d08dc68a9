//! Response-side types and body rendering.

use serde_json::Value;

/// Number of characters shown for bodies that are not JSON.
pub const TEXT_PREVIEW_CHARS: usize = 200;

/// Body of a response, classified by whether it parses as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Raw text kept in full; only rendering truncates it.
    Text(String),
}

impl ResponseBody {
    /// Classify `text`, preferring JSON when it parses.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    /// Render the body for display.
    ///
    /// JSON is pretty-printed with two-space indentation; text is cut to the
    /// first [`TEXT_PREVIEW_CHARS`] characters.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            // `Value` keys are always strings, so pretty printing cannot fail.
            Self::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Self::Text(text) => truncate_chars(text, TEXT_PREVIEW_CHARS).to_string(),
        }
    }

    /// Body kept in the transcript: pretty JSON or the raw text, cut to `max`
    /// characters with a trailing `...`.
    pub(crate) fn excerpt(&self, max: usize) -> String {
        match self {
            Self::Json(_) => snippet(&self.render(), max),
            Self::Text(text) => snippet(text, max),
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

/// Outcome of a request that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ProbeResponse {
    /// Look up a top-level string field in a JSON object body.
    ///
    /// # Examples
    ///
    /// ```
    /// use endpoint_probe::probe::{ProbeResponse, ResponseBody};
    ///
    /// let resp = ProbeResponse {
    ///     status: 200,
    ///     body: ResponseBody::from_text(r#"{"deepLink":"https://t.me/bot?start=abc"}"#.into()),
    /// };
    /// assert_eq!(resp.json_str("deepLink"), Some("https://t.me/bot?start=abc"));
    /// assert_eq!(resp.json_str("missing"), None);
    /// ```
    #[must_use]
    pub fn json_str(&self, key: &str) -> Option<&str> {
        match &self.body {
            ResponseBody::Json(value) => value.get(key).and_then(Value::as_str),
            ResponseBody::Text(_) => None,
        }
    }
}

/// Borrow at most `max` characters from the start of `text`.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text.get(..idx).unwrap_or(text),
        None => text,
    }
}

/// Trim `text` to `max` characters, appending `...` when truncated.
fn snippet(text: &str, max: usize) -> String {
    let head = truncate_chars(text, max);
    if head.len() == text.len() {
        text.to_string()
    } else {
        format!("{head}...")
    }
}
