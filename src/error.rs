use serde::{Deserialize, Serialize};

/// The error of every fallible step between a certificate request and its bytes.
///
/// `context` is the message meant for whoever asked for the certificate, for example
/// `Missing field: studentName` or `Template not found: ar.jpg`, and it is what tests match
/// on. `source_error` keeps the message of the lower level failure (I/O, JSON, image or
/// PDF), so the displayed error reads `Failed to load template: no such file or directory`.
/// The whole error serializes to JSON as `{"context": ..., "source_error": ...}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContextError {
    pub context: String,
    pub source_error: Option<String>,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_error {
            Some(source_error) => write!(
                formatter,
                "{}: {}",
                self.context,
                lowercase_first_letter(source_error),
            ),
            None => write!(formatter, "{}", self.context),
        }
    }
}

impl std::error::Error for ContextError {}

impl ContextError {
    /// A failure detected by `certr` itself, such as an invalid request field.
    pub fn with_context<S: Into<String>>(context: S) -> ContextError {
        ContextError {
            context: context.into(),
            source_error: None,
        }
    }

    /// A failure of a dependency, reported under the given context. Used with `map_err`.
    pub fn with_error<S: Into<String>>(context: S, error: &dyn std::error::Error) -> ContextError {
        ContextError {
            context: context.into(),
            source_error: Some(error.to_string()),
        }
    }
}

// Source messages usually start with a capital, which reads oddly after the colon
fn lowercase_first_letter(message: &str) -> String {
    let mut characters = message.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}
