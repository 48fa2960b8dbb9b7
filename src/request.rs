use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization as _;

use crate::error::ContextError;

/// The language of a certificate. It selects the template, the text positions and whether
/// the texts go through the Arabic shaping engine.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// The two-letter code of the language, which is also the stem of its template file.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    pub fn is_arabic(&self) -> bool {
        matches!(self, Language::Arabic)
    }
}

impl std::str::FromStr for Language {
    type Err = ContextError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "ar" => Ok(Language::Arabic),
            "en" => Ok(Language::English),
            _ => Err(ContextError::with_context(
                "Invalid language. Must be \"ar\" or \"en\"",
            )),
        }
    }
}

/// The format the rendered certificate is delivered in.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpg,
    Pdf,
}

impl OutputFormat {
    /// Parse the format without failing: anything which is not `pdf` (ignoring case and
    /// surrounding whitespace) is delivered as a JPEG image.
    pub fn from_lenient(format: &str) -> OutputFormat {
        if format.trim().eq_ignore_ascii_case("pdf") {
            OutputFormat::Pdf
        } else {
            OutputFormat::Jpg
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpg => "image/jpeg",
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

/// A certificate request as it is received, before any validation. Every field is optional
/// here so that a missing field can be reported by name.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub student_name: Option<String>,
    pub course_name: Option<String>,
    pub instructor_name: Option<String>,
    pub date: Option<String>,
    pub language: Option<String>,
}

/// A validated certificate request: every text is trimmed, normalized and non-empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDetails {
    pub student_name: String,
    pub course_name: String,
    pub instructor_name: String,
    pub date: String,
    pub language: Language,
}

impl CertificateRequest {
    /// Parse a request from its JSON representation.
    pub fn from_json(json: &[u8]) -> Result<CertificateRequest, ContextError> {
        serde_json::from_slice(json).map_err(|error| ContextError::with_error("Invalid JSON", &error))
    }

    /// Read and parse a request from a JSON file.
    pub fn from_path(request_path: &std::path::Path) -> Result<CertificateRequest, ContextError> {
        let request_content = std::fs::read(request_path).map_err(|error| {
            ContextError::with_error(
                format!("Unable to read the request {:?}", request_path),
                &error,
            )
        })?;

        CertificateRequest::from_json(&request_content)
    }

    /// Check that every field is present and not blank, and that the language is supported.
    /// The fields are reported in the order in which they appear in the request format.
    pub fn validate(&self) -> Result<CertificateDetails, ContextError> {
        let student_name = required_field("studentName", &self.student_name)?;
        let course_name = required_field("courseName", &self.course_name)?;
        let instructor_name = required_field("instructorName", &self.instructor_name)?;
        let date = required_field("date", &self.date)?;
        let language = required_field("language", &self.language)?.parse::<Language>()?;

        Ok(CertificateDetails {
            student_name,
            course_name,
            instructor_name,
            date,
            language,
        })
    }
}

/// Trim the field and bring it to the NFC form, so that decomposed hamza letters reach the
/// shaping engine in their composed form.
fn required_field(name: &str, value: &Option<String>) -> Result<String, ContextError> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.nfc().collect()),
        _ => Err(ContextError::with_context(format!("Missing field: {}", name))),
    }
}
