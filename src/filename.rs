use crate::request::OutputFormat;
use crate::segmenter::is_arabic;

/// The name every downloaded certificate ends with.
pub const CERTIFICATE_SUFFIX: &str = "UniSkills_Certificate";

/// Keep only ASCII letters and digits, whitespace and Arabic code points of the student
/// name, then join the words with underscores.
pub fn sanitize_student_name(student_name: &str) -> String {
    let kept: String = student_name
        .chars()
        .filter(|character| {
            character.is_ascii_alphanumeric() || character.is_whitespace() || is_arabic(*character)
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// The file name a certificate is saved under, for example
/// `Ahmad_Ali_UniSkills_Certificate.pdf`. Names with nothing left after sanitization
/// produce `UniSkills_Certificate.<extension>`.
pub fn download_filename(student_name: &str, output_format: OutputFormat) -> String {
    let sanitized_name = sanitize_student_name(student_name);
    if sanitized_name.is_empty() {
        format!("{}.{}", CERTIFICATE_SUFFIX, output_format.extension())
    } else {
        format!(
            "{}_{}.{}",
            sanitized_name,
            CERTIFICATE_SUFFIX,
            output_format.extension()
        )
    }
}
