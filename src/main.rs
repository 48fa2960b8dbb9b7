use std::path::PathBuf;

use clap::Parser;
use certr::{
    certificate::CertificateRenderer,
    configuration::CertificateConfiguration,
    error::ContextError,
    filename,
    pdf::CertificatePdf,
    request::{CertificateRequest, OutputFormat},
    shaper,
};
use time::OffsetDateTime;

/// Render a certificate from a JSON request, or from the fields given on the command line.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct CliArguments {
    /// The JSON request holding studentName, courseName, instructorName, date and language.
    #[arg(short = 'r', long = "request", value_name = "json_file")]
    request_path: Option<PathBuf>,
    #[arg(long)]
    student_name: Option<String>,
    #[arg(long)]
    course_name: Option<String>,
    #[arg(long)]
    instructor_name: Option<String>,
    #[arg(long)]
    date: Option<String>,
    /// Either "ar" or "en".
    #[arg(long)]
    language: Option<String>,
    /// The JSON configuration file, the built-in configuration is used otherwise.
    #[arg(short = 'c', long = "config", value_name = "json_file")]
    configuration_path: Option<PathBuf>,
    /// Either "jpg" or "pdf", anything else is treated as "jpg".
    #[arg(short = 'f', long = "format", default_value = "jpg")]
    format: String,
    /// Where to save the certificate, by default a name derived from the student name.
    #[arg(short = 'o', long = "output", value_name = "file_path")]
    output_file_path: Option<PathBuf>,
    /// Only print the shaped form of the given text and exit.
    #[arg(long = "shape-only", value_name = "text")]
    shape_only: Option<String>,
}

impl CliArguments {
    /// The request given through the arguments: the request file if any, with the fields
    /// given explicitly on the command line taking precedence over it.
    fn request(&self) -> Result<CertificateRequest, ContextError> {
        let file_request = match &self.request_path {
            Some(request_path) => CertificateRequest::from_path(request_path)?,
            None => CertificateRequest::default(),
        };

        Ok(CertificateRequest {
            student_name: self.student_name.clone().or(file_request.student_name),
            course_name: self.course_name.clone().or(file_request.course_name),
            instructor_name: self.instructor_name.clone().or(file_request.instructor_name),
            date: self.date.clone().or(file_request.date),
            language: self.language.clone().or(file_request.language),
        })
    }
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<(), ContextError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let arguments = CliArguments::parse();
    log::debug!("{:?}", arguments);

    if let Some(text) = &arguments.shape_only {
        println!("{}", shaper::shape_text(text));
        return Ok(());
    }

    let configuration = match &arguments.configuration_path {
        Some(configuration_path) => CertificateConfiguration::from_path(configuration_path)?,
        None => CertificateConfiguration::default(),
    };
    let details = arguments.request()?.validate()?;
    log::debug!("{:?}", details);

    let output_format = OutputFormat::from_lenient(&arguments.format);
    let renderer = CertificateRenderer::from_configuration(configuration)?;
    let certificate = renderer.render(&details)?;

    let output_file_path = arguments.output_file_path.clone().unwrap_or_else(|| {
        PathBuf::from(filename::download_filename(
            &details.student_name,
            output_format,
        ))
    });
    let pdf = CertificatePdf::for_certificate(&details, OffsetDateTime::now_utc());
    let certificate_bytes = certificate.to_format(output_format, &pdf)?;

    std::fs::write(&output_file_path, &certificate_bytes)
        .map_err(|error| ContextError::with_error("Failed to save the output file", &error))?;
    log::info!(
        "Saved the certificate ({}, {} bytes) to the path: {:?}",
        output_format.mime_type(),
        certificate_bytes.len(),
        output_file_path
    );

    Ok(())
}
