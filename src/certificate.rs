use image::{codecs::jpeg::JpegEncoder, ImageFormat, Rgb, RgbImage};

use crate::configuration::{CertificateConfiguration, FieldPositions};
use crate::error::ContextError;
use crate::font::CertificateFont;
use crate::pdf::CertificatePdf;
use crate::request::{CertificateDetails, OutputFormat};
use crate::shaper;

/// The color every text is written in.
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// The width assumed for a text whose extent cannot be measured.
const FALLBACK_TEXT_WIDTH: f32 = 100.0;

/// A text ready to be drawn: already shaped, sized and positioned in template pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub font_size: f32,
    /// Left edge and baseline of the text.
    pub position: [f32; 2],
}

/// Compute where the four fields go on a template of the given size. The texts are shaped
/// when the certificate is in Arabic, and measured with `measure`, which returns `None`
/// when the width of a text cannot be known.
pub fn layout_fields<M>(
    details: &CertificateDetails,
    positions: &FieldPositions,
    scale: f32,
    (width, height): (u32, u32),
    measure: M,
) -> Vec<PlacedText>
where
    M: Fn(&str, f32) -> Option<f32>,
{
    let (width, height) = (width as f32, height as f32);
    let is_arabic = details.language.is_arabic();
    let text_width = |text: &str, font_size: f32| measure(text, font_size).unwrap_or(FALLBACK_TEXT_WIDTH);

    let centered = |text: &str, y: f32, font_size: f32| {
        let text = shaper::prepare_text(text, is_arabic).into_owned();
        let font_size = font_size * scale;
        let x = (width - text_width(&text, font_size)) / 2.0;
        PlacedText {
            text,
            font_size,
            position: [x, y * scale],
        }
    };

    let student_name = centered(
        &details.student_name,
        positions.student_name.y,
        positions.student_name.font_size,
    );
    let course_name = centered(
        &details.course_name,
        positions.course_name.y,
        positions.course_name.font_size,
    );

    let date = PlacedText {
        text: shaper::prepare_text(&details.date, is_arabic).into_owned(),
        font_size: positions.date.font_size * scale,
        position: [
            positions.date.x * scale,
            height - positions.date.y_from_bottom * scale,
        ],
    };

    // The instructor name is anchored by its right edge
    let instructor_text = shaper::prepare_text(&details.instructor_name, is_arabic).into_owned();
    let instructor_font_size = positions.instructor.font_size * scale;
    let instructor_x = width
        - positions.instructor.x_from_right * scale
        - text_width(&instructor_text, instructor_font_size);
    let instructor = PlacedText {
        text: instructor_text,
        font_size: instructor_font_size,
        position: [
            instructor_x,
            height - positions.instructor.y_from_bottom * scale,
        ],
    };

    vec![student_name, course_name, date, instructor]
}

/// A certificate rendered as a JPEG image.
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedCertificate {
    /// The bytes of the certificate in the requested format. A PDF simply wraps the JPEG
    /// image into a page of the same size.
    pub fn to_format(
        &self,
        output_format: OutputFormat,
        pdf: &CertificatePdf,
    ) -> Result<Vec<u8>, ContextError> {
        match output_format {
            OutputFormat::Jpg => Ok(self.jpeg.clone()),
            OutputFormat::Pdf => pdf.wrap_jpeg(&self.jpeg, self.width, self.height),
        }
    }
}

/// Writes the details of a certificate onto the template of its language.
#[derive(Debug)]
pub struct CertificateRenderer {
    configuration: CertificateConfiguration,
    font: Option<CertificateFont>,
}

impl CertificateRenderer {
    pub fn new(configuration: CertificateConfiguration, font: Option<CertificateFont>) -> Self {
        CertificateRenderer {
            configuration,
            font,
        }
    }

    /// Create a renderer loading the font named by the configuration. A font which cannot
    /// be loaded is an error, unless the configuration allows falling back to the bare template.
    pub fn from_configuration(configuration: CertificateConfiguration) -> Result<Self, ContextError> {
        let font = match CertificateFont::from_path(&configuration.font.path) {
            Ok(font) => Some(font),
            Err(error) if configuration.font.fallback => {
                log::warn!("{}, the certificate texts will not be drawn", error);
                None
            }
            Err(error) => return Err(error),
        };

        Ok(CertificateRenderer::new(configuration, font))
    }

    pub fn configuration(&self) -> &CertificateConfiguration {
        &self.configuration
    }

    /// Load the template of the certificate language and render the certificate onto it.
    pub fn render(&self, details: &CertificateDetails) -> Result<RenderedCertificate, ContextError> {
        let template_path = self.configuration.template_path(details.language);
        if !template_path.exists() {
            return Err(ContextError::with_context(format!(
                "Template not found: {}.jpg",
                details.language.code()
            )));
        }

        let template_bytes = std::fs::read(&template_path)
            .map_err(|error| ContextError::with_error("Failed to load template", &error))?;
        let template = image::load_from_memory_with_format(&template_bytes, ImageFormat::Jpeg)
            .map_err(|error| ContextError::with_error("Failed to load template", &error))?
            .to_rgb8();
        log::debug!(
            "Loaded the template {:?} of size {}x{}",
            template_path,
            template.width(),
            template.height()
        );

        self.render_on_template(template, details)
    }

    /// Render the certificate onto an already loaded template.
    pub fn render_on_template(
        &self,
        mut template: RgbImage,
        details: &CertificateDetails,
    ) -> Result<RenderedCertificate, ContextError> {
        let (width, height) = template.dimensions();
        let scale = self.configuration.scale_for(width);
        let positions = self.configuration.positions_for(details.language);

        let placed_texts = layout_fields(details, positions, scale, (width, height), |text, font_size| {
            self.font
                .as_ref()
                .map(|font| font.text_width(text, font_size))
        });

        match &self.font {
            Some(font) => {
                for placed_text in placed_texts.iter() {
                    log::debug!("{:?}", placed_text);
                    for character in font.missing_characters(&placed_text.text) {
                        log::warn!("Unable to find the character {:?} in the font", character);
                    }
                    font.draw_text(
                        &mut template,
                        &placed_text.text,
                        placed_text.font_size,
                        placed_text.position,
                        TEXT_COLOR,
                    );
                }
            }
            None => log::warn!("No font is available, the bare template is produced"),
        }

        let jpeg = encode_jpeg(&template, self.configuration.jpeg_quality())?;

        Ok(RenderedCertificate {
            jpeg,
            width,
            height,
        })
    }
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ContextError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(image)
        .map_err(|error| ContextError::with_error("Failed to encode the certificate", &error))?;

    Ok(jpeg)
}
