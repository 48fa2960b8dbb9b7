use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ContextError;
use crate::request::Language;

/// Position of a horizontally centered text, expressed in units of the base width.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CenteredPosition {
    /// Baseline of the text measured from the top of the template.
    pub y: f32,
    pub font_size: f32,
}

/// Position of the date, anchored by its left edge.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DatePosition {
    pub x: f32,
    pub y_from_bottom: f32,
    pub font_size: f32,
}

/// Position of the instructor name, anchored by its right edge.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct InstructorPosition {
    pub x_from_right: f32,
    pub y_from_bottom: f32,
    pub font_size: f32,
}

/// Where each field of the certificate is written on the template.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct FieldPositions {
    pub student_name: CenteredPosition,
    pub course_name: CenteredPosition,
    pub date: DatePosition,
    pub instructor: InstructorPosition,
}

impl FieldPositions {
    /// The positions used when no language-specific positions are configured.
    pub fn generic() -> Self {
        FieldPositions {
            student_name: CenteredPosition {
                y: 132.0,
                font_size: 11.0,
            },
            course_name: CenteredPosition {
                y: 173.0,
                font_size: 10.0,
            },
            date: DatePosition {
                x: 83.0,
                y_from_bottom: 40.0,
                font_size: 5.0,
            },
            instructor: InstructorPosition {
                x_from_right: 83.0,
                y_from_bottom: 40.0,
                font_size: 5.0,
            },
        }
    }

    /// The positions tuned for the Arabic template.
    pub fn arabic() -> Self {
        FieldPositions {
            student_name: CenteredPosition {
                y: 130.0,
                font_size: 9.0,
            },
            course_name: CenteredPosition {
                y: 170.0,
                font_size: 7.0,
            },
            date: DatePosition {
                x: 86.0,
                y_from_bottom: 42.0,
                font_size: 4.0,
            },
            instructor: InstructorPosition {
                x_from_right: 81.0,
                y_from_bottom: 43.0,
                font_size: 4.0,
            },
        }
    }

    /// The positions tuned for the English template.
    pub fn english() -> Self {
        FieldPositions {
            student_name: CenteredPosition {
                y: 132.0,
                font_size: 10.0,
            },
            course_name: CenteredPosition {
                y: 168.0,
                font_size: 7.0,
            },
            date: DatePosition {
                x: 81.0,
                y_from_bottom: 43.0,
                font_size: 4.0,
            },
            instructor: InstructorPosition {
                x_from_right: 80.0,
                y_from_bottom: 43.0,
                font_size: 4.0,
            },
        }
    }
}

/// Settings of the produced image.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ImageSettings {
    /// JPEG quality, from 1 to 100.
    pub quality: u8,
    /// The template width the positions and font sizes are expressed against.
    pub base_width: f32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            quality: 95,
            base_width: 400.0,
        }
    }
}

/// Settings of the font used to write on the template.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FontSettings {
    pub path: PathBuf,
    /// When the font cannot be found, produce the bare template instead of failing.
    pub fallback: bool,
}

impl Default for FontSettings {
    fn default() -> Self {
        FontSettings {
            path: PathBuf::from("fonts/Cairo-Bold.ttf"),
            fallback: true,
        }
    }
}

/// Everything that drives the rendering of a certificate. Unknown keys are ignored, so a
/// configuration file may carry settings meant for other front ends.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CertificateConfiguration {
    pub positions: FieldPositions,
    pub positions_ar: Option<FieldPositions>,
    pub positions_en: Option<FieldPositions>,
    pub image: ImageSettings,
    pub font: FontSettings,
    /// The directory holding one `<language>.jpg` template per language.
    pub templates_dir: PathBuf,
}

impl Default for CertificateConfiguration {
    fn default() -> Self {
        CertificateConfiguration {
            positions: FieldPositions::generic(),
            positions_ar: Some(FieldPositions::arabic()),
            positions_en: Some(FieldPositions::english()),
            image: ImageSettings::default(),
            font: FontSettings::default(),
            templates_dir: PathBuf::from("templates"),
        }
    }
}

impl CertificateConfiguration {
    pub fn from_path(configuration_path: &Path) -> Result<Self, ContextError> {
        let configuration_content =
            std::fs::read_to_string(configuration_path).map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Unable to read the configuration file {:?}",
                        configuration_path
                    ),
                    &error,
                )
            })?;
        let configuration: CertificateConfiguration =
            serde_json::from_str(&configuration_content).map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Unable to parse the configuration file {:?}",
                        configuration_path
                    ),
                    &error,
                )
            })?;

        Ok(configuration)
    }

    /// The positions for the given language, falling back to the generic ones.
    pub fn positions_for(&self, language: Language) -> &FieldPositions {
        let language_positions = match language {
            Language::Arabic => self.positions_ar.as_ref(),
            Language::English => self.positions_en.as_ref(),
        };

        language_positions.unwrap_or(&self.positions)
    }

    /// The factor every position and font size is multiplied by for a template of the given width.
    pub fn scale_for(&self, image_width: u32) -> f32 {
        image_width as f32 / self.image.base_width
    }

    pub fn template_path(&self, language: Language) -> PathBuf {
        self.templates_dir.join(format!("{}.jpg", language.code()))
    }

    /// The JPEG quality, brought back into the range accepted by the encoder.
    pub fn jpeg_quality(&self) -> u8 {
        self.image.quality.clamp(1, 100)
    }
}
