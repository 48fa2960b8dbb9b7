use std::path::Path;

use image::{Rgb, RgbImage};
use owned_ttf_parser::{AsFaceRef as _, OwnedFace};
use rusttype::{point, Font, Point, PositionedGlyph, Scale};

use crate::error::ContextError;

/// Font sizes are given in points, the rasterizer works in pixels at 96 DPI.
const POINTS_TO_PIXELS: f32 = 96.0 / 72.0;

/// A TTF/OTF font used to write on a certificate template. The same font data is held
/// twice: once for rasterization and once for character map queries.
pub struct CertificateFont {
    font: Font<'static>,
    face: OwnedFace,
}

impl std::fmt::Debug for CertificateFont {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("CertificateFont")
            .field("glyph_count", &self.font.glyph_count())
            .finish()
    }
}

impl CertificateFont {
    pub fn from_path(font_path: &Path) -> Result<Self, ContextError> {
        let font_bytes = std::fs::read(font_path).map_err(|error| {
            ContextError::with_error(format!("Unable to read the font {:?}", font_path), &error)
        })?;

        CertificateFont::from_bytes(font_bytes)
    }

    pub fn from_bytes(font_bytes: Vec<u8>) -> Result<Self, ContextError> {
        let face = OwnedFace::from_vec(font_bytes.clone(), 0)
            .map_err(|error| ContextError::with_error("Failed to parse the font", &error))?;
        let font = Font::try_from_vec(font_bytes).ok_or(ContextError::with_context(
            "Unable to load the font for rasterization",
        ))?;

        Ok(CertificateFont { font, face })
    }

    /// The characters of the text, whitespace excluded, which have no glyph in the font.
    /// Presentation forms produced by the shaping engine end up here when the font does
    /// not cover the Arabic Presentation Forms-B block.
    pub fn missing_characters(&self, text: &str) -> Vec<char> {
        text.chars()
            .filter(|character| !character.is_whitespace())
            .filter(|character| self.face.as_face_ref().glyph_index(*character).is_none())
            .collect()
    }

    /// Lay the text out on a single line starting at the caret, applying pair kerning.
    fn layout(&self, text: &str, font_size: f32, caret: Point<f32>) -> Vec<PositionedGlyph<'static>> {
        let scale = Scale::uniform(font_size * POINTS_TO_PIXELS);
        let mut caret = caret;
        let mut positioned_glyphs = Vec::new();
        let mut last_glyph_id = None;

        for character in text.chars() {
            let base_glyph = self.font.glyph(character);
            if let Some(id) = last_glyph_id.take() {
                caret.x += self.font.pair_kerning(scale, id, base_glyph.id());
            }
            last_glyph_id = Some(base_glyph.id());

            let glyph = base_glyph.scaled(scale).positioned(caret);
            caret.x += glyph.unpositioned().h_metrics().advance_width;
            positioned_glyphs.push(glyph);
        }

        positioned_glyphs
    }

    /// The horizontal extent, in pixels, of the text drawn at the given size.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.layout(text, font_size, point(0.0, 0.0))
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Draw the text onto the image with its baseline starting at `position`, blending the
    /// color into the image according to the glyph coverage. Pixels falling outside of the
    /// image are discarded.
    pub fn draw_text(
        &self,
        image: &mut RgbImage,
        text: &str,
        font_size: f32,
        position: [f32; 2],
        color: Rgb<u8>,
    ) {
        let [x, y] = position;
        let (image_width, image_height) = image.dimensions();

        for glyph in self.layout(text, font_size, point(x, y)) {
            let Some(bounding_box) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|glyph_x, glyph_y, coverage| {
                let pixel_x = bounding_box.min.x + glyph_x as i32;
                let pixel_y = bounding_box.min.y + glyph_y as i32;
                if pixel_x < 0
                    || pixel_y < 0
                    || pixel_x as u32 >= image_width
                    || pixel_y as u32 >= image_height
                {
                    return;
                }

                let pixel = image.get_pixel_mut(pixel_x as u32, pixel_y as u32);
                *pixel = blend(*pixel, color, coverage);
            });
        }
    }
}

/// Mix the color into the pixel, the coverage being the opacity of the color.
fn blend(pixel: Rgb<u8>, color: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let coverage = coverage.clamp(0.0, 1.0);
    let mix = |background: u8, foreground: u8| {
        (background as f32 * (1.0 - coverage) + foreground as f32 * coverage).round() as u8
    };

    Rgb([
        mix(pixel[0], color[0]),
        mix(pixel[1], color[1]),
        mix(pixel[2], color[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blending_follows_the_coverage() {
        let black = Rgb([0, 0, 0]);
        let white = Rgb([255, 255, 255]);
        assert_eq!(blend(black, white, 0.0), black);
        assert_eq!(blend(black, white, 1.0), white);
        assert_eq!(blend(black, white, 0.5), Rgb([128, 128, 128]));
        assert_eq!(blend(black, white, 3.0), white);
    }

    #[test]
    fn garbage_is_not_a_font() {
        let error = CertificateFont::from_bytes(vec![0, 1, 2, 3]).unwrap_err();
        assert_eq!(error.context, "Failed to parse the font");
    }
}
