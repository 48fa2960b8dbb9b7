use std::hash::{Hash as _, Hasher as _};

use lopdf::{content::Operation, Object, StringFormat};
use time::OffsetDateTime;

use crate::error::ContextError;
use crate::request::CertificateDetails;

/// The resolution the template pixels are assumed to have.
const PIXELS_PER_INCH: f32 = 96.0;
/// The resolution of the PDF user space.
const POINTS_PER_INCH: f32 = 72.0;

/// The name under which the certificate image is referenced from the page content.
const IMAGE_NAME: &str = "Im1";

/// Converts a length in template pixels to PDF points.
pub fn pixels_to_points(pixels: u32) -> f32 {
    pixels as f32 * POINTS_PER_INCH / PIXELS_PER_INCH
}

/// A JPEG image embedded as is into the PDF document. Its data is never re-encoded, the
/// PDF viewer decodes it through the `DCTDecode` filter.
#[derive(Debug, Clone)]
pub struct JpegXObject {
    /// Width of the image in pixels.
    pub width: u32,
    /// Height of the image in pixels.
    pub height: u32,
    /// The encoded JPEG data.
    pub jpeg_data: Vec<u8>,
}

impl From<JpegXObject> for lopdf::Stream {
    fn from(value: JpegXObject) -> Self {
        use lopdf::Object::*;

        let image_dictionary = lopdf::Dictionary::from_iter(vec![
            ("Type", Name("XObject".into())),
            ("Subtype", Name("Image".into())),
            ("Width", Integer(i64::from(value.width))),
            ("Height", Integer(i64::from(value.height))),
            ("ColorSpace", Name("DeviceRGB".into())),
            ("BitsPerComponent", Integer(8)),
            ("Filter", Name("DCTDecode".into())),
        ]);

        // The data is already compressed by the JPEG encoding
        lopdf::Stream::new(image_dictionary, value.jpeg_data).with_compression(false)
    }
}

/// The metadata of the PDF a certificate is delivered in.
#[derive(Debug, Clone)]
pub struct CertificatePdf {
    /// The identifier of the document, it is used to set the PDF `ID` tag.
    pub identifier: String,
    /// The title shown by PDF viewers.
    pub title: String,
    /// The creation date recorded in the document information. It defaults to the UNIX
    /// epoch so that the same certificate always produces the same bytes.
    pub creation_date: OffsetDateTime,
}

impl CertificatePdf {
    pub fn new<S: Into<String>, T: Into<String>>(identifier: S, title: T) -> Self {
        CertificatePdf {
            identifier: identifier.into(),
            title: title.into(),
            creation_date: OffsetDateTime::UNIX_EPOCH,
        }
    }

    /// The PDF of the given certificate issued at `creation_date`, identified by a hash of
    /// both so that two different certificates never share an `ID`.
    pub fn for_certificate(details: &CertificateDetails, creation_date: OffsetDateTime) -> Self {
        let identifier = certificate_identifier(details, &creation_date);
        CertificatePdf::new(identifier, details.student_name.clone()).with_creation_date(creation_date)
    }

    pub fn with_creation_date(mut self, creation_date: OffsetDateTime) -> Self {
        self.creation_date = creation_date;
        self
    }

    /// Build a single page PDF document showing the JPEG image over the whole page. The page
    /// has the size of the image at 96 DPI.
    pub fn wrap_jpeg(&self, jpeg_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ContextError> {
        use lopdf::Object::*;
        use lopdf::StringFormat::*;

        let mut document = lopdf::Document::with_version("1.4");
        let pages_id = document.new_object_id();

        let image_id = document.add_object(lopdf::Stream::from(JpegXObject {
            width,
            height,
            jpeg_data: jpeg_data.to_vec(),
        }));

        // Scale the unit square the image is drawn into up to the whole page
        let (page_width, page_height) = (pixels_to_points(width), pixels_to_points(height));
        let page_content = lopdf::content::Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Real(page_width),
                        Integer(0),
                        Integer(0),
                        Real(page_height),
                        Integer(0),
                        Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Name(IMAGE_NAME.into())]),
                Operation::new("Q", vec![]),
            ],
        };
        let page_content_bytes = page_content
            .encode()
            .map_err(|error| ContextError::with_error("Failed to encode the page content", &error))?;
        let page_content_id = document.add_object(lopdf::Stream::new(
            lopdf::Dictionary::new(),
            page_content_bytes,
        ));

        let resources = lopdf::Dictionary::from_iter(vec![(
            "XObject",
            Dictionary(lopdf::Dictionary::from_iter(vec![(
                IMAGE_NAME,
                Reference(image_id),
            )])),
        )]);
        let media_box: Object = vec![
            Integer(0),
            Integer(0),
            Real(page_width),
            Real(page_height),
        ]
        .into();
        let page_id = document.add_object(lopdf::Dictionary::from_iter(vec![
            ("Type", "Page".into()),
            ("Parent", Reference(pages_id)),
            ("MediaBox", media_box),
            ("Contents", Reference(page_content_id)),
            ("Resources", Dictionary(resources)),
        ]));

        let pages = lopdf::Dictionary::from_iter(vec![
            ("Type", "Pages".into()),
            ("Kids", vec![Reference(page_id)].into()),
            ("Count", Integer(1)),
        ]);
        document.objects.insert(pages_id, Dictionary(pages));

        let catalog_id = document.add_object(lopdf::Dictionary::from_iter(vec![
            ("Type", "Catalog".into()),
            ("Pages", Reference(pages_id)),
        ]));

        let timestamp = to_pdf_timestamp_format(&self.creation_date);
        let document_info_id = document.add_object(lopdf::Dictionary::from_iter(vec![
            ("Title", pdf_text_string(&self.title)),
            ("Producer", String("certr".into(), Literal)),
            ("CreationDate", String(timestamp.clone().into_bytes(), Literal)),
            ("ModDate", String(timestamp.into_bytes(), Literal)),
        ]));

        document.trailer.set("Root", Reference(catalog_id));
        document.trailer.set("Info", Reference(document_info_id));
        document.trailer.set(
            "ID",
            Array(vec![
                pdf_string(&self.identifier),
                pdf_string(&self.identifier),
            ]),
        );

        let mut pdf_bytes = Vec::new();
        document.save_to(&mut pdf_bytes).map_err(|error| {
            ContextError::with_error("Error while saving the PDF document to bytes", &error)
        })?;

        Ok(pdf_bytes)
    }
}

fn pdf_string(text: &str) -> Object {
    Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
}

/// A string meant to be read by people, such as the document title. ASCII is stored as is,
/// anything else as UTF-16BE preceded by its byte order mark, since PDF readers would
/// otherwise decode the bytes as PDFDocEncoding.
fn pdf_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return pdf_string(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Hex digest of the certificate details and the issuing time.
pub fn certificate_identifier(
    details: &CertificateDetails,
    creation_date: &OffsetDateTime,
) -> String {
    use std::collections::hash_map::DefaultHasher;

    let mut hasher = DefaultHasher::new();
    details.hash(&mut hasher);
    creation_date.unix_timestamp_nanos().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Formats the given time so that it matches what the PDF specification expects.
/// An example of it is the following: D:20170505150224+02'00'.
fn to_pdf_timestamp_format(date: &OffsetDateTime) -> String {
    let offset = date.offset();
    let offset_sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{offset_sign}{:02}'{:02}'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        offset.whole_hours().abs(),
        offset.minutes_past_hour().abs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_converted_at_96_dpi() {
        assert_eq!(pixels_to_points(96), 72.0);
        assert_eq!(pixels_to_points(1600), 1200.0);
    }

    #[test]
    fn epoch_timestamp() {
        assert_eq!(
            to_pdf_timestamp_format(&OffsetDateTime::UNIX_EPOCH),
            "D:19700101000000+00'00'"
        );
    }

    fn details(student_name: &str) -> CertificateDetails {
        CertificateDetails {
            student_name: student_name.into(),
            course_name: "Rust".into(),
            instructor_name: "Sara".into(),
            date: "2024-05-01".into(),
            language: crate::request::Language::Arabic,
        }
    }

    #[test]
    fn ascii_titles_stay_literal() {
        assert_eq!(
            pdf_text_string("Certificate"),
            Object::String(b"Certificate".to_vec(), StringFormat::Literal)
        );
    }

    #[test]
    fn arabic_titles_are_utf16_with_byte_order_mark() {
        assert_eq!(
            pdf_text_string("لا"),
            Object::String(vec![0xFE, 0xFF, 0x06, 0x44, 0x06, 0x27], StringFormat::Hexadecimal)
        );
    }

    #[test]
    fn identifiers_depend_on_the_certificate_and_the_time() {
        let later = OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(1);
        let identifier = certificate_identifier(&details("محمد"), &OffsetDateTime::UNIX_EPOCH);

        assert_eq!(identifier.len(), 16);
        assert_eq!(
            identifier,
            certificate_identifier(&details("محمد"), &OffsetDateTime::UNIX_EPOCH)
        );
        assert_ne!(
            identifier,
            certificate_identifier(&details("علي"), &OffsetDateTime::UNIX_EPOCH)
        );
        assert_ne!(identifier, certificate_identifier(&details("محمد"), &later));
    }

    #[test]
    fn certificate_pdf_carries_its_identifier() {
        let pdf = CertificatePdf::for_certificate(&details("محمد"), OffsetDateTime::UNIX_EPOCH);
        assert_eq!(pdf.title, "محمد");
        assert_eq!(
            pdf.identifier,
            certificate_identifier(&details("محمد"), &OffsetDateTime::UNIX_EPOCH)
        );
    }

    #[test]
    fn jpeg_stream_is_not_recompressed() {
        let stream = lopdf::Stream::from(JpegXObject {
            width: 2,
            height: 3,
            jpeg_data: vec![0xFF, 0xD8, 0xFF, 0xD9],
        });
        assert_eq!(stream.content, vec![0xFF, 0xD8, 0xFF, 0xD9]);
        assert!(!stream.allows_compression);
        assert_eq!(
            stream.dict.get(b"Filter").unwrap(),
            &Object::Name(b"DCTDecode".to_vec())
        );
    }
}
