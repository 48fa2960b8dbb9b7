use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use lopdf::Object;
use rand::{distributions::Alphanumeric, Rng as _};

use certr::{
    certificate::CertificateRenderer,
    configuration::CertificateConfiguration,
    filename,
    pdf::CertificatePdf,
    request::{CertificateRequest, Language, OutputFormat},
};

/// A scratch directory holding the templates of one test, removed when dropped.
struct TemplatesDirectory(PathBuf);

impl TemplatesDirectory {
    fn new() -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .map(char::from)
            .take(16)
            .collect();
        let path = std::env::temp_dir().join(format!("certr-{}", suffix));
        std::fs::create_dir_all(&path).unwrap();
        TemplatesDirectory(path)
    }

    fn write_template(&self, language: Language, width: u32, height: u32) {
        let template = RgbImage::from_pixel(width, height, Rgb([20, 40, 90]));
        template
            .save_with_format(
                self.0.join(format!("{}.jpg", language.code())),
                ImageFormat::Jpeg,
            )
            .unwrap();
    }

    fn configuration(&self, fallback: bool) -> CertificateConfiguration {
        let mut configuration = CertificateConfiguration {
            templates_dir: self.0.clone(),
            ..Default::default()
        };
        configuration.font.path = self.0.join("missing-font.ttf");
        configuration.font.fallback = fallback;
        configuration
    }
}

impl Drop for TemplatesDirectory {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn request_json(language: &str) -> String {
    format!(
        r#"{{
            "studentName": "  محمد   علي ",
            "courseName": "أساسيات البرمجة",
            "instructorName": "Sara",
            "date": "2024-05-01",
            "language": "{}"
        }}"#,
        language
    )
}

fn number(object: &Object) -> f32 {
    match object {
        Object::Integer(value) => *value as f32,
        Object::Real(value) => *value,
        other => panic!("{:?} is not a number", other),
    }
}

#[test]
fn request_to_jpeg_certificate() {
    let templates = TemplatesDirectory::new();
    templates.write_template(Language::Arabic, 800, 600);

    let details = CertificateRequest::from_json(request_json("ar").as_bytes())
        .unwrap()
        .validate()
        .unwrap();
    let renderer = CertificateRenderer::from_configuration(templates.configuration(true)).unwrap();
    let certificate = renderer.render(&details).unwrap();

    assert_eq!((certificate.width, certificate.height), (800, 600));
    let pdf = CertificatePdf::new("test", details.student_name.clone());
    let jpeg = certificate.to_format(OutputFormat::Jpg, &pdf).unwrap();
    let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (800, 600));

    assert_eq!(
        filename::download_filename(&details.student_name, OutputFormat::Jpg),
        "محمد_علي_UniSkills_Certificate.jpg"
    );
}

#[test]
fn pdf_wraps_the_jpeg_into_a_page_of_the_same_size() {
    let templates = TemplatesDirectory::new();
    templates.write_template(Language::English, 960, 480);

    let details = CertificateRequest::from_json(request_json("en").as_bytes())
        .unwrap()
        .validate()
        .unwrap();
    let renderer = CertificateRenderer::from_configuration(templates.configuration(true)).unwrap();
    let certificate = renderer.render(&details).unwrap();
    let pdf_bytes = certificate
        .to_format(OutputFormat::Pdf, &CertificatePdf::new("test", "Certificate"))
        .unwrap();

    let document = lopdf::Document::load_mem(&pdf_bytes).unwrap();
    let pages = document.get_pages();
    assert_eq!(pages.len(), 1);

    let page_id = *pages.values().next().unwrap();
    let page = document.get_dictionary(page_id).unwrap();
    let media_box: Vec<f32> = page
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(number)
        .collect();
    assert_eq!(media_box, vec![0.0, 0.0, 720.0, 360.0]);

    let image_id = page
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"Im1")
        .unwrap()
        .as_reference()
        .unwrap();
    let image_stream = document.get_object(image_id).unwrap().as_stream().unwrap();
    assert_eq!(
        image_stream.dict.get(b"Filter").unwrap(),
        &Object::Name(b"DCTDecode".to_vec())
    );
    assert_eq!(number(image_stream.dict.get(b"Width").unwrap()), 960.0);
    assert_eq!(image_stream.content, certificate.jpeg);
}

#[test]
fn pdf_output_is_reproducible() {
    let jpeg = {
        let mut jpeg = Vec::new();
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]))
            .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        jpeg
    };
    let pdf = CertificatePdf::new("identifier", "Title");
    assert_eq!(
        pdf.wrap_jpeg(&jpeg, 8, 8).unwrap(),
        pdf.wrap_jpeg(&jpeg, 8, 8).unwrap()
    );
}

#[test]
fn missing_template_is_reported_by_language() {
    let templates = TemplatesDirectory::new();
    let details = CertificateRequest::from_json(request_json("en").as_bytes())
        .unwrap()
        .validate()
        .unwrap();
    let renderer = CertificateRenderer::from_configuration(templates.configuration(true)).unwrap();

    let error = renderer.render(&details).unwrap_err();
    assert_eq!(error.to_string(), "Template not found: en.jpg");
}

#[test]
fn corrupt_template_fails_to_load() {
    let templates = TemplatesDirectory::new();
    std::fs::write(templates.0.join("ar.jpg"), b"not a jpeg").unwrap();
    let details = CertificateRequest::from_json(request_json("ar").as_bytes())
        .unwrap()
        .validate()
        .unwrap();
    let renderer = CertificateRenderer::from_configuration(templates.configuration(true)).unwrap();

    let error = renderer.render(&details).unwrap_err();
    assert_eq!(error.context, "Failed to load template");
}

#[test]
fn missing_font_without_fallback_is_an_error() {
    let templates = TemplatesDirectory::new();
    let error = CertificateRenderer::from_configuration(templates.configuration(false)).unwrap_err();
    assert!(error.context.starts_with("Unable to read the font"));
}

#[test]
fn configuration_file_is_loaded() {
    let templates = TemplatesDirectory::new();
    let configuration_path: &Path = &templates.0.join("config.json");
    std::fs::write(
        configuration_path,
        r#"{ "image": { "quality": 70, "base_width": 800 }, "positions_ar": null }"#,
    )
    .unwrap();

    let configuration = CertificateConfiguration::from_path(configuration_path).unwrap();
    assert_eq!(configuration.jpeg_quality(), 70);
    assert_eq!(configuration.scale_for(1600), 2.0);
    assert_eq!(
        configuration.positions_for(Language::Arabic),
        &configuration.positions
    );

    let error = CertificateConfiguration::from_path(&templates.0.join("absent.json")).unwrap_err();
    assert!(error.context.starts_with("Unable to read the configuration file"));
}

#[test]
fn arabic_title_is_readable_after_reloading() {
    let jpeg = {
        let mut jpeg = Vec::new();
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]))
            .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        jpeg
    };
    let pdf_bytes = CertificatePdf::new("identifier", "محمد علي")
        .wrap_jpeg(&jpeg, 8, 8)
        .unwrap();

    let document = lopdf::Document::load_mem(&pdf_bytes).unwrap();
    let info_id = document.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let title = document
        .get_dictionary(info_id)
        .unwrap()
        .get(b"Title")
        .unwrap()
        .as_str()
        .unwrap();

    assert_eq!(&title[..2], &[0xFE, 0xFF]);
    let units: Vec<u16> = title[2..]
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    assert_eq!(String::from_utf16(&units).unwrap(), "محمد علي");
}
