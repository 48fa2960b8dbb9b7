//! certr renders personalized certificates by writing a student name, a course name, a date
//! and an instructor name onto a JPEG template, and can deliver the result either as a JPEG
//! image or as a single page PDF document.
//!
//! Its core is an Arabic shaping engine for non-shaping rasterizers: `shaper::shape_text`
//! converts a logical Unicode string into the presentation-form code points that a glyph
//! renderer without complex text layout can draw one by one, keeping Latin runs, digits and
//! spaces exactly as they were given.
//!
//! ```
//! assert_eq!(certr::shaper::shape_text("لا"), "\u{FEFB}");
//! ```

/// The module where the text is partitioned into runs before shaping.
///
/// The entry point of this module is the `segment` function, which splits a string into maximal
/// runs of Arabic code points (the U+0600 to U+06FF block), of other code points, and of single spaces.
/// Concatenating the runs always gives back the original string, no normalization is involved.
pub mod segmenter;

/// The static tables of the shaping engine.
///
/// Every shapeable Arabic letter is associated to its isolated, final, initial and medial presentation
/// forms. The module also holds the lām-alef ligature and the set of letters which never join to the
/// letter following them. All of it is compile-time data, so it can be shared across threads freely.
pub mod glyph_forms;

/// The module were the Arabic shaping engine is presented.
///
/// # Introduction
///
/// The shaping of a text happens in two steps: the text is first segmented into runs, then every
/// Arabic run has each of its letters replaced with the presentation form selected from the
/// connectivity of its two neighbours. Runs are never reordered, and no run is reversed: laying the
/// text out from right to left is left to whoever draws it.
///
/// The engine never fails. Any code point it does not know about is copied to the output untouched,
/// so that unexpected input can never prevent a certificate from being produced.
pub mod shaper;

/// This module contains the `ContextError` type which is the error type used throughout this library.
///
/// The shaping engine does not produce errors at all, the `ContextError` type is only returned by the
/// layers around it: reading requests and configurations, loading templates and fonts, encoding images
/// and assembling PDF documents. It implements `std::fmt::Display`, so that its message can be reported
/// to the requester as it is.
pub mod error;

/// The certificate request format and its validation.
///
/// A request names the student, the course, the instructor, the date and the language of the
/// certificate. It is read from JSON with camelCase keys, and validated into `CertificateDetails`.
pub mod request;

/// The configuration of the rendering: where each field goes for each language, the JPEG quality,
/// the font and the directory of the templates. Every value has a default, so a configuration file
/// only needs to contain what differs from them.
pub mod configuration;

/// Loading of TTF/OTF fonts, measurement of text widths and rasterization of text onto images.
pub mod font;

/// The module were the texts are laid out and drawn onto the template.
///
/// `CertificateRenderer` is the entry point: it loads the template for the language of the request,
/// scales the configured positions to the template size, shapes the texts of Arabic certificates and
/// draws them, finally encoding the result as a JPEG image.
pub mod certificate;

/// Wrapping of a rendered certificate into a single page PDF document.
///
/// The JPEG data is embedded unchanged through the `DCTDecode` filter, so the PDF holds exactly the
/// image which would have been delivered otherwise.
pub mod pdf;

/// The names certificates are saved under.
pub mod filename;
