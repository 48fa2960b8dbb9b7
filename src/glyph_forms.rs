/// The positional presentation forms an Arabic letter can take. The discriminant of each
/// variant is the index of that form in the rows of the glyph form table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    /// The letter is joined on neither side.
    Isolated = 0,
    /// The letter is joined only to the letter preceding it.
    Final = 1,
    /// The letter is joined only to the letter following it.
    Initial = 2,
    /// The letter is joined on both sides.
    Medial = 3,
}

/// The letter lām, which combines with a following alef into a single ligature.
pub const LAM: char = '\u{0644}';
/// The plain alef (without hamza or madda), the second half of the lām-alef ligature.
pub const ALEF: char = '\u{0627}';
/// The lām-alef ligature when it is not joined to the preceding letter.
pub const LAM_ALEF_ISOLATED: char = '\u{FEFB}';
/// The lām-alef ligature when it is joined to the preceding letter.
pub const LAM_ALEF_FINAL: char = '\u{FEFC}';

/// Letters which never join to the letter following them, although they can still be
/// joined from the letter preceding them.
pub const NON_CONNECTING_LETTERS: [char; 11] = [
    '\u{0627}', // ا
    '\u{0623}', // أ
    '\u{0625}', // إ
    '\u{0622}', // آ
    '\u{062F}', // د
    '\u{0630}', // ذ
    '\u{0631}', // ر
    '\u{0632}', // ز
    '\u{0648}', // و
    '\u{0624}', // ؤ
    '\u{0621}', // ء
];

/// Every shapeable base letter associated to its presentation forms, in the order
/// `[isolated, final, initial, medial]`. The isolated form is the base letter itself, which
/// every Arabic font maps to the standalone glyph.
///
/// The rows are sorted by base letter so that they can be searched with a binary search.
static GLYPH_FORMS: [(char, [char; 4]); 36] = [
    ('\u{0621}', ['\u{0621}', '\u{0621}', '\u{0621}', '\u{0621}']), // ء
    ('\u{0622}', ['\u{0622}', '\u{FE82}', '\u{FE81}', '\u{FE82}']), // آ
    ('\u{0623}', ['\u{0623}', '\u{FE84}', '\u{FE83}', '\u{FE84}']), // أ
    ('\u{0624}', ['\u{0624}', '\u{FE86}', '\u{FE85}', '\u{FE86}']), // ؤ
    ('\u{0625}', ['\u{0625}', '\u{FE88}', '\u{FE87}', '\u{FE88}']), // إ
    ('\u{0626}', ['\u{0626}', '\u{FE8A}', '\u{FE8B}', '\u{FE8C}']), // ئ
    ('\u{0627}', ['\u{0627}', '\u{FE8E}', '\u{FE8D}', '\u{FE8E}']), // ا
    ('\u{0628}', ['\u{0628}', '\u{FE90}', '\u{FE91}', '\u{FE92}']), // ب
    ('\u{0629}', ['\u{0629}', '\u{FE94}', '\u{FE93}', '\u{FE94}']), // ة
    ('\u{062A}', ['\u{062A}', '\u{FE96}', '\u{FE97}', '\u{FE98}']), // ت
    ('\u{062B}', ['\u{062B}', '\u{FE9A}', '\u{FE9B}', '\u{FE9C}']), // ث
    ('\u{062C}', ['\u{062C}', '\u{FE9E}', '\u{FE9F}', '\u{FEA0}']), // ج
    ('\u{062D}', ['\u{062D}', '\u{FEA2}', '\u{FEA3}', '\u{FEA4}']), // ح
    ('\u{062E}', ['\u{062E}', '\u{FEA6}', '\u{FEA7}', '\u{FEA8}']), // خ
    ('\u{062F}', ['\u{062F}', '\u{FEAA}', '\u{FEA9}', '\u{FEAA}']), // د
    ('\u{0630}', ['\u{0630}', '\u{FEAC}', '\u{FEAB}', '\u{FEAC}']), // ذ
    ('\u{0631}', ['\u{0631}', '\u{FEAE}', '\u{FEAD}', '\u{FEAE}']), // ر
    ('\u{0632}', ['\u{0632}', '\u{FEB0}', '\u{FEAF}', '\u{FEB0}']), // ز
    ('\u{0633}', ['\u{0633}', '\u{FEB2}', '\u{FEB3}', '\u{FEB4}']), // س
    ('\u{0634}', ['\u{0634}', '\u{FEB6}', '\u{FEB7}', '\u{FEB8}']), // ش
    ('\u{0635}', ['\u{0635}', '\u{FEBA}', '\u{FEBB}', '\u{FEBC}']), // ص
    ('\u{0636}', ['\u{0636}', '\u{FEBE}', '\u{FEBF}', '\u{FEC0}']), // ض
    ('\u{0637}', ['\u{0637}', '\u{FEC2}', '\u{FEC3}', '\u{FEC4}']), // ط
    ('\u{0638}', ['\u{0638}', '\u{FEC6}', '\u{FEC7}', '\u{FEC8}']), // ظ
    ('\u{0639}', ['\u{0639}', '\u{FECA}', '\u{FECB}', '\u{FECC}']), // ع
    ('\u{063A}', ['\u{063A}', '\u{FECE}', '\u{FECF}', '\u{FED0}']), // غ
    ('\u{0641}', ['\u{0641}', '\u{FED2}', '\u{FED3}', '\u{FED4}']), // ف
    ('\u{0642}', ['\u{0642}', '\u{FED6}', '\u{FED7}', '\u{FED8}']), // ق
    ('\u{0643}', ['\u{0643}', '\u{FEDA}', '\u{FEDB}', '\u{FEDC}']), // ك
    ('\u{0644}', ['\u{0644}', '\u{FEDE}', '\u{FEDF}', '\u{FEE0}']), // ل
    ('\u{0645}', ['\u{0645}', '\u{FEE2}', '\u{FEE3}', '\u{FEE4}']), // م
    ('\u{0646}', ['\u{0646}', '\u{FEE6}', '\u{FEE7}', '\u{FEE8}']), // ن
    ('\u{0647}', ['\u{0647}', '\u{FEEA}', '\u{FEEB}', '\u{FEEC}']), // ه
    ('\u{0648}', ['\u{0648}', '\u{FEEE}', '\u{FEED}', '\u{FEEE}']), // و
    ('\u{0649}', ['\u{0649}', '\u{FEF0}', '\u{FEEF}', '\u{FEF0}']), // ى
    ('\u{064A}', ['\u{064A}', '\u{FEF2}', '\u{FEF3}', '\u{FEF4}']), // ي
];

/// Retrieve all the presentation forms of a base letter, if the letter can be shaped.
pub fn forms_of(letter: char) -> Option<&'static [char; 4]> {
    GLYPH_FORMS
        .binary_search_by_key(&letter, |(base_letter, _)| *base_letter)
        .ok()
        .map(|row_index| &GLYPH_FORMS[row_index].1)
}

/// Retrieve a single presentation form of a base letter, if the letter can be shaped.
pub fn form_of(letter: char, form: Form) -> Option<char> {
    forms_of(letter).map(|forms| forms[form as usize])
}

/// Whether the letter has an entry in the glyph form table.
pub fn is_shapeable(letter: char) -> bool {
    forms_of(letter).is_some()
}

/// Whether the letter never joins to the letter following it.
pub fn is_non_connecting(letter: char) -> bool {
    NON_CONNECTING_LETTERS.contains(&letter)
}

/// The lām-alef ligature, in its final form if it is joined to the preceding letter and
/// in its isolated form otherwise. It has neither an initial nor a medial form.
pub fn lam_alef_ligature(joined_to_previous: bool) -> char {
    if joined_to_previous {
        LAM_ALEF_FINAL
    } else {
        LAM_ALEF_ISOLATED
    }
}

/// Iterate over all the shapeable base letters.
pub fn shapeable_letters() -> impl Iterator<Item = char> {
    GLYPH_FORMS.iter().map(|(base_letter, _)| *base_letter)
}
