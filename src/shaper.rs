use std::borrow::Cow;

use crate::glyph_forms::{self, Form, ALEF, LAM};
use crate::segmenter::{self, Run, RunKind};

/// Whether the letter, when it precedes another one, joins to it.
fn joins_to_following(letter: char) -> bool {
    letter != ' ' && glyph_forms::is_shapeable(letter) && !glyph_forms::is_non_connecting(letter)
}

/// Whether the letter, when it follows another one, can be joined to.
fn accepts_join_from_preceding(letter: char) -> bool {
    letter != ' ' && glyph_forms::is_shapeable(letter)
}

/// Choose the presentation form of a letter from the connectivity of its neighbours.
/// A non-connecting letter can only be joined from the preceding letter, so it never takes
/// the initial or medial form.
pub fn select_form(letter: char, joined_to_previous: bool, joined_to_next: bool) -> Form {
    if glyph_forms::is_non_connecting(letter) {
        return if joined_to_previous {
            Form::Final
        } else {
            Form::Isolated
        };
    }

    match (joined_to_previous, joined_to_next) {
        (true, true) => Form::Medial,
        (true, false) => Form::Final,
        (false, true) => Form::Initial,
        (false, false) => Form::Isolated,
    }
}

/// Replace every shapeable letter of the text with its presentation form. Letters are
/// emitted in storage order, nothing gets reversed.
fn shape_letters(text: &str) -> String {
    let letters: Vec<char> = text.chars().collect();
    let mut shaped_text = String::with_capacity(text.len());

    let mut index = 0;
    while index < letters.len() {
        let letter = letters[index];
        let Some(forms) = glyph_forms::forms_of(letter) else {
            // Spaces and letters without presentation forms are copied as they are
            shaped_text.push(letter);
            index += 1;
            continue;
        };

        let joined_to_previous = index
            .checked_sub(1)
            .map(|previous_index| letters[previous_index])
            .is_some_and(joins_to_following);

        if letter == LAM && letters.get(index + 1) == Some(&ALEF) {
            shaped_text.push(glyph_forms::lam_alef_ligature(joined_to_previous));
            index += 2;
            continue;
        }

        let joined_to_next = letters
            .get(index + 1)
            .copied()
            .is_some_and(accepts_join_from_preceding);

        let form = select_form(letter, joined_to_previous, joined_to_next);
        shaped_text.push(forms[form as usize]);
        index += 1;
    }

    shaped_text
}

/// Shape a single run. Only `Arabic` runs are transformed, the other kinds are returned
/// unchanged. The connectivity of each letter depends on its neighbours inside the run,
/// the boundaries of the run count as non-connecting.
pub fn shape(run: &Run) -> Run {
    match run.kind {
        RunKind::Arabic => Run::new(RunKind::Arabic, shape_letters(&run.text)),
        RunKind::Other | RunKind::Space => run.clone(),
    }
}

/// Convert a logical Unicode string into the presentation-form code points that a
/// non-shaping rasterizer can draw directly. Non-Arabic runs and spaces are kept exactly
/// as they are, and the runs keep their original order.
pub fn shape_text(text: &str) -> String {
    segmenter::segment(text)
        .iter()
        .map(shape)
        .map(|run| run.text)
        .collect()
}

/// Prepare a text for rendering: Arabic-language content goes through the shaping engine,
/// any other content is handed back untouched.
pub fn prepare_text(text: &str, is_arabic: bool) -> Cow<'_, str> {
    if is_arabic && segmenter::contains_arabic(text) {
        Cow::Owned(shape_text(text))
    } else {
        Cow::Borrowed(text)
    }
}
