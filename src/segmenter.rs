/// The classification shared by all the code points of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunKind {
    /// Code points in the Arabic block (U+0600 to U+06FF).
    Arabic,
    /// Anything which is neither Arabic nor a space.
    Other,
    /// A single literal space (U+0020).
    Space,
}

/// A maximal sequence of code points sharing the same `RunKind`. Runs are never mutated
/// once produced, shaping creates a new run instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub text: String,
}

impl Run {
    /// Create a run of the given kind from its text.
    pub fn new<S: Into<String>>(kind: RunKind, text: S) -> Run {
        Run {
            kind,
            text: text.into(),
        }
    }
}

/// Whether the code point belongs to the Arabic block.
pub fn is_arabic(character: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&character)
}

/// Whether at least one code point of the text belongs to the Arabic block.
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(is_arabic)
}

fn classify(character: char) -> RunKind {
    if character == ' ' {
        RunKind::Space
    } else if is_arabic(character) {
        RunKind::Arabic
    } else {
        RunKind::Other
    }
}

/// Partition the text into maximal runs of Arabic, other and space code points, in their
/// original order. Every space becomes a run of its own, so that words are never merged
/// with the spaces separating them. Concatenating the text of the runs gives back the input.
///
/// Text without any Arabic code point is returned as a single `Other` run.
pub fn segment(text: &str) -> Vec<Run> {
    if !contains_arabic(text) {
        return vec![Run::new(RunKind::Other, text)];
    }

    let mut runs = Vec::new();
    let mut current_run: Option<Run> = None;

    for character in text.chars() {
        let kind = classify(character);
        if kind == RunKind::Space {
            runs.extend(current_run.take());
            runs.push(Run::new(RunKind::Space, character));
            continue;
        }

        match current_run.as_mut() {
            Some(run) if run.kind == kind => run.text.push(character),
            _ => {
                runs.extend(current_run.take());
                current_run = Some(Run::new(kind, character));
            }
        }
    }
    runs.extend(current_run);

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_arabic_is_a_single_run() {
        assert_eq!(
            segment("Ahmad  2024"),
            vec![Run::new(RunKind::Other, "Ahmad  2024")]
        );
        assert_eq!(segment(""), vec![Run::new(RunKind::Other, "")]);
    }

    #[test]
    fn mixed_text_is_split_on_spaces_and_script_changes() {
        let runs = segment("Ahmad احمد 2024");
        assert_eq!(
            runs,
            vec![
                Run::new(RunKind::Other, "Ahmad"),
                Run::new(RunKind::Space, " "),
                Run::new(RunKind::Arabic, "احمد"),
                Run::new(RunKind::Space, " "),
                Run::new(RunKind::Other, "2024"),
            ]
        );
    }

    #[test]
    fn consecutive_spaces_are_separate_runs() {
        let runs = segment("محمد  علي");
        let kinds: Vec<_> = runs.iter().map(|run| run.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RunKind::Arabic,
                RunKind::Space,
                RunKind::Space,
                RunKind::Arabic
            ]
        );
    }

    #[test]
    fn script_change_without_space_breaks_the_run() {
        let runs = segment("دورة2024");
        assert_eq!(
            runs,
            vec![
                Run::new(RunKind::Arabic, "دورة"),
                Run::new(RunKind::Other, "2024"),
            ]
        );
    }

    #[test]
    fn other_whitespace_is_not_a_space_run() {
        let runs = segment("علي\tب");
        assert_eq!(runs[1], Run::new(RunKind::Other, "\t"));
    }

    #[test]
    fn arabic_block_boundaries() {
        assert!(is_arabic('\u{0600}'));
        assert!(is_arabic('\u{06FF}'));
        assert!(!is_arabic('\u{05FF}'));
        assert!(!is_arabic('\u{0700}'));
        assert!(!is_arabic('\u{FEFB}'));
    }
}
