use crate::models::{OptionLetter, ParsedQuestion};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::collections::BTreeSet;

/// Token the question generator places next to the correct option.
pub const MARKER: &str = "***";

lazy_static::lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    // **B)** / __B.__ / **(B)** option prefixes; a following `*` means a marker, left alone.
    static ref BOLD_OPTION_RE: Regex =
        Regex::new(r"(?m)^([ \t]*)(?:\*\*|__)\(?([A-D])([.)])\)?(?:\*\*|__)([^*]|$)").unwrap();
    // (B) option prefixes
    static ref PAREN_OPTION_RE: Regex = Regex::new(r"(?m)^([ \t]*)\(([A-D])\)").unwrap();
    // Marker adjacent to the option letter, most specific placement first.
    static ref ADJACENT_RES: [Regex; 4] = [
        // B***)  /  B *** .
        Regex::new(r"\b([A-D])[ \t]*\*\*\*[ \t]*[.)]").unwrap(),
        // B) ***  /  B. ***
        Regex::new(r"\b([A-D])[.)][ \t]*\*\*\*").unwrap(),
        // ***B)  /  *** B.  at the start of a line
        Regex::new(r"(?m)^[ \t]*\*\*\*[ \t]*([A-D])[.)]").unwrap(),
        // B***
        Regex::new(r"\b([A-D])[ \t]*\*\*\*").unwrap(),
    ];
    static ref LEADING_LETTER_RE: Regex = Regex::new(r"^([A-D])[.)\s]").unwrap();
    static ref AFTER_MARKER_RE: Regex = Regex::new(r"\*\*\*[ \t]*([A-D])(?:[^A-Za-z0-9]|$)").unwrap();
    static ref INLINE_OPTION_RE: Regex = Regex::new(r"(?:^|[\s(*])([A-D])[.)]").unwrap();
    static ref OPTION_PREFIX_RE: Regex = Regex::new(r"(?m)^[ \t]*([A-D])(?:[.)]|[ \t])").unwrap();
    static ref OPTION_START_RE: Regex = Regex::new(r"(?m)^[ \t]*([A-D])[.)][ \t]*").unwrap();
}

/// A named way of locating the marked option.
pub struct Strategy {
    pub name: &'static str,
    pub find: fn(&str) -> Option<OptionLetter>,
}

/// Evaluated in order, the first hit wins.
pub const STRATEGIES: [Strategy; 3] = [
    Strategy {
        name: "adjacent_marker",
        find: adjacent_marker,
    },
    Strategy {
        name: "marked_line",
        find: marked_line,
    },
    Strategy {
        name: "marked_option_segment",
        find: marked_option_segment,
    },
];

fn letter_from(caps: &regex::Captures<'_>) -> Option<OptionLetter> {
    caps.get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(OptionLetter::from_char)
}

/// Removes HTML-like tags and surrounding whitespace, and rewrites bold or
/// parenthesised option prefixes as plain `B)`.
pub fn normalize(raw: &str) -> String {
    let text = TAG_RE.replace_all(raw, "");
    let text = BOLD_OPTION_RE.replace_all(&text, "$1$2$3$4");
    let text = PAREN_OPTION_RE.replace_all(&text, "$1$2)");
    text.trim().to_string()
}

pub fn strip_markers(text: &str) -> String {
    text.replace(MARKER, "")
}

fn adjacent_marker(text: &str) -> Option<OptionLetter> {
    ADJACENT_RES
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| letter_from(&c)))
}

fn option_count(line: &str) -> usize {
    INLINE_OPTION_RE.find_iter(line).count()
}

/// A line carrying the marker names its option either up front or right after the marker.
/// Lines holding several inline options are left to the segment scan.
fn marked_line(text: &str) -> Option<OptionLetter> {
    text.lines()
        .filter(|line| line.contains(MARKER))
        .filter(|line| option_count(&strip_markers(line)) <= 1)
        .find_map(|line| {
            let unmarked = strip_markers(line);
            LEADING_LETTER_RE
                .captures(unmarked.trim_start())
                .and_then(|c| letter_from(&c))
                .or_else(|| AFTER_MARKER_RE.captures(line).and_then(|c| letter_from(&c)))
        })
}

/// Splits option-looking lines into per-option segments and returns the one holding the marker.
fn marked_option_segment(text: &str) -> Option<OptionLetter> {
    text.lines()
        .filter(|line| option_count(line) > 0)
        .find_map(|line| {
            let starts: Vec<(usize, OptionLetter)> = INLINE_OPTION_RE
                .captures_iter(line)
                .filter_map(|c| Some((c.get(1)?.start(), letter_from(&c)?)))
                .collect();
            starts.iter().enumerate().find_map(|(i, (start, letter))| {
                let end = starts.get(i + 1).map(|(s, _)| *s).unwrap_or(line.len());
                line[*start..end].contains(MARKER).then_some(*letter)
            })
        })
}

/// Letters that show up as option prefixes, in order.
pub fn option_letters(text: &str) -> Vec<OptionLetter> {
    OPTION_PREFIX_RE
        .captures_iter(text)
        .filter_map(|c| letter_from(&c))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Extracts the correct option and strips every marker from the text.
///
/// Never fails: without a marker the answer is drawn from the option letters that
/// are present, or `A` when nothing looks like an option.
pub fn extract_answer_key<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> ParsedQuestion {
    let clean = normalize(raw);
    let display_text = strip_markers(&clean);

    for strategy in STRATEGIES.iter() {
        if let Some(correct_letter) = (strategy.find)(&clean) {
            tracing::debug!(strategy = strategy.name, letter = %correct_letter, "answer key found");
            return ParsedQuestion {
                display_text,
                correct_letter,
            };
        }
    }

    let candidates = option_letters(&clean);
    let correct_letter = candidates.choose(rng).copied().unwrap_or(OptionLetter::A);
    tracing::warn!(
        candidates = ?candidates,
        chosen = %correct_letter,
        "no answer marker in generated question, falling back"
    );

    ParsedQuestion {
        display_text,
        correct_letter,
    }
}

/// Question stem and its options, split for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLayout {
    pub prompt: String,
    pub options: Vec<(OptionLetter, String)>,
}

pub fn split_options(text: &str) -> QuestionLayout {
    let starts: Vec<(usize, usize, OptionLetter)> = OPTION_START_RE
        .captures_iter(text)
        .filter_map(|c| {
            let whole = c.get(0)?;
            Some((whole.start(), whole.end(), letter_from(&c)?))
        })
        .collect();

    let Some((first_start, _, _)) = starts.first() else {
        return QuestionLayout {
            prompt: text.trim().to_string(),
            options: Vec::new(),
        };
    };

    let mut options: Vec<(OptionLetter, String)> = Vec::new();
    for (i, (_, body_start, letter)) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map(|(s, _, _)| *s).unwrap_or(text.len());
        if options.iter().any(|(l, _)| l == letter) {
            continue;
        }
        options.push((*letter, text[*body_start..end].trim().to_string()));
    }

    QuestionLayout {
        prompt: text[..*first_start].trim().to_string(),
        options,
    }
}
