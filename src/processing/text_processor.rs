//! Text normalization and word-boundary helpers shared by the matchers

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Characters that make up a token. A keyword hit must not touch one of these
/// on either side, so "Java" never matches inside "JavaScript".
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when the span `[start, end)` of `text` is not glued to a word character.
/// Both offsets must lie on char boundaries.
pub fn is_whole_word_at(text: &str, start: usize, end: usize) -> bool {
    has_left_boundary(text, start) && has_right_boundary(text, end)
}

pub fn has_left_boundary(text: &str, start: usize) -> bool {
    text[..start].chars().next_back().map_or(true, |c| !is_word_char(c))
}

pub fn has_right_boundary(text: &str, end: usize) -> bool {
    text[end..].chars().next().map_or(true, |c| !is_word_char(c))
}

/// Byte offsets of every whole-word occurrence of `needle` in `haystack`.
///
/// Both arguments are expected to be already case-folded. The needle is a
/// literal: characters such as `+` or `.` carry no pattern meaning.
pub fn whole_word_positions(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    haystack
        .match_indices(needle)
        .filter(|(start, _)| is_whole_word_at(haystack, *start, start + needle.len()))
        .map(|(start, _)| start)
        .collect()
}

pub fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    !whole_word_positions(haystack, needle).is_empty()
}

/// Byte offsets where `prefix` begins a token (left boundary only).
pub fn word_prefix_positions(haystack: &str, prefix: &str) -> Vec<usize> {
    if prefix.is_empty() {
        return Vec::new();
    }

    haystack
        .match_indices(prefix)
        .filter(|(start, _)| has_left_boundary(haystack, *start))
        .map(|(start, _)| start)
        .collect()
}

/// The token of `text` that starts at `start`, extended to the end of the word.
pub fn word_starting_at(text: &str, start: usize) -> &str {
    let rest = &text[start..];
    let end = rest
        .char_indices()
        .find(|(_, c)| !is_word_char(*c) && *c != '-' && *c != '.' && *c != '+' && *c != '#')
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    rest[..end].trim_end_matches(['-', '.'])
}

/// Case-fold a keyword or fragment for matching.
///
/// Folds char by char so that offsets can be traced back with
/// [`fold_case_with_offsets`].
pub fn fold_case(text: &str) -> String {
    text.chars().map(normalize_char).flat_map(char::to_lowercase).collect()
}

/// [`fold_case`] plus, for every byte of the folded text, the byte offset of
/// the source char it came from. One trailing entry maps the end of the
/// folded text to `text.len()`.
pub fn fold_case_with_offsets(text: &str) -> (String, Vec<usize>) {
    let mut folded = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);

    for (idx, c) in text.char_indices() {
        let before = folded.len();
        folded.extend(normalize_char(c).to_lowercase());
        offsets.resize(offsets.len() + folded.len() - before, idx);
    }
    offsets.push(text.len());

    (folded, offsets)
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Map typographic punctuation onto plain ASCII so pasted text matches.
pub fn normalize_unicode(text: &str) -> String {
    text.chars().map(normalize_char).collect()
}

fn normalize_char(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2010}' | '\u{2011}' | '\u{2013}' | '\u{2014}' => '-',
        '\u{00A0}' => ' ',
        _ => c,
    }
}

pub fn contains_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_numeric())
}
