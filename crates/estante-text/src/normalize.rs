//! Text cleanup for noisy transcripts and OCR dumps.
//!
//! Both input paths produce text littered with digits, punctuation and
//! stray whitespace. Cleanup keeps only letters and whitespace so the
//! fuzzy matcher compares title-shaped strings.

use unicode_normalization::UnicodeNormalization;

/// Maximum number of words kept when shaping a sentence into a
/// title-like fragment.
const TITLE_FRAGMENT_WORDS: usize = 4;

/// Strip everything that is not a letter or whitespace, collapse
/// whitespace runs, and trim.
///
/// Total function: an all-noise input yields an empty string, which
/// callers must treat as "no usable candidate".
pub fn clean(raw: &str) -> String {
    let folded: String = raw.nfkc().collect();
    let kept: String = folded
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();
    collapse_whitespace(&kept)
}

/// Shape a full sentence into a title-like candidate: [`clean`], then
/// title-case each word and keep at most the first
/// `TITLE_FRAGMENT_WORDS` words.
///
/// `"  1984: a NOVEL!! "` → `"A Novel"`.
pub fn title_fragment(raw: &str) -> String {
    clean(raw)
        .split_whitespace()
        .take(TITLE_FRAGMENT_WORDS)
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first character of a word, lowercase the rest.
fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Trim and collapse multiple whitespace runs to a single space.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
