//! Typed-token extraction from OCR cover dumps.
//!
//! A photographed cover mixes title, subtitle, author and year in
//! unpredictable layout. Classifying spans by shape recovers plausible
//! title fragments that naive whitespace splitting would mangle; the
//! fuzzy matcher then picks the fragment that actually names a book.

use std::sync::LazyLock;

use regex::{Match, Regex};

use crate::normalize;
use crate::token::TypedToken;

// ── Span patterns (compiled once) ───────────────────────────────────

static RE_BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

static RE_DECIMAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+").unwrap());

static RE_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static RE_CAPITAL_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z][A-Z ]*[A-Z]").unwrap());

/// Span classes in classification priority order.
///
/// When two classes match at the same position, the earlier variant
/// wins: bracketed phrase > decimal > integer > capital run. The order
/// is a policy of this module, not a side effect of pattern order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanClass {
    Bracketed,
    Decimal,
    Integer,
    CapitalRun,
}

impl SpanClass {
    fn priority(self) -> usize {
        match self {
            SpanClass::Bracketed => 0,
            SpanClass::Decimal => 1,
            SpanClass::Integer => 2,
            SpanClass::CapitalRun => 3,
        }
    }
}

/// Extract an ordered sequence of typed tokens from unstructured text.
///
/// Scans left to right; non-matching spans are skipped. Tokens keep
/// their order of appearance, with no reordering or deduplication.
/// Text spans pass through [`normalize::clean`]; spans that clean to
/// empty are dropped.
///
/// # Example
/// ```
/// use estante_text::{extract, TypedToken};
///
/// let tokens = extract("[Brave New World] 2020 3.5 ALDOUS HUXLEY");
/// assert_eq!(
///     tokens,
///     vec![
///         TypedToken::Text("Brave New World".into()),
///         TypedToken::Integer(2020),
///         TypedToken::Decimal(3.5),
///         TypedToken::Text("ALDOUS HUXLEY".into()),
///     ]
/// );
/// ```
pub fn extract(raw: &str) -> Vec<TypedToken> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < raw.len() {
        let Some((class, span)) = next_span(raw, pos) else {
            break;
        };
        if let Some(token) = classify(class, span.as_str()) {
            tokens.push(token);
        }
        pos = span.end();
    }

    tokens
}

/// Find the leftmost span at or after `pos`; same-start collisions are
/// resolved by [`SpanClass`] priority.
fn next_span(text: &str, pos: usize) -> Option<(SpanClass, Match<'_>)> {
    let candidates = [
        (SpanClass::Bracketed, RE_BRACKETED.find_at(text, pos)),
        (SpanClass::Decimal, RE_DECIMAL.find_at(text, pos)),
        (SpanClass::Integer, RE_INTEGER.find_at(text, pos)),
        (SpanClass::CapitalRun, RE_CAPITAL_RUN.find_at(text, pos)),
    ];

    candidates
        .into_iter()
        .filter_map(|(class, m)| m.map(|m| (class, m)))
        .min_by_key(|(class, m)| (m.start(), class.priority()))
}

/// Convert a matched span into a typed token.
fn classify(class: SpanClass, span: &str) -> Option<TypedToken> {
    match class {
        // Digit runs too long for the native types are OCR garbage.
        SpanClass::Decimal => span.parse().ok().map(TypedToken::Decimal),
        SpanClass::Integer => span.parse().ok().map(TypedToken::Integer),
        SpanClass::Bracketed | SpanClass::CapitalRun => {
            let cleaned = normalize::clean(span);
            if cleaned.is_empty() {
                None
            } else {
                Some(TypedToken::Text(cleaned))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_cover_dump() {
        let tokens = extract("[Brave New World] 2020 3.5 ALDOUS HUXLEY");
        assert_eq!(
            tokens,
            vec![
                TypedToken::Text("Brave New World".into()),
                TypedToken::Integer(2020),
                TypedToken::Decimal(3.5),
                TypedToken::Text("ALDOUS HUXLEY".into()),
            ]
        );
    }

    #[test]
    fn decimal_beats_integer_at_same_start() {
        assert_eq!(extract("3.5"), vec![TypedToken::Decimal(3.5)]);
    }

    #[test]
    fn bracket_beats_inner_spans() {
        // The digits sit inside the bracket span; the bracket wins and
        // the cleaned text keeps only letters.
        assert_eq!(
            extract("[DUNE 1965]"),
            vec![TypedToken::Text("DUNE".into())]
        );
    }

    #[test]
    fn capital_run_needs_two_capitals() {
        // Single capitals followed by lowercase are not title-shaped
        // spans in a shouting OCR dump; they are skipped.
        assert_eq!(extract("Brave New World"), Vec::new());
    }

    #[test]
    fn tokens_keep_appearance_order() {
        let tokens = extract("HERBERT 1965 DUNE");
        assert_eq!(
            tokens,
            vec![
                TypedToken::Text("HERBERT".into()),
                TypedToken::Integer(1965),
                TypedToken::Text("DUNE".into()),
            ]
        );
    }

    #[test]
    fn empty_bracket_is_dropped() {
        assert_eq!(extract("[] [12] FOUNDATION"), vec![TypedToken::Text("FOUNDATION".into())]);
    }

    #[test]
    fn no_match_yields_empty() {
        assert_eq!(extract("..."), Vec::new());
        assert_eq!(extract(""), Vec::new());
    }

    #[test]
    fn capital_run_spans_spaces() {
        assert_eq!(
            extract("EL NOMBRE DE LA ROSA"),
            vec![TypedToken::Text("EL NOMBRE DE LA ROSA".into())]
        );
    }
}
