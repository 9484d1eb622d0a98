use serde::{Deserialize, Serialize};

/// A typed span recovered from unstructured cover text.
///
/// Cover scans mix words, years and edition numbers; keeping the type
/// explicit lets downstream matching decide which spans are title-shaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum TypedToken {
    /// A cleaned textual span (bracketed phrase or capital-letter run).
    Text(String),
    /// A whole number span (typically a publication year).
    Integer(i64),
    /// A decimal number span (ratings, edition numbers).
    Decimal(f64),
}

impl TypedToken {
    /// The textual content, if this token is a `Text` span.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedToken::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
