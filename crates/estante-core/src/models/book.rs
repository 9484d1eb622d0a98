use serde::{Deserialize, Serialize};

/// One catalog entry. Immutable once loaded.
///
/// Text fields may be empty but never absent: missing source values
/// are coerced to empty strings at load time, so a sparse catalog can
/// always be vectorized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stable index of the record within its catalog snapshot.
    pub id: usize,
    pub title: String,
    pub subtitle: String,
    pub categories: String,
    pub authors: String,
    pub published_year: Option<u32>,
    pub cover_image_ref: Option<String>,
}

impl BookRecord {
    /// The record's searchable text: all designated metadata fields
    /// joined into one document for term weighting.
    pub fn document(&self) -> String {
        let year = self
            .published_year
            .map(|y| y.to_string())
            .unwrap_or_default();
        format!(
            "{} {} {} {} {}",
            self.title, self.subtitle, self.categories, self.authors, year
        )
    }
}
