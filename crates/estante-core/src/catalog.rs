//! CSV-backed catalog loading.
//!
//! The catalog is read once at startup and never mutated; a refreshed
//! source means discarding the catalog together with any index built
//! from it and reconstructing both.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::EstanteError;
use crate::models::BookRecord;

/// An ordered, immutable snapshot of the book catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<BookRecord>,
}

/// Raw CSV row. Every column is nullable; missing values are coerced
/// downstream, never treated as errors.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    authors: Option<String>,
    #[serde(default)]
    published_year: Option<String>,
    // The upstream dataset names this column "portada".
    #[serde(default, alias = "portada")]
    cover_image_ref: Option<String>,
}

impl CsvRow {
    fn into_record(self, id: usize) -> BookRecord {
        BookRecord {
            id,
            title: self.title.unwrap_or_default(),
            subtitle: self.subtitle.unwrap_or_default(),
            categories: self.categories.unwrap_or_default(),
            authors: self.authors.unwrap_or_default(),
            published_year: parse_year(self.published_year.as_deref()),
            cover_image_ref: self.cover_image_ref.filter(|s| !s.is_empty()),
        }
    }
}

/// Parse a nullable year cell. Tabular exports write years as "1965",
/// "1965.0" or blank; anything unparseable counts as missing.
fn parse_year(cell: Option<&str>) -> Option<u32> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value as u32)
    } else {
        None
    }
}

impl Catalog {
    /// Load the catalog from a CSV file. Any failure is fatal: the
    /// caller gets no partially-loaded catalog.
    pub fn load(path: &Path) -> Result<Self, EstanteError> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| EstanteError::CatalogLoad(format!("{}: {e}", path.display())))?;

        let mut records = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let id = records.len();
            records.push(row.into_record(id));
        }

        info!(records = records.len(), path = %path.display(), "catalog loaded");
        Ok(Self { records })
    }

    /// Build a catalog from in-memory records, re-indexing them by
    /// position.
    pub fn from_records(records: impl IntoIterator<Item = BookRecord>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(id, record)| BookRecord { id, ..record })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&BookRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    /// All titles in catalog order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.title.as_str())
    }

    /// Find a record by title, comparing case-folded trimmed strings.
    /// Duplicate titles resolve to the first match in catalog order.
    pub fn index_of_title(&self, title: &str) -> Option<usize> {
        let wanted = fold_title(title);
        self.records
            .iter()
            .position(|r| fold_title(&r.title) == wanted)
    }
}

fn fold_title(title: &str) -> String {
    title.trim().to_lowercase()
}
