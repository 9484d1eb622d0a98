//! Composition of the fuzzy matcher and the similarity index:
//! resolve a noisy query to a catalog record, then rank the records
//! most similar to it.

use serde::Serialize;
use tracing::debug;

use estante_text::{normalize, TypedToken};

use crate::catalog::Catalog;
use crate::config::MatchingConfig;
use crate::features::{FeatureIndex, SimilarityMatrix};
use crate::matcher;
use crate::models::{BookRecord, NoisyQuery};

/// One row of a recommendation ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub title: String,
    pub authors: String,
    pub published_year: Option<u32>,
    pub categories: String,
    /// Cosine similarity as a percentage, rounded to two decimals.
    pub similarity_percent: f64,
}

/// Read-only recommendation engine over one catalog snapshot.
///
/// Built once at startup; every per-request operation only reads the
/// catalog and the similarity matrix, so independent requests need no
/// coordination.
pub struct RecommendationEngine {
    catalog: Catalog,
    similarity: SimilarityMatrix,
}

impl RecommendationEngine {
    /// Build the feature index and similarity matrix for a catalog
    /// and wrap both into an immutable handle.
    pub fn new(catalog: Catalog) -> Self {
        let index = FeatureIndex::build(&catalog);
        let similarity = index.similarity_matrix();
        tracing::info!(
            records = catalog.len(),
            terms = index.vocabulary_len(),
            "recommendation engine ready"
        );
        Self {
            catalog,
            similarity,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The resolved record's detail row.
    pub fn record(&self, id: usize) -> Option<&BookRecord> {
        self.catalog.get(id)
    }

    /// Resolve any noisy query with the configured per-path cutoffs.
    pub fn resolve(&self, query: &NoisyQuery, matching: &MatchingConfig) -> Option<usize> {
        match query {
            NoisyQuery::Spoken { transcript } => {
                self.resolve_spoken(transcript, matching.transcript_cutoff)
            }
            NoisyQuery::CoverScan { tokens, .. } => {
                self.resolve_tokens(tokens, matching.cover_cutoff)
            }
        }
    }

    /// Resolve a transcript (or typed text): shape it into a single
    /// title-like candidate and match it against the catalog titles.
    ///
    /// `None` is the normal "no match" outcome, never an error.
    #[tracing::instrument(name = "resolve_spoken", skip(self), fields(transcript = %transcript))]
    pub fn resolve_spoken(&self, transcript: &str, cutoff: f64) -> Option<usize> {
        let candidate = normalize::title_fragment(transcript);
        if candidate.is_empty() {
            debug!("transcript cleaned to nothing");
            return None;
        }

        let titles: Vec<String> = self.catalog.titles().map(str::to_string).collect();
        let pair = matcher::best_match(&[candidate], &titles, cutoff)?;
        debug!(matched = %pair.matched, ratio = pair.ratio, "spoken query matched");
        self.catalog.index_of_title(&pair.matched)
    }

    /// Resolve an OCR cover dump: upper-case it, extract typed spans,
    /// and match the text spans against upper-cased catalog titles.
    #[tracing::instrument(name = "resolve_cover", skip(self, ocr_text))]
    pub fn resolve_cover(&self, ocr_text: &str, cutoff: f64) -> Option<usize> {
        let tokens = estante_text::extract(&ocr_text.to_uppercase());
        self.resolve_tokens(&tokens, cutoff)
    }

    /// Match extracted cover tokens. Only text spans are candidates;
    /// numeric spans (years, ratings) never name a title. A token that
    /// fails to match never aborts evaluation of the remaining tokens.
    fn resolve_tokens(&self, tokens: &[TypedToken], cutoff: f64) -> Option<usize> {
        let candidates: Vec<String> = tokens
            .iter()
            .filter_map(TypedToken::as_text)
            .map(str::to_string)
            .collect();
        if candidates.is_empty() {
            debug!("cover scan produced no text spans");
            return None;
        }

        let titles: Vec<String> = self
            .catalog
            .titles()
            .map(|t| t.trim().to_uppercase())
            .collect();
        let pair = matcher::best_match(&candidates, &titles, cutoff)?;
        debug!(matched = %pair.matched, ratio = pair.ratio, "cover scan matched");
        self.catalog.index_of_title(&pair.matched)
    }

    /// Rank every other record by similarity to `record_id`.
    ///
    /// Descending similarity, ties broken by ascending catalog index,
    /// the record itself excluded, truncated to `top_n`. `record_id`
    /// must come from a successful resolve.
    pub fn recommend(&self, record_id: usize, top_n: usize) -> Vec<RankedResult> {
        let row = self.similarity.row(record_id);

        let mut order: Vec<usize> = (0..row.len()).filter(|&j| j != record_id).collect();
        order.sort_by(|&a, &b| {
            row[b]
                .partial_cmp(&row[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        order
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(position, id)| {
                let record = &self.catalog.records()[id];
                RankedResult {
                    rank: position + 1,
                    title: record.title.clone(),
                    authors: record.authors.clone(),
                    published_year: record.published_year,
                    categories: record.categories.clone(),
                    similarity_percent: percent(row[id]),
                }
            })
            .collect()
    }
}

/// Similarity as a percentage rounded to two decimals.
fn percent(similarity: f64) -> f64 {
    (similarity * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, authors: &str, categories: &str, year: Option<u32>) -> BookRecord {
        BookRecord {
            id: 0,
            title: title.into(),
            subtitle: String::new(),
            categories: categories.into(),
            authors: authors.into(),
            published_year: year,
            cover_image_ref: None,
        }
    }

    fn engine(records: Vec<BookRecord>) -> RecommendationEngine {
        RecommendationEngine::new(Catalog::from_records(records))
    }

    fn space_opera_engine() -> RecommendationEngine {
        engine(vec![
            record("Dune", "Frank Herbert", "Science Fiction", Some(1965)),
            record("Duna", "Frank Herbert", "Science Fiction", Some(1971)),
            record("Foundation", "Isaac Asimov", "Science Fiction", Some(1951)),
            record("Emma", "Jane Austen", "Romance", Some(1815)),
        ])
    }

    #[test]
    fn resolves_exact_title() {
        let engine = space_opera_engine();
        assert_eq!(engine.resolve_spoken("Foundation", 0.6), Some(2));
    }

    #[test]
    fn short_noisy_fragment_resolves_deterministically() {
        // "dun" is close to both "Dune" and "Duna"; corpus order must
        // break the tie the same way every time.
        let engine = space_opera_engine();
        assert_eq!(engine.resolve_spoken("dun", 0.25), Some(0));
    }

    #[test]
    fn unmatched_transcript_is_none_not_error() {
        let engine = space_opera_engine();
        assert_eq!(engine.resolve_spoken("wuthering heights", 0.6), None);
    }

    #[test]
    fn all_noise_transcript_is_none() {
        let engine = space_opera_engine();
        assert_eq!(engine.resolve_spoken("123 !!! 4.5", 0.25), None);
    }

    #[test]
    fn cover_dump_resolves_through_tokens() {
        let engine = engine(vec![
            record("Brave New World", "Aldous Huxley", "Dystopia", Some(1932)),
            record("Island", "Aldous Huxley", "Utopia", Some(1962)),
        ]);
        let id = engine.resolve_cover("[Brave New World] 2020 3.5 ALDOUS HUXLEY", 0.75);
        assert_eq!(id, Some(0));
    }

    #[test]
    fn cover_dump_without_text_spans_is_none() {
        let engine = space_opera_engine();
        assert_eq!(engine.resolve_cover("1965 3.5 42", 0.75), None);
    }

    #[test]
    fn resolve_dispatches_per_query_path() {
        let engine = space_opera_engine();
        let matching = MatchingConfig {
            transcript_cutoff: 0.6,
            cover_cutoff: 0.75,
        };
        assert_eq!(
            engine.resolve(&NoisyQuery::spoken("Foundation"), &matching),
            Some(2)
        );
        assert_eq!(
            engine.resolve(&NoisyQuery::cover_scan("FOUNDATION 1951"), &matching),
            Some(2)
        );
    }

    #[test]
    fn recommend_excludes_the_record_itself() {
        let engine = space_opera_engine();
        let results = engine.recommend(0, 10);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.title != "Dune"));
    }

    #[test]
    fn recommend_truncates_to_top_n() {
        let engine = space_opera_engine();
        assert_eq!(engine.recommend(0, 2).len(), 2);
        assert_eq!(engine.recommend(0, 10).len(), 3);
    }

    #[test]
    fn ranks_are_one_based_and_sorted() {
        let engine = space_opera_engine();
        let results = engine.recommend(0, 10);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.rank, i + 1);
        }
        for window in results.windows(2) {
            assert!(window[0].similarity_percent >= window[1].similarity_percent);
        }
        // Duna shares author and category with Dune; Emma shares
        // nothing and must come last with zero similarity.
        assert_eq!(results[0].title, "Duna");
        assert_eq!(results.last().unwrap().title, "Emma");
        assert_eq!(results.last().unwrap().similarity_percent, 0.0);
    }

    #[test]
    fn identical_vectors_rank_in_catalog_order() {
        let engine = engine(vec![
            record("Red Mars", "Kim Stanley Robinson", "", None),
            record("Red Mars", "Kim Stanley Robinson", "", None),
            record("Red", "", "", None),
        ]);
        let results = engine.recommend(2, 2);
        assert_eq!(results[0].similarity_percent, results[1].similarity_percent);
        // Both candidates tie; catalog order decides.
        assert_eq!(results[0].title, "Red Mars");
        assert_eq!(results[1].title, "Red Mars");
        let ids: Vec<usize> = engine
            .recommend(2, 2)
            .iter()
            .map(|r| engine.catalog().index_of_title(&r.title).unwrap())
            .collect();
        assert_eq!(ids, vec![0, 0]);
    }

    #[test]
    fn identical_records_score_one_hundred_percent() {
        let engine = engine(vec![
            record("Dune", "Frank Herbert", "Science Fiction", Some(1965)),
            record("Dune", "Frank Herbert", "Science Fiction", Some(1965)),
        ]);
        let results = engine.recommend(0, 1);
        assert_eq!(results[0].similarity_percent, 100.0);
    }

    #[test]
    fn record_detail_lookup() {
        let engine = space_opera_engine();
        let id = engine.resolve_spoken("Emma", 0.6).unwrap();
        let detail = engine.record(id).unwrap();
        assert_eq!(detail.authors, "Jane Austen");
        assert!(engine.record(99).is_none());
    }
}
