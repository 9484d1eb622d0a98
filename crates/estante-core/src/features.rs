//! Term-weighted feature vectors and the pairwise similarity matrix.
//!
//! Each record's metadata is flattened into one document, weighted
//! with smoothed TF-IDF and L2-normalized, so that pairwise cosine
//! similarity reduces to a sparse dot product. Both the index and the
//! matrix are immutable once built and bound to one catalog snapshot:
//! a changed catalog requires rebuilding both together.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::debug;

use crate::catalog::Catalog;

/// Sparse, L2-normalized term-weight vector for one record.
///
/// An all-empty record yields the zero vector; it is left unnormalized
/// and is orthogonal to everything, including other empty records.
///
/// Weights are keyed by term id in a `BTreeMap` so that norms and dot
/// products always sum in the same order: records built from identical
/// documents get bit-identical vectors, which the ranking tie-break
/// relies on.
#[derive(Debug, Clone, Default)]
pub struct FeatureVector {
    weights: BTreeMap<usize, f64>,
}

impl FeatureVector {
    /// Cosine similarity against another normalized vector: the dot
    /// product over the smaller weight map.
    pub fn cosine(&self, other: &FeatureVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (&self.weights, &other.weights)
        } else {
            (&other.weights, &self.weights)
        };
        small
            .iter()
            .filter_map(|(term, weight)| large.get(term).map(|w| w * weight))
            .sum()
    }

    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Term-weighted index over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    vocabulary: HashMap<String, usize>,
    vectors: Vec<FeatureVector>,
}

/// Symmetric matrix of pairwise cosine similarities. The diagonal is
/// pinned to exactly 1.0: a record is maximally similar to itself.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f64>>,
}

impl FeatureIndex {
    /// Build term vectors for every record of the catalog.
    ///
    /// Weights are smoothed TF-IDF: `idf(t) = ln((1 + n) / (1 + df(t))) + 1`,
    /// weight = term frequency × idf, then L2 normalization per record.
    pub fn build(catalog: &Catalog) -> Self {
        let documents: Vec<Vec<String>> = catalog
            .records()
            .iter()
            .map(|record| terms(&record.document()))
            .collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        for document in &documents {
            let mut seen: Vec<usize> = Vec::new();
            for term in document {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(term.clone()).or_insert_with(|| {
                    document_frequency.push(0);
                    next_id
                });
                if !seen.contains(&id) {
                    seen.push(id);
                    document_frequency[id] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = documents
            .iter()
            .map(|document| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for term in document {
                    *counts.entry(vocabulary[term]).or_insert(0.0) += 1.0;
                }
                let mut weights: BTreeMap<usize, f64> = counts
                    .into_iter()
                    .map(|(id, tf)| (id, tf * idf[id]))
                    .collect();

                let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for weight in weights.values_mut() {
                        *weight /= norm;
                    }
                }
                FeatureVector { weights }
            })
            .collect();

        debug!(
            records = documents.len(),
            terms = vocabulary.len(),
            "feature index built"
        );
        Self {
            vocabulary,
            vectors,
        }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    /// Pairwise cosine similarities of all records. The upper triangle
    /// is computed row-wise in parallel (rows are disjoint output
    /// ranges) and mirrored, so the matrix is exactly symmetric.
    pub fn similarity_matrix(&self) -> SimilarityMatrix {
        let n = self.vectors.len();

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| self.vectors[i].cosine(&self.vectors[j]))
                    .collect()
            })
            .collect();

        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            rows[i][i] = 1.0;
            for (offset, j) in ((i + 1)..n).enumerate() {
                let value = upper[i][offset];
                rows[i][j] = value;
                rows[j][i] = value;
            }
        }

        SimilarityMatrix { rows }
    }
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Similarity row for one record.
    pub fn row(&self, id: usize) -> &[f64] {
        &self.rows[id]
    }

    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }
}

/// Tokenize a document the way the vectorizer expects: lowercased
/// alphanumeric runs of at least two characters.
fn terms(document: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in document.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            if current.chars().count() >= 2 {
                out.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.chars().count() >= 2 {
        out.push(current);
    }
    out
}
