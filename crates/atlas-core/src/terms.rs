//! Term-frequency tile model.
//!
//! Texts are counted once into a sparse point x term matrix. Each level's
//! tile assignment sums those rows into a tile x term matrix, which is then
//! IDF-weighted across tiles (a tile is a document) and L2-normalized.

use std::collections::BTreeMap;

use crate::collapse::TileAssignment;
use crate::constants::SENTINEL_SCORE;
use crate::geometry::{BBox, round_to};
use crate::tokenizer::{Vocabulary, tokenize};

/// Sparse row: `(term index, value)` sorted by term index.
pub type SparseRow<T> = Vec<(usize, T)>;

/// Point x term counts over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct TermCounts {
    pub vocabulary: Vocabulary,
    pub rows: Vec<SparseRow<u32>>,
}

impl TermCounts {
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();
        let vocabulary = Vocabulary::from_documents(&docs);

        let rows = docs
            .iter()
            .map(|tokens| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in tokens {
                    if let Some(idx) = vocabulary.index_of(token) {
                        *counts.entry(idx).or_insert(0) += 1;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();

        Self { vocabulary, rows }
    }

    pub fn point_count(&self) -> usize {
        self.rows.len()
    }

    /// Tile x term counts: the sum of each tile's member rows.
    pub fn aggregate(&self, assignment: &TileAssignment<'_>) -> Vec<SparseRow<u32>> {
        assignment
            .tiles
            .iter()
            .map(|tile| {
                let mut sum: BTreeMap<usize, u32> = BTreeMap::new();
                for &id in tile.members() {
                    for &(term, count) in &self.rows[id] {
                        *sum.entry(term).or_insert(0) += count;
                    }
                }
                sum.into_iter().collect()
            })
            .collect()
    }
}

/// Smooth-IDF weighting with per-row L2 normalization.
///
/// `idf(t) = ln((1 + D) / (1 + df(t))) + 1`. Zero counts stay zero, so every
/// score is non-negative and absent terms score 0.
pub fn tf_idf(counts: &[SparseRow<u32>]) -> Vec<SparseRow<f64>> {
    let docs = counts.len() as f64;
    let mut df: BTreeMap<usize, u32> = BTreeMap::new();
    for row in counts {
        for &(term, count) in row {
            if count > 0 {
                *df.entry(term).or_insert(0) += 1;
            }
        }
    }

    counts
        .iter()
        .map(|row| {
            let mut weighted: SparseRow<f64> = row
                .iter()
                .filter(|(_, c)| *c > 0)
                .map(|&(term, count)| {
                    let idf = ((1.0 + docs) / (1.0 + f64::from(df[&term]))).ln() + 1.0;
                    (term, f64::from(count) * idf)
                })
                .collect();
            let norm = weighted.iter().map(|(_, s)| s * s).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, s) in &mut weighted {
                    *s /= norm;
                }
            }
            weighted
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

impl TermScore {
    fn sentinel() -> Self {
        Self {
            term: String::new(),
            score: SENTINEL_SCORE,
        }
    }
}

/// Ranked terms for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileTopic {
    /// Exactly `top_k` entries, best first, padded with empty-term sentinels.
    pub terms: Vec<TermScore>,
    pub bbox: BBox,
}

impl TileTopic {
    /// First `n` terms joined by `separator`.
    pub fn label(&self, n: usize, separator: &str) -> String {
        self.terms
            .iter()
            .take(n)
            .map(|t| t.term.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Score a level's tiles and keep each tile's `top_k` terms.
///
/// Ties resolve toward the lower term index, which is alphabetical order.
pub fn rank_tile_terms(
    counts: &TermCounts,
    assignment: &TileAssignment<'_>,
    top_k: usize,
) -> Vec<TileTopic> {
    let scores = tf_idf(&counts.aggregate(assignment));

    assignment
        .tiles
        .iter()
        .zip(scores)
        .map(|(tile, mut row)| {
            row.retain(|(_, s)| *s > 0.0);
            row.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

            let mut terms: Vec<TermScore> = row
                .into_iter()
                .take(top_k)
                .map(|(idx, score)| TermScore {
                    term: counts.vocabulary.term(idx).to_string(),
                    score: round_to(score, crate::constants::SCORE_DIGITS),
                })
                .collect();
            terms.resize_with(top_k, TermScore::sentinel);

            TileTopic {
                terms,
                bbox: tile.bbox(),
            }
        })
        .collect()
}
