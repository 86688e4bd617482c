//! Dense pairwise cosine similarity over sparse count vectors.
//!
//! ## Algorithm
//! An inverted index (term -> postings) is built once; each row is then
//! filled in parallel by walking the postings of its own terms, so only
//! pairs sharing at least one term are touched.
//!
//! - `S[i][i] = 1.0` for every row, including zero vectors
//! - `S[i][j] = 0.0` when either vector is zero
//! - values are clamped to at most 1.0
//!
//! Counts are small integers, so the accumulated dot products are exact
//! and the matrix is exactly symmetric.
//!
//! The matrix is dense: memory grows as N^2 (8 bytes per cell).

use crate::vectorizer::SparseVector;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Catalog size above which the dense matrix gets uncomfortably large
pub const DENSE_MATRIX_WARN_ROWS: usize = 20_000;

/// Row-major N x N similarity matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute cosine similarity between every pair of vectors.
    pub fn build(vectors: &[SparseVector]) -> Self {
        let n = vectors.len();
        if n == 0 {
            return Self::default();
        }
        if n > DENSE_MATRIX_WARN_ROWS {
            warn!(
                "Building a dense {}x{} similarity matrix (~{} MiB)",
                n,
                n,
                n * n * std::mem::size_of::<f64>() / (1024 * 1024)
            );
        }

        let vocabulary_size = vectors
            .iter()
            .flat_map(|v| v.entries().last().map(|(term, _)| term + 1))
            .max()
            .unwrap_or(0);
        let mut postings: Vec<Vec<(usize, f64)>> = vec![Vec::new(); vocabulary_size];
        for (row, vector) in vectors.iter().enumerate() {
            for &(term, count) in vector.entries() {
                postings[term].push((row, count));
            }
        }

        let mut data = vec![0.0; n * n];
        data.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            let vector = &vectors[i];
            for &(term, count) in vector.entries() {
                for &(j, other) in &postings[term] {
                    row[j] += count * other;
                }
            }

            let norm_i = vector.norm();
            for (j, cell) in row.iter_mut().enumerate() {
                let denominator = norm_i * vectors[j].norm();
                *cell = if denominator > 0.0 {
                    (*cell / denominator).min(1.0)
                } else {
                    0.0
                };
            }
            row[i] = 1.0;
        });

        debug!("Similarity matrix built: {}x{}, {} terms", n, n, vocabulary_size);
        Self { n, data }
    }

    /// Number of rows (and columns)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity between rows `i` and `j`, `None` when out of range
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.n && j < self.n {
            Some(self.data[i * self.n + j])
        } else {
            None
        }
    }

    /// Full row `i`
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.n {
            Some(&self.data[i * self.n..(i + 1) * self.n])
        } else {
            None
        }
    }
}
