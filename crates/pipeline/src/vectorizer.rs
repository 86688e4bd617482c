//! Bag-of-n-grams count vectorizer.
//!
//! ## Algorithm
//! 1. Lower-case the document
//! 2. Tokens are maximal runs of alphanumeric/underscore characters,
//!    at least two characters long
//! 3. Stop words are removed before n-grams are formed
//! 4. N-grams within the configured range are joined with a single space
//! 5. Every term seen in the corpus enters the vocabulary (no document
//!    frequency cut); term ids follow lexicographic order
//!
//! Documents become sparse count vectors over that vocabulary.

use crate::error::{PipelineError, Result};
use crate::stopwords::english_stop_words;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Sparse term-count vector, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
    norm: f64,
}

impl SparseVector {
    fn from_counts(counts: HashMap<usize, f64>) -> Self {
        let mut entries: Vec<(usize, f64)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|(term, _)| *term);
        let norm = entries.iter().map(|(_, c)| c * c).sum::<f64>().sqrt();
        Self { entries, norm }
    }

    /// `(term id, count)` pairs in ascending term order
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, ca) = self.entries[i];
            let (b, cb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += ca * cb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Count vectorizer over word n-grams.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    ngram_range: (usize, usize),
    stop_words: HashSet<&'static str>,
    vocabulary: HashMap<String, usize>,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountVectorizer {
    /// Unigrams only, no stop words
    pub fn new() -> Self {
        Self {
            ngram_range: (1, 1),
            stop_words: HashSet::new(),
            vocabulary: HashMap::new(),
        }
    }

    /// # Errors
    /// `InvalidNgramRange` unless `1 <= min_n <= max_n`
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Result<Self> {
        if min_n == 0 || min_n > max_n {
            return Err(PipelineError::InvalidNgramRange(min_n, max_n));
        }
        self.ngram_range = (min_n, max_n);
        Ok(self)
    }

    pub fn with_stop_words_english(mut self) -> Self {
        self.stop_words = english_stop_words().clone();
        self
    }

    /// Learned term -> id mapping
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Split into lower-cased word tokens of two or more characters
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .map(str::to_string)
            .collect()
    }

    /// Terms of one document: stop words dropped, then n-grams emitted
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = Self::tokenize(text)
            .into_iter()
            .filter(|token| !self.stop_words.contains(token.as_str()))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }

    /// Learn the vocabulary from `documents` and return one vector each.
    ///
    /// An empty vocabulary is allowed; every vector is then zero.
    pub fn fit_transform<S: AsRef<str> + Sync>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        let analyzer = &*self;
        let analyzed: Vec<Vec<String>> = documents
            .par_iter()
            .map(|doc| analyzer.analyze(doc.as_ref()))
            .collect();

        let terms: BTreeSet<&str> = analyzed
            .iter()
            .flat_map(|terms| terms.iter().map(String::as_str))
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(id, term)| (term.to_string(), id))
            .collect();

        let vocabulary = &self.vocabulary;
        let vectors: Vec<SparseVector> = analyzed
            .par_iter()
            .map(|terms| {
                let mut counts: HashMap<usize, f64> = HashMap::new();
                for term in terms {
                    if let Some(&id) = vocabulary.get(term) {
                        *counts.entry(id).or_insert(0.0) += 1.0;
                    }
                }
                SparseVector::from_counts(counts)
            })
            .collect();

        debug!(
            "Vectorized {} documents over {} terms",
            vectors.len(),
            self.vocabulary.len()
        );
        vectors
    }

    /// Vectorize with the already-learned vocabulary; unseen terms are ignored
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(document) {
            if let Some(&id) = self.vocabulary.get(&term) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        SparseVector::from_counts(counts)
    }
}
