//! Term-weighted vector encoding
//!
//! Supports:
//! - Fitted TF-IDF vectorizer over a small pattern corpus
//! - Sparse vectors keyed by vocabulary index
//! - Cosine similarity between sparse vectors

mod tfidf;

pub use tfidf::TfIdfVectorizer;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Trait for text encoders used by the matcher
pub trait Embedder: Send + Sync {
    /// Encode a single text
    fn embed(&self, text: &str) -> Result<SparseVector>;

    /// Encode multiple texts (batch)
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<SparseVector>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Size of the vector space
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Sparse vector: `(dimension, weight)` pairs sorted by dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    /// Build from unordered pairs; duplicate dimensions are summed, zeros dropped
    pub fn from_pairs(mut pairs: Vec<(usize, f32)>) -> Self {
        pairs.sort_by_key(|(idx, _)| *idx);
        let mut entries: Vec<(usize, f32)> = Vec::with_capacity(pairs.len());
        for (idx, weight) in pairs {
            match entries.last_mut() {
                Some((last, acc)) if *last == idx => *acc += weight,
                _ => entries.push((idx, weight)),
            }
        }
        entries.retain(|(_, w)| *w != 0.0);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0_f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Scale to unit L2 norm; the zero vector stays zero
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }
}

/// Cosine similarity between two sparse vectors; 0.0 if either is zero
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    a.dot(b) / (norm_a * norm_b)
}
