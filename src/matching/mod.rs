//! Intent matching over a TF-IDF corpus index
//!
//! Every `(pattern, tag)` pair gets its own row, so similarity is scored
//! per pattern and then mapped back to the owning tag. The best row wins
//! (first occurrence on ties) if its score is strictly above the threshold.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::embedding::{cosine_similarity, Embedder, SparseVector, TfIdfVectorizer};
use crate::error::{AuroraError, Result};
use crate::text::normalize;
use crate::types::{Intent, MatchResult};

/// One indexed pattern
#[derive(Debug, Clone)]
pub struct IndexedPattern {
    pub tag: String,
    /// Normalized pattern text
    pub text: String,
    pub vector: SparseVector,
}

/// Score of a single pattern row, for explain output
#[derive(Debug, Clone, Serialize)]
pub struct PatternScore {
    pub tag: String,
    pub pattern: String,
    pub score: f32,
}

/// Derived, rebuildable index over all intent patterns
pub struct CorpusIndex {
    encoder: Box<dyn Embedder>,
    rows: Vec<IndexedPattern>,
}

impl CorpusIndex {
    /// Build an index from the patterns of `intents`, in order of appearance
    pub fn build(intents: &[Intent]) -> Result<Self> {
        let (tags, texts): (Vec<String>, Vec<String>) = intents
            .iter()
            .flat_map(|intent| {
                intent
                    .patterns
                    .iter()
                    .map(move |pattern| (intent.tag.clone(), normalize(pattern)))
            })
            .unzip();

        if texts.is_empty() {
            return Err(AuroraError::EmptyCorpus);
        }

        let encoder: Box<dyn Embedder> = Box::new(TfIdfVectorizer::fit(&texts)?);
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = encoder.embed_batch(&refs)?;
        let rows: Vec<IndexedPattern> = tags
            .into_iter()
            .zip(texts)
            .zip(vectors)
            .map(|((tag, text), vector)| IndexedPattern { tag, text, vector })
            .collect();

        info!(
            patterns = rows.len(),
            model = encoder.model_name(),
            vocabulary = encoder.dimensions(),
            "Built corpus index"
        );

        Ok(Self { encoder, rows })
    }

    pub fn rows(&self) -> &[IndexedPattern] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Name of the encoder the rows were produced with
    pub fn model_name(&self) -> &str {
        self.encoder.model_name()
    }

    /// Encode raw text into the index's vector space; an encoder failure
    /// yields the zero vector, which never matches
    pub fn encode(&self, utterance: &str) -> SparseVector {
        match self.encoder.embed(&normalize(utterance)) {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Failed to encode utterance");
                SparseVector::default()
            }
        }
    }

    /// Similarity of `utterance` against every row, in row order
    pub fn score_all(&self, utterance: &str) -> Vec<PatternScore> {
        let query = self.encode(utterance);
        self.rows
            .iter()
            .map(|row| PatternScore {
                tag: row.tag.clone(),
                pattern: row.text.clone(),
                score: cosine_similarity(&query, &row.vector),
            })
            .collect()
    }

    /// Best-matching intent if its similarity is strictly above `threshold`
    pub fn match_utterance(&self, utterance: &str, threshold: f32) -> Option<MatchResult> {
        let query = self.encode(utterance);
        if query.is_zero() {
            debug!("Utterance shares no vocabulary with the corpus");
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (idx, row) in self.rows.iter().enumerate() {
            let score = cosine_similarity(&query, &row.vector);
            // Strict comparison keeps the first row on ties
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        let (pattern_index, score) = best?;
        if score > threshold {
            let tag = self.rows[pattern_index].tag.clone();
            debug!(%tag, score, pattern_index, "Matched intent");
            Some(MatchResult {
                tag,
                score,
                pattern_index,
            })
        } else {
            debug!(score, threshold, "Best score below threshold");
            None
        }
    }
}
