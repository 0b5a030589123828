//! Fitted TF-IDF vectorizer
//!
//! Vocabulary and inverse document frequencies are learned from the
//! pattern corpus. Weights are raw term counts times smoothed IDF
//! (`ln((1 + n) / (1 + df)) + 1`), L2 normalized. Terms unseen at fit
//! time contribute nothing when encoding.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::embedding::{Embedder, SparseVector};
use crate::error::{AuroraError, Result};
use crate::text::is_stop_word;

/// Terms of two or more word characters
static TERM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid term regex"));

/// TF-IDF vectorizer with an English stop-word filter
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdfVectorizer {
    /// Learn vocabulary and IDF weights from `documents`
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| analyze(d.as_ref())).collect();

        let terms: BTreeSet<&str> = analyzed.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return Err(AuroraError::EmptyCorpus);
        }

        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for doc in &analyzed {
            let unique: BTreeSet<usize> = doc.iter().map(|t| vocabulary[t]).collect();
            for idx in unique {
                document_frequency[idx] += 1;
            }
        }

        let n = analyzed.len() as f32;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Ok(Self { vocabulary, idf })
    }

    /// Fit on `documents` and encode each of them
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Result<(Self, Vec<SparseVector>)> {
        let vectorizer = Self::fit(documents)?;
        let vectors = documents
            .iter()
            .map(|d| vectorizer.transform(d.as_ref()))
            .collect();
        Ok((vectorizer, vectors))
    }

    /// Encode a document into the fitted space
    pub fn transform(&self, document: &str) -> SparseVector {
        let pairs = analyze(document)
            .into_iter()
            .filter_map(|term| self.vocabulary.get(&term).copied())
            .map(|idx| (idx, self.idf[idx]))
            .collect();
        SparseVector::from_pairs(pairs).normalized()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Learned IDF for a term, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }
}

impl Embedder for TfIdfVectorizer {
    fn embed(&self, text: &str) -> Result<SparseVector> {
        Ok(self.transform(text))
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn model_name(&self) -> &str {
        "tfidf"
    }
}

/// Lower-cased terms of a document with stop words removed
fn analyze(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    TERM_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|term| !is_stop_word(term))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[test]
    fn test_tfidf_identical_documents() {
        let (vectorizer, vectors) =
            TfIdfVectorizer::fit_transform(&["hello world", "good morning"]).unwrap();
        let query = vectorizer.transform("hello world");
        assert!((cosine_similarity(&query, &vectors[0]) - 1.0).abs() < 1e-5);
        assert!(cosine_similarity(&query, &vectors[1]).abs() < 1e-5);
    }

    #[test]
    fn test_tfidf_stop_words_and_short_terms_dropped() {
        let vectorizer = TfIdfVectorizer::fit(&["what time is it", "a b c current time"]).unwrap();
        assert_eq!(vectorizer.vocabulary_len(), 2);
        assert!(vectorizer.idf("time").is_some());
        assert!(vectorizer.idf("what").is_none());
        assert!(vectorizer.idf("b").is_none());
    }

    #[test]
    fn test_tfidf_smoothed_idf() {
        let vectorizer = TfIdfVectorizer::fit(&["time", "current time", "hello"]).unwrap();
        // n = 3: time df = 2, current df = 1
        let expected_time = (4.0_f32 / 3.0).ln() + 1.0;
        let expected_current = (4.0_f32 / 2.0).ln() + 1.0;
        assert!((vectorizer.idf("time").unwrap() - expected_time).abs() < 1e-6);
        assert!((vectorizer.idf("current").unwrap() - expected_current).abs() < 1e-6);
    }

    #[test]
    fn test_tfidf_out_of_vocabulary_is_zero() {
        let vectorizer = TfIdfVectorizer::fit(&["hello"]).unwrap();
        assert!(vectorizer.transform("asdlkjasdlkj").is_zero());
        assert!(vectorizer.transform("").is_zero());
    }

    #[test]
    fn test_tfidf_normalized() {
        let vectorizer = TfIdfVectorizer::fit(&["alpha beta", "beta gamma"]).unwrap();
        let v = vectorizer.transform("alpha beta gamma gamma");
        assert!((v.norm() - 1.0).abs() < 0.001, "vector should be L2 normalized");
    }

    #[test]
    fn test_tfidf_empty_vocabulary() {
        assert!(matches!(
            TfIdfVectorizer::fit(&["who are you", "what are you"]),
            Err(AuroraError::EmptyCorpus)
        ));
        assert!(matches!(
            TfIdfVectorizer::fit::<&str>(&[]),
            Err(AuroraError::EmptyCorpus)
        ));
    }
}
