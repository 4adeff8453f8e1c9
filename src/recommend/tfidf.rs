//! TF-IDF term weighting and cosine scoring.
//!
//! Follows the usual vector-space defaults: lowercase, tokens of two or more
//! word characters, English stop words removed, smoothed IDF
//! `ln((1 + n) / (1 + df)) + 1`, raw term counts, L2-normalized rows.
//!
//! Term indices follow lexicographic term order and sparse vectors are kept
//! sorted by index, so every score is computed in the same order on every call.

use super::stopwords::is_stop_word;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorizeError {
    #[error("cannot fit a model on zero documents")]
    EmptyCorpus,

    #[error("empty vocabulary; documents contain only stop words or no words")]
    EmptyVocabulary,
}

/// Sparse vector as `(term index, weight)` pairs sorted by index
pub type SparseVector = Vec<(usize, f64)>;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"))
}

/// Split text into lowercase, non-stop-word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

fn l2_normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in vector.iter_mut() {
            *w /= norm;
        }
    }
}

/// Dot product of two index-sorted sparse vectors
pub fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// A TF-IDF model fitted on one corpus. Built per request and never shared.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<SparseVector>,
}

impl TfidfModel {
    /// Learn the vocabulary and IDF weights, and vectorize every document
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self, VectorizeError> {
        if documents.is_empty() {
            return Err(VectorizeError::EmptyCorpus);
        }

        let counts: Vec<BTreeMap<String, usize>> =
            documents.iter().map(|d| term_counts(d.as_ref())).collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(VectorizeError::EmptyVocabulary);
        }

        let n_docs = documents.len() as f64;
        let vocabulary: BTreeMap<String, usize> = doc_freq
            .keys()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();
        let idf: Vec<f64> = doc_freq
            .values()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut model = Self {
            vocabulary,
            idf,
            documents: Vec::with_capacity(counts.len()),
        };
        let vectors = counts.iter().map(|c| model.weigh(c)).collect();
        model.documents = vectors;

        Ok(model)
    }

    fn weigh(&self, counts: &BTreeMap<String, usize>) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for (term, &count) in counts {
            if let Some(&index) = self.vocabulary.get(term) {
                *weights.entry(index).or_insert(0.0) += count as f64 * self.idf[index];
            }
        }

        let mut vector: SparseVector = weights.into_iter().collect();
        l2_normalize(&mut vector);
        vector
    }

    /// Project text into the fitted space; unknown terms are dropped
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&term_counts(text))
    }

    /// Cosine similarity of `query` against every fitted document, in corpus order
    pub fn similarities(&self, query: &[(usize, f64)]) -> Vec<f64> {
        self.documents
            .iter()
            .map(|doc| dot(query, doc).clamp(0.0, 1.0))
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("2 cups of Basmati Rice, a pinch of salt"),
            vec!["cups", "basmati", "rice", "pinch", "salt"]
        );
        assert!(tokenize("a, I, of").is_empty());
    }

    #[test]
    fn test_fit_rejects_degenerate_corpora() {
        let empty: Vec<&str> = vec![];
        assert_eq!(TfidfModel::fit(&empty).unwrap_err(), VectorizeError::EmptyCorpus);
        assert_eq!(
            TfidfModel::fit(&["", "the and of"]).unwrap_err(),
            VectorizeError::EmptyVocabulary
        );
    }

    #[test]
    fn test_stop_words_stay_out_of_vocabulary() {
        let model = TfidfModel::fit(&["salt and pepper", "the salt"]).unwrap();
        assert_eq!(model.vocabulary_size(), 2);
        assert!(model.idf("and").is_none());
        assert!(model.idf("the").is_none());
    }

    #[test]
    fn test_idf_values() {
        let model = TfidfModel::fit(&["salt pepper", "salt cumin"]).unwrap();
        // Present in every document
        assert!((model.idf("salt").unwrap() - 1.0).abs() < EPS);
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((model.idf("pepper").unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_identical_text_scores_one() {
        let model = TfidfModel::fit(&["onion tomato garlic", "milk sugar"]).unwrap();
        let query = model.transform("garlic, tomato, onion");
        let scores = model.similarities(&query);
        assert!((scores[0] - 1.0).abs() < EPS);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn test_unknown_query_is_zero_vector() {
        let model = TfidfModel::fit(&["onion tomato"]).unwrap();
        let query = model.transform("saffron");
        assert!(query.is_empty());
        assert_eq!(model.similarities(&query), vec![0.0]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let model = TfidfModel::fit(&["rice rice dal", "dal ghee", ""]).unwrap();
        for doc in &model.documents[..2] {
            let norm: f64 = doc.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < EPS);
        }
        assert!(model.documents[2].is_empty());
    }

    #[test]
    fn test_dot_merges_sorted_indices() {
        let a = vec![(0, 1.0), (2, 2.0), (5, 1.0)];
        let b = vec![(2, 3.0), (3, 1.0), (5, 4.0)];
        assert!((dot(&a, &b) - 10.0).abs() < EPS);
    }
}
