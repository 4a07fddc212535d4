//! Vector Space Model — TF-IDF weighting and cosine similarity over an ad-hoc corpus.
//!
//! Nothing is cached between calls. The vocabulary and IDF weights are built
//! from exactly the documents passed in, so the same pair of documents scores
//! differently depending on what else shares the corpus. Catalog-mode and
//! pairwise-mode callers rely on that.
//!
//! Weighting:
//! - tokens: lower-cased runs of word characters, at least two characters long
//! - stop words removed
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1` over the combined corpus of `n` documents
//! - `w(t, d) = count(t, d) × idf(t)`, then each vector is L2-normalized
//! - similarity = dot product of the normalized vectors

use std::collections::{BTreeMap, HashMap};

use crate::matching::stopwords::is_stop_word;

// ────────────────────────────────────────────────────────────────────────────
// Tokenizing
// ────────────────────────────────────────────────────────────────────────────

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits text into lower-cased terms, dropping one-character tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

fn term_counts(text: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for term in tokenize(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

// ────────────────────────────────────────────────────────────────────────────
// Weighted vectors
// ────────────────────────────────────────────────────────────────────────────

/// Sparse, L2-normalized TF-IDF vector keyed by vocabulary index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector(BTreeMap<usize, f64>);

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Dot product, walking the shorter vector.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small
            .iter()
            .filter_map(|(index, weight)| large.get(index).map(|w| weight * w))
            .sum()
    }

    fn normalized(weights: BTreeMap<usize, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Self::default();
        }
        Self(weights.into_iter().map(|(i, w)| (i, w / norm)).collect())
    }
}

/// Cosine similarity between two normalized vectors, clamped to `[0, 1]`.
/// A zero vector is dissimilar to everything, itself included.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    a.dot(b).clamp(0.0, 1.0)
}

/// A fitted corpus: its sorted vocabulary and one weighted vector per document.
#[derive(Debug, Clone)]
pub struct TfIdfCorpus {
    vocabulary: Vec<String>,
    vectors: Vec<SparseVector>,
}

impl TfIdfCorpus {
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let counts: Vec<BTreeMap<String, u32>> =
            documents.iter().map(|d| term_counts(d.as_ref())).collect();

        let mut document_frequency: BTreeMap<&str, u32> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let vocabulary: Vec<String> = document_frequency.keys().map(|t| t.to_string()).collect();
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let n = documents.len() as f64;
        let idf: HashMap<&str, f64> = document_frequency
            .iter()
            .map(|(term, df)| (*term, ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0))
            .collect();

        let vectors = counts
            .iter()
            .map(|doc| {
                let weights = doc
                    .iter()
                    .map(|(term, count)| (index[term.as_str()], *count as f64 * idf[term.as_str()]))
                    .collect();
                SparseVector::normalized(weights)
            })
            .collect();

        Self { vocabulary, vectors }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn vector(&self, document: usize) -> Option<&SparseVector> {
        self.vectors.get(document)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }
}

/// Similarity of `query` to each of `corpus`, computed over the combined
/// corpus `{query} ∪ corpus`. One value per corpus document, each in `[0, 1]`.
///
/// An empty vocabulary (no documents, or nothing but stop words) yields all zeros.
pub fn similarity<S: AsRef<str>>(query: &str, corpus: &[S]) -> Vec<f64> {
    let mut documents: Vec<&str> = Vec::with_capacity(corpus.len() + 1);
    documents.push(query);
    documents.extend(corpus.iter().map(|d| d.as_ref()));

    let fitted = TfIdfCorpus::fit(&documents);
    tracing::debug!(
        documents = fitted.len(),
        vocabulary = fitted.vocabulary().len(),
        "fitted tf-idf corpus"
    );

    let Some(query_vector) = fitted.vector(0) else {
        return vec![0.0; corpus.len()];
    };
    if fitted.vocabulary().is_empty() {
        return vec![0.0; corpus.len()];
    }

    fitted.vectors[1..]
        .iter()
        .map(|doc| cosine(query_vector, doc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_tokenize_lowercases_and_drops_short_and_stop_words() {
        assert_eq!(
            tokenize("The Rust-based C API, built with SQL_Server and a DB"),
            vec!["rust", "based", "api", "built", "sql_server", "db"]
        );
    }

    #[test]
    fn test_tokenize_splits_symbols() {
        assert_eq!(tokenize("C++ / node.js"), vec!["node", "js"]);
    }

    #[test]
    fn test_identical_documents_have_similarity_one() {
        let scores = similarity("rust tokio backend", &["backend rust tokio"]);
        assert!((scores[0] - 1.0).abs() < EPS, "got {}", scores[0]);
    }

    #[test]
    fn test_disjoint_documents_have_similarity_zero() {
        let scores = similarity("python pandas", &["welding carpentry"]);
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_empty_corpus_vocabulary_is_all_zero() {
        assert_eq!(similarity("", &["", " "]), vec![0.0, 0.0]);
        assert_eq!(similarity("the and of", &["with a the"]), vec![0.0]);
    }

    #[test]
    fn test_no_corpus_documents_returns_empty() {
        assert!(similarity::<&str>("rust", &[]).is_empty());
    }

    #[test]
    fn test_pairwise_similarity_is_symmetric() {
        let a = "rust services postgres queues";
        let b = "postgres dashboards python services";
        let ab = similarity(a, &[b])[0];
        let ba = similarity(b, &[a])[0];
        assert!((ab - ba).abs() < EPS);
        assert!(ab > 0.0 && ab < 1.0);
    }

    #[test]
    fn test_similarity_depends_on_corpus() {
        let query = "python flask sql";
        let target = "python developer flask";
        let alone = similarity(query, &[target])[0];
        let crowded = similarity(query, &[target, "python analyst", "python tester", "sql admin"])[0];
        assert!((alone - crowded).abs() > 1e-6, "alone {alone} crowded {crowded}");
    }

    #[test]
    fn test_idf_uses_smoothed_formula() {
        // "rust" appears in both documents, "tokio" only in the first:
        // idf(rust) = ln(3/3) + 1 = 1, idf(tokio) = ln(3/2) + 1.
        let corpus = TfIdfCorpus::fit(&["rust tokio", "rust"]);
        assert_eq!(corpus.vocabulary(), &["rust".to_string(), "tokio".to_string()]);

        let idf_tokio = (3.0_f64 / 2.0).ln() + 1.0;
        let norm = (1.0 + idf_tokio * idf_tokio).sqrt();
        let expected = 1.0 / norm;
        let got = cosine(corpus.vector(0).unwrap(), corpus.vector(1).unwrap());
        assert!((got - expected).abs() < EPS, "expected {expected}, got {got}");
    }

    #[test]
    fn test_term_frequency_counts_repeats() {
        let once = similarity("rust java", &["rust"])[0];
        let twice = similarity("rust rust java", &["rust"])[0];
        assert!(twice > once);
    }

    #[test]
    fn test_zero_vector_cosine_is_zero() {
        let corpus = TfIdfCorpus::fit(&["rust", "the"]);
        let zero = corpus.vector(1).unwrap();
        assert!(zero.is_zero());
        assert_eq!(cosine(zero, zero), 0.0);
        assert_eq!(cosine(corpus.vector(0).unwrap(), zero), 0.0);
    }
}
