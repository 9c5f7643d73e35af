//! Bag-of-words vectorization.
//!
//! The vocabulary is the `max_features` most frequent tokens of the corpus,
//! stopwords excluded. Column order is descending frequency with ties broken
//! by the token itself, so the same corpus always yields the same columns.

use crate::stopwords::StopWords;
use ndarray::Array2;
use ndarray::parallel::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

/// Default vocabulary size
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Shortest token kept by the tokenizer
const MIN_TOKEN_CHARS: usize = 2;

/// One dense count per vocabulary column
pub type FeatureVector = Vec<u32>;

/// Dense M x F count matrix, one row per catalog record
pub type FeatureMatrix = Array2<u32>;

/// Split a tag string into vocabulary candidates.
///
/// Any character that is not alphanumeric or `_` separates tokens, and
/// tokens shorter than two characters are dropped.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
}

/// The fixed, ordered set of tokens used as feature columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vocabulary {
    tokens: Vec<String>,
    columns: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary from tokens already in column order
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let columns = tokens
            .iter()
            .enumerate()
            .map(|(column, token)| (token.clone(), column))
            .collect();
        Self { tokens, columns }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Column index of a token
    pub fn column(&self, token: &str) -> Option<usize> {
        self.columns.get(token).copied()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Select the top `max_features` tokens of the corpus by total frequency
pub fn fit_vocabulary<'a, I>(tag_strings: I, max_features: usize, stopwords: &StopWords) -> Vocabulary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&'a str, u64> = HashMap::new();
    for tags in tag_strings {
        for token in tokenize(tags) {
            if !stopwords.contains(token) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
    }
    let distinct = counts.len();

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_features);

    info!(
        "Fitted vocabulary: {} of {} distinct tokens (max_features = {})",
        ranked.len(),
        distinct,
        max_features
    );
    if let Some((token, count)) = ranked.first() {
        debug!("Most frequent token: {:?} ({} occurrences)", token, count);
    }

    Vocabulary::from_tokens(ranked.into_iter().map(|(token, _)| token.to_string()).collect())
}

/// Count vocabulary tokens in one tag string; unknown tokens are ignored
pub fn encode(tag_string: &str, vocabulary: &Vocabulary) -> FeatureVector {
    let mut vector = vec![0; vocabulary.len()];
    for token in tokenize(tag_string) {
        if let Some(column) = vocabulary.column(token) {
            vector[column] += 1;
        }
    }
    vector
}

/// Encode every tag string into one dense row each, in parallel
pub fn encode_all(tag_strings: &[&str], vocabulary: &Vocabulary) -> FeatureMatrix {
    let mut matrix = FeatureMatrix::zeros((tag_strings.len(), vocabulary.len()));
    matrix
        .outer_iter_mut()
        .into_par_iter()
        .zip(tag_strings.par_iter())
        .for_each(|(mut row, tags)| {
            for token in tokenize(tags) {
                if let Some(column) = vocabulary.column(token) {
                    row[column] += 1;
                }
            }
        });
    debug!("Encoded {} x {} feature matrix", matrix.nrows(), matrix.ncols());
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(tokens: &[&str]) -> Vocabulary {
        Vocabulary::from_tokens(tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        let tokens: Vec<&str> = tokenize("centuri, a war-torn planet's 22nd a_b x").collect();
        assert_eq!(tokens, vec!["centuri", "war", "torn", "planet", "22nd", "a_b"]);
    }

    #[test]
    fn test_fit_orders_by_frequency_then_token() {
        let corpus = ["space robot", "space alien", "romance drama"];
        let vocabulary = fit_vocabulary(corpus, 10, &StopWords::none());
        assert_eq!(
            vocabulary.tokens(),
            &["space", "alien", "drama", "robot", "romance"]
        );
        assert_eq!(vocabulary.column("space"), Some(0));
        assert_eq!(vocabulary.column("missing"), None);
    }

    #[test]
    fn test_fit_respects_max_features_and_stopwords() {
        let corpus = ["the cat the dog", "the cat", "bird"];
        let vocabulary = fit_vocabulary(corpus, 2, &StopWords::english());
        assert_eq!(vocabulary.tokens(), &["cat", "bird"]);
        assert!(vocabulary.column("the").is_none());
    }

    #[test]
    fn test_fit_empty_corpus() {
        let vocabulary = fit_vocabulary(std::iter::empty::<&str>(), 10, &StopWords::english());
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_encode_counts_and_ignores_unknown() {
        let vocabulary = vocab(&["space", "robot", "alien"]);
        assert_eq!(encode("robot space robot ufo", &vocabulary), vec![1, 2, 0]);
        assert_eq!(encode("", &vocabulary), vec![0, 0, 0]);
        assert_eq!(encode("nothing known", &vocabulary), vec![0, 0, 0]);
    }

    #[test]
    fn test_encode_all_matches_encode() {
        let vocabulary = vocab(&["space", "robot", "alien", "romance", "drama"]);
        let tags = ["space robot", "space alien", "romance drama", ""];
        let matrix = encode_all(&tags, &vocabulary);

        assert_eq!(matrix.dim(), (4, 5));
        for (row, tag) in matrix.outer_iter().zip(tags) {
            assert_eq!(row.to_vec(), encode(tag, &vocabulary));
        }
        assert!(matrix.row(3).iter().all(|&c| c == 0));
    }
}
