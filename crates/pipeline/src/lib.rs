//! Offline feature pipeline for content-based movie recommendations.
//!
//! This crate provides:
//! - Normalization of the raw TMDB attribute lists into token lists
//! - Tag composition with Porter stemming
//! - Bag-of-words vectorization over a fixed vocabulary
//! - The pairwise cosine-similarity matrix
//! - `Model`, the index-aligned catalog + matrix pair, and its artifacts
//!
//! ## Architecture
//! Data flows one way:
//! 1. `normalizer` parses genres / keywords / cast / crew and the overview
//! 2. `composer` merges them into one stemmed tag string per movie
//! 3. `vectorizer` fits the vocabulary and encodes count vectors
//! 4. `similarity` turns the count matrix into cosine similarities
//! 5. `artifacts` persists the resulting `Model`
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{build_model, ArtifactStore, ModelConfig};
//!
//! let raw = data_loader::load_dataset(Path::new("data/tmdb"))?;
//! let model = build_model(&raw, &ModelConfig::default())?;
//! ArtifactStore::new("model").save(&model)?;
//! ```

pub mod artifacts;
pub mod composer;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod similarity;
pub mod stemmer;
pub mod stopwords;
pub mod traits;
pub mod vectorizer;

// Re-export main types
pub use artifacts::ArtifactStore;
pub use composer::TagComposer;
pub use error::{ArtifactError, NormalizeError, Result};
pub use model::{build_model, Model, ModelConfig};
pub use similarity::{compute_similarity_matrix, SimilarityMatrix};
pub use stemmer::PorterStemmer;
pub use stopwords::StopWords;
pub use traits::Stemmer;
pub use vectorizer::{encode, encode_all, fit_vocabulary, FeatureMatrix, Vocabulary};
