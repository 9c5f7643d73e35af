//! The recommendation model: catalog and similarity matrix as one value.
//!
//! Row `i` of the matrix always belongs to catalog record `i`. Keeping both
//! inside `Model` (and checking their shapes on construction) means the two
//! can never drift apart.

use crate::composer::{TagComposer, DEFAULT_CAST_LIMIT};
use crate::error::{ArtifactError, Result};
use crate::similarity::{compute_similarity_matrix, SimilarityMatrix};
use crate::stemmer::PorterStemmer;
use crate::stopwords::StopWords;
use crate::vectorizer::{encode_all, fit_vocabulary, Vocabulary, DEFAULT_MAX_FEATURES};
use data_loader::{MovieId, MovieRecord, RawMovie};
use ndarray::ArrayView1;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::info;

/// Parameters of the offline build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub max_features: usize,
    pub cast_limit: usize,
}

impl ModelConfig {
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.cast_limit = cast_limit;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            cast_limit: DEFAULT_CAST_LIMIT,
        }
    }
}

/// Immutable, index-aligned pairing of catalog and similarity matrix
#[derive(Debug, Clone)]
pub struct Model {
    catalog: Vec<MovieRecord>,
    similarity: SimilarityMatrix,
    /// title -> first row carrying it
    title_rows: HashMap<String, usize>,
}

impl Model {
    /// Pair a catalog with its similarity matrix.
    ///
    /// Fails if the matrix is not `len x len` or a catalog id repeats.
    pub fn new(catalog: Vec<MovieRecord>, similarity: SimilarityMatrix) -> Result<Self> {
        let (rows, cols) = similarity.dim();
        if rows != catalog.len() || cols != catalog.len() {
            return Err(ArtifactError::DimensionMismatch {
                catalog: catalog.len(),
                rows,
                cols,
            });
        }

        let mut ids: HashSet<MovieId> = HashSet::with_capacity(catalog.len());
        let mut title_rows = HashMap::with_capacity(catalog.len());
        for (row, record) in catalog.iter().enumerate() {
            if !ids.insert(record.catalog_id) {
                return Err(ArtifactError::DuplicateId(record.catalog_id));
            }
            title_rows.entry(record.title.clone()).or_insert(row);
        }

        Ok(Self {
            catalog,
            similarity,
            title_rows,
        })
    }

    pub fn catalog(&self) -> &[MovieRecord] {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn record(&self, row: usize) -> Option<&MovieRecord> {
        self.catalog.get(row)
    }

    /// Row of the first record whose title equals `title` exactly
    pub fn find_title(&self, title: &str) -> Option<usize> {
        self.title_rows.get(title).copied()
    }

    /// Similarities of record `row` to every record.
    ///
    /// # Panics
    /// If `row >= self.len()`.
    pub fn similarity_row(&self, row: usize) -> ArrayView1<'_, f32> {
        self.similarity.row(row)
    }

    /// Split back into the two artifacts
    pub fn into_parts(self) -> (Vec<MovieRecord>, SimilarityMatrix) {
        (self.catalog, self.similarity)
    }
}

/// Run the whole offline pipeline over the raw dataset.
///
/// raw movies -> tags -> vocabulary -> count vectors -> cosine matrix
pub fn build_model(raw: &[RawMovie], config: &ModelConfig) -> Result<Model> {
    let start = Instant::now();
    info!("Building model from {} raw movies ({:?})", raw.len(), config);

    let composer = TagComposer::new(PorterStemmer).with_cast_limit(config.cast_limit);
    let catalog = composer.compose_all(raw);
    if catalog.is_empty() {
        return Err(ArtifactError::EmptyCatalog);
    }

    let tags: Vec<&str> = catalog.iter().map(|record| record.tags.as_str()).collect();
    let vocabulary: Vocabulary =
        fit_vocabulary(tags.iter().copied(), config.max_features, &StopWords::english());
    let features = encode_all(&tags, &vocabulary);
    let similarity = compute_similarity_matrix(&features);

    let model = Model::new(catalog, similarity)?;
    info!(
        "Built model: {} movies, {} features in {:.2?}",
        model.len(),
        vocabulary.len(),
        start.elapsed()
    );
    Ok(model)
}
