//! Server crate for the movie recommender.
//!
//! This crate contains the query-time side of the system: loading the
//! persisted model once, and answering "movies like this one" requests
//! against it.

pub mod config;
pub mod recommender;

pub use config::Config;
pub use recommender::{
    rank_similar, RankedMovie, Recommendation, RecommendError, RecommendationSet, Recommender,
};

use std::path::Path;
use std::sync::Arc;

use pipeline::{ArtifactError, ArtifactStore, Model};

/// Load the model artifacts once at start-up.
///
/// Any error here must stop the process before it serves a query.
pub fn load_model(model_dir: &Path) -> Result<Arc<Model>, ArtifactError> {
    ArtifactStore::new(model_dir).load().map(Arc::new)
}
