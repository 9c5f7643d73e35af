//! Error types for the feature pipeline and its artifacts.

use data_loader::MovieId;
use thiserror::Error;

/// A serialized attribute list (genres, keywords, cast, crew) could not be read.
///
/// The infallible normalizer functions swallow this and return an empty list;
/// the `try_*` variants surface it.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Malformed attribute list: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors building, saving or loading the catalog + similarity artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// An artifact file does not exist
    #[error("Artifact not found: {path} (run the `build` command first)")]
    Missing { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not a valid record list
    #[error("Corrupt catalog artifact: {0}")]
    Catalog(#[from] serde_json::Error),

    /// The similarity file could not be decoded
    #[error("Corrupt similarity artifact: {0}")]
    Similarity(#[from] bincode::Error),

    /// Catalog and matrix are not index-aligned
    #[error("Similarity matrix is {rows}x{cols} but the catalog has {catalog} records")]
    DimensionMismatch {
        catalog: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Duplicate catalog id {0}")]
    DuplicateId(MovieId),

    /// Nothing survived composition
    #[error("Model build produced an empty catalog")]
    EmptyCatalog,
}

/// Convenience type alias for artifact results
pub type Result<T> = std::result::Result<T, ArtifactError>;
