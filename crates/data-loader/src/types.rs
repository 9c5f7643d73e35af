//! Core domain types for the TMDB movie catalog.
//!
//! This module defines the data structures shared by the offline model
//! build and the query-time recommender:
//! - `RawMovie`: one joined row of the TMDB movies + credits files
//! - `MovieRecord`: one catalog entry after tag composition

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Stable TMDB identifier for a movie (the `id` column of the movies file)
pub type MovieId = u32;

// =============================================================================
// Raw Dataset Types
// =============================================================================

/// A movie as it comes out of the dataset, before any normalization.
///
/// `genres`, `keywords`, `cast` and `crew` are kept as the raw serialized
/// lists from the CSV (e.g. `[{"id": 28, "name": "Action"}]`). Parsing them
/// is the normalizer's job, and a malformed list must not stop the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub overview: String,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub crew: String,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// One row of the catalog artifact.
///
/// `tags` is the composed, lowercased and stemmed tag string; its tokens are
/// separated by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub catalog_id: MovieId,
    pub title: String,
    pub tags: String,
}

impl MovieRecord {
    pub fn new(catalog_id: MovieId, title: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            catalog_id,
            title: title.into(),
            tags: tags.into(),
        }
    }

    /// The tag string as an ordered token sequence
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tags.split_whitespace()
    }

    /// True when composition produced no tokens at all
    pub fn has_tags(&self) -> bool {
        self.tokens().next().is_some()
    }
}
