//! Pairwise cosine similarity.
//!
//! ## Algorithm
//! 1. Convert counts to f32 and L2-normalize every row (in parallel)
//! 2. One dense product `N · Nᵀ` gives all cosines at once
//! 3. Mirror the upper triangle so the matrix is exactly symmetric
//! 4. Pin the diagonal: 1.0 for non-zero rows, 0.0 for zero rows
//!
//! A zero row has no shared vocabulary with anything, so every similarity
//! involving it is 0.

use crate::vectorizer::FeatureMatrix;
use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use tracing::debug;

/// Square, symmetric, row-aligned with the catalog
pub type SimilarityMatrix = Array2<f32>;

/// Compute the full M x M cosine-similarity matrix of the feature rows
pub fn compute_similarity_matrix(features: &FeatureMatrix) -> SimilarityMatrix {
    let n = features.nrows();
    let zero_rows: Vec<bool> = features
        .outer_iter()
        .map(|row| row.iter().all(|&count| count == 0))
        .collect();

    let mut normalized = features.mapv(|count| count as f32);
    normalized
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut row| {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        });

    let mut similarity = normalized.dot(&normalized.t());

    for i in 0..n {
        similarity[[i, i]] = if zero_rows[i] { 0.0 } else { 1.0 };
        for j in (i + 1)..n {
            let value = similarity[[i, j]].clamp(0.0, 1.0);
            similarity[[i, j]] = value;
            similarity[[j, i]] = value;
        }
    }

    debug!(
        "Computed {} x {} similarity matrix ({} zero rows)",
        n,
        n,
        zero_rows.iter().filter(|&&zero| zero).count()
    );
    similarity
}
