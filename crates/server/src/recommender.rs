//! # Recommender
//!
//! Answers "movies like this one" from a loaded `Model`:
//! 1. Lookup: first catalog row whose title equals the query exactly
//! 2. Rank: that row of the similarity matrix, descending, ties by row
//! 3. Select: top K, never the query itself
//! 4. Fetch display assets: one poster per pick, concurrently, each under
//!    its own timeout, with the placeholder standing in for any failure
//!
//! The model is shared read-only behind an `Arc`, so one `Recommender` can
//! serve any number of concurrent requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use data_loader::{MovieId, MovieRecord};
use pipeline::Model;
use poster_client::{OfflinePosterLookup, PosterError, PosterLookup, TmdbPosterClient};

/// Errors surfaced by the typed recommendation API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    #[error("Title not found in catalog: {0:?}")]
    TitleNotFound(String),
}

/// One ranked neighbour of the query, before posters are fetched
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMovie {
    pub row: usize,
    pub catalog_id: MovieId,
    pub title: String,
    pub score: f32,
}

/// Final recommendation returned to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub catalog_id: MovieId,
    pub title: String,
    pub score: f32,
    pub poster_url: String,
    /// True when the poster lookup failed and `poster_url` is the placeholder
    pub placeholder: bool,
}

/// The presentation-facing result: parallel name and poster sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationSet {
    pub names: Vec<String>,
    pub posters: Vec<String>,
}

impl RecommendationSet {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl From<Vec<Recommendation>> for RecommendationSet {
    fn from(recommendations: Vec<Recommendation>) -> Self {
        let (names, posters) = recommendations
            .into_iter()
            .map(|rec| (rec.title, rec.poster_url))
            .unzip();
        Self { names, posters }
    }
}

/// Rank the `k` records most similar to `title`.
///
/// Records carrying the query title (the query row and any duplicate) are
/// excluded. Equal scores keep catalog order.
pub fn rank_similar(
    model: &Model,
    title: &str,
    k: usize,
) -> Result<Vec<RankedMovie>, RecommendError> {
    let query_row = model
        .find_title(title)
        .ok_or_else(|| RecommendError::TitleNotFound(title.to_string()))?;

    let mut scored: Vec<(usize, f32)> = model
        .similarity_row(query_row)
        .iter()
        .copied()
        .enumerate()
        .filter(|&(row, _)| row != query_row && model.catalog()[row].title != title)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .map(|(row, score)| {
            let record = &model.catalog()[row];
            RankedMovie {
                row,
                catalog_id: record.catalog_id,
                title: record.title.clone(),
                score,
            }
        })
        .collect())
}

/// Query-time recommendation service
#[derive(Clone)]
pub struct Recommender {
    model: Arc<Model>,
    posters: Arc<dyn PosterLookup>,
    placeholder: String,
    poster_timeout: Duration,
    count: usize,
}

impl Recommender {
    /// Create a recommender with default placeholder, timeout and count
    pub fn new(model: Arc<Model>, posters: Arc<dyn PosterLookup>) -> Self {
        let defaults = Config::default();
        Self {
            model,
            posters,
            placeholder: defaults.placeholder_poster_url.clone(),
            poster_timeout: defaults.poster_timeout(),
            count: defaults.recommendation_count,
        }
    }

    /// Create a recommender wired as `config` describes.
    ///
    /// Uses TMDB for posters when an API key is set, offline lookups otherwise.
    pub fn from_config(model: Arc<Model>, config: &Config) -> Self {
        let posters: Arc<dyn PosterLookup> = match config.tmdb() {
            Some(tmdb) => Arc::new(TmdbPosterClient::new(tmdb)),
            None => {
                info!("No TMDB API key configured, posters will use the placeholder");
                Arc::new(OfflinePosterLookup)
            }
        };
        Self::new(model, posters)
            .with_placeholder(config.placeholder_poster_url.clone())
            .with_poster_timeout(config.poster_timeout())
            .with_count(config.recommendation_count)
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_poster_timeout(mut self, timeout: Duration) -> Self {
        self.poster_timeout = timeout;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Presentation-boundary entry point.
    ///
    /// An unknown title yields two empty sequences.
    #[instrument(skip(self))]
    pub async fn recommend(&self, title: &str) -> RecommendationSet {
        match self.try_recommend(title, self.count).await {
            Ok(recommendations) => recommendations.into(),
            Err(e) => {
                info!("{}", e);
                RecommendationSet::default()
            }
        }
    }

    /// Typed entry point: top `k` recommendations with posters
    #[instrument(skip(self))]
    pub async fn try_recommend(
        &self,
        title: &str,
        k: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        let start = Instant::now();

        let ranked = rank_similar(&self.model, title, k)?;
        debug!("Ranked {} neighbours for {:?}", ranked.len(), title);

        let posters = join_all(ranked.iter().map(|movie| self.fetch_poster(movie.catalog_id))).await;

        let recommendations: Vec<Recommendation> = ranked
            .into_iter()
            .zip(posters)
            .map(|(movie, poster)| {
                let (poster_url, placeholder) = match poster {
                    Ok(url) => (url, false),
                    Err(e) => {
                        warn!("Using placeholder poster for movie {}: {}", movie.catalog_id, e);
                        (self.placeholder.clone(), true)
                    }
                };
                Recommendation {
                    catalog_id: movie.catalog_id,
                    title: movie.title,
                    score: movie.score,
                    poster_url,
                    placeholder,
                }
            })
            .collect();

        info!(
            "Recommended {} movies for {:?} in {:.2?}",
            recommendations.len(),
            title,
            start.elapsed()
        );
        Ok(recommendations)
    }

    /// Case-insensitive title search: exact matches first, then substring
    /// matches, each group in catalog order
    pub fn search(&self, query: &str, limit: usize) -> Vec<&MovieRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for record in self.model.catalog() {
            let title = record.title.to_lowercase();
            if title == query {
                exact.push(record);
            } else if title.contains(&query) {
                partial.push(record);
            }
        }

        exact.into_iter().chain(partial).take(limit).collect()
    }

    /// One poster lookup under the per-request timeout
    async fn fetch_poster(&self, movie_id: MovieId) -> Result<String, PosterError> {
        match tokio::time::timeout(self.poster_timeout, self.posters.poster_url(movie_id)).await {
            Ok(result) => result,
            Err(_) => Err(PosterError::Timeout {
                millis: self.poster_timeout.as_millis() as u64,
            }),
        }
    }
}
