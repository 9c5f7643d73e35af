//! Query-time configuration loaded from environment variables.

use poster_client::TmdbConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Recommender configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// TMDB API key; without one, posters fall back to the placeholder
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with a movie's `poster_path`
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Shown whenever a poster lookup fails
    #[serde(default = "default_placeholder_poster_url")]
    pub placeholder_poster_url: String,

    /// Per-poster request timeout
    #[serde(default = "default_poster_timeout_ms")]
    pub poster_timeout_ms: u64,

    /// Directory holding `movie_list.json` and `similarity.bin`
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Number of recommendations per query
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_placeholder_poster_url() -> String {
    "https://via.placeholder.com/500x750.png?text=No+Poster+Found".to_string()
}

fn default_poster_timeout_ms() -> u64 {
    5000
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("model")
}

fn default_recommendation_count() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_millis(self.poster_timeout_ms)
    }

    /// TMDB settings, if an API key is configured
    pub fn tmdb(&self) -> Option<TmdbConfig> {
        let api_key = self.tmdb_api_key.as_ref().filter(|key| !key.trim().is_empty())?;
        Some(TmdbConfig {
            api_key: api_key.clone(),
            api_url: self.tmdb_api_url.clone(),
            image_base_url: self.poster_base_url.clone(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            poster_base_url: default_poster_base_url(),
            placeholder_poster_url: default_placeholder_poster_url(),
            poster_timeout_ms: default_poster_timeout_ms(),
            model_dir: default_model_dir(),
            recommendation_count: default_recommendation_count(),
        }
    }
}
