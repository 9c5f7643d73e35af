//! Poster lookup for recommended movies.
//!
//! The recommender only needs "catalog id in, image URL out". This crate
//! provides:
//! - `PosterLookup`: the keyed-lookup trait the recommender depends on
//! - `TmdbPosterClient`: the TMDB `/movie/{id}` HTTP implementation
//! - `OfflinePosterLookup`: used when no API key is configured
//!
//! Every failure is a `PosterError`; callers decide how to fall back.

use async_trait::async_trait;
use data_loader::MovieId;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when looking up a poster
#[derive(Error, Debug)]
pub enum PosterError {
    /// Connection, TLS or body-read failure
    #[error("Poster request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Poster service returned HTTP {status} for movie {movie_id}")]
    Status { movie_id: MovieId, status: u16 },

    /// The response had no usable `poster_path`
    #[error("No poster for movie {0}")]
    NotFound(MovieId),

    #[error("Malformed poster response for movie {movie_id}: {reason}")]
    Malformed { movie_id: MovieId, reason: String },

    #[error("Poster lookup timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("Poster lookup is not configured")]
    NotConfigured,
}

/// Keyed lookup of a movie's poster image URL
#[async_trait]
pub trait PosterLookup: Send + Sync {
    /// Returns the name of this lookup (for logging/debugging)
    fn name(&self) -> &str;

    /// Fetch the poster URL for one catalog id
    async fn poster_url(&self, movie_id: MovieId) -> Result<String, PosterError>;
}

/// Connection settings for the TMDB API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmdbConfig {
    pub api_key: String,
    /// e.g. `https://api.themoviedb.org/3`
    pub api_url: String,
    /// e.g. `https://image.tmdb.org/t/p/w500`
    pub image_base_url: String,
}

/// The subset of `/movie/{id}` we read
#[derive(Debug, Deserialize)]
struct MovieDetails {
    poster_path: Option<String>,
}

/// Poster lookup against the TMDB HTTP API
#[derive(Clone)]
pub struct TmdbPosterClient {
    http_client: HttpClient,
    config: TmdbConfig,
}

impl TmdbPosterClient {
    pub fn new(config: TmdbConfig) -> Self {
        Self::with_http_client(HttpClient::new(), config)
    }

    pub fn with_http_client(http_client: HttpClient, config: TmdbConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn details_url(&self, movie_id: MovieId) -> String {
        format!(
            "{}/movie/{}",
            self.config.api_url.trim_end_matches('/'),
            movie_id
        )
    }

    fn image_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.config.image_base_url.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl PosterLookup for TmdbPosterClient {
    fn name(&self) -> &str {
        "TmdbPosterClient"
    }

    async fn poster_url(&self, movie_id: MovieId) -> Result<String, PosterError> {
        debug!("Fetching poster for movie {}", movie_id);

        let response = self
            .http_client
            .get(self.details_url(movie_id))
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", "en-US"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::Status {
                movie_id,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let details: MovieDetails =
            serde_json::from_str(&body).map_err(|e| PosterError::Malformed {
                movie_id,
                reason: e.to_string(),
            })?;

        match details.poster_path {
            Some(path) if !path.trim().is_empty() => Ok(self.image_url(&path)),
            _ => Err(PosterError::NotFound(movie_id)),
        }
    }
}

/// A lookup that never reaches the network
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflinePosterLookup;

#[async_trait]
impl PosterLookup for OfflinePosterLookup {
    fn name(&self) -> &str {
        "OfflinePosterLookup"
    }

    async fn poster_url(&self, _movie_id: MovieId) -> Result<String, PosterError> {
        Err(PosterError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TmdbPosterClient {
        TmdbPosterClient::new(TmdbConfig {
            api_key: "test-key".to_string(),
            api_url: format!("{}/3/", server.uri()),
            image_base_url: "https://image.tmdb.org/t/p/w500/".to_string(),
        })
    }

    #[tokio::test]
    async fn test_poster_url_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/19995"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 19995,
                "title": "Avatar",
                "poster_path": "/kyeqWdyUXW608qlYkRqosgbbJyK.jpg"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client(&server).poster_url(19995).await.unwrap();
        assert_eq!(
            url,
            "https://image.tmdb.org/t/p/w500/kyeqWdyUXW608qlYkRqosgbbJyK.jpg"
        );
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server).poster_url(1).await.unwrap_err();
        assert!(matches!(err, PosterError::Status { movie_id: 1, status: 404 }));
    }

    #[tokio::test]
    async fn test_missing_or_null_poster_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/movie/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3/movie/2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 2, "poster_path": null})),
            )
            .mount(&server)
            .await;

        let tmdb = client(&server);
        assert!(matches!(tmdb.poster_url(1).await, Err(PosterError::NotFound(1))));
        assert!(matches!(tmdb.poster_url(2).await, Err(PosterError::NotFound(2))));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).poster_url(7).await.unwrap_err();
        assert!(matches!(err, PosterError::Malformed { movie_id: 7, .. }));
    }

    #[tokio::test]
    async fn test_connection_error() {
        let tmdb = TmdbPosterClient::new(TmdbConfig {
            api_key: "k".to_string(),
            api_url: "http://127.0.0.1:1".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        });
        assert!(matches!(tmdb.poster_url(1).await, Err(PosterError::Http(_))));
    }

    #[tokio::test]
    async fn test_offline_lookup() {
        let offline = OfflinePosterLookup;
        assert_eq!(offline.name(), "OfflinePosterLookup");
        assert!(matches!(
            offline.poster_url(1).await,
            Err(PosterError::NotConfigured)
        ));
    }
}
