//! Tag composition.
//!
//! Merges the normalized fields of one movie into its tag string:
//! 1. Multi-word entries of genres / keywords / cast / crew lose their
//!    internal whitespace ("Science Fiction" -> "ScienceFiction")
//! 2. Fields are concatenated in the fixed order
//!    overview, genres, keywords, cast, crew
//! 3. The joined string is lowercased
//! 4. Every token is stemmed independently

use crate::normalizer::{extract_director, extract_names, tokenize_overview};
use crate::stemmer::PorterStemmer;
use crate::traits::Stemmer;
use data_loader::{MovieRecord, RawMovie};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of billed cast members kept per movie
pub const DEFAULT_CAST_LIMIT: usize = 3;

/// Builds tag strings from normalized movie fields.
#[derive(Clone)]
pub struct TagComposer {
    stemmer: Arc<dyn Stemmer>,
    cast_limit: usize,
}

impl TagComposer {
    pub fn new(stemmer: impl Stemmer + 'static) -> Self {
        Self {
            stemmer: Arc::new(stemmer),
            cast_limit: DEFAULT_CAST_LIMIT,
        }
    }

    /// Keep at most `cast_limit` cast members per movie (builder pattern)
    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.cast_limit = cast_limit;
        self
    }

    pub fn cast_limit(&self) -> usize {
        self.cast_limit
    }

    /// Compose the tag string from already-normalized token lists
    pub fn compose(
        &self,
        overview: &[String],
        genres: &[String],
        keywords: &[String],
        cast: &[String],
        crew: &[String],
    ) -> String {
        let squashed = [genres, keywords, cast, crew]
            .into_iter()
            .flatten()
            .map(|token| squash_whitespace(token));

        let joined = overview
            .iter()
            .cloned()
            .chain(squashed)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        joined
            .split_whitespace()
            .map(|token| self.stemmer.stem(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalize and compose one raw movie
    pub fn compose_record(&self, raw: &RawMovie) -> MovieRecord {
        let tags = self.compose(
            &tokenize_overview(&raw.overview),
            &extract_names(&raw.genres, None),
            &extract_names(&raw.keywords, None),
            &extract_names(&raw.cast, Some(self.cast_limit)),
            &extract_director(&raw.crew),
        );
        MovieRecord::new(raw.movie_id, raw.title.clone(), tags)
    }

    /// Compose every raw movie in parallel.
    ///
    /// Output order matches input order. Records whose tag string comes out
    /// empty are dropped.
    pub fn compose_all(&self, raws: &[RawMovie]) -> Vec<MovieRecord> {
        debug!(
            "Composing tags for {} movies with {}",
            raws.len(),
            self.stemmer.name()
        );

        let composed: Vec<MovieRecord> = raws
            .par_iter()
            .map(|raw| self.compose_record(raw))
            .collect();

        let total = composed.len();
        let records: Vec<MovieRecord> = composed
            .into_iter()
            .filter(|record| {
                if record.has_tags() {
                    true
                } else {
                    warn!(
                        "Dropping movie {} ({:?}): no tags after normalization",
                        record.catalog_id, record.title
                    );
                    false
                }
            })
            .collect();

        info!("Composed tags for {} of {} movies", records.len(), total);
        records
    }
}

impl Default for TagComposer {
    fn default() -> Self {
        Self::new(PorterStemmer)
    }
}

/// Remove every whitespace character from a token
fn squash_whitespace(token: &str) -> String {
    token.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::IdentityStemmer;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_compose_order_and_squashing() {
        let composer = TagComposer::new(IdentityStemmer);
        let tags = composer.compose(
            &strings(&["A", "Robot"]),
            &strings(&["Science Fiction"]),
            &strings(&["space war"]),
            &strings(&["Sam Worthington"]),
            &strings(&["James Cameron"]),
        );
        assert_eq!(
            tags,
            "a robot sciencefiction spacewar samworthington jamescameron"
        );
    }

    #[test]
    fn test_overview_tokens_are_not_squashed() {
        let composer = TagComposer::new(IdentityStemmer);
        let tags = composer.compose(&strings(&["Two", "Words"]), &[], &[], &[], &[]);
        assert_eq!(tags, "two words");
    }

    #[test]
    fn test_compose_stems_each_token() {
        let composer = TagComposer::default();
        let tags = composer.compose(
            &strings(&["Running", "robots"]),
            &strings(&["Action"]),
            &[],
            &[],
            &[],
        );
        assert_eq!(tags, "run robot action");
    }

    #[test]
    fn test_empty_fields_are_tolerated() {
        let composer = TagComposer::default();
        assert_eq!(composer.compose(&[], &[], &[], &[], &[]), "");
        let tags = composer.compose(&[], &strings(&["Drama"]), &[], &[], &[]);
        assert_eq!(tags, "drama");
    }

    fn raw(id: u32, title: &str, overview: &str, cast: &str) -> RawMovie {
        RawMovie {
            movie_id: id,
            title: title.to_string(),
            overview: overview.to_string(),
            genres: r#"[{"id": 878, "name": "Science Fiction"}]"#.to_string(),
            keywords: "not json".to_string(),
            cast: cast.to_string(),
            crew: r#"[{"job": "Director", "name": "James Cameron"}]"#.to_string(),
        }
    }

    #[test]
    fn test_compose_record() {
        let cast = r#"[{"name": "A One"}, {"name": "B Two"}, {"name": "C Three"}, {"name": "D Four"}]"#;
        let record = TagComposer::new(IdentityStemmer).compose_record(&raw(1, "Alpha", "Hello", cast));
        assert_eq!(record.catalog_id, 1);
        assert_eq!(record.title, "Alpha");
        // malformed keywords contribute nothing, cast stops at three
        assert_eq!(
            record.tags,
            "hello sciencefiction aone btwo cthree jamescameron"
        );
    }

    #[test]
    fn test_cast_limit_is_configurable() {
        let cast = r#"[{"name": "A"}, {"name": "B"}]"#;
        let composer = TagComposer::new(IdentityStemmer).with_cast_limit(1);
        let record = composer.compose_record(&raw(1, "Alpha", "", cast));
        assert_eq!(record.tags, "sciencefiction a jamescameron");
    }

    #[test]
    fn test_compose_all_keeps_order_and_drops_empty() {
        let mut empty = raw(2, "Empty", "", "[]");
        empty.genres = "[]".to_string();
        empty.crew = "[]".to_string();
        let raws = vec![raw(3, "C", "x", "[]"), empty, raw(1, "A", "y", "[]")];

        let records = TagComposer::default().compose_all(&raws);
        let ids: Vec<u32> = records.iter().map(|r| r.catalog_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
