//! Joining the two TMDB tables into `RawMovie` rows.
//!
//! The join mirrors an inner join of movies and credits on the movie id:
//! - rows keep the order of the movies file
//! - the movies-file title wins over the credits-file title
//! - rows missing any of the seven used columns are dropped
//! - a movie id seen twice keeps its first row

use crate::error::{DataLoadError, Result};
use crate::parser::{self, CreditRow, MovieRow, CREDITS_FILE, MOVIES_FILE};
use crate::types::{MovieId, RawMovie};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Counters describing what the join kept and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub movies_read: usize,
    pub credits_read: usize,
    pub without_credits: usize,
    pub incomplete: usize,
    pub duplicates: usize,
    pub kept: usize,
}

/// Load and join the TMDB dataset from a directory
///
/// Steps:
/// 1. Parse both CSV files in parallel (rayon::join)
/// 2. Index credits by movie id
/// 3. Walk the movies in file order and build complete `RawMovie`s
pub fn load_dataset(data_dir: &Path) -> Result<Vec<RawMovie>> {
    info!("Loading TMDB dataset from {:?}", data_dir);

    let movies_path = data_dir.join(MOVIES_FILE);
    let credits_path = data_dir.join(CREDITS_FILE);

    let (movies, credits) = rayon::join(
        || parser::parse_movies(&movies_path),
        || parser::parse_credits(&credits_path),
    );
    let movies = movies?;
    let credits = credits?;

    let (raw, stats) = join_movies_and_credits(movies, credits);
    info!(
        "Joined dataset: {} movies, {} credits -> {} complete rows ({} without credits, {} incomplete, {} duplicates)",
        stats.movies_read,
        stats.credits_read,
        stats.kept,
        stats.without_credits,
        stats.incomplete,
        stats.duplicates
    );

    if raw.is_empty() {
        return Err(DataLoadError::ValidationError(
            "No complete movie rows after joining movies and credits".to_string(),
        ));
    }
    Ok(raw)
}

/// Inner-join parsed movie rows with parsed credit rows
pub fn join_movies_and_credits(
    movies: Vec<MovieRow>,
    credits: Vec<CreditRow>,
) -> (Vec<RawMovie>, JoinStats) {
    let mut stats = JoinStats {
        movies_read: movies.len(),
        credits_read: credits.len(),
        ..JoinStats::default()
    };

    let mut credits_by_id: HashMap<MovieId, CreditRow> = HashMap::with_capacity(credits.len());
    for credit in credits {
        credits_by_id.entry(credit.movie_id).or_insert(credit);
    }

    let mut seen: HashSet<MovieId> = HashSet::with_capacity(movies.len());
    let mut joined = Vec::with_capacity(movies.len());

    for movie in movies {
        let Some(credit) = credits_by_id.get(&movie.id) else {
            stats.without_credits += 1;
            continue;
        };
        if !seen.insert(movie.id) {
            stats.duplicates += 1;
            continue;
        }

        let id = movie.id;
        match complete_row(movie, credit) {
            Some(raw) => joined.push(raw),
            None => {
                debug!("Dropping movie {}: missing field", id);
                stats.incomplete += 1;
            }
        }
    }

    stats.kept = joined.len();
    (joined, stats)
}

/// Build a `RawMovie` only if every used column is present
fn complete_row(movie: MovieRow, credit: &CreditRow) -> Option<RawMovie> {
    Some(RawMovie {
        movie_id: movie.id,
        title: movie.title?,
        overview: movie.overview?,
        genres: movie.genres?,
        keywords: movie.keywords?,
        cast: credit.cast.clone()?,
        crew: credit.crew.clone()?,
    })
}
