//! Parser for the TMDB 5000 CSV files.
//!
//! Two files are read:
//! - tmdb_5000_movies.csv: id, title, overview, genres, keywords, ... (20 columns)
//! - tmdb_5000_credits.csv: movie_id, title, cast, crew
//!
//! Only the columns the model needs are kept. Columns are located by header
//! name, so the column order of the files does not matter. Empty fields are
//! returned as `None`; deciding what to do with them is the caller's job.

use crate::error::{DataLoadError, Result};
use crate::types::MovieId;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// File name of the movies table inside the dataset directory
pub const MOVIES_FILE: &str = "tmdb_5000_movies.csv";

/// File name of the credits table inside the dataset directory
pub const CREDITS_FILE: &str = "tmdb_5000_credits.csv";

/// The used columns of one row of the movies file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRow {
    pub id: MovieId,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<String>,
    pub keywords: Option<String>,
}

/// The used columns of one row of the credits file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditRow {
    pub movie_id: MovieId,
    pub cast: Option<String>,
    pub crew: Option<String>,
}

/// Open a dataset file, mapping "not found" to a dedicated error
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Find the position of a named column in the header row
fn column_index(headers: &StringRecord, name: &str, file: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line: 1,
            reason: format!("Missing column '{}'", name),
        })
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Read a field, treating empty (or whitespace-only) values as missing
fn optional_field(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.to_string())
}

fn parse_id(record: &StringRecord, idx: usize, file: &str, column: &str) -> Result<MovieId> {
    let value = record.get(idx).unwrap_or("").trim();
    value.parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_of(record),
        reason: format!("Invalid {} '{}': {}", column, value, e),
    })
}

/// Parse the movies file at `path`
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRow>> {
    parse_movies_from_reader(open(path)?)
}

/// Parse movies CSV content from any reader (used directly by tests)
pub fn parse_movies_from_reader<R: Read>(reader: R) -> Result<Vec<MovieRow>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let id_idx = column_index(&headers, "id", MOVIES_FILE)?;
    let title_idx = column_index(&headers, "title", MOVIES_FILE)?;
    let overview_idx = column_index(&headers, "overview", MOVIES_FILE)?;
    let genres_idx = column_index(&headers, "genres", MOVIES_FILE)?;
    let keywords_idx = column_index(&headers, "keywords", MOVIES_FILE)?;

    let mut movies = Vec::new();
    for record in reader.records() {
        let record = record?;
        movies.push(MovieRow {
            id: parse_id(&record, id_idx, MOVIES_FILE, "id")?,
            title: optional_field(&record, title_idx),
            overview: optional_field(&record, overview_idx),
            genres: optional_field(&record, genres_idx),
            keywords: optional_field(&record, keywords_idx),
        });
    }
    Ok(movies)
}

/// Parse the credits file at `path`
pub fn parse_credits(path: &Path) -> Result<Vec<CreditRow>> {
    parse_credits_from_reader(open(path)?)
}

/// Parse credits CSV content from any reader (used directly by tests)
pub fn parse_credits_from_reader<R: Read>(reader: R) -> Result<Vec<CreditRow>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let movie_id_idx = column_index(&headers, "movie_id", CREDITS_FILE)?;
    let cast_idx = column_index(&headers, "cast", CREDITS_FILE)?;
    let crew_idx = column_index(&headers, "crew", CREDITS_FILE)?;

    let mut credits = Vec::new();
    for record in reader.records() {
        let record = record?;
        credits.push(CreditRow {
            movie_id: parse_id(&record, movie_id_idx, CREDITS_FILE, "movie_id")?,
            cast: optional_field(&record, cast_idx),
            crew: optional_field(&record, crew_idx),
        });
    }
    Ok(credits)
}
