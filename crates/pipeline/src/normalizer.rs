//! Metadata normalization.
//!
//! Turns the raw per-movie attribute encodings into clean token lists:
//! - genres / keywords / cast: JSON lists of objects with a `name` field
//! - crew: JSON list of objects with `job` and `name`; only the director is kept
//! - overview: free text, split on whitespace
//!
//! A malformed list never fails the build. The infallible functions log the
//! problem and return an empty list, so a movie with a broken `keywords`
//! column still contributes its other fields.

use crate::error::NormalizeError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// An entry of a genres / keywords / cast list
#[derive(Debug, Deserialize)]
struct NamedEntry {
    name: String,
}

/// An entry of a crew list
#[derive(Debug, Deserialize)]
struct CrewEntry {
    job: String,
    name: String,
}

const DIRECTOR_JOB: &str = "Director";

/// Parse a serialized list, treating missing/blank input as an empty list
fn parse_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, NormalizeError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

/// Collect the `name` of each entry, stopping after `limit` names.
///
/// `None` means no limit.
pub fn try_extract_names(raw: &str, limit: Option<usize>) -> Result<Vec<String>, NormalizeError> {
    let entries: Vec<NamedEntry> = parse_list(raw)?;
    let limit = limit.unwrap_or(usize::MAX);
    Ok(entries.into_iter().take(limit).map(|e| e.name).collect())
}

/// Like [`try_extract_names`], but malformed input yields an empty list
pub fn extract_names(raw: &str, limit: Option<usize>) -> Vec<String> {
    try_extract_names(raw, limit).unwrap_or_else(|e| {
        debug!("Treating attribute list as empty: {}", e);
        Vec::new()
    })
}

/// Find the first crew member whose job is "Director".
///
/// Returns a list with at most one name so it composes like the other fields.
pub fn try_extract_director(raw: &str) -> Result<Vec<String>, NormalizeError> {
    let crew: Vec<CrewEntry> = parse_list(raw)?;
    Ok(crew
        .into_iter()
        .find(|member| member.job == DIRECTOR_JOB)
        .map(|member| member.name)
        .into_iter()
        .collect())
}

/// Like [`try_extract_director`], but malformed input yields an empty list
pub fn extract_director(raw: &str) -> Vec<String> {
    try_extract_director(raw).unwrap_or_else(|e| {
        debug!("Treating crew list as empty: {}", e);
        Vec::new()
    })
}

/// Split a synopsis on whitespace
pub fn tokenize_overview(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
