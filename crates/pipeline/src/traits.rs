//! Core traits for the tag pipeline.
//!
//! This module defines the Stemmer trait so the composer can be built with
//! any word-reduction strategy.

/// Reduces a single lowercase token to its root form.
///
/// ## Design Note
/// - `Send + Sync` lets one stemmer be shared by the rayon workers that
///   compose records in parallel
/// - Implementations must be pure: the same token always yields the same stem
pub trait Stemmer: Send + Sync {
    /// Returns the name of this stemmer (for logging/debugging)
    fn name(&self) -> &str;

    /// Stem one whitespace-free token
    fn stem(&self, token: &str) -> String;
}

/// A stemmer that leaves tokens unchanged
#[cfg(test)]
pub struct IdentityStemmer;

#[cfg(test)]
impl Stemmer for IdentityStemmer {
    fn name(&self) -> &str {
        "IdentityStemmer"
    }

    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}
