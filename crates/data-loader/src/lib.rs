//! # Data Loader Crate
//!
//! This crate loads the TMDB 5000 dataset and defines the catalog types
//! shared by the rest of the workspace.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieId, RawMovie, MovieRecord)
//! - **parser**: Parse the two CSV files into row structs
//! - **dataset**: Join movies with credits into complete `RawMovie` rows
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_dataset;
//! use std::path::Path;
//!
//! let raw_movies = load_dataset(Path::new("data/tmdb"))?;
//! println!("Loaded {} movies", raw_movies.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod dataset;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use dataset::{join_movies_and_credits, load_dataset, JoinStats};
pub use types::{MovieId, MovieRecord, RawMovie};
