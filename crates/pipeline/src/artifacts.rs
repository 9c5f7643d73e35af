//! Saving and loading the model artifacts.
//!
//! A model directory holds two files:
//! - `movie_list.json`: the catalog, `[{catalog_id, title, tags}, ...]`
//! - `similarity.bin`: the similarity matrix, bincode-encoded
//!
//! Loading re-checks that the two are index-aligned.

use crate::error::{ArtifactError, Result};
use crate::model::Model;
use crate::similarity::SimilarityMatrix;
use data_loader::MovieRecord;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CATALOG_FILE: &str = "movie_list.json";
pub const SIMILARITY_FILE: &str = "similarity.bin";

/// A directory holding one persisted model
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(CATALOG_FILE)
    }

    pub fn similarity_path(&self) -> PathBuf {
        self.dir.join(SIMILARITY_FILE)
    }

    /// True when both artifact files are present
    pub fn exists(&self) -> bool {
        self.catalog_path().is_file() && self.similarity_path().is_file()
    }

    /// Write both artifacts, creating the directory if needed
    pub fn save(&self, model: &Model) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let mut writer = BufWriter::new(File::create(self.catalog_path())?);
        serde_json::to_writer(&mut writer, model.catalog())?;
        writer.flush()?;

        let mut writer = BufWriter::new(File::create(self.similarity_path())?);
        bincode::serialize_into(&mut writer, model.similarity())?;
        writer.flush()?;

        info!("Saved model with {} movies to {:?}", model.len(), self.dir);
        Ok(())
    }

    /// Read both artifacts back into a `Model`
    pub fn load(&self) -> Result<Model> {
        let catalog: Vec<MovieRecord> =
            serde_json::from_reader(BufReader::new(open(&self.catalog_path())?))?;
        let similarity: SimilarityMatrix =
            bincode::deserialize_from(BufReader::new(open(&self.similarity_path())?))?;

        let model = Model::new(catalog, similarity)?;
        info!("Loaded model with {} movies from {:?}", model.len(), self.dir);
        Ok(model)
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArtifactError::Missing {
            path: path.display().to_string(),
        },
        _ => ArtifactError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn model() -> Model {
        let catalog = vec![
            MovieRecord::new(19995, "Avatar", "in the 22nd centuri"),
            MovieRecord::new(285, "Pirates of the Caribbean: At World's End", "captain barbossa"),
        ];
        let similarity = arr2(&[[1.0, 0.123_456_79], [0.123_456_79, 1.0]]);
        Model::new(catalog, similarity).unwrap()
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model"));
        assert!(!store.exists());

        let original = model();
        store.save(&original).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.catalog(), original.catalog());
        assert_eq!(loaded.similarity(), original.similarity());
        assert_eq!(loaded.find_title("Avatar"), Some(0));
    }

    #[test]
    fn test_missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArtifactStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn test_corrupt_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&model()).unwrap();
        fs::write(store.catalog_path(), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, ArtifactError::Catalog(_)));
    }

    #[test]
    fn test_corrupt_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&model()).unwrap();
        fs::write(store.similarity_path(), [1u8, 2, 3]).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, ArtifactError::Similarity(_)));
    }

    #[test]
    fn test_mismatched_artifacts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&model()).unwrap();

        let extra = vec![
            MovieRecord::new(1, "One", "a"),
            MovieRecord::new(2, "Two", "b"),
            MovieRecord::new(3, "Three", "c"),
        ];
        fs::write(store.catalog_path(), serde_json::to_string(&extra).unwrap()).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::DimensionMismatch { catalog: 3, rows: 2, cols: 2 }
        ));
    }
}
