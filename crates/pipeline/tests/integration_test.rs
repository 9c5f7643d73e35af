//! Integration tests for the pipeline.
//!
//! These tests run the whole offline build on a handful of raw movies and
//! check the properties the recommender relies on.

use data_loader::RawMovie;
use pipeline::{
    build_model, compute_similarity_matrix, encode, encode_all, fit_vocabulary, ArtifactStore,
    ModelConfig, StopWords, TagComposer,
};

fn raw(id: u32, title: &str, overview: &str, genres: &[&str], keywords: &[&str]) -> RawMovie {
    let list = |names: &[&str]| {
        let entries: Vec<String> = names
            .iter()
            .map(|name| format!(r#"{{"id": 1, "name": "{}"}}"#, name))
            .collect();
        format!("[{}]", entries.join(", "))
    };
    RawMovie {
        movie_id: id,
        title: title.to_string(),
        overview: overview.to_string(),
        genres: list(genres),
        keywords: list(keywords),
        cast: r#"[{"name": "Sigourney Weaver"}]"#.to_string(),
        crew: r#"[{"job": "Director", "name": "Ridley Scott"}, {"job": "Director", "name": "Nobody"}]"#
            .to_string(),
    }
}

fn create_test_dataset() -> Vec<RawMovie> {
    vec![
        raw(
            1,
            "Alien",
            "The crew of a spaceship encounters a deadly alien.",
            &["Horror", "Science Fiction"],
            &["space", "alien"],
        ),
        raw(
            2,
            "Aliens",
            "Ripley returns to the planet with marines to fight the aliens.",
            &["Action", "Science Fiction"],
            &["space", "marines", "alien"],
        ),
        raw(
            3,
            "Love Story",
            "Two students fall in love in New York.",
            &["Romance", "Drama"],
            &["love"],
        ),
        RawMovie {
            keywords: "this is not a list".to_string(),
            ..raw(4, "Broken Keywords", "Robots fall in love.", &["Romance"], &[])
        },
    ]
}

#[test]
fn test_build_model_end_to_end() {
    let raw = create_test_dataset();
    let model = build_model(&raw, &ModelConfig::default()).unwrap();

    assert_eq!(model.len(), 4);
    let titles: Vec<&str> = model.catalog().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Aliens", "Love Story", "Broken Keywords"]);

    let alien = &model.catalog()[0];
    assert!(alien.tags.contains("sciencefict"));
    assert!(alien.tags.contains("sigourneyweav"));
    assert!(alien.tags.contains("ridleyscott"));
    assert!(!alien.tags.contains("nobodi"));

    let similarity = model.similarity();
    let n = model.len();
    for i in 0..n {
        assert_eq!(similarity[[i, i]], 1.0);
        for j in 0..n {
            assert_eq!(similarity[[i, j]], similarity[[j, i]]);
        }
    }

    // the two space movies are closer to each other than to the romance
    assert!(similarity[[0, 1]] > similarity[[0, 2]]);
    assert!(similarity[[2, 3]] > similarity[[2, 0]]);
}

#[test]
fn test_feature_vectors_have_vocabulary_length() {
    let composer = TagComposer::default();
    let records = composer.compose_all(&create_test_dataset());
    let tags: Vec<&str> = records.iter().map(|r| r.tags.as_str()).collect();

    let vocabulary = fit_vocabulary(tags.iter().copied(), 8, &StopWords::english());
    assert_eq!(vocabulary.len(), 8);

    let features = encode_all(&tags, &vocabulary);
    for (row, tag) in features.outer_iter().zip(&tags) {
        let vector = encode(tag, &vocabulary);
        assert_eq!(vector.len(), vocabulary.len());
        assert_eq!(row.to_vec(), vector);

        let has_known_token = pipeline::vectorizer::tokenize(tag)
            .any(|token| vocabulary.column(token).is_some());
        assert_eq!(vector.iter().any(|&c| c > 0), has_known_token);
    }

    let similarity = compute_similarity_matrix(&features);
    assert_eq!(similarity.dim(), (records.len(), records.len()));
}

#[test]
fn test_build_is_deterministic() {
    let raw = create_test_dataset();
    let first = build_model(&raw, &ModelConfig::default()).unwrap();
    let second = build_model(&raw, &ModelConfig::default()).unwrap();
    assert_eq!(first.catalog(), second.catalog());
    assert_eq!(first.similarity(), second.similarity());
}

#[test]
fn test_built_model_round_trips_through_store() {
    let model = build_model(&create_test_dataset(), &ModelConfig::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    store.save(&model).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded.catalog(), model.catalog());
    assert_eq!(loaded.similarity(), model.similarity());
}
