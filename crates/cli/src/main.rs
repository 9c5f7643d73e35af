use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::load_dataset;
use pipeline::{build_model, ArtifactStore, ModelConfig};
use poster_client::OfflinePosterLookup;
use rand::seq::IndexedRandom;
use server::{Config, Recommendation, Recommender};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// movie-recs - content-based movie recommendations from TMDB metadata
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommends movies similar to a chosen title", long_about = None)]
struct Cli {
    /// Directory holding the model artifacts (overrides MODEL_DIR)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the model artifacts from the TMDB 5000 CSV files
    Build {
        /// Directory containing tmdb_5000_movies.csv and tmdb_5000_credits.csv
        #[arg(short, long, default_value = "data/tmdb")]
        data_dir: PathBuf,

        /// Vocabulary size
        #[arg(long, default_value = "5000")]
        max_features: usize,

        /// Billed cast members kept per movie
        #[arg(long, default_value = "3")]
        cast_limit: usize,
    },

    /// Recommend movies similar to a title
    Recommend {
        /// Exact catalog title
        #[arg(long)]
        title: String,

        /// Number of recommendations (overrides RECOMMENDATION_COUNT)
        #[arg(long)]
        count: Option<usize>,

        /// Skip poster lookups and show the placeholder
        #[arg(long)]
        offline: bool,
    },

    /// Search catalog titles
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: String,

        /// Maximum number of matches to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark to test query latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Skip poster lookups
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(model_dir) = cli.model_dir {
        config.model_dir = model_dir;
    }

    match cli.command {
        Commands::Build {
            data_dir,
            max_features,
            cast_limit,
        } => handle_build(&config, data_dir, max_features, cast_limit)?,
        Commands::Recommend {
            title,
            count,
            offline,
        } => {
            let recommender = start_recommender(&config, offline)?;
            handle_recommend(&recommender, &title, count).await?
        }
        Commands::Search { title, limit } => {
            let recommender = start_recommender(&config, true)?;
            handle_search(&recommender, &title, limit)
        }
        Commands::Benchmark { requests, offline } => {
            let recommender = start_recommender(&config, offline)?;
            handle_benchmark(recommender, requests).await?
        }
    }

    Ok(())
}

/// Load the artifacts and wire the recommender; any failure ends the process
fn start_recommender(config: &Config, offline: bool) -> Result<Recommender> {
    println!("Loading model from {}...", config.model_dir.display());
    let start = Instant::now();
    let model = server::load_model(&config.model_dir).with_context(|| {
        format!(
            "Failed to load model artifacts from {}",
            config.model_dir.display()
        )
    })?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        model.len(),
        start.elapsed()
    );

    let recommender = if offline {
        Recommender::new(model, Arc::new(OfflinePosterLookup))
            .with_placeholder(config.placeholder_poster_url.clone())
            .with_count(config.recommendation_count)
    } else {
        Recommender::from_config(model, config)
    };
    Ok(recommender)
}

/// Handle the 'build' command
fn handle_build(
    config: &Config,
    data_dir: PathBuf,
    max_features: usize,
    cast_limit: usize,
) -> Result<()> {
    let start = Instant::now();
    println!("Loading TMDB dataset from {}...", data_dir.display());
    let raw = load_dataset(&data_dir).context("Failed to load TMDB dataset")?;

    let model_config = ModelConfig::default()
        .with_max_features(max_features)
        .with_cast_limit(cast_limit);
    let model = build_model(&raw, &model_config).context("Failed to build model")?;

    let store = ArtifactStore::new(&config.model_dir);
    store.save(&model).context("Failed to save model artifacts")?;

    println!(
        "{} Built model for {} movies in {:?}",
        "✓".green(),
        model.len(),
        start.elapsed()
    );
    println!("  {}", store.catalog_path().display());
    println!("  {}", store.similarity_path().display());
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    recommender: &Recommender,
    title: &str,
    count: Option<usize>,
) -> Result<()> {
    let count = count.unwrap_or(recommender.count());
    match recommender.try_recommend(title, count).await {
        Ok(recommendations) => {
            print_recommendations(title, &recommendations);
            Ok(())
        }
        Err(e) => {
            let suggestions = recommender.search(title, 5);
            if !suggestions.is_empty() {
                println!("{}", "Did you mean:".yellow());
                for record in suggestions {
                    println!("  - {}", record.title);
                }
            }
            bail!(e)
        }
    }
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str, limit: usize) {
    let matches = recommender.search(title, limit);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for record in matches {
        println!("{}: {}", record.catalog_id, record.title);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(recommender: Recommender, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let titles: Vec<String> = {
        let catalog = recommender.model().catalog();
        if catalog.is_empty() {
            bail!("The model catalog is empty");
        }
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| catalog.choose(&mut rng).map(|record| record.title.clone()))
            .collect()
    };

    // Use tokio::spawn to make concurrent requests
    let wall_clock = Instant::now();
    let mut handles = Vec::with_capacity(titles.len());
    for title in titles {
        let recommender = recommender.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            recommender.recommend(&title).await;
            start.elapsed()
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await.context("Benchmark task panicked")?);
    }
    let wall_clock = wall_clock.elapsed();
    info!("Benchmark finished {} requests", timings.len());

    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", timings.len());
    println!("Wall-clock time: {:?}", wall_clock);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f64 / wall_clock.as_secs_f64()
    );
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[Recommendation]) {
    println!(
        "{}",
        format!("Movies similar to '{}':", title).bold().blue()
    );
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - Similarity: {:.3}",
            (rank + 1).to_string().green(),
            rec.title,
            rec.score
        );
        let poster = if rec.placeholder {
            rec.poster_url.dimmed()
        } else {
            rec.poster_url.normal()
        };
        println!("   Poster: {}", poster);
    }
}
