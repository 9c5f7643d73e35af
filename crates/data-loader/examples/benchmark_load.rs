use data_loader::load_dataset;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/tmdb");

    println!("Loading TMDB 5000 dataset...\n");

    let start = Instant::now();
    let movies = load_dataset(data_dir).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let overview_tokens: usize = movies
        .iter()
        .map(|m| m.overview.split_whitespace().count())
        .sum();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", movies.len());
    println!("Overview tokens: {}", overview_tokens);
    println!("\nPerformance: {:.0} movies/second",
             movies.len() as f64 / elapsed.as_secs_f64());
}
