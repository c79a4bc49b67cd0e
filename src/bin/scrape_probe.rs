use anyhow::Result;
use beat_title_generator::titles::{MarketplaceScraper, NeverSkip};
use beat_title_generator::Config;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "scrape-probe")]
#[command(about = "Run the marketplace scraper once and print what it finds")]
struct Cli {
    /// Genre to fetch titles for; prints the genre list when omitted
    #[arg(long)]
    genre: Option<String>,

    /// Maximum number of titles
    #[arg(long, default_value_t = 20)]
    limit: usize,

    /// Always hit the live site instead of sometimes serving curated titles
    #[arg(long)]
    no_skip: bool,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("beat_title_generator=debug,scrape_probe=info,warn")
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let mut scraper = MarketplaceScraper::from_config(&config.scraper)?;
    if cli.no_skip {
        scraper = scraper.with_skip_policy(Arc::new(NeverSkip));
    }

    match cli.genre {
        Some(genre) => {
            let titles = scraper.fetch_titles_for_genre(&genre, cli.limit).await;
            info!("🎵 {} titles for {}", titles.len(), genre);
            for (i, title) in titles.iter().enumerate() {
                println!("{:>3}. {}", i + 1, title);
            }
        }
        None => {
            let genres = scraper.fetch_genre_list().await;
            info!("📋 {} genres", genres.len());
            for genre in &genres {
                println!("{}", genre);
            }
        }
    }

    Ok(())
}
