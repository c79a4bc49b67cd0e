//! Title acquisition pipeline
//!
//! Scrapes genre and title lists from a beat marketplace, normalizes the scraped
//! titles, fronts the scraper with a TTL cache and falls back to a curated catalog
//! whenever the live path fails or under-delivers.

pub mod cache;
pub mod catalog;
pub mod cleaner;
pub mod library;
pub mod scraper;

// Re-export main types
pub use cache::{CacheStats, Clock, ManualClock, SystemClock, TtlCache};
pub use catalog::FallbackCatalog;
pub use cleaner::{clean_title, SENTINEL_TITLE};
pub use library::{LibraryStats, TitleLibrary, NO_TITLES_SENTINEL};
pub use scraper::{AlwaysSkip, HttpPageFetcher, MarketplaceScraper, NeverSkip, PageFetcher, RandomSkip, SkipPolicy};

use crate::error::Result;
use async_trait::async_trait;

/// Anything that can produce genre and title lists for the library
#[async_trait]
pub trait TitleSource: Send + Sync {
    async fn fetch_genre_list(&self) -> Result<Vec<String>>;
    async fn fetch_titles_for_genre(&self, genre: &str, limit: usize) -> Result<Vec<String>>;
}
