//! Access facade over the cached title pipeline
use super::cache::{CacheStats, Clock, SystemClock, TtlCache};
use super::catalog::FallbackCatalog;
use super::scraper::MarketplaceScraper;
use super::TitleSource;
use crate::config::Config;
use crate::error::{Result, TitleError};
use futures::future::join_all;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Returned by [`TitleLibrary::random_title`] when a genre has no titles at all
pub const NO_TITLES_SENTINEL: &str = "No titles available for this genre";

const GENRES_CACHE_KEY: &str = "genres";

/// Statistics for both caches behind the library
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LibraryStats {
    pub genres: CacheStats,
    pub titles: CacheStats,
}

/// Entry point for genre and title lookups. None of the lookups fail: the worst case
/// is curated (possibly stale) data or the sentinel string.
pub struct TitleLibrary {
    source: Arc<dyn TitleSource>,
    catalog: FallbackCatalog,
    genres: TtlCache<Vec<String>>,
    titles: TtlCache<Vec<String>>,
    title_limit: usize,
}

impl TitleLibrary {
    /// Create a library on the wall clock
    pub fn new(source: Arc<dyn TitleSource>, ttl_millis: u64) -> Self {
        Self::with_clock(source, ttl_millis, Arc::new(SystemClock))
    }

    /// Create a library whose caches read time from `clock`
    pub fn with_clock(source: Arc<dyn TitleSource>, ttl_millis: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            catalog: FallbackCatalog::builtin(),
            genres: TtlCache::with_clock(ttl_millis, clock.clone()),
            titles: TtlCache::with_clock(ttl_millis, clock),
            title_limit: 20,
        }
    }

    /// Build the library over the live marketplace scraper
    pub fn from_config(config: &Config) -> Result<Self> {
        let scraper = MarketplaceScraper::from_config(&config.scraper)?;
        Ok(Self::new(Arc::new(scraper), config.cache.ttl_millis()).with_title_limit(config.scraper.title_limit))
    }

    pub fn with_catalog(mut self, catalog: FallbackCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_title_limit(mut self, title_limit: usize) -> Self {
        self.title_limit = title_limit;
        self
    }

    /// Genre list, from cache or a fresh fetch
    pub async fn list_genres(&self) -> Vec<String> {
        let source = Arc::clone(&self.source);
        self.genres
            .get_or_refresh(
                GENRES_CACHE_KEY,
                move || async move {
                    let genres = source.fetch_genre_list().await?;
                    if genres.is_empty() {
                        return Err(TitleError::EmptyResult(GENRES_CACHE_KEY.to_string()));
                    }
                    Ok(genres)
                },
                || self.catalog.genres(),
            )
            .await
    }

    /// Title list for `genre`, from cache or a fresh fetch
    pub async fn list_titles(&self, genre: &str) -> Vec<String> {
        let source = Arc::clone(&self.source);
        let requested = genre.to_string();
        let limit = self.title_limit;
        self.titles
            .get_or_refresh(
                genre,
                move || async move {
                    let titles = source.fetch_titles_for_genre(&requested, limit).await?;
                    if titles.is_empty() {
                        return Err(TitleError::EmptyResult(requested));
                    }
                    Ok(titles)
                },
                || self.catalog.titles(genre),
            )
            .await
    }

    /// A uniformly random title for `genre`, or [`NO_TITLES_SENTINEL`]
    pub async fn random_title(&self, genre: &str) -> String {
        let titles = self.list_titles(genre).await;
        titles
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| NO_TITLES_SENTINEL.to_string())
    }

    /// Populate the genre list and every genre's titles. Returns the number of genres.
    pub async fn warm_up(&self) -> usize {
        let genres = self.list_genres().await;
        let lists = join_all(genres.iter().map(|genre| self.list_titles(genre))).await;
        let total: usize = lists.iter().map(Vec::len).sum();
        info!("🔥 Warmed cache with {} genres and {} titles", genres.len(), total);
        genres.len()
    }

    /// Drop the cached titles for one genre
    pub async fn invalidate_genre(&self, genre: &str) -> bool {
        self.titles.invalidate(genre).await
    }

    /// Drop every cached list. Returns the number of entries removed.
    pub async fn clear(&self) -> usize {
        self.genres.clear().await + self.titles.clear().await
    }

    pub async fn stats(&self) -> LibraryStats {
        LibraryStats {
            genres: self.genres.stats().await,
            titles: self.titles.stats().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSource;

    #[async_trait]
    impl TitleSource for FixedSource {
        async fn fetch_genre_list(&self) -> Result<Vec<String>> {
            Ok(vec!["Trap".to_string(), "Phonk".to_string()])
        }

        async fn fetch_titles_for_genre(&self, genre: &str, _limit: usize) -> Result<Vec<String>> {
            Ok(vec![format!("{} Anthem", genre)])
        }
    }

    #[tokio::test]
    async fn test_random_title_from_single_entry() {
        let library = TitleLibrary::new(Arc::new(FixedSource), 1_000);
        assert_eq!(library.random_title("Phonk").await, "Phonk Anthem");
    }

    #[tokio::test]
    async fn test_warm_up_fills_both_caches() {
        let library = TitleLibrary::new(Arc::new(FixedSource), 60_000);

        assert_eq!(library.warm_up().await, 2);
        let stats = library.stats().await;
        assert_eq!(stats.genres.fresh, 1);
        assert_eq!(stats.titles.fresh, 2);

        assert!(library.invalidate_genre("Trap").await);
        assert_eq!(library.clear().await, 2);
    }
}
