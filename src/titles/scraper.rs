//! Beat marketplace scraper for genre and title lists
use super::catalog::FallbackCatalog;
use super::cleaner::clean_title;
use super::TitleSource;
use crate::config::ScraperConfig;
use crate::error::{Result, TitleError};
use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// Selector strings track the marketplace markup and will drift with it. The tiering
// (specific select options -> genre/tag/filter classes -> any text mentioning a known
// genre) is what matters.
const GENRE_SELECT_OPTIONS: &str =
    r#"select[name="genre"] option, select[class*="genre"] option"#;
const GENRE_FILTER_ITEMS: &str = r#".genre-filter-item, .filter-item[data-type="genre"], [class*="genre"], [class*="tag"], [class*="filter"]"#;
const GENRE_TEXT_ELEMENTS: &str = "a, span, div, li";
const TITLE_CANDIDATES: &str = r#"[class*="title"], h2, h3, h4, .beat-title, .track-title, .track-name, [class*="track"], [class*="song"], [class*="beat"]"#;

const PLACEHOLDER_GENRES: &[&str] = &["All Genres", "Select Genre", "All"];

/// Fetches the HTML body behind a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher with a browser-like request identity
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// Create a fetcher with the given timeout and user agent
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("🌐 GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TitleError::HttpStatus(response.status().as_u16(), url.to_string()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(TitleError::EmptyResponse(url.to_string()));
        }

        debug!("📄 Downloaded {} characters of HTML from {}", body.len(), url);
        Ok(body)
    }
}

/// Decides whether a title request is served from the catalog without touching the network
pub trait SkipPolicy: Send + Sync {
    fn should_skip_live_fetch(&self, genre: &str) -> bool;
}

/// Skips live fetches with a fixed probability
#[derive(Debug, Clone, Copy)]
pub struct RandomSkip {
    probability: f64,
}

impl RandomSkip {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl SkipPolicy for RandomSkip {
    fn should_skip_live_fetch(&self, _genre: &str) -> bool {
        rand::rng().random_bool(self.probability)
    }
}

/// Always goes to the network
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSkip;

impl SkipPolicy for NeverSkip {
    fn should_skip_live_fetch(&self, _genre: &str) -> bool {
        false
    }
}

/// Always serves from the catalog when it can
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysSkip;

impl SkipPolicy for AlwaysSkip {
    fn should_skip_live_fetch(&self, _genre: &str) -> bool {
        true
    }
}

/// Marketplace scraper. Every public operation is fail-soft: network errors, empty
/// pages and low-yield extractions all resolve to catalog data.
#[derive(Clone)]
pub struct MarketplaceScraper {
    fetcher: Arc<dyn PageFetcher>,
    skip_policy: Arc<dyn SkipPolicy>,
    catalog: FallbackCatalog,
    explore_url: String,
    min_viable_yield: usize,
}

impl MarketplaceScraper {
    /// Create a scraper with the default catalog and a yield threshold of 5
    pub fn new(fetcher: Arc<dyn PageFetcher>, skip_policy: Arc<dyn SkipPolicy>, explore_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            skip_policy,
            catalog: FallbackCatalog::builtin(),
            explore_url: explore_url.into(),
            min_viable_yield: 5,
        }
    }

    /// Build the live scraper described by configuration
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let fetcher = HttpPageFetcher::new(config.request_timeout_seconds, &config.user_agent)?;
        let scraper = Self::new(
            Arc::new(fetcher),
            Arc::new(RandomSkip::new(config.skip_live_probability)),
            config.explore_url(),
        )
        .with_min_viable_yield(config.min_viable_yield);

        info!("🔍 Marketplace scraper initialized for {}", scraper.explore_url);
        Ok(scraper)
    }

    pub fn with_catalog(mut self, catalog: FallbackCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_skip_policy(mut self, skip_policy: Arc<dyn SkipPolicy>) -> Self {
        self.skip_policy = skip_policy;
        self
    }

    pub fn with_min_viable_yield(mut self, min_viable_yield: usize) -> Self {
        self.min_viable_yield = min_viable_yield;
        self
    }

    /// Explore URL filtered to one genre
    pub fn genre_url(&self, genre: &str) -> String {
        format!("{}?genre={}", self.explore_url, urlencoding::encode(genre))
    }

    /// Fetch the marketplace genre list, falling back to the catalog genres
    pub async fn fetch_genre_list(&self) -> Vec<String> {
        let html = match self.fetcher.fetch_page(&self.explore_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Genre fetch failed, using default genres: {}", e);
                return self.catalog.genres();
            }
        };

        let genres = self.genres_from_html(&html);
        if genres.is_empty() {
            warn!("No genres found on explore page, using default genres");
            return self.catalog.genres();
        }

        info!("🎼 Scraped {} genres", genres.len());
        genres
    }

    /// Fetch up to `limit` cleaned titles for `genre`, falling back to the catalog
    pub async fn fetch_titles_for_genre(&self, genre: &str, limit: usize) -> Vec<String> {
        if genre.is_empty() {
            return self.catalog.titles_or_default(genre);
        }

        if self.catalog.has_titles(genre) && self.skip_policy.should_skip_live_fetch(genre) {
            debug!("Serving curated titles for {} without a live fetch", genre);
            return self.catalog.titles(genre);
        }

        let url = self.genre_url(genre);
        let page = self.fetcher.fetch_page(&url).await.and_then(|html| {
            if html.trim().is_empty() {
                Err(TitleError::EmptyResponse(url.clone()))
            } else {
                Ok(html)
            }
        });

        let html = match page {
            Ok(html) => html,
            Err(TitleError::EmptyResponse(_)) => {
                warn!("Empty page for {}, using curated titles if available", genre);
                return self.catalog.titles(genre);
            }
            Err(e) => {
                warn!("Title fetch for {} failed, using curated titles: {}", genre, e);
                return self.catalog.titles_or_default(genre);
            }
        };

        let titles = self.titles_from_html(&html, limit);
        if titles.len() < self.min_viable_yield {
            info!(
                "Only {} titles scraped for {} (need {}), using curated titles",
                titles.len(),
                genre,
                self.min_viable_yield
            );
            return self.catalog.titles_or_default(genre);
        }

        info!("🎵 Scraped {} titles for {}", titles.len(), genre);
        titles
    }

    // Html is !Send; parsing stays out of the async bodies so their futures remain Send
    fn genres_from_html(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        extract_genres(&document, &self.catalog).unwrap_or_else(|e| {
            warn!("Genre extraction failed: {}", e);
            Vec::new()
        })
    }

    fn titles_from_html(&self, html: &str, limit: usize) -> Vec<String> {
        let document = Html::parse_document(html);
        extract_titles(&document, limit).unwrap_or_else(|e| {
            warn!("Title extraction failed: {}", e);
            Vec::new()
        })
    }
}

#[async_trait]
impl TitleSource for MarketplaceScraper {
    async fn fetch_genre_list(&self) -> Result<Vec<String>> {
        Ok(MarketplaceScraper::fetch_genre_list(self).await)
    }

    async fn fetch_titles_for_genre(&self, genre: &str, limit: usize) -> Result<Vec<String>> {
        Ok(MarketplaceScraper::fetch_titles_for_genre(self, genre, limit).await)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TitleError::Selector(format!("{}: {:?}", css, e)))
}

fn element_text(element: &scraper::ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Extract genre names, stopping at the first tier that yields anything
pub fn extract_genres(document: &Html, catalog: &FallbackCatalog) -> Result<Vec<String>> {
    // Tier 1: options of a genre dropdown
    let mut genres = Vec::new();
    for option in document.select(&selector(GENRE_SELECT_OPTIONS)?) {
        let genre = element_text(&option);
        if !genre.is_empty() && !PLACEHOLDER_GENRES.contains(&genre.as_str()) {
            push_unique(&mut genres, genre);
        }
    }
    if !genres.is_empty() {
        debug!("Genres from select options: {:?}", genres);
        return Ok(genres);
    }

    // Tier 2: genre/tag/filter styled elements
    for element in document.select(&selector(GENRE_FILTER_ITEMS)?) {
        let genre = element_text(&element);
        let length = genre.chars().count();
        if length > 2 && length < 20 && !genre.contains("All Genre") && !genre.contains("Filter") {
            push_unique(&mut genres, genre);
        }
    }
    if !genres.is_empty() {
        debug!("Genres from filter items: {:?}", genres);
        return Ok(genres);
    }

    // Tier 3: any short text mentioning a known genre
    for element in document.select(&selector(GENRE_TEXT_ELEMENTS)?) {
        let text = element_text(&element);
        if !text.is_empty() && text.chars().count() < 25 && catalog.mentions_genre(&text) {
            push_unique(&mut genres, text);
        }
    }
    if !genres.is_empty() {
        debug!("Genres from text matches: {:?}", genres);
    }

    Ok(genres)
}

/// Extract up to `limit` unique cleaned titles from title-like elements
pub fn extract_titles(document: &Html, limit: usize) -> Result<Vec<String>> {
    let mut titles = Vec::new();
    if limit == 0 {
        return Ok(titles);
    }

    for element in document.select(&selector(TITLE_CANDIDATES)?) {
        let text = element_text(&element);
        let length = text.chars().count();
        if length <= 3 || length >= 100 {
            continue;
        }

        let title = clean_title(&text);
        if title.chars().count() > 3 {
            debug!("Candidate '{}' -> '{}'", text, title);
            push_unique(&mut titles, title);
        }

        if titles.len() >= limit {
            break;
        }
    }

    Ok(titles)
}
