//! Beat Title Generator
//!
//! Scrapes genre and beat-title lists from a beat marketplace, normalizes the titles,
//! caches them with a TTL and falls back to a curated catalog when the live path fails.
//! Also carries title rephrasing, beat metadata formatting, favorites and an HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod llm;
pub mod metadata;
pub mod titles;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::error::{Result, TitleError};
pub use crate::favorites::{Favorite, FavoriteStore, NewFavorite};
pub use crate::llm::{LLMConfig, LLMProvider, TitleRephraser};
pub use crate::metadata::{format_title, BeatMetadata};
pub use crate::titles::{
    clean_title, FallbackCatalog, MarketplaceScraper, TitleLibrary, TitleSource, NO_TITLES_SENTINEL,
};
