//! In-memory store of favorited beat titles
use crate::error::{Result, TitleError};
use crate::metadata::{format_title, BeatMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::info;

const ANONYMOUS_USER: &str = "anonymous";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: u64,
    pub title: String,
    pub genre: String,
    pub key: Option<String>,
    pub scale: Option<String>,
    pub bpm: Option<u32>,
    pub collaborator: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Own metadata, with gaps filled from `defaults`
    pub fn metadata_or(&self, defaults: &BeatMetadata) -> BeatMetadata {
        BeatMetadata {
            key: self.key.clone().unwrap_or_else(|| defaults.key.clone()),
            scale: self.scale.clone().unwrap_or_else(|| defaults.scale.clone()),
            bpm: self.bpm.unwrap_or(defaults.bpm),
            collaborator: self
                .collaborator
                .clone()
                .unwrap_or_else(|| defaults.collaborator.clone()),
        }
    }
}

/// Request to store a favorite
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    pub key: Option<String>,
    pub scale: Option<String>,
    pub bpm: Option<u32>,
    pub collaborator: Option<String>,
    pub user_id: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct FavoriteStore {
    favorites: RwLock<BTreeMap<u64, Favorite>>,
    next_id: AtomicU64,
}

impl FavoriteStore {
    pub fn new() -> Self {
        Self {
            favorites: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Store a favorite. Rejects blank titles or genres and titles already
    /// favorited in the same genre (case-insensitive).
    pub async fn add(&self, new: NewFavorite) -> Result<Favorite> {
        let title = new.title.trim().to_string();
        let genre = new.genre.trim().to_string();

        if title.is_empty() {
            return Err(TitleError::InvalidFavorite("title must not be empty".to_string()));
        }
        if genre.is_empty() {
            return Err(TitleError::InvalidFavorite("genre must not be empty".to_string()));
        }

        let mut favorites = self.favorites.write().await;

        let duplicate = favorites
            .values()
            .any(|f| f.genre == genre && f.title.to_lowercase() == title.to_lowercase());
        if duplicate {
            return Err(TitleError::DuplicateFavorite(format!("{} [{}]", title, genre)));
        }

        let favorite = Favorite {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title,
            genre,
            key: non_empty(new.key),
            scale: non_empty(new.scale),
            bpm: new.bpm.filter(|bpm| *bpm > 0),
            collaborator: non_empty(new.collaborator),
            user_id: non_empty(new.user_id).unwrap_or_else(|| ANONYMOUS_USER.to_string()),
            created_at: Utc::now(),
        };

        info!("⭐ Added favorite #{}: {} [{}]", favorite.id, favorite.title, favorite.genre);
        favorites.insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    /// All favorites in insertion order
    pub async fn list(&self) -> Vec<Favorite> {
        self.favorites.read().await.values().cloned().collect()
    }

    pub async fn remove(&self, id: u64) -> bool {
        self.favorites.write().await.remove(&id).is_some()
    }

    pub async fn clear(&self) -> usize {
        let mut favorites = self.favorites.write().await;
        let removed = favorites.len();
        favorites.clear();
        removed
    }

    /// One formatted line per favorite: `{formatted title} [{genre}]`
    pub async fn export_text(&self, defaults: &BeatMetadata) -> String {
        self.favorites
            .read()
            .await
            .values()
            .map(|f| format!("{} [{}]", format_title(&f.title, &f.metadata_or(defaults), true), f.genre))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for FavoriteStore {
    fn default() -> Self {
        Self::new()
    }
}
