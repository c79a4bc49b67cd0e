//! API request handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::info;

use super::models::{
    ApiError, ClearedResponse, FormatRequest, FormatResponse, GeneratedTitle, HealthStatus,
    RemovedResponse, RephraseRequest, RephraseResponse,
};
use super::server::AppState;
use crate::favorites::{Favorite, NewFavorite};
use crate::metadata::format_title;
use crate::titles::LibraryStats;

/// Handle health check requests
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "beat-title-generator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.library.list_genres().await)
}

pub async fn list_titles(State(state): State<AppState>, Path(genre): Path<String>) -> Json<Vec<String>> {
    Json(state.library.list_titles(&genre).await)
}

pub async fn generate_title(State(state): State<AppState>, Path(genre): Path<String>) -> Json<GeneratedTitle> {
    let title = state.library.random_title(&genre).await;
    Json(GeneratedTitle { title, genre })
}

pub async fn rephrase_title(
    State(state): State<AppState>,
    Json(request): Json<RephraseRequest>,
) -> Result<Json<RephraseResponse>, ApiError> {
    let title = request.title.map(|t| t.trim().to_string()).unwrap_or_default();
    let genre = request.genre.map(|g| g.trim().to_string()).unwrap_or_default();

    if title.is_empty() || genre.is_empty() {
        return Err(ApiError::bad_request("Title and genre are required"));
    }

    let rephrased = state.rephraser.rephrase(&title, &genre).await;
    info!("✏️ Rephrased '{}' as '{}'", title, rephrased);

    Ok(Json(RephraseResponse {
        original: title,
        rephrased,
        genre,
    }))
}

pub async fn format_beat_title(
    State(state): State<AppState>,
    Json(request): Json<FormatRequest>,
) -> Result<Json<FormatResponse>, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    let metadata = request.metadata.unwrap_or_else(|| state.config.metadata.clone());
    metadata.validate()?;

    let formatted = format_title(request.title.trim(), &metadata, request.lowercase.unwrap_or(true));
    Ok(Json(FormatResponse { formatted }))
}

pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<Favorite>> {
    Json(state.favorites.list().await)
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Json(new): Json<NewFavorite>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let favorite = state.favorites.add(new).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn remove_favorite(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode, ApiError> {
    if state.favorites.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Favorite not found"))
    }
}

pub async fn clear_favorites(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.favorites.clear().await;
    Json(RemovedResponse { removed })
}

pub async fn export_favorites(State(state): State<AppState>) -> impl IntoResponse {
    let text = state.favorites.export_text(&state.config.metadata).await;
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text)
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<LibraryStats> {
    Json(state.library.stats().await)
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearedResponse> {
    let cleared = state.library.clear().await;
    Json(ClearedResponse { cleared })
}
