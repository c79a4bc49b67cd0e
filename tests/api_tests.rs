use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use beat_title_generator::api::{build_router, AppState};
use beat_title_generator::titles::{TitleLibrary, TitleSource, NO_TITLES_SENTINEL};
use beat_title_generator::{Config, FavoriteStore, Result, TitleError, TitleRephraser};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct StubSource;

#[async_trait]
impl TitleSource for StubSource {
    async fn fetch_genre_list(&self) -> Result<Vec<String>> {
        Ok(vec!["Trap".to_string(), "R&B".to_string()])
    }

    async fn fetch_titles_for_genre(&self, genre: &str, _limit: usize) -> Result<Vec<String>> {
        match genre {
            "UnknownGenre" => Err(TitleError::HttpStatus(503, genre.to_string())),
            _ => Ok(vec![format!("{} Nights", genre)]),
        }
    }
}

fn test_router() -> Router {
    let state = AppState {
        library: Arc::new(TitleLibrary::new(Arc::new(StubSource), 60_000)),
        favorites: Arc::new(FavoriteStore::new()),
        rephraser: Arc::new(TitleRephraser::offline()),
        config: Arc::new(Config::default()),
    };
    build_router(state)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_json(router: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn delete(router: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::delete(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

#[tokio::test]
async fn test_health() {
    let router = test_router();
    let (status, body) = get_json(&router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_genres_and_titles() {
    let router = test_router();

    let (status, genres) = get_json(&router, "/api/genres").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(genres, json!(["Trap", "R&B"]));

    let (status, titles) = get_json(&router, "/api/beat-titles/R%26B").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles, json!(["R&B Nights"]));
}

#[tokio::test]
async fn test_generate_title() {
    let router = test_router();

    let (status, body) = get_json(&router, "/api/generate/Trap").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"title": "Trap Nights", "genre": "Trap"}));

    let (_, body) = get_json(&router, "/api/generate/UnknownGenre").await;
    assert_eq!(body["title"], NO_TITLES_SENTINEL);
}

#[tokio::test]
async fn test_rephrase_validation_and_fallback() {
    let router = test_router();

    let (status, body) = post_json(&router, "/api/rephrase", json!({"title": "Dark City"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = post_json(&router, "/api/rephrase", json!({"title": "  ", "genre": "Trap"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&router, "/api/rephrase", json!({"title": "Dark City", "genre": "Trap"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original"], "Dark City");
    assert_eq!(body["genre"], "Trap");
    assert_ne!(body["rephrased"], "Dark City");
}

#[tokio::test]
async fn test_format() {
    let router = test_router();

    let (status, body) = post_json(&router, "/api/format", json!({"title": "Coole Beats"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formatted"], "coole beats_dMin_130bpm @fgybeats");

    let metadata = json!({"key": "H", "scale": "Min", "bpm": 120, "collaborator": "@x"});
    let (status, _) = post_json(&router, "/api/format", json!({"title": "Coole Beats", "metadata": metadata})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_favorites_lifecycle() {
    let router = test_router();

    let (status, created) = post_json(&router, "/api/favorites", json!({"title": "Neon Dreams", "genre": "Trap"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["userId"], "anonymous");

    let (status, _) = post_json(&router, "/api/favorites", json!({"title": "NEON DREAMS", "genre": "Trap"})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post_json(&router, "/api/favorites", json!({"title": "", "genre": "Trap"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = get_json(&router, "/api/favorites").await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let request = Request::get("/api/favorites/export").body(Body::empty()).unwrap();
    let (status, text) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(text).unwrap(), "neon dreams_dMin_130bpm @fgybeats [Trap]");

    let (status, _) = delete(&router, "/api/favorites/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = delete(&router, "/api/favorites/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_favorites() {
    let router = test_router();
    post_json(&router, "/api/favorites", json!({"title": "Neon Dreams", "genre": "Trap"})).await;
    post_json(&router, "/api/favorites", json!({"title": "Velvet Mood", "genre": "R&B"})).await;

    let (status, body) = delete(&router, "/api/favorites").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["removed"], 2);
}

#[tokio::test]
async fn test_cache_stats_and_clear() {
    let router = test_router();
    get_json(&router, "/api/genres").await;
    get_json(&router, "/api/beat-titles/Trap").await;

    let (status, stats) = get_json(&router, "/api/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["genres"]["fresh"], 1);
    assert_eq!(stats["titles"]["entries"], 1);

    let (status, body) = delete(&router, "/api/cache").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["cleared"], 2);
}
