//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::config::Config;
use crate::favorites::FavoriteStore;
use crate::llm::TitleRephraser;
use crate::titles::TitleLibrary;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<TitleLibrary>,
    pub favorites: Arc<FavoriteStore>,
    pub rephraser: Arc<TitleRephraser>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the live scraper, rephraser and an empty favorites store from configuration
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let library = TitleLibrary::from_config(&config)?;
        let rephraser = TitleRephraser::new(&config.llm);

        Ok(Self {
            library: Arc::new(library),
            favorites: Arc::new(FavoriteStore::new()),
            rephraser: Arc::new(rephraser),
            config,
        })
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let enable_cors = state.config.server.enable_cors;

    let router = Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::health_check))

        // Title endpoints
        .route("/api/genres", get(handlers::list_genres))
        .route("/api/beat-titles/:genre", get(handlers::list_titles))
        .route("/api/generate/:genre", get(handlers::generate_title))
        .route("/api/rephrase", post(handlers::rephrase_title))
        .route("/api/format", post(handlers::format_beat_title))

        // Favorites endpoints
        .route(
            "/api/favorites",
            get(handlers::list_favorites)
                .post(handlers::add_favorite)
                .delete(handlers::clear_favorites),
        )
        .route("/api/favorites/export", get(handlers::export_favorites))
        .route("/api/favorites/:id", delete(handlers::remove_favorite))

        // Cache maintenance endpoints
        .route("/api/cache/stats", get(handlers::cache_stats))
        .route("/api/cache", delete(handlers::clear_cache))

        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        // Configure CORS to allow browser access
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
        router.layer(ServiceBuilder::new().layer(cors))
    } else {
        router
    }
}

/// Configure and start the HTTP server
pub async fn start_http_server(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = build_router(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("🌐 API server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}
