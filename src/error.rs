//! Error types shared across the title pipeline, favorites and LLM client

/// Result type for beat title operations
pub type Result<T> = std::result::Result<T, TitleError>;

/// Error types for beat title operations
#[derive(thiserror::Error, Debug)]
pub enum TitleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP status {0} from {1}")]
    HttpStatus(u16, String),

    #[error("Empty response body from {0}")]
    EmptyResponse(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("No results for {0}")]
    EmptyResult(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Invalid favorite: {0}")]
    InvalidFavorite(String),

    #[error("Favorite already exists: {0}")]
    DuplicateFavorite(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
}
