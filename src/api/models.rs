//! API data models

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::TitleError;
use crate::metadata::BeatMetadata;

/// Service status for health checks
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// A generated title for one genre
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedTitle {
    pub title: String,
    pub genre: String,
}

/// Fields are optional so that missing values can be reported as 400
#[derive(Debug, Default, Deserialize)]
pub struct RephraseRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RephraseResponse {
    pub original: String,
    pub rephrased: String,
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
    #[serde(default)]
    pub title: String,
    pub metadata: Option<BeatMetadata>,
    pub lowercase: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatResponse {
    pub formatted: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedResponse {
    pub cleared: usize,
}

/// Error returned by API handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<TitleError> for ApiError {
    fn from(error: TitleError) -> Self {
        let status = match &error {
            TitleError::InvalidFavorite(_) | TitleError::InvalidMetadata(_) => StatusCode::BAD_REQUEST,
            TitleError::DuplicateFavorite(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let invalid: ApiError = TitleError::InvalidFavorite("title must not be empty".to_string()).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let duplicate: ApiError = TitleError::DuplicateFavorite("Neon Dreams [Trap]".to_string()).into();
        assert_eq!(duplicate.status, StatusCode::CONFLICT);

        let other: ApiError = TitleError::Llm("timeout".to_string()).into();
        assert_eq!(other.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
