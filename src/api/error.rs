use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::DetailResponse;
use crate::services::MovieError;

pub const INVALID_INPUT: &str = "Invalid input data.";
pub const MOVIE_NOT_FOUND: &str = "Movie with the given ID was not found.";
pub const NO_MOVIES_FOUND: &str = "No movies found.";

#[derive(Debug)]
pub enum ApiError {
    /// Carries the precise reason; clients only see [`INVALID_INPUT`].
    InvalidInput(String),

    NotFound(String),

    Conflict(String),

    DatabaseError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::InvalidInput(reason) => {
                tracing::debug!("Invalid input: {}", reason);
                (StatusCode::BAD_REQUEST, INVALID_INPUT.to_string())
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
        };

        (status, Json(DetailResponse::new(detail))).into_response()
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::InvalidInput(reason) => Self::InvalidInput(reason.to_string()),
            MovieError::Conflict(msg) => Self::Conflict(msg),
            MovieError::NotFound(_) => Self::NotFound(MOVIE_NOT_FOUND.to_string()),
            MovieError::NoMoviesFound => Self::NotFound(NO_MOVIES_FOUND.to_string()),
            MovieError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}
