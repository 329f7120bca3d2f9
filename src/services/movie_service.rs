//! Domain service for the movie catalog.
//!
//! Handles validation of incoming payloads, duplicate detection and the
//! lookup-or-create of countries, genres, actors and languages.

use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieInput, MoviePatch, MovieSummary, ValidationError};
use crate::pagination::{Page, PageRequest};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    #[error("No movies found")]
    NoMoviesFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl MovieError {
    #[must_use]
    pub fn duplicate(name: &str, date: NaiveDate) -> Self {
        Self::Conflict(format!(
            "A movie with the name '{name}' and release date '{date}' already exists."
        ))
    }
}

/// Sent back when another connection holds the SQLite write lock.
pub const CATALOG_BUSY: &str = "The catalog is busy with another change. Please retry.";

/// `SQLITE_BUSY` and `SQLITE_LOCKED` surface only as driver messages.
fn is_lock_contention(err: &sea_orm::DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked")
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        if is_lock_contention(&err) {
            return Self::Conflict(CATALOG_BUSY.to_string());
        }
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MovieError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sea_orm::DbErr>() {
            Ok(db_err) => db_err.into(),
            Err(other) => Self::Database(other.to_string()),
        }
    }
}

/// Domain service trait for the catalog.
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Lists one page of movies, newest first.
    ///
    /// An empty page is reported as [`MovieError::NoMoviesFound`].
    async fn list_movies(&self, request: PageRequest) -> Result<Page<MovieSummary>, MovieError>;

    /// Gets one movie with its references resolved.
    async fn get_movie(&self, id: MovieId) -> Result<Movie, MovieError>;

    /// Validates and stores a new movie, returning it as stored.
    async fn create_movie(&self, input: MovieInput) -> Result<Movie, MovieError>;

    /// Applies the fields present in `patch`.
    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<(), MovieError>;

    /// Deletes a movie; genres, actors, languages and countries are kept.
    async fn delete_movie(&self, id: MovieId) -> Result<(), MovieError>;
}
