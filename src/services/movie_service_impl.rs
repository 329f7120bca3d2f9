//! `SeaORM` implementation of the `MovieService` trait.

use crate::config::CatalogConfig;
use crate::db::{CreateOutcome, Store, UpdateOutcome};
use crate::domain::MovieId;
use crate::models::movie::{Movie, MovieInput, MoviePatch, MovieRules, MovieSummary};
use crate::pagination::{Page, PageRequest};
use crate::services::movie_service::{MovieError, MovieService};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

pub struct SeaOrmMovieService {
    store: Store,
    catalog: CatalogConfig,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store, catalog: CatalogConfig) -> Self {
        Self { store, catalog }
    }

    fn rules(&self) -> MovieRules {
        MovieRules::new(Utc::now().date_naive(), self.catalog.release_horizon_days)
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn list_movies(&self, request: PageRequest) -> Result<Page<MovieSummary>, MovieError> {
        let page = self.store.list_movies(request).await?;

        if page.items.is_empty() {
            return Err(MovieError::NoMoviesFound);
        }

        Ok(page)
    }

    async fn get_movie(&self, id: MovieId) -> Result<Movie, MovieError> {
        self.store
            .get_movie(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn create_movie(&self, input: MovieInput) -> Result<Movie, MovieError> {
        let movie = input.validate(&self.rules()).inspect_err(|e| {
            debug!(error = %e, "Rejected movie payload");
        })?;

        let id = match self.store.create_movie(&movie).await? {
            CreateOutcome::Created(id) => id,
            CreateOutcome::Duplicate => {
                return Err(MovieError::duplicate(&movie.name, movie.date));
            }
        };

        metrics::counter!("movies_created_total").increment(1);
        info!(movie_id = %id, name = %movie.name, "Movie created");

        self.get_movie(id).await
    }

    async fn update_movie(&self, id: MovieId, patch: MoviePatch) -> Result<(), MovieError> {
        // Unknown ids are reported before the payload is looked at.
        if !self.store.movie_exists(id).await? {
            return Err(MovieError::NotFound(id));
        }

        let changes = patch.validate(&self.rules()).inspect_err(|e| {
            debug!(movie_id = %id, error = %e, "Rejected movie update");
        })?;

        match self.store.update_movie(id, &changes).await? {
            UpdateOutcome::Updated => Ok(()),
            UpdateOutcome::NotFound => Err(MovieError::NotFound(id)),
            UpdateOutcome::Duplicate => {
                let current = self.get_movie(id).await?;
                let name = changes.name.as_deref().unwrap_or(&current.name);
                let date = changes.date.unwrap_or(current.date);
                Err(MovieError::duplicate(name, date))
            }
        }
    }

    async fn delete_movie(&self, id: MovieId) -> Result<(), MovieError> {
        if !self.store.remove_movie(id).await? {
            return Err(MovieError::NotFound(id));
        }

        metrics::counter!("movies_deleted_total").increment(1);
        Ok(())
    }
}
