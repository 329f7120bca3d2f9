use crate::domain::MovieId;
use crate::entities::{
    actors, genres, languages, movie_actors, movie_genres, movie_languages, movies,
    prelude::*,
};
use crate::models::movie::{Country, Movie, MovieChanges, MovieSummary, NamedRef, NewMovie};
use crate::pagination::{Page, PageRequest};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
    TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::reference::{get_or_create_country, resolve_named};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(MovieId),
    /// Another movie already has the same name and release date.
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
    Duplicate,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Serializes write transactions on one database.
///
/// SQLite allows a single writer. Two deferred transactions that both read
/// before writing cannot upgrade their locks and one fails with
/// `SQLITE_BUSY`, so writers queue here instead.
pub type WriteLock = Arc<Mutex<()>>;

pub struct MovieRepository {
    conn: DatabaseConnection,
    write_lock: WriteLock,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, write_lock: WriteLock) -> Self {
        Self { conn, write_lock }
    }

    fn map_summary(model: movies::Model) -> MovieSummary {
        MovieSummary {
            id: MovieId::new(model.id),
            name: model.name,
            date: model.date,
            score: model.score,
            overview: model.overview,
        }
    }

    fn map_named(id: i32, name: String) -> NamedRef {
        NamedRef { id, name }
    }

    /// One page of movies, newest first.
    ///
    /// A page that starts past the last row comes back empty without querying
    /// rows, so arbitrarily large page numbers never reach the SQL offset.
    pub async fn list_page(&self, request: PageRequest) -> Result<Page<MovieSummary>> {
        let paginator = Movies::find()
            .order_by_desc(movies::Column::Id)
            .paginate(&self.conn, request.per_page);

        let total_items = paginator.num_items().await?;

        let in_range = request
            .offset()
            .is_some_and(|offset| offset < total_items);
        if !in_range {
            debug!(
                page = request.page,
                per_page = request.per_page,
                total_items,
                "Requested page is past the end of the catalog"
            );
            return Ok(Page::new(Vec::new(), request, total_items));
        }

        let rows = paginator.fetch_page(request.page - 1).await?;

        Ok(Page::new(
            rows.into_iter().map(Self::map_summary).collect(),
            request,
            total_items,
        ))
    }

    pub async fn exists(&self, id: MovieId) -> Result<bool> {
        let count = Movies::find()
            .filter(movies::Column::Id.eq(id.value()))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn get(&self, id: MovieId) -> Result<Option<Movie>> {
        Self::load(&self.conn, id.value()).await
    }

    async fn load<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<Movie>> {
        let Some((movie, country)) = Movies::find_by_id(id)
            .find_also_related(Countries)
            .one(conn)
            .await?
        else {
            return Ok(None);
        };

        let country = country
            .ok_or_else(|| anyhow::anyhow!("Movie {id} references a missing country"))?;

        let genres = Genres::find()
            .join(JoinType::InnerJoin, genres::Relation::MovieGenres.def())
            .filter(movie_genres::Column::MovieId.eq(id))
            .order_by_asc(movie_genres::Column::Position)
            .all(conn)
            .await?;

        let actors = Actors::find()
            .join(JoinType::InnerJoin, actors::Relation::MovieActors.def())
            .filter(movie_actors::Column::MovieId.eq(id))
            .order_by_asc(movie_actors::Column::Position)
            .all(conn)
            .await?;

        let languages = Languages::find()
            .join(JoinType::InnerJoin, languages::Relation::MovieLanguages.def())
            .filter(movie_languages::Column::MovieId.eq(id))
            .order_by_asc(movie_languages::Column::Position)
            .all(conn)
            .await?;

        Ok(Some(Movie {
            id: MovieId::new(movie.id),
            name: movie.name,
            date: movie.date,
            score: movie.score,
            overview: movie.overview,
            status: movie.status,
            budget: movie.budget,
            revenue: movie.revenue,
            country: Country {
                id: country.id,
                code: country.code,
                name: country.name,
            },
            genres: genres
                .into_iter()
                .map(|g| Self::map_named(g.id, g.name))
                .collect(),
            actors: actors
                .into_iter()
                .map(|a| Self::map_named(a.id, a.name))
                .collect(),
            languages: languages
                .into_iter()
                .map(|l| Self::map_named(l.id, l.name))
                .collect(),
        }))
    }

    async fn identity_taken<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        date: chrono::NaiveDate,
        except: Option<i32>,
    ) -> Result<bool> {
        let mut query = Movies::find()
            .filter(movies::Column::Name.eq(name))
            .filter(movies::Column::Date.eq(date));
        if let Some(id) = except {
            query = query.filter(movies::Column::Id.ne(id));
        }
        Ok(query.count(conn).await? > 0)
    }

    /// Inserts the movie and links its references in one transaction.
    pub async fn create(&self, movie: &NewMovie) -> Result<CreateOutcome> {
        let _writer = self.write_lock.lock().await;
        let txn = self.conn.begin().await?;

        if Self::identity_taken(&txn, &movie.name, movie.date, None).await? {
            txn.rollback().await?;
            return Ok(CreateOutcome::Duplicate);
        }

        let country = get_or_create_country(&txn, &movie.country).await?;
        let genre_rows = resolve_named::<Genres, _>(&txn, &movie.genres).await?;
        let actor_rows = resolve_named::<Actors, _>(&txn, &movie.actors).await?;
        let language_rows = resolve_named::<Languages, _>(&txn, &movie.languages).await?;

        let active = movies::ActiveModel {
            name: Set(movie.name.clone()),
            date: Set(movie.date),
            score: Set(movie.score),
            overview: Set(movie.overview.clone()),
            status: Set(movie.status),
            budget: Set(movie.budget),
            revenue: Set(movie.revenue),
            country_id: Set(country.id),
            ..Default::default()
        };

        let movie_id = match Movies::insert(active).exec(&txn).await {
            Ok(res) => res.last_insert_id,
            Err(err) if is_unique_violation(&err) => {
                txn.rollback().await?;
                return Ok(CreateOutcome::Duplicate);
            }
            Err(err) => return Err(err.into()),
        };

        if !genre_rows.is_empty() {
            MovieGenres::insert_many(genre_rows.iter().enumerate().map(|(i, genre)| {
                movie_genres::ActiveModel {
                    movie_id: Set(movie_id),
                    genre_id: Set(genre.id),
                    position: Set(position(i)),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }

        if !actor_rows.is_empty() {
            MovieActors::insert_many(actor_rows.iter().enumerate().map(|(i, actor)| {
                movie_actors::ActiveModel {
                    movie_id: Set(movie_id),
                    actor_id: Set(actor.id),
                    position: Set(position(i)),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }

        if !language_rows.is_empty() {
            MovieLanguages::insert_many(language_rows.iter().enumerate().map(|(i, language)| {
                movie_languages::ActiveModel {
                    movie_id: Set(movie_id),
                    language_id: Set(language.id),
                    position: Set(position(i)),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;

        info!("Added movie {}: {} ({})", movie_id, movie.name, movie.date);
        Ok(CreateOutcome::Created(MovieId::new(movie_id)))
    }

    /// Applies the changed columns of one movie; reference links stay as they are.
    pub async fn update(&self, id: MovieId, changes: &MovieChanges) -> Result<UpdateOutcome> {
        let _writer = self.write_lock.lock().await;
        let txn = self.conn.begin().await?;

        let Some(existing) = Movies::find_by_id(id.value()).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(UpdateOutcome::NotFound);
        };

        if changes.is_empty() {
            txn.rollback().await?;
            return Ok(UpdateOutcome::Updated);
        }

        if changes.touches_identity() {
            let name = changes.name.as_deref().unwrap_or(&existing.name);
            let date = changes.date.unwrap_or(existing.date);
            if Self::identity_taken(&txn, name, date, Some(existing.id)).await? {
                txn.rollback().await?;
                return Ok(UpdateOutcome::Duplicate);
            }
        }

        let mut active: movies::ActiveModel = existing.into();
        if let Some(name) = &changes.name {
            active.name = Set(name.clone());
        }
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(score) = changes.score {
            active.score = Set(score);
        }
        if let Some(overview) = &changes.overview {
            active.overview = Set(overview.clone());
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(budget) = changes.budget {
            active.budget = Set(budget);
        }
        if let Some(revenue) = changes.revenue {
            active.revenue = Set(revenue);
        }

        match active.update(&txn).await {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                txn.rollback().await?;
                return Ok(UpdateOutcome::Duplicate);
            }
            Err(err) => return Err(err.into()),
        }

        txn.commit().await?;

        info!("Updated movie {}", id);
        Ok(UpdateOutcome::Updated)
    }

    /// Deletes the movie and its links; the referenced rows are kept.
    pub async fn remove(&self, id: MovieId) -> Result<bool> {
        let _writer = self.write_lock.lock().await;
        let txn = self.conn.begin().await?;

        MovieGenres::delete_many()
            .filter(movie_genres::Column::MovieId.eq(id.value()))
            .exec(&txn)
            .await?;
        MovieActors::delete_many()
            .filter(movie_actors::Column::MovieId.eq(id.value()))
            .exec(&txn)
            .await?;
        MovieLanguages::delete_many()
            .filter(movie_languages::Column::MovieId.eq(id.value()))
            .exec(&txn)
            .await?;

        let result = Movies::delete_by_id(id.value()).exec(&txn).await?;
        let removed = result.rows_affected > 0;
        if !removed {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;

        info!("Removed movie with ID: {}", id);
        Ok(true)
    }
}
