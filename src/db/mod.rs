use crate::domain::MovieId;
use crate::entities::{actors, countries, genres};
use crate::models::movie::{Movie, MovieChanges, MovieSummary, NewMovie};
use crate::pagination::{Page, PageRequest};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::movie::{CreateOutcome, UpdateOutcome, WriteLock};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    write_lock: WriteLock,
}

impl Store {
    /// Connects and brings the schema up to date.
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        let store = Self::connect(db_url, max_connections, min_connections).await?;
        let applied = store.migrate().await?;

        info!(
            "Database connected & {} migrations applied (pool: {}-{})",
            applied, min_connections, max_connections
        );

        Ok(store)
    }

    /// Connects without touching the schema.
    pub async fn connect(db_url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        if !db_url.contains(":memory:") {
            // Readers keep going while a write transaction is open.
            conn.execute(Statement::from_string(
                conn.get_database_backend(),
                "PRAGMA journal_mode=WAL".to_string(),
            ))
            .await?;
        }

        Ok(Self {
            conn,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Applies pending migrations, returning how many ran.
    pub async fn migrate(&self) -> Result<usize> {
        let pending = migrator::Migrator::get_pending_migrations(&self.conn)
            .await?
            .len();
        migrator::Migrator::up(&self.conn, None).await?;
        Ok(pending)
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone(), self.write_lock.clone())
    }

    fn reference_repo(&self) -> repositories::reference::ReferenceRepository {
        repositories::reference::ReferenceRepository::new(self.conn.clone())
    }

    pub async fn list_movies(&self, request: PageRequest) -> Result<Page<MovieSummary>> {
        self.movie_repo().list_page(request).await
    }

    pub async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn movie_exists(&self, id: MovieId) -> Result<bool> {
        self.movie_repo().exists(id).await
    }

    pub async fn create_movie(&self, movie: &NewMovie) -> Result<CreateOutcome> {
        self.movie_repo().create(movie).await
    }

    pub async fn update_movie(&self, id: MovieId, changes: &MovieChanges) -> Result<UpdateOutcome> {
        self.movie_repo().update(id, changes).await
    }

    pub async fn remove_movie(&self, id: MovieId) -> Result<bool> {
        self.movie_repo().remove(id).await
    }

    pub async fn find_country(&self, code: &str) -> Result<Option<countries::Model>> {
        self.reference_repo().find_country(code).await
    }

    pub async fn list_countries(&self) -> Result<Vec<countries::Model>> {
        self.reference_repo().list_countries().await
    }

    pub async fn list_genres(&self) -> Result<Vec<genres::Model>> {
        self.reference_repo().list_genres().await
    }

    pub async fn list_actors(&self) -> Result<Vec<actors::Model>> {
        self.reference_repo().list_actors().await
    }
}
