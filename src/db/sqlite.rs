use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::FromRow;
use tracing::{debug, info};

use super::model::*;
use super::repo::*;

/// The single long-lived handle on the movie database.
///
/// The pool is capped at one connection that is never reaped, so the process
/// holds exactly one SQLite handle from startup until exit.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens an existing database file read-only. The `movies` table must
    /// already exist; nothing is created or migrated here.
    pub async fn open(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(false)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|source| DbError::Open {
                path: db_path.to_string(),
                source,
            })?;

        info!("Database opened at {}", db_path);

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs `sql` with `params` bound to its `?` placeholders in order and
    /// returns every matching row.
    pub async fn fetch_all<'q, T>(&self, sql: &'q str, params: &[&'q str]) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        debug!(sql, ?params, "fetch_all");
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = query.bind(*param);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Like `fetch_all`, but returns only the first matching row.
    pub async fn fetch_optional<'q, T>(
        &self,
        sql: &'q str,
        params: &[&'q str],
    ) -> DbResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        debug!(sql, ?params, "fetch_optional");
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = query.bind(*param);
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl MovieRepo for SqliteRepository {
    async fn list_movies(&self) -> DbResult<Movies> {
        let movies: Vec<Movie> = self.fetch_all("SELECT * FROM movies", &[]).await?;
        Ok(Movies::from(movies))
    }

    async fn movies_by_genre(&self, genre: &str) -> DbResult<Movies> {
        let movies: Vec<Movie> = self
            .fetch_all("SELECT * FROM movies WHERE genre = ?", &[genre])
            .await?;
        Ok(Movies::from(movies))
    }

    async fn movies_by_id(&self, id: &str) -> DbResult<Movies> {
        let movies: Vec<Movie> = self
            .fetch_all("SELECT * FROM movies WHERE id = ?", &[id])
            .await?;
        Ok(Movies::from(movies))
    }

    async fn movies_by_release_year(&self, release_year: &str) -> DbResult<Movies> {
        let movies: Vec<Movie> = self
            .fetch_all("SELECT * FROM movies WHERE release_year = ?", &[release_year])
            .await?;
        Ok(Movies::from(movies))
    }

    async fn count_movies(&self) -> DbResult<i64> {
        let count: Option<(i64,)> = self
            .fetch_optional("SELECT COUNT(*) FROM movies", &[])
            .await?;
        Ok(count.map(|(n,)| n).unwrap_or(0))
    }
}
