use async_trait::async_trait;

use super::model::*;

/// Read-only queries over the `movies` table. Parameters arrive as the raw
/// path segments and are bound as text; SQLite column affinity does the rest.
#[async_trait]
pub trait MovieRepo: Send + Sync {
    async fn list_movies(&self) -> DbResult<Movies>;
    async fn movies_by_genre(&self, genre: &str) -> DbResult<Movies>;
    async fn movies_by_id(&self, id: &str) -> DbResult<Movies>;
    async fn movies_by_release_year(&self, release_year: &str) -> DbResult<Movies>;
    async fn count_movies(&self) -> DbResult<i64>;
}
