use super::{Album, DbPool};
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Read access to album records owned by the admin side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    async fn find_by_id(&self, album_id: i64) -> Result<Option<Album>>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<()>;
}

pub struct PgAlbumRepository {
    pool: DbPool,
}

impl PgAlbumRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlbumRepository for PgAlbumRepository {
    async fn find_by_id(&self, album_id: i64) -> Result<Option<Album>> {
        let album = sqlx::query_as::<_, Album>(
            r#"SELECT id, title, is_nsfw, password_hash
               FROM albums
               WHERE id = $1"#,
        )
        .bind(album_id)
        .fetch_optional(self.pool.get_pool())
        .await?;

        debug!("Album {} lookup: found={}", album_id, album.is_some());
        Ok(album)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool.get_pool()).await?;
        Ok(())
    }
}
