use crate::{
    api::error,
    modules::song::{
        repository::SongRepository,
        schema::{SongEntity, SongFileRow},
    },
};

#[derive(Clone)]
pub struct SongRepositorySqlite {
    pool: sqlx::SqlitePool,
}

impl SongRepositorySqlite {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SongRepository for SongRepositorySqlite {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }

    async fn find_all<'e, E>(&self, tx: E) -> Result<Vec<SongFileRow>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let songs = sqlx::query_as::<_, SongFileRow>(
            r#"
            SELECT s.id, s.file_id, f.name AS file_name
            FROM songs s
            JOIN files f ON f.id = s.file_id
            ORDER BY s.id
            "#,
        )
        .fetch_all(tx)
        .await?;
        Ok(songs)
    }

    async fn find_by_id<'e, E>(
        &self,
        song_id: i64,
        tx: E,
    ) -> Result<Option<SongEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let song = sqlx::query_as::<_, SongEntity>("SELECT id, file_id FROM songs WHERE id = ?")
            .bind(song_id)
            .fetch_optional(tx)
            .await?;
        Ok(song)
    }

    async fn create<'e, E>(&self, file_id: i64, tx: E) -> Result<SongEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let song = sqlx::query_as::<_, SongEntity>(
            "INSERT INTO songs (file_id) VALUES (?) RETURNING id, file_id",
        )
        .bind(file_id)
        .fetch_one(tx)
        .await?;
        Ok(song)
    }

    async fn update_file<'e, E>(
        &self,
        song_id: i64,
        file_id: i64,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query("UPDATE songs SET file_id = ? WHERE id = ?")
            .bind(file_id)
            .bind(song_id)
            .execute(tx)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn delete<'e, E>(&self, song_id: i64, tx: E) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(song_id)
            .execute(tx)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
