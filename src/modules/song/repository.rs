use crate::{
    api::error,
    modules::song::schema::{SongEntity, SongFileRow},
};

#[async_trait::async_trait]
pub trait SongRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Sqlite>;

    /// All songs with their file, in insertion order
    async fn find_all<'e, E>(&self, tx: E) -> Result<Vec<SongFileRow>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;

    async fn find_by_id<'e, E>(
        &self,
        song_id: i64,
        tx: E,
    ) -> Result<Option<SongEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;

    async fn create<'e, E>(&self, file_id: i64, tx: E) -> Result<SongEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;

    async fn update_file<'e, E>(
        &self,
        song_id: i64,
        file_id: i64,
        tx: E,
    ) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;

    async fn delete<'e, E>(&self, song_id: i64, tx: E) -> Result<bool, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;
}
