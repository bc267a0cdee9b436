use crate::{
    api::error,
    modules::file_upload::{model::NewFile, repository::FileRepository, schema::FileEntity},
};

#[derive(Clone)]
pub struct FileRepositorySqlite {
    pool: sqlx::SqlitePool,
}

impl FileRepositorySqlite {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FileRepository for FileRepositorySqlite {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        &self.pool
    }

    async fn create<'e, E>(&self, file: &NewFile, tx: E) -> Result<FileEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let entity = sqlx::query_as::<_, FileEntity>(
            r#"
            INSERT INTO files (name)
            VALUES (?)
            RETURNING id, name
            "#,
        )
        .bind(&file.name)
        .fetch_one(tx)
        .await?;

        Ok(entity)
    }

    async fn find_by_id<'e, E>(
        &self,
        file_id: i64,
        tx: E,
    ) -> Result<Option<FileEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let file = sqlx::query_as::<_, FileEntity>("SELECT id, name FROM files WHERE id = ?")
            .bind(file_id)
            .fetch_optional(tx)
            .await?;

        Ok(file)
    }
}
