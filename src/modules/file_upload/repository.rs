use crate::{
    api::error,
    modules::file_upload::{model::NewFile, schema::FileEntity},
};

#[async_trait::async_trait]
pub trait FileRepository {
    fn get_pool(&self) -> &sqlx::Pool<sqlx::Sqlite>;

    async fn create<'e, E>(&self, file: &NewFile, tx: E) -> Result<FileEntity, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;

    async fn find_by_id<'e, E>(
        &self,
        file_id: i64,
        tx: E,
    ) -> Result<Option<FileEntity>, error::SystemError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>;
}
