use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// File row from the database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct FileEntity {
    pub id: i64,
    pub name: String,
}
