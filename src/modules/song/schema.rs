use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct SongEntity {
    pub id: i64,
    pub file_id: i64,
}

/// Song joined with the file it points at
#[derive(Debug, Clone, FromRow)]
pub struct SongFileRow {
    pub id: i64,
    pub file_id: i64,
    pub file_name: String,
}
