use serde::{Deserialize, Serialize};

use crate::modules::song::schema::SongFileRow;
use crate::utils::{Field, FieldKind, RecordId, RequestSchema};

const ID_FIELD: Field = Field { name: "id", kind: FieldKind::Integer };
const FILE_FIELD: Field = Field { name: "file", kind: FieldKind::Object(&[ID_FIELD]) };

#[derive(Debug, Deserialize)]
pub struct FileRef {
    pub id: RecordId,
}

#[derive(Debug, Deserialize)]
pub struct CreateSongModel {
    pub file: FileRef,
}

impl RequestSchema for CreateSongModel {
    const FIELDS: &'static [Field] = &[FILE_FIELD];
}

#[derive(Debug, Deserialize)]
pub struct UpdateSongModel {
    pub id: RecordId,
    pub file: FileRef,
}

impl RequestSchema for UpdateSongModel {
    const FIELDS: &'static [Field] = &[ID_FIELD, FILE_FIELD];
}

#[derive(Debug, Deserialize)]
pub struct DeleteSongModel {
    pub id: RecordId,
}

impl RequestSchema for DeleteSongModel {
    const FIELDS: &'static [Field] = &[ID_FIELD];
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SongFileResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SongResponse {
    pub id: i64,
    pub file: SongFileResponse,
}

impl From<SongFileRow> for SongResponse {
    fn from(row: SongFileRow) -> Self {
        SongResponse { id: row.id, file: SongFileResponse { id: row.file_id, name: row.file_name } }
    }
}
