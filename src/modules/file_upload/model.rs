use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{modules::file_upload::schema::FileEntity, ENV};

/// New file row to insert into database
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
}

/// File upload configuration
#[derive(Debug, Clone, Validate)]
pub struct UploadConfig {
    #[validate(range(min = 1, message = "MAX_UPLOAD_SIZE must be at least 1 byte"))]
    pub max_file_size: usize,
    pub upload_dir: PathBuf,
    #[validate(length(min = 1, message = "UPLOADS_BASE_URL must not be empty"))]
    pub base_url: String,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            max_file_size: ENV.max_upload_size,
            upload_dir: PathBuf::from(&ENV.upload_dir),
            base_url: ENV.uploads_base_url.clone(),
        }
    }

    /// Public URL the raw bytes of `name` are served from
    pub fn public_path(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024, // 50MB
            upload_dir: PathBuf::from("./uploads"),
            base_url: "/uploads".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: i64,
    pub name: String,
    pub path: String,
}

impl FileResponse {
    pub fn from_entity(entity: FileEntity, config: &UploadConfig) -> Self {
        let path = config.public_path(&entity.name);
        FileResponse { id: entity.id, name: entity.name, path }
    }
}
