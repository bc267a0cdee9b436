use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::api::error;
use crate::modules::file_upload::{
    model::{FileResponse, NewFile, UploadConfig},
    repository::FileRepository,
};
use crate::utils::secure_filename;

/// Bytes of an uploaded file together with the content type guessed from its name.
pub struct StoredUpload {
    pub bytes: Vec<u8>,
    pub mime_type: mime_guess::Mime,
}

#[derive(Clone)]
pub struct FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    file_repo: Arc<R>,
    config: UploadConfig,
}

impl<R> FileUploadService<R>
where
    R: FileRepository + Send + Sync,
{
    pub fn new(file_repo: Arc<R>, config: UploadConfig) -> Self {
        info!("FileUploadService storing uploads in {}", config.upload_dir.display());
        Self { file_repo, config }
    }

    /// Rejects an upload once `file_size` bytes exceed the configured limit.
    pub fn validate_size(&self, file_size: usize) -> Result<(), error::SystemError> {
        if file_size > self.config.max_file_size {
            return Err(error::SystemError::payload_too_large(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }
        Ok(())
    }

    /// Save file to disk. The bytes land in a staging file first and are
    /// renamed over `name`, replacing any earlier upload of the same name.
    async fn save_file(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, error::SystemError> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;

        let target = self.config.upload_dir.join(name);
        let staging =
            self.config.upload_dir.join(format!(".{}.{}.part", name, Uuid::now_v7().simple()));

        if let Err(e) = tokio::fs::write(&staging, bytes).await {
            tokio::fs::remove_file(&staging).await.ok();
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            tokio::fs::remove_file(&staging).await.ok();
            return Err(e.into());
        }

        Ok(target)
    }

    /// Record the upload and store its bytes. The row is committed only after
    /// the bytes are in place.
    pub async fn upload_file(
        &self,
        original_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<FileResponse, error::SystemError> {
        let name = secure_filename(original_filename);
        if name.is_empty() {
            return Err(error::SystemError::unprocessable("Invalid file name"));
        }

        let mut tx = self.file_repo.get_pool().begin().await?;
        let entity = self.file_repo.create(&NewFile { name: name.clone() }, &mut *tx).await?;
        let path = self.save_file(&name, &bytes).await?;
        tx.commit().await?;

        info!("Stored file #{} ({} bytes) at {}", entity.id, bytes.len(), path.display());
        Ok(FileResponse::from_entity(entity, &self.config))
    }

    /// Read an uploaded file back. Names that are not already in sanitized
    /// form never reach the filesystem.
    pub async fn read_upload(&self, filename: &str) -> Result<StoredUpload, error::SystemError> {
        let not_found = || error::SystemError::not_found(format!("Could not find file {filename}"));

        let name = secure_filename(filename);
        if name.is_empty() || name != filename {
            return Err(not_found());
        }

        match tokio::fs::read(self.config.upload_dir.join(&name)).await {
            Ok(bytes) => Ok(StoredUpload {
                bytes,
                mime_type: mime_guess::from_path(&name).first_or_octet_stream(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }
}
