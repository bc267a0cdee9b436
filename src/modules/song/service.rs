use std::sync::Arc;

use log::info;

use crate::{
    api::error,
    modules::{
        file_upload::repository::FileRepository,
        song::{
            model::{CreateSongModel, DeleteSongModel, SongResponse, UpdateSongModel},
            repository::SongRepository,
        },
    },
    utils::RecordId,
};

fn song_not_found(id: &RecordId) -> error::SystemError {
    error::SystemError::not_found(format!("Could not find song with id {id}"))
}

fn file_not_found(id: &RecordId) -> error::SystemError {
    error::SystemError::unprocessable(format!("Could not find file with id {id}"))
}

#[derive(Clone)]
pub struct SongService<S, F>
where
    S: SongRepository + Send + Sync,
    F: FileRepository + Send + Sync,
{
    song_repo: Arc<S>,
    file_repo: Arc<F>,
}

impl<S, F> SongService<S, F>
where
    S: SongRepository + Send + Sync,
    F: FileRepository + Send + Sync,
{
    pub fn with_dependencies(song_repo: Arc<S>, file_repo: Arc<F>) -> Self {
        info!("SongService initialized with dependencies");
        SongService { song_repo, file_repo }
    }

    pub async fn list_songs(&self) -> Result<Vec<SongResponse>, error::SystemError> {
        let rows = self.song_repo.find_all(self.song_repo.get_pool()).await?;
        Ok(rows.into_iter().map(SongResponse::from).collect())
    }

    /// Adds a song and returns the whole updated list.
    pub async fn create_song(
        &self,
        song: CreateSongModel,
    ) -> Result<Vec<SongResponse>, error::SystemError> {
        let Some(file_id) = song.file.id.key() else {
            return Err(file_not_found(&song.file.id));
        };
        let mut tx = self.song_repo.get_pool().begin().await?;

        if self.file_repo.find_by_id(file_id, &mut *tx).await?.is_none() {
            return Err(file_not_found(&song.file.id));
        }
        let created = self.song_repo.create(file_id, &mut *tx).await?;
        tx.commit().await?;

        info!("Song #{} created for file #{}", created.id, created.file_id);
        self.list_songs().await
    }

    /// Points a song at another file. An unknown song wins over an unknown file.
    pub async fn update_song(&self, song: UpdateSongModel) -> Result<i64, error::SystemError> {
        let Some(song_id) = song.id.key() else {
            return Err(song_not_found(&song.id));
        };
        let mut tx = self.song_repo.get_pool().begin().await?;

        let updated = match song.file.id.key() {
            // the file foreign key rejects ids with no row
            Some(file_id) => self
                .song_repo
                .update_file(song_id, file_id, &mut *tx)
                .await
                .map_err(|e| match e {
                    error::SystemError::Unprocessable(_) => file_not_found(&song.file.id),
                    other => other,
                })?,
            None => {
                if self.song_repo.find_by_id(song_id, &mut *tx).await?.is_some() {
                    return Err(file_not_found(&song.file.id));
                }
                false
            }
        };
        if !updated {
            return Err(song_not_found(&song.id));
        }
        tx.commit().await?;

        info!("Song #{} now points at file #{}", song.id, song.file.id);
        Ok(song_id)
    }

    /// Removes the song row only; its file and upload stay.
    pub async fn delete_song(&self, song: DeleteSongModel) -> Result<i64, error::SystemError> {
        let Some(song_id) = song.id.key() else {
            return Err(song_not_found(&song.id));
        };
        let mut tx = self.song_repo.get_pool().begin().await?;

        if !self.song_repo.delete(song_id, &mut *tx).await? {
            return Err(song_not_found(&song.id));
        }
        tx.commit().await?;

        info!("Song #{song_id} deleted");
        Ok(song_id)
    }
}
