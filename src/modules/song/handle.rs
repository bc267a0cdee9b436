use actix_web::{delete, get, post, put, web};

use crate::{
    api::{
        error,
        success::{self, MessageBody},
    },
    modules::{
        file_upload::repository_sqlite::FileRepositorySqlite,
        song::{
            model::{CreateSongModel, DeleteSongModel, SongResponse, UpdateSongModel},
            repository_sqlite::SongRepositorySqlite,
            service::SongService,
        },
    },
    utils::ValidatedJson,
};

pub type SongSvc = SongService<SongRepositorySqlite, FileRepositorySqlite>;

#[get("")]
pub async fn list_songs(
    song_service: web::Data<SongSvc>,
) -> Result<success::Success<Vec<SongResponse>>, error::Error> {
    let songs = song_service.list_songs().await?;
    Ok(success::Success::ok(songs))
}

#[post("")]
pub async fn create_song(
    song_service: web::Data<SongSvc>,
    body: ValidatedJson<CreateSongModel>,
) -> Result<success::Success<Vec<SongResponse>>, error::Error> {
    let songs = song_service.create_song(body.0).await?;
    Ok(success::Success::created(songs))
}

#[put("")]
pub async fn update_song(
    song_service: web::Data<SongSvc>,
    body: ValidatedJson<UpdateSongModel>,
) -> Result<success::Success<MessageBody>, error::Error> {
    let id = song_service.update_song(body.0).await?;
    Ok(success::Success::message(format!("Song #{id} updated")))
}

#[delete("")]
pub async fn delete_song(
    song_service: web::Data<SongSvc>,
    body: ValidatedJson<DeleteSongModel>,
) -> Result<success::Success<MessageBody>, error::Error> {
    let id = song_service.delete_song(body.0).await?;
    Ok(success::Success::message(format!("Song #{id} deleted")))
}
