use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;

use crate::api::success::Success;
use crate::api::{error, success};
use crate::modules::file_upload::model::FileResponse;
use crate::modules::file_upload::repository::FileRepository;
use crate::modules::file_upload::service::FileUploadService;

const FILE_FIELD: &str = "file";

fn multipart_error(e: actix_multipart::MultipartError) -> error::Error {
    error::Error::bad_request(e.to_string())
}

/// Upload file handler
pub async fn upload_file<R>(
    mut payload: Multipart,
    service: web::Data<FileUploadService<R>>,
) -> Result<success::Success<FileResponse>, error::Error>
where
    R: FileRepository + Send + Sync + 'static,
{
    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        // A `file` part without a filename is a plain form value, not a file
        let Some(filename) = filename.filter(|_| field.name() == Some(FILE_FIELD)) else {
            while field.try_next().await.map_err(multipart_error)?.is_some() {}
            continue;
        };

        // Read file bytes
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            service.validate_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        let result = service.upload_file(&filename, bytes).await?;
        return Ok(Success::created(result));
    }

    Err(error::Error::unprocessable("Could not find file data"))
}

/// Serve the raw bytes of an uploaded file
pub async fn get_upload<R>(
    filename: web::Path<String>,
    service: web::Data<FileUploadService<R>>,
) -> Result<HttpResponse, error::Error>
where
    R: FileRepository + Send + Sync + 'static,
{
    let stored = service.read_upload(&filename).await?;
    Ok(HttpResponse::Ok().content_type(stored.mime_type.essence_str()).body(stored.bytes))
}
