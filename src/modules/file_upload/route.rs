use actix_web::{middleware::from_fn, web};

use crate::constants::{JSON_MIME, MULTIPART_MIME};
use crate::middlewares::content_negotiation;
use crate::modules::file_upload::repository::FileRepository;

pub fn configure<R>(cfg: &mut web::ServiceConfig)
where
    R: FileRepository + Send + Sync + 'static,
{
    cfg.service(
        web::scope("/files")
            .wrap(from_fn(content_negotiation(JSON_MIME, MULTIPART_MIME)))
            .service(
                web::resource("")
                    .route(web::post().to(crate::modules::file_upload::handle::upload_file::<R>)),
            ),
    );
}

pub fn uploads_configure<R>(cfg: &mut web::ServiceConfig)
where
    R: FileRepository + Send + Sync + 'static,
{
    cfg.service(
        web::resource("/uploads/{filename}")
            .route(web::get().to(crate::modules::file_upload::handle::get_upload::<R>)),
    );
}
