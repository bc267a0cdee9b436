use crate::constants::JSON_MIME;
use crate::middlewares::content_negotiation;
use crate::modules::song::handle::*;
use actix_web::{
    middleware::from_fn,
    web::{scope, ServiceConfig},
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/songs")
            .wrap(from_fn(content_negotiation(JSON_MIME, JSON_MIME)))
            .service(list_songs)
            .service(create_song)
            .service(update_song)
            .service(delete_song),
    );
}
