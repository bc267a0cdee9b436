use actix_cors::Cors;
use actix_web::{self, http::header, middleware::Logger, web, App, HttpServer};
use std::sync::{Arc, LazyLock};
use validator::Validate;

use crate::{
    configs::connect_database,
    modules::{
        file_upload::{
            model::UploadConfig, repository_sqlite::FileRepositorySqlite,
            service::FileUploadService,
        },
        song::{repository_sqlite::SongRepositorySqlite, service::SongService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Tuneful is running"
}

pub fn app_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(
            web::scope("/api")
                .configure(modules::song::route::configure)
                .configure(modules::file_upload::route::configure::<FileRepositorySqlite>),
        )
        .configure(modules::file_upload::route::uploads_configure::<FileRepositorySqlite>);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    log::info!("Environment variables loaded");

    let db_pool = connect_database().await.map_err(|e| {
        log::error!("{e:?}");
        std::io::Error::other("Database connection error")
    })?;

    let song_repo = SongRepositorySqlite::new(db_pool.clone());
    let file_repo = FileRepositorySqlite::new(db_pool.clone());

    let song_service =
        SongService::with_dependencies(Arc::new(song_repo), Arc::new(file_repo.clone()));
    let upload_config = UploadConfig::from_env();
    upload_config.validate().map_err(|e| {
        log::error!("Invalid upload configuration: {e}");
        std::io::Error::other("Invalid upload configuration")
    })?;
    let file_service = FileUploadService::new(Arc::new(file_repo), upload_config);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(song_service.clone()))
            .app_data(web::Data::new(file_service.clone()))
            .configure(app_configure)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(ENV.workers)
    .run()
    .await
}
