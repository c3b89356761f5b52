pub mod handlers;
pub mod render;
pub mod state;

use std::sync::Arc;

use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{middleware, web, App, HttpServer};

use crate::{
    config::Config,
    error::Result,
    gemini::{ContentGenerator, GeminiClient},
    storage::{ImageStorage, LocalImageStore},
};

pub use state::AppState;

/// Routes plus body-size limits for the multipart and JSON extractors.
pub fn configure(max_upload_bytes: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(
            MultipartFormConfig::default()
                .total_limit(max_upload_bytes)
                .memory_limit(max_upload_bytes),
        )
        .app_data(web::JsonConfig::default().limit(max_upload_bytes))
        .route("/", web::get().to(handlers::index))
        .route("/health", web::get().to(handlers::health))
        .route("/generate-tattoo", web::post().to(handlers::generate_tattoo))
        .route("/generate-tattoo/", web::post().to(handlers::generate_tattoo))
        .route("/alter-tattoo", web::post().to(handlers::alter_tattoo))
        .route("/alter-tattoo/", web::post().to(handlers::alter_tattoo));
    }
}

pub async fn run(config: Config) -> Result<()> {
    let generator: Arc<dyn ContentGenerator> = Arc::new(GeminiClient::new(&config.gemini)?);
    let storage: Arc<dyn ImageStorage> = Arc::new(LocalImageStore::new(config.output_dir()));
    let state = web::Data::new(AppState::new(generator, storage)?);
    let max_upload_bytes = config.max_upload_bytes();

    log::info!("HTTP server listening on http://{}:{}", config.host(), config.port());
    log::info!("Endpoints:");
    log::info!("  GET  /");
    log::info!("  GET  /health");
    log::info!("  POST /generate-tattoo");
    log::info!("  POST /alter-tattoo");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .wrap(middleware::Logger::default())
            .configure(configure(max_upload_bytes))
    })
    .bind((config.host().to_string(), config.port()))?
    .run()
    .await?;

    Ok(())
}
