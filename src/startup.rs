use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::{AccessTokenCodec, ApiKey, CredentialManager};
use crate::configuration::Settings;
use crate::error::{AppError, ConfigError, ValidationError};
use crate::middleware::{FileServerHits, HitCounter, LoggerMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, reset, revoke, update_user,
};
use crate::store::Store;

/// Build and start the HTTP server on `listener`
///
/// The credential secret and API key are read from `settings` exactly once
/// here and shared read-only with every worker.
pub fn run(
    listener: TcpListener,
    store: Arc<dyn Store>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let config_error = |e: ConfigError| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    };

    settings.validate().map_err(config_error)?;
    let codec = AccessTokenCodec::from_settings(&settings.auth).map_err(config_error)?;
    let api_key = ApiKey::from_settings(&settings.auth).map_err(config_error)?;
    let credentials = CredentialManager::new(
        store.clone(),
        codec.clone(),
        settings.auth.refresh_token_ttl().map_err(config_error)?,
    );

    let store: web::Data<dyn Store> = web::Data::from(store);
    let codec = web::Data::new(codec);
    let api_key = web::Data::new(api_key);
    let credentials = web::Data::new(credentials);
    let application = web::Data::new(settings.application.clone());
    let hits = web::Data::new(HitCounter::new());

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(json_config.clone())
            .app_data(store.clone())
            .app_data(codec.clone())
            .app_data(api_key.clone())
            .app_data(credentials.clone())
            .app_data(application.clone())
            .app_data(hits.clone())

            // API
            .route("/api/healthz", web::get().to(health_check))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .service(
                web::resource("/api/users")
                    .route(web::post().to(create_user))
                    .route(web::put().to(update_user)),
            )
            .service(
                web::resource("/api/chirps")
                    .route(web::get().to(list_chirps))
                    .route(web::post().to(create_chirp)),
            )
            .service(
                web::resource("/api/chirps/{chirp_id}")
                    .route(web::get().to(get_chirp))
                    .route(web::delete().to(delete_chirp)),
            )
            .route("/api/polka/webhooks", web::post().to(polka_webhook))

            // Admin
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Static files, counted
            .service(
                web::scope("/app")
                    .wrap(FileServerHits::new(hits.clone()))
                    .service(fs::Files::new("", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
