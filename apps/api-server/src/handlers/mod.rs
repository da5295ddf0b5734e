//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(extractor_config::json())
        .app_data(extractor_config::path())
        .app_data(extractor_config::query())
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Posts: reads are public, writes need an Identity
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::index))
                        .route("", web::post().to(posts::store))
                        .route("/{id}", web::get().to(posts::show))
                        .route("/{id}", web::put().to(posts::update))
                        .route("/{id}", web::patch().to(posts::update))
                        .route("/{id}", web::delete().to(posts::destroy)),
                ),
        );
}

/// Extractor failures rendered through `AppError`.
mod extractor_config {
    use super::*;

    /// Malformed bodies are validation failures.
    pub fn json() -> web::JsonConfig {
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(vec![err.to_string()]).into())
    }

    /// An unparseable id can never match a post.
    pub fn path() -> web::PathConfig {
        web::PathConfig::default().error_handler(|_err: error::PathError, _req| {
            AppError::NotFound("Post Not Found".to_string()).into()
        })
    }

    pub fn query() -> web::QueryConfig {
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::Validation(vec![err.to_string()]).into())
    }
}
