#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the `SeniAURA` dashboard.
//!
//! Serves the loaded territorial dataset (catalogue, territories,
//! boundaries) and the analytical tools (range filters, diagnostic gap,
//! radar profiles, clustering, screening) as a JSON API under `/api`.
//! The dataset is loaded once before the server starts and shared
//! read-only between workers.

mod geometry;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use seniaura_territory::Dataset;

/// Shared application state.
pub struct AppState {
    /// The loaded dataset.
    pub dataset: Arc<Dataset>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/catalogue", web::get().to(handlers::catalogue))
            .route("/catalogue/lookups", web::get().to(handlers::catalogue_lookups))
            .route("/variables", web::get().to(handlers::variables))
            .route("/territories", web::get().to(handlers::territories))
            .route("/territories/{code}", web::get().to(handlers::territory))
            .route("/boundaries", web::get().to(handlers::boundaries))
            .route("/overlay", web::get().to(handlers::overlay))
            .route("/ranges/{variable}", web::get().to(handlers::range))
            .route("/filter", web::post().to(handlers::filter))
            .route("/gap", web::post().to(handlers::gap))
            .route("/radar", web::post().to(handlers::radar))
            .route("/cluster", web::post().to(handlers::cluster))
            .route("/screening", web::post().to(handlers::screening)),
    );
}

/// Bind address and port from `BIND_ADDR` / `PORT`, defaulting to
/// `127.0.0.1:8080`.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    (bind_addr, port)
}

/// Starts the API server over an already loaded dataset.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server(dataset: Arc<Dataset>, bind_addr: String, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(AppState { dataset });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
