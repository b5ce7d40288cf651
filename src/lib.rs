use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};

use crate::auth::verifier::TokenVerifier;
use crate::middleware::JsonErrors;
use crate::models::config::ServerConfig;
use crate::models::environment::Environment;
use crate::repository::InMemoryDrinkRepository;
use crate::services::drinks::DrinkService;

pub mod auth;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

/// CORS policy; no configured origins means any origin is accepted.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins.iter().fold(
        Cors::default()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

/// Build the HTTP server from `server_config` and run it to completion.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let environment = Environment::current();
    log::info!(
        "Serving the {} environment record",
        environment.name().as_str()
    );
    if environment.auth0().audience() != server_config.auth0.audience {
        log::warn!(
            "API audience {} differs from the front end audience {}",
            server_config.auth0.audience,
            environment.auth0().audience()
        );
    }

    let verifier = TokenVerifier::from_config(&server_config.auth0).map_err(std::io::Error::other)?;
    let verifier = web::Data::new(verifier);
    let drinks = web::Data::new(DrinkService::new(Arc::new(
        InMemoryDrinkRepository::seeded(),
    )));
    let environment = web::Data::new(environment.clone());
    let allowed_origins = server_config.allowed_origins.clone();

    let address = server_config.address.clone();
    let port = server_config.port;
    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(JsonErrors)
            .wrap(build_cors(&allowed_origins))
            .wrap(Logger::default())
            .app_data(verifier.clone())
            .app_data(drinks.clone())
            .app_data(environment.clone())
            .configure(routes::configure)
    })
    .bind((address, port))?
    .run()
    .await
}
