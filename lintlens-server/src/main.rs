#![deny(missing_docs)]
//! LintLens server executable.
//!
//! Serves correlation, statistics, trend and heatmap views computed from the
//! analysis backend as JSON.

mod config;
mod openapi;
mod routes;

#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use lintlens_core::HttpResultsSource;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::routes::{AppState, configure};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let source = HttpResultsSource::new(config.api.clone()).map_err(std::io::Error::other)?;
    log::info!("reading analysis results from {}", config.api.base_url());

    let state = web::Data::new(AppState::new(Arc::new(source)));
    let allowed_origins = config.ui_origins;
    let listen_addr = config.host;
    let listen_port = config.port;
    let err_msg = format!("Can't bind {}:{}", &listen_addr, listen_port);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((listen_addr, listen_port))
        .map_err(|err| std::io::Error::new(err.kind(), format!("{err_msg}: {err}")))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
