use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod store;
mod utils;

use config::Config;
use db::init_db;
use store::{JobStore, MemoryJobStore, MySqlJobStore};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Jobify API is up"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let level: tracing::Level = config
        .log_level
        .parse()
        .with_context(|| format!("LOG_LEVEL has an invalid value: {}", config.log_level))?;

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn JobStore> = match &config.database_url {
        Some(url) => {
            let pool = init_db(url)
                .await
                .context("Failed to connect to database")?;
            Arc::new(MySqlJobStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, jobs are kept in memory only");
            Arc::new(MemoryJobStore::new())
        }
    };

    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, prefix = %config.api_prefix, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::from(store.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            // Job routes behind auth + rate limiting
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
