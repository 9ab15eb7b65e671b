// inkpost_server/src/main.rs

mod config;
mod db;
mod errors;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat, StoreBackend};
use crate::errors::{AppError, Result as AppResult};
use crate::state::AppState;

use actix_cors::Cors;
use actix_web::{http::header, web as actix_data, App, HttpServer};
use inkpost::{MemoryStore, Store};
use std::sync::Arc;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

fn init_tracing(format: LogFormat) {
  // RUST_LOG overrides the default level
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

async fn open_store(config: &AppConfig) -> AppResult<Arc<dyn Store>> {
  match config.store_backend {
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on shutdown.");
      Ok(Arc::new(MemoryStore::new()))
    }
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
      let pool = db::connect(url, config.database_max_connections).await?;
      if config.run_migrations {
        db::run_migrations(&pool).await?;
      }
      Ok(Arc::new(db::PgStore::new(pool)))
    }
  }
}

fn cors_for(config: &AppConfig) -> Cors {
  if config.cors_allow_any {
    return Cors::permissive();
  }
  Cors::default()
    .allowed_origin(&config.app_base_url)
    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
    .allowed_header(header::CONTENT_TYPE)
    .max_age(3600)
}

fn startup_error(e: AppError) -> std::io::Error {
  tracing::error!(error = %e, "Server startup failed.");
  std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let config = AppConfig::from_env();
  init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or(LogFormat::Pretty));

  tracing::info!("Starting inkpost server...");

  let app_config = Arc::new(config.map_err(startup_error)?);
  // DATABASE_URL stays out of the logs: it usually embeds credentials.
  tracing::info!(
    server_host = %app_config.server_host,
    server_port = app_config.server_port,
    store_backend = ?app_config.store_backend,
    "Application configuration loaded successfully."
  );

  let store = open_store(&app_config).await.map_err(startup_error)?;
  let app_state = AppState::new(store, app_config.clone()).map_err(startup_error)?;

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(cors_for(&app_state.config))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
