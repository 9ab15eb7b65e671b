// inkpost_server/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use inkpost::HashingParams;
use std::env;
use std::str::FromStr;

/// Which [`inkpost::Store`] implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(value: &str) -> Result<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Required for the Postgres backend only.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  /// Origin of the frontend, allowed by CORS.
  pub app_base_url: String,
  pub cors_allow_any: bool,
  pub hashing: HashingParams,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. `from_env` passes the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var::<u16>("SERVER_PORT", &get_or("SERVER_PORT", "8000"))?;
    let store_backend = get_or("STORE_BACKEND", "postgres").parse::<StoreBackend>()?;

    let database_url = lookup("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when STORE_BACKEND=postgres)".to_string(),
      ));
    }
    let database_max_connections =
      parse_var::<u32>("DATABASE_MAX_CONNECTIONS", &get_or("DATABASE_MAX_CONNECTIONS", "5"))?;
    let run_migrations = parse_var::<bool>("RUN_MIGRATIONS", &get_or("RUN_MIGRATIONS", "true"))?;

    let app_base_url = get_or("APP_BASE_URL", "http://localhost:3000");
    let cors_allow_any = parse_var::<bool>("CORS_ALLOW_ANY", &get_or("CORS_ALLOW_ANY", "false"))?;

    let defaults = HashingParams::default();
    let hashing = HashingParams {
      memory_kib: optional_var("ARGON2_MEMORY_KIB", lookup("ARGON2_MEMORY_KIB"), defaults.memory_kib)?,
      iterations: optional_var("ARGON2_ITERATIONS", lookup("ARGON2_ITERATIONS"), defaults.iterations)?,
      parallelism: optional_var("ARGON2_PARALLELISM", lookup("ARGON2_PARALLELISM"), defaults.parallelism)?,
    };

    let log_format = match get_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
      "pretty" => LogFormat::Pretty,
      "json" => LogFormat::Json,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      database_max_connections,
      run_migrations,
      app_base_url,
      cors_allow_any,
      hashing,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

fn optional_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    Some(value) => parse_var(name, &value),
    None => Ok(default),
  }
}
