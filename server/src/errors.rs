// inkpost_server/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use inkpost::{ErrorKind, InkError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Domain(#[from] InkError),

  /// A domain failure the route reports as a plain server-side failure
  /// (update and delete report a missing blog as 500, not 404).
  #[error("{message}: {source}")]
  Failed {
    message: &'static str,
    #[source]
    source: InkError,
  },

  #[error("Bad Request: {0}")]
  BadRequest(String),

  #[error("Payload Too Large: {0}")]
  PayloadTooLarge(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
  /// Adapter for `map_err` on routes whose failures are all 500 except bad input.
  pub fn failed(message: &'static str) -> impl FnOnce(InkError) -> AppError {
    move |source| AppError::Failed { message, source }
  }

  fn client_message(&self) -> String {
    match self {
      AppError::Domain(err) => domain_message(err),
      AppError::Failed { message, source } => match source.kind() {
        ErrorKind::ValidationFailed => source.to_string(),
        _ => message.to_string(),
      },
      AppError::BadRequest(m) | AppError::PayloadTooLarge(m) => m.clone(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Sqlx(_) | AppError::Migrate(_) => "Database operation failed".to_string(),
    }
  }
}

fn domain_message(err: &InkError) -> String {
  match err.kind() {
    // Storage details stay in the logs.
    ErrorKind::PersistenceError => "Database operation failed".to_string(),
    _ => err.to_string(),
  }
}

fn domain_status(err: &InkError) -> StatusCode {
  match err {
    // The owner id comes from the request itself, so a miss is a bad request.
    InkError::OwnerNotFound { .. } => StatusCode::BAD_REQUEST,
    InkError::BlogNotFound { .. } | InkError::UserNotFound { .. } | InkError::NoRecords(_) => {
      StatusCode::NOT_FOUND
    }
    InkError::Duplicate { .. } | InkError::Validation(_) | InkError::AuthFailed => StatusCode::BAD_REQUEST,
    InkError::OrphanedReference { .. } | InkError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Domain(err) => domain_status(err),
      AppError::Failed { source, .. } => match source.kind() {
        ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Migrate(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    // Log the full error when it's turned into a response
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }
    HttpResponse::build(status).json(json!({ "message": self.client_message() }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
