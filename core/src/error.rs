// inkpost/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of an [`InkError`], used by transports to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Duplicate,
  ValidationFailed,
  AuthFailed,
  PersistenceError,
  OrphanedReference,
}

#[derive(Debug, Error)]
pub enum InkError {
  #[error("Unable to find user by this id: {user_id}")]
  OwnerNotFound { user_id: Uuid },

  #[error("No blog found with id {blog_id}")]
  BlogNotFound { blog_id: Uuid },

  #[error("User not found! Register first")]
  UserNotFound { email: String },

  #[error("No {0} found")]
  NoRecords(&'static str),

  #[error("User already exists with email '{email}'! Login instead")]
  Duplicate { email: String },

  #[error("Validation failed: {0}")]
  Validation(String),

  // Deliberately does not say whether the email or the password was wrong.
  #[error("Invalid email or password")]
  AuthFailed,

  #[error("Blog {blog_id} references owner {owner_id}, which does not exist")]
  OrphanedReference { blog_id: Uuid, owner_id: Uuid },

  #[error("Persistence error: {source}")]
  Persistence {
    #[source]
    source: AnyhowError,
  },
}

impl InkError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      InkError::OwnerNotFound { .. }
      | InkError::BlogNotFound { .. }
      | InkError::UserNotFound { .. }
      | InkError::NoRecords(_) => ErrorKind::NotFound,
      InkError::Duplicate { .. } => ErrorKind::Duplicate,
      InkError::Validation(_) => ErrorKind::ValidationFailed,
      InkError::AuthFailed => ErrorKind::AuthFailed,
      InkError::OrphanedReference { .. } => ErrorKind::OrphanedReference,
      InkError::Persistence { .. } => ErrorKind::PersistenceError,
    }
  }

  /// Wraps any storage-level failure.
  pub fn persistence<E>(err: E) -> Self
  where
    E: Into<AnyhowError>,
  {
    InkError::Persistence { source: err.into() }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    InkError::Validation(message.into())
  }
}

impl From<AnyhowError> for InkError {
  fn from(err: AnyhowError) -> Self {
    InkError::Persistence { source: err }
  }
}

pub type InkResult<T, E = InkError> = std::result::Result<T, E>;
