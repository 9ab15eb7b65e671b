// inkpost/src/model/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, Blog};
use crate::error::{InkError, InkResult};

/// Shortest plaintext password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  /// Ids of the blogs this user owns, in creation order.
  pub blogs: Vec<Uuid>,
  pub created_at: DateTime<Utc>,
}

/// A user with the `blogs` references resolved into full blog records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithBlogs {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub blogs: Vec<Blog>,
  pub created_at: DateTime<Utc>,
}

impl UserWithBlogs {
  pub fn new(user: User, blogs: Vec<Blog>) -> Self {
    Self {
      id: user.id,
      name: user.name,
      email: user.email,
      blogs,
      created_at: user.created_at,
    }
  }
}

/// Body of a sign-up request.
#[derive(Clone, Deserialize)]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub password: String,
}

impl std::fmt::Debug for NewUser {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NewUser")
      .field("name", &self.name)
      .field("email", &self.email)
      .finish_non_exhaustive()
  }
}

impl NewUser {
  /// Checks required fields and the password length. Runs before any hashing.
  pub fn validate(&self) -> InkResult<()> {
    require_text("name", &self.name)?;
    require_text("email", &self.email)?;
    if self.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(InkError::validation(format!(
        "Password must be at least {} characters long",
        MIN_PASSWORD_LEN
      )));
    }
    Ok(())
  }
}

/// What the store needs to persist a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
  pub name: String,
  pub email: String,
  pub password_hash: String,
}

/// Body of a sign-in request.
#[derive(Clone, Deserialize)]
pub struct Credentials {
  pub email: String,
  pub password: String,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials").field("email", &self.email).finish_non_exhaustive()
  }
}
