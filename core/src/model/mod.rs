// inkpost/src/model/mod.rs

//! Records stored by the backend and the request-shaped inputs that create or change them.

pub mod blog;
pub mod user;

pub use blog::{Blog, BlogPatch, BlogWithOwner, NewBlog};
pub use user::{Credentials, NewUser, NewUserRecord, User, UserWithBlogs};

use crate::error::{InkError, InkResult};

/// Rejects empty (or whitespace-only) required text fields.
pub(crate) fn require_text(field: &'static str, value: &str) -> InkResult<()> {
  if value.trim().is_empty() {
    return Err(InkError::validation(format!("'{}' is required", field)));
  }
  Ok(())
}
