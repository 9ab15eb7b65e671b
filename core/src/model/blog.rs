// inkpost/src/model/blog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_text, User};
use crate::error::InkResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
  pub id: Uuid,
  pub title: String,
  pub content: String,
  pub image: String,
  /// Owning user. Set once at creation, never reassigned.
  pub user: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A blog with its owner reference resolved into the full user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogWithOwner {
  pub id: Uuid,
  pub title: String,
  pub content: String,
  pub image: String,
  pub user: User,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl BlogWithOwner {
  pub fn new(blog: Blog, owner: User) -> Self {
    Self {
      id: blog.id,
      title: blog.title,
      content: blog.content,
      image: blog.image,
      user: owner,
      created_at: blog.created_at,
      updated_at: blog.updated_at,
    }
  }
}

/// Body of an add-blog request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBlog {
  pub title: String,
  pub content: String,
  pub image: String,
  pub user: Uuid,
}

impl NewBlog {
  pub fn validate(&self) -> InkResult<()> {
    require_text("title", &self.title)?;
    require_text("content", &self.content)?;
    require_text("image", &self.image)
  }
}

/// The three fields an update may overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlogPatch {
  pub title: String,
  pub content: String,
  pub image: String,
}

impl BlogPatch {
  pub fn validate(&self) -> InkResult<()> {
    require_text("title", &self.title)?;
    require_text("content", &self.content)?;
    require_text("image", &self.image)
  }

  pub(crate) fn apply(&self, blog: &mut Blog, at: DateTime<Utc>) {
    blog.title.clone_from(&self.title);
    blog.content.clone_from(&self.content);
    blog.image.clone_from(&self.image);
    blog.updated_at = at;
  }
}
