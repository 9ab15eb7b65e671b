// inkpost_server/src/db/rows.rs

use chrono::{DateTime, Utc};
use inkpost::{Blog, User};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct UserRow {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub blogs: Vec<Uuid>,
  pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      name: row.name,
      email: row.email,
      password_hash: row.password_hash,
      blogs: row.blogs,
      created_at: row.created_at,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct BlogRow {
  pub id: Uuid,
  pub title: String,
  pub content: String,
  pub image: String,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<BlogRow> for Blog {
  fn from(row: BlogRow) -> Self {
    Blog {
      id: row.id,
      title: row.title,
      content: row.content,
      image: row.image,
      user: row.user_id,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}
