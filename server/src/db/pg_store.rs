// inkpost_server/src/db/pg_store.rs

//! PostgreSQL implementation of the storage ports.
//!
//! `users.blogs` is a `UUID[]` column. It is changed with `array_append` /
//! `array_remove` in a single `UPDATE`, so concurrent writers for the same
//! owner never overwrite each other's changes.

use async_trait::async_trait;
use inkpost::{Blog, BlogPatch, InkError, InkResult, NewBlog, NewUserRecord, Store, StoreTx, User};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use super::rows::{BlogRow, UserRow};

const SELECT_USER: &str = "SELECT id, name, email, password_hash, blogs, created_at FROM users";
const SELECT_BLOG: &str = "SELECT id, title, content, image, user_id, created_at, updated_at FROM blogs";

fn persistence(err: sqlx::Error) -> InkError {
  error!(error = %err, "Database operation failed.");
  InkError::persistence(err)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl Store for PgStore {
  async fn begin(&self) -> InkResult<Box<dyn StoreTx>> {
    let tx = self.pool.begin().await.map_err(persistence)?;
    Ok(Box::new(PgTx { tx }))
  }

  #[instrument(name = "pg_store::insert_user", skip(self, user), fields(email = %user.email))]
  async fn insert_user(&self, user: NewUserRecord) -> InkResult<User> {
    let inserted = sqlx::query_as::<_, UserRow>(
      "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
       RETURNING id, name, email, password_hash, blogs, created_at",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .fetch_one(&self.pool)
    .await;

    match inserted {
      Ok(row) => Ok(row.into()),
      Err(err) if is_unique_violation(&err) => Err(InkError::Duplicate { email: user.email }),
      Err(err) => Err(persistence(err)),
    }
  }

  async fn find_user(&self, id: Uuid) -> InkResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USER))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(persistence)?;
    Ok(row.map(User::from))
  }

  async fn find_user_by_email(&self, email: &str) -> InkResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE email = $1", SELECT_USER))
      .bind(email)
      .fetch_optional(&self.pool)
      .await
      .map_err(persistence)?;
    Ok(row.map(User::from))
  }

  async fn find_users(&self, ids: &[Uuid]) -> InkResult<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = ANY($1)", SELECT_USER))
      .bind(ids)
      .fetch_all(&self.pool)
      .await
      .map_err(persistence)?;
    Ok(rows.into_iter().map(User::from).collect())
  }

  async fn list_users(&self) -> InkResult<Vec<User>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY created_at ASC", SELECT_USER))
      .fetch_all(&self.pool)
      .await
      .map_err(persistence)?;
    Ok(rows.into_iter().map(User::from).collect())
  }

  async fn find_blog(&self, id: Uuid) -> InkResult<Option<Blog>> {
    let row = sqlx::query_as::<_, BlogRow>(&format!("{} WHERE id = $1", SELECT_BLOG))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(persistence)?;
    Ok(row.map(Blog::from))
  }

  async fn find_blogs(&self, ids: &[Uuid]) -> InkResult<Vec<Blog>> {
    let rows = sqlx::query_as::<_, BlogRow>(&format!("{} WHERE id = ANY($1)", SELECT_BLOG))
      .bind(ids)
      .fetch_all(&self.pool)
      .await
      .map_err(persistence)?;
    Ok(rows.into_iter().map(Blog::from).collect())
  }

  async fn list_blogs(&self) -> InkResult<Vec<Blog>> {
    let rows = sqlx::query_as::<_, BlogRow>(&format!("{} ORDER BY created_at ASC", SELECT_BLOG))
      .fetch_all(&self.pool)
      .await
      .map_err(persistence)?;
    Ok(rows.into_iter().map(Blog::from).collect())
  }

  #[instrument(name = "pg_store::update_blog", skip(self, patch))]
  async fn update_blog(&self, id: Uuid, patch: &BlogPatch) -> InkResult<Option<Blog>> {
    let row = sqlx::query_as::<_, BlogRow>(
      "UPDATE blogs SET title = $2, content = $3, image = $4, updated_at = now() WHERE id = $1 \
       RETURNING id, title, content, image, user_id, created_at, updated_at",
    )
    .bind(id)
    .bind(&patch.title)
    .bind(&patch.content)
    .bind(&patch.image)
    .fetch_optional(&self.pool)
    .await
    .map_err(persistence)?;
    Ok(row.map(Blog::from))
  }
}

/// Rolled back by sqlx when dropped without `commit`.
struct PgTx {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
  async fn find_user(&mut self, id: Uuid) -> InkResult<Option<User>> {
    // No row lock here: a shared lock would deadlock two concurrent creates for
    // one owner once both reach the array_append UPDATE.
    let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", SELECT_USER))
      .bind(id)
      .fetch_optional(&mut *self.tx)
      .await
      .map_err(persistence)?;
    Ok(row.map(User::from))
  }

  async fn insert_blog(&mut self, blog: &NewBlog) -> InkResult<Blog> {
    let inserted = sqlx::query_as::<_, BlogRow>(
      "INSERT INTO blogs (title, content, image, user_id) VALUES ($1, $2, $3, $4) \
       RETURNING id, title, content, image, user_id, created_at, updated_at",
    )
    .bind(&blog.title)
    .bind(&blog.content)
    .bind(&blog.image)
    .bind(blog.user)
    .fetch_one(&mut *self.tx)
    .await;

    match inserted {
      Ok(row) => Ok(row.into()),
      Err(err) if is_foreign_key_violation(&err) => Err(InkError::OwnerNotFound { user_id: blog.user }),
      Err(err) => Err(persistence(err)),
    }
  }

  async fn remove_blog(&mut self, id: Uuid) -> InkResult<Option<Blog>> {
    let row = sqlx::query_as::<_, BlogRow>(
      "DELETE FROM blogs WHERE id = $1 RETURNING id, title, content, image, user_id, created_at, updated_at",
    )
    .bind(id)
    .fetch_optional(&mut *self.tx)
    .await
    .map_err(persistence)?;
    Ok(row.map(Blog::from))
  }

  async fn push_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool> {
    let result = sqlx::query(
      "UPDATE users SET blogs = array_append(blogs, $2) WHERE id = $1 AND NOT ($2 = ANY(blogs))",
    )
    .bind(owner)
    .bind(blog)
    .execute(&mut *self.tx)
    .await
    .map_err(persistence)?;
    Ok(result.rows_affected() == 1)
  }

  async fn pull_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool> {
    let result = sqlx::query("UPDATE users SET blogs = array_remove(blogs, $2) WHERE id = $1 AND $2 = ANY(blogs)")
      .bind(owner)
      .bind(blog)
      .execute(&mut *self.tx)
      .await
      .map_err(persistence)?;
    Ok(result.rows_affected() == 1)
  }

  async fn commit(self: Box<Self>) -> InkResult<()> {
    self.tx.commit().await.map_err(persistence)?;
    debug!("Postgres transaction committed.");
    Ok(())
  }
}
