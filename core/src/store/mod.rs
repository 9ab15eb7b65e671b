// inkpost/src/store/mod.rs

//! Storage ports.
//!
//! Users and blogs live in two independent collections joined by id. Anything
//! that touches both sides of the user/blog relationship goes through a
//! [`StoreTx`], so a failure between the two writes never leaves a half-linked
//! record behind.
//!
//! The `blogs` list on a user is only ever changed through
//! [`StoreTx::push_blog_ref`] and [`StoreTx::pull_blog_ref`]. Implementations
//! must make those single-field atomic operations (no read of the whole user
//! followed by a rewrite), otherwise concurrent writers for the same owner lose
//! updates.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::InkResult;
use crate::model::{Blog, BlogPatch, NewBlog, NewUserRecord, User};

#[async_trait]
pub trait Store: Send + Sync + 'static {
  /// Opens a transaction. Dropping it without [`StoreTx::commit`] discards its writes.
  async fn begin(&self) -> InkResult<Box<dyn StoreTx>>;

  /// Persists a user with an empty `blogs` list.
  ///
  /// Fails with `InkError::Duplicate` when the email is already registered,
  /// even if a concurrent sign-up slipped past the caller's own pre-check.
  async fn insert_user(&self, user: NewUserRecord) -> InkResult<User>;

  async fn find_user(&self, id: Uuid) -> InkResult<Option<User>>;

  async fn find_user_by_email(&self, email: &str) -> InkResult<Option<User>>;

  /// Users with the given ids, in no particular order. Unknown ids are skipped.
  async fn find_users(&self, ids: &[Uuid]) -> InkResult<Vec<User>>;

  async fn list_users(&self) -> InkResult<Vec<User>>;

  async fn find_blog(&self, id: Uuid) -> InkResult<Option<Blog>>;

  /// Blogs with the given ids, in no particular order. Unknown ids are skipped.
  async fn find_blogs(&self, ids: &[Uuid]) -> InkResult<Vec<Blog>>;

  async fn list_blogs(&self) -> InkResult<Vec<Blog>>;

  /// Overwrites title, content and image. `None` when the blog does not exist.
  async fn update_blog(&self, id: Uuid, patch: &BlogPatch) -> InkResult<Option<Blog>>;
}

#[async_trait]
pub trait StoreTx: Send {
  async fn find_user(&mut self, id: Uuid) -> InkResult<Option<User>>;

  /// Persists a blog and returns it with its generated id.
  async fn insert_blog(&mut self, blog: &NewBlog) -> InkResult<Blog>;

  /// Removes a blog and returns what was removed.
  async fn remove_blog(&mut self, id: Uuid) -> InkResult<Option<Blog>>;

  /// Appends `blog` to `owner`'s list unless it is already there.
  ///
  /// Returns `false` when nothing changed (owner missing or already listed).
  async fn push_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool>;

  /// Removes `blog` from `owner`'s list.
  ///
  /// Returns `false` when nothing changed (owner missing or not listed).
  async fn pull_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool>;

  async fn commit(self: Box<Self>) -> InkResult<()>;
}
