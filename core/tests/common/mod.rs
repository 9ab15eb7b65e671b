// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use inkpost::{
  AccountService, Blog, BlogPatch, HashingParams, InkError, InkResult, MemoryStore, NewBlog, NewUser,
  NewUserRecord, PasswordHasherService, RelationshipManager, Store, StoreTx, User,
};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Fixtures ---
pub struct Fixture {
  pub store: MemoryStore,
  pub relations: RelationshipManager,
  pub accounts: AccountService,
}

pub fn passwords() -> PasswordHasherService {
  PasswordHasherService::new(HashingParams::minimal()).expect("minimal argon2 params are valid")
}

pub fn fixture() -> Fixture {
  let store = MemoryStore::new();
  let shared: Arc<dyn Store> = Arc::new(store.clone());
  Fixture {
    relations: RelationshipManager::new(shared.clone()),
    accounts: AccountService::new(shared, passwords()),
    store,
  }
}

pub fn signup(name: &str, email: &str, password: &str) -> NewUser {
  NewUser {
    name: name.to_string(),
    email: email.to_string(),
    password: password.to_string(),
  }
}

pub fn draft(owner: Uuid, title: &str) -> NewBlog {
  NewBlog {
    title: title.to_string(),
    content: "C".to_string(),
    image: "I".to_string(),
    user: owner,
  }
}

pub fn patch(title: &str, content: &str, image: &str) -> BlogPatch {
  BlogPatch {
    title: title.to_string(),
    content: content.to_string(),
    image: image.to_string(),
  }
}

pub async fn user_a(fx: &Fixture) -> User {
  fx.accounts.sign_up(signup("A", "a@x.com", "abcdef")).await.expect("sign up A")
}

// --- Failure injection ---

/// Which transactional write should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailAt {
  PushRef,
  PullRef,
  Commit,
}

/// Delegates to a [`MemoryStore`] but makes one kind of transactional write fail.
pub struct FlakyStore {
  pub inner: MemoryStore,
  pub fail_at: FailAt,
}

#[async_trait]
impl Store for FlakyStore {
  async fn begin(&self) -> InkResult<Box<dyn StoreTx>> {
    Ok(Box::new(FlakyTx {
      inner: self.inner.begin().await?,
      fail_at: self.fail_at,
    }))
  }
  async fn insert_user(&self, user: NewUserRecord) -> InkResult<User> {
    self.inner.insert_user(user).await
  }
  async fn find_user(&self, id: Uuid) -> InkResult<Option<User>> {
    self.inner.find_user(id).await
  }
  async fn find_user_by_email(&self, email: &str) -> InkResult<Option<User>> {
    self.inner.find_user_by_email(email).await
  }
  async fn find_users(&self, ids: &[Uuid]) -> InkResult<Vec<User>> {
    self.inner.find_users(ids).await
  }
  async fn list_users(&self) -> InkResult<Vec<User>> {
    self.inner.list_users().await
  }
  async fn find_blog(&self, id: Uuid) -> InkResult<Option<Blog>> {
    self.inner.find_blog(id).await
  }
  async fn find_blogs(&self, ids: &[Uuid]) -> InkResult<Vec<Blog>> {
    self.inner.find_blogs(ids).await
  }
  async fn list_blogs(&self) -> InkResult<Vec<Blog>> {
    self.inner.list_blogs().await
  }
  async fn update_blog(&self, id: Uuid, patch: &BlogPatch) -> InkResult<Option<Blog>> {
    self.inner.update_blog(id, patch).await
  }
}

struct FlakyTx {
  inner: Box<dyn StoreTx>,
  fail_at: FailAt,
}

fn injected() -> InkError {
  InkError::persistence(anyhow::anyhow!("injected write failure"))
}

#[async_trait]
impl StoreTx for FlakyTx {
  async fn find_user(&mut self, id: Uuid) -> InkResult<Option<User>> {
    self.inner.find_user(id).await
  }
  async fn insert_blog(&mut self, blog: &NewBlog) -> InkResult<Blog> {
    self.inner.insert_blog(blog).await
  }
  async fn remove_blog(&mut self, id: Uuid) -> InkResult<Option<Blog>> {
    self.inner.remove_blog(id).await
  }
  async fn push_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool> {
    if self.fail_at == FailAt::PushRef {
      return Err(injected());
    }
    self.inner.push_blog_ref(owner, blog).await
  }
  async fn pull_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool> {
    if self.fail_at == FailAt::PullRef {
      return Err(injected());
    }
    self.inner.pull_blog_ref(owner, blog).await
  }
  async fn commit(self: Box<Self>) -> InkResult<()> {
    if self.fail_at == FailAt::Commit {
      return Err(injected());
    }
    self.inner.commit().await
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
