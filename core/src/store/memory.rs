// inkpost/src/store/memory.rs

//! In-process [`Store`] used by tests and by the server's `memory` backend.
//!
//! A transaction never copies the tables. It records its writes in a log and
//! answers reads from the live tables with that log laid over them, so reads
//! see committed data plus the transaction's own writes. Commit checks the log
//! against the live tables and then applies it, all under one write lock.
//! Reference pushes and pulls are applied to the *current* `blogs` list of the
//! owner, so two transactions appending to the same owner both land.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Store, StoreTx};
use crate::error::{InkError, InkResult};
use crate::model::{Blog, BlogPatch, NewBlog, NewUserRecord, User};

#[derive(Debug, Default)]
struct Tables {
  users: Vec<User>,
  blogs: Vec<Blog>,
}

impl Tables {
  fn user(&self, id: Uuid) -> Option<&User> {
    self.users.iter().find(|u| u.id == id)
  }

  fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
    self.users.iter_mut().find(|u| u.id == id)
  }

  fn blog(&self, id: Uuid) -> Option<&Blog> {
    self.blogs.iter().find(|b| b.id == id)
  }

  /// Fails if any write in `log` can no longer be applied to these tables.
  fn check(&self, log: &[Write]) -> InkResult<()> {
    let mut inserted = HashSet::new();
    let mut removed = HashSet::new();
    for write in log {
      match write {
        Write::InsertBlog(blog) => {
          inserted.insert(blog.id);
        }
        Write::RemoveBlog(id) => {
          let present = self.blog(*id).is_some() || inserted.contains(id);
          if !present || !removed.insert(*id) {
            return Err(InkError::persistence(anyhow!(
              "blog {} was removed by a concurrent writer",
              id
            )));
          }
        }
        Write::PushRef { owner, .. } => {
          if self.user(*owner).is_none() {
            return Err(InkError::persistence(anyhow!("owner {} vanished before commit", owner)));
          }
        }
        Write::PullRef { .. } => {}
      }
    }
    Ok(())
  }

  /// Applies a write that [`Tables::check`] accepted.
  fn apply(&mut self, write: &Write) {
    match write {
      Write::InsertBlog(blog) => self.blogs.push(blog.clone()),
      Write::RemoveBlog(id) => self.blogs.retain(|b| b.id != *id),
      Write::PushRef { owner, blog } => {
        if let Some(user) = self.user_mut(*owner) {
          if !user.blogs.contains(blog) {
            user.blogs.push(*blog);
          }
        }
      }
      Write::PullRef { owner, blog } => {
        if let Some(user) = self.user_mut(*owner) {
          user.blogs.retain(|b| b != blog);
        }
      }
    }
  }
}

#[derive(Debug, Clone)]
enum Write {
  InsertBlog(Blog),
  RemoveBlog(Uuid),
  PushRef { owner: Uuid, blog: Uuid },
  PullRef { owner: Uuid, blog: Uuid },
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a blog directly, bypassing the owner's list.
  ///
  /// Only useful for reproducing damaged data (orphans, dangling owners) in tests.
  #[cfg(any(test, feature = "test-util"))]
  pub fn insert_blog_unlinked(&self, blog: Blog) {
    self.tables.write().blogs.push(blog);
  }

  /// Sets a user's `blogs` list verbatim, for the same purpose as [`Self::insert_blog_unlinked`].
  #[cfg(any(test, feature = "test-util"))]
  pub fn overwrite_blog_refs(&self, owner: Uuid, refs: Vec<Uuid>) -> bool {
    match self.tables.write().user_mut(owner) {
      Some(user) => {
        user.blogs = refs;
        true
      }
      None => false,
    }
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn begin(&self) -> InkResult<Box<dyn StoreTx>> {
    Ok(Box::new(MemoryTx {
      live: Arc::clone(&self.tables),
      log: Vec::new(),
    }))
  }

  async fn insert_user(&self, user: NewUserRecord) -> InkResult<User> {
    let mut tables = self.tables.write();
    if tables.users.iter().any(|u| u.email == user.email) {
      return Err(InkError::Duplicate { email: user.email });
    }
    let created = User {
      id: Uuid::new_v4(),
      name: user.name,
      email: user.email,
      password_hash: user.password_hash,
      blogs: Vec::new(),
      created_at: Utc::now(),
    };
    tables.users.push(created.clone());
    debug!(user_id = %created.id, "memory store: user inserted");
    Ok(created)
  }

  async fn find_user(&self, id: Uuid) -> InkResult<Option<User>> {
    Ok(self.tables.read().user(id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> InkResult<Option<User>> {
    Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
  }

  async fn find_users(&self, ids: &[Uuid]) -> InkResult<Vec<User>> {
    let tables = self.tables.read();
    Ok(tables.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
  }

  async fn list_users(&self) -> InkResult<Vec<User>> {
    Ok(self.tables.read().users.clone())
  }

  async fn find_blog(&self, id: Uuid) -> InkResult<Option<Blog>> {
    Ok(self.tables.read().blog(id).cloned())
  }

  async fn find_blogs(&self, ids: &[Uuid]) -> InkResult<Vec<Blog>> {
    let tables = self.tables.read();
    Ok(tables.blogs.iter().filter(|b| ids.contains(&b.id)).cloned().collect())
  }

  async fn list_blogs(&self) -> InkResult<Vec<Blog>> {
    Ok(self.tables.read().blogs.clone())
  }

  async fn update_blog(&self, id: Uuid, patch: &BlogPatch) -> InkResult<Option<Blog>> {
    let mut tables = self.tables.write();
    Ok(tables.blogs.iter_mut().find(|b| b.id == id).map(|blog| {
      patch.apply(blog, Utc::now());
      blog.clone()
    }))
  }
}

struct MemoryTx {
  live: Arc<RwLock<Tables>>,
  log: Vec<Write>,
}

impl MemoryTx {
  /// The owner's `blogs` list as this transaction sees it.
  fn refs_of(&self, tables: &Tables, owner: Uuid) -> Option<Vec<Uuid>> {
    let mut refs = tables.user(owner)?.blogs.clone();
    for write in &self.log {
      match write {
        Write::PushRef { owner: o, blog } if *o == owner && !refs.contains(blog) => refs.push(*blog),
        Write::PullRef { owner: o, blog } if *o == owner => refs.retain(|b| b != blog),
        _ => {}
      }
    }
    Some(refs)
  }

  fn visible_blog(&self, tables: &Tables, id: Uuid) -> Option<Blog> {
    let mut found = tables.blog(id).cloned();
    for write in &self.log {
      match write {
        Write::InsertBlog(blog) if blog.id == id => found = Some(blog.clone()),
        Write::RemoveBlog(removed) if *removed == id => found = None,
        _ => {}
      }
    }
    found
  }
}

#[async_trait]
impl StoreTx for MemoryTx {
  async fn find_user(&mut self, id: Uuid) -> InkResult<Option<User>> {
    let tables = self.live.read();
    Ok(tables.user(id).map(|user| User {
      blogs: self.refs_of(&tables, id).unwrap_or_default(),
      ..user.clone()
    }))
  }

  async fn insert_blog(&mut self, blog: &NewBlog) -> InkResult<Blog> {
    let now = Utc::now();
    let created = Blog {
      id: Uuid::new_v4(),
      title: blog.title.clone(),
      content: blog.content.clone(),
      image: blog.image.clone(),
      user: blog.user,
      created_at: now,
      updated_at: now,
    };
    self.log.push(Write::InsertBlog(created.clone()));
    Ok(created)
  }

  async fn remove_blog(&mut self, id: Uuid) -> InkResult<Option<Blog>> {
    let existing = self.visible_blog(&self.live.read(), id);
    if existing.is_some() {
      self.log.push(Write::RemoveBlog(id));
    }
    Ok(existing)
  }

  async fn push_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool> {
    let refs = self.refs_of(&self.live.read(), owner);
    match refs {
      Some(refs) if !refs.contains(&blog) => {
        self.log.push(Write::PushRef { owner, blog });
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn pull_blog_ref(&mut self, owner: Uuid, blog: Uuid) -> InkResult<bool> {
    let refs = self.refs_of(&self.live.read(), owner);
    match refs {
      Some(refs) if refs.contains(&blog) => {
        self.log.push(Write::PullRef { owner, blog });
        Ok(true)
      }
      _ => Ok(false),
    }
  }

  async fn commit(self: Box<Self>) -> InkResult<()> {
    let mut live = self.live.write();
    if let Err(err) = live.check(&self.log) {
      warn!(error = %err, "memory store: commit aborted, nothing applied");
      return Err(err);
    }
    for write in &self.log {
      live.apply(write);
    }
    debug!(writes = self.log.len(), "memory store: transaction committed");
    Ok(())
  }
}
