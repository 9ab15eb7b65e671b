// inkpost/src/relations.rs

//! Keeps `Blog.user` and `User.blogs` consistent.
//!
//! Every operation that changes both sides runs in one [`StoreTx`] with a fixed
//! order: the blog document first, the owner's reference list second. Nothing
//! is visible to other requests until the commit, so a failed second write
//! leaves neither an orphaned blog nor a dangling reference.
//!
//! [`StoreTx`]: crate::store::StoreTx

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{InkError, InkResult};
use crate::model::{Blog, BlogPatch, BlogWithOwner, NewBlog, UserWithBlogs};
use crate::store::Store;

#[derive(Clone)]
pub struct RelationshipManager {
  store: Arc<dyn Store>,
}

impl RelationshipManager {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  /// Persists a blog and links it into its owner's `blogs` list.
  #[instrument(name = "relations::create_blog_with_owner", skip(self, draft), fields(owner_id = %draft.user), err(Display))]
  pub async fn create_blog_with_owner(&self, draft: NewBlog) -> InkResult<Blog> {
    draft.validate()?;

    let mut tx = self.store.begin().await?;
    if tx.find_user(draft.user).await?.is_none() {
      return Err(InkError::OwnerNotFound { user_id: draft.user });
    }

    let blog = tx.insert_blog(&draft).await?;

    let linked = tx.push_blog_ref(draft.user, blog.id).await.map_err(|err| {
      error!(blog_id = %blog.id, error = %err, "Linking blog to owner failed, rolling back.");
      err
    })?;
    if !linked {
      // A brand-new id can only fail to append if the owner disappeared mid-transaction.
      error!(blog_id = %blog.id, "Owner vanished before the blog could be linked, rolling back.");
      return Err(InkError::OwnerNotFound { user_id: draft.user });
    }

    tx.commit().await?;
    info!(blog_id = %blog.id, "Blog created and linked to owner.");
    Ok(blog)
  }

  /// Removes a blog and unlinks it from its owner.
  ///
  /// Fails with `OrphanedReference` (and deletes nothing) when the owner the
  /// blog points to does not exist.
  #[instrument(name = "relations::delete_blog_and_unlink", skip(self), err(Display))]
  pub async fn delete_blog_and_unlink(&self, blog_id: Uuid) -> InkResult<()> {
    let mut tx = self.store.begin().await?;

    let blog = tx
      .remove_blog(blog_id)
      .await?
      .ok_or(InkError::BlogNotFound { blog_id })?;

    if tx.find_user(blog.user).await?.is_none() {
      error!(owner_id = %blog.user, "Blog points at a missing owner, refusing to delete.");
      return Err(InkError::OrphanedReference {
        blog_id,
        owner_id: blog.user,
      });
    }

    if !tx.pull_blog_ref(blog.user, blog_id).await? {
      warn!(owner_id = %blog.user, "Owner did not list the blog being deleted.");
    }

    tx.commit().await?;
    info!(owner_id = %blog.user, "Blog deleted and unlinked from owner.");
    Ok(())
  }

  /// Overwrites title, content and image. No relationship bookkeeping involved.
  #[instrument(name = "relations::update_blog_fields", skip(self, patch), err(Display))]
  pub async fn update_blog_fields(&self, blog_id: Uuid, patch: BlogPatch) -> InkResult<Blog> {
    patch.validate()?;
    self
      .store
      .update_blog(blog_id, &patch)
      .await?
      .ok_or(InkError::BlogNotFound { blog_id })
  }

  /// Resolves a user and every blog in its `blogs` list, in list order.
  #[instrument(name = "relations::fetch_owner_with_blogs", skip(self), err(Display))]
  pub async fn fetch_owner_with_blogs(&self, owner_id: Uuid) -> InkResult<UserWithBlogs> {
    let owner = self
      .store
      .find_user(owner_id)
      .await?
      .ok_or(InkError::OwnerNotFound { user_id: owner_id })?;

    let mut by_id: HashMap<Uuid, Blog> = self
      .store
      .find_blogs(&owner.blogs)
      .await?
      .into_iter()
      .map(|blog| (blog.id, blog))
      .collect();

    let mut blogs = Vec::with_capacity(owner.blogs.len());
    for id in &owner.blogs {
      match by_id.remove(id) {
        Some(blog) => blogs.push(blog),
        None => warn!(blog_id = %id, "Owner lists a blog that does not exist, skipping."),
      }
    }

    Ok(UserWithBlogs::new(owner, blogs))
  }

  /// Every blog with its owner populated.
  #[instrument(name = "relations::list_blogs_with_owners", skip(self), err(Display))]
  pub async fn list_blogs_with_owners(&self) -> InkResult<Vec<BlogWithOwner>> {
    let blogs = self.store.list_blogs().await?;
    if blogs.is_empty() {
      return Err(InkError::NoRecords("blogs"));
    }

    let mut owner_ids: Vec<Uuid> = blogs.iter().map(|b| b.user).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();
    let owners: HashMap<Uuid, _> = self
      .store
      .find_users(&owner_ids)
      .await?
      .into_iter()
      .map(|user| (user.id, user))
      .collect();

    let mut populated = Vec::with_capacity(blogs.len());
    for blog in blogs {
      match owners.get(&blog.user) {
        Some(owner) => populated.push(BlogWithOwner::new(blog, owner.clone())),
        None => warn!(blog_id = %blog.id, owner_id = %blog.user, "Blog owner missing, leaving it out."),
      }
    }
    Ok(populated)
  }

  #[instrument(name = "relations::get_blog", skip(self), err(Display))]
  pub async fn get_blog(&self, blog_id: Uuid) -> InkResult<Blog> {
    self
      .store
      .find_blog(blog_id)
      .await?
      .ok_or(InkError::BlogNotFound { blog_id })
  }
}
