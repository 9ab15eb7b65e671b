// inkpost/examples/blog_lifecycle.rs

use inkpost::{
  AccountService, HashingParams, InkResult, MemoryStore, NewBlog, NewUser, PasswordHasherService,
  RelationshipManager, Store,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> InkResult<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Blog Lifecycle Example ---");

  let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
  let accounts = AccountService::new(store.clone(), PasswordHasherService::new(HashingParams::default())?);
  let relations = RelationshipManager::new(store);

  // 1. Sign up an author
  let author = accounts
    .sign_up(NewUser {
      name: "A".to_string(),
      email: "a@x.com".to_string(),
      password: "abcdef".to_string(),
    })
    .await?;
  info!(user_id = %author.id, "Signed up");

  // 2. Publish a blog; the author's list now references it
  let blog = relations
    .create_blog_with_owner(NewBlog {
      title: "T".to_string(),
      content: "C".to_string(),
      image: "I".to_string(),
      user: author.id,
    })
    .await?;
  let populated = relations.fetch_owner_with_blogs(author.id).await?;
  info!(blog_id = %blog.id, listed = populated.blogs.len(), "Published");

  // 3. Delete it; the reference goes with it
  relations.delete_blog_and_unlink(blog.id).await?;
  let populated = relations.fetch_owner_with_blogs(author.id).await?;
  info!(listed = populated.blogs.len(), "Deleted");

  Ok(())
}
