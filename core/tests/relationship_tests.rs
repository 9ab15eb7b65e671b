// tests/relationship_tests.rs
mod common;
use common::*;
use inkpost::{ErrorKind, InkError, RelationshipManager, Store};
use serial_test::serial;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
#[serial]
async fn created_blog_is_listed_by_its_owner_exactly_once() {
  setup_tracing();
  let fx = fixture();
  let owner = user_a(&fx).await;

  let blog = fx.relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap();
  assert_eq!(blog.user, owner.id);

  let populated = fx.relations.fetch_owner_with_blogs(owner.id).await.unwrap();
  let hits = populated.blogs.iter().filter(|b| b.id == blog.id).count();
  assert_eq!(hits, 1);
  assert_eq!(populated.blogs[0].title, "T");
}

#[tokio::test]
#[serial]
async fn create_with_unknown_owner_fails_and_writes_nothing() {
  setup_tracing();
  let fx = fixture();
  let ghost = Uuid::new_v4();

  let err = fx.relations.create_blog_with_owner(draft(ghost, "T")).await.unwrap_err();
  match err {
    InkError::OwnerNotFound { user_id } => assert_eq!(user_id, ghost),
    other => panic!("Expected OwnerNotFound, got {:?}", other),
  }
  assert!(fx.store.list_blogs().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn create_with_blank_field_is_a_validation_error() {
  setup_tracing();
  let fx = fixture();
  let owner = user_a(&fx).await;
  let mut bad = draft(owner.id, "T");
  bad.image = String::new();

  let err = fx.relations.create_blog_with_owner(bad).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[tokio::test]
#[serial]
async fn failed_reference_write_rolls_back_the_blog() {
  setup_tracing();
  let inner = fixture();
  let owner = user_a(&inner).await;
  let flaky: Arc<dyn Store> = Arc::new(FlakyStore {
    inner: inner.store.clone(),
    fail_at: FailAt::PushRef,
  });
  let relations = RelationshipManager::new(flaky);

  let err = relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::PersistenceError);

  // No orphan: the blog insert was never committed.
  assert!(inner.store.list_blogs().await.unwrap().is_empty());
  assert!(inner.store.find_user(owner.id).await.unwrap().unwrap().blogs.is_empty());
}

#[tokio::test]
#[serial]
async fn failed_commit_leaves_no_trace() {
  setup_tracing();
  let inner = fixture();
  let owner = user_a(&inner).await;
  let relations = RelationshipManager::new(Arc::new(FlakyStore {
    inner: inner.store.clone(),
    fail_at: FailAt::Commit,
  }));

  assert!(relations.create_blog_with_owner(draft(owner.id, "T")).await.is_err());
  assert!(inner.store.list_blogs().await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn delete_unlinks_and_the_blog_is_gone() {
  setup_tracing();
  let fx = fixture();
  let owner = user_a(&fx).await;
  let keep = fx.relations.create_blog_with_owner(draft(owner.id, "keep")).await.unwrap();
  let gone = fx.relations.create_blog_with_owner(draft(owner.id, "gone")).await.unwrap();

  fx.relations.delete_blog_and_unlink(gone.id).await.unwrap();

  for user in fx.store.list_users().await.unwrap() {
    assert!(!user.blogs.contains(&gone.id));
  }
  match fx.relations.get_blog(gone.id).await.unwrap_err() {
    InkError::BlogNotFound { blog_id } => assert_eq!(blog_id, gone.id),
    other => panic!("Expected BlogNotFound, got {:?}", other),
  }
  let remaining = fx.relations.fetch_owner_with_blogs(owner.id).await.unwrap();
  assert_eq!(remaining.blogs.iter().map(|b| b.id).collect::<Vec<_>>(), vec![keep.id]);
}

#[tokio::test]
#[serial]
async fn delete_of_unknown_blog_is_not_found() {
  setup_tracing();
  let fx = fixture();
  let err = fx.relations.delete_blog_and_unlink(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, InkError::BlogNotFound { .. }));
}

#[tokio::test]
#[serial]
async fn delete_with_missing_owner_fails_and_keeps_the_blog() {
  setup_tracing();
  let fx = fixture();
  let owner = user_a(&fx).await;
  let mut dangling = fx.relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap();
  // Re-point a copy of the blog at a user that never existed.
  dangling.id = Uuid::new_v4();
  dangling.user = Uuid::new_v4();
  fx.store.insert_blog_unlinked(dangling.clone());

  let err = fx.relations.delete_blog_and_unlink(dangling.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::OrphanedReference);
  assert!(fx.relations.get_blog(dangling.id).await.is_ok());
}

#[tokio::test]
#[serial]
async fn delete_of_an_unlisted_blog_still_succeeds() {
  setup_tracing();
  let fx = fixture();
  let owner = user_a(&fx).await;
  let blog = fx.relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap();
  assert!(fx.store.overwrite_blog_refs(owner.id, Vec::new()));

  fx.relations.delete_blog_and_unlink(blog.id).await.unwrap();
  assert!(fx.relations.get_blog(blog.id).await.is_err());
}

#[tokio::test]
#[serial]
async fn failed_unlink_rolls_back_the_delete() {
  setup_tracing();
  let inner = fixture();
  let owner = user_a(&inner).await;
  let blog = inner.relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap();
  let relations = RelationshipManager::new(Arc::new(FlakyStore {
    inner: inner.store.clone(),
    fail_at: FailAt::PullRef,
  }));

  assert!(relations.delete_blog_and_unlink(blog.id).await.is_err());
  assert!(inner.relations.get_blog(blog.id).await.is_ok());
  assert_eq!(inner.store.find_user(owner.id).await.unwrap().unwrap().blogs, vec![blog.id]);
}

#[tokio::test]
#[serial]
async fn update_is_idempotent() {
  setup_tracing();
  let fx = fixture();
  let owner = user_a(&fx).await;
  let blog = fx.relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap();

  let first = fx.relations.update_blog_fields(blog.id, patch("T2", "C2", "I2")).await.unwrap();
  let second = fx.relations.update_blog_fields(blog.id, patch("T2", "C2", "I2")).await.unwrap();

  assert_eq!(
    (first.id, &first.title, &first.content, &first.image),
    (second.id, &second.title, &second.content, &second.image)
  );
  let stored = fx.relations.get_blog(blog.id).await.unwrap();
  assert_eq!(stored.title, "T2");
  assert_eq!(stored.user, owner.id);
}

#[tokio::test]
#[serial]
async fn update_of_unknown_blog_is_not_found() {
  setup_tracing();
  let fx = fixture();
  let err = fx.relations.update_blog_fields(Uuid::new_v4(), patch("T", "C", "I")).await.unwrap_err();
  assert!(matches!(err, InkError::BlogNotFound { .. }));
}

#[tokio::test]
#[serial]
async fn fetch_owner_skips_dangling_references() {
  setup_tracing();
  let fx = fixture();
  let owner = user_a(&fx).await;
  let blog = fx.relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap();
  assert!(fx.store.overwrite_blog_refs(owner.id, vec![Uuid::new_v4(), blog.id]));

  let populated = fx.relations.fetch_owner_with_blogs(owner.id).await.unwrap();
  assert_eq!(populated.blogs.len(), 1);
  assert_eq!(populated.blogs[0].id, blog.id);
}

#[tokio::test]
#[serial]
async fn fetch_unknown_owner_is_owner_not_found() {
  setup_tracing();
  let fx = fixture();
  let err = fx.relations.fetch_owner_with_blogs(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, InkError::OwnerNotFound { .. }));
}

#[tokio::test]
#[serial]
async fn listing_populates_owners_and_reports_empty() {
  setup_tracing();
  let fx = fixture();
  assert!(matches!(
    fx.relations.list_blogs_with_owners().await.unwrap_err(),
    InkError::NoRecords("blogs")
  ));

  let owner = user_a(&fx).await;
  fx.relations.create_blog_with_owner(draft(owner.id, "T")).await.unwrap();
  let listed = fx.relations.list_blogs_with_owners().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].user.email, "a@x.com");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_creates_for_one_owner_lose_no_ids() {
  setup_tracing();
  let fx = fixture();
  let owner_id = user_a(&fx).await.id;

  let mut tasks = Vec::new();
  for i in 0..16 {
    let relations = fx.relations.clone();
    let title = format!("post {}", i);
    tasks.push(tokio::spawn(async move {
      relations.create_blog_with_owner(draft(owner_id, &title)).await
    }));
  }
  let mut created = Vec::new();
  for task in tasks {
    created.push(task.await.unwrap().unwrap().id);
  }

  let refs = fx.store.find_user(owner_id).await.unwrap().unwrap().blogs;
  assert_eq!(refs.len(), created.len());
  for id in created {
    assert_eq!(refs.iter().filter(|r| **r == id).count(), 1);
  }
}

#[tokio::test]
#[serial]
async fn end_to_end_scenario() {
  setup_tracing();
  let fx = fixture();
  let a = fx.accounts.sign_up(signup("A", "a@x.com", "abcdef")).await.unwrap();

  let blog = fx.relations.create_blog_with_owner(draft(a.id, "T")).await.unwrap();
  assert_eq!(fx.relations.fetch_owner_with_blogs(a.id).await.unwrap().blogs.len(), 1);

  fx.relations.delete_blog_and_unlink(blog.id).await.unwrap();
  assert!(fx.relations.fetch_owner_with_blogs(a.id).await.unwrap().blogs.is_empty());
  assert!(matches!(
    fx.relations.get_blog(blog.id).await.unwrap_err(),
    InkError::BlogNotFound { .. }
  ));
}
