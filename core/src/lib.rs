// src/lib.rs

//! inkpost: the domain core of a small blogging backend.
//!
//! Users and blogs are stored in two collections that point at each other:
//!  - every blog names exactly one owning user,
//!  - every user carries the ordered list of ids of the blogs it owns.
//!
//! [`RelationshipManager`] is the only code allowed to change both sides, and
//! it does so inside a [`StoreTx`] so the two never disagree across requests.
//! [`AccountService`] covers sign-up and sign-in.
//!
//! Storage is pluggable through the [`Store`] port; [`MemoryStore`] ships here,
//! the PostgreSQL adapter lives in the server crate.

pub mod accounts;
pub mod error;
pub mod model;
pub mod password;
pub mod relations;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::accounts::AccountService;
pub use crate::error::{ErrorKind, InkError, InkResult};
pub use crate::model::{
  Blog, BlogPatch, BlogWithOwner, Credentials, NewBlog, NewUser, NewUserRecord, User, UserWithBlogs,
};
pub use crate::password::{HashingParams, PasswordHasherService};
pub use crate::relations::RelationshipManager;
pub use crate::store::{MemoryStore, Store, StoreTx};
