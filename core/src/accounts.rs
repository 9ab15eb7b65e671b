// inkpost/src/accounts.rs

//! Sign-up, sign-in and user listing.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{InkError, InkResult};
use crate::model::{Credentials, NewUser, NewUserRecord, User};
use crate::password::PasswordHasherService;
use crate::store::Store;

#[derive(Clone)]
pub struct AccountService {
  store: Arc<dyn Store>,
  passwords: PasswordHasherService,
}

impl AccountService {
  pub fn new(store: Arc<dyn Store>, passwords: PasswordHasherService) -> Self {
    Self { store, passwords }
  }

  /// Registers a user. Input is validated before the password is hashed.
  #[instrument(name = "accounts::sign_up", skip(self, signup), fields(email = %signup.email), err(Display))]
  pub async fn sign_up(&self, signup: NewUser) -> InkResult<User> {
    signup.validate()?;

    if self.store.find_user_by_email(&signup.email).await?.is_some() {
      warn!("Attempt to sign up with an existing email.");
      return Err(InkError::Duplicate { email: signup.email });
    }

    let password_hash = self.passwords.hash_async(signup.password).await?;
    // The store enforces uniqueness too; a concurrent sign-up that passed the
    // check above still ends in Duplicate here.
    let user = self
      .store
      .insert_user(NewUserRecord {
        name: signup.name,
        email: signup.email,
        password_hash,
      })
      .await?;

    info!(user_id = %user.id, "User signed up.");
    Ok(user)
  }

  #[instrument(name = "accounts::sign_in", skip(self, credentials), fields(email = %credentials.email), err(Display))]
  pub async fn sign_in(&self, credentials: Credentials) -> InkResult<User> {
    let user = self
      .store
      .find_user_by_email(&credentials.email)
      .await?
      .ok_or_else(|| InkError::UserNotFound {
        email: credentials.email.clone(),
      })?;

    let matches = self
      .passwords
      .verify_async(user.password_hash.clone(), credentials.password)
      .await?;
    if !matches {
      return Err(InkError::AuthFailed);
    }

    info!(user_id = %user.id, "User signed in.");
    Ok(user)
  }

  #[instrument(name = "accounts::list_users", skip(self), err(Display))]
  pub async fn list_users(&self) -> InkResult<Vec<User>> {
    let users = self.store.list_users().await?;
    if users.is_empty() {
      return Err(InkError::NoRecords("users"));
    }
    Ok(users)
  }
}
