// inkpost/src/password.rs

//! Password hashing and verification (Argon2id).

use anyhow::anyhow;
use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    SaltString,
  },
  Algorithm, Argon2, Params, Version,
};
use tracing::{debug, error, instrument};

use crate::error::{InkError, InkResult};

/// Argon2 cost parameters. The default is the `argon2` crate's recommended set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
  pub memory_kib: u32,
  pub iterations: u32,
  pub parallelism: u32,
}

impl Default for HashingParams {
  fn default() -> Self {
    Self {
      memory_kib: Params::DEFAULT_M_COST,
      iterations: Params::DEFAULT_T_COST,
      parallelism: Params::DEFAULT_P_COST,
    }
  }
}

impl HashingParams {
  /// Cheapest parameters Argon2 accepts. Only meant for tests.
  pub fn minimal() -> Self {
    Self {
      memory_kib: Params::MIN_M_COST.max(8 * Params::MIN_P_COST),
      iterations: Params::MIN_T_COST,
      parallelism: Params::MIN_P_COST,
    }
  }
}

#[derive(Clone)]
pub struct PasswordHasherService {
  hasher: Argon2<'static>,
}

impl PasswordHasherService {
  pub fn new(params: HashingParams) -> InkResult<Self> {
    let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
      .map_err(|e| InkError::validation(format!("Invalid Argon2 parameters: {}", e)))?;
    Ok(Self {
      hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }

  /// Hashes a plain-text password into a PHC string.
  #[instrument(name = "password::hash", skip_all, err(Display))]
  pub fn hash(&self, password: &str) -> InkResult<String> {
    if password.is_empty() {
      return Err(InkError::validation("Password cannot be empty"));
    }
    let salt = SaltString::generate(&mut OsRng);
    match self.hasher.hash_password(password.as_bytes(), &salt) {
      Ok(hash) => {
        debug!("Password hashed successfully.");
        Ok(hash.to_string())
      }
      Err(argon_err) => {
        error!(error = %argon_err, "Argon2 password hashing failed.");
        Err(InkError::persistence(anyhow!("password hashing failed: {}", argon_err)))
      }
    }
  }

  /// `Ok(false)` on mismatch. A stored hash that does not parse is an error, not a mismatch.
  #[instrument(name = "password::verify", skip_all, err(Display))]
  pub fn verify(&self, stored_hash: &str, provided: &str) -> InkResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|parse_err| {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      InkError::persistence(anyhow!("invalid stored password hash: {}", parse_err))
    })?;

    match self.hasher.verify_password(provided.as_bytes(), &parsed) {
      Ok(()) => Ok(true),
      Err(argon2::password_hash::Error::Password) => {
        debug!("Password verification failed: passwords do not match.");
        Ok(false)
      }
      Err(other) => {
        error!(error = %other, "Argon2 password verification encountered an error.");
        Err(InkError::persistence(anyhow!("password verification failed: {}", other)))
      }
    }
  }

  /// [`Self::hash`] on the blocking thread pool, so async workers keep serving requests.
  pub async fn hash_async(&self, password: String) -> InkResult<String> {
    let service = self.clone();
    tokio::task::spawn_blocking(move || service.hash(&password))
      .await
      .map_err(InkError::persistence)?
  }

  /// [`Self::verify`] on the blocking thread pool.
  pub async fn verify_async(&self, stored_hash: String, provided: String) -> InkResult<bool> {
    let service = self.clone();
    tokio::task::spawn_blocking(move || service.verify(&stored_hash, &provided))
      .await
      .map_err(InkError::persistence)?
  }
}
