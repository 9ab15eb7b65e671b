// inkpost_server/src/state.rs
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use inkpost::{AccountService, PasswordHasherService, RelationshipManager, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub relations: RelationshipManager,
  pub accounts: AccountService,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Result<Self> {
    let passwords = PasswordHasherService::new(config.hashing)
      .map_err(|e| AppError::Config(format!("Invalid ARGON2_* settings: {}", e)))?;
    Ok(Self {
      relations: RelationshipManager::new(store.clone()),
      accounts: AccountService::new(store, passwords),
      config,
    })
  }
}
