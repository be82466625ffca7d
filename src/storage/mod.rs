//! Storage backend implementations and abstractions.
//!
//! Provides pluggable record storage behind the `PokemonStore` trait, with
//! DynamoDB as the configured backend and an in-memory implementation for
//! tests and local embedding.

pub mod dynamodb;
pub mod memory;
pub mod traits;

pub use traits::{PokemonStore, StorageError};

use crate::config::StorageConfig;
use crate::error::{AppError, ConfigError};
use dynamodb::DynamoStorage;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Selector value for the one backend the provider currently supports.
pub const DYNAMODB_BACKEND: &str = "dynamodb";

/// Resolves the configured storage backend exactly once per process.
///
/// Constructed in `main` and passed to whoever needs storage; there is no
/// global instance. The first `get_storage` call builds the backend, every
/// later call returns the cached handle. Concurrent first calls are safe:
/// the cell guarantees a single construction and hands every waiter the
/// same instance. A failed construction caches nothing, so the next call
/// retries from scratch.
pub struct StorageProvider {
    config: StorageConfig,
    store: OnceCell<Arc<dyn PokemonStore>>,
}

impl StorageProvider {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }

    /// Return the process-wide storage handle, building it on first use.
    ///
    /// Fails with `ConfigError::UnsupportedBackend` when the selector names
    /// anything but the supported backend (no silent fallback), and with
    /// `ConfigError::MissingField` when the table name is absent. Both must
    /// abort startup in the caller.
    pub async fn get_storage(&self) -> Result<Arc<dyn PokemonStore>, AppError> {
        let store = self
            .store
            .get_or_try_init(|| self.build_backend())
            .await?;
        Ok(Arc::clone(store))
    }

    async fn build_backend(&self) -> Result<Arc<dyn PokemonStore>, AppError> {
        let selector = self.config.backend.trim();

        // An absent selector means the default backend; anything else must
        // match it exactly (case aside) or configuration is broken.
        if !selector.is_empty() && !selector.eq_ignore_ascii_case(DYNAMODB_BACKEND) {
            return Err(ConfigError::UnsupportedBackend(selector.to_string()).into());
        }

        let table = self
            .config
            .table
            .clone()
            .ok_or_else(|| ConfigError::MissingField("DYNAMODB_TABLE".to_string()))?;

        info!(table, "initializing dynamodb storage backend");
        let store = DynamoStorage::new(table, self.config.region.clone()).await;
        Ok(Arc::new(store))
    }
}
