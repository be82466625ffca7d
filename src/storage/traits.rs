use crate::model::{Pokemon, PokemonUpdate};
use async_trait::async_trait;

/// Trait for pluggable record-storage backends.
///
/// All operations are async and safe to call from concurrent tasks;
/// implementations hold no mutable state beyond their backend handle.
/// "Record does not exist" is never an error: it comes back as `None`
/// (get, update) or `false` (delete). An `Err` always means the backend
/// itself misbehaved.
#[async_trait]
pub trait PokemonStore: Send + Sync {
    /// Persist a new record, overwriting any record with the same id.
    ///
    /// Field constraints are the caller's problem; this layer performs no
    /// uniqueness check and last write wins. Returns the stored record
    /// unchanged.
    async fn create(&self, pokemon: Pokemon) -> Result<Pokemon, StorageError>;

    /// Point lookup by primary key. Returns `None` if no record exists.
    async fn get(&self, id: u32) -> Result<Option<Pokemon>, StorageError>;

    /// Return every stored record in unspecified order.
    ///
    /// This is a full-table scan, O(n) in table size with no pagination
    /// of the result. Acceptable at this service's scale; known limitation
    /// beyond it.
    async fn list_all(&self) -> Result<Vec<Pokemon>, StorageError>;

    /// Merge the fields present in `update` into the existing record,
    /// leaving unset fields untouched.
    ///
    /// The merge is a single atomic mutation conditioned on the record
    /// existing; `None` means there was no record to update. An empty
    /// `update` behaves as a plain fetch of the current state.
    async fn update(
        &self,
        id: u32,
        update: PokemonUpdate,
    ) -> Result<Option<Pokemon>, StorageError>;

    /// Remove the record. Returns `true` only if a record existed and was
    /// removed; `false` if there was nothing to delete.
    async fn delete(&self, id: u32) -> Result<bool, StorageError>;
}

/// Errors that can occur during storage operations.
///
/// These are backend faults (communication, permissions, backend-internal
/// failures). A missing record is not a fault and never shows up here.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage operation failed: {0}")]
    OperationFailed(String),

    #[error("stored item is malformed: {0}")]
    Serialization(String),
}
