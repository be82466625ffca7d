//! Record types for the pokedex service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single pokedex record.
///
/// `id` is the pokedex number and serves as the primary key in whatever
/// backend stores the record. A record carries exactly one `category` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub category: String,
}

/// Partial-update payload for an existing record.
///
/// Only fields that are present are written; everything else keeps its
/// stored value. There is deliberately no `id` field, so the primary key
/// cannot be changed through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
}

impl PokemonUpdate {
    /// True when no field is set, i.e. the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none()
    }
}

/// Field-constraint violations, checked before a record reaches storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("id must be a positive integer")]
    NonPositiveId,
}

impl Pokemon {
    /// Check field constraints. Storage adapters assume this already ran.
    ///
    /// The id must be strictly positive; `name` and `category` are free-form
    /// strings with no further constraint, empty included.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id == 0 {
            return Err(ValidationError::NonPositiveId);
        }
        Ok(())
    }
}
