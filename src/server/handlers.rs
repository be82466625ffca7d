//! Endpoint handlers and the storage-to-HTTP error mapping.

use super::AppState;
use crate::model::{Pokemon, PokemonUpdate, ValidationError};
use crate::storage::StorageError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

/// Errors a handler can surface to the client.
///
/// A missing record is 404, bad input is 400 with detail, and a backend
/// fault is a generic 500 so internals never leak into responses.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    NotFound,
    Storage(StorageError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, format!("invalid input: {err}")),
            Self::NotFound => (StatusCode::NOT_FOUND, "pokemon not found".to_string()),
            Self::Storage(err) => {
                error!("storage fault while handling request: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub async fn create_pokemon(
    State(state): State<Arc<AppState>>,
    Json(pokemon): Json<Pokemon>,
) -> Result<(StatusCode, Json<Pokemon>), ApiError> {
    pokemon.validate()?;
    let created = state.store.create(pokemon).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_pokemon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Pokemon>, ApiError> {
    match state.store.get(id).await? {
        Some(pokemon) => Ok(Json(pokemon)),
        None => Err(ApiError::NotFound),
    }
}

pub async fn list_pokemon(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Pokemon>>, ApiError> {
    Ok(Json(state.store.list_all().await?))
}

pub async fn update_pokemon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(update): Json<PokemonUpdate>,
) -> Result<Json<Pokemon>, ApiError> {
    match state.store.update(id, update).await? {
        Some(pokemon) => Ok(Json(pokemon)),
        None => Err(ApiError::NotFound),
    }
}

pub async fn delete_pokemon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
