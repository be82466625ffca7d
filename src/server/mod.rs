//! HTTP serving layer: router, shared state, CORS, request metrics.

pub mod handlers;

use crate::metrics::{Metrics, Timer};
use crate::storage::PokemonStore;
use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Shared state handed to every request handler.
///
/// Holds the storage handle resolved once at startup; request handling
/// never re-runs backend resolution.
pub struct AppState {
    pub store: Arc<dyn PokemonStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn PokemonStore>) -> Self {
        Self { store }
    }
}

/// Build the service router with all routes and middleware attached.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/pokemon",
            get(handlers::list_pokemon).post(handlers::create_pokemon),
        )
        .route(
            "/pokemon/:id",
            get(handlers::get_pokemon)
                .put(handlers::update_pokemon)
                .delete(handlers::delete_pokemon),
        )
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Permissive CORS for browser clients: answers preflights directly and
/// stamps the allow headers onto every response.
async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(
            "Content-Type,x-api-key,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
        ),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
    );
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let timer = Timer::new();

    let response = next.run(request).await;

    let metrics = Metrics::get();
    metrics.record_request(&method, &path, timer.elapsed_seconds());
    if response.status().is_server_error() {
        metrics.record_error(response.status().as_u16());
    }

    response
}
