// ABOUTME: HTTP API layer for Catima Sync providing the card sync endpoints
// ABOUTME: Router construction, shared state, and the token authentication gate

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use catima_security::TokenAuthenticator;
use catima_storage::CardStorage;

pub mod auth;
pub mod cards_handlers;
pub mod error;

pub use auth::{AuthenticatedToken, TOKEN_SECRET_HEADER, TOKEN_USERNAME_HEADER};
pub use error::ApiError;

/// State shared by every request
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<TokenAuthenticator>,
    pub cards: Arc<CardStorage>,
}

/// Creates the card sync API router
///
/// All routes under `/api/v1` require token authentication, including the
/// 405 responses for unsupported methods.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/cards/", get(cards_handlers::list_cards))
        .route("/card/{uuid}/", get(cards_handlers::get_card))
        .method_not_allowed_fallback(error::method_not_allowed)
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::token_auth_middleware,
        ))
}

/// Creates the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_api_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
