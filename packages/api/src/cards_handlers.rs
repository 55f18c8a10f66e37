// ABOUTME: HTTP request handlers for loyalty card sync
// ABOUTME: Revision listing and single card retrieval for the authenticated owner

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use catima_serialize::{card_serializer, SerializedData};

use crate::auth::AuthenticatedToken;
use crate::error::ApiError;
use crate::AppState;

/// Map each of the owner's card UUIDs to its revision ID
pub async fn list_cards(
    State(state): State<AppState>,
    Extension(token): Extension<AuthenticatedToken>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let revisions = state.cards.list_revisions(token.user_id()).await?;
    debug!(user_id = token.user_id(), count = revisions.len(), "Listing cards");

    let body = revisions
        .into_iter()
        .map(|(uuid, revision_id)| (uuid.to_string(), Value::from(revision_id)))
        .collect();
    Ok(Json(body))
}

/// Full wire form of one card
///
/// Unknown, malformed and foreign UUIDs all answer 404.
pub async fn get_card(
    State(state): State<AppState>,
    Extension(token): Extension<AuthenticatedToken>,
    Path(uuid): Path<String>,
) -> Result<Json<SerializedData>, ApiError> {
    let uuid = Uuid::parse_str(&uuid).map_err(|_| ApiError::CardNotFound)?;

    let card = state
        .cards
        .get_card(token.user_id(), uuid)
        .await?
        .ok_or(ApiError::CardNotFound)?;

    Ok(Json(card_serializer().serialize(&card)?))
}
