// ABOUTME: Card import and export in the wire format
// ABOUTME: Used by the cards subcommands to move records in and out of the database

use serde_json::Value;
use thiserror::Error;

use catima_core::LoyaltyCard;
use catima_serialize::{card_serializer, SerializeError};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a card object or an array of card objects")]
    NotAnObject,
    #[error("Card #{index}: {source}")]
    Card {
        index: usize,
        #[source]
        source: SerializeError,
    },
}

/// Parse one wire map or an array of them
///
/// Client revision IDs are not trusted; every imported card starts at 0.
pub fn parse_import(text: &str) -> Result<Vec<LoyaltyCard>, ImportError> {
    let documents = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return Err(ImportError::NotAnObject),
    };

    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            let Value::Object(data) = document else {
                return Err(ImportError::NotAnObject);
            };
            let mut card = card_serializer()
                .unserialize_to_new(data)
                .map_err(|source| ImportError::Card { index, source })?;
            card.revision_id = 0;
            Ok(card)
        })
        .collect()
}

/// Wire maps for `cards`, as a JSON array
pub fn export_cards(cards: &[LoyaltyCard]) -> Result<Value, SerializeError> {
    cards
        .iter()
        .map(|card| card_serializer().serialize(card).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
