// ABOUTME: Wire serializer for loyalty cards
// ABOUTME: Exposes header_color as #RRGGBB and blanks barcode_id when it repeats card_id

use std::sync::OnceLock;

use catima_core::{Balance, BarcodeFormat, CardError, LoyaltyCard, RGBColor};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::SerializeError;
use crate::serializer::{Model, SerializedData, Serializer};

/// All the fields of a card, as they appear on the wire
pub const CARD_FIELDS: [&str; 15] = [
    "uuid",
    "store",
    "note",
    "expiracy",
    "balance",
    "balance_currency",
    "card_id",
    "barcode_id",
    "barcode_type",
    "header_color",
    "star_status",
    "archive_status",
    "last_used",
    "zoom_level",
    "revision_id",
];

impl Model for LoyaltyCard {
    const NAME: &'static str = "LoyaltyCard";

    fn attribute(&self, field: &str) -> Result<Value, SerializeError> {
        let value = match field {
            "uuid" => json!(self.uuid.to_string()),
            "store" => json!(self.store),
            "note" => json!(self.note),
            "expiracy" => to_value(field, &self.expiracy)?,
            "balance" => to_value(field, &self.balance)?,
            "balance_currency" => json!(self.balance_currency),
            "card_id" => json!(self.card_id),
            "barcode_id" => json!(self.barcode_id()),
            "barcode_type" => json!(self.barcode_type.code()),
            "header_color" => to_value(field, &self.header_color())?,
            "star_status" => json!(self.star_status),
            "archive_status" => json!(self.archive_status),
            "last_used" => to_value(field, &self.last_used)?,
            "zoom_level" => json!(self.zoom_level),
            "revision_id" => json!(self.revision_id),
            other => {
                return Err(SerializeError::UnknownField {
                    model: Self::NAME,
                    field: other.to_string(),
                })
            }
        };
        Ok(value)
    }

    fn from_attributes(mut attrs: SerializedData) -> Result<Self, SerializeError> {
        let card_id: String = take(&mut attrs, "card_id")?;
        let barcode_id: String = take(&mut attrs, "barcode_id")?;
        let header_color: RGBColor = take(&mut attrs, "header_color")?;

        let mut card = LoyaltyCard {
            uuid: take::<Uuid>(&mut attrs, "uuid")?,
            store: take(&mut attrs, "store")?,
            note: take(&mut attrs, "note")?,
            expiracy: take::<NaiveDate>(&mut attrs, "expiracy")?,
            balance: take::<Balance>(&mut attrs, "balance")?,
            balance_currency: take(&mut attrs, "balance_currency")?,
            card_id,
            barcode_id_raw: None,
            barcode_type: take::<BarcodeFormat>(&mut attrs, "barcode_type")?,
            header_color_raw: 0,
            star_status: take(&mut attrs, "star_status")?,
            archive_status: take(&mut attrs, "archive_status")?,
            last_used: take::<DateTime<Utc>>(&mut attrs, "last_used")?,
            zoom_level: take(&mut attrs, "zoom_level")?,
            revision_id: take(&mut attrs, "revision_id")?,
        };
        card.set_barcode_id(barcode_id);
        card.set_header_color(header_color);

        card.validate().map_err(|err| {
            let field = match &err {
                CardError::StoreTooLong => "store",
                CardError::InvalidCurrency(_) => "balance_currency",
                CardError::HeaderColorOutOfRange(_) => "header_color",
                CardError::UnknownBarcodeFormat(_) => "barcode_type",
            };
            SerializeError::invalid_value(field, err)
        })?;

        Ok(card)
    }
}

fn to_value<T: serde::Serialize>(field: &str, value: &T) -> Result<Value, SerializeError> {
    serde_json::to_value(value).map_err(|e| SerializeError::invalid_value(field, e))
}

fn take<T: DeserializeOwned>(attrs: &mut SerializedData, field: &str) -> Result<T, SerializeError> {
    let value = attrs
        .remove(field)
        .ok_or_else(|| SerializeError::invalid_value(field, "attribute is missing"))?;
    serde_json::from_value(value).map_err(|e| SerializeError::invalid_value(field, e))
}

fn serialize_header_color(value: Value) -> Result<Value, SerializeError> {
    let color: RGBColor = serde_json::from_value(value)
        .map_err(|e| SerializeError::invalid_value("header_color", e))?;
    Ok(json!(color.to_hex()))
}

fn unserialize_header_color(value: Value) -> Result<Value, SerializeError> {
    let hex = value
        .as_str()
        .ok_or_else(|| SerializeError::invalid_value("header_color", "expected a #RRGGBB string"))?;
    let color = RGBColor::from_hex(hex)?;
    to_value("header_color", &color)
}

fn drop_redundant_barcode_id(mut serialized: SerializedData) -> Result<SerializedData, SerializeError> {
    if serialized.get("barcode_id") == serialized.get("card_id") {
        serialized.insert("barcode_id".to_string(), json!(""));
    }
    Ok(serialized)
}

fn build_card_serializer() -> Result<Serializer<LoyaltyCard>, SerializeError> {
    Serializer::builder(&CARD_FIELDS)
        .field_codec("header_color", serialize_header_color, unserialize_header_color)
        .post_serialize(drop_redundant_barcode_id)
        .build()
}

/// Shared serializer for [`LoyaltyCard`]
pub fn card_serializer() -> &'static Serializer<LoyaltyCard> {
    static SERIALIZER: OnceLock<Serializer<LoyaltyCard>> = OnceLock::new();
    SERIALIZER.get_or_init(|| {
        build_card_serializer().expect("card field list and codecs are consistent")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_serializer_builds() {
        let serializer = build_card_serializer().unwrap();
        assert_eq!(serializer.fields(), &CARD_FIELDS);
    }

    #[test]
    fn test_header_color_codec() {
        let internal = to_value("header_color", &RGBColor::new(0xAB, 0x01, 0xFF)).unwrap();
        let wire = serialize_header_color(internal.clone()).unwrap();
        assert_eq!(wire, json!("#AB01FF"));
        assert_eq!(unserialize_header_color(json!("#ab01ff")).unwrap(), internal);
    }

    #[test]
    fn test_header_color_codec_rejects_bad_input() {
        assert!(matches!(
            unserialize_header_color(json!("ab01ff")),
            Err(SerializeError::Color(_))
        ));
        assert!(matches!(
            unserialize_header_color(json!(0xAB01FF)),
            Err(SerializeError::InvalidValue { .. })
        ));
    }
}
