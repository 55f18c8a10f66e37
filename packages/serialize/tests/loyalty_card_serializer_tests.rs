// ABOUTME: Integration tests for the loyalty card wire serializer
// ABOUTME: Round trips, strict key validation and the barcode_id simplification

use catima_core::{Balance, BarcodeFormat, LoyaltyCard, RGBColor};
use catima_serialize::{card_serializer, Model, SerializeError, SerializedData, CARD_FIELDS};
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

fn full_card() -> LoyaltyCard {
    LoyaltyCard {
        uuid: Uuid::parse_str("5b7c1a9e-3f0d-4c2a-9e8b-1d2f3a4b5c6d").unwrap(),
        store: "Corner Bakery".to_string(),
        note: "Ask for the stamp".to_string(),
        expiracy: NaiveDate::from_ymd_opt(2031, 12, 31).unwrap(),
        balance: Balance::from_cents(1250).unwrap(),
        balance_currency: "EUR".to_string(),
        card_id: "4006381333931".to_string(),
        barcode_id_raw: Some("ALT-4006381".to_string()),
        barcode_type: BarcodeFormat::Ean13,
        header_color_raw: 0x1A2B3C,
        star_status: true,
        archive_status: false,
        last_used: Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap(),
        zoom_level: 75,
        revision_id: 7,
    }
}

fn attributes_of(card: &LoyaltyCard) -> SerializedData {
    CARD_FIELDS
        .iter()
        .map(|field| (field.to_string(), card.attribute(field).unwrap()))
        .collect()
}

#[test]
fn test_serialize_wire_shape() {
    let wire = card_serializer().serialize(&full_card()).unwrap();

    assert_eq!(
        Value::Object(wire),
        json!({
            "uuid": "5b7c1a9e-3f0d-4c2a-9e8b-1d2f3a4b5c6d",
            "store": "Corner Bakery",
            "note": "Ask for the stamp",
            "expiracy": "2031-12-31",
            "balance": "12.50",
            "balance_currency": "EUR",
            "card_id": "4006381333931",
            "barcode_id": "ALT-4006381",
            "barcode_type": "EAN13",
            "header_color": "#1A2B3C",
            "star_status": true,
            "archive_status": false,
            "last_used": "2024-03-15T08:30:00Z",
            "zoom_level": 75,
            "revision_id": 7,
        })
    );
}

#[test]
fn test_round_trip_reconstructs_attributes() {
    let card = full_card();
    let serializer = card_serializer();

    let wire = serializer.serialize(&card).unwrap();
    let attrs = serializer.unserialize_to_attributes(wire).unwrap();

    assert_eq!(attrs, attributes_of(&card));
}

#[test]
fn test_round_trip_to_new_record() {
    let card = full_card();
    let serializer = card_serializer();

    let wire = serializer.serialize(&card).unwrap();
    let restored = serializer.unserialize_to_new(wire).unwrap();

    assert_eq!(restored, card);
}

#[test]
fn test_redundant_barcode_id_is_blanked_one_way() {
    let mut card = full_card();
    card.barcode_id_raw = None;
    let serializer = card_serializer();

    let wire = serializer.serialize(&card).unwrap();
    assert_eq!(wire["barcode_id"], json!(""));

    let attrs = serializer.unserialize_to_attributes(wire.clone()).unwrap();
    assert_eq!(attrs["barcode_id"], json!(""));

    // The record resolves the blank value back to card_id
    let restored = serializer.unserialize_to_new(wire).unwrap();
    assert_eq!(restored.barcode_id_raw, None);
    assert_eq!(restored.barcode_id(), card.card_id);
    assert_eq!(restored, card);
}

#[test]
fn test_raw_barcode_equal_to_card_id_is_also_blanked() {
    let mut card = full_card();
    card.barcode_id_raw = Some(card.card_id.clone());

    let wire = card_serializer().serialize(&card).unwrap();
    assert_eq!(wire["barcode_id"], json!(""));
}

#[test]
fn test_unserialize_accepts_lowercase_color() {
    let mut wire = card_serializer().serialize(&full_card()).unwrap();
    wire.insert("header_color".to_string(), json!("#ffffff"));

    let card = card_serializer().unserialize_to_new(wire).unwrap();
    assert_eq!(card.header_color(), RGBColor::new(255, 255, 255));
    assert_eq!(card.header_color_raw, 0xFFFFFF);
}

#[rstest]
#[case("uuid")]
#[case("barcode_id")]
#[case("revision_id")]
fn test_missing_key_is_named(#[case] key: &str) {
    let mut wire = card_serializer().serialize(&full_card()).unwrap();
    wire.remove(key);

    let err = card_serializer().unserialize_to_attributes(wire).unwrap_err();
    assert_eq!(
        err,
        SerializeError::BadSerializedValue {
            model: "LoyaltyCard",
            extra: vec![],
            missing: vec![key.to_string()],
        }
    );
    assert!(err.to_string().contains(key));
    assert!(err.to_string().contains("LoyaltyCard"));
}

#[test]
fn test_extra_key_is_named() {
    let mut wire = card_serializer().serialize(&full_card()).unwrap();
    wire.insert("owner".to_string(), json!(1));

    let err = card_serializer().unserialize_to_new(wire).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Bad keys for LoyaltyCard: got extra keys owner."
    );
}

#[test]
fn test_extra_and_missing_keys_together() {
    let mut wire = card_serializer().serialize(&full_card()).unwrap();
    wire.remove("header_color");
    wire.insert("color".to_string(), json!("#000000"));

    let err = card_serializer().unserialize_to_attributes(wire).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Bad keys for LoyaltyCard: got extra keys color, got missing keys header_color."
    );
}

#[rstest]
#[case("header_color", json!("1a2b3c"))]
#[case("expiracy", json!("31/12/2031"))]
#[case("barcode_type", json!("QR"))]
#[case("balance", json!("12.345"))]
#[case("zoom_level", json!(-1))]
#[case("balance_currency", json!("EURO"))]
#[case("uuid", json!("not-a-uuid"))]
fn test_invalid_values_abort_conversion(#[case] key: &str, #[case] value: Value) {
    let mut wire = card_serializer().serialize(&full_card()).unwrap();
    wire.insert(key.to_string(), value);

    let err = card_serializer().unserialize_to_new(wire).unwrap_err();
    match err {
        SerializeError::InvalidValue { field, .. } => assert_eq!(field, key),
        SerializeError::Color(_) => assert_eq!(key, "header_color"),
        other => panic!("unexpected error: {other:?}"),
    }
}
