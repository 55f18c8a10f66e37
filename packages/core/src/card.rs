// ABOUTME: Loyalty card record and the supported barcode symbologies
// ABOUTME: Owns the barcode-id fallback and the packed header color accessors

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use crate::balance::Balance;
use crate::color::{RGBColor, MAX_PACKED};

/// Maximum length of a store name
pub const STORE_MAX_LENGTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("Store name must be at most {max} characters", max = STORE_MAX_LENGTH)]
    StoreTooLong,

    #[error("Invalid currency code {0:?}: expected a 3-letter ISO 4217 code")]
    InvalidCurrency(String),

    #[error("Header color {0:#X} is out of range")]
    HeaderColorOutOfRange(u32),

    #[error("Unknown barcode format: {0}")]
    UnknownBarcodeFormat(String),
}

/// Enumeration of the supported barcode formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarcodeFormat {
    Aztec,
    Code39,
    Code93,
    Code128,
    Codabar,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    Pdf417,
    QrCode,
    UpcA,
    UpcE,
}

impl BarcodeFormat {
    pub const ALL: [BarcodeFormat; 13] = [
        BarcodeFormat::Aztec,
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Code128,
        BarcodeFormat::Codabar,
        BarcodeFormat::DataMatrix,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean13,
        BarcodeFormat::Itf,
        BarcodeFormat::Pdf417,
        BarcodeFormat::QrCode,
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
    ];

    /// Code used on the wire and in the database
    pub fn code(self) -> &'static str {
        match self {
            BarcodeFormat::Aztec => "AZTEC",
            BarcodeFormat::Code39 => "C39",
            BarcodeFormat::Code93 => "C93",
            BarcodeFormat::Code128 => "C128",
            BarcodeFormat::Codabar => "CODABAR",
            BarcodeFormat::DataMatrix => "DM",
            BarcodeFormat::Ean8 => "EAN8",
            BarcodeFormat::Ean13 => "EAN13",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::Pdf417 => "PDF417",
            BarcodeFormat::QrCode => "QRCODE",
            BarcodeFormat::UpcA => "UPCA",
            BarcodeFormat::UpcE => "UPCE",
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            BarcodeFormat::Aztec => "Aztec",
            BarcodeFormat::Code39 => "Code 39",
            BarcodeFormat::Code93 => "Code 93",
            BarcodeFormat::Code128 => "Code 128",
            BarcodeFormat::Codabar => "Codabar",
            BarcodeFormat::DataMatrix => "Data Matrix",
            BarcodeFormat::Ean8 => "EAN 8",
            BarcodeFormat::Ean13 => "EAN 13",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::Pdf417 => "PDF 417",
            BarcodeFormat::QrCode => "QR Code",
            BarcodeFormat::UpcA => "UPC A",
            BarcodeFormat::UpcE => "UPC E",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BarcodeFormat {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BarcodeFormat::ALL
            .into_iter()
            .find(|format| format.code() == s)
            .ok_or_else(|| CardError::UnknownBarcodeFormat(s.to_string()))
    }
}

impl Serialize for BarcodeFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for BarcodeFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// A loyalty card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoyaltyCard {
    pub uuid: Uuid,
    pub store: String,
    pub note: String,
    pub expiracy: NaiveDate,
    pub balance: Balance,
    /// Currency 3-letter symbol, ISO 4217
    pub balance_currency: String,
    pub card_id: String,
    /// Leave unset to reuse the card ID
    pub barcode_id_raw: Option<String>,
    pub barcode_type: BarcodeFormat,
    /// RGB color, 0xRRGGBB
    pub header_color_raw: u32,
    pub star_status: bool,
    pub archive_status: bool,
    pub last_used: DateTime<Utc>,
    pub zoom_level: u32,
    pub revision_id: u32,
}

impl LoyaltyCard {
    /// Barcode ID of this card, based on `card_id` if `barcode_id_raw` is empty
    pub fn barcode_id(&self) -> &str {
        match self.barcode_id_raw.as_deref() {
            Some(raw) if !raw.is_empty() => raw,
            _ => &self.card_id,
        }
    }

    /// Set the effective barcode ID. A value equal to `card_id`, or an empty
    /// one, clears the raw field.
    pub fn set_barcode_id(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() || value == self.card_id {
            self.barcode_id_raw = None;
        } else {
            self.barcode_id_raw = Some(value);
        }
    }

    /// Header color, backed by `header_color_raw`
    pub fn header_color(&self) -> RGBColor {
        RGBColor::from_packed(self.header_color_raw)
    }

    pub fn set_header_color(&mut self, color: RGBColor) {
        self.header_color_raw = color.to_packed();
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.store.chars().count() > STORE_MAX_LENGTH {
            return Err(CardError::StoreTooLong);
        }

        if self.balance_currency.len() != 3
            || !self.balance_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(CardError::InvalidCurrency(self.balance_currency.clone()));
        }

        if self.header_color_raw > MAX_PACKED {
            return Err(CardError::HeaderColorOutOfRange(self.header_color_raw));
        }

        Ok(())
    }
}

impl fmt::Display for LoyaltyCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<LoyaltyCard {}>", self.store)
    }
}
