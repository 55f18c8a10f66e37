// ABOUTME: Error type shared by the serializer and its field codecs
// ABOUTME: Covers unknown fields, invalid values and color codec failures

use catima_core::ColorError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializeError {
    /// The wire map's key set does not match the serializer's field list
    #[error("Bad keys for {model}: {}.", describe_keys(.extra, .missing))]
    BadSerializedValue {
        model: &'static str,
        extra: Vec<String>,
        missing: Vec<String>,
    },

    #[error("Invalid value for field {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown field {field} for {model}")]
    UnknownField { model: &'static str, field: String },

    #[error("Field {field} is listed more than once for {model}")]
    DuplicateField { model: &'static str, field: String },

    #[error(transparent)]
    Color(#[from] ColorError),
}

impl SerializeError {
    pub fn invalid_value(field: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

fn describe_keys(extra: &[String], missing: &[String]) -> String {
    let mut parts = Vec::new();
    if !extra.is_empty() {
        parts.push(format!("got extra keys {}", extra.join(", ")));
    }
    if !missing.is_empty() {
        parts.push(format!("got missing keys {}", missing.join(", ")));
    }
    parts.join(", ")
}
