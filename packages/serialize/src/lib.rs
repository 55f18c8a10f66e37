// ABOUTME: Conversion of typed records to and from the flat wire format
// ABOUTME: Generic field-list serializer plus the loyalty card instantiation

pub mod error;
pub mod loyalty_card;
pub mod serializer;

pub use error::SerializeError;
pub use loyalty_card::{card_serializer, CARD_FIELDS};
pub use serializer::{FieldFn, Model, PostFn, SerializedData, Serializer, SerializerBuilder};
