// ABOUTME: Field-list driven serializer between a record and a string-keyed map
// ABOUTME: Per-field codecs and whole-map hooks are registered explicitly at build time

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::error::SerializeError;

/// Flat wire representation of a record
pub type SerializedData = Map<String, Value>;

/// Per-field transform, applied to a single value
pub type FieldFn = Box<dyn Fn(Value) -> Result<Value, SerializeError> + Send + Sync>;

/// Whole-map transform, applied after the per-field pass
pub type PostFn = Box<dyn Fn(SerializedData) -> Result<SerializedData, SerializeError> + Send + Sync>;

/// A record type that can be driven by a [`Serializer`]
pub trait Model: Sized {
    /// Name used in error messages
    const NAME: &'static str;

    /// Read a single attribute by field name
    fn attribute(&self, field: &str) -> Result<Value, SerializeError>;

    /// Build a new, unsaved record from a complete attribute map
    fn from_attributes(attrs: SerializedData) -> Result<Self, SerializeError>;
}

struct FieldCodec {
    serialize: FieldFn,
    unserialize: FieldFn,
}

pub struct SerializerBuilder<M> {
    fields: Vec<&'static str>,
    codecs: Vec<(&'static str, FieldCodec)>,
    post_serialize: Option<PostFn>,
    post_unserialize: Option<PostFn>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> SerializerBuilder<M> {
    /// Register the transforms for one field. Fields without a codec are
    /// passed through unchanged.
    pub fn field_codec<S, U>(mut self, field: &'static str, serialize: S, unserialize: U) -> Self
    where
        S: Fn(Value) -> Result<Value, SerializeError> + Send + Sync + 'static,
        U: Fn(Value) -> Result<Value, SerializeError> + Send + Sync + 'static,
    {
        self.codecs.push((
            field,
            FieldCodec {
                serialize: Box::new(serialize),
                unserialize: Box::new(unserialize),
            },
        ));
        self
    }

    /// Applied after `serialize`, if some adjustments are required
    pub fn post_serialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(SerializedData) -> Result<SerializedData, SerializeError> + Send + Sync + 'static,
    {
        self.post_serialize = Some(Box::new(hook));
        self
    }

    /// Applied at the end of `unserialize_to_attributes`
    pub fn post_unserialize<F>(mut self, hook: F) -> Self
    where
        F: Fn(SerializedData) -> Result<SerializedData, SerializeError> + Send + Sync + 'static,
    {
        self.post_unserialize = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Result<Serializer<M>, SerializeError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(*field) {
                return Err(SerializeError::DuplicateField {
                    model: M::NAME,
                    field: field.to_string(),
                });
            }
        }

        let mut codecs = HashMap::new();
        for (field, codec) in self.codecs {
            if !seen.contains(field) {
                return Err(SerializeError::UnknownField {
                    model: M::NAME,
                    field: field.to_string(),
                });
            }
            if codecs.insert(field, codec).is_some() {
                return Err(SerializeError::DuplicateField {
                    model: M::NAME,
                    field: field.to_string(),
                });
            }
        }

        Ok(Serializer {
            fields: self.fields,
            codecs,
            post_serialize: self.post_serialize,
            post_unserialize: self.post_unserialize,
            _model: PhantomData,
        })
    }
}

/// Converts records of type `M` to and from [`SerializedData`]
pub struct Serializer<M> {
    fields: Vec<&'static str>,
    codecs: HashMap<&'static str, FieldCodec>,
    post_serialize: Option<PostFn>,
    post_unserialize: Option<PostFn>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Serializer<M> {
    pub fn builder(fields: &[&'static str]) -> SerializerBuilder<M> {
        SerializerBuilder {
            fields: fields.to_vec(),
            codecs: Vec::new(),
            post_serialize: None,
            post_unserialize: None,
            _model: PhantomData,
        }
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Serialize the record to a map
    pub fn serialize(&self, entry: &M) -> Result<SerializedData, SerializeError> {
        let mut out = SerializedData::new();
        for field in &self.fields {
            let value = entry.attribute(field)?;
            let value = match self.codecs.get(field) {
                Some(codec) => (codec.serialize)(value)?,
                None => value,
            };
            out.insert(field.to_string(), value);
        }

        match &self.post_serialize {
            Some(hook) => hook(out),
            None => Ok(out),
        }
    }

    /// Convert a wire map to a map of attributes, ready to be fed to the
    /// model. The key set must match the field list exactly.
    pub fn unserialize_to_attributes(
        &self,
        data: SerializedData,
    ) -> Result<SerializedData, SerializeError> {
        self.check_keys(&data)?;

        let mut attrs = SerializedData::new();
        for (field, value) in data {
            let value = match self.codecs.get(field.as_str()) {
                Some(codec) => (codec.unserialize)(value)?,
                None => value,
            };
            attrs.insert(field, value);
        }

        match &self.post_unserialize {
            Some(hook) => hook(attrs),
            None => Ok(attrs),
        }
    }

    /// Unserialize the given map to a new, unsaved record
    pub fn unserialize_to_new(&self, data: SerializedData) -> Result<M, SerializeError> {
        let attrs = self.unserialize_to_attributes(data)?;
        M::from_attributes(attrs)
    }

    fn check_keys(&self, data: &SerializedData) -> Result<(), SerializeError> {
        let mut extra: Vec<String> = data
            .keys()
            .filter(|key| !self.fields.iter().any(|field| *field == key.as_str()))
            .cloned()
            .collect();
        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|field| !data.contains_key(**field))
            .map(|field| field.to_string())
            .collect();

        if extra.is_empty() && missing.is_empty() {
            return Ok(());
        }

        extra.sort();
        Err(SerializeError::BadSerializedValue {
            model: M::NAME,
            extra,
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i64,
        label: String,
    }

    impl Model for Point {
        const NAME: &'static str = "Point";

        fn attribute(&self, field: &str) -> Result<Value, SerializeError> {
            match field {
                "x" => Ok(json!(self.x)),
                "label" => Ok(json!(self.label)),
                other => Err(SerializeError::UnknownField {
                    model: Self::NAME,
                    field: other.to_string(),
                }),
            }
        }

        fn from_attributes(attrs: SerializedData) -> Result<Self, SerializeError> {
            let x = attrs
                .get("x")
                .and_then(Value::as_i64)
                .ok_or_else(|| SerializeError::invalid_value("x", "expected an integer"))?;
            let label = attrs
                .get("label")
                .and_then(Value::as_str)
                .ok_or_else(|| SerializeError::invalid_value("label", "expected a string"))?
                .to_string();
            Ok(Point { x, label })
        }
    }

    fn plain() -> Serializer<Point> {
        Serializer::builder(&["x", "label"]).build().unwrap()
    }

    fn data(value: Value) -> SerializedData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_identity_round_trip() {
        let serializer = plain();
        let point = Point {
            x: 3,
            label: "a".to_string(),
        };
        let wire = serializer.serialize(&point).unwrap();
        assert_eq!(wire, data(json!({"x": 3, "label": "a"})));
        assert_eq!(serializer.unserialize_to_new(wire).unwrap(), point);
    }

    #[test]
    fn test_field_codec_applies_both_ways() {
        let serializer: Serializer<Point> = Serializer::builder(&["x", "label"])
            .field_codec(
                "x",
                |v| Ok(json!(v.as_i64().unwrap_or(0).to_string())),
                |v| {
                    v.as_str()
                        .and_then(|s| s.parse::<i64>().ok())
                        .map(|n| json!(n))
                        .ok_or_else(|| SerializeError::invalid_value("x", "not a number"))
                },
            )
            .build()
            .unwrap();

        let point = Point {
            x: 42,
            label: "p".to_string(),
        };
        let wire = serializer.serialize(&point).unwrap();
        assert_eq!(wire["x"], json!("42"));
        assert_eq!(serializer.unserialize_to_new(wire).unwrap(), point);

        let err = serializer
            .unserialize_to_attributes(data(json!({"x": "nope", "label": "p"})))
            .unwrap_err();
        assert!(matches!(err, SerializeError::InvalidValue { field, .. } if field == "x"));
    }

    #[test]
    fn test_post_hooks_run_after_field_pass() {
        let serializer: Serializer<Point> = Serializer::builder(&["x", "label"])
            .post_serialize(|mut out| {
                out.insert("label".to_string(), json!("serialized"));
                Ok(out)
            })
            .post_unserialize(|mut attrs| {
                attrs.insert("label".to_string(), json!("unserialized"));
                Ok(attrs)
            })
            .build()
            .unwrap();

        let point = Point {
            x: 1,
            label: "orig".to_string(),
        };
        let wire = serializer.serialize(&point).unwrap();
        assert_eq!(wire["label"], json!("serialized"));

        let attrs = serializer.unserialize_to_attributes(wire).unwrap();
        assert_eq!(attrs["label"], json!("unserialized"));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let err = plain()
            .unserialize_to_attributes(data(json!({"x": 1})))
            .unwrap_err();
        assert_eq!(
            err,
            SerializeError::BadSerializedValue {
                model: "Point",
                extra: vec![],
                missing: vec!["label".to_string()],
            }
        );
    }

    #[test]
    fn test_extra_key_is_rejected() {
        let err = plain()
            .unserialize_to_attributes(data(json!({"x": 1, "label": "a", "z": 0})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad keys for Point: got extra keys z.");
    }

    #[test]
    fn test_build_rejects_codec_for_unknown_field() {
        let result: Result<Serializer<Point>, _> = Serializer::builder(&["x", "label"])
            .field_codec("y", Ok, Ok)
            .build();
        assert!(matches!(
            result,
            Err(SerializeError::UnknownField { field, .. }) if field == "y"
        ));
    }

    #[test]
    fn test_build_rejects_duplicate_field() {
        let result: Result<Serializer<Point>, _> = Serializer::builder(&["x", "x"]).build();
        assert!(matches!(
            result,
            Err(SerializeError::DuplicateField { field, .. }) if field == "x"
        ));
    }
}
