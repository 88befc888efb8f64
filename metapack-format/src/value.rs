//! Typed value tree packed and unpacked against a [`Schema`]

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{MetaPackError, Result};
use crate::schema::Schema;
use crate::types::DataType;

/// A value tree.
///
/// Scalar variants correspond one-to-one with [`DataType`]; the encoder
/// accepts only the variant matching the schema's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UINT8
    U8(u8),
    /// INT8
    I8(i8),
    /// BOOL
    Bool(bool),
    /// UINT16
    U16(u16),
    /// INT16
    I16(i16),
    /// UINT32
    U32(u32),
    /// INT32
    I32(i32),
    /// FLOAT
    Float(f32),
    /// UINT64
    U64(u64),
    /// INT64
    I64(i64),
    /// BINARY
    Binary(Vec<u8>),
    /// STRING
    String(String),
    /// OBJECT: untyped sub-tree, stored as JSON text
    Object(JsonValue),
    /// Value for a sequence schema
    Array(Vec<Value>),
    /// Value for a mapping schema; key order here is never serialized
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Build a map value from `(name, value)` pairs
    pub fn map<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Elements of an array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a JSON document into a typed tree, guided by `schema`.
    ///
    /// Integers are range-checked against their kind, BINARY expects an array
    /// of byte numbers and OBJECT takes the JSON sub-tree as is.
    pub fn from_json(json: &JsonValue, schema: &Schema) -> Result<Self> {
        match schema {
            Schema::Scalar(ty) => scalar_from_json(json, *ty),
            Schema::Sequence(elements) => {
                let items = json.as_array().ok_or_else(|| json_mismatch("sequence", "array"))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Value::from_json(item, Schema::element_at(elements, i)?))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            Schema::Mapping(fields) => {
                let object = json.as_object().ok_or_else(|| json_mismatch("mapping", "object"))?;
                let mut map = BTreeMap::new();
                for (name, field_schema) in fields {
                    let field = object
                        .get(name)
                        .ok_or_else(|| MetaPackError::MissingField(name.clone()))?;
                    map.insert(name.clone(), Value::from_json(field, field_schema)?);
                }
                Ok(Value::Map(map))
            }
        }
    }

    /// Render as JSON; BINARY becomes an array of byte numbers
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::U8(v) => JsonValue::from(*v),
            Value::I8(v) => JsonValue::from(*v),
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::U16(v) => JsonValue::from(*v),
            Value::I16(v) => JsonValue::from(*v),
            Value::U32(v) => JsonValue::from(*v),
            Value::I32(v) => JsonValue::from(*v),
            // Shortest f32 text, not the widened f64 digits
            Value::Float(v) => v
                .to_string()
                .parse::<Number>()
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::U64(v) => JsonValue::from(*v),
            Value::I64(v) => JsonValue::from(*v),
            Value::Binary(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Object(json) => json.clone(),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => {
                let mut object = Map::with_capacity(map.len());
                for (name, value) in map {
                    object.insert(name.clone(), value.to_json());
                }
                JsonValue::Object(object)
            }
        }
    }
}

fn json_mismatch(kind: &str, expected: &'static str) -> MetaPackError {
    MetaPackError::TypeMismatch {
        kind: kind.to_string(),
        expected,
    }
}

fn out_of_range(ty: DataType, json: &JsonValue) -> MetaPackError {
    MetaPackError::OutOfRange {
        kind: ty,
        value: json.to_string(),
    }
}

fn json_integer<T>(json: &JsonValue, ty: DataType) -> Result<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let n = match json {
        JsonValue::Number(n) => n,
        _ => return Err(json_mismatch(ty.name(), "number")),
    };
    let converted = if let Some(v) = n.as_u64() {
        <T as TryFrom<u64>>::try_from(v).ok()
    } else if let Some(v) = n.as_i64() {
        <T as TryFrom<i64>>::try_from(v).ok()
    } else {
        None
    };
    converted.ok_or_else(|| out_of_range(ty, json))
}

fn scalar_from_json(json: &JsonValue, ty: DataType) -> Result<Value> {
    let value = match ty {
        DataType::Uint8 => Value::U8(json_integer(json, ty)?),
        DataType::Int8 => Value::I8(json_integer(json, ty)?),
        DataType::Uint16 => Value::U16(json_integer(json, ty)?),
        DataType::Int16 => Value::I16(json_integer(json, ty)?),
        DataType::Uint32 => Value::U32(json_integer(json, ty)?),
        DataType::Int32 => Value::I32(json_integer(json, ty)?),
        DataType::Uint64 => Value::U64(json_integer(json, ty)?),
        DataType::Int64 => Value::I64(json_integer(json, ty)?),
        DataType::Float => {
            let v = json.as_f64().ok_or_else(|| json_mismatch(ty.name(), "number"))?;
            let narrowed = v as f32;
            if !narrowed.is_finite() {
                return Err(out_of_range(ty, json));
            }
            Value::Float(narrowed)
        }
        DataType::Bool => Value::Bool(
            json.as_bool()
                .ok_or_else(|| json_mismatch(ty.name(), "boolean"))?,
        ),
        DataType::Binary => {
            let items = json
                .as_array()
                .ok_or_else(|| json_mismatch(ty.name(), "array of bytes"))?;
            let bytes = items
                .iter()
                .map(|b| json_integer::<u8>(b, ty))
                .collect::<Result<Vec<_>>>()?;
            Value::Binary(bytes)
        }
        DataType::String => Value::String(
            json.as_str()
                .ok_or_else(|| json_mismatch(ty.name(), "string"))?
                .to_string(),
        ),
        DataType::Object => Value::Object(json.clone()),
    };
    Ok(value)
}

macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    u8 => U8,
    i8 => I8,
    bool => Bool,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    f32 => Float,
    u64 => U64,
    i64 => I64,
    Vec<u8> => Binary,
    String => String,
    JsonValue => Object,
    Vec<Value> => Array,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Binary(bytes.to_vec())
    }
}
