//! Schema model: scalar kinds, cyclic sequences and ordered mappings

use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::constants::LENGTH_PREFIX_LEN;
use crate::error::{MetaPackError, Result};
use crate::types::DataType;

/// Shape of a value tree on the wire.
///
/// Encoder and decoder must be handed schemas that are identical in kinds,
/// field names and field order. Nothing on the wire records the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Single scalar of the given kind
    Scalar(DataType),
    /// Length-prefixed array; element `i` uses `elements[i % elements.len()]`
    Sequence(Vec<Schema>),
    /// Named fields, encoded in declaration order
    Mapping(Vec<(String, Schema)>),
}

impl Schema {
    /// UINT8 scalar
    pub const UINT8: Schema = Schema::Scalar(DataType::Uint8);
    /// UINT16 scalar
    pub const UINT16: Schema = Schema::Scalar(DataType::Uint16);
    /// UINT32 scalar
    pub const UINT32: Schema = Schema::Scalar(DataType::Uint32);
    /// UINT64 scalar
    pub const UINT64: Schema = Schema::Scalar(DataType::Uint64);
    /// INT8 scalar
    pub const INT8: Schema = Schema::Scalar(DataType::Int8);
    /// INT16 scalar
    pub const INT16: Schema = Schema::Scalar(DataType::Int16);
    /// INT32 scalar
    pub const INT32: Schema = Schema::Scalar(DataType::Int32);
    /// INT64 scalar
    pub const INT64: Schema = Schema::Scalar(DataType::Int64);
    /// BOOL scalar
    pub const BOOL: Schema = Schema::Scalar(DataType::Bool);
    /// FLOAT scalar
    pub const FLOAT: Schema = Schema::Scalar(DataType::Float);
    /// BINARY scalar
    pub const BINARY: Schema = Schema::Scalar(DataType::Binary);
    /// STRING scalar
    pub const STRING: Schema = Schema::Scalar(DataType::String);
    /// OBJECT scalar
    pub const OBJECT: Schema = Schema::Scalar(DataType::Object);

    /// Homogeneous array of `element`
    pub fn array(element: Schema) -> Self {
        Schema::Sequence(vec![element])
    }

    /// Array cycling through `elements`
    pub fn sequence<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = Schema>,
    {
        Schema::Sequence(elements.into_iter().collect())
    }

    /// Mapping with fields in iteration order
    pub fn mapping<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::Mapping(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    /// Element schema used for position `index` of a sequence
    pub fn element_at(elements: &[Schema], index: usize) -> Result<&Schema> {
        if elements.is_empty() {
            return Err(MetaPackError::InvalidSchema(
                "sequence schema has no element schemas".to_string(),
            ));
        }
        Ok(&elements[index % elements.len()])
    }

    /// Smallest encoded size of any value conforming to this schema
    pub fn min_encoded_len(&self) -> usize {
        match self {
            Schema::Scalar(ty) => ty.min_width(),
            Schema::Sequence(_) => LENGTH_PREFIX_LEN,
            Schema::Mapping(fields) => fields.iter().map(|(_, s)| s.min_encoded_len()).sum(),
        }
    }

    /// Check the whole tree for empty sequences
    pub fn validate(&self) -> Result<()> {
        match self {
            Schema::Scalar(_) => Ok(()),
            Schema::Sequence(elements) => {
                Schema::element_at(elements, 0)?;
                elements.iter().try_for_each(Schema::validate)
            }
            Schema::Mapping(fields) => fields.iter().try_for_each(|(_, s)| s.validate()),
        }
    }

    /// Parse a textual schema description.
    ///
    /// A string (`"UINT8"`) or integer tag (`0`) is a scalar, an array is a
    /// sequence and an object is a mapping in key order.
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        match json {
            JsonValue::Null => Err(MetaPackError::InvalidSchema("schema is null".to_string())),
            JsonValue::String(name) => Ok(Schema::Scalar(name.parse()?)),
            JsonValue::Number(n) => {
                let tag = n
                    .as_u64()
                    .and_then(|t| u8::try_from(t).ok())
                    .ok_or_else(|| {
                        MetaPackError::InvalidSchema(format!("Unknown data type tag: {}", n))
                    })?;
                Ok(Schema::Scalar(DataType::from_u8(tag)?))
            }
            JsonValue::Array(items) => {
                if items.is_empty() {
                    return Err(MetaPackError::InvalidSchema(
                        "sequence schema has no element schemas".to_string(),
                    ));
                }
                let elements = items.iter().map(Schema::from_json).collect::<Result<_>>()?;
                Ok(Schema::Sequence(elements))
            }
            JsonValue::Object(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, s)| -> Result<(String, Schema)> {
                        Ok((name.clone(), Schema::from_json(s)?))
                    })
                    .collect::<Result<_>>()?;
                Ok(Schema::Mapping(fields))
            }
            JsonValue::Bool(b) => Err(MetaPackError::InvalidSchema(format!(
                "unexpected boolean {} in schema",
                b
            ))),
        }
    }

    /// Render as a textual schema description
    pub fn to_json(&self) -> JsonValue {
        match self {
            Schema::Scalar(ty) => JsonValue::String(ty.name().to_string()),
            Schema::Sequence(elements) => {
                JsonValue::Array(elements.iter().map(Schema::to_json).collect())
            }
            Schema::Mapping(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (name, s) in fields {
                    map.insert(name.clone(), s.to_json());
                }
                JsonValue::Object(map)
            }
        }
    }
}

impl From<DataType> for Schema {
    fn from(ty: DataType) -> Self {
        Schema::Scalar(ty)
    }
}

impl FromStr for Schema {
    type Err = MetaPackError;

    fn from_str(s: &str) -> Result<Self> {
        let json: JsonValue = serde_json::from_str(s)?;
        Schema::from_json(&json)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Schema::from_json(&json).map_err(de::Error::custom)
    }
}
