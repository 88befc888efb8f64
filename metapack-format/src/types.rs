//! Scalar data type enumeration

use std::fmt;
use std::str::FromStr;

use crate::constants::LENGTH_PREFIX_LEN;
use crate::error::MetaPackError;

/// Scalar kinds a schema leaf can name.
///
/// The discriminants are the numeric tags accepted by textual schema
/// descriptions. They never appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DataType {
    /// Unsigned 8-bit integer
    Uint8 = 0,
    /// Unsigned 16-bit integer, big-endian
    Uint16 = 1,
    /// Unsigned 32-bit integer, big-endian
    Uint32 = 2,
    /// Unsigned 64-bit integer, big-endian
    Uint64 = 3,
    /// Signed 8-bit integer
    Int8 = 4,
    /// Signed 16-bit integer, big-endian
    Int16 = 5,
    /// Signed 32-bit integer, big-endian
    Int32 = 6,
    /// Signed 64-bit integer, big-endian
    Int64 = 7,
    /// Boolean stored as one byte
    Bool = 8,
    /// IEEE-754 single precision float, big-endian
    Float = 9,
    /// Length-prefixed raw bytes
    Binary = 10,
    /// Length-prefixed UTF-8 text
    String = 11,
    /// Length-prefixed JSON text of a dynamic value
    Object = 12,
}

impl DataType {
    /// Every data type, in tag order
    pub const ALL: [DataType; 13] = [
        DataType::Uint8,
        DataType::Uint16,
        DataType::Uint32,
        DataType::Uint64,
        DataType::Int8,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::Bool,
        DataType::Float,
        DataType::Binary,
        DataType::String,
        DataType::Object,
    ];

    /// Convert from u8
    pub fn from_u8(val: u8) -> Result<Self, MetaPackError> {
        Self::ALL
            .get(val as usize)
            .copied()
            .ok_or_else(|| MetaPackError::InvalidSchema(format!("Unknown data type tag: {}", val)))
    }

    /// Upper-case name used in schema descriptions and error messages
    pub fn name(self) -> &'static str {
        match self {
            DataType::Uint8 => "UINT8",
            DataType::Uint16 => "UINT16",
            DataType::Uint32 => "UINT32",
            DataType::Uint64 => "UINT64",
            DataType::Int8 => "INT8",
            DataType::Int16 => "INT16",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::Bool => "BOOL",
            DataType::Float => "FLOAT",
            DataType::Binary => "BINARY",
            DataType::String => "STRING",
            DataType::Object => "OBJECT",
        }
    }

    /// Value representation the encoder accepts for this kind
    pub fn expected_repr(self) -> &'static str {
        match self {
            DataType::Uint8 => "u8",
            DataType::Uint16 => "u16",
            DataType::Uint32 => "u32",
            DataType::Uint64 => "u64",
            DataType::Int8 => "i8",
            DataType::Int16 => "i16",
            DataType::Int32 => "i32",
            DataType::Int64 => "i64",
            DataType::Bool => "bool",
            DataType::Float => "f32",
            DataType::Binary => "bytes",
            DataType::String => "string",
            DataType::Object => "object",
        }
    }

    /// Encoded width for fixed-width kinds, `None` for length-prefixed ones
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            DataType::Uint8 | DataType::Int8 | DataType::Bool => Some(1),
            DataType::Uint16 | DataType::Int16 => Some(2),
            DataType::Uint32 | DataType::Int32 | DataType::Float => Some(4),
            DataType::Uint64 | DataType::Int64 => Some(8),
            DataType::Binary | DataType::String | DataType::Object => None,
        }
    }

    /// Smallest number of bytes a value of this kind occupies
    pub fn min_width(self) -> usize {
        self.fixed_width().unwrap_or(LENGTH_PREFIX_LEN)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = MetaPackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| MetaPackError::InvalidSchema(format!("Unknown data type: {}", s)))
    }
}
