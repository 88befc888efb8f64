//! Error types for MetaPack

use thiserror::Error;

use crate::types::DataType;

/// MetaPack error types
#[derive(Debug, Error)]
pub enum MetaPackError {
    /// Value representation does not match the schema's scalar kind.
    #[error("Invalid data type for {kind}. Expected {expected}.")]
    TypeMismatch {
        /// Kind (or structural shape) named by the schema
        kind: String,
        /// Representation the schema expected
        expected: &'static str,
    },
    /// A mapping schema names a field that the value does not carry.
    #[error("Missing field: {0}")]
    MissingField(String),
    /// Input is too short to carry the checksum footer.
    #[error("Invalid package!")]
    InvalidPackage,
    /// Schema description is absent, empty or malformed.
    #[error("Invalid schema! {0}")]
    InvalidSchema(String),
    /// Stored checksum disagrees with the recomputed one.
    #[error("Data mismatch! {computed} vs {stored}")]
    DataMismatch {
        /// Checksum recomputed over the payload
        computed: u16,
        /// Checksum read from the footer
        stored: u16,
    },
    /// A read would run past the end of the buffer.
    #[error("Read out of bounds: need {needed} bytes at offset {offset}, {remaining} remaining")]
    OutOfBounds {
        /// Cursor position of the failed read
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },
    /// A length or element count does not fit the 4-byte prefix.
    #[error("Length {0} exceeds the 4-byte length prefix")]
    LengthOverflow(usize),
    /// A number lies outside the domain of its scalar kind.
    #[error("Value {value} out of range for {kind}")]
    OutOfRange {
        /// Target scalar kind
        kind: DataType,
        /// Offending value, rendered as text
        value: String,
    },
    /// A configured decode limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// STRING payload is not valid UTF-8.
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// OBJECT payload could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetaPackError {
    /// Type mismatch for a scalar kind
    pub fn type_mismatch(kind: DataType) -> Self {
        MetaPackError::TypeMismatch {
            kind: kind.name().to_string(),
            expected: kind.expected_repr(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MetaPackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let err = MetaPackError::type_mismatch(DataType::Uint8);
        assert_eq!(err.to_string(), "Invalid data type for UINT8. Expected u8.");

        let err = MetaPackError::type_mismatch(DataType::Binary);
        assert_eq!(
            err.to_string(),
            "Invalid data type for BINARY. Expected bytes."
        );
    }

    #[test]
    fn test_data_mismatch_reports_both_values() {
        let err = MetaPackError::DataMismatch {
            computed: 1234,
            stored: 999,
        };
        assert_eq!(err.to_string(), "Data mismatch! 1234 vs 999");
    }
}
