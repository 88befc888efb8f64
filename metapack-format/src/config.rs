//! Pack/unpack configuration

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_SECRET};
use crate::limits::Limits;

/// Options shared by `pack` and `unpack`.
///
/// Both ends must agree on `use_checksum`, `use_encrypt` and `secret`.
/// A secret mismatch is only detected when the checksum is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Initial capacity of the output buffer; a growth hint only
    #[serde(alias = "chunkSize")]
    pub chunk_size: usize,
    /// Obfuscate payload bytes with `secret`
    #[serde(alias = "useEncrypt")]
    pub use_encrypt: bool,
    /// Append and verify the 2-byte checksum footer
    #[serde(alias = "useCheckSum")]
    pub use_checksum: bool,
    /// Obfuscation key
    pub secret: i64,
    /// Decode limits
    pub limits: Limits,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            use_encrypt: true,
            use_checksum: true,
            secret: DEFAULT_SECRET,
            limits: Limits::default(),
        }
    }
}

impl PackConfig {
    /// Configuration with both checksum and obfuscation disabled
    pub fn plain() -> Self {
        Self {
            use_encrypt: false,
            use_checksum: false,
            ..Self::default()
        }
    }

    /// Set whether the checksum footer is written and verified
    pub fn with_checksum(mut self, enabled: bool) -> Self {
        self.use_checksum = enabled;
        self
    }

    /// Set whether payload bytes are obfuscated
    pub fn with_encrypt(mut self, enabled: bool) -> Self {
        self.use_encrypt = enabled;
        self
    }

    /// Set the obfuscation secret
    pub fn with_secret(mut self, secret: i64) -> Self {
        self.secret = secret;
        self
    }

    /// Set the initial output capacity
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}
