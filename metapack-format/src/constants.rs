//! Constants for the MetaPack wire format

/// Width of the big-endian length prefix carried by BINARY, STRING and OBJECT
/// values and by sequence element counts.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Width of the trailing checksum footer.
pub const CHECKSUM_LEN: usize = 2;

/// Modulus of the additive checksum.
pub const CHECKSUM_MODULUS: u32 = 32_000;

/// Default obfuscation secret.
pub const DEFAULT_SECRET: i64 = 1210;

/// Default initial capacity of the encoder's output buffer.
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024;
