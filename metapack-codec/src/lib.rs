//! MetaPack Codec - Schema-driven pack/unpack engines
//!
//! This crate provides the two entry points of MetaPack:
//!
//! - [`pack`]: encode a [`Value`] against a [`Schema`] into bytes
//! - [`unpack`]: decode bytes against the same [`Schema`] back into a [`Value`]
//!
//! Each call owns its buffer and cursor, so calls are reentrant and may run
//! concurrently from any number of threads.
//!
//! ```
//! use metapack_codec::{pack_default, unpack_default, Schema, Value};
//!
//! let schema = Schema::mapping([("id", Schema::UINT32), ("name", Schema::STRING)]);
//! let value = Value::map([("id", Value::U32(7)), ("name", Value::from("ada"))]);
//!
//! let packed = pack_default(&value, &schema)?;
//! assert_eq!(unpack_default(&packed, &schema)?, value);
//! # Ok::<(), metapack_codec::MetaPackError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod cursor;
pub mod packer;
pub mod unpacker;

// Re-export commonly used types
pub use metapack_format::{DataType, Limits, MetaPackError, PackConfig, Result, Schema, Value};

// Re-export our own types
pub use buffer::OutputBuffer;
pub use cursor::ReadCursor;
pub use packer::{pack, pack_default};
pub use unpacker::{unpack, unpack_default};
