//! MetaPack Format - Core primitives for schema-driven binary packing
//!
//! This crate provides the building blocks shared by the encoder and decoder
//! with no I/O dependencies. It includes:
//!
//! - Scalar data types and their wire widths
//! - The schema model (scalars, cyclic sequences, ordered mappings)
//! - The typed value tree and its JSON conversion
//! - The additive checksum and keyed byte obfuscation
//! - Configuration, decode limits and error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod limits;
pub mod schema;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use config::PackConfig;
pub use error::{MetaPackError, Result};
pub use limits::Limits;
pub use schema::Schema;
pub use types::DataType;
pub use value::Value;
