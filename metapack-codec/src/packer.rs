//! Encoder: walks a value against a schema into a per-call output buffer

use bytes::Bytes;
use metapack_format::checksum::{compute_checksum, obfuscate};
use metapack_format::constants::CHECKSUM_LEN;
use metapack_format::{DataType, MetaPackError, PackConfig, Result, Schema, Value};
use tracing::debug;

use crate::buffer::OutputBuffer;

/// Pack `value` according to `schema`.
///
/// The returned buffer holds the payload, obfuscated when `use_encrypt` is
/// set, followed by a 2-byte big-endian checksum when `use_checksum` is set.
/// The checksum covers the payload before obfuscation.
pub fn pack(value: &Value, schema: &Schema, config: &PackConfig) -> Result<Bytes> {
    schema.validate()?;
    let mut packer = Packer {
        out: OutputBuffer::with_capacity(config.chunk_size),
    };
    packer.pack_value(value, schema)?;

    let payload_len = packer.out.len();
    let footer_len = if config.use_checksum { CHECKSUM_LEN } else { 0 };
    let mut finished = Vec::with_capacity(payload_len + footer_len);
    finished.extend_from_slice(packer.out.as_slice());

    let checksum = config.use_checksum.then(|| compute_checksum(&finished));
    if config.use_encrypt {
        obfuscate(&mut finished, config.secret);
    }
    if let Some(checksum) = checksum {
        finished.extend_from_slice(&checksum.to_be_bytes());
    }

    debug!(
        payload_len,
        checksum,
        use_encrypt = config.use_encrypt,
        "packed value"
    );
    Ok(Bytes::from(finished))
}

/// Pack with [`PackConfig::default`]
pub fn pack_default(value: &Value, schema: &Schema) -> Result<Bytes> {
    pack(value, schema, &PackConfig::default())
}

struct Packer {
    out: OutputBuffer,
}

impl Packer {
    fn pack_value(&mut self, value: &Value, schema: &Schema) -> Result<()> {
        match schema {
            Schema::Scalar(ty) => self.pack_scalar(value, *ty),
            Schema::Sequence(elements) => {
                let items = match value {
                    Value::Array(items) => items,
                    _ => return Err(shape_mismatch("sequence", "array")),
                };
                self.out.put_len(items.len())?;
                for (i, item) in items.iter().enumerate() {
                    self.pack_value(item, Schema::element_at(elements, i)?)?;
                }
                Ok(())
            }
            Schema::Mapping(fields) => {
                let map = match value {
                    Value::Map(map) => map,
                    _ => return Err(shape_mismatch("mapping", "map")),
                };
                for (name, field_schema) in fields {
                    let field = map
                        .get(name)
                        .ok_or_else(|| MetaPackError::MissingField(name.clone()))?;
                    self.pack_value(field, field_schema)?;
                }
                Ok(())
            }
        }
    }

    fn pack_scalar(&mut self, value: &Value, ty: DataType) -> Result<()> {
        let out = &mut self.out;
        match (ty, value) {
            (DataType::Uint8, Value::U8(v)) => out.put_u8(*v),
            (DataType::Int8, Value::I8(v)) => out.put_slice(&v.to_be_bytes()),
            (DataType::Bool, Value::Bool(v)) => out.put_u8(u8::from(*v)),
            (DataType::Uint16, Value::U16(v)) => out.put_slice(&v.to_be_bytes()),
            (DataType::Int16, Value::I16(v)) => out.put_slice(&v.to_be_bytes()),
            (DataType::Uint32, Value::U32(v)) => out.put_u32(*v),
            (DataType::Int32, Value::I32(v)) => out.put_slice(&v.to_be_bytes()),
            (DataType::Float, Value::Float(v)) => out.put_slice(&v.to_be_bytes()),
            (DataType::Uint64, Value::U64(v)) => out.put_slice(&v.to_be_bytes()),
            (DataType::Int64, Value::I64(v)) => out.put_slice(&v.to_be_bytes()),
            (DataType::Binary, Value::Binary(bytes)) => out.put_len_prefixed(bytes)?,
            (DataType::String, Value::String(s)) => out.put_len_prefixed(s.as_bytes())?,
            (DataType::Object, Value::Object(json)) => {
                let text = serde_json::to_vec(json)?;
                out.put_len_prefixed(&text)?;
            }
            (ty, _) => return Err(MetaPackError::type_mismatch(ty)),
        }
        Ok(())
    }
}

fn shape_mismatch(kind: &str, expected: &'static str) -> MetaPackError {
    MetaPackError::TypeMismatch {
        kind: kind.to_string(),
        expected,
    }
}
