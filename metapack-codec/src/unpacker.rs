//! Decoder: walks a schema against a payload with a call-local cursor

use std::borrow::Cow;
use std::collections::BTreeMap;

use metapack_format::checksum::{deobfuscate, verify_checksum};
use metapack_format::constants::CHECKSUM_LEN;
use metapack_format::{DataType, Limits, MetaPackError, PackConfig, Result, Schema, Value};
use tracing::debug;

use crate::cursor::ReadCursor;

/// Unpack `data` according to `schema`.
///
/// `config` must match the one used by [`crate::pack`]. When the checksum is
/// enabled the last two bytes are the stored checksum, verified against the
/// de-obfuscated payload before any field is decoded. Trailing payload bytes
/// beyond the schema are ignored.
pub fn unpack(data: &[u8], schema: &Schema, config: &PackConfig) -> Result<Value> {
    schema.validate()?;
    let payload = restore_payload(data, config)?;

    let mut unpacker = Unpacker {
        cursor: ReadCursor::new(&payload),
        limits: &config.limits,
    };
    let value = unpacker.unpack_value(schema)?;

    debug!(
        payload_len = payload.len(),
        consumed = unpacker.cursor.offset(),
        "unpacked value"
    );
    Ok(value)
}

/// Unpack with [`PackConfig::default`]
pub fn unpack_default(data: &[u8], schema: &Schema) -> Result<Value> {
    unpack(data, schema, &PackConfig::default())
}

/// Split off and verify the footer, then undo obfuscation
fn restore_payload<'a>(data: &'a [u8], config: &PackConfig) -> Result<Cow<'a, [u8]>> {
    if !config.use_checksum {
        if !config.use_encrypt {
            return Ok(Cow::Borrowed(data));
        }
        let mut payload = data.to_vec();
        deobfuscate(&mut payload, config.secret);
        return Ok(Cow::Owned(payload));
    }

    if data.len() < CHECKSUM_LEN {
        return Err(MetaPackError::InvalidPackage);
    }
    let (body, footer) = data.split_at(data.len() - CHECKSUM_LEN);
    let stored = u16::from_be_bytes([footer[0], footer[1]]);

    let payload = if config.use_encrypt {
        let mut payload = body.to_vec();
        deobfuscate(&mut payload, config.secret);
        Cow::Owned(payload)
    } else {
        Cow::Borrowed(body)
    };

    if let Err(err) = verify_checksum(&payload, stored) {
        debug!(%err, payload_len = payload.len(), "checksum verification failed");
        return Err(err);
    }
    Ok(payload)
}

struct Unpacker<'a> {
    cursor: ReadCursor<'a>,
    limits: &'a Limits,
}

impl<'a> Unpacker<'a> {
    fn unpack_value(&mut self, schema: &Schema) -> Result<Value> {
        match schema {
            Schema::Scalar(ty) => self.unpack_scalar(*ty),
            Schema::Sequence(elements) => {
                let count = self.cursor.read_len()?;
                if count > self.limits.max_sequence_len {
                    return Err(MetaPackError::LimitExceeded(format!(
                        "Sequence length {} exceeds limit {}",
                        count, self.limits.max_sequence_len
                    )));
                }
                // A hostile count must not drive the allocation
                let mut items = Vec::with_capacity(count.min(self.cursor.remaining()));
                for i in 0..count {
                    items.push(self.unpack_value(Schema::element_at(elements, i)?)?);
                }
                Ok(Value::Array(items))
            }
            Schema::Mapping(fields) => {
                let mut map = BTreeMap::new();
                for (name, field_schema) in fields {
                    let value = self.unpack_value(field_schema)?;
                    map.insert(name.clone(), value);
                }
                Ok(Value::Map(map))
            }
        }
    }

    fn unpack_scalar(&mut self, ty: DataType) -> Result<Value> {
        let c = &mut self.cursor;
        let value = match ty {
            DataType::Uint8 => Value::U8(u8::from_be_bytes(c.read_array()?)),
            DataType::Int8 => Value::I8(i8::from_be_bytes(c.read_array()?)),
            DataType::Bool => Value::Bool(c.read_array::<1>()?[0] != 0),
            DataType::Uint16 => Value::U16(u16::from_be_bytes(c.read_array()?)),
            DataType::Int16 => Value::I16(i16::from_be_bytes(c.read_array()?)),
            DataType::Uint32 => Value::U32(u32::from_be_bytes(c.read_array()?)),
            DataType::Int32 => Value::I32(i32::from_be_bytes(c.read_array()?)),
            DataType::Float => Value::Float(f32::from_be_bytes(c.read_array()?)),
            DataType::Uint64 => Value::U64(u64::from_be_bytes(c.read_array()?)),
            DataType::Int64 => Value::I64(i64::from_be_bytes(c.read_array()?)),
            DataType::Binary => Value::Binary(c.read_len_prefixed()?.to_vec()),
            DataType::String => Value::String(String::from_utf8(c.read_len_prefixed()?.to_vec())?),
            DataType::Object => Value::Object(serde_json::from_slice(c.read_len_prefixed()?)?),
        };
        Ok(value)
    }
}
