//! Negative tests covering each `MetaPackError` variant the codec raises

use metapack_codec::{pack, pack_default, unpack, unpack_default, MetaPackError, PackConfig, Schema, Value};

fn checksum_fixture() -> (Schema, Value, PackConfig) {
    let schema = Schema::mapping([("a", Schema::UINT8), ("b", Schema::STRING)]);
    let value = Value::map([("a", Value::U8(255)), ("b", Value::from("test string"))]);
    let config = PackConfig::default().with_checksum(true).with_secret(123);
    (schema, value, config)
}

#[test]
fn schema_width_mismatch_is_out_of_bounds() {
    let packed = pack_default(&Value::U8(123), &Schema::UINT8).unwrap();
    match unpack_default(&packed, &Schema::UINT16) {
        Err(MetaPackError::OutOfBounds {
            offset,
            needed,
            remaining,
        }) => {
            assert_eq!(offset, 0);
            assert_eq!(needed, 2);
            assert_eq!(remaining, 1);
        }
        other => panic!("expected OutOfBounds, got {:?}", other),
    }
}

#[test]
fn declared_string_length_exceeds_buffer() {
    let data = [0u8, 0, 0, 10];
    let result = unpack(&data, &Schema::STRING, &PackConfig::plain());
    assert!(matches!(result, Err(MetaPackError::OutOfBounds { .. })));
}

#[test]
fn declared_element_count_exceeds_elements() {
    let plain = PackConfig::plain();
    let schema = Schema::array(Schema::UINT8);
    let packed = pack(
        &Value::Array(vec![Value::U8(1), Value::U8(2)]),
        &schema,
        &plain,
    )
    .unwrap();

    let mut malformed = vec![0u8, 0, 0, 5];
    malformed.extend_from_slice(&packed[4..]);
    assert!(matches!(
        unpack(&malformed, &schema, &plain),
        Err(MetaPackError::OutOfBounds { .. })
    ));
}

#[test]
fn short_input_is_invalid_package() {
    let config = PackConfig::default().with_checksum(true);
    assert!(matches!(
        unpack(&[1], &Schema::UINT8, &config),
        Err(MetaPackError::InvalidPackage)
    ));
    let err = unpack_default(&[], &Schema::UINT8).unwrap_err();
    assert_eq!(err.to_string(), "Invalid package!");
}

#[test]
fn empty_input_without_checksum_is_out_of_bounds() {
    // No footer to strip, so the short read surfaces from the decoder
    for config in [
        PackConfig::plain(),
        PackConfig::default().with_checksum(false),
    ] {
        match unpack(&[], &Schema::UINT8, &config) {
            Err(MetaPackError::OutOfBounds {
                offset,
                needed,
                remaining,
            }) => {
                assert_eq!(offset, 0);
                assert_eq!(needed, 1);
                assert_eq!(remaining, 0);
            }
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }
}

#[test]
fn corrupted_footer_is_data_mismatch() {
    let (schema, value, config) = checksum_fixture();
    let packed = pack(&value, &schema, &config).unwrap();

    let mut corrupted = packed.to_vec();
    let footer = corrupted.len() - 2;
    corrupted[footer..].copy_from_slice(&999u16.to_be_bytes());

    let err = unpack(&corrupted, &schema, &config).unwrap_err();
    match &err {
        MetaPackError::DataMismatch { stored, .. } => assert_eq!(*stored, 999),
        other => panic!("expected DataMismatch, got {:?}", other),
    }
    assert!(err.to_string().starts_with("Data mismatch!"));
}

#[test]
fn corrupted_payload_byte_is_data_mismatch() {
    let (schema, value, config) = checksum_fixture();
    let packed = pack(&value, &schema, &config).unwrap();

    let mut corrupted = packed.to_vec();
    corrupted[0] = corrupted[0].wrapping_add(1);
    assert!(matches!(
        unpack(&corrupted, &schema, &config),
        Err(MetaPackError::DataMismatch { .. })
    ));
}

#[test]
fn secret_mismatch_caught_by_checksum() {
    let (schema, value, config) = checksum_fixture();
    let packed = pack(&value, &schema, &config).unwrap();
    let wrong = config.clone().with_secret(124);
    assert!(matches!(
        unpack(&packed, &schema, &wrong),
        Err(MetaPackError::DataMismatch { .. })
    ));
}

#[test]
fn secret_mismatch_without_checksum_is_silent() {
    let schema = Schema::UINT16;
    let config = PackConfig::plain().with_encrypt(true).with_secret(10);
    let packed = pack(&Value::U16(500), &schema, &config).unwrap();
    let decoded = unpack(&packed, &schema, &config.clone().with_secret(11)).unwrap();
    assert_ne!(decoded, Value::U16(500));
}

#[test]
fn pack_type_mismatch_for_every_kind() {
    let cases = vec![
        (Value::U32(123), Schema::STRING, "STRING"),
        (Value::from("hello"), Schema::UINT8, "UINT8"),
        (Value::U8(1), Schema::BOOL, "BOOL"),
        (Value::from("hello"), Schema::INT8, "INT8"),
        (Value::from("hello"), Schema::UINT16, "UINT16"),
        (Value::from("hello"), Schema::INT16, "INT16"),
        (Value::from("hello"), Schema::UINT32, "UINT32"),
        (Value::from("hello"), Schema::INT32, "INT32"),
        (Value::U32(123), Schema::UINT64, "UINT64"),
        (Value::U32(123), Schema::INT64, "INT64"),
        (Value::from("hello"), Schema::FLOAT, "FLOAT"),
        (Value::U32(123), Schema::BINARY, "BINARY"),
        (Value::from("{}"), Schema::OBJECT, "OBJECT"),
    ];
    for (value, schema, kind_name) in cases {
        match pack_default(&value, &schema) {
            Err(MetaPackError::TypeMismatch { kind, .. }) => assert_eq!(kind, kind_name),
            other => panic!("expected TypeMismatch for {}, got {:?}", kind_name, other),
        }
    }
}

#[test]
fn missing_mapping_key_is_reported() {
    let schema = Schema::mapping([("present", Schema::UINT8), ("absent", Schema::UINT8)]);
    let value = Value::map([("present", Value::U8(1))]);
    let err = pack_default(&value, &schema).unwrap_err();
    assert_eq!(err.to_string(), "Missing field: absent");
}

#[test]
fn empty_sequence_schema_is_invalid() {
    let packed = pack_default(&Value::U8(1), &Schema::UINT8).unwrap();
    assert!(matches!(
        unpack_default(&packed, &Schema::Sequence(vec![])),
        Err(MetaPackError::InvalidSchema(_))
    ));
}

#[test]
fn nested_empty_sequence_rejected_before_encoding() {
    let schema = Schema::mapping([("a", Schema::UINT8), ("b", Schema::Sequence(vec![]))]);
    let value = Value::map([("a", Value::U8(1))]);
    assert!(matches!(
        pack_default(&value, &schema),
        Err(MetaPackError::InvalidSchema(_))
    ));
    assert!(matches!(
        unpack(&[1, 0, 0, 0, 0], &schema, &PackConfig::plain()),
        Err(MetaPackError::InvalidSchema(_))
    ));
}

#[test]
fn null_schema_description_is_invalid() {
    let err = "null".parse::<Schema>().unwrap_err();
    assert!(matches!(err, MetaPackError::InvalidSchema(_)));
    assert!(err.to_string().starts_with("Invalid schema!"));
}

#[test]
fn malformed_object_text_is_json_error() {
    let text = b"{not json";
    let mut data = (text.len() as u32).to_be_bytes().to_vec();
    data.extend_from_slice(text);
    assert!(matches!(
        unpack(&data, &Schema::OBJECT, &PackConfig::plain()),
        Err(MetaPackError::Json(_))
    ));
}
