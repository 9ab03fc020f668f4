//! Round-trip tests for every header type
//!
//! Each record is filled with boundary values: every character field at its
//! full width, every byte field with no trailing NUL, negative integers.

use mq_codec::{
    ChainDecoder, ChainEncoder, CodecConfig, Endianness, FieldKind, FieldMarshaller, HeaderSchema,
    SchemaRegistry, TrailerKind,
};
use mq_types::{FieldMap, FieldValue, HeaderRecord, HeaderType, NameValueMap, FORMAT_FIELD};

fn schema(header_type: HeaderType) -> &'static HeaderSchema {
    SchemaRegistry::global().lookup_by_tag(header_type).unwrap()
}

/// Fills every visible field with a full-width value
fn sample_fields(schema: &HeaderSchema) -> FieldMap {
    let mut fields = FieldMap::new();
    for (index, field) in schema.value_fields().enumerate() {
        let value = match field.kind {
            FieldKind::Long => FieldValue::Integer(-7 * (index as i32 + 1)),
            FieldKind::Chars(width) => {
                FieldValue::Text(field.name.chars().cycle().take(width).collect())
            }
            FieldKind::Bytes(width) => FieldValue::Bytes((1..=width as u8).collect()),
            FieldKind::Trailer(TrailerKind::Raw) => FieldValue::Bytes(vec![0xEE, 0, 0x11, 0]),
            FieldKind::Trailer(TrailerKind::NameValues) => FieldValue::NameValues(
                NameValueMap::new()
                    .with("JMSDestination", "queue:///ORDERS")
                    .with("priority", "4")
                    .with("JMSDestination", "queue:///AUDIT"),
            ),
            FieldKind::Trailer(TrailerKind::PaddedStrings) => FieldValue::List(vec![
                "<mcd><Msd>jms_text</Msd></mcd>".to_string(),
                "<jms><Dst>queue:///ORDERS</Dst></jms>".to_string(),
            ]),
        };
        fields.insert(field.name, value);
    }
    fields
}

fn chainable_types() -> impl Iterator<Item = HeaderType> {
    HeaderType::ALL
        .into_iter()
        .filter(|header_type| schema(*header_type).format().is_some())
}

#[test]
fn test_marshaller_round_trip_every_type() {
    for byte_order in [Endianness::Little, Endianness::Big] {
        let marshaller = FieldMarshaller::new(byte_order);
        for header_type in HeaderType::ALL {
            let schema = schema(header_type);
            let fields = sample_fields(schema);

            let raw = marshaller.encode_fields(schema, &fields).unwrap();
            let (decoded, size) = marshaller.decode_fields(schema, &raw, 0).unwrap();

            assert_eq!(size, raw.len(), "{header_type}");
            assert_eq!(
                decoded,
                marshaller.with_defaults(schema, &fields).unwrap(),
                "{header_type} ({byte_order:?})"
            );
            assert_eq!(decoded, fields, "{header_type} values should survive untouched");
        }
    }
}

#[test]
fn test_default_record_round_trip_every_type() {
    let marshaller = FieldMarshaller::default();
    for header_type in HeaderType::ALL {
        let schema = schema(header_type);
        let raw = marshaller.encode_fields(schema, &FieldMap::new()).unwrap();
        assert_eq!(raw.len(), schema.fixed_size(), "{header_type}");

        let (decoded, _) = marshaller.decode_fields(schema, &raw, 0).unwrap();
        assert_eq!(
            decoded,
            marshaller.with_defaults(schema, &FieldMap::new()).unwrap(),
            "{header_type}"
        );
    }
}

#[test]
fn test_chain_round_trip_every_chainable_type() {
    let registry = SchemaRegistry::global();
    let config = CodecConfig::default();
    let encoder = ChainEncoder::new(registry, &config);
    let decoder = ChainDecoder::new(registry, &config);
    let marshaller = FieldMarshaller::default();

    for header_type in chainable_types() {
        let schema = schema(header_type);
        let mut record = HeaderRecord::from_parts(header_type, sample_fields(schema));
        if schema.value_field(FORMAT_FIELD).is_some() {
            record.set(FORMAT_FIELD, "MQSTR");
        }

        let encoded = encoder.encode(&[record.clone()], b"application data", 64).unwrap();
        let format = schema.format().unwrap();
        let decoded = decoder.decode(format, encoded.as_slice());

        let expected = marshaller.with_defaults(schema, record.fields()).unwrap();
        assert_eq!(decoded.headers.len(), 1, "{header_type}");
        assert_eq!(decoded.headers[0].header_type(), Some(header_type));
        assert_eq!(decoded.headers[0].fields(), &expected, "{header_type}");
        assert_eq!(decoded.payload.as_ref(), b"application data", "{header_type}");
    }
}

#[test]
fn test_empty_strings_round_trip() {
    let marshaller = FieldMarshaller::default();
    let schema = schema(HeaderType::DeadLetterHeader);
    let fields: FieldMap = [
        ("dest_q_name", FieldValue::from("")),
        ("dest_q_mgr_name", FieldValue::from("")),
        ("put_appl_name", FieldValue::from("")),
    ]
    .into_iter()
    .collect();

    let raw = marshaller.encode_fields(schema, &fields).unwrap();
    let (decoded, _) = marshaller.decode_fields(schema, &raw, 0).unwrap();
    assert_eq!(decoded.get("dest_q_name"), Some(&FieldValue::Text(String::new())));
    assert_eq!(decoded.get("put_appl_name"), Some(&FieldValue::Text(String::new())));
}

#[test]
fn test_xmit_header_embeds_descriptor_v1() {
    let marshaller = FieldMarshaller::default();
    let schema = schema(HeaderType::XmitQHeader);
    let fields: FieldMap = [
        ("remote_q_name", FieldValue::from("TARGET.Q")),
        ("remote_q_mgr_name", FieldValue::from("QM2")),
        ("msg_id", FieldValue::from(vec![0xAAu8; 24])),
    ]
    .into_iter()
    .collect();

    let raw = marshaller.encode_fields(schema, &fields).unwrap();
    assert_eq!(raw.len(), 428);
    assert_eq!(&raw[..4], b"XQH ");
    assert_eq!(&raw[104..108], b"MD  ");
    assert_eq!(&raw[108..112], &1i32.to_le_bytes());

    let (decoded, _) = marshaller.decode_fields(schema, &raw, 0).unwrap();
    assert_eq!(decoded.get("msg_id"), Some(&FieldValue::Bytes(vec![0xAA; 24])));
    assert!(decoded.get("md_struc_id").is_none());
    assert_eq!(decoded.get("msg_type"), Some(&FieldValue::Integer(8)));
}

#[test]
fn test_character_trigger_layout() {
    let marshaller = FieldMarshaller::default();
    let schema = schema(HeaderType::TriggerCharacter);
    let fields: FieldMap = [("q_name", "INIT.Q"), ("appl_type", "0006")].into_iter().collect();

    let raw = marshaller.encode_fields(schema, &fields).unwrap();
    assert_eq!(raw.len(), 732);
    assert_eq!(&raw[..8], b"TMC    2");

    let (decoded, _) = marshaller.decode_fields(schema, &raw, 0).unwrap();
    assert_eq!(decoded.get("appl_type"), Some(&FieldValue::Text("0006".into())));
}
