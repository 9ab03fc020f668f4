//! Integration tests for header chain decoding
//!
//! These tests focus on where a chain walk stops and on what ends up as
//! payload when it does.

use mq_codec::{
    decode, encode, ChainDecoder, ChainTermination, CodecConfig, CodecError, Endianness,
    SchemaRegistry,
};
use mq_types::{FormatMarker, HeaderRecord, HeaderType, NameValue, NameValueMap};

fn dead_letter(format: &str) -> HeaderRecord {
    HeaderRecord::new(HeaderType::DeadLetterHeader)
        .with("reason", 2085)
        .with("dest_q_name", "ORDERS.IN")
        .with("dest_q_mgr_name", "QM1")
        .with("format", format)
}

#[test]
fn test_unknown_marker_leaves_everything_as_payload() {
    let buffer = encode(&[dead_letter("MQSTR")], b"tail", 0).unwrap();

    let decoded = decode("XXXXXXXX", buffer.as_slice());
    assert!(decoded.headers.is_empty());
    assert_eq!(decoded.payload.as_ref(), buffer.as_slice());
    assert_eq!(
        decoded.termination,
        ChainTermination::UnrecognizedFormat(FormatMarker::new("XXXXXXXX"))
    );
}

#[test]
fn test_chain_order_preserved() {
    let headers = vec![
        dead_letter("MQHRF2"),
        HeaderRecord::new(HeaderType::RfHeader2)
            .with("xml", vec!["<usr><k>v</k></usr>".to_string()])
            .with("format", "MQCICS"),
        HeaderRecord::new(HeaderType::Cics)
            .with("transaction_id", "TX01")
            .with("format", "MQIMS"),
        HeaderRecord::new(HeaderType::Ims)
            .with("l_term_override", "LTERM1")
            .with("format", "MQHWIH"),
        HeaderRecord::new(HeaderType::WorkInfoHeader)
            .with("service_name", "ORDER.SERVICE")
            .with("format", "MQSTR"),
    ];
    let buffer = encode(&headers, b"<order/>", 128).unwrap();

    let decoded = decode("MQDEAD", buffer.as_slice());
    let types: Vec<_> = decoded
        .headers
        .iter()
        .filter_map(HeaderRecord::header_type)
        .collect();
    assert_eq!(
        types,
        vec![
            HeaderType::DeadLetterHeader,
            HeaderType::RfHeader2,
            HeaderType::Cics,
            HeaderType::Ims,
            HeaderType::WorkInfoHeader,
        ]
    );
    assert_eq!(decoded.headers[2].text("transaction_id"), Some("TX01"));
    assert_eq!(decoded.headers[4].text("service_name"), Some("ORDER.SERVICE"));
    assert_eq!(decoded.payload.as_ref(), b"<order/>");
    assert_eq!(decoded.payload_format(), Some(FormatMarker::STRING));
}

#[test]
fn test_blank_format_in_last_header_ends_chain() {
    let buffer = encode(&[dead_letter("")], b"raw", 0).unwrap();
    let decoded = decode("MQDEAD", buffer.as_slice());
    assert_eq!(decoded.headers.len(), 1);
    assert_eq!(decoded.termination, ChainTermination::BlankFormat);
    assert_eq!(decoded.payload.as_ref(), b"raw");
}

#[test]
fn test_struct_id_mismatch_midway() {
    let headers = vec![
        dead_letter("MQCICS"),
        HeaderRecord::new(HeaderType::Cics).with("format", "MQSTR"),
    ];
    let mut buffer = encode(&headers, b"data", 0).unwrap().into_vec();
    buffer[172..176].copy_from_slice(b"BAD!");

    let decoded = decode("MQDEAD", &buffer);
    assert_eq!(decoded.headers.len(), 1);
    assert_eq!(decoded.payload.as_ref(), &buffer[172..]);
    assert_eq!(decoded.anomaly, None);
    assert_eq!(decoded.payload_format(), Some(FormatMarker::CICS));
}

#[test]
fn test_struct_id_mismatch_reported_with_flag() {
    let mut buffer = encode(&[dead_letter("MQSTR")], b"", 0).unwrap().into_vec();
    buffer[0] = b'Q';

    let config = CodecConfig::default().with_anomaly_reporting(true);
    let decoded = ChainDecoder::new(SchemaRegistry::global(), &config).decode("MQDEAD", &buffer);
    assert!(decoded.headers.is_empty());
    assert_eq!(decoded.payload.len(), 172);
    match decoded.anomaly {
        Some(CodecError::StructIdMismatch {
            header_type,
            offset,
            ref expected,
            ..
        }) => {
            assert_eq!(header_type, HeaderType::DeadLetterHeader);
            assert_eq!(offset, 0);
            assert_eq!(expected, "DLH ");
        }
        other => panic!("expected struct id mismatch, got {other:?}"),
    }
}

#[test]
fn test_truncated_header_becomes_payload() {
    let headers = vec![
        dead_letter("MQCICS"),
        HeaderRecord::new(HeaderType::Cics).with("format", "MQSTR"),
    ];
    let buffer = encode(&headers, b"", 0).unwrap();
    let cut = &buffer.as_slice()[..172 + 100];

    let decoded = decode("MQDEAD", cut);
    assert_eq!(decoded.headers.len(), 1);
    assert_eq!(decoded.payload.len(), 100);
    assert!(matches!(
        decoded.termination,
        ChainTermination::CorruptStructure {
            header_type: HeaderType::Cics,
            offset: 172,
            ..
        }
    ));
}

#[test]
fn test_variable_length_overrun_becomes_payload() {
    let headers = vec![HeaderRecord::new(HeaderType::RfHeader)
        .with("name_value", NameValueMap::new().with("k", "value"))
        .with("format", "MQSTR")];
    let mut buffer = encode(&headers, b"", 0).unwrap().into_vec();
    buffer[8..12].copy_from_slice(&4096i32.to_le_bytes());

    let decoded = decode("MQHRF", &buffer);
    assert!(decoded.headers.is_empty());
    assert_eq!(decoded.payload.as_ref(), &buffer[..]);
}

#[test]
fn test_variable_length_advances_by_struc_length() {
    let headers = vec![
        HeaderRecord::new(HeaderType::RfHeader)
            .with(
                "name_value",
                NameValueMap::new().with("a", "1").with("a", "2").with("b", "3"),
            )
            .with("format", "MQDEAD"),
        dead_letter("MQSTR"),
    ];
    let buffer = encode(&headers, b"end", 0).unwrap();

    let decoded = decode("MQHRF", buffer.as_slice());
    assert_eq!(decoded.headers.len(), 2);
    let name_values = decoded.headers[0]
        .get("name_value")
        .and_then(|value| value.as_name_values())
        .unwrap();
    assert_eq!(
        name_values.get("a"),
        Some(&NameValue::Multiple(vec!["1".into(), "2".into()]))
    );
    assert_eq!(name_values.get("b"), Some(&NameValue::Single("3".into())));
    assert_eq!(decoded.headers[1].integer("reason"), Some(2085));
    assert_eq!(decoded.payload.as_ref(), b"end");
}

#[test]
fn test_big_endian_chain() {
    let config = CodecConfig::default().with_byte_order(Endianness::Big);
    let registry = SchemaRegistry::global();
    let encoder = mq_codec::ChainEncoder::new(registry, &config);
    let buffer = encoder.encode(&[dead_letter("MQSTR")], b"be", 0).unwrap();
    assert_eq!(&buffer.as_slice()[8..12], &2085i32.to_be_bytes());

    let decoded = ChainDecoder::new(registry, &config).decode("MQDEAD", buffer.as_slice());
    assert_eq!(decoded.headers[0].integer("reason"), Some(2085));

    // a little-endian reader sees a nonsense reason but still walks the chain
    let misread = decode("MQDEAD", buffer.as_slice());
    assert_eq!(misread.headers[0].integer("reason"), Some(2085i32.swap_bytes()));
}

#[test]
fn test_trigger_ends_chain() {
    let headers = vec![HeaderRecord::new(HeaderType::Trigger)
        .with("q_name", "INIT.Q")
        .with("appl_id", "/usr/bin/handler")];
    let buffer = encode(&headers, b"after trigger", 0).unwrap();

    let decoded = decode("MQTRIG", buffer.as_slice());
    assert_eq!(decoded.headers.len(), 1);
    assert_eq!(
        decoded.termination,
        ChainTermination::NoFormatHeader(HeaderType::Trigger)
    );
    assert_eq!(decoded.payload.as_ref(), b"after trigger");
    assert_eq!(decoded.headers[0].text("appl_id"), Some("/usr/bin/handler"));
}
