use serde_json::{json, Value};

use crate::cbor::MAX_DEPTH;
use crate::{
    decode_cbor, decode_line, decode_packet, decode_stream, parse_hex, DecodeError, Method,
    StreamSummary, Topic,
};

fn decode_hex(input: &str) -> Result<Value, DecodeError> {
    decode_cbor(&parse_hex(input, None).expect("test hex is valid"))
}

#[test]
fn decodes_wittra_event_packet() {
    let bytes = parse_hex(
        concat!(
            "10, a1, 62, 76, 33, a2, 61, 73, 61, 65, 61, 64, ",
            "bf, 61, 74, 19, 67, 45, 61, 75, 82, 00, 18, 22, ff",
        ),
        Some(","),
    )
    .expect("hex parse failed");

    let packet = decode_packet(&bytes).expect("packet decode failed");

    assert_eq!(packet.method, Method::Post);
    assert_eq!(packet.topic, Topic::Event);
    assert_eq!(
        packet.body,
        json!({"v3": {"s": "e", "d": {"t": 26437, "u": [0, 34]}}})
    );
    assert_eq!(
        packet.body.to_string(),
        r#"{"v3":{"s":"e","d":{"t":26437,"u":[0,34]}}}"#
    );
}

#[test]
fn header_nibbles_map_to_method_and_topic() {
    let packet = decode_packet(&[0x32, 0xf6]).unwrap();
    assert_eq!(packet.method, Method::Delete);
    assert_eq!(packet.topic, Topic::State);
    assert_eq!(packet.body, Value::Null);

    let packet = decode_packet(&[0x4f, 0x00]).unwrap();
    assert_eq!(packet.method, Method::Unknown(4));
    assert_eq!(packet.topic, Topic::Unknown(15));
    assert_eq!(packet.method.to_string(), "unknown METHOD");
    assert_eq!(packet.topic.to_string(), "unknown topic");
    assert_eq!(format!("{} {}", Method::Get, Topic::Config), "GET config");
}

#[test]
fn empty_packet_is_rejected() {
    assert_eq!(decode_packet(&[]), Err(DecodeError::EmptyPacket));
    assert_eq!(
        decode_packet(&[0x10]),
        Err(DecodeError::UnexpectedEnd { offset: 0 })
    );
}

#[test]
fn parse_hex_strips_separator_and_whitespace() {
    assert_eq!(parse_hex("10 A1\t62\n", None).unwrap(), vec![0x10, 0xa1, 0x62]);
    assert_eq!(parse_hex("10;a1;62", Some(";")).unwrap(), vec![0x10, 0xa1, 0x62]);
    assert_eq!(parse_hex("10a162", Some("")).unwrap(), vec![0x10, 0xa1, 0x62]);
    assert!(matches!(parse_hex("zz", None), Err(DecodeError::Hex(_))));
    assert!(matches!(parse_hex("abc", None), Err(DecodeError::Hex(_))));
}

#[test]
fn decodes_integers() {
    assert_eq!(decode_hex("00").unwrap(), json!(0));
    assert_eq!(decode_hex("17").unwrap(), json!(23));
    assert_eq!(decode_hex("1903e8").unwrap(), json!(1000));
    assert_eq!(decode_hex("1bffffffffffffffff").unwrap(), json!(u64::MAX));
    assert_eq!(decode_hex("20").unwrap(), json!(-1));
    assert_eq!(decode_hex("3863").unwrap(), json!(-100));
    assert_eq!(decode_hex("3b7fffffffffffffff").unwrap(), json!(i64::MIN));
    assert_eq!(
        decode_hex("3bffffffffffffffff"),
        Err(DecodeError::IntegerOverflow { offset: 0 })
    );
}

#[test]
fn decodes_floats_and_simple_values() {
    assert_eq!(decode_hex("f93c00").unwrap(), json!(1.0));
    assert_eq!(decode_hex("f9c400").unwrap(), json!(-4.0));
    assert_eq!(decode_hex("f90001").unwrap(), json!(2f64.powi(-24)));
    assert_eq!(decode_hex("fa47c35000").unwrap(), json!(100000.0));
    assert_eq!(decode_hex("fb3ff199999999999a").unwrap(), json!(1.1));
    assert_eq!(decode_hex("fa7f800000").unwrap(), Value::Null);
    assert_eq!(decode_hex("f97e00").unwrap(), Value::Null);

    assert_eq!(decode_hex("f4").unwrap(), json!(false));
    assert_eq!(decode_hex("f5").unwrap(), json!(true));
    assert_eq!(decode_hex("f6").unwrap(), Value::Null);
    assert_eq!(decode_hex("f7").unwrap(), Value::Null);
    assert_eq!(
        decode_hex("f0"),
        Err(DecodeError::UnsupportedSimple { value: 16, offset: 0 })
    );
}

#[test]
fn decodes_strings() {
    assert_eq!(decode_hex("4401020304").unwrap(), json!("01020304"));
    assert_eq!(decode_hex("5f42010243030405ff").unwrap(), json!("0102030405"));
    assert_eq!(decode_hex("6449455446").unwrap(), json!("IETF"));
    assert_eq!(
        decode_hex("7f657374726561646d696e67ff").unwrap(),
        json!("streaming")
    );
    assert_eq!(
        decode_hex("62fffe"),
        Err(DecodeError::InvalidUtf8 { offset: 0 })
    );
    assert_eq!(
        decode_hex("5f6161ff"),
        Err(DecodeError::InvalidChunk { offset: 1 })
    );
}

#[test]
fn decodes_containers_and_tags() {
    assert_eq!(decode_hex("83010203").unwrap(), json!([1, 2, 3]));
    assert_eq!(decode_hex("9f018202039f0405ffff").unwrap(), json!([1, [2, 3], [4, 5]]));
    assert_eq!(decode_hex("a201020304").unwrap(), json!({"1": 2, "3": 4}));
    assert_eq!(
        decode_hex("bf6346756ef563416d7421ff").unwrap(),
        json!({"Fun": true, "Amt": -2})
    );
    assert_eq!(decode_hex("a1f56161").unwrap(), json!({"true": "a"}));
    assert_eq!(decode_hex("c11a514b67b0").unwrap(), json!(1363896240));
}

#[test]
fn malformed_input_is_reported() {
    assert_eq!(decode_hex(""), Err(DecodeError::UnexpectedEnd { offset: 0 }));
    assert_eq!(decode_hex("6261"), Err(DecodeError::UnexpectedEnd { offset: 1 }));
    assert_eq!(decode_hex("8201"), Err(DecodeError::UnexpectedEnd { offset: 2 }));
    assert_eq!(
        decode_hex("0102"),
        Err(DecodeError::TrailingBytes { offset: 1, count: 1 })
    );
    assert_eq!(decode_hex("ff"), Err(DecodeError::UnexpectedBreak { offset: 0 }));
    assert_eq!(
        decode_hex("1c"),
        Err(DecodeError::Reserved { major: 0, info: 28, offset: 0 })
    );
    assert_eq!(
        decode_hex("1f"),
        Err(DecodeError::Reserved { major: 0, info: 31, offset: 0 })
    );
}

#[test]
fn nesting_is_bounded() {
    let mut bytes = vec![0x81; MAX_DEPTH + 10];
    bytes.push(0x00);
    assert_eq!(
        decode_cbor(&bytes),
        Err(DecodeError::TooDeep { limit: MAX_DEPTH })
    );

    let mut shallow = vec![0x81; 8];
    shallow.push(0x00);
    assert!(decode_cbor(&shallow).is_ok());
}

const WITTRA_EVENT: &str = "10a1627633a2617361656164bf6174196745617582001822ff";

#[test]
fn stream_skips_blank_and_undecodable_lines() {
    let input = format!("{WITTRA_EVENT}\n\n   \nzz\n{WITTRA_EVENT}\n");
    let mut out = Vec::new();

    let summary = decode_stream(input.as_bytes(), &mut out, None).unwrap();

    assert_eq!(
        summary,
        StreamSummary {
            decoded: 2,
            failed: 1,
            skipped: 2,
        }
    );
    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert_eq!(line, r#"{"v3":{"s":"e","d":{"t":26437,"u":[0,34]}}}"#);
    }
}

#[test]
fn stream_applies_the_separator_to_every_line() {
    let input = "10,a1,61,6b,01\n32,f6\n";
    let mut out = Vec::new();

    let summary = decode_stream(input.as_bytes(), &mut out, Some(",")).unwrap();

    assert_eq!(summary.decoded, 2);
    assert_eq!(String::from_utf8(out).unwrap(), "{\"k\":1}\nnull\n");
}

#[test]
fn decode_line_reports_bad_input() {
    assert!(matches!(decode_line("zz", None), Err(DecodeError::Hex(_))));
    assert!(decode_line("", None).is_err());

    let packet = decode_line(WITTRA_EVENT, None).unwrap();
    assert_eq!(packet.method, Method::Post);
    assert_eq!(packet.topic, Topic::Event);
}
