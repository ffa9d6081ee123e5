use crate::record::{MalformedRecordError, RawRecord};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn decode_trims_surrounding_whitespace() {
    let raw = RawRecord::from("  {\"a\": 1}\r\n");
    assert_eq!(raw.trimmed(), b"{\"a\": 1}");
    assert_eq!(raw.decode().unwrap(), json!({"a": 1}));
}

#[test]
fn decode_rejects_blank_record() {
    let raw = RawRecord::from(" \n");
    assert!(matches!(raw.decode(), Err(MalformedRecordError::Empty)));
}

#[test]
fn decode_reports_invalid_json() {
    let raw = RawRecord::from("{\"ts\": ");
    assert!(matches!(
        raw.decode(),
        Err(MalformedRecordError::Decode { .. })
    ));
}

#[test]
fn reserialization_keeps_key_order() {
    let raw = RawRecord::from(r#"{"ts":1.5,"request":{"host":"a"},"status":200}"#);
    let value = raw.decode().unwrap();
    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        r#"{"ts":1.5,"request":{"host":"a"},"status":200}"#
    );
}
