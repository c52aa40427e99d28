//! Tests for WAL Entry encoding
//!
//! These tests verify:
//! - Line framing (checksum, separator, newline)
//! - Optional fields survive encode/decode as present or absent
//! - Corruption of any part of a line is detected

use stratakv::model::{Attributes, Item, Key};
use stratakv::wal::{compute_crc, Operation, WalEntry, CRC_HEX_LEN};
use stratakv::StrataError;

// =============================================================================
// Helper Functions
// =============================================================================

fn put_entry(lsn: u64) -> WalEntry {
    let mut attributes = Attributes::new();
    attributes.insert("userId".to_string(), "u1".into());
    attributes.insert("age".to_string(), 42i64.into());
    attributes.insert("active".to_string(), true.into());
    attributes.insert("nickname".to_string(), stratakv::AttributeValue::Null);

    WalEntry::new(
        lsn,
        Operation::PutItem {
            table_name: "Users".to_string(),
            item: Item::new(Key::partition("u1"), attributes),
        },
    )
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_serialized_line_shape() {
    let bytes = put_entry(1).serialize().unwrap();

    assert_eq!(bytes.last(), Some(&b'\n'));
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 1);
    assert_eq!(bytes[CRC_HEX_LEN], b' ');

    let text = std::str::from_utf8(&bytes).unwrap();
    let payload = text[CRC_HEX_LEN + 1..].trim_end_matches('\n');
    assert_eq!(
        &text[..CRC_HEX_LEN],
        format!("{:08x}", compute_crc(payload.as_bytes()))
    );
}

#[test]
fn test_payload_is_tagged_json() {
    let bytes = WalEntry::new(
        3,
        Operation::DeleteItem {
            table_name: "Orders".to_string(),
            key: Key::sorted("c1", "2024-01-01"),
        },
    )
    .serialize()
    .unwrap();

    let text = std::str::from_utf8(&bytes).unwrap();
    let json: serde_json::Value = serde_json::from_str(text[CRC_HEX_LEN + 1..].trim()).unwrap();

    assert_eq!(json["lsn"], 3);
    assert_eq!(json["operation"]["op"], "delete_item");
    assert_eq!(json["operation"]["table_name"], "Orders");
    assert_eq!(json["operation"]["key"]["partitionKey"], "c1");
    assert_eq!(json["operation"]["key"]["sortKey"], "2024-01-01");
}

#[test]
fn test_deserialize_put_preserves_attribute_types() {
    let entry = put_entry(7);
    let decoded = WalEntry::deserialize(&entry.serialize().unwrap()).unwrap();

    assert_eq!(decoded, entry);
}

#[test]
fn test_create_table_without_sort_key_omits_field() {
    let entry = WalEntry::new(
        1,
        Operation::CreateTable {
            table_name: "Users".to_string(),
            partition_key_name: "userId".to_string(),
            sort_key_name: None,
        },
    );
    let bytes = entry.serialize().unwrap();
    let text = std::str::from_utf8(&bytes).unwrap();

    assert!(!text.contains("sort_key_name"));
    assert_eq!(WalEntry::deserialize(&bytes).unwrap(), entry);
}

#[test]
fn test_create_table_with_sort_key_keeps_field() {
    let entry = WalEntry::new(
        1,
        Operation::CreateTable {
            table_name: "Orders".to_string(),
            partition_key_name: "customerId".to_string(),
            sort_key_name: Some("orderDate".to_string()),
        },
    );
    let decoded = WalEntry::deserialize(&entry.serialize().unwrap()).unwrap();

    match decoded.operation {
        Operation::CreateTable { sort_key_name, .. } => {
            assert_eq!(sort_key_name.as_deref(), Some("orderDate"))
        }
        other => panic!("unexpected operation {:?}", other),
    }
}

#[test]
fn test_deserialize_accepts_line_without_newline() {
    let entry = put_entry(2);
    let mut bytes = entry.serialize().unwrap();
    bytes.pop();

    assert_eq!(WalEntry::deserialize(&bytes).unwrap(), entry);
}

// =============================================================================
// Corruption Tests
// =============================================================================

fn assert_corrupt(bytes: &[u8]) {
    match WalEntry::deserialize(bytes) {
        Err(StrataError::WalCorruption(_)) => {}
        other => panic!("expected WalCorruption, got {:?}", other),
    }
}

#[test]
fn test_flipped_payload_byte_is_detected() {
    let mut bytes = put_entry(1).serialize().unwrap();
    let idx = bytes.len() - 5;
    bytes[idx] ^= 0x01;

    assert_corrupt(&bytes);
}

#[test]
fn test_flipped_checksum_digit_is_detected() {
    let mut bytes = put_entry(1).serialize().unwrap();
    bytes[0] = if bytes[0] == b'0' { b'1' } else { b'0' };

    assert_corrupt(&bytes);
}

#[test]
fn test_missing_separator_is_corrupt() {
    assert_corrupt(b"deadbeef{\"lsn\":1}\n");
}

#[test]
fn test_non_hex_checksum_is_corrupt() {
    assert_corrupt(b"zzzzzzzz {}\n");
}

#[test]
fn test_short_checksum_is_corrupt() {
    assert_corrupt(b"abc {}\n");
}

#[test]
fn test_valid_checksum_over_bad_json_is_corrupt() {
    let payload = "{\"lsn\":1,\"operation\":{\"op\":\"drop_table\"}}";
    let line = format!("{:08x} {}\n", compute_crc(payload.as_bytes()), payload);

    assert_corrupt(line.as_bytes());
}

#[test]
fn test_invalid_utf8_is_corrupt() {
    assert_corrupt(&[0xff, 0xfe, b' ', b'{', b'}', b'\n']);
}

#[test]
fn test_empty_line_is_corrupt() {
    assert_corrupt(b"\n");
}
