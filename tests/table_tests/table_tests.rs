//! Table Tests
//!
//! Tests verify:
//! - Key derivation and missing key attributes
//! - Put/get/remove with and without a sort key
//! - Partition pruning
//! - Inclusive range queries
//! - Concurrent access patterns

use std::sync::Arc;
use std::thread;

use stratakv::model::{AttributeValue, Attributes, Key};
use stratakv::table::{KeySchema, Table};
use stratakv::StrataError;

// =============================================================================
// Helper Functions
// =============================================================================

fn users() -> Table {
    Table::new(KeySchema::new("Users", "userId", None))
}

fn orders() -> Table {
    Table::new(KeySchema::new("Orders", "customerId", Some("orderDate".to_string())))
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), AttributeValue::from(*v)))
        .collect()
}

fn order(customer: &str, date: &str) -> Attributes {
    attrs(&[("customerId", customer), ("orderDate", date), ("total", "10")])
}

fn sort_keys(items: &[stratakv::Item]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.primary_key.sort_key.clone().unwrap())
        .collect()
}

// =============================================================================
// Key Derivation Tests
// =============================================================================

#[test]
fn test_put_derives_partition_key() {
    let table = users();

    let item = table.put(attrs(&[("userId", "u1"), ("name", "Alice")])).unwrap();

    assert_eq!(item.primary_key, Key::partition("u1"));
    assert_eq!(item.attributes["name"], AttributeValue::from("Alice"));
}

#[test]
fn test_put_derives_sort_key() {
    let table = orders();

    let item = table.put(order("c1", "2024-01-01")).unwrap();

    assert_eq!(item.primary_key, Key::sorted("c1", "2024-01-01"));
}

#[test]
fn test_numeric_partition_key() {
    let table = users();
    let mut a = Attributes::new();
    a.insert("userId".to_string(), 7i64.into());

    let item = table.put(a).unwrap();

    assert_eq!(item.primary_key.partition_key, "7");
    assert!(table.get("7", None).is_some());
}

#[test]
fn test_missing_partition_key_attribute() {
    let table = users();

    let err = table.put(attrs(&[("name", "Alice")])).unwrap_err();

    match err {
        StrataError::MissingKeyAttribute { table, attribute } => {
            assert_eq!(table, "Users");
            assert_eq!(attribute, "userId");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(table.is_empty());
}

#[test]
fn test_missing_sort_key_attribute() {
    let table = orders();

    let err = table.put(attrs(&[("customerId", "c1")])).unwrap_err();

    assert!(matches!(
        err,
        StrataError::MissingKeyAttribute { ref attribute, .. } if attribute == "orderDate"
    ));
    assert_eq!(table.item_count(), 0);
}

#[test]
fn test_null_key_attribute_counts_as_missing() {
    let table = users();
    let mut a = Attributes::new();
    a.insert("userId".to_string(), AttributeValue::Null);

    assert!(matches!(
        table.put(a),
        Err(StrataError::MissingKeyAttribute { .. })
    ));
}

#[test]
fn test_insert_rederives_stale_key() {
    let table = users();
    let mut item = table.build_item(attrs(&[("userId", "real")])).unwrap();
    item.primary_key = Key::partition("forged");

    table.insert(item).unwrap();

    assert!(table.get("forged", None).is_none());
    assert_eq!(table.get("real", None).unwrap().primary_key, Key::partition("real"));
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_get_nonexistent_is_none() {
    let table = orders();
    assert!(table.get("nobody", Some("x")).is_none());
}

#[test]
fn test_put_overwrites_existing() {
    let table = users();

    table.put(attrs(&[("userId", "u1"), ("name", "Alice")])).unwrap();
    let previous = table
        .insert(table.build_item(attrs(&[("userId", "u1"), ("name", "Bob")])).unwrap())
        .unwrap();

    assert_eq!(previous.unwrap().attributes["name"], AttributeValue::from("Alice"));
    assert_eq!(
        table.get("u1", None).unwrap().attributes["name"],
        AttributeValue::from("Bob")
    );
    assert_eq!(table.item_count(), 1);
}

#[test]
fn test_sorted_get_requires_sort_key() {
    let table = orders();
    table.put(order("c1", "d1")).unwrap();

    assert!(table.get("c1", None).is_none());
    assert!(!table.contains("c1", None));
    assert!(table.contains("c1", Some("d1")));
}

#[test]
fn test_unsorted_get_ignores_sort_key() {
    let table = users();
    table.put(attrs(&[("userId", "u1")])).unwrap();

    assert!(table.get("u1", Some("anything")).is_some());
}

#[test]
fn test_remove() {
    let table = users();
    table.put(attrs(&[("userId", "u1")])).unwrap();

    let removed = table.remove("u1", None);

    assert!(removed.is_some());
    assert!(table.get("u1", None).is_none());
    assert!(table.remove("u1", None).is_none());
}

#[test]
fn test_remove_absent_is_noop() {
    let table = orders();
    table.put(order("c1", "d1")).unwrap();

    assert!(table.remove("c1", Some("d2")).is_none());
    assert!(table.remove("c9", Some("d1")).is_none());
    assert_eq!(table.item_count(), 1);
}

// =============================================================================
// Partition Pruning Tests
// =============================================================================

#[test]
fn test_removing_last_item_prunes_partition() {
    let table = orders();
    table.put(order("c1", "d1")).unwrap();
    table.put(order("c1", "d2")).unwrap();
    table.put(order("c2", "d1")).unwrap();
    assert_eq!(table.partition_count(), 2);

    table.remove("c1", Some("d1"));
    assert!(table.has_partition("c1"));

    table.remove("c1", Some("d2"));
    assert!(!table.has_partition("c1"));
    assert_eq!(table.partition_count(), 1);
    assert!(table.has_partition("c2"));
}

#[test]
fn test_unsorted_remove_drops_partition() {
    let table = users();
    table.put(attrs(&[("userId", "u1")])).unwrap();

    table.remove("u1", None);

    assert!(!table.has_partition("u1"));
    assert!(table.is_empty());
}

// =============================================================================
// Range Query Tests
// =============================================================================

fn abcd() -> Table {
    let table = orders();
    for sk in ["c", "a", "d", "b"] {
        table.put(order("p", sk)).unwrap();
    }
    table.put(order("other", "b")).unwrap();
    table
}

#[test]
fn test_query_inclusive_range() {
    let items = abcd().query("p", Some("b"), Some("c"));
    assert_eq!(sort_keys(&items), vec!["b", "c"]);
}

#[test]
fn test_query_open_start() {
    let items = abcd().query("p", None, Some("c"));
    assert_eq!(sort_keys(&items), vec!["a", "b", "c"]);
}

#[test]
fn test_query_open_end() {
    let items = abcd().query("p", Some("b"), None);
    assert_eq!(sort_keys(&items), vec!["b", "c", "d"]);
}

#[test]
fn test_query_whole_partition() {
    let items = abcd().query("p", None, None);
    assert_eq!(sort_keys(&items), vec!["a", "b", "c", "d"]);
    assert!(items.iter().all(|i| i.primary_key.partition_key == "p"));
}

#[test]
fn test_query_bounds_between_keys() {
    let items = abcd().query("p", Some("aa"), Some("cz"));
    assert_eq!(sort_keys(&items), vec!["b", "c"]);
}

#[test]
fn test_query_single_point() {
    let items = abcd().query("p", Some("d"), Some("d"));
    assert_eq!(sort_keys(&items), vec!["d"]);
}

#[test]
fn test_query_inverted_range_is_empty() {
    assert!(abcd().query("p", Some("d"), Some("a")).is_empty());
}

#[test]
fn test_query_missing_partition_is_empty() {
    assert!(abcd().query("nope", None, None).is_empty());
}

#[test]
fn test_query_unsorted_table_returns_at_most_one() {
    let table = users();
    table.put(attrs(&[("userId", "u1")])).unwrap();

    assert_eq!(table.query("u1", Some("x"), Some("y")).len(), 1);
    assert!(table.query("u2", None, None).is_empty());
}

#[test]
fn test_items_snapshot_is_key_ordered() {
    let keys: Vec<Key> = abcd().items().into_iter().map(|i| i.primary_key).collect();

    assert_eq!(keys.len(), 5);
    assert_eq!(keys[0], Key::sorted("other", "b"));
    assert_eq!(keys[1], Key::sorted("p", "a"));
    assert_eq!(keys[4], Key::sorted("p", "d"));
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_concurrent_puts_and_removes_across_partitions() {
    let table = Arc::new(orders());

    let mut handles = vec![];
    for t in 0..4 {
        let table = Arc::clone(&table);
        handles.push(thread::spawn(move || {
            let customer = format!("c{}", t);
            for i in 0..50 {
                table.put(order(&customer, &format!("{:03}", i))).unwrap();
            }
            for i in 0..50 {
                table.remove(&customer, Some(&format!("{:03}", i)));
            }
            table.put(order(&customer, "last")).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(table.partition_count(), 4);
    assert_eq!(table.item_count(), 4);
}
