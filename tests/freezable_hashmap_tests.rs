//! Unit tests for FreezableHashMap.
//!
//! Covers construction, insertion, lookup with defaults, iteration order and
//! the frozen state of every mutating operation.

use freezemap::freezable::{DefaultValue, Freezable, FreezableHashMap, MapError};
use rstest::rstest;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: FreezableHashMap<String, i32> = FreezableHashMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert!(map.default_value().is_none());
    assert!(!map.is_frozen());
}

#[rstest]
fn test_default_matches_new() {
    let map: FreezableHashMap<String, i32> = FreezableHashMap::default();
    assert_eq!(map, FreezableHashMap::new());
}

#[rstest]
fn test_from_iter_keeps_last_value_for_duplicates() {
    let map: FreezableHashMap<&str, i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a"), Some(&3));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
}

// =============================================================================
// Insert and lookup
// =============================================================================

#[rstest]
fn test_insert_returns_previous_value() {
    let mut map = FreezableHashMap::new();
    assert_eq!(map.insert("key".to_string(), 1), Ok(None));
    assert_eq!(map.insert("key".to_string(), 2), Ok(Some(1)));
    assert_eq!(map.get("key"), Some(&2));
    assert_eq!(map.len(), 1);
}

#[rstest]
fn test_lookup_with_constant_default() {
    let mut map: FreezableHashMap<&str, i32> = FreezableHashMap::with_default(0);
    map.insert("a", 1).unwrap();

    assert_eq!(map.lookup(&"a"), Some(1));
    assert_eq!(map.lookup(&"b"), Some(0));
    assert_eq!(map.len(), 1);
}

#[rstest]
fn test_lookup_with_computed_default() {
    let map: FreezableHashMap<String, usize> =
        FreezableHashMap::with_default_fn(|key: &String| key.len() * 2);

    assert_eq!(map.lookup(&"abc".to_string()), Some(6));
    assert!(map.is_empty());
}

#[rstest]
fn test_lookup_takes_owned_key_while_get_takes_borrowed() {
    let mut map: FreezableHashMap<String, usize> =
        FreezableHashMap::with_default_fn(|key: &String| key.len());
    map.insert("a".to_string(), 10).unwrap();

    assert_eq!(map.lookup(&"a".to_string()), Some(10));
    assert_eq!(map.lookup(&"four".to_string()), Some(4));
    assert_eq!(map.get("a").copied(), Some(10));
    assert_eq!(map.get("four"), None);
}

#[rstest]
fn test_lookup_without_default() {
    let map: FreezableHashMap<&str, i32> = FreezableHashMap::new();
    assert_eq!(map.lookup(&"a"), None);
}

// =============================================================================
// Iteration
// =============================================================================

#[rstest]
fn test_iter_follows_insertion_order() {
    let map: FreezableHashMap<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), vec!['c', 'a', 'b']);
}

#[rstest]
fn test_iter_skips_deleted_entries() {
    let mut map: FreezableHashMap<i32, i32> = (0..10).map(|n| (n, n)).collect();
    for key in [0, 4, 9] {
        map.delete(&key).unwrap();
    }

    let keys: Vec<i32> = (&map).into_iter().map(|(key, _)| *key).collect();
    assert_eq!(keys, vec![1, 2, 3, 5, 6, 7, 8]);
    assert_eq!(map.iter().len(), 7);
}

#[rstest]
fn test_each_pair_nested_sessions() {
    let mut map: FreezableHashMap<i32, i32> = (0..3).map(|n| (n, n)).collect();
    let mut levels = Vec::new();

    map.each_pair(|visit| {
        visit.into_map().each_pair(|inner| {
            levels.push(inner.into_map().iteration_level());
        });
    });

    assert_eq!(levels, vec![2; 9]);
    assert_eq!(map.iteration_level(), 0);
}

#[rstest]
fn test_each_pair_session_ends_on_panic() {
    let mut map: FreezableHashMap<i32, i32> = (0..3).map(|n| (n, n)).collect();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        map.each_pair(|_| panic!("visitor failed"));
    }));

    assert!(result.is_err());
    assert_eq!(map.iteration_level(), 0);
}

// =============================================================================
// Freezing
// =============================================================================

#[rstest]
fn test_freeze_is_idempotent_and_irreversible() {
    init_tracing();
    let mut map: FreezableHashMap<i32, i32> = FreezableHashMap::new();
    map.freeze();
    map.freeze();
    assert!(map.is_frozen());
}

#[rstest]
fn test_frozen_map_rejects_every_mutation() {
    init_tracing();
    let mut map: FreezableHashMap<&str, i32> = [("a", 1)].into_iter().collect();
    map.freeze();

    assert_eq!(map.insert("b", 2).unwrap_err().operation, "insert");
    assert_eq!(map.delete("a").unwrap_err().operation, "delete");
    assert_eq!(map.clear().unwrap_err().operation, "clear");
    assert_eq!(map.get_mut("a").unwrap_err().operation, "get_mut");
    assert_eq!(map.try_extend([("c", 3)]).unwrap_err().operation, "extend");
    assert_eq!(
        map.set_default_value(DefaultValue::Value(0))
            .unwrap_err()
            .operation,
        "set_default_value"
    );

    let expected: FreezableHashMap<&str, i32> = [("a", 1)].into_iter().collect();
    assert_eq!(map, expected);
}

#[rstest]
fn test_frozen_map_still_reads() {
    let mut map: FreezableHashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    map.freeze();

    assert_eq!(map.get("a"), Some(&1));
    assert!(map.contains_key("b"));
    assert_eq!(map.iter().count(), 2);
}

#[rstest]
fn test_frozen_error_converts_into_map_error() {
    fn remove(map: &mut FreezableHashMap<&'static str, i32>) -> Result<Option<i32>, MapError> {
        Ok(map.delete("a")?)
    }

    let mut map: FreezableHashMap<&str, i32> = [("a", 1)].into_iter().collect();
    assert_eq!(remove(&mut map), Ok(Some(1)));

    map.freeze();
    assert!(matches!(remove(&mut map), Err(MapError::Frozen(_))));
}

#[rstest]
fn test_clear_removes_everything() {
    let mut map: FreezableHashMap<i32, i32> = (0..5).map(|n| (n, n)).collect();
    map.clear().unwrap();

    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
    assert_eq!(map.insert(1, 1), Ok(None));
}

// =============================================================================
// Display
// =============================================================================

#[rstest]
fn test_display_empty_map() {
    let map: FreezableHashMap<i32, i32> = FreezableHashMap::new();
    assert_eq!(format!("{map}"), "{}");
}

#[rstest]
fn test_display_multiple_entries_in_order() {
    let map: FreezableHashMap<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
    assert_eq!(format!("{map}"), "{2 => two, 1 => one}");
}
