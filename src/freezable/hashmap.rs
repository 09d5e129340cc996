//! Insertion-ordered mutable hash map that can be frozen.
//!
//! This module provides [`FreezableHashMap`], a mutable map whose
//! [`delete`](FreezableHashMap::delete) operation is the centerpiece:
//!
//! - deleting a present key removes it and returns its value
//! - deleting a missing key returns `None`, or the result of a fallback that
//!   runs only on a miss
//! - deleting anything from a frozen map fails with [`FrozenError`], whether
//!   or not the key is present
//! - deleting the key currently visited by
//!   [`each_pair`](FreezableHashMap::each_pair) is safe
//!
//! # Examples
//!
//! ```rust
//! use freezemap::freezable::{FreezableHashMap, Freezable};
//!
//! let mut map: FreezableHashMap<&str, i32> = [("a", 5), ("b", 2)].into_iter().collect();
//!
//! assert_eq!(map.delete("b"), Ok(Some(2)));
//! assert_eq!(map.delete("b"), Ok(None));
//! assert_eq!(map.delete_or_else("b", || 5), Ok(5));
//!
//! map.freeze();
//! assert!(map.delete("a").is_err());
//! assert_eq!(map.get("a"), Some(&5));
//! ```
//!
//! # Internal Structure
//!
//! Entries live in a vector of slots in insertion order. A hash index maps
//! each identity hash to the slot positions holding that hash. Removing an
//! entry empties its slot (a tombstone) so that positions stay stable while
//! an [`each_pair`](FreezableHashMap::each_pair) session is running; once
//! tombstones dominate and no session is active, slots are compacted.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::iter::FromIterator;

use smallvec::SmallVec;

use super::default_value::{DefaultValue, SharedBounds};
use super::error::FrozenError;
use super::guard::{Freezable, FreezeGuard};
use super::identity::{KeyIdentity, PrehashedState, compute_hash};
use super::session::{IterationSession, Visit};

// =============================================================================
// Constants
// =============================================================================

/// Name reported by [`FrozenError`] for this container.
const TYPE_NAME: &str = "FreezableHashMap";

/// Slot count below which tombstones are never compacted.
const COMPACTION_THRESHOLD: usize = 16;

/// Slot positions sharing one identity hash.
type Bucket = SmallVec<[usize; 2]>;

// =============================================================================
// Entry Definition
// =============================================================================

/// A live entry together with its cached identity hash.
#[derive(Clone)]
struct Entry<K, V> {
    hash: u64,
    key: K,
    value: V,
}

// =============================================================================
// FreezableHashMap Definition
// =============================================================================

/// A mutable hash map that preserves insertion order and can be frozen.
///
/// Keys are hashed and compared through [`KeyIdentity`], which every
/// `Hash + Eq` type implements automatically.
///
/// # Time Complexity
///
/// | Operation      | Complexity          |
/// |----------------|---------------------|
/// | `new`          | O(1)                |
/// | `get`          | O(1) expected       |
/// | `insert`       | O(1) amortized      |
/// | `delete`       | O(1) amortized      |
/// | `contains_key` | O(1) expected       |
/// | `len`          | O(1)                |
/// | `freeze`       | O(1)                |
///
/// # Examples
///
/// ```rust
/// use freezemap::freezable::FreezableHashMap;
///
/// let mut map = FreezableHashMap::new();
/// map.insert("key".to_string(), 42).unwrap();
/// assert_eq!(map.get("key"), Some(&42));
/// ```
pub struct FreezableHashMap<K, V> {
    /// Entries in insertion order; `None` marks a tombstone
    slots: Vec<Option<Entry<K, V>>>,
    /// Identity hash to slot positions
    index: HashMap<u64, Bucket, PrehashedState>,
    /// Number of live entries
    length: usize,
    /// Provider consulted by `lookup`
    default: DefaultValue<K, V>,
    guard: FreezeGuard,
    /// Number of running iteration sessions
    iteration_level: usize,
}

impl<K, V> FreezableHashMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let map: FreezableHashMap<String, i32> = FreezableHashMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_value(DefaultValue::None)
    }

    /// Creates an empty map with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, PrehashedState::default()),
            length: 0,
            default: DefaultValue::None,
            guard: FreezeGuard::new(TYPE_NAME),
            iteration_level: 0,
        }
    }

    /// Creates an empty map whose [`lookup`](Self::lookup) answers missing
    /// keys with `default`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let mut map: FreezableHashMap<&str, i32> = FreezableHashMap::with_default(-1);
    /// assert_eq!(map.lookup(&"missing"), Some(-1));
    ///
    /// // delete never consults the default
    /// assert_eq!(map.delete("missing"), Ok(None));
    /// ```
    #[must_use]
    pub fn with_default(default: V) -> Self {
        Self::with_default_value(DefaultValue::Value(default))
    }

    /// Creates an empty map whose [`lookup`](Self::lookup) computes a value
    /// for each missing key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let map: FreezableHashMap<String, usize> =
    ///     FreezableHashMap::with_default_fn(|key: &String| key.len());
    /// assert_eq!(map.lookup(&"four".to_string()), Some(4));
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn with_default_fn<F>(function: F) -> Self
    where
        F: Fn(&K) -> V + SharedBounds,
    {
        Self::with_default_value(DefaultValue::from_fn(function))
    }

    /// Creates an empty map with the given default-value provider.
    #[must_use]
    pub fn with_default_value(default: DefaultValue<K, V>) -> Self {
        Self {
            default,
            ..Self::with_capacity(0)
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the configured default-value provider.
    #[inline]
    #[must_use]
    pub const fn default_value(&self) -> &DefaultValue<K, V> {
        &self.default
    }

    /// Replaces the default-value provider.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn set_default_value(&mut self, default: DefaultValue<K, V>) -> Result<(), FrozenError> {
        self.check_mutable("set_default_value")?;
        self.default = default;
        Ok(())
    }

    /// Returns how many [`each_pair`](Self::each_pair) sessions are running.
    #[inline]
    #[must_use]
    pub const fn iteration_level(&self) -> usize {
        self.iteration_level
    }

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen; nothing is removed.
    pub fn clear(&mut self) -> Result<(), FrozenError> {
        self.check_mutable("clear")?;
        if self.iteration_level == 0 {
            self.slots.clear();
        } else {
            self.slots.iter_mut().for_each(|slot| *slot = None);
        }
        self.index.clear();
        self.length = 0;
        Ok(())
    }

    /// Visits every entry in insertion order.
    ///
    /// The visitor receives a [`Visit`] for each live entry that existed when
    /// the enumeration began. Deleting the visited key through
    /// [`Visit::delete`] is supported: the enumeration moves on to the next
    /// key, never revisits the deleted one, and neither skips nor reorders
    /// the keys still to come.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let mut map: FreezableHashMap<&str, i32> =
    ///     [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    ///
    /// map.each_pair(|visit| {
    ///     if visit.value() % 2 == 1 {
    ///         visit.delete().unwrap();
    ///     }
    /// });
    ///
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["b"]);
    /// ```
    pub fn each_pair<F>(&mut self, mut visitor: F)
    where
        F: FnMut(Visit<'_, K, V>),
    {
        let mut session = IterationSession::begin(self);
        while let Some(visit) = session.next_visit() {
            visitor(visit);
        }
    }

    /// Returns an iterator over key-value pairs in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let map: FreezableHashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, vec![(&"a", &1), (&"b", &2)]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> FreezableHashMapIterator<'_, K, V> {
        FreezableHashMapIterator {
            slots: self.slots.iter(),
            remaining: self.length,
        }
    }

    /// Returns an iterator over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    // =========================================================================
    // Crate-internal helpers shared with the iteration session
    // =========================================================================

    pub(super) fn check_mutable(&self, operation: &'static str) -> Result<(), FrozenError> {
        self.guard.check_mutable(operation)
    }

    pub(super) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(super) fn is_occupied(&self, position: usize) -> bool {
        matches!(self.slots.get(position), Some(Some(_)))
    }

    pub(super) fn occupied(&self, position: usize) -> (&K, &V) {
        match self.slots.get(position) {
            Some(Some(entry)) => (&entry.key, &entry.value),
            _ => unreachable!("slot {position} is not occupied"),
        }
    }

    pub(super) fn occupied_mut(&mut self, position: usize) -> &mut V {
        match self.slots.get_mut(position) {
            Some(Some(entry)) => &mut entry.value,
            _ => unreachable!("slot {position} is not occupied"),
        }
    }

    pub(super) const fn enter_iteration(&mut self) {
        self.iteration_level += 1;
    }

    pub(super) fn leave_iteration(&mut self) {
        debug_assert!(self.iteration_level > 0, "no iteration session to leave");
        self.iteration_level -= 1;
        self.compact_if_sparse();
    }

    /// Empties an occupied slot and returns its value.
    pub(super) fn remove_at(&mut self, position: usize) -> V {
        let Some(entry) = self.slots.get_mut(position).and_then(Option::take) else {
            unreachable!("slot {position} is not occupied")
        };

        if let Some(bucket) = self.index.get_mut(&entry.hash) {
            bucket.retain(|candidate| *candidate != position);
            if bucket.is_empty() {
                self.index.remove(&entry.hash);
            }
        }
        self.length -= 1;

        tracing::trace!(position, remaining = self.length, "entry deleted");
        self.compact_if_sparse();
        entry.value
    }

    /// Drops tombstones once they outnumber live entries.
    ///
    /// Never runs while an iteration session is active.
    fn compact_if_sparse(&mut self) {
        if self.iteration_level > 0 {
            return;
        }
        if self.length == 0 {
            self.slots.clear();
            self.index.clear();
            return;
        }
        let tombstones = self.slots.len() - self.length;
        if self.slots.len() < COMPACTION_THRESHOLD || tombstones * 2 <= self.slots.len() {
            return;
        }

        self.slots.retain(Option::is_some);
        self.index.clear();
        for (position, slot) in self.slots.iter().enumerate() {
            if let Some(entry) = slot {
                self.index.entry(entry.hash).or_default().push(position);
            }
        }
        tracing::trace!(
            removed = tombstones,
            live = self.length,
            "compacted tombstones"
        );
    }
}

impl<K: KeyIdentity, V> FreezableHashMap<K, V> {
    /// Finds the slot position holding `key`.
    fn find_position<Q>(&self, key: &Q, hash: u64) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
    {
        self.index.get(&hash)?.iter().copied().find(|&position| {
            matches!(
                &self.slots[position],
                Some(entry) if Borrow::<Q>::borrow(&entry.key).identity_eq(key)
            )
        })
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// [`KeyIdentity`] of the borrowed form must match that of the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let mut map = FreezableHashMap::new();
    /// map.insert("hello".to_string(), 42).unwrap();
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
    {
        let position = self.find_position(key, compute_hash(key))?;
        Some(self.occupied(position).1)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut V>, FrozenError>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
    {
        self.check_mutable("get_mut")?;
        match self.find_position(key, compute_hash(key)) {
            Some(position) => Ok(Some(self.occupied_mut(position))),
            None => Ok(None),
        }
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns the stored value for `key`, or the configured default.
    ///
    /// The default is produced on demand and is not inserted.
    ///
    /// Unlike [`get`](Self::get), this takes the owned key type rather than a
    /// borrowed form: a [`DefaultValue::Compute`] provider is called with
    /// `&K`, which a `&Q` cannot supply. Use `get(key).cloned()` for a
    /// borrowed lookup without defaults.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let mut map: FreezableHashMap<&str, i32> = FreezableHashMap::with_default(0);
    /// map.insert("a", 1).unwrap();
    ///
    /// assert_eq!(map.lookup(&"a"), Some(1));
    /// assert_eq!(map.lookup(&"b"), Some(0));
    /// assert!(!map.contains_key("b"));
    ///
    /// let labels: FreezableHashMap<String, usize> =
    ///     FreezableHashMap::with_default_fn(|key: &String| key.len());
    /// assert_eq!(labels.lookup(&"three".to_string()), Some(5));
    /// assert_eq!(labels.get("three"), None);
    /// ```
    #[must_use]
    pub fn lookup(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.get(key)
            .cloned()
            .or_else(|| self.default.resolve(key))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced in place,
    /// the key keeps its position, and the old value is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let mut map = FreezableHashMap::new();
    /// assert_eq!(map.insert("key", 1), Ok(None));
    /// assert_eq!(map.insert("key", 2), Ok(Some(1)));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, FrozenError> {
        self.check_mutable("insert")?;

        let hash = compute_hash(&key);
        if let Some(position) = self.find_position(&key, hash) {
            return Ok(Some(std::mem::replace(self.occupied_mut(position), value)));
        }

        let position = self.slots.len();
        self.slots.push(Some(Entry { hash, key, value }));
        self.index.entry(hash).or_default().push(position);
        self.length += 1;
        Ok(None)
    }

    /// Inserts every pair produced by `iterator`.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen; nothing is inserted.
    pub fn try_extend<I>(&mut self, iterator: I) -> Result<(), FrozenError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.check_mutable("extend")?;
        for (key, value) in iterator {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Removes a key from the map, returning the value it held.
    ///
    /// Returns `Ok(None)` if the key is absent. The map's default-value
    /// provider is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen, whether the key is
    /// present or not and whether the map is empty or not. The map is left
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::{FreezableHashMap, Freezable};
    ///
    /// let mut map: FreezableHashMap<&str, i32> = [("a", 5), ("b", 2)].into_iter().collect();
    /// assert_eq!(map.delete("b"), Ok(Some(2)));
    /// assert_eq!(map.delete("d"), Ok(None));
    /// assert_eq!(map.len(), 1);
    ///
    /// let mut empty: FreezableHashMap<String, i32> = FreezableHashMap::new();
    /// empty.freeze();
    /// assert!(empty.delete("foo").is_err());
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<Option<V>, FrozenError>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
    {
        self.check_mutable("delete")?;
        Ok(self
            .find_position(key, compute_hash(key))
            .map(|position| self.remove_at(position)))
    }

    /// Removes a key from the map, or runs `on_missing` if it is absent.
    ///
    /// `on_missing` runs at most once, only when the key is absent, and
    /// never when the map is frozen.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::FreezableHashMap;
    ///
    /// let mut map: FreezableHashMap<&str, i32> =
    ///     [("a", 1), ("b", 10), ("c", 100)].into_iter().collect();
    ///
    /// assert_eq!(map.delete_or_else("d", || 5), Ok(5));
    /// assert_eq!(map.delete_or_else("a", || unreachable!()), Ok(1));
    /// ```
    pub fn delete_or_else<Q, F>(&mut self, key: &Q, on_missing: F) -> Result<V, FrozenError>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
        F: FnOnce() -> V,
    {
        Ok(self.delete(key)?.unwrap_or_else(on_missing))
    }
}

// =============================================================================
// Freezable Implementation
// =============================================================================

impl<K, V> Freezable for FreezableHashMap<K, V> {
    /// Freezes the map; every later mutation fails with [`FrozenError`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freezemap::freezable::{FreezableHashMap, Freezable};
    ///
    /// let mut map = FreezableHashMap::new();
    /// map.insert(1, "one").unwrap();
    /// map.freeze();
    /// map.freeze();
    ///
    /// assert!(map.is_frozen());
    /// assert!(map.insert(2, "two").is_err());
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// ```
    fn freeze(&mut self) {
        self.guard.freeze();
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.guard.is_frozen()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`FreezableHashMap`].
pub struct FreezableHashMapIterator<'a, K, V> {
    slots: std::slice::Iter<'a, Option<Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for FreezableHashMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for FreezableHashMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// An owning iterator over key-value pairs of a [`FreezableHashMap`].
pub struct FreezableHashMapIntoIterator<K, V> {
    slots: std::vec::IntoIter<Option<Entry<K, V>>>,
    remaining: usize,
}

impl<K, V> Iterator for FreezableHashMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((entry.key, entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for FreezableHashMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for FreezableHashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for FreezableHashMap<K, V> {
    /// Clones entries, default provider and frozen state.
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            index: self.index.clone(),
            length: self.length,
            default: self.default.clone(),
            guard: self.guard,
            iteration_level: 0,
        }
    }
}

impl<K: KeyIdentity, V> FromIterator<(K, V)> for FreezableHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        let iterator = iterator.into_iter();
        let mut map = Self::with_capacity(iterator.size_hint().0);
        for (key, value) in iterator {
            // A fresh map is never frozen.
            let _ = map.insert(key, value);
        }
        map
    }
}

impl<K, V> IntoIterator for FreezableHashMap<K, V> {
    type Item = (K, V);
    type IntoIter = FreezableHashMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        FreezableHashMapIntoIterator {
            slots: self.slots.into_iter(),
            remaining: self.length,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a FreezableHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = FreezableHashMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Maps are equal when they hold the same pairs; order, default provider
/// and frozen state are ignored.
impl<K: KeyIdentity, V: PartialEq> PartialEq for FreezableHashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }

        self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: KeyIdentity, V: Eq> Eq for FreezableHashMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FreezableHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for FreezableHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key} => {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Thread Safety
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(FreezableHashMap<String, i32>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(FreezableHashMap<String, i32>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for FreezableHashMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct FreezableHashMapVisitor<K, V> {
    marker: std::marker::PhantomData<(K, V)>,
}

#[cfg(feature = "serde")]
impl<K, V> FreezableHashMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for FreezableHashMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + KeyIdentity,
    V: serde::Deserialize<'de>,
{
    type Value = FreezableHashMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        use serde::de::Error;
        let mut map = FreezableHashMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value).map_err(A::Error::custom)?;
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for FreezableHashMap<K, V>
where
    K: serde::Deserialize<'de> + KeyIdentity,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(FreezableHashMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
