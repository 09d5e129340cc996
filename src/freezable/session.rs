//! Iteration sessions over a [`FreezableHashMap`].
//!
//! A session walks the slot positions that existed when it began, in
//! insertion order. Removal leaves a tombstone in place and compaction is
//! deferred until the last session ends, so positions never shift under a
//! running session. Deleting the key being visited therefore moves the walk
//! on to the next live entry without revisiting or skipping anything.

use std::borrow::Borrow;
use std::ops::Deref;

use super::default_value::DefaultValue;
use super::error::FrozenError;
use super::hashmap::FreezableHashMap;
use super::identity::KeyIdentity;

/// The traversal context of a running [`FreezableHashMap::each_pair`].
///
/// Dropping the session, including during unwinding, ends it.
pub(super) struct IterationSession<'a, K, V> {
    map: &'a mut FreezableHashMap<K, V>,
    cursor: usize,
    end: usize,
}

impl<'a, K, V> IterationSession<'a, K, V> {
    /// Starts a session over the entries currently in `map`.
    pub(super) fn begin(map: &'a mut FreezableHashMap<K, V>) -> Self {
        map.enter_iteration();
        let end = map.slot_count();
        Self {
            map,
            cursor: 0,
            end,
        }
    }

    /// Advances to the next live entry of the snapshot.
    pub(super) fn next_visit(&mut self) -> Option<Visit<'_, K, V>> {
        while self.cursor < self.end {
            let position = self.cursor;
            self.cursor += 1;
            if self.map.is_occupied(position) {
                return Some(Visit {
                    map: &mut *self.map,
                    position,
                });
            }
        }
        None
    }
}

impl<K, V> Drop for IterationSession<'_, K, V> {
    fn drop(&mut self) {
        self.map.leave_iteration();
    }
}

/// A single step of [`FreezableHashMap::each_pair`].
///
/// A `Visit` always refers to a live entry. The entry can be read, updated
/// in place, or deleted with [`Visit::delete`]; deleting it is the supported
/// way to remove keys while enumerating.
///
/// # Examples
///
/// ```rust
/// use freezemap::freezable::FreezableHashMap;
///
/// let mut map: FreezableHashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
/// let mut visited = Vec::new();
///
/// map.each_pair(|visit| {
///     visited.push(*visit.key());
///     visit.delete().unwrap();
/// });
///
/// assert_eq!(visited, vec!["a", "b"]);
/// assert!(map.is_empty());
/// ```
pub struct Visit<'a, K, V> {
    map: &'a mut FreezableHashMap<K, V>,
    position: usize,
}

impl<'a, K, V> Visit<'a, K, V> {
    /// Returns the key being visited.
    #[must_use]
    pub fn key(&self) -> &K {
        self.map.occupied(self.position).0
    }

    /// Returns the value being visited.
    #[must_use]
    pub fn value(&self) -> &V {
        self.map.occupied(self.position).1
    }

    /// Returns the key and value being visited.
    #[must_use]
    pub fn entry(&self) -> (&K, &V) {
        self.map.occupied(self.position)
    }

    /// Returns a mutable reference to the value being visited.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn value_mut(&mut self) -> Result<&mut V, FrozenError> {
        self.map.check_mutable("value_mut")?;
        Ok(self.map.occupied_mut(self.position))
    }

    /// Deletes the key being visited and returns its value.
    ///
    /// The enumeration continues with the next key of the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen; the entry is kept.
    pub fn delete(self) -> Result<V, FrozenError> {
        self.map.check_mutable("delete")?;
        Ok(self.map.remove_at(self.position))
    }

    /// Gives up the visit in exchange for access to the whole map.
    ///
    /// Only deletion of the visited key is guaranteed to leave the
    /// enumeration intact. Deleting other keys or inserting new ones from
    /// inside a session is not covered by that guarantee; keys inserted
    /// while the session runs are not visited by it.
    #[must_use]
    pub fn into_map(self) -> SessionMap<'a, K, V> {
        SessionMap { map: self.map }
    }
}

// =============================================================================
// SessionMap Definition
// =============================================================================

/// The map as seen from inside a running [`FreezableHashMap::each_pair`].
///
/// Reads go through [`Deref`]. Mutations are limited to the map's own
/// operations: the session belongs to this map, so the map itself can never
/// be moved out or replaced while the session runs.
///
/// ```rust,compile_fail
/// use freezemap::freezable::FreezableHashMap;
///
/// let mut map: FreezableHashMap<i32, i32> = [(1, 1)].into_iter().collect();
/// map.each_pair(|visit| {
///     let mut inner = visit.into_map();
///     let _ = std::mem::take(&mut *inner);
/// });
/// ```
pub struct SessionMap<'a, K, V> {
    map: &'a mut FreezableHashMap<K, V>,
}

impl<K, V> SessionMap<'_, K, V> {
    /// Removes every entry; the running enumeration ends after this visit.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn clear(&mut self) -> Result<(), FrozenError> {
        self.map.clear()
    }

    /// Replaces the default-value provider.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn set_default_value(&mut self, default: DefaultValue<K, V>) -> Result<(), FrozenError> {
        self.map.set_default_value(default)
    }

    /// Starts a nested enumeration; see [`FreezableHashMap::each_pair`].
    pub fn each_pair<F>(&mut self, visitor: F)
    where
        F: FnMut(Visit<'_, K, V>),
    {
        self.map.each_pair(visitor);
    }
}

impl<K: KeyIdentity, V> SessionMap<'_, K, V> {
    /// See [`FreezableHashMap::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, FrozenError> {
        self.map.insert(key, value)
    }

    /// See [`FreezableHashMap::get_mut`].
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut V>, FrozenError>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
    {
        self.map.get_mut(key)
    }

    /// See [`FreezableHashMap::delete`].
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<Option<V>, FrozenError>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
    {
        self.map.delete(key)
    }

    /// See [`FreezableHashMap::delete_or_else`].
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the map is frozen.
    pub fn delete_or_else<Q, F>(&mut self, key: &Q, on_missing: F) -> Result<V, FrozenError>
    where
        K: Borrow<Q>,
        Q: KeyIdentity + ?Sized,
        F: FnOnce() -> V,
    {
        self.map.delete_or_else(key, on_missing)
    }
}

impl<K, V> Deref for SessionMap<'_, K, V> {
    type Target = FreezableHashMap<K, V>;

    fn deref(&self) -> &Self::Target {
        self.map
    }
}
