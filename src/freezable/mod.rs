//! Freezable containers.
//!
//! This module provides [`FreezableHashMap`], a mutable hash map that keeps
//! insertion order and can be switched into a read-only state, together with
//! the collaborators it owns:
//!
//! - [`FreezeGuard`] and the [`Freezable`] trait: the one-way
//!   `Mutable -> Frozen` state machine checked by every mutation
//! - [`Visit`] and [`SessionMap`]: snapshot-based enumeration that
//!   tolerates deletion of the visited key
//! - [`KeyIdentity`]: the capability through which keys are hashed and
//!   compared
//! - [`DefaultValue`]: what [`FreezableHashMap::lookup`] answers for missing
//!   keys
//!
//! # Examples
//!
//! ## Deletion
//!
//! ```rust
//! use freezemap::freezable::FreezableHashMap;
//!
//! let mut map: FreezableHashMap<&str, i32> = [("a", 5), ("b", 2)].into_iter().collect();
//!
//! assert_eq!(map.delete("b"), Ok(Some(2)));
//! assert_eq!(map.delete("b"), Ok(None));
//! assert_eq!(map.delete_or_else("b", || 7), Ok(7));
//! assert_eq!(map.len(), 1);
//! ```
//!
//! ## Freezing
//!
//! ```rust
//! use freezemap::freezable::{FreezableHashMap, Freezable};
//!
//! let mut map: FreezableHashMap<String, i32> = FreezableHashMap::new();
//! map.freeze();
//!
//! let error = map.delete("foo").unwrap_err();
//! assert_eq!(error.operation, "delete");
//! ```
//!
//! ## Deleting while enumerating
//!
//! ```rust
//! use freezemap::freezable::FreezableHashMap;
//!
//! let mut map: FreezableHashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
//! let mut visited = Vec::new();
//!
//! map.each_pair(|visit| {
//!     visited.push(*visit.key());
//!     visit.delete().unwrap();
//! });
//!
//! assert_eq!(visited, vec!["a", "b"]);
//! assert!(map.is_empty());
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod default_value;
mod error;
mod guard;
mod hashmap;
mod identity;
mod session;

pub use default_value::DefaultValue;
pub use default_value::SharedBounds;
pub use error::FrozenError;
pub use error::MapError;
pub use guard::Freezable;
pub use guard::FreezeGuard;
pub use hashmap::FreezableHashMap;
pub use hashmap::FreezableHashMapIntoIterator;
pub use hashmap::FreezableHashMapIterator;
pub use identity::KeyIdentity;
pub use session::SessionMap;
pub use session::Visit;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = ReferenceCounter::clone(&reference_counter);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
