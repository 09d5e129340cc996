//! Key identity capability.
//!
//! A map needs two things from a key: a hash and an equality test. Rather
//! than requiring keys to implement [`Hash`] and [`Eq`] publicly, the map
//! goes through [`KeyIdentity`]. Every `Hash + Eq` type gets the capability
//! for free; a type that wants its hashing to stay private implements
//! `KeyIdentity` by hand and keeps its helpers out of its public API.
//!
//! # Examples
//!
//! ```rust
//! use std::hash::Hasher;
//! use freezemap::freezable::{FreezableHashMap, KeyIdentity};
//!
//! struct Ticket {
//!     serial: u64,
//! }
//!
//! impl Ticket {
//!     fn fingerprint(&self) -> u64 {
//!         self.serial.rotate_left(7)
//!     }
//! }
//!
//! impl KeyIdentity for Ticket {
//!     fn identity_hash<H: Hasher>(&self, state: &mut H) {
//!         state.write_u64(self.fingerprint());
//!     }
//!
//!     fn identity_eq(&self, other: &Self) -> bool {
//!         self.serial == other.serial
//!     }
//! }
//!
//! let mut map = FreezableHashMap::new();
//! map.insert(Ticket { serial: 9 }, "nine").unwrap();
//! assert_eq!(map.delete(&Ticket { serial: 9 }), Ok(Some("nine")));
//! ```
//!
//! # Hash Function Selection
//!
//! - default: `DefaultHasher` (SipHash-1-3)
//! - `fxhash`: `rustc_hash::FxHasher`
//! - `ahash`: `ahash::AHasher` with fixed seeds
//!
//! All three are deterministic within a process. If both `fxhash` and
//! `ahash` are enabled, `fxhash` takes precedence.

use std::hash::{BuildHasherDefault, Hash, Hasher};

/// Capability through which a container hashes and compares keys.
///
/// # Laws
///
/// - **Consistency**: `a.identity_eq(b)` implies that `a` and `b` feed the
///   same bytes to `identity_hash`.
/// - **Equivalence**: `identity_eq` is reflexive, symmetric and transitive.
/// - **Borrow agreement**: when a map of `K` is queried with `&Q` where
///   `K: Borrow<Q>`, `Q`'s capability must agree with `K`'s.
pub trait KeyIdentity {
    /// Feeds this key's identity into `state`.
    fn identity_hash<H: Hasher>(&self, state: &mut H);

    /// Returns `true` if `self` and `other` denote the same key.
    fn identity_eq(&self, other: &Self) -> bool;
}

impl<T: Hash + Eq + ?Sized> KeyIdentity for T {
    #[inline]
    fn identity_hash<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }

    #[inline]
    fn identity_eq(&self, other: &Self) -> bool {
        self == other
    }
}

// =============================================================================
// Hash computation
// =============================================================================

#[cfg(feature = "fxhash")]
#[inline]
fn new_hasher() -> rustc_hash::FxHasher {
    rustc_hash::FxHasher::default()
}

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
#[inline]
fn new_hasher() -> ahash::AHasher {
    use std::hash::BuildHasher;
    ahash::RandomState::with_seeds(
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    )
    .build_hasher()
}

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
#[inline]
fn new_hasher() -> std::collections::hash_map::DefaultHasher {
    std::collections::hash_map::DefaultHasher::new()
}

/// Computes the identity hash of a key with the configured hash function.
pub(crate) fn compute_hash<Q: KeyIdentity + ?Sized>(key: &Q) -> u64 {
    let mut hasher = new_hasher();
    key.identity_hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Index hashing
// =============================================================================

/// Hasher for keys that already are identity hashes.
///
/// A `u64` written to it is returned unchanged by `finish`.
#[derive(Default)]
pub(crate) struct PrehashedHasher {
    value: u64,
}

impl Hasher for PrehashedHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.value
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.value = self.value.rotate_left(8) ^ u64::from(byte);
        }
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.value = value;
    }
}

/// `BuildHasher` for tables keyed by identity hashes.
pub(crate) type PrehashedState = BuildHasherDefault<PrehashedHasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct OpaqueKey {
        label: &'static str,
    }

    impl OpaqueKey {
        fn digest(&self) -> usize {
            self.label.len()
        }
    }

    impl KeyIdentity for OpaqueKey {
        fn identity_hash<H: Hasher>(&self, state: &mut H) {
            state.write_usize(self.digest());
            state.write(self.label.as_bytes());
        }

        fn identity_eq(&self, other: &Self) -> bool {
            self.label == other.label
        }
    }

    #[rstest]
    fn test_compute_hash_is_deterministic() {
        assert_eq!(compute_hash("key"), compute_hash("key"));
        assert_eq!(compute_hash(&42_u32), compute_hash(&42_u32));
    }

    #[rstest]
    fn test_borrowed_form_hashes_like_owned() {
        let owned = "key".to_string();
        assert_eq!(compute_hash(&owned), compute_hash("key"));
    }

    #[rstest]
    fn test_blanket_identity_eq_matches_eq() {
        assert!(1_i32.identity_eq(&1));
        assert!(!1_i32.identity_eq(&2));
    }

    #[rstest]
    fn test_prehashed_hasher_passes_hash_through() {
        use std::hash::BuildHasher;

        let hash = compute_hash("key");
        assert_eq!(PrehashedState::default().hash_one(hash), hash);
    }

    #[rstest]
    fn test_hand_written_capability() {
        let first = OpaqueKey { label: "alpha" };
        let second = OpaqueKey { label: "alpha" };
        let third = OpaqueKey { label: "beta" };

        assert!(first.identity_eq(&second));
        assert!(!first.identity_eq(&third));
        assert_eq!(compute_hash(&first), compute_hash(&second));
    }
}
