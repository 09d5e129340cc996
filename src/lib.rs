//! # freezemap
//!
//! An insertion-ordered, mutable hash map that can be frozen.
//!
//! ## Overview
//!
//! The crate provides [`FreezableHashMap`](freezable::FreezableHashMap), a map
//! whose `delete` operation is built around a small set of guarantees:
//!
//! - **Deletion**: removing a key returns the value it held; missing keys yield
//!   `None` or the result of a lazily invoked fallback.
//! - **Freezing**: once frozen, every structural mutation fails with
//!   [`FrozenError`](freezable::FrozenError).
//! - **Iteration-safe removal**: the key currently visited by
//!   [`each_pair`](freezable::FreezableHashMap::each_pair) may be deleted from
//!   inside the visitor.
//! - **Key identity capability**: keys are hashed and compared through
//!   [`KeyIdentity`](freezable::KeyIdentity), so types that keep their hashing
//!   private can still be used as keys.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for the map
//! - `arc`: share default-value providers through `Arc` instead of `Rc`
//! - `fxhash`: hash keys with `FxHasher`
//! - `ahash`: hash keys with `AHasher`
//! - `full`: `serde` and `arc`
//!
//! ## Example
//!
//! ```rust
//! use freezemap::prelude::*;
//!
//! let mut map: FreezableHashMap<&str, i32> = [("a", 5), ("b", 2)].into_iter().collect();
//! assert_eq!(map.delete("b"), Ok(Some(2)));
//! assert_eq!(map.delete_or_else("z", || 0), Ok(0));
//!
//! map.freeze();
//! assert!(map.delete("a").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use freezemap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::freezable::*;
}

pub mod freezable;
