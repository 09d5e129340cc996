//! Default-value providers for maps.

use std::fmt;

use super::ReferenceCounter;

#[cfg(feature = "arc")]
type SharedFunction<K, V> = ReferenceCounter<dyn Fn(&K) -> V + Send + Sync>;

#[cfg(not(feature = "arc"))]
type SharedFunction<K, V> = ReferenceCounter<dyn Fn(&K) -> V>;

/// Bounds a default-value function must satisfy to be shared by a map.
///
/// With the `arc` feature the function must be `Send + Sync` so the map can
/// cross threads; otherwise only `'static` is required.
#[cfg(feature = "arc")]
pub trait SharedBounds: Send + Sync + 'static {}

#[cfg(feature = "arc")]
impl<T: Send + Sync + 'static> SharedBounds for T {}

/// Bounds a default-value function must satisfy to be shared by a map.
///
/// With the `arc` feature the function must be `Send + Sync` so the map can
/// cross threads; otherwise only `'static` is required.
#[cfg(not(feature = "arc"))]
pub trait SharedBounds: 'static {}

#[cfg(not(feature = "arc"))]
impl<T: 'static> SharedBounds for T {}

/// What a map answers for a key it does not contain.
///
/// The provider is consulted by
/// [`FreezableHashMap::lookup`](super::FreezableHashMap::lookup) only.
/// Deletion ignores it: deleting a missing key yields `None` or the result
/// of the fallback passed to the call.
///
/// # Examples
///
/// ```rust
/// use freezemap::freezable::DefaultValue;
///
/// let constant: DefaultValue<String, usize> = DefaultValue::Value(0);
/// assert_eq!(constant.resolve(&"missing".to_string()), Some(0));
///
/// let computed: DefaultValue<String, usize> = DefaultValue::from_fn(|key: &String| key.len());
/// assert_eq!(computed.resolve(&"missing".to_string()), Some(7));
///
/// let none: DefaultValue<String, usize> = DefaultValue::None;
/// assert_eq!(none.resolve(&"missing".to_string()), None);
/// ```
pub enum DefaultValue<K, V> {
    /// No default; missing keys yield `None`.
    None,
    /// A constant returned for every missing key.
    Value(V),
    /// A computation invoked with the missing key.
    Compute(SharedFunction<K, V>),
}

impl<K, V> DefaultValue<K, V> {
    /// Creates a provider that computes the default from the missing key.
    pub fn from_fn<F>(function: F) -> Self
    where
        F: Fn(&K) -> V + SharedBounds,
    {
        Self::Compute(ReferenceCounter::new(function))
    }

    /// Returns `true` if no default is configured.
    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Produces the default for `key`, if any.
    #[must_use]
    pub fn resolve(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        match self {
            Self::None => None,
            Self::Value(value) => Some(value.clone()),
            Self::Compute(function) => Some(function(key)),
        }
    }
}

impl<K, V> Default for DefaultValue<K, V> {
    #[inline]
    fn default() -> Self {
        Self::None
    }
}

impl<K, V: Clone> Clone for DefaultValue<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Value(value) => Self::Value(value.clone()),
            Self::Compute(function) => Self::Compute(ReferenceCounter::clone(function)),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for DefaultValue<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => formatter.write_str("None"),
            Self::Value(value) => formatter.debug_tuple("Value").field(value).finish(),
            Self::Compute(_) => formatter.write_str("Compute(<function>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_default_is_none() {
        let provider: DefaultValue<i32, i32> = DefaultValue::default();
        assert!(provider.is_none());
        assert_eq!(provider.resolve(&1), None);
    }

    #[rstest]
    fn test_compute_receives_missing_key() {
        let provider: DefaultValue<i32, i32> = DefaultValue::from_fn(|key: &i32| key * 10);
        assert_eq!(provider.resolve(&4), Some(40));
    }

    #[cfg(not(feature = "arc"))]
    #[rstest]
    fn test_clone_shares_function() {
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = std::rc::Rc::clone(&calls);
        let provider: DefaultValue<i32, i32> = DefaultValue::from_fn(move |_: &i32| {
            counter.set(counter.get() + 1);
            0
        });
        let cloned = provider.clone();

        let _ = provider.resolve(&1);
        let _ = cloned.resolve(&2);
        assert_eq!(calls.get(), 2);
    }

    #[rstest]
    fn test_debug_hides_function() {
        let provider: DefaultValue<i32, i32> = DefaultValue::from_fn(|_: &i32| 0);
        assert_eq!(format!("{provider:?}"), "Compute(<function>)");
        let constant: DefaultValue<i32, i32> = DefaultValue::Value(3);
        assert_eq!(format!("{constant:?}"), "Value(3)");
    }
}
