//! Error types for freezable containers.
//!
//! Missing keys are never reported as errors. The only failure a map
//! operation can produce is an attempt to mutate a frozen instance.

/// Represents an attempt to mutate a frozen container.
///
/// The error is raised before the operation does any other work, so the
/// container is left exactly as it was.
///
/// # Examples
///
/// ```rust
/// use freezemap::freezable::FrozenError;
///
/// let error = FrozenError {
///     type_name: "FreezableHashMap",
///     operation: "delete",
/// };
/// assert_eq!(
///     format!("{}", error),
///     "FreezableHashMap::delete: can't modify frozen map"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrozenError {
    /// The name of the container type that rejected the mutation.
    pub type_name: &'static str,
    /// The name of the rejected operation.
    pub operation: &'static str,
}

impl std::fmt::Display for FrozenError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}::{}: can't modify frozen map",
            self.type_name, self.operation
        )
    }
}

impl std::error::Error for FrozenError {}

/// Represents errors that can occur when operating on a map.
///
/// Callers that aggregate failures from several containers can convert a
/// [`FrozenError`] into this type with `?`.
///
/// # Examples
///
/// ```rust
/// use freezemap::freezable::{FreezableHashMap, Freezable, MapError};
///
/// fn drain_one(map: &mut FreezableHashMap<String, i32>) -> Result<Option<i32>, MapError> {
///     Ok(map.delete("one")?)
/// }
///
/// let mut map = FreezableHashMap::new();
/// map.insert("one".to_string(), 1).unwrap();
/// map.freeze();
/// assert!(matches!(drain_one(&mut map), Err(MapError::Frozen(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A mutation was attempted on a frozen map.
    Frozen(FrozenError),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frozen(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Frozen(error) => Some(error),
        }
    }
}

impl From<FrozenError> for MapError {
    fn from(error: FrozenError) -> Self {
        Self::Frozen(error)
    }
}
