//! Immutability guard for freezable containers.
//!
//! A container owns a [`FreezeGuard`] and asks it for permission at the
//! start of every structural mutation. The guard has two states:
//!
//! ```text
//! Mutable --freeze()--> Frozen
//! ```
//!
//! `Frozen` is terminal; there is no way back to `Mutable`.

use super::error::FrozenError;

/// Types that can be switched into a read-only terminal state.
///
/// # Laws
///
/// - **Irreversibility**: after `freeze()`, `is_frozen()` returns `true` for
///   the rest of the instance's lifetime.
/// - **Idempotence**: calling `freeze()` on a frozen instance is a no-op.
pub trait Freezable {
    /// Moves the instance into the frozen state.
    fn freeze(&mut self);

    /// Returns `true` if the instance has been frozen.
    fn is_frozen(&self) -> bool;
}

/// Tracks whether a container has been frozen.
///
/// # Examples
///
/// ```rust
/// use freezemap::freezable::{Freezable, FreezeGuard};
///
/// let mut guard = FreezeGuard::new("Registry");
/// assert!(guard.check_mutable("insert").is_ok());
///
/// guard.freeze();
/// let error = guard.check_mutable("insert").unwrap_err();
/// assert_eq!(error.type_name, "Registry");
/// assert_eq!(error.operation, "insert");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezeGuard {
    type_name: &'static str,
    frozen: bool,
}

impl FreezeGuard {
    /// Creates a guard in the mutable state for the named container type.
    #[inline]
    #[must_use]
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            frozen: false,
        }
    }

    /// Returns the container type name reported in errors.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Checks that `operation` may mutate the container.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError`] if the guard is frozen.
    #[inline]
    pub fn check_mutable(&self, operation: &'static str) -> Result<(), FrozenError> {
        if self.frozen {
            tracing::debug!(
                type_name = self.type_name,
                operation,
                "rejected mutation of frozen container"
            );
            Err(FrozenError {
                type_name: self.type_name,
                operation,
            })
        } else {
            Ok(())
        }
    }
}

impl Freezable for FreezeGuard {
    fn freeze(&mut self) {
        if !self.frozen {
            tracing::debug!(type_name = self.type_name, "container frozen");
            self.frozen = true;
        }
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.frozen
    }
}
