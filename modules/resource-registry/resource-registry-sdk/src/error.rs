//! Error taxonomy for the `resource-registry` module.
//!
//! Every error carries a stable kind and a human-readable message; no
//! operation returns a partially-applied result. `StoreUnavailable` is
//! distinct from `NotFound`: it signals transient infrastructure failure,
//! not an absent document.

use thiserror::Error;

/// Public errors surfaced by the `resource-registry` module.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Unknown type, missing instance, or missing schema version.
    #[error("not found: {0}")]
    NotFound(String),

    /// A bare type name matched descriptors from more than one group.
    #[error("ambiguous type reference '{name}' matches groups: {}", groups.join(", "))]
    AmbiguousType {
        /// The bare name that was looked up.
        name: String,
        /// All groups the name is bound to.
        groups: Vec<String>,
    },

    /// Cross-group name collision on registration.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Structural or schema-specific violation.
    #[error("validation failed at '{path}': {reason}")]
    Validation {
        /// Field path of the violated constraint.
        path: String,
        /// Why the constraint was violated.
        reason: String,
    },

    /// Singular reference used where plural is required, or vice versa.
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    /// Backing store unreachable or timed out.
    #[error("store unavailable during {op} on '{key}': {reason}")]
    StoreUnavailable {
        /// The store operation that failed.
        op: String,
        /// The key or prefix being operated on.
        key: String,
        /// Underlying failure description.
        reason: String,
    },

    /// Invariant violation inside the registry.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a `Validation` error with a field path and reason.
    #[must_use]
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidUsage` error.
    #[must_use]
    pub fn invalid_usage(message: impl Into<String>) -> Self {
        Self::InvalidUsage(message.into())
    }

    /// Returns `true` if this is a `NotFound` error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` if this is an `AmbiguousType` error.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousType { .. })
    }

    /// Returns `true` if this is a `Conflict` error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns `true` if this is a `Validation` error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` if this is an `InvalidUsage` error.
    #[must_use]
    pub fn is_invalid_usage(&self) -> bool {
        matches!(self, Self::InvalidUsage(_))
    }

    /// Returns `true` if this is a `StoreUnavailable` error.
    #[must_use]
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_and_predicates() {
        assert!(RegistryError::not_found("system").is_not_found());
        assert!(RegistryError::conflict("name taken").is_conflict());
        assert!(RegistryError::validation("/spec/owner", "required").is_validation());
        assert!(RegistryError::invalid_usage("plural required").is_invalid_usage());
    }

    #[test]
    fn test_display_carries_context() {
        let err = RegistryError::validation("/spec/owner", "'owner' is a required property");
        assert_eq!(
            err.to_string(),
            "validation failed at '/spec/owner': 'owner' is a required property"
        );

        let err = RegistryError::StoreUnavailable {
            op: "put".to_owned(),
            key: "/registry/catcode.io/system/test".to_owned(),
            reason: "connection refused".to_owned(),
        };
        assert!(err.to_string().contains("put"));
        assert!(err.to_string().contains("/registry/catcode.io/system/test"));
    }

    #[test]
    fn test_ambiguous_lists_all_groups() {
        let err = RegistryError::AmbiguousType {
            name: "system".to_owned(),
            groups: vec!["catcode.io".to_owned(), "other.io".to_owned()],
        };
        assert!(err.is_ambiguous());
        assert!(err.to_string().contains("catcode.io, other.io"));
    }
}
