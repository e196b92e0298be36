//! Domain error types for the Resource Registry module.

use resource_registry_sdk::RegistryError;
use thiserror::Error;

use crate::infra::storage::StoreError;

/// Domain-level errors for the Resource Registry module.
///
/// Mirrors the public [`RegistryError`] taxonomy; the REST layer maps these
/// onto problem responses, the local client converts them via `From`.
#[derive(Error, Debug)]
pub enum DomainError {
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

    /// Structural or schema-specific violation, with a field path.
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

    /// Backing store unreachable or timed out; never retried internally.
    #[error("store unavailable during {op} on '{key}': {reason}")]
    StoreUnavailable {
        /// The store operation that failed.
        op: String,
        /// The key or prefix being operated on.
        key: String,
        /// Underlying failure description.
        reason: String,
    },

    /// Invariant violation.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
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

    /// Wraps a store failure with the operation and key it happened on.
    #[must_use]
    pub fn store(op: &str, key: &str, err: StoreError) -> Self {
        Self::StoreUnavailable {
            op: op.to_owned(),
            key: key.to_owned(),
            reason: err.to_string(),
        }
    }
}

impl From<DomainError> for RegistryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => RegistryError::NotFound(what),
            DomainError::AmbiguousType { name, groups } => {
                RegistryError::AmbiguousType { name, groups }
            }
            DomainError::Conflict(msg) => RegistryError::Conflict(msg),
            DomainError::Validation { path, reason } => RegistryError::Validation { path, reason },
            DomainError::InvalidUsage(msg) => RegistryError::InvalidUsage(msg),
            DomainError::StoreUnavailable { op, key, reason } => {
                RegistryError::StoreUnavailable { op, key, reason }
            }
            DomainError::Internal(e) => RegistryError::Internal(e.to_string()),
        }
    }
}
