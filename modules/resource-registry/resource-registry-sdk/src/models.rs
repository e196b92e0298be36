//! Public models for the `resource-registry` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `resource-registry` module and its consumers. Resource bodies
//! themselves stay `serde_json::Value` at the boundary; the descriptor types
//! here are produced by validating such a document once on registration.

use serde::{Deserialize, Serialize};

/// Naming facets of a registered resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNames {
    /// Display name of the kind, e.g. `System`.
    pub kind: String,
    /// Plural reference name, e.g. `systems`. Unique across all groups.
    pub plural: String,
    /// Singular reference name, e.g. `system`. Unique across all groups.
    pub singular: String,
}

/// One named schema version of a type descriptor.
///
/// The wire field for the format tag is `schemaVersion`, kept from the
/// original document layout. Only a single tag is recognized; any other
/// value is rejected at validation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSchema {
    /// Version name, e.g. `v1alpha1`.
    pub name: String,
    /// Schema format tag; must equal the single supported format.
    #[serde(rename = "schemaVersion")]
    pub schema_format: String,
    /// The validation schema applied to `{"spec": ...}` bodies.
    pub schema: serde_json::Value,
}

/// A registered resource kind.
///
/// Identity is `(group, names.singular)`. The version sequence is ordered:
/// the last entry is the newest (append order, not a semver comparison).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// API group qualifying the type, e.g. `catcode.io`.
    pub group: String,
    /// Kind, plural, and singular names.
    pub names: TypeNames,
    /// Ordered, non-empty sequence of schema versions.
    pub versions: Vec<VersionSchema>,
}

impl TypeDescriptor {
    /// Returns the newest version schema (last in append order).
    #[must_use]
    pub fn latest_version(&self) -> Option<&VersionSchema> {
        self.versions.last()
    }

    /// Returns the version schema with the given exact name.
    #[must_use]
    pub fn version(&self, name: &str) -> Option<&VersionSchema> {
        self.versions.iter().find(|v| v.name == name)
    }
}

/// A deterministic, slash-delimited key-value store path.
///
/// Derived only from a resource's type identity and instance name, never
/// from arbitrary user input; all instances of a type share a common
/// prefix, which is what makes prefix-scan listing correct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Builds a key from pre-derived path segments.
    #[must_use]
    pub fn from_segments(segments: &[&str]) -> Self {
        Self(format!("/{}", segments.join("/")))
    }

    /// Wraps a canonical key read back from the store.
    #[must_use]
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a raw string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extends this key with a trailing instance segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}/{segment}", self.0))
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}

/// A stored resource document together with its canonical key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResource {
    /// Canonical storage key the document lives under.
    pub key: StorageKey,
    /// The stored document, system metadata included.
    pub value: serde_json::Value,
}

impl StoredResource {
    /// Creates a new stored-resource pair.
    #[must_use]
    pub fn new(key: StorageKey, value: serde_json::Value) -> Self {
        Self { key, value }
    }
}

/// An ordered listing of all stored instances under one type prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceList {
    /// Items in lexicographic key order.
    pub items: Vec<StoredResource>,
    /// Number of items returned.
    pub count: usize,
}

impl ResourceList {
    /// Wraps an ordered item sequence.
    #[must_use]
    pub fn new(items: Vec<StoredResource>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}
