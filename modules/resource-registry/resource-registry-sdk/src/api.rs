//! `ResourceRegistryApi` trait definition.
//!
//! This trait defines the public API for the `resource-registry` module.
//! Resource bodies cross the boundary as `serde_json::Value`; type
//! references use the short form `name[.group][/version]`.

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::models::{ResourceList, StorageKey, StoredResource};

/// Public API trait for the `resource-registry` module.
///
/// Writes validate the body against the registered schema before any store
/// mutation; reads resolve the type reference through the registry first.
#[async_trait]
pub trait ResourceRegistryApi: Send + Sync {
    /// Creates a resource (or registers a type descriptor) from a document.
    ///
    /// System metadata (`uid`, timestamps, label/annotation maps) is
    /// populated on first write.
    ///
    /// # Errors
    ///
    /// * `Validation` - the body fails structural or schema validation
    /// * `NotFound` - no descriptor matches the document's type
    /// * `Conflict` - a descriptor's name collides across groups
    async fn create(&self, resource: serde_json::Value)
    -> Result<StoredResource, RegistryError>;

    /// Stores a resource, overwriting any existing document under the same
    /// key. Repeated identical puts produce the same stored state.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`create`](Self::create).
    async fn put(&self, resource: serde_json::Value) -> Result<StoredResource, RegistryError>;

    /// Retrieves a single resource by type reference and instance name.
    ///
    /// # Errors
    ///
    /// * `NotFound` - unknown type, unknown version, or absent instance
    /// * `AmbiguousType` - a bare name matches more than one group
    async fn get(
        &self,
        type_ref: &str,
        name: &str,
        version: Option<&str>,
    ) -> Result<StoredResource, RegistryError>;

    /// Lists all instances of a type. The reference must be plural.
    ///
    /// # Errors
    ///
    /// * `InvalidUsage` - the reference resolves to a singular name
    /// * `NotFound` - unknown type, or a type with zero stored instances
    async fn list(&self, type_ref: &str) -> Result<ResourceList, RegistryError>;

    /// Applies a partial update to an existing resource. Keys absent from
    /// the stored document are dropped, never added.
    ///
    /// # Errors
    ///
    /// * `NotFound` - the instance does not exist
    async fn patch(
        &self,
        type_ref: &str,
        name: &str,
        updates: serde_json::Value,
    ) -> Result<StoredResource, RegistryError>;

    /// Deletes a resource; deleting a type descriptor also unregisters it.
    ///
    /// # Errors
    ///
    /// * `NotFound` - nothing was stored under the resolved key
    async fn delete(&self, type_ref: &str, name: &str) -> Result<StorageKey, RegistryError>;

    /// Returns the plural names of every registered type, for discovery.
    async fn plural_names(&self) -> Result<Vec<String>, RegistryError>;
}
