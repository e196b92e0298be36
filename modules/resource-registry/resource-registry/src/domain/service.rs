//! Resource store facade: schema-validated CRUD over the abstract kv store.
//!
//! Validation and resolution always run before any store mutation, so
//! writes are all-or-nothing at the single-key level. There are no
//! cross-key transactions: a descriptor create registers the type in the
//! in-memory registry and then persists the document as two separate
//! steps; the startup rebuild compensates for the window between them.

use std::sync::Arc;

use chrono::Utc;
use resource_registry_sdk::{ResourceList, StorageKey, StoredResource, TypeDescriptor};
use serde_json::{Value, json};
use uuid::Uuid;

use super::error::DomainError;
use super::keys::KeyResolver;
use super::merge;
use super::registry::TypeRegistry;
use super::validate::SchemaValidator;
use crate::config::ResourceRegistryConfig;
use crate::infra::storage::KvStore;

/// Domain service orchestrating registry, resolver, validator, and store.
pub struct ResourceService {
    registry: Arc<TypeRegistry>,
    resolver: KeyResolver,
    validator: SchemaValidator,
    store: Arc<dyn KvStore>,
    config: ResourceRegistryConfig,
}

impl ResourceService {
    /// Creates a new service over the given store.
    #[must_use]
    pub fn new(
        registry: Arc<TypeRegistry>,
        validator: SchemaValidator,
        store: Arc<dyn KvStore>,
        config: ResourceRegistryConfig,
    ) -> Self {
        let resolver = KeyResolver::new(registry.clone(), config.clone());
        Self {
            registry,
            resolver,
            validator,
            store,
            config,
        }
    }

    /// The key resolver, shared with callers that only need resolution.
    #[must_use]
    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    /// Rebuilds the in-memory registry by scanning the persisted
    /// meta-namespace. Run once at startup; returns the number of
    /// descriptors restored.
    pub async fn rebuild_registry(&self) -> Result<usize, DomainError> {
        let prefix = self.resolver.descriptor_prefix();
        // Trailing slash keeps the scan from bleeding into sibling
        // namespaces that merely share a string prefix.
        let scan = format!("{prefix}/");
        let entries = self
            .store
            .get_prefix(&scan)
            .await
            .map_err(|e| DomainError::store("get_prefix", prefix.as_str(), e))?;

        let mut restored = 0;
        for (key, raw) in entries {
            let document: Value = match serde_json::from_str(&raw) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(%key, error = %e, "skipping unparseable type descriptor");
                    continue;
                }
            };
            match Self::descriptor_from_document(&document) {
                Ok(descriptor) => {
                    self.registry.restore(descriptor);
                    restored += 1;
                }
                Err(e) => {
                    tracing::warn!(%key, error = %e, "skipping malformed type descriptor");
                }
            }
        }
        tracing::info!(restored, "type registry rebuilt from store");
        Ok(restored)
    }

    /// Creates a resource. System metadata is stamped fresh.
    pub async fn create(&self, resource: Value) -> Result<StoredResource, DomainError> {
        self.write(resource, true).await
    }

    /// Stores a resource, overwriting any existing document under the same
    /// key. `uid` and `creationTimestamp` of an existing record survive;
    /// `updatedTimestamp` refreshes.
    pub async fn put(&self, resource: Value) -> Result<StoredResource, DomainError> {
        self.write(resource, false).await
    }

    /// Retrieves a single resource by type reference and instance name.
    pub async fn get(
        &self,
        type_ref: &str,
        name: &str,
        version: Option<&str>,
    ) -> Result<StoredResource, DomainError> {
        let resolved = self.resolver.resolve_instance(type_ref, name, version)?;
        let raw = self
            .store
            .get(resolved.key.as_str())
            .await
            .map_err(|e| DomainError::store("get", resolved.key.as_str(), e))?
            .ok_or_else(|| DomainError::not_found(format!("no resource at {}", resolved.key)))?;
        let value = Self::parse_stored(&resolved.key, &raw)?;
        Ok(StoredResource::new(resolved.key, value))
    }

    /// Lists all instances of a type, in lexicographic key order.
    ///
    /// The reference must be plural; a registered type with zero stored
    /// instances is reported as `NotFound` (inherited behavior, see
    /// DESIGN.md).
    pub async fn list(&self, type_ref: &str) -> Result<ResourceList, DomainError> {
        let (prefix, plural) = self.resolver.resolve_prefix(type_ref)?;
        if !plural {
            return Err(DomainError::invalid_usage(format!(
                "list requires a plural type reference, got '{type_ref}'"
            )));
        }

        let scan = format!("{prefix}/");
        let entries = self
            .store
            .get_prefix(&scan)
            .await
            .map_err(|e| DomainError::store("get_prefix", prefix.as_str(), e))?;
        if entries.is_empty() {
            return Err(DomainError::not_found(format!(
                "no resources under {prefix}"
            )));
        }

        let mut items = Vec::with_capacity(entries.len());
        for (key, raw) in entries {
            let key = StorageKey::from_raw(key);
            let value = Self::parse_stored(&key, &raw)?;
            items.push(StoredResource::new(key, value));
        }
        Ok(ResourceList::new(items))
    }

    /// Applies a partial update to an existing resource: read, merge with
    /// the field-preserving rule, write back through `put`.
    pub async fn patch(
        &self,
        type_ref: &str,
        name: &str,
        updates: Value,
    ) -> Result<StoredResource, DomainError> {
        let current = self.get(type_ref, name, None).await?;
        let merged = merge::merge(&current.value, &updates);
        self.put(merged).await
    }

    /// Deletes a resource; deleting a type descriptor also removes it from
    /// the registry.
    pub async fn delete(&self, type_ref: &str, name: &str) -> Result<StorageKey, DomainError> {
        let resolved = self.resolver.resolve_instance(type_ref, name, None)?;
        let deleted = self
            .store
            .delete(resolved.key.as_str())
            .await
            .map_err(|e| DomainError::store("delete", resolved.key.as_str(), e))?;
        if !deleted {
            return Err(DomainError::not_found(format!(
                "no resource at {}",
                resolved.key
            )));
        }

        if resolved.is_meta {
            self.registry.remove(
                &resolved.descriptor.group,
                &resolved.descriptor.names.singular,
            );
            tracing::info!(
                group = %resolved.descriptor.group,
                singular = %resolved.descriptor.names.singular,
                "type descriptor unregistered"
            );
        }
        Ok(resolved.key)
    }

    /// Plural names of every registered type, for discovery.
    #[must_use]
    pub fn plural_names(&self) -> Vec<String> {
        self.registry.plural_names()
    }

    fn is_descriptor_document(&self, resource: &Value) -> bool {
        let group = resource
            .get("apiVersion")
            .and_then(|v| v.as_str())
            .and_then(|v| v.split_once('/'))
            .map(|(group, _)| group);
        let kind = resource.get("kind").and_then(|v| v.as_str());
        group == Some(self.config.meta_group.as_str())
            && kind == Some(self.config.meta_kind.as_str())
    }

    fn descriptor_from_document(resource: &Value) -> Result<TypeDescriptor, DomainError> {
        let spec = resource
            .get("spec")
            .cloned()
            .ok_or_else(|| DomainError::validation("/spec", "missing"))?;
        serde_json::from_value(spec)
            .map_err(|e| DomainError::validation("/spec", format!("not a type descriptor: {e}")))
    }

    /// Shared write path of `create` and `put`.
    ///
    /// Validation order: base structure, then either descriptor structure
    /// (descriptor documents) or type resolution plus version schema. Type
    /// descriptors are registered in the registry *before* the store write.
    async fn write(&self, mut resource: Value, fresh: bool) -> Result<StoredResource, DomainError> {
        self.validator.validate_structure(&resource)?;

        let key = if self.is_descriptor_document(&resource) {
            self.validator.validate_type_descriptor(&resource)?;
            let descriptor = Self::descriptor_from_document(&resource)?;
            let key = self
                .resolver
                .descriptor_key(&descriptor.group, &descriptor.names.singular);
            tracing::info!(
                group = %descriptor.group,
                singular = %descriptor.names.singular,
                "registering type descriptor"
            );
            self.registry.register(descriptor)?;
            key
        } else {
            let (group, version_name) = Self::split_api_version(&resource)?;
            let kind = resource
                .get("kind")
                .and_then(|v| v.as_str())
                .ok_or_else(|| DomainError::validation("/kind", "missing or not a string"))?;
            let descriptor = self.registry.resolve_kind(&group, kind)?;
            let version = descriptor.version(&version_name).cloned().ok_or_else(|| {
                DomainError::not_found(format!(
                    "type '{}' has no version '{version_name}'",
                    descriptor.names.singular
                ))
            })?;
            self.validator.validate_against_schema(&resource, &version)?;
            self.resolver.key_for_resource(&resource)?
        };

        let existing = if fresh {
            None
        } else {
            self.store
                .get(key.as_str())
                .await
                .map_err(|e| DomainError::store("get", key.as_str(), e))?
                .map(|raw| Self::parse_stored(&key, &raw))
                .transpose()?
        };
        Self::stamp_metadata(&mut resource, existing.as_ref())?;

        let raw = serde_json::to_string(&resource)
            .map_err(|e| DomainError::Internal(anyhow::anyhow!("serializing resource: {e}")))?;
        self.store
            .put(key.as_str(), &raw)
            .await
            .map_err(|e| DomainError::store("put", key.as_str(), e))?;
        tracing::debug!(key = %key, "resource stored");
        Ok(StoredResource::new(key, resource))
    }

    fn split_api_version(resource: &Value) -> Result<(String, String), DomainError> {
        let api_version = resource
            .get("apiVersion")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::validation("/apiVersion", "missing or not a string"))?;
        let (group, version) = api_version.split_once('/').ok_or_else(|| {
            DomainError::validation("/apiVersion", "expected '<group>/<version>'")
        })?;
        Ok((group.to_owned(), version.to_owned()))
    }

    /// Populates system metadata: a fresh uid and timestamps on first
    /// write, preserved uid/creation timestamp on overwrite, default
    /// label/annotation maps either way.
    fn stamp_metadata(resource: &mut Value, existing: Option<&Value>) -> Result<(), DomainError> {
        let now = Utc::now().to_rfc3339();
        let metadata = resource
            .get_mut("metadata")
            .and_then(|m| m.as_object_mut())
            .ok_or_else(|| DomainError::validation("/metadata", "missing or not an object"))?;

        let existing_metadata = existing.and_then(|e| e.get("metadata"));
        let uid = existing_metadata
            .and_then(|m| m.get("uid"))
            .cloned()
            .unwrap_or_else(|| json!(Uuid::new_v4().to_string()));
        let created = existing_metadata
            .and_then(|m| m.get("creationTimestamp"))
            .cloned()
            .unwrap_or_else(|| json!(now));

        metadata.insert("uid".to_owned(), uid);
        metadata.insert("creationTimestamp".to_owned(), created);
        metadata.insert("updatedTimestamp".to_owned(), json!(now));
        for map in ["labels", "annotations"] {
            if !metadata.get(map).is_some_and(Value::is_object) {
                metadata.insert(map.to_owned(), json!({}));
            }
        }
        Ok(())
    }

    fn parse_stored(key: &StorageKey, raw: &str) -> Result<Value, DomainError> {
        serde_json::from_str(raw).map_err(|e| {
            DomainError::Internal(anyhow::anyhow!("stored value at {key} is not JSON: {e}"))
        })
    }
}
