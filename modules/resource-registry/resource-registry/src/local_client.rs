//! In-process implementation of the SDK `ResourceRegistryApi` trait.
//!
//! Wraps the domain service so consumers in the same process can hold the
//! registry as a trait object without going through HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use resource_registry_sdk::{
    RegistryError, ResourceList, ResourceRegistryApi, StorageKey, StoredResource,
};

use crate::domain::service::ResourceService;

/// Local (in-process) client for the Resource Registry module.
pub struct LocalResourceRegistryClient {
    service: Arc<ResourceService>,
}

impl LocalResourceRegistryClient {
    /// Creates a client over the given service.
    #[must_use]
    pub fn new(service: Arc<ResourceService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ResourceRegistryApi for LocalResourceRegistryClient {
    async fn create(
        &self,
        resource: serde_json::Value,
    ) -> Result<StoredResource, RegistryError> {
        self.service.create(resource).await.map_err(Into::into)
    }

    async fn put(&self, resource: serde_json::Value) -> Result<StoredResource, RegistryError> {
        self.service.put(resource).await.map_err(Into::into)
    }

    async fn get(
        &self,
        type_ref: &str,
        name: &str,
        version: Option<&str>,
    ) -> Result<StoredResource, RegistryError> {
        self.service
            .get(type_ref, name, version)
            .await
            .map_err(Into::into)
    }

    async fn list(&self, type_ref: &str) -> Result<ResourceList, RegistryError> {
        self.service.list(type_ref).await.map_err(Into::into)
    }

    async fn patch(
        &self,
        type_ref: &str,
        name: &str,
        updates: serde_json::Value,
    ) -> Result<StoredResource, RegistryError> {
        self.service
            .patch(type_ref, name, updates)
            .await
            .map_err(Into::into)
    }

    async fn delete(&self, type_ref: &str, name: &str) -> Result<StorageKey, RegistryError> {
        self.service.delete(type_ref, name).await.map_err(Into::into)
    }

    async fn plural_names(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.service.plural_names())
    }
}
