#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for resource-registry integration tests

use std::sync::Arc;

use serde_json::json;

use resource_registry::config::ResourceRegistryConfig;
use resource_registry::domain::{ResourceService, SchemaValidator, TypeRegistry};
use resource_registry::infra::storage::MemoryStore;

/// Everything a test needs a handle on.
pub struct TestContext {
    pub service: Arc<ResourceService>,
    pub registry: Arc<TypeRegistry>,
    pub store: Arc<MemoryStore>,
}

pub fn create_context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    create_context_with_store(store)
}

pub fn create_context_with_store(store: Arc<MemoryStore>) -> TestContext {
    let config = ResourceRegistryConfig::default();
    let registry = Arc::new(TypeRegistry::new());
    let validator = SchemaValidator::with_defaults(config.schema_format.as_str()).unwrap();
    let service = Arc::new(ResourceService::new(
        registry.clone(),
        validator,
        store.clone(),
        config,
    ));
    TestContext {
        service,
        registry,
        store,
    }
}

pub fn create_service() -> Arc<ResourceService> {
    create_context().service
}

/// The `System` type descriptor from the original deployment's test data:
/// group `catcode.io`, one `v1alpha1` version requiring `spec.owner`.
pub fn system_descriptor() -> serde_json::Value {
    json!({
        "apiVersion": "api.catcode.io/v1alpha1",
        "kind": "TypeDescriptor",
        "metadata": {"name": "SystemTypeDescriptor"},
        "spec": {
            "group": "catcode.io",
            "names": {"plural": "systems", "singular": "system", "kind": "System"},
            "versions": [{
                "name": "v1alpha1",
                "schemaVersion": "openAPISchemaV3",
                "schema": {
                    "type": "object",
                    "properties": {
                        "spec": {
                            "type": "object",
                            "properties": {"owner": {"type": "string"}},
                            "required": ["owner"]
                        }
                    },
                    "required": ["spec"]
                }
            }]
        }
    })
}

/// A descriptor with two versions, `v1alpha1` then `v1beta1`.
pub fn component_descriptor() -> serde_json::Value {
    json!({
        "apiVersion": "api.catcode.io/v1alpha1",
        "kind": "TypeDescriptor",
        "metadata": {"name": "ComponentTypeDescriptor"},
        "spec": {
            "group": "catcode.io",
            "names": {"plural": "components", "singular": "component", "kind": "Component"},
            "versions": [
                {
                    "name": "v1alpha1",
                    "schemaVersion": "openAPISchemaV3",
                    "schema": {"type": "object"}
                },
                {
                    "name": "v1beta1",
                    "schemaVersion": "openAPISchemaV3",
                    "schema": {"type": "object"}
                }
            ]
        }
    })
}

pub fn system_resource(name: &str, owner: &str) -> serde_json::Value {
    json!({
        "apiVersion": "catcode.io/v1alpha1",
        "kind": "System",
        "metadata": {"name": name},
        "spec": {"owner": owner}
    })
}
