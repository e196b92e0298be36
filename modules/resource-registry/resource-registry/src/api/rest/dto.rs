//! REST DTOs for the Resource Registry module.

use serde::{Deserialize, Serialize};

use resource_registry_sdk::{ResourceList, StoredResource};

/// Response envelope for a single stored resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    /// Canonical storage key.
    pub key: String,
    /// The stored document.
    pub value: serde_json::Value,
}

impl From<StoredResource> for ResourceResponse {
    fn from(stored: StoredResource) -> Self {
        Self {
            key: stored.key.into(),
            value: stored.value,
        }
    }
}

/// Response envelope for a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Items in lexicographic key order.
    pub items: Vec<ResourceResponse>,
    /// Number of items returned.
    pub count: usize,
}

impl From<ResourceList> for ListResponse {
    fn from(list: ResourceList) -> Self {
        Self {
            count: list.count,
            items: list.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response for a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Key the resource was deleted from.
    pub key: String,
    /// Always `"deleted"`.
    pub status: String,
}

impl DeleteResponse {
    /// Builds the fixed-status response for a deleted key.
    #[must_use]
    pub fn deleted(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            status: "deleted".to_owned(),
        }
    }
}

/// Discovery response: registered plural names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    /// All registered plural names, sorted.
    pub types: Vec<String>,
    /// Number of registered types.
    pub count: usize,
}

/// Query parameters for name-scoped routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionQuery {
    /// Explicit schema version; the newest registered version otherwise.
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_registry_sdk::StorageKey;
    use serde_json::json;

    #[test]
    fn test_resource_response_from_stored() {
        let stored = StoredResource::new(
            StorageKey::from_segments(&["registry", "catcode.io", "system", "test"]),
            json!({"kind": "System"}),
        );
        let dto: ResourceResponse = stored.into();
        assert_eq!(dto.key, "/registry/catcode.io/system/test");
        assert_eq!(dto.value["kind"], "System");
    }

    #[test]
    fn test_list_response_keeps_order_and_count() {
        let list = ResourceList::new(vec![
            StoredResource::new(
                StorageKey::from_segments(&["registry", "g", "s", "a"]),
                json!({}),
            ),
            StoredResource::new(
                StorageKey::from_segments(&["registry", "g", "s", "b"]),
                json!({}),
            ),
        ]);
        let dto: ListResponse = list.into();
        assert_eq!(dto.count, 2);
        assert_eq!(dto.items[0].key, "/registry/g/s/a");
        assert_eq!(dto.items[1].key, "/registry/g/s/b");
    }

    #[test]
    fn test_delete_response() {
        let dto = DeleteResponse::deleted("/registry/g/s/a");
        assert_eq!(dto.status, "deleted");
        assert_eq!(dto.key, "/registry/g/s/a");
    }
}
