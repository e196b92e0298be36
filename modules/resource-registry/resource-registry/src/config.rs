//! Configuration for the Resource Registry module.

use serde::{Deserialize, Serialize};

/// Configuration for the Resource Registry module.
///
/// The defaults reproduce the namespace layout of the original deployment:
/// ordinary resources under `/registry/<group>/<singular>/<name>`, type
/// descriptors under `/registry/api.catcode.io/typedescriptor/...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ResourceRegistryConfig {
    /// Root prefix every storage key lives under.
    pub root_prefix: String,

    /// Reserved group that owns the type-descriptor meta-namespace.
    pub meta_group: String,

    /// Kind name of type-descriptor documents.
    pub meta_kind: String,

    /// Singular reference name for type descriptors. Reserved: it resolves
    /// to the meta-namespace, never through the registry.
    pub meta_singular: String,

    /// Plural reference name for type descriptors.
    pub meta_plural: String,

    /// The single recognized schema format tag.
    pub schema_format: String,
}

impl Default for ResourceRegistryConfig {
    fn default() -> Self {
        Self {
            root_prefix: "registry".to_owned(),
            meta_group: "api.catcode.io".to_owned(),
            meta_kind: "TypeDescriptor".to_owned(),
            meta_singular: "typedescriptor".to_owned(),
            meta_plural: "typedescriptors".to_owned(),
            schema_format: "openAPISchemaV3".to_owned(),
        }
    }
}
