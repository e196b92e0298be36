//! Key resolution: short type references turned into canonical storage keys.
//!
//! A type reference has the form `name[.group][/version]`, parsed left to
//! right: the first `/` splits off an embedded version, the first `.` splits
//! the bare name from its group. Groups may themselves contain dots
//! (`templates.templating.catcode.io` is the name `templates` in group
//! `templating.catcode.io`).

use std::sync::Arc;

use resource_registry_sdk::{StorageKey, TypeDescriptor, VersionSchema};

use super::error::DomainError;
use super::registry::TypeRegistry;
use crate::config::ResourceRegistryConfig;

/// A parsed type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef<'a> {
    /// Bare singular or plural name.
    pub name: &'a str,
    /// Optional group qualifier.
    pub group: Option<&'a str>,
    /// Optional embedded version.
    pub version: Option<&'a str>,
}

impl<'a> TypeRef<'a> {
    /// Parses a reference of the form `name[.group][/version]`.
    #[must_use]
    pub fn parse(reference: &'a str) -> Self {
        let (name_and_group, version) = match reference.split_once('/') {
            Some((left, right)) => (left, Some(right)),
            None => (reference, None),
        };
        let (name, group) = match name_and_group.split_once('.') {
            Some((left, right)) => (left, Some(right)),
            None => (name_and_group, None),
        };
        Self {
            name,
            group,
            version,
        }
    }
}

/// A fully resolved instance reference.
#[derive(Debug, Clone)]
pub struct ResolvedRef {
    /// Canonical storage key of the instance.
    pub key: StorageKey,
    /// The descriptor the reference resolved to.
    pub descriptor: Arc<TypeDescriptor>,
    /// The selected schema version.
    pub version: VersionSchema,
    /// Whether the reference addressed the type-descriptor meta-namespace.
    pub is_meta: bool,
}

/// Resolves type references against the registry and the configured
/// namespace layout.
pub struct KeyResolver {
    registry: Arc<TypeRegistry>,
    config: ResourceRegistryConfig,
}

impl KeyResolver {
    /// Creates a resolver over the given registry and namespace config.
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>, config: ResourceRegistryConfig) -> Self {
        Self { registry, config }
    }

    fn is_meta_name(&self, name: &str) -> bool {
        name == self.config.meta_singular || name == self.config.meta_plural
    }

    /// Key of the descriptor record for a registered type.
    #[must_use]
    pub fn descriptor_key(&self, group: &str, singular: &str) -> StorageKey {
        StorageKey::from_segments(&[
            &self.config.root_prefix,
            &self.config.meta_group,
            &self.config.meta_singular,
            group,
            singular,
        ])
    }

    /// Prefix covering every stored type descriptor.
    #[must_use]
    pub fn descriptor_prefix(&self) -> StorageKey {
        StorageKey::from_segments(&[
            &self.config.root_prefix,
            &self.config.meta_group,
            &self.config.meta_singular,
        ])
    }

    fn instance_key(&self, descriptor: &TypeDescriptor, name: &str) -> StorageKey {
        StorageKey::from_segments(&[
            &self.config.root_prefix,
            &descriptor.group,
            &descriptor.names.singular,
            name,
        ])
    }

    fn instance_prefix(&self, descriptor: &TypeDescriptor) -> StorageKey {
        StorageKey::from_segments(&[
            &self.config.root_prefix,
            &descriptor.group,
            &descriptor.names.singular,
        ])
    }

    fn lookup(&self, parsed: &TypeRef<'_>) -> Result<Arc<TypeDescriptor>, DomainError> {
        match parsed.group {
            Some(group) => self.registry.resolve_in_group(parsed.name, group),
            None => self.registry.resolve(parsed.name),
        }
    }

    fn select_version(
        descriptor: &TypeDescriptor,
        requested: Option<&str>,
    ) -> Result<VersionSchema, DomainError> {
        match requested {
            Some(name) => descriptor.version(name).cloned().ok_or_else(|| {
                DomainError::not_found(format!(
                    "type '{}' has no version '{name}'",
                    descriptor.names.singular
                ))
            }),
            // Newest = most-recently-appended, not a semver comparison.
            None => descriptor.latest_version().cloned().ok_or_else(|| {
                DomainError::Internal(anyhow::anyhow!(
                    "descriptor '{}' has an empty version sequence",
                    descriptor.names.singular
                ))
            }),
        }
    }

    /// Resolves a type reference and instance name into a storage key, the
    /// matching descriptor, and a concrete schema version.
    ///
    /// An explicit `version` parameter wins over a version embedded in the
    /// reference. The reserved meta-type name resolves into the descriptor
    /// namespace: the instance name is itself looked up through the
    /// registry to find the target type's group and singular.
    pub fn resolve_instance(
        &self,
        type_ref: &str,
        instance: &str,
        version: Option<&str>,
    ) -> Result<ResolvedRef, DomainError> {
        let parsed = TypeRef::parse(type_ref);
        if parsed.name.is_empty() {
            return Err(DomainError::invalid_usage(format!(
                "empty type reference '{type_ref}'"
            )));
        }
        let requested = version.or(parsed.version);

        if self.is_meta_name(parsed.name) {
            let target = self.registry.resolve(instance)?;
            let key = self.descriptor_key(&target.group, &target.names.singular);
            let version = Self::select_version(&target, requested)?;
            return Ok(ResolvedRef {
                key,
                descriptor: target,
                version,
                is_meta: true,
            });
        }

        let descriptor = self.lookup(&parsed)?;
        let version = Self::select_version(&descriptor, requested)?;
        let key = self.instance_key(&descriptor, instance);
        Ok(ResolvedRef {
            key,
            descriptor,
            version,
            is_meta: false,
        })
    }

    /// Resolves a type reference into a list prefix.
    ///
    /// Returns the prefix and whether the reference was plural; the facade
    /// rejects singular references for list operations.
    pub fn resolve_prefix(&self, type_ref: &str) -> Result<(StorageKey, bool), DomainError> {
        let parsed = TypeRef::parse(type_ref);
        if parsed.name.is_empty() {
            return Err(DomainError::invalid_usage(format!(
                "empty type reference '{type_ref}'"
            )));
        }

        if self.is_meta_name(parsed.name) {
            let plural = parsed.name == self.config.meta_plural;
            return Ok((self.descriptor_prefix(), plural));
        }

        let descriptor = self.lookup(&parsed)?;
        let plural = parsed.name == descriptor.names.plural;
        Ok((self.instance_prefix(&descriptor), plural))
    }

    /// Derives the canonical storage key for a resource document on the
    /// write path, from its `apiVersion` and `kind`.
    ///
    /// Descriptor documents take the meta shape
    /// `<root>/<metaGroup>/<metaSingular>/<descriptorGroup>/<singular>`;
    /// ordinary resources resolve their kind through the registry.
    pub fn key_for_resource(&self, resource: &serde_json::Value) -> Result<StorageKey, DomainError> {
        let api_version = resource
            .get("apiVersion")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::validation("/apiVersion", "missing or not a string"))?;
        let (group, _) = api_version.split_once('/').ok_or_else(|| {
            DomainError::validation("/apiVersion", "expected '<group>/<version>'")
        })?;
        let kind = resource
            .get("kind")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::validation("/kind", "missing or not a string"))?;

        if group == self.config.meta_group && kind == self.config.meta_kind {
            let descriptor_group = resource
                .pointer("/spec/group")
                .and_then(|v| v.as_str())
                .ok_or_else(|| DomainError::validation("/spec/group", "missing or not a string"))?;
            let singular = resource
                .pointer("/spec/names/singular")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    DomainError::validation("/spec/names/singular", "missing or not a string")
                })?;
            return Ok(self.descriptor_key(descriptor_group, singular));
        }

        let descriptor = self.registry.resolve_kind(group, kind)?;
        let name = resource
            .pointer("/metadata/name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::validation("/metadata/name", "missing or not a string"))?;
        Ok(self.instance_key(&descriptor, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_registry_sdk::{TypeNames, VersionSchema};
    use serde_json::json;

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor {
            group: "catcode.io".to_owned(),
            names: TypeNames {
                kind: "System".to_owned(),
                plural: "systems".to_owned(),
                singular: "system".to_owned(),
            },
            versions: vec![
                VersionSchema {
                    name: "v1alpha1".to_owned(),
                    schema_format: "openAPISchemaV3".to_owned(),
                    schema: json!({"type": "object"}),
                },
                VersionSchema {
                    name: "v1beta1".to_owned(),
                    schema_format: "openAPISchemaV3".to_owned(),
                    schema: json!({"type": "object"}),
                },
            ],
        }
    }

    fn resolver() -> KeyResolver {
        let registry = Arc::new(TypeRegistry::new());
        registry.register(descriptor()).unwrap();
        KeyResolver::new(registry, ResourceRegistryConfig::default())
    }

    #[test]
    fn test_parse_bare_name() {
        assert_eq!(
            TypeRef::parse("systems"),
            TypeRef {
                name: "systems",
                group: None,
                version: None
            }
        );
    }

    #[test]
    fn test_parse_name_with_group() {
        assert_eq!(
            TypeRef::parse("system.catcode.io"),
            TypeRef {
                name: "system",
                group: Some("catcode.io"),
                version: None
            }
        );
    }

    #[test]
    fn test_parse_full_reference() {
        assert_eq!(
            TypeRef::parse("systems.catcode.io/v1alpha1"),
            TypeRef {
                name: "systems",
                group: Some("catcode.io"),
                version: Some("v1alpha1")
            }
        );
    }

    #[test]
    fn test_parse_group_containing_dots() {
        // The first '.' separates the name from the group.
        assert_eq!(
            TypeRef::parse("templates.templating.catcode.io/v1alpha1"),
            TypeRef {
                name: "templates",
                group: Some("templating.catcode.io"),
                version: Some("v1alpha1")
            }
        );
    }

    #[test]
    fn test_all_reference_forms_yield_identical_key() {
        let resolver = resolver();
        let expected = "/registry/catcode.io/system/test";

        for reference in [
            "system",
            "systems",
            "system.catcode.io",
            "systems.catcode.io",
            "system.catcode.io/v1alpha1",
        ] {
            let resolved = resolver.resolve_instance(reference, "test", None).unwrap();
            assert_eq!(resolved.key.as_str(), expected, "reference {reference}");
        }
    }

    #[test]
    fn test_version_defaults_to_last_entry() {
        let resolver = resolver();
        let resolved = resolver.resolve_instance("system", "test", None).unwrap();
        assert_eq!(resolved.version.name, "v1beta1");
    }

    #[test]
    fn test_embedded_and_explicit_version_selection() {
        let resolver = resolver();

        let resolved = resolver
            .resolve_instance("system.catcode.io/v1alpha1", "test", None)
            .unwrap();
        assert_eq!(resolved.version.name, "v1alpha1");

        // Explicit parameter wins over the embedded version.
        let resolved = resolver
            .resolve_instance("system.catcode.io/v1alpha1", "test", Some("v1beta1"))
            .unwrap();
        assert_eq!(resolved.version.name, "v1beta1");
    }

    #[test]
    fn test_unknown_version_is_not_found() {
        let resolver = resolver();
        let result = resolver.resolve_instance("system", "test", Some("v9"));
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_unknown_group_is_not_found() {
        let resolver = resolver();
        let result = resolver.resolve_instance("system.wrong.io", "test", None);
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_meta_reference_resolves_to_descriptor_namespace() {
        let resolver = resolver();
        let resolved = resolver
            .resolve_instance("typedescriptor", "system", None)
            .unwrap();
        assert_eq!(
            resolved.key.as_str(),
            "/registry/api.catcode.io/typedescriptor/catcode.io/system"
        );
        assert!(resolved.is_meta);

        // The plural reference of the target works the same way.
        let resolved = resolver
            .resolve_instance("typedescriptor", "systems", None)
            .unwrap();
        assert_eq!(
            resolved.key.as_str(),
            "/registry/api.catcode.io/typedescriptor/catcode.io/system"
        );
    }

    #[test]
    fn test_prefix_resolution() {
        let resolver = resolver();

        let (prefix, plural) = resolver.resolve_prefix("systems").unwrap();
        assert_eq!(prefix.as_str(), "/registry/catcode.io/system");
        assert!(plural);

        let (prefix, plural) = resolver.resolve_prefix("system").unwrap();
        assert_eq!(prefix.as_str(), "/registry/catcode.io/system");
        assert!(!plural);

        let (prefix, plural) = resolver.resolve_prefix("typedescriptors").unwrap();
        assert_eq!(prefix.as_str(), "/registry/api.catcode.io/typedescriptor");
        assert!(plural);
    }

    #[test]
    fn test_key_for_ordinary_resource() {
        let resolver = resolver();
        let resource = json!({
            "apiVersion": "catcode.io/v1alpha1",
            "kind": "System",
            "metadata": {"name": "test"},
            "spec": {"owner": "test"}
        });
        let key = resolver.key_for_resource(&resource).unwrap();
        assert_eq!(key.as_str(), "/registry/catcode.io/system/test");
    }

    #[test]
    fn test_key_for_descriptor_resource() {
        let resolver = resolver();
        let resource = json!({
            "apiVersion": "api.catcode.io/v1alpha1",
            "kind": "TypeDescriptor",
            "metadata": {"name": "SystemTypeDescriptor"},
            "spec": {
                "group": "catcode.io",
                "names": {"plural": "systems", "singular": "system", "kind": "System"},
                "versions": []
            }
        });
        let key = resolver.key_for_resource(&resource).unwrap();
        assert_eq!(
            key.as_str(),
            "/registry/api.catcode.io/typedescriptor/catcode.io/system"
        );
    }

    #[test]
    fn test_key_for_unknown_kind_is_not_found() {
        let resolver = resolver();
        let resource = json!({
            "apiVersion": "catcode.io/v1alpha1",
            "kind": "Widget",
            "metadata": {"name": "w"},
            "spec": {}
        });
        assert!(matches!(
            resolver.key_for_resource(&resource),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_key_for_malformed_api_version() {
        let resolver = resolver();
        let resource = json!({
            "apiVersion": "catcode.io",
            "kind": "System",
            "metadata": {"name": "test"},
            "spec": {}
        });
        assert!(matches!(
            resolver.key_for_resource(&resource),
            Err(DomainError::Validation { .. })
        ));
    }
}
