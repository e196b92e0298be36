//! In-memory type registry: short names resolved to registered descriptors.
//!
//! Registry state is process-wide, shared across concurrent requests, and
//! rebuildable from the store's meta-namespace on startup. Reads run
//! concurrently; `register`/`restore`/`remove` take the write lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use resource_registry_sdk::TypeDescriptor;

use super::error::DomainError;

/// Identity key of a registered type: `(group, singular)`.
type Identity = (String, String);

#[derive(Default)]
struct Indexes {
    /// Full identity -> descriptor.
    by_identity: HashMap<Identity, Arc<TypeDescriptor>>,
    /// Singular name -> identities bound to it.
    by_singular: HashMap<String, Vec<Identity>>,
    /// Plural name -> identities bound to it.
    by_plural: HashMap<String, Vec<Identity>>,
}

impl Indexes {
    fn unbind(&mut self, descriptor: &TypeDescriptor) {
        let identity = (descriptor.group.clone(), descriptor.names.singular.clone());
        for index in [&mut self.by_singular, &mut self.by_plural] {
            index.retain(|_, identities| {
                identities.retain(|id| *id != identity);
                !identities.is_empty()
            });
        }
        self.by_identity.remove(&identity);
    }

    fn bind(&mut self, descriptor: TypeDescriptor) {
        let identity = (descriptor.group.clone(), descriptor.names.singular.clone());
        self.by_singular
            .entry(descriptor.names.singular.clone())
            .or_default()
            .push(identity.clone());
        self.by_plural
            .entry(descriptor.names.plural.clone())
            .or_default()
            .push(identity.clone());
        self.by_identity.insert(identity, Arc::new(descriptor));
    }
}

/// Registry of type descriptors, indexed by singular and plural name.
#[derive(Default)]
pub struct TypeRegistry {
    indexes: RwLock<Indexes>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a type descriptor.
    ///
    /// Replacement is keyed on `(group, singular)`; re-submission overwrites
    /// the previous descriptor wholesale. Binding a singular or plural name
    /// already held by a different group is a `Conflict`.
    ///
    /// The descriptor is readable under its full identity as soon as this
    /// returns.
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<(), DomainError> {
        let mut indexes = self.indexes.write();

        for (index, name) in [
            (&indexes.by_singular, &descriptor.names.singular),
            (&indexes.by_plural, &descriptor.names.plural),
        ] {
            if let Some(identities) = index.get(name) {
                if identities.iter().any(|(group, _)| *group != descriptor.group) {
                    return Err(DomainError::conflict(format!(
                        "name '{name}' is already bound to a different group"
                    )));
                }
            }
        }

        // Same-group overwrite: drop the old name bindings first, the
        // plural may have changed on re-submission.
        let identity = (descriptor.group.clone(), descriptor.names.singular.clone());
        if let Some(previous) = indexes.by_identity.get(&identity).cloned() {
            indexes.unbind(&previous);
        }

        indexes.bind(descriptor);
        Ok(())
    }

    /// Rebuild path used by the startup scan of the meta-namespace.
    ///
    /// Unlike [`register`](Self::register) this tolerates cross-group name
    /// collisions already committed to the store; such collisions surface
    /// later as `AmbiguousType` at resolve time.
    pub fn restore(&self, descriptor: TypeDescriptor) {
        let mut indexes = self.indexes.write();
        let identity = (descriptor.group.clone(), descriptor.names.singular.clone());
        if let Some(previous) = indexes.by_identity.get(&identity).cloned() {
            indexes.unbind(&previous);
        }
        indexes.bind(descriptor);
    }

    /// Looks up a descriptor by singular or plural name.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown name; `AmbiguousType` when the bare name
    /// is bound in more than one group.
    pub fn resolve(&self, name: &str) -> Result<Arc<TypeDescriptor>, DomainError> {
        let indexes = self.indexes.read();
        let identities = indexes
            .by_singular
            .get(name)
            .or_else(|| indexes.by_plural.get(name))
            .ok_or_else(|| DomainError::not_found(format!("no type descriptor named '{name}'")))?;

        let mut groups: Vec<String> = identities.iter().map(|(g, _)| g.clone()).collect();
        groups.sort();
        groups.dedup();
        if groups.len() > 1 {
            return Err(DomainError::AmbiguousType {
                name: name.to_owned(),
                groups,
            });
        }

        let identity = identities.first().ok_or_else(|| {
            DomainError::Internal(anyhow::anyhow!("empty identity list for name '{name}'"))
        })?;
        indexes.by_identity.get(identity).cloned().ok_or_else(|| {
            DomainError::Internal(anyhow::anyhow!(
                "name index points at unregistered identity {identity:?}"
            ))
        })
    }

    /// Looks up a descriptor by name within one exact group.
    ///
    /// # Errors
    ///
    /// `NotFound` when the name is not bound in that group.
    pub fn resolve_in_group(
        &self,
        name: &str,
        group: &str,
    ) -> Result<Arc<TypeDescriptor>, DomainError> {
        let indexes = self.indexes.read();
        let identity = indexes
            .by_singular
            .get(name)
            .or_else(|| indexes.by_plural.get(name))
            .and_then(|ids| ids.iter().find(|(g, _)| g == group))
            .ok_or_else(|| {
                DomainError::not_found(format!("no type descriptor named '{name}' in group '{group}'"))
            })?;
        indexes.by_identity.get(identity).cloned().ok_or_else(|| {
            DomainError::Internal(anyhow::anyhow!(
                "name index points at unregistered identity {identity:?}"
            ))
        })
    }

    /// Looks up a descriptor by group and kind, the write-path resolution
    /// for a resource document's `apiVersion` + `kind` pair.
    ///
    /// # Errors
    ///
    /// `NotFound` when no descriptor matches.
    pub fn resolve_kind(&self, group: &str, kind: &str) -> Result<Arc<TypeDescriptor>, DomainError> {
        let indexes = self.indexes.read();
        indexes
            .by_identity
            .values()
            .find(|d| d.group == group && d.names.kind == kind)
            .cloned()
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "no type descriptor matches group '{group}' and kind '{kind}'"
                ))
            })
    }

    /// Removes a descriptor by its full identity; `true` if one was bound.
    pub fn remove(&self, group: &str, singular: &str) -> bool {
        let mut indexes = self.indexes.write();
        let identity = (group.to_owned(), singular.to_owned());
        match indexes.by_identity.get(&identity).cloned() {
            Some(descriptor) => {
                indexes.unbind(&descriptor);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the name is bound as a plural.
    #[must_use]
    pub fn is_plural(&self, name: &str) -> bool {
        self.indexes.read().by_plural.contains_key(name)
    }

    /// Returns `true` if the name is bound as a singular.
    #[must_use]
    pub fn is_singular(&self, name: &str) -> bool {
        self.indexes.read().by_singular.contains_key(name)
    }

    /// Returns `true` if the name is bound at all.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.is_singular(name) || self.is_plural(name)
    }

    /// All registered plural names, sorted, for discovery endpoints.
    #[must_use]
    pub fn plural_names(&self) -> Vec<String> {
        let indexes = self.indexes.read();
        let mut names: Vec<String> = indexes.by_plural.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_registry_sdk::{TypeNames, VersionSchema};
    use serde_json::json;

    fn descriptor(group: &str, singular: &str, plural: &str, kind: &str) -> TypeDescriptor {
        TypeDescriptor {
            group: group.to_owned(),
            names: TypeNames {
                kind: kind.to_owned(),
                plural: plural.to_owned(),
                singular: singular.to_owned(),
            },
            versions: vec![VersionSchema {
                name: "v1alpha1".to_owned(),
                schema_format: "openAPISchemaV3".to_owned(),
                schema: json!({"type": "object"}),
            }],
        }
    }

    #[test]
    fn test_register_and_resolve_by_both_names() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();

        assert_eq!(registry.resolve("system").unwrap().group, "catcode.io");
        assert_eq!(registry.resolve("systems").unwrap().group, "catcode.io");
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.resolve("widget"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_cross_group_collision_is_conflict() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();

        let result = registry.register(descriptor("other.io", "system", "systeme", "System"));
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let result = registry.register(descriptor("other.io", "sys", "systems", "Sys"));
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_same_group_resubmission_overwrites() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();
        // Re-submission with a changed plural: old binding must disappear.
        registry
            .register(descriptor("catcode.io", "system", "systemz", "System"))
            .unwrap();

        assert!(!registry.is_plural("systems"));
        assert!(registry.is_plural("systemz"));
        assert_eq!(registry.resolve("systemz").unwrap().names.plural, "systemz");
    }

    #[test]
    fn test_restore_tolerates_collision_and_resolve_reports_ambiguity() {
        let registry = TypeRegistry::new();
        registry.restore(descriptor("catcode.io", "system", "systems", "System"));
        registry.restore(descriptor("other.io", "system", "othersystems", "System"));

        match registry.resolve("system") {
            Err(DomainError::AmbiguousType { name, groups }) => {
                assert_eq!(name, "system");
                assert_eq!(groups, vec!["catcode.io".to_owned(), "other.io".to_owned()]);
            }
            other => panic!("expected AmbiguousType, got {other:?}"),
        }

        // Group-qualified lookup stays unambiguous.
        let d = registry.resolve_in_group("system", "other.io").unwrap();
        assert_eq!(d.names.plural, "othersystems");
    }

    #[test]
    fn test_resolve_in_group_requires_exact_group() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();

        assert!(registry.resolve_in_group("system", "catcode.io").is_ok());
        assert!(matches!(
            registry.resolve_in_group("system", "nope.io"),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_kind() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();

        let d = registry.resolve_kind("catcode.io", "System").unwrap();
        assert_eq!(d.names.singular, "system");
        assert!(registry.resolve_kind("catcode.io", "Widget").is_err());
        assert!(registry.resolve_kind("other.io", "System").is_err());
    }

    #[test]
    fn test_predicates() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();

        assert!(registry.is_singular("system"));
        assert!(!registry.is_singular("systems"));
        assert!(registry.is_plural("systems"));
        assert!(!registry.is_plural("system"));
        assert!(registry.exists("system"));
        assert!(registry.exists("systems"));
        assert!(!registry.exists("widget"));
    }

    #[test]
    fn test_remove_unbinds_both_names() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();

        assert!(registry.remove("catcode.io", "system"));
        assert!(!registry.exists("system"));
        assert!(!registry.exists("systems"));
        assert!(!registry.remove("catcode.io", "system"));
    }

    #[test]
    fn test_plural_names_sorted() {
        let registry = TypeRegistry::new();
        registry
            .register(descriptor("catcode.io", "system", "systems", "System"))
            .unwrap();
        registry
            .register(descriptor("catcode.io", "component", "components", "Component"))
            .unwrap();

        assert_eq!(
            registry.plural_names(),
            vec!["components".to_owned(), "systems".to_owned()]
        );
    }
}
