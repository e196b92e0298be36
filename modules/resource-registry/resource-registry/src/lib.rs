//! Resource Registry Module Implementation
//!
//! This module provides dynamic type registration, schema-validated CRUD
//! over a hierarchical key-value namespace, and REST API endpoints. The
//! public API is defined in `resource-registry-sdk` and re-exported here.
//!
//! ## Architecture
//!
//! - **Type Registry**: in-memory singular/plural indexes over registered
//!   type descriptors, rebuildable from the store's meta-namespace
//! - **Key Resolver**: short type references (`name[.group][/version]`)
//!   resolved into canonical storage keys and concrete schema versions
//! - **Store Facade**: create/get/list/put/patch/delete orchestrated over
//!   an abstract key-value store interface

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === PUBLIC API (from SDK) ===
pub use resource_registry_sdk::{
    RegistryError, ResourceList, ResourceRegistryApi, StorageKey, StoredResource, TypeDescriptor,
    TypeNames, VersionSchema,
};

// === CONFIGURATION ===
pub mod config;

// === LOCAL CLIENT ===
pub mod local_client;
pub use local_client::LocalResourceRegistryClient;

// === INTERNAL MODULES ===
pub mod api;
pub mod domain;
pub mod infra;
