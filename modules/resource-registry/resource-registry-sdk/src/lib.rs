//! Resource Registry SDK
//!
//! This crate provides the public API for the `resource-registry` module:
//! - `ResourceRegistryApi` trait for consumers
//! - `TypeDescriptor` / `VersionSchema` models for registered resource kinds
//! - `StorageKey` and `StoredResource` for addressing stored documents
//! - `RegistryError` for error handling
//!
//! ## Usage
//!
//! Consumers hold the client as a trait object:
//! ```ignore
//! use resource_registry_sdk::ResourceRegistryApi;
//!
//! let stored = client.create(document).await?;
//! let system = client.get("system", "test", None).await?;
//! let all = client.list("systems").await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root for convenience
pub use api::ResourceRegistryApi;
pub use error::RegistryError;
pub use models::{
    ResourceList, StorageKey, StoredResource, TypeDescriptor, TypeNames, VersionSchema,
};
