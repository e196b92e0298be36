//! Abstract key-value store interface and its implementations.
//!
//! The domain layer depends only on [`KvStore`]; whether the interface is
//! backed by a subprocess CLI, an RPC client, or an in-memory map is an
//! infrastructure concern.

use async_trait::async_trait;
use thiserror::Error;

mod etcdctl;
mod memory;

pub use etcdctl::EtcdCtlStore;
pub use memory::MemoryStore;

/// Failures at the store boundary. Never retried internally; the facade
/// wraps them with the operation and key they happened on.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store is unreachable or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backing store answered with an error.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Abstract key-value store the core operates against.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Returns all `(key, value)` pairs under `prefix`, in lexicographic
    /// key order.
    async fn get_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Stores `value` under `key`, overwriting any existing value.
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes the value under `key`; `true` if something was deleted.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
