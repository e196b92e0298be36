//! Infrastructure layer: key-value store implementations.

pub mod storage;

pub use storage::{EtcdCtlStore, KvStore, MemoryStore, StoreError};
