//! Key-value store backed by the `etcdctl` command-line client.
//!
//! Each operation shells out to `etcdctl` as a subprocess. A failure whose
//! stderr mentions a connection problem maps to `StoreError::Unavailable`;
//! anything else is `StoreError::Backend`. In-flight subprocesses are not
//! interruptible; they run to completion or to etcdctl's own timeout.

use async_trait::async_trait;
use tokio::process::Command;

use super::{KvStore, StoreError};

/// Store implementation delegating to the `etcdctl` binary.
pub struct EtcdCtlStore {
    binary: String,
    endpoints: String,
}

impl EtcdCtlStore {
    /// Creates a store talking to the given etcd endpoints.
    #[must_use]
    pub fn new(endpoints: impl Into<String>) -> Self {
        Self {
            binary: "etcdctl".to_owned(),
            endpoints: endpoints.into(),
        }
    }

    /// Overrides the etcdctl binary path.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    async fn run(&self, args: &[&str]) -> Result<String, StoreError> {
        let endpoints = format!("--endpoints={}", self.endpoints);
        let output = Command::new(&self.binary)
            .env("ETCDCTL_API", "3")
            .arg(&endpoints)
            .args(args)
            .output()
            .await
            .map_err(|e| StoreError::Unavailable(format!("spawning {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            if stderr.to_lowercase().contains("connection") {
                return Err(StoreError::Unavailable(stderr));
            }
            return Err(StoreError::Backend(stderr));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl KvStore for EtcdCtlStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let stdout = self.run(&["get", key, "--print-value-only"]).await?;
        let value = stdout.trim_end_matches('\n');
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(value.to_owned()))
    }

    async fn get_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        // Output alternates key line / value line; etcd returns keys in
        // lexicographic order already.
        let stdout = self.run(&["get", prefix, "--prefix"]).await?;
        let lines: Vec<&str> = stdout.trim_end_matches('\n').lines().collect();
        if lines.is_empty() || (lines.len() == 1 && lines[0].is_empty()) {
            return Ok(Vec::new());
        }

        let mut entries = Vec::with_capacity(lines.len() / 2);
        for pair in lines.chunks(2) {
            match pair {
                [key, value] => entries.push(((*key).to_owned(), (*value).to_owned())),
                _ => {
                    return Err(StoreError::Backend(format!(
                        "odd key/value line count in prefix scan of '{prefix}'"
                    )));
                }
            }
        }
        Ok(entries)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.run(&["put", key, value]).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        // etcdctl prints the number of deleted keys.
        let stdout = self.run(&["del", key]).await?;
        Ok(stdout.trim() != "0")
    }
}
