//! Layered configuration for the registry server.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file, `RR_`
//! environment variables, CLI overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use resource_registry::config::ResourceRegistryConfig;

/// Which store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process map; state dies with the process.
    Memory,
    /// `etcdctl` subprocess against a real etcd cluster.
    Etcd,
}

/// Store section of the server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Selected backend.
    pub backend: StoreBackend,
    /// etcd endpoints, used when the backend is `etcd`.
    pub endpoints: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Etcd,
            endpoints: "http://127.0.0.1:2379".to_owned(),
        }
    }
}

/// HTTP server section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable via `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Base schema documents section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Directory holding `base.yaml` and `base-typedescriptor.yaml`;
    /// compiled-in defaults are used when unset.
    pub dir: Option<PathBuf>,
}

/// Full server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Store backend settings.
    pub store: StoreConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Base schema document settings.
    pub schemas: SchemaConfig,
    /// Resource registry namespace settings.
    pub registry: ResourceRegistryConfig,
}

impl AppConfig {
    /// Loads the layered configuration.
    ///
    /// # Errors
    ///
    /// Fails when the YAML file or environment sections do not deserialize.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("RR_").split("__"));
        figment
            .extract()
            .context("loading server configuration")
    }

    /// The effective configuration, pretty-printed for `--print-config`.
    ///
    /// # Errors
    ///
    /// Fails when the configuration cannot be serialized.
    pub fn render(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing configuration")
    }

    /// Loads the two base schema documents, from the configured directory
    /// or the compiled-in defaults.
    ///
    /// # Errors
    ///
    /// Fails when a configured schema file is missing or not valid YAML.
    pub fn base_schemas(&self) -> Result<(serde_json::Value, serde_json::Value)> {
        use resource_registry::domain::validate;

        let Some(dir) = self.schemas.dir.as_deref() else {
            return Ok((
                validate::default_base_schema(),
                validate::default_descriptor_schema(),
            ));
        };

        let base = load_schema_document(&dir.join("base.yaml"))?;
        let descriptor = load_schema_document(&dir.join("base-typedescriptor.yaml"))?;
        Ok((base, descriptor))
    }
}

fn load_schema_document(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading schema document {}", path.display()))?;
    serde_saphyr::from_str(&raw)
        .with_context(|| format!("parsing schema document {}", path.display()))
}
