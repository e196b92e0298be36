mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use resource_registry::api::rest;
use resource_registry::domain::{ResourceService, SchemaValidator, TypeRegistry};
use resource_registry::infra::storage::{EtcdCtlStore, KvStore, MemoryStore};

use crate::config::{AppConfig, StoreBackend};

/// Resource Registry server - schema-validated CRUD over dynamic types
#[derive(Parser)]
#[command(name = "registry-server")]
#[command(about = "Resource Registry server - schema-validated CRUD over dynamic resource types")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address override for the HTTP server (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Print effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use the in-memory store instead of etcd
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        if !Path::new(path).is_file() {
            anyhow::bail!("config file does not exist: {}", path.to_string_lossy());
        }
    }

    // Layered config: defaults -> YAML (if provided) -> env (RR_*) -> CLI.
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind.clone() {
        config.server.bind_addr = bind;
    }
    if cli.mock {
        config.store.backend = StoreBackend::Memory;
    }

    init_logging(&config, cli.verbose);
    tracing::info!("Resource Registry server starting");

    if cli.print_config {
        println!("Effective configuration:\n{}", config.render()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn init_logging(config: &AppConfig, verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_owned(),
        _ => "trace".to_owned(),
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    // Base schemas must parse and compile.
    let (base, descriptor) = config.base_schemas()?;
    SchemaValidator::new(&base, &descriptor, config.registry.schema_format.as_str())
        .map_err(|e| anyhow::anyhow!("base schemas do not compile: {e}"))?;
    println!("Configuration is valid");
    println!("{}", config.render()?);
    Ok(())
}

fn build_store(config: &AppConfig) -> Arc<dyn KvStore> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Etcd => {
            tracing::info!(endpoints = %config.store.endpoints, "using etcdctl store");
            Arc::new(EtcdCtlStore::new(config.store.endpoints.clone()))
        }
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    let (base, descriptor) = config.base_schemas()?;
    let validator = SchemaValidator::new(&base, &descriptor, config.registry.schema_format.as_str())
        .map_err(|e| anyhow::anyhow!("base schemas do not compile: {e}"))?;

    let registry = Arc::new(TypeRegistry::new());
    let store = build_store(&config);
    let service = Arc::new(ResourceService::new(
        registry,
        validator,
        store,
        config.registry.clone(),
    ));

    // Recovery contract: registrations already committed to the store
    // survive a process restart.
    match service.rebuild_registry().await {
        Ok(restored) => tracing::info!(restored, "registry rebuilt"),
        Err(e) => tracing::warn!(error = %e, "registry rebuild failed; starting empty"),
    }

    let router = rest::router(service);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown signal handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
