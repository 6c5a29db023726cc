//! Registry configuration and logging setup.

use std::path::{Path, PathBuf};

use config::{Config, File as ConfigFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Process configuration for the registry facade.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// JSONL audit log destination. `None` keeps the trail in memory.
    pub audit_log_path: Option<PathBuf>,
    /// Size threshold for rotating the audit log.
    pub audit_log_max_bytes: u64,
    /// Dispatch audit events through a channel so a slow log can never
    /// stall registry operations. Requires a tokio runtime.
    pub buffered_audit: bool,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            audit_log_path: None,
            audit_log_max_bytes: 10 * 1024 * 1024,
            buffered_audit: false,
            log_level: "info".to_string(),
        }
    }
}

impl RegistryConfig {
    /// Loads configuration from an optional file plus `CARELEDGER_`-
    /// prefixed environment variables; the environment wins. Missing
    /// keys fall back to the defaults above.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                anyhow::bail!("configuration file {} not found", path.display());
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(config::Environment::with_prefix("CARELEDGER"));

        let config = builder.build()?;
        let defaults = Self::default();

        Ok(Self {
            audit_log_path: config.get_string("AUDIT_LOG_PATH").ok().map(PathBuf::from),
            audit_log_max_bytes: config
                .get_int("AUDIT_LOG_MAX_BYTES")
                .ok()
                .and_then(|value| u64::try_from(value).ok())
                .unwrap_or(defaults.audit_log_max_bytes),
            buffered_audit: config
                .get_bool("BUFFERED_AUDIT")
                .unwrap_or(defaults.buffered_audit),
            log_level: config
                .get_string("LOG_LEVEL")
                .unwrap_or(defaults.log_level),
        })
    }
}

/// Installs the global tracing subscriber: `RUST_LOG` when present,
/// the configured level otherwise.
pub fn init_logging(config: &RegistryConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}
