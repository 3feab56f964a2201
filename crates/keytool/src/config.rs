//! Configuration loading and validation for the keytool sidecar.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated keytool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Delimited key material: `"<primary>"` or `"<primary>,<secondary>"`,
    /// each exactly 32 bytes. Optional — without it the tool runs against
    /// the no-op passthrough encryptor.
    #[serde(default)]
    pub encryption_keys: Option<String>,

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build keytool configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise keytool configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if let Some(keys) = &self.encryption_keys {
            if keys.trim().is_empty() {
                anyhow::bail!("ENCRYPTION_KEYS must not be empty when set");
            }
        }
        Ok(())
    }
}
