//! # configs
//!
//! Typed settings for addressing one deployment of the hosted service:
//! endpoint URL, service key, and the deployment mode that selects the
//! author representation. Loaded from an optional `emberboard.toml`
//! with `FORUM__`-prefixed environment overrides on top.

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use domains::DeploymentMode;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of the hosted service (no trailing path).
    pub endpoint: String,
    /// The anon/service key sent as `apikey` on every call.
    pub service_key: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub mode: DeploymentMode,
}

impl Settings {
    /// Layered load: defaults, then `emberboard.toml` when present,
    /// then environment (`FORUM__REMOTE__ENDPOINT`,
    /// `FORUM__REMOTE__SERVICE_KEY`, `FORUM__MODE`).
    pub fn load() -> Result<Self, SettingsError> {
        let config = Config::builder()
            .set_default("mode", "authenticated")?
            .add_source(File::with_name("emberboard").required(false))
            .add_source(Environment::with_prefix("FORUM").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
