//! Layered configuration: defaults, then an optional YAML file, then
//! `WARDEN__*` environment variables.

use std::path::Path;

use anyhow::Context;
use authc::AuthcConfig;
use authz::AuthzConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use static_realm_plugin::StaticRealmConfig;

/// Prefix of environment overrides, e.g. `WARDEN__AUTHC__STRATEGY`.
pub const ENV_PREFIX: &str = "WARDEN__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WardenConfig {
    pub logging: LoggingConfig,
    pub authc: AuthcConfig,
    pub authz: AuthzConfig,
    /// Realms in consultation order.
    pub realms: Vec<StaticRealmConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

impl WardenConfig {
    /// Provider stack without extraction, so callers can merge overrides.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from `path` (if any) and the environment.
    ///
    /// # Errors
    /// Fails when the file is missing, malformed, or has unknown keys.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path
            && !path.exists()
        {
            anyhow::bail!("config file not found: {}", path.display());
        }
        Self::from_figment(&Self::figment(path))
    }

    /// # Errors
    /// Fails when the merged providers do not describe a valid configuration.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        figment
            .extract()
            .context("failed to parse warden configuration")
    }

    /// Find a realm configuration by name.
    #[must_use]
    pub fn realm(&self, name: &str) -> Option<&StaticRealmConfig> {
        self.realms.iter().find(|r| r.name == name)
    }
}
