//! Application config provider refreshed from file and environment.

use async_trait::async_trait;
use portal_gate_admission::{AppConfig, ConfigError, ConfigProvider};
use portal_gate_core::Result;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, instrument};

/// Environment prefix for application config overrides (`PORTAL__AUTH_MODE`, ...).
pub const PORTAL_ENV_PREFIX: &str = "PORTAL";

/// Provides the cached `AppConfig` and rebuilds it on refresh.
#[derive(Debug)]
pub struct PortalConfigProvider {
    file: Option<PathBuf>,
    env_prefix: String,
    cached: RwLock<AppConfig>,
}

impl PortalConfigProvider {
    /// Loads the initial configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe an
    /// `AppConfig`.
    pub fn load(file: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(file, PORTAL_ENV_PREFIX)
    }

    /// Loads the initial configuration reading overrides from `env_prefix`.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with_env_prefix(
        file: Option<PathBuf>,
        env_prefix: &str,
    ) -> Result<Self, ConfigError> {
        let config = read_app_config(file.as_deref(), env_prefix)?;
        Ok(Self {
            file,
            env_prefix: env_prefix.to_string(),
            cached: RwLock::new(config),
        })
    }
}

#[async_trait]
impl ConfigProvider for PortalConfigProvider {
    fn current(&self) -> AppConfig {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<AppConfig, ConfigError> {
        let file = self.file.clone();
        let env_prefix = self.env_prefix.clone();
        let config = tokio::task::spawn_blocking(move || {
            read_app_config(file.as_deref(), &env_prefix)
        })
        .await
        .map_err(|e| ConfigError::LoadFailed {
            reason: e.to_string(),
        })??;

        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = config.clone();
        debug!(auth_mode = ?config.auth_mode(), "application config reloaded");
        Ok(config)
    }
}

fn read_app_config(file: Option<&Path>, env_prefix: &str) -> Result<AppConfig, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .map_err(|e| ConfigError::LoadFailed {
            reason: e.to_string(),
        })?;

    Ok(settings
        .try_deserialize()
        .map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?)
}
