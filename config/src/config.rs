use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::overrides::ConfigOverrides;
use crate::types::{BlockParamsConfig, ImpersonationConfig};

/// Filters that are not polled for this long are eligible for cleanup.
pub const DEFAULT_FILTER_EXPIRATION_SECS: u64 = 5 * 60;

/// Prefix of the environment variables read by [`Config::from_file`].
/// Nested keys are separated by a double underscore, for example
/// `DEVNET_BLOCK_PARAMS__MIN_GAS_PRICE`.
pub const ENV_PREFIX: &str = "DEVNET_";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub block_params: BlockParamsConfig,
    pub impersonation: ImpersonationConfig,
    pub filter_expiration_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            block_params: BlockParamsConfig::default(),
            impersonation: ImpersonationConfig::default(),
            filter_expiration_secs: DEFAULT_FILTER_EXPIRATION_SECS,
        }
    }
}

impl Config {
    /// Layers, lowest precedence first: built-in defaults, the TOML file at
    /// `config_path` (if it exists), `DEVNET_*` environment variables, and
    /// `overrides`.
    pub fn from_file(config_path: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(overrides.as_provider());

        let config: Config = figment.extract()?;
        debug!(target: "devnet::config", path = %config_path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Like [`Config::from_file`] without a file layer.
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(overrides.as_provider());

        Ok(figment.extract()?)
    }

    pub fn filter_expiration(&self) -> Duration {
        Duration::from_secs(self.filter_expiration_secs)
    }
}
