use std::env;
use std::path::Path;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Lookup target used by strategies that do not name one.
    #[serde(default)]
    pub default_lookup_target: Option<String>,
    #[serde(default)]
    pub strategies: Vec<StrategySettings>,
    /// Identities the check tool loads into its in-memory store.
    #[serde(default)]
    pub seed_identities: Vec<SeedIdentity>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StrategySettings {
    pub name: String,
    #[serde(default)]
    pub lookup_target: Option<String>,
    /// Raw specifiers: `login`, or colon separated paths such as `user:login`.
    #[serde(default)]
    pub required_params: Vec<String>,
    #[serde(default)]
    pub verification_routine: Option<String>,
    #[serde(default)]
    pub failure_message: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedIdentity {
    pub login: String,
    pub password: String,
}

impl Settings {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (STRATEGIES__DEFAULT_LOOKUP_TARGET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("STRATEGIES").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an explicit file, still honouring environment
    /// overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("STRATEGIES").separator("__"))
            .build()?
            .try_deserialize()
    }
}
