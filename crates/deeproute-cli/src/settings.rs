//! Configuration loading for the deeproute CLI

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use deeproute_bandit::policy::DEFAULT_UCB_EXPLORATION;
use deeproute_bandit::PolicyOptions;

pub const CONFIG_FILE_NAME: &str = "deeproute.toml";

/// Effective settings for a CLI invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub run: RunSettings,
    pub bandit: BanditSettings,
    pub logging: LoggingSettings,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub reward_table: PathBuf,
    /// Defaults to every row of the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<usize>,
    /// Defaults to every column of the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arms: Option<usize>,
    pub policy: String,
    pub seed: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            reward_table: PathBuf::from("Networkpath_rand.csv"),
            rounds: None,
            arms: None,
            policy: "ucb".to_string(),
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditSettings {
    pub ucb_exploration: f64,
}

impl Default for BanditSettings {
    fn default() -> Self {
        Self {
            ucb_exploration: DEFAULT_UCB_EXPLORATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl Settings {
    /// Load settings from defaults, the config file, then `DEEPROUTE__*` environment variables
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = Self::find_config_file(explicit)?;

        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = &config_path {
            builder = builder.add_source(File::from(path.clone()).required(true));
        }

        // DEEPROUTE__RUN__ROUNDS=500 overrides run.rounds
        builder = builder.add_source(
            Environment::with_prefix("DEEPROUTE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to read configuration")?;

        let mut settings: Settings = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        settings.source = config_path;
        Ok(settings)
    }

    /// Find the configuration file
    fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        // An explicit --config must exist; the fallbacks are optional.
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Ok(Some(path.to_path_buf()));
        }

        // Check in order: DEEPROUTE_CONFIG env, ./deeproute.toml, ~/.config/deeproute/deeproute.toml
        let candidates = [
            std::env::var("DEEPROUTE_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from(CONFIG_FILE_NAME)),
            dirs::config_dir().map(|d| d.join("deeproute").join(CONFIG_FILE_NAME)),
        ];

        Ok(candidates.into_iter().flatten().find(|p| p.exists()))
    }

    /// Policy construction options derived from the settings
    pub fn policy_options(&self) -> PolicyOptions {
        PolicyOptions {
            seed: self.run.seed,
            ucb_exploration: self.bandit.ucb_exploration,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
