//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Feed engine configuration.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Feed engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Maximum read-transform-write attempts before a contended mutation
    /// gives up.
    #[serde(default = "default_max_mutation_attempts")]
    pub max_mutation_attempts: u32,
    /// Maximum number of options on a poll or survey.
    #[serde(default = "default_max_options")]
    pub max_options: usize,
    /// Maximum length of a single option text.
    #[serde(default = "default_max_option_length")]
    pub max_option_length: usize,
    /// Maximum poll/survey lifetime in seconds.
    #[serde(default = "default_max_vote_duration_secs")]
    pub max_vote_duration_secs: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_mutation_attempts: default_max_mutation_attempts(),
            max_options: default_max_options(),
            max_option_length: default_max_option_length(),
            max_vote_duration_secs: default_max_vote_duration_secs(),
        }
    }
}

const fn default_max_mutation_attempts() -> u32 {
    5
}

const fn default_max_options() -> usize {
    10
}

const fn default_max_option_length() -> usize {
    100
}

const fn default_max_vote_duration_secs() -> i64 {
    2_592_000 // 30 days
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `AGORA_ENV`)
    /// 3. Environment variables with `AGORA_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("AGORA_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("AGORA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("AGORA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_config_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.max_mutation_attempts, 5);
        assert_eq!(config.max_options, 10);
        assert_eq!(config.max_option_length, 100);
        assert_eq!(config.max_vote_duration_secs, 2_592_000);
    }
}
