use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::DEFAULT_MATCH_PROBABILITY;
use crate::session::DEFAULT_PEEK_DEPTH;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub invite: InviteSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_peek_depth")]
    pub peek_depth: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            peek_depth: default_peek_depth(),
        }
    }
}

fn default_peek_depth() -> usize { DEFAULT_PEEK_DEPTH }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Chance that an accept becomes a match
    #[serde(default = "default_match_probability")]
    pub probability: f64,
    /// Fixed seed for reproducible draws
    pub seed: Option<u64>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            probability: default_match_probability(),
            seed: None,
        }
    }
}

fn default_match_probability() -> f64 { DEFAULT_MATCH_PROBABILITY }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InviteSettings {
    /// Accepted codes; empty accepts any non-blank code
    #[serde(default)]
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// JSON candidate list; the built-in demo catalog is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LUME__, e.g. LUME__MATCHING__PROBABILITY)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LUME__MATCHING__PROBABILITY -> matching.probability
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize::<Settings>()?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&self.matching.probability) {
            return Err(ConfigError::Message(format!(
                "matching.probability must be within [0, 1], got {}",
                self.matching.probability
            )));
        }
        Ok(self)
    }
}

fn environment() -> Environment {
    // LUME__INVITE__CODES=A,B -> invite.codes = ["A", "B"]
    Environment::with_prefix("LUME")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("invite.codes")
        .try_parsing(true)
}
