use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

use crate::error::Result;
use crate::models::{TierThresholds, Vocabularies};

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub vocabulary: VocabularySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MatchingSettings {
    #[serde(default = "default_almost_max_missing")]
    pub almost_max_missing: u32,
    #[serde(default = "default_almost_min_percent")]
    #[validate(range(min = 0, max = 100))]
    pub almost_min_percent: u8,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub default_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            almost_max_missing: default_almost_max_missing(),
            almost_min_percent: default_almost_min_percent(),
            default_limit: default_limit(),
        }
    }
}

fn default_almost_max_missing() -> u32 { 1 }
fn default_almost_min_percent() -> u8 { 70 }
fn default_limit() -> usize { 50 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabularySettings {
    /// TOML file with the vocabularies; the bundled set is used when absent.
    #[serde(default)]
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
    /// 4. Environment variables (prefixed with CASTING__)
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenv::dotenv().ok();

        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CASTING__MATCHING__ALMOST_MIN_PERCENT -> matching.almost_min_percent
            .add_source(environment())
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn tier_thresholds(&self) -> TierThresholds {
        TierThresholds {
            almost_max_missing: self.matching.almost_max_missing,
            almost_min_percent: self.matching.almost_min_percent,
        }
    }

    /// Vocabularies from the configured file, or the bundled set.
    pub fn vocabularies(&self) -> Result<Vocabularies> {
        match &self.vocabulary.path {
            Some(path) => Vocabularies::from_path(path),
            None => Vocabularies::bundled(),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("CASTING")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_thresholds() {
        let settings = Settings::default();
        assert_eq!(settings.tier_thresholds(), TierThresholds::default());
        assert_eq!(settings.matching.default_limit, 50);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("casting-settings-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[matching]\nalmost_max_missing = 2\nalmost_min_percent = 80").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.matching.almost_max_missing, 2);
        assert_eq!(settings.matching.almost_min_percent, 80);
        assert_eq!(settings.matching.default_limit, 50);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_out_of_range_percent_rejected() {
        let settings = Settings {
            matching: MatchingSettings {
                almost_min_percent: 120,
                ..MatchingSettings::default()
            },
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bundled_vocabularies_without_path() {
        let settings = Settings::default();
        let vocabularies = settings.vocabularies().unwrap();
        assert!(vocabularies.areas.contains("recepcao"));
    }
}
