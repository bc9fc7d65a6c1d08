//! Application configuration.
//!
//! Values come from an optional TOML file and are then overridden by
//! command-line flags:
//!
//! ```toml
//! locale = "ru"
//! theme = "light"
//! bridge = "host.jsonl"
//! log_file = "rug.log"
//! log_level = "info"
//! image_scale = 1
//!
//! [pricing]
//! odor_removal_fee = 25
//!
//! [pricing.standard]
//! short = 10
//! long = 11
//!
//! [pricing.premium]
//! short = 13
//! long = 15
//! ```
//!
//! Every key is optional; a `[pricing]` section, when present, must be
//! complete.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rug_core::render::Theme;
use rug_core::{Locale, PricingError, PricingTable};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::logging::DEFAULT_LOG_LEVEL;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rug-calc.toml";

/// Largest supported `image_scale`.
pub const MAX_IMAGE_SCALE: u32 = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid pricing table: {0}")]
    Pricing(#[from] PricingError),

    #[error("image_scale must be between 1 and {MAX_IMAGE_SCALE}, got {0}")]
    ImageScale(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub locale: Locale,
    pub theme: Theme,
    /// Host bridge channel. Without it the bridge strategy is unavailable.
    pub bridge: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    /// Multiplier for the 640×360 result card.
    pub image_scale: u32,
    pub pricing: PricingTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            theme: Theme::default(),
            bridge: None,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            image_scale: 1,
            pricing: PricingTable::default(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub locale: Option<Locale>,
    pub theme: Option<Theme>,
    pub bridge: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads and validates the configuration.
    ///
    /// With `path` the file must exist. Without it [`DEFAULT_CONFIG_FILE`] is
    /// used if present, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pricing.validate()?;
        if !(1..=MAX_IMAGE_SCALE).contains(&self.image_scale) {
            return Err(ConfigError::ImageScale(self.image_scale));
        }
        Ok(())
    }

    pub fn apply(
        &mut self,
        overrides: Overrides,
    ) {
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if overrides.bridge.is_some() {
            self.bridge = overrides.bridge;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // loading tests
    // =========================================================================

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn full_file_is_parsed() {
        let file = write_config(
            r#"
            locale = "en"
            theme = "dark"
            bridge = "host.jsonl"
            log_level = "debug"
            image_scale = 2

            [pricing]
            odor_removal_fee = 30

            [pricing.standard]
            short = 12
            long = "12.5"

            [pricing.premium]
            short = 14
            long = 16
            "#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.bridge, Some(PathBuf::from("host.jsonl")));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.image_scale, 2);
        assert_eq!(config.pricing.standard.long, dec!(12.5));
        assert_eq!(config.pricing.premium.short, dec!(14));
        assert_eq!(config.pricing.odor_removal_fee, dec!(30));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = AppConfig::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("colour = \"blue\"\n");

        let err = AppConfig::load(Some(file.path())).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn non_positive_rate_is_rejected() {
        let file = write_config(
            r#"
            [pricing]
            odor_removal_fee = 25
            [pricing.standard]
            short = 0
            long = 11
            [pricing.premium]
            short = 13
            long = 15
            "#,
        );

        let err = AppConfig::load(Some(file.path())).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Pricing(PricingError::NonPositiveRate { .. })
        ));
    }

    #[test]
    fn image_scale_out_of_range_is_rejected() {
        let file = write_config("image_scale = 9\n");

        let err = AppConfig::load(Some(file.path())).unwrap_err();

        assert!(matches!(err, ConfigError::ImageScale(9)));
    }

    // =========================================================================
    // override tests
    // =========================================================================

    #[test]
    fn overrides_replace_only_given_values() {
        let mut config = AppConfig {
            bridge: Some(PathBuf::from("from-file.jsonl")),
            ..AppConfig::default()
        };

        config.apply(Overrides {
            locale: Some(Locale::En),
            log_level: Some("trace".to_string()),
            ..Overrides::default()
        });

        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.bridge, Some(PathBuf::from("from-file.jsonl")));
        assert_eq!(config.log_level, "trace");
    }
}
