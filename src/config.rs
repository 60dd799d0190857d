//! Configuration file handling

use crate::{
    control::initial_value::{FixedValue, InitialValueProvider, ServiceDefault},
    external::dbus::BusType,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Contents of the TOML configuration file.
///
/// ```toml
/// bus = "system"
/// log_level = "info"
/// initial_brightness = 120
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bus on which powerd is looked up
    pub bus: BusType,
    /// flexi_logger specification, e.g. `info` or `debug, zbus=warn`
    pub log_level: String,
    /// Brightness pushed to powerd on start instead of its default
    pub initial_brightness: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bus: BusType::System,
            log_level: "info".to_owned(),
            initial_brightness: None,
        }
    }
}

impl Config {
    pub fn parse(contents: &str) -> Result<Config> {
        toml::from_str(contents).context("Couldn't parse configuration")
    }

    /// Load the configuration from `path`, or the defaults if there is none
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Couldn't read {}", path.display()))?;
                Self::parse(&contents)
            }
            None => Ok(Config::default()),
        }
    }

    /// The provider of the brightness new sessions start with
    pub fn initial_value_provider(&self) -> Box<dyn InitialValueProvider> {
        match self.initial_brightness {
            Some(value) => Box::new(FixedValue(value)),
            None => Box::new(ServiceDefault),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::external::brightness::BrightnessParams;

    const PARAMS: BrightnessParams = BrightnessParams {
        dim: 10,
        min: 0,
        max: 100,
        default: 50,
        ab_supported: false,
    };

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bus, BusType::System);
        assert_eq!(config.initial_value_provider().initial_value(&PARAMS), Some(50));
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            bus = "session"
            log_level = "debug"
            initial_brightness = 80
            "#,
        )
        .unwrap();
        assert_eq!(config.bus, BusType::Session);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.initial_value_provider().initial_value(&PARAMS), Some(80));
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("bus = \"serial\"").is_err());
        assert!(Config::parse("dim_percentage = 50").is_err());
        assert!(Config::parse("initial_brightness = \"high\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("powerd-brightness-no-such-config.toml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
