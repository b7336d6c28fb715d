use log::info;
use serde::{Deserialize, Serialize};
use serde_yml;
use std::fs;
use std::path::Path;
use thiserror::Error;

fn device_name_default() -> String { return "dsmr".to_string() }
fn publish_interval_default() -> u64 { return 60 }

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    /// Prefix for measurement entity ids, sensor.<device_name>_<key>
    #[serde(default="device_name_default")]
    pub device_name: String,
    /// Seconds between status sensor publications
    #[serde(default="publish_interval_default")]
    pub publish_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device_name: device_name_default(),
            publish_interval: publish_interval_default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse config file: {0}")]
    Parse(#[from] serde_yml::Error),
}

impl Config {
    /// Check the two known config file locations; without a config file the
    /// defaults apply.
    pub fn load() -> Result<Self, ConfigError> {
        for path in ["config/dsmr2ha.yaml", "dsmr2ha.yaml"] {
            if Path::new(path).exists() {
                return Self::load_from(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Config::default())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = serde_yml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "device_name: p1\npublish_interval: 30\n").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.device_name, "p1");
        assert_eq!(config.publish_interval, 30);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "device_name: p1\n").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.device_name, "p1");
        assert_eq!(config.publish_interval, 60);
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let result = Config::load_from("does/not/exist.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "publish_interval: [not a number\n").unwrap();

        let result = Config::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
