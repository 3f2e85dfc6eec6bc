use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::api::ApiUrl;

pub use toml::de::Error as TomlError;

pub static PRODUCTION_CONFIG: Lazy<Config> = Lazy::new(|| {
    toml::from_str(include_str!("../../docs/config/prod.toml"))
        .expect("Failed to parse prod.toml config file")
});

pub static DEVELOPMENT_CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::try_toml(include_str!("../../docs/config/dev.toml"))
        .expect("Failed to parse dev.toml config file")
});

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
/// The environment in which the application is running
/// Defaults to [`Environment::Development`]
pub enum Environment {
    /// The default development setup is an API stub running locally.
    Development,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        Self::Development
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Base URL of the AdMob API, the version path segment included.
    pub api_url: ApiUrl,
    /// In milliseconds
    /// Sets the Client timeout of `AdMobApi` requests.
    pub fetch_timeout: u32,
    /// The API rejects groups with more ad source instances than this, so a
    /// single run can carry at most this many configuration rows.
    pub max_lines_per_group: u32,
    /// Page size of the ad unit, app and mediation group list calls.
    pub list_page_size: u32,
}

impl Config {
    /// Utility method that will deserialize a Toml file content into a [`Config`].
    ///
    /// Instead of relying on the `toml` crate directly, use this method instead.
    pub fn try_toml(toml: &str) -> Result<Self, TomlError> {
        toml::from_str(toml)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Toml parsing: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("File reading: {0}")]
    InvalidFile(#[from] std::io::Error),
}

/// If no `config_file` path is provided it will load the [`Environment`] configuration.
/// If `config_file` path is provided it will try to read and parse the file in Toml format.
pub fn configuration(
    environment: Environment,
    config_file: Option<&str>,
) -> Result<Config, ConfigError> {
    match config_file {
        Some(config_file) => {
            let content = std::fs::read(config_file)?;

            Ok(toml::from_slice(&content)?)
        }
        None => match environment {
            Environment::Production => Ok(PRODUCTION_CONFIG.clone()),
            Environment::Development => Ok(DEVELOPMENT_CONFIG.clone()),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn parses_the_embedded_configurations() {
        assert_eq!(
            "https://admob.googleapis.com/v1alpha/",
            PRODUCTION_CONFIG.api_url.as_str()
        );
        assert_eq!(150, PRODUCTION_CONFIG.max_lines_per_group);
        assert_eq!(1000, PRODUCTION_CONFIG.list_page_size);

        assert_eq!(150, DEVELOPMENT_CONFIG.max_lines_per_group);
        assert!(DEVELOPMENT_CONFIG.api_url.as_str().starts_with("http://127.0.0.1"));
    }

    #[test]
    fn environment_deserializes_from_camel_case() {
        let environment: Environment =
            serde_json::from_value(serde_json::Value::String("production".to_string()))
                .expect("Should deserialize");
        assert_eq!(Environment::Production, environment);

        assert_eq!(Environment::Development, Environment::default());
    }
}
