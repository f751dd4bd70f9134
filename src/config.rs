//! Application configuration.
//!
//! Loaded from a YAML file with every field defaulted, so an empty file
//! (or no file at all) yields a working configuration pointing at the
//! public Nominatim / Open-Meteo endpoints.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_seed() -> u64 {
    7
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Per-attempt bound for every outbound HTTP request.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub variant: Variant,
    /// Resolve queries against the built-in city catalog instead of the
    /// network, synthesizing weather from latitude and season.
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub default_location: DefaultLocation,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            request_timeout_ms: default_timeout_ms(),
            variant: Variant::default(),
            offline: false,
            default_location: DefaultLocation::default(),
            endpoints: Endpoints::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}

/// Which panel set the report renders. The two historical front-end
/// variants differed only in the panels shown, so they collapse into
/// one selection knob here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Current weather and climate projections only.
    Standard,
    /// Adds the environmental and risk assessment panels.
    #[default]
    Extended,
}

/// Substitute location when geocoding fails or finds nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultLocation {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self {
            lat: 40.7128,
            lng: -74.0060,
            name: "New York City".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_nominatim")]
    pub nominatim: String,
    #[serde(default = "default_open_meteo")]
    pub open_meteo: String,
    #[serde(default = "default_openweathermap")]
    pub openweathermap: String,
    #[serde(default = "default_openweathermap_api_key")]
    pub openweathermap_api_key: String,
    #[serde(default = "default_air_quality")]
    pub air_quality: String,
}

fn default_nominatim() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_open_meteo() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_openweathermap() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_openweathermap_api_key() -> String {
    "demo".to_string()
}

fn default_air_quality() -> String {
    "https://air-quality-api.open-meteo.com".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nominatim: default_nominatim(),
            open_meteo: default_open_meteo(),
            openweathermap: default_openweathermap(),
            openweathermap_api_key: default_openweathermap_api_key(),
            air_quality: default_air_quality(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.variant, Variant::Extended);
        assert!(!config.offline);
        assert_eq!(config.default_location.name, "New York City");
        assert!(config.endpoints.nominatim.contains("nominatim"));
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = Config::default();
        config.seed = 99;
        config.variant = Variant::Standard;
        config.offline = true;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_yaml::to_string(&config).unwrap().as_bytes())
            .unwrap();

        let loaded = Config::load(file.path()).unwrap();
        assert_eq!(loaded.seed, 99);
        assert_eq!(loaded.variant, Variant::Standard);
        assert!(loaded.offline);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load("does/not/exist.yaml").is_err());
    }
}
