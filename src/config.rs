//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-calendar.toml file.
//! It holds where tide tables are downloaded from and the site registry: the fixed
//! mapping from a tide-table site name to the coordinates used for sunrise/sunset.
//!
//! The configuration is loaded once at start-up and passed down explicitly.

use crate::{Observer, TideError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tide-calendar.toml";

/// Application configuration loaded from tide-calendar.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Site used when none is given on the command line
    pub default_site: String,
    /// Tide table download settings
    pub source: SourceConfig,
    /// Site registry: tide-table site name to coordinates
    pub sites: BTreeMap<String, SiteConfig>,
}

/// Where and how tide tables are fetched
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the published tables; `present/` and `next/` live below it
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Location of a tide prediction site
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            base_url: "https://cams.bangor.ac.uk/dataproducts/local_forecasts/tide_tables"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let sites = [
            ("Liverpool", 53.4555809, -3.0224621),
            ("Menai Bridge", 53.222816, -4.1621462),
            ("Port Dinorwic", 53.1837381, -4.2161348),
            ("Conwy", 53.2957327, -3.849208),
            ("Caernarfon", 53.1399465, -4.2794888),
            ("Beaumaris", 53.2609341, -4.0951639),
        ]
        .into_iter()
        .map(|(name, latitude, longitude)| {
            (
                name.to_string(),
                SiteConfig {
                    latitude,
                    longitude,
                },
            )
        })
        .collect();

        Config {
            default_site: "Liverpool".to_string(),
            source: SourceConfig::default(),
            sites,
        }
    }
}

impl Config {
    /// Load configuration from tide-calendar.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        sites = config.sites.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "invalid config file, using defaults"
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Observer for a registered site.
    ///
    /// Fails with [`TideError::InvalidInput`] for an unknown site or
    /// coordinates out of range.
    pub fn observer(&self, site: &str) -> Result<Observer, TideError> {
        let location = self.sites.get(site).ok_or_else(|| {
            let known: Vec<&str> = self.sites.keys().map(String::as_str).collect();
            TideError::InvalidInput(format!(
                "unknown site {site:?}, expected one of {}",
                known.join(", ")
            ))
        })?;
        Observer::new(location.latitude, location.longitude)
    }
}
