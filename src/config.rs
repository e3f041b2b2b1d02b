use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::component::SunOrientInputs;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    /// One evaluation request for the command-line runner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<SunOrientInputs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_seconds: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("sun-orient/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file at `path`, then `SUN_ORIENT__*` variables
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("SUN_ORIENT__").split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_path(DEFAULT_CONFIG_PATH)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::figment(path).extract()?)
    }
}
