//! Startup configuration.
//!
//! Settings are read once from a JSON file (`config.json` in the working
//! directory, or the path named by `BARKEEP_CONFIG`). A missing or
//! malformed file is reported and the compiled-in defaults are used, so a
//! broken config never prevents the app from starting.

use log::error;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";
const DEFAULT_DATA_DIR: &str = ".";
const CONFIG_FILE: &str = "config.json";
const CONFIG_ENV: &str = "BARKEEP_CONFIG";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote recipe API, without a trailing slash.
    pub api_url: String,
    /// Directory holding the prefs database and the photos directory.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Config {
    /// Loads the configuration, falling back to defaults on any read or
    /// parse failure.
    pub fn load() -> Config {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
        match fs::read_to_string(&path) {
            Ok(contents) => match Config::parse(&contents) {
                Ok(config) => config,
                Err(e) => {
                    error!("Error reading config file {}: {}. Using defaults.", path, e);
                    Config::default()
                }
            },
            Err(e) => {
                error!("Config file {} not found: {}. Using defaults.", path, e);
                Config::default()
            }
        }
    }

    fn parse(contents: &str) -> Result<Config, String> {
        let value: serde_json::Value =
            serde_json::from_str(contents).map_err(|e| e.to_string())?;
        let api_url = value
            .get("api_url")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let data_dir = value
            .get("data_dir")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_DATA_DIR)
            .into();
        Ok(Config { api_url, data_dir })
    }

    /// Directory where captured photos are stored.
    pub fn photos_dir(&self) -> PathBuf {
        self.data_dir.join("photos")
    }
}
