//! Global shiftcal configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_FORECAST_DAYS};
use crate::error::{ShiftCalError, ShiftCalResult};
use crate::grid::ViewMode;
use crate::shift::ShiftType;
use crate::storage::FileStorage;
use crate::weather::DEFAULT_WEATHER_URL;

static DEFAULT_DATA_DIR: &str = "~/.local/share/shiftcal";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_fetch_timeout() -> String {
    format!("{}s", DEFAULT_FETCH_TIMEOUT_SECS)
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_forecast_days() -> usize {
    DEFAULT_FORECAST_DAYS
}

fn default_weather_url() -> String {
    DEFAULT_WEATHER_URL.to_string()
}

/// Configuration at ~/.config/shiftcal/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShiftcalConfig {
    /// Directory holding the persisted JSON documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub default_view: ViewMode,

    /// Per-request timeout for feeds and weather, e.g. "30s"
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: String,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub shift_times: ShiftTimes,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            api_key: None,
            latitude: None,
            longitude: None,
            units: default_units(),
            forecast_days: default_forecast_days(),
            base_url: default_weather_url(),
        }
    }
}

impl WeatherConfig {
    /// (api_key, latitude, longitude) when weather is fully configured.
    pub fn credentials(&self) -> Option<(&str, f64, f64)> {
        Some((self.api_key.as_deref()?, self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimePair {
    pub start: String,
    pub end: String,
}

/// Overrides for the default shift times.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ShiftTimes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning: Option<TimePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<TimePair>,
}

impl ShiftTimes {
    pub fn times_for(&self, shift_type: ShiftType) -> (String, String) {
        let configured = match shift_type {
            ShiftType::Morning => self.morning.as_ref(),
            ShiftType::Afternoon => self.afternoon.as_ref(),
            ShiftType::RestDay => None,
        };

        match configured {
            Some(pair) => (pair.start.clone(), pair.end.clone()),
            None => {
                let (start, end) = shift_type.default_times();
                (start.to_string(), end.to_string())
            }
        }
    }
}

impl ShiftcalConfig {
    pub fn config_path() -> ShiftCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ShiftCalError::Config("Could not determine config directory".into()))?
            .join("shiftcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/shiftcal/config.toml, creating it with commented
    /// defaults on first run. `SHIFTCAL__<KEY>` environment variables override it.
    pub fn load() -> ShiftCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ShiftCalResult<Self> {
        let config: ShiftcalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("SHIFTCAL").separator("__").try_parsing(true))
            .build()
            .map_err(|e| ShiftCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ShiftCalError::Config(e.to_string()))?;

        tracing::debug!(path = %path.display(), data_dir = %config.data_dir.display(), "loaded config");
        Ok(config)
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.data_path())
    }

    pub fn fetch_timeout(&self) -> ShiftCalResult<Duration> {
        humantime::parse_duration(&self.fetch_timeout).map_err(|e| {
            ShiftCalError::Config(format!("Invalid fetch_timeout '{}': {}", self.fetch_timeout, e))
        })
    }

    /// Save the current config to `path`.
    pub fn save(&self, path: &Path) -> ShiftCalResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ShiftCalError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ShiftCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ShiftCalResult<()> {
        let contents = format!(
            "\
# shiftcal configuration

# Where shifts, events and feed subscriptions are stored:
# data_dir = \"{}\"

# View shown by `shiftcal show` (month, week or day):
# default_view = \"month\"

# Timeout for each feed or weather request:
# fetch_timeout = \"{}\"

# Weather sidebar (OpenWeatherMap API key and coordinates):
# [weather]
# api_key = \"...\"
# latitude = 52.52
# longitude = 13.40
# units = \"metric\"
# forecast_days = {}

# Default shift times:
# [shift_times.morning]
# start = \"06:00\"
# end = \"14:00\"
",
            DEFAULT_DATA_DIR,
            default_fetch_timeout(),
            DEFAULT_FORECAST_DAYS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ShiftCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ShiftCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
