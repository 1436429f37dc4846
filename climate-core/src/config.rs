use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{model::Coordinates, source::SourceId};

/// Map center used when the queried place cannot be resolved.
pub const DEFAULT_MAP_CENTER: Coordinates = Coordinates::new(20.0, 0.0);

/// City shown when neither the command line nor the config names one.
pub const DEFAULT_CITY: &str = "Delhi";

/// Upstream URL for each source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub air_quality: String,
    pub geocoding: String,
    pub weather: String,
    pub forecast: String,
    pub co2: String,
    pub renewables: String,
    pub fires: String,
    pub news: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            air_quality: "https://api.openaq.org/v2/latest".into(),
            geocoding: "https://geocoding-api.open-meteo.com/v1/search".into(),
            weather: "https://api.open-meteo.com/v1/forecast".into(),
            forecast: "https://api.open-meteo.com/v1/forecast".into(),
            co2: "https://global-warming.org/api/co2-api".into(),
            renewables:
                "https://raw.githubusercontent.com/owid/energy-data/master/owid-energy-data.csv"
                    .into(),
            fires: "https://firms.modaps.eosdis.nasa.gov/data/active_fire/viirs/csv/VIIRS_SNPP_SP_24h.csv"
                .into(),
            news: "https://rss.nytimes.com/services/xml/rss/nyt/Climate.xml".into(),
        }
    }
}

impl Endpoints {
    pub fn url(&self, id: SourceId) -> &str {
        match id {
            SourceId::AirQuality => &self.air_quality,
            SourceId::Geocoding => &self.geocoding,
            SourceId::Weather => &self.weather,
            SourceId::Forecast => &self.forecast,
            SourceId::Co2 => &self.co2,
            SourceId::Renewables => &self.renewables,
            SourceId::Fires => &self.fires,
            SourceId::News => &self.news,
        }
    }
}

/// HTTP client settings shared by every source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("climate-dashboard/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Shortest per-request timeout handed to the HTTP client.
pub const MIN_TIMEOUT_SECS: u64 = 1;

impl HttpSettings {
    /// A zero timeout would fail every request, so it is raised to
    /// [`MIN_TIMEOUT_SECS`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "Delhi"
/// refresh_deadline_secs = 20
///
/// [http]
/// timeout_secs = 10
///
/// [endpoints]
/// news = "https://rss.nytimes.com/services/xml/rss/nyt/Climate.xml"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_city: Option<String>,

    /// Label attached to every news item.
    pub news_source_label: String,

    /// Upper bound for a whole refresh. Sources still pending when it
    /// expires are cancelled and left empty.
    pub refresh_deadline_secs: Option<u64>,

    pub fallback_center: Coordinates,

    pub http: HttpSettings,

    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: None,
            news_source_label: "NYT Climate".into(),
            refresh_deadline_secs: None,
            fallback_center: DEFAULT_MAP_CENTER,
            http: HttpSettings::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Pick the city to show: explicit argument, then configured default,
    /// then [`DEFAULT_CITY`].
    pub fn city_or_default(&self, arg: Option<&str>) -> String {
        arg.map(str::to_owned)
            .or_else(|| self.default_city.clone())
            .unwrap_or_else(|| DEFAULT_CITY.to_string())
    }

    pub fn refresh_deadline(&self) -> Option<Duration> {
        self.refresh_deadline_secs.map(Duration::from_secs)
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "climate-dashboard", "climate-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
