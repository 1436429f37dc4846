use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A place name resolved to coordinates by the geocoding source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Latest PM2.5 measurement reported by one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub latitude: f64,
    pub longitude: f64,
    pub pm25_value: f64,
    pub station_name: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
    pub condition_label: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One day of the multi-day forecast, e.g. `Mon Jan 01`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date_label: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
}

/// Daily global CO₂ trend value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Co2Point {
    pub date: NaiveDate,
    pub ppm_value: f64,
}

/// Share of electricity produced from renewables, world aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewablePoint {
    pub year: i32,
    pub percentage: f64,
}

/// A satellite fire detection.
///
/// `confidence` is kept as the feed reports it: VIIRS uses `l`/`n`/`h`,
/// MODIS a `0..100` percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireHotspot {
    pub latitude: f64,
    pub longitude: f64,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub source_label: String,
    pub published_at: String,
}

/// Everything fetched for one dashboard refresh.
///
/// Each field degrades independently: a failed source leaves its field empty
/// (or `None`) and never affects the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    /// The place name the refresh was triggered with.
    pub query: String,
    pub location: Option<Location>,
    pub air_quality: Vec<AirQualityReading>,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: Vec<ForecastDay>,
    pub co2: Vec<Co2Point>,
    pub renewables: Vec<RenewablePoint>,
    pub fires: Vec<FireHotspot>,
    pub news: Vec<NewsItem>,
}

impl ResultBundle {
    /// Center for maps tied to the queried place: the resolved location when
    /// geocoding succeeded, otherwise `fallback`.
    pub fn map_center(&self, fallback: Coordinates) -> Coordinates {
        self.location
            .as_ref()
            .map(Location::coordinates)
            .unwrap_or(fallback)
    }
}
