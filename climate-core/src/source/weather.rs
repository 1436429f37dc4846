//! Current conditions and the daily forecast from Open-Meteo.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::SourceError,
    model::{ForecastDay, Location, WeatherSnapshot},
};

use super::{DataSource, SourceId, SourceQuery, get_text, round1};

/// Condition labels for the WMO weather codes the dashboard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    MostlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Rain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1 => WeatherCondition::MostlyClear,
            2 => WeatherCondition::PartlyCloudy,
            3 => WeatherCondition::Overcast,
            45 => WeatherCondition::Fog,
            61 => WeatherCondition::Rain,
            71 => WeatherCondition::Snow,
            95 => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::MostlyClear => "Mostly Clear",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
            WeatherCondition::Overcast => "Overcast",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Unknown => "Unknown",
        }
    }
}

const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";
const DATE_LABEL_FORMAT: &str = "%a %b %d";

fn coordinate_params(location: &Location) -> (String, String) {
    (location.latitude.to_string(), location.longitude.to_string())
}

#[derive(Debug, Clone)]
pub struct CurrentWeatherSource {
    http: Client,
    url: String,
}

impl CurrentWeatherSource {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: i64,
}

pub fn parse_current(body: &str, location: &Location) -> Result<WeatherSnapshot, SourceError> {
    let parsed: OmCurrentResponse = serde_json::from_str(body)?;
    let current = parsed.current;

    Ok(WeatherSnapshot {
        temperature_c: round1(current.temperature_2m),
        feels_like_c: round1(current.apparent_temperature),
        humidity_pct: current.relative_humidity_2m,
        wind_speed_ms: round1(current.wind_speed_10m),
        condition_label: WeatherCondition::from_code(current.weather_code)
            .label()
            .to_string(),
        latitude: location.latitude,
        longitude: location.longitude,
    })
}

#[async_trait]
impl DataSource for CurrentWeatherSource {
    type Output = Option<WeatherSnapshot>;

    fn id(&self) -> SourceId {
        SourceId::Weather
    }

    async fn try_fetch(&self, query: &SourceQuery) -> Result<Self::Output, SourceError> {
        let location = query.require_location()?;
        let (lat, lon) = coordinate_params(location);

        let body = get_text(
            &self.http,
            &self.url,
            &[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("current", CURRENT_FIELDS),
                ("wind_speed_unit", "ms"),
            ],
        )
        .await?;

        parse_current(&body, location).map(Some)
    }
}

#[derive(Debug, Clone)]
pub struct ForecastSource {
    http: Client,
    url: String,
}

impl ForecastSource {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmDailyResponse {
    daily: OmDaily,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

pub fn parse_forecast(body: &str) -> Result<Vec<ForecastDay>, SourceError> {
    let parsed: OmDailyResponse = serde_json::from_str(body)?;
    let daily = parsed.daily;

    let mut days = Vec::with_capacity(daily.time.len());
    for ((date, max), min) in daily
        .time
        .iter()
        .zip(daily.temperature_2m_max)
        .zip(daily.temperature_2m_min)
    {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| SourceError::Malformed(format!("forecast date '{date}': {e}")))?;

        let (Some(max_temp_c), Some(min_temp_c)) = (max, min) else {
            continue;
        };

        days.push(ForecastDay {
            date_label: date.format(DATE_LABEL_FORMAT).to_string(),
            max_temp_c,
            min_temp_c,
        });
    }

    if days.is_empty() {
        return Err(SourceError::Empty);
    }

    Ok(days)
}

#[async_trait]
impl DataSource for ForecastSource {
    type Output = Vec<ForecastDay>;

    fn id(&self) -> SourceId {
        SourceId::Forecast
    }

    async fn try_fetch(&self, query: &SourceQuery) -> Result<Self::Output, SourceError> {
        let location = query.require_location()?;
        let (lat, lon) = coordinate_params(location);

        let body = get_text(
            &self.http,
            &self.url,
            &[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
            ],
        )
        .await?;

        parse_forecast(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> Location {
        Location {
            name: "Delhi".into(),
            latitude: 28.65,
            longitude: 77.23,
        }
    }

    #[test]
    fn known_codes_map_to_labels() {
        let labels: Vec<_> = [0, 1, 2, 3, 45, 61, 71, 95]
            .into_iter()
            .map(|c| WeatherCondition::from_code(c).label())
            .collect();

        assert_eq!(
            labels,
            [
                "Clear",
                "Mostly Clear",
                "Partly Cloudy",
                "Overcast",
                "Fog",
                "Rain",
                "Snow",
                "Thunderstorm"
            ]
        );
    }

    #[test]
    fn unmapped_codes_are_unknown() {
        for code in [4, 51, 63, 80, 96, 99, -1] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Unknown);
        }
    }

    #[test]
    fn current_conditions_are_rounded_and_labelled() {
        let body = r#"{"latitude":28.625,"longitude":77.25,
            "current":{"time":"2024-01-10T08:00","temperature_2m":14.26,"apparent_temperature":12.94,
            "relative_humidity_2m":77,"wind_speed_10m":2.36,"weather_code":45}}"#;

        let snapshot = parse_current(body, &delhi()).expect("snapshot");
        assert_eq!(snapshot.temperature_c, 14.3);
        assert_eq!(snapshot.feels_like_c, 12.9);
        assert_eq!(snapshot.humidity_pct, 77.0);
        assert_eq!(snapshot.wind_speed_ms, 2.4);
        assert_eq!(snapshot.condition_label, "Fog");
        assert_eq!((snapshot.latitude, snapshot.longitude), (28.65, 77.23));
    }

    #[test]
    fn current_with_unmapped_code_is_unknown() {
        let body = r#"{"current":{"temperature_2m":1,"apparent_temperature":0,
            "relative_humidity_2m":90,"wind_speed_10m":3,"weather_code":73}}"#;

        let snapshot = parse_current(body, &delhi()).expect("snapshot");
        assert_eq!(snapshot.condition_label, "Unknown");
    }

    #[test]
    fn current_missing_block_is_parse_error() {
        let err = parse_current(r#"{"latitude":1.0}"#, &delhi()).unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[test]
    fn forecast_days_get_short_labels_in_order() {
        let body = r#"{"daily":{
            "time":["2024-01-01","2024-01-02","2024-01-03"],
            "temperature_2m_max":[18.1,19.4,null],
            "temperature_2m_min":[7.0,8.2,6.5]}}"#;

        let days = parse_forecast(body).expect("forecast");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date_label, "Mon Jan 01");
        assert_eq!(days[0].max_temp_c, 18.1);
        assert_eq!(days[1].date_label, "Tue Jan 02");
        assert_eq!(days[1].min_temp_c, 8.2);
    }

    #[test]
    fn forecast_with_bad_date_is_malformed() {
        let body = r#"{"daily":{"time":["01/02/2024"],
            "temperature_2m_max":[1.0],"temperature_2m_min":[0.0]}}"#;

        let err = parse_forecast(body).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[tokio::test]
    async fn sources_without_location_stay_empty() {
        let query = SourceQuery::new("Nowhere");
        let current = CurrentWeatherSource::new(Client::new(), "http://127.0.0.1:9/forecast");
        let forecast = ForecastSource::new(Client::new(), "http://127.0.0.1:9/forecast");

        assert_eq!(current.fetch(&query).await, None);
        assert!(forecast.fetch(&query).await.is_empty());
    }
}
