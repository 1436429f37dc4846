use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{error::SourceError, model::AirQualityReading};

use super::{DataSource, SourceId, SourceQuery, get_text};

/// Pollutant requested from OpenAQ.
pub const PARAMETER: &str = "pm25";

/// Latest PM2.5 readings from OpenAQ stations in a city.
///
/// Queried by place name rather than coordinates.
#[derive(Debug, Clone)]
pub struct AirQualitySource {
    http: Client,
    url: String,
}

impl AirQualitySource {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OaqResponse {
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct OaqStation {
    location: String,
    coordinates: Option<OaqCoordinates>,
    #[serde(default)]
    measurements: Vec<OaqMeasurement>,
}

#[derive(Debug, Deserialize)]
struct OaqCoordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OaqMeasurement {
    value: f64,
    last_updated: String,
}

impl OaqStation {
    fn into_reading(self) -> Option<AirQualityReading> {
        let coordinates = self.coordinates?;
        let measurement = self.measurements.into_iter().next()?;

        Some(AirQualityReading {
            latitude: coordinates.latitude?,
            longitude: coordinates.longitude?,
            pm25_value: measurement.value,
            station_name: self.location,
            last_updated: measurement.last_updated,
        })
    }
}

/// Decode stations one by one so a single odd record doesn't cost the rest.
pub fn parse_readings(body: &str) -> Result<Vec<AirQualityReading>, SourceError> {
    let parsed: OaqResponse = serde_json::from_str(body)?;
    let total = parsed.results.len();

    let readings: Vec<AirQualityReading> = parsed
        .results
        .into_iter()
        .filter_map(|raw| serde_json::from_value::<OaqStation>(raw).ok())
        .filter_map(OaqStation::into_reading)
        .collect();

    if readings.len() < total {
        debug!(
            skipped = total - readings.len(),
            kept = readings.len(),
            "dropped stations without coordinates or measurements"
        );
    }

    if readings.is_empty() {
        return Err(SourceError::Empty);
    }

    Ok(readings)
}

#[async_trait]
impl DataSource for AirQualitySource {
    type Output = Vec<AirQualityReading>;

    fn id(&self) -> SourceId {
        SourceId::AirQuality
    }

    async fn try_fetch(&self, query: &SourceQuery) -> Result<Self::Output, SourceError> {
        // An empty city filter would return stations from anywhere.
        if query.place.trim().is_empty() {
            return Err(SourceError::Empty);
        }

        let body = get_text(
            &self.http,
            &self.url,
            &[("city", query.place.as_str()), ("parameter", PARAMETER)],
        )
        .await?;

        parse_readings(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"meta":{"found":3},"results":[
        {"location":"Anand Vihar","city":"Delhi",
         "coordinates":{"latitude":28.6508,"longitude":77.3152},
         "measurements":[{"parameter":"pm25","value":187.0,"lastUpdated":"2024-01-10T08:00:00+00:00","unit":"µg/m³"}]},
        {"location":"No Coords","city":"Delhi","coordinates":null,
         "measurements":[{"parameter":"pm25","value":90.0,"lastUpdated":"2024-01-10T08:00:00+00:00","unit":"µg/m³"}]},
        {"location":"RK Puram","city":"Delhi",
         "coordinates":{"latitude":28.5633,"longitude":77.1869},
         "measurements":[{"parameter":"pm25","value":42.5,"lastUpdated":"2024-01-10T07:45:00+00:00","unit":"µg/m³"}]}
    ]}"#;

    #[test]
    fn station_without_coordinates_is_skipped() {
        let readings = parse_readings(BODY).expect("readings");

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].station_name, "Anand Vihar");
        assert_eq!(readings[0].pm25_value, 187.0);
        assert_eq!(readings[1].station_name, "RK Puram");
        assert_eq!(readings[1].last_updated, "2024-01-10T07:45:00+00:00");
    }

    #[test]
    fn station_without_measurements_or_with_odd_shape_is_skipped() {
        let body = r#"{"results":[
            {"location":"Empty","coordinates":{"latitude":1.0,"longitude":2.0},"measurements":[]},
            {"location":"Odd","coordinates":{"latitude":1.0,"longitude":2.0},
             "measurements":[{"value":"n/a","lastUpdated":"x"}]},
            {"location":"Half","coordinates":{"latitude":1.0},
             "measurements":[{"value":3.0,"lastUpdated":"x"}]},
            {"location":"Fine","coordinates":{"latitude":1.0,"longitude":2.0},
             "measurements":[{"value":12.0,"lastUpdated":"2024-01-01"}]}
        ]}"#;

        let readings = parse_readings(body).expect("readings");
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].station_name, "Fine");
    }

    #[test]
    fn no_usable_station_is_empty() {
        let err = parse_readings(r#"{"results":[]}"#).unwrap_err();
        assert!(matches!(err, SourceError::Empty));
    }

    #[tokio::test]
    async fn blank_place_is_not_queried() {
        // Nothing listens here; a request would surface as a network error.
        let source = AirQualitySource::new(Client::new(), "http://127.0.0.1:9/v2/latest");

        let err = source.try_fetch(&SourceQuery::new("   ")).await.unwrap_err();
        assert!(matches!(err, SourceError::Empty));
    }

    #[test]
    fn wrong_envelope_is_parse_error() {
        let err = parse_readings(r#"{"error":"rate limited"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }
}
