use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::{error::SourceError, model::Co2Point};

use super::{DataSource, SourceId, SourceQuery, get_text};

/// Number of most recent daily points kept.
pub const MAX_POINTS: usize = 365;

/// Daily global CO₂ trend from global-warming.org.
#[derive(Debug, Clone)]
pub struct Co2Source {
    http: Client,
    url: String,
}

impl Co2Source {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

// The API sends numbers as strings; accept either.
fn number_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct Co2Response {
    co2: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Co2Record {
    #[serde(deserialize_with = "number_text")]
    year: String,
    #[serde(deserialize_with = "number_text")]
    month: String,
    #[serde(deserialize_with = "number_text")]
    day: String,
    #[serde(deserialize_with = "number_text")]
    trend: String,
}

impl Co2Record {
    fn into_point(self) -> Option<Co2Point> {
        let date = NaiveDate::from_ymd_opt(
            self.year.parse().ok()?,
            self.month.parse().ok()?,
            self.day.parse().ok()?,
        )?;

        Some(Co2Point {
            date,
            ppm_value: self.trend.parse().ok()?,
        })
    }
}

/// Parse the series and keep the trailing [`MAX_POINTS`] entries, oldest first.
pub fn parse_series(body: &str) -> Result<Vec<Co2Point>, SourceError> {
    let parsed: Co2Response = serde_json::from_str(body)?;
    let total = parsed.co2.len();

    let mut points: Vec<Co2Point> = parsed
        .co2
        .into_iter()
        .filter_map(|raw| serde_json::from_value::<Co2Record>(raw).ok())
        .filter_map(Co2Record::into_point)
        .collect();

    if points.len() < total {
        debug!(skipped = total - points.len(), "dropped malformed CO₂ records");
    }

    if points.is_empty() {
        return Err(SourceError::Empty);
    }

    let excess = points.len().saturating_sub(MAX_POINTS);
    points.drain(..excess);

    Ok(points)
}

#[async_trait]
impl DataSource for Co2Source {
    type Output = Vec<Co2Point>;

    fn id(&self) -> SourceId {
        SourceId::Co2
    }

    async fn try_fetch(&self, _query: &SourceQuery) -> Result<Self::Output, SourceError> {
        let body = get_text(&self.http, &self.url, &[]).await?;
        parse_series(&body)
    }
}
