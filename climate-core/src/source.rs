use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{error::SourceError, model::Location};

pub mod air_quality;
pub mod co2;
pub mod fires;
pub mod geocoding;
pub mod news;
pub mod renewables;
pub mod weather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    AirQuality,
    Geocoding,
    Weather,
    Forecast,
    Co2,
    Renewables,
    Fires,
    News,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::AirQuality => "air_quality",
            SourceId::Geocoding => "geocoding",
            SourceId::Weather => "weather",
            SourceId::Forecast => "forecast",
            SourceId::Co2 => "co2",
            SourceId::Renewables => "renewables",
            SourceId::Fires => "fires",
            SourceId::News => "news",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[
            SourceId::AirQuality,
            SourceId::Geocoding,
            SourceId::Weather,
            SourceId::Forecast,
            SourceId::Co2,
            SourceId::Renewables,
            SourceId::Fires,
            SourceId::News,
        ]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a source is asked for: the place name as typed, plus the location it
/// resolved to, if any.
#[derive(Debug, Clone, Default)]
pub struct SourceQuery {
    pub place: String,
    pub location: Option<Location>,
}

impl SourceQuery {
    pub fn new(place: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            location: None,
        }
    }

    pub fn with_location(&self, location: Option<Location>) -> Self {
        Self {
            place: self.place.clone(),
            location,
        }
    }

    pub(crate) fn require_location(&self) -> Result<&Location, SourceError> {
        self.location.as_ref().ok_or(SourceError::Unresolved)
    }
}

/// One upstream data source.
///
/// Implementors only write [`DataSource::try_fetch`]. Callers only use
/// [`DataSource::fetch`], which never fails: every error degrades to
/// `Output::default()`.
#[async_trait]
pub trait DataSource: Send + Sync + Debug {
    type Output: Default + Send;

    fn id(&self) -> SourceId;

    async fn try_fetch(&self, query: &SourceQuery) -> Result<Self::Output, SourceError>;

    async fn fetch(&self, query: &SourceQuery) -> Self::Output {
        match self.try_fetch(query).await {
            Ok(output) => output,
            Err(err) => {
                warn!(
                    source = %self.id(),
                    kind = ?err.kind(),
                    error = %err,
                    "source unavailable, using empty result"
                );
                Self::Output::default()
            }
        }
    }
}

/// GET `url` and return the body, treating non-2xx answers as errors.
pub(crate) async fn get_text(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, SourceError> {
    debug!(url, ?query, "requesting");

    let res = http.get(url).query(query).send().await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(SourceError::Status {
            status,
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// First `n` characters of `s`.
pub(crate) fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
