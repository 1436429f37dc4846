use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::SourceError, model::Location};

use super::{DataSource, SourceId, SourceQuery, get_text};

/// Turns a free-text place name into coordinates via Open-Meteo geocoding.
///
/// Only the first candidate is used. Any failure resolves to `None`.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    http: Client,
    url: String,
}

impl LocationResolver {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn resolve(&self, place: &str) -> Option<Location> {
        self.fetch(&SourceQuery::new(place)).await
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<GeoCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeoCandidate {
    name: String,
    latitude: f64,
    longitude: f64,
}

pub fn parse_location(body: &str) -> Result<Location, SourceError> {
    let parsed: GeoResponse = serde_json::from_str(body)?;

    let first = parsed
        .results
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(SourceError::Empty)?;

    Ok(Location {
        name: first.name,
        latitude: first.latitude,
        longitude: first.longitude,
    })
}

#[async_trait]
impl DataSource for LocationResolver {
    type Output = Option<Location>;

    fn id(&self) -> SourceId {
        SourceId::Geocoding
    }

    async fn try_fetch(&self, query: &SourceQuery) -> Result<Option<Location>, SourceError> {
        let place = query.place.trim();
        if place.is_empty() {
            return Err(SourceError::Empty);
        }

        let body = get_text(&self.http, &self.url, &[("name", place), ("count", "1")]).await?;
        parse_location(&body).map(Some)
    }
}
