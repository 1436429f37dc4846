use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::SourceError, model::FireHotspot};

use super::{DataSource, SourceId, SourceQuery, get_text};

/// Rows read from the feed; everything after is ignored to bound map size.
pub const MAX_HOTSPOTS: usize = 2000;

/// Active fire detections from NASA FIRMS (VIIRS, last 24h).
#[derive(Debug, Clone)]
pub struct FireSource {
    http: Client,
    url: String,
}

impl FireSource {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FirmsRow {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    confidence: Option<String>,
}

/// Take the first [`MAX_HOTSPOTS`] rows in feed order.
///
/// The cut is positional: no attempt is made to prefer high-confidence or
/// recent detections.
pub fn parse_hotspots(csv_text: &str) -> Result<Vec<FireHotspot>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    for column in ["latitude", "longitude"] {
        if !headers.iter().any(|h| h == column) {
            return Err(SourceError::Malformed(format!(
                "fire CSV lacks column '{column}'"
            )));
        }
    }

    let hotspots: Vec<FireHotspot> = reader
        .deserialize::<FirmsRow>()
        .take(MAX_HOTSPOTS)
        .filter_map(Result::ok)
        .map(|row| FireHotspot {
            latitude: row.latitude,
            longitude: row.longitude,
            confidence: row.confidence.unwrap_or_default(),
        })
        .collect();

    if hotspots.is_empty() {
        return Err(SourceError::Empty);
    }

    Ok(hotspots)
}

#[async_trait]
impl DataSource for FireSource {
    type Output = Vec<FireHotspot>;

    fn id(&self) -> SourceId {
        SourceId::Fires
    }

    async fn try_fetch(&self, _query: &SourceQuery) -> Result<Self::Output, SourceError> {
        let body = get_text(&self.http, &self.url, &[]).await?;
        parse_hotspots(&body)
    }
}
