//! Fan-out of one dashboard refresh over every source.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::{
    config::Config,
    model::ResultBundle,
    source::{
        DataSource, SourceId, SourceQuery, air_quality::AirQualitySource, co2::Co2Source,
        fires::FireSource, geocoding::LocationResolver, news::NewsSource,
        renewables::RenewablesSource,
        weather::{CurrentWeatherSource, ForecastSource},
    },
};

/// Runs every source for a place and assembles a [`ResultBundle`].
///
/// Sources are independent: a failure in one never affects another, and
/// [`Aggregator::refresh`] itself cannot fail.
#[derive(Debug, Clone)]
pub struct Aggregator {
    resolver: LocationResolver,
    air_quality: AirQualitySource,
    weather: CurrentWeatherSource,
    forecast: ForecastSource,
    co2: Co2Source,
    renewables: RenewablesSource,
    fires: FireSource,
    news: NewsSource,
    deadline: Option<Duration>,
}

impl Aggregator {
    /// Build every source from config, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.http.timeout())
            .user_agent(config.http.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        let url = |id: SourceId| config.endpoints.url(id).to_owned();

        Self {
            resolver: LocationResolver::new(http.clone(), url(SourceId::Geocoding)),
            air_quality: AirQualitySource::new(http.clone(), url(SourceId::AirQuality)),
            weather: CurrentWeatherSource::new(http.clone(), url(SourceId::Weather)),
            forecast: ForecastSource::new(http.clone(), url(SourceId::Forecast)),
            co2: Co2Source::new(http.clone(), url(SourceId::Co2)),
            renewables: RenewablesSource::new(http.clone(), url(SourceId::Renewables)),
            fires: FireSource::new(http.clone(), url(SourceId::Fires)),
            news: NewsSource::new(
                http,
                url(SourceId::News),
                config.news_source_label.as_str(),
            ),
            deadline: config.refresh_deadline(),
        }
    }

    /// Fetch everything for `place`.
    ///
    /// The place is geocoded once; weather and forecast wait for it, the
    /// remaining sources start immediately. With a refresh deadline set, every
    /// source is bounded by the same instant: whatever finished before it is
    /// kept, anything still pending is dropped and left empty.
    pub async fn refresh(&self, place: &str) -> ResultBundle {
        let place = place.trim();
        let deadline = self.deadline.map(|d| Instant::now() + d);
        let query = SourceQuery::new(place);

        info!(place, "refreshing dashboard");

        let located = async {
            let location = bounded(deadline, "geocoding", self.resolver.resolve(place)).await;
            let query = query.with_location(location.clone());
            let (weather, forecast) = tokio::join!(
                bounded(deadline, "weather", self.weather.fetch(&query)),
                bounded(deadline, "forecast", self.forecast.fetch(&query)),
            );
            (location, weather, forecast)
        };

        let ((location, weather, forecast), air_quality, co2, renewables, fires, news) = tokio::join!(
            located,
            bounded(deadline, "air_quality", self.air_quality.fetch(&query)),
            bounded(deadline, "co2", self.co2.fetch(&query)),
            bounded(deadline, "renewables", self.renewables.fetch(&query)),
            bounded(deadline, "fires", self.fires.fetch(&query)),
            bounded(deadline, "news", self.news.fetch(&query)),
        );

        let bundle = ResultBundle {
            query: place.to_string(),
            location,
            air_quality,
            weather,
            forecast,
            co2,
            renewables,
            fires,
            news,
        };

        info!(
            resolved = bundle.location.is_some(),
            air_quality = bundle.air_quality.len(),
            weather = bundle.weather.is_some(),
            forecast = bundle.forecast.len(),
            co2 = bundle.co2.len(),
            renewables = bundle.renewables.len(),
            fires = bundle.fires.len(),
            news = bundle.news.len(),
            "dashboard refreshed"
        );

        bundle
    }
}

/// Await `fut`, or give up with `T::default()` once `deadline` passes.
async fn bounded<T, F>(deadline: Option<Instant>, branch: &str, fut: F) -> T
where
    T: Default,
    F: Future<Output = T>,
{
    let Some(deadline) = deadline else {
        return fut.await;
    };

    match tokio::time::timeout_at(deadline, fut).await {
        Ok(value) => value,
        Err(_) => {
            warn!(branch, "refresh deadline reached, using empty result");
            T::default()
        }
    }
}
