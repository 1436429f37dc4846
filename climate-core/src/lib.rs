//! Core library for the `climate` dashboard.
//!
//! This crate defines:
//! - One fail-soft adapter per upstream data source
//! - The aggregator that fans a refresh out over every source
//! - Shared domain models and the composer that turns them into maps,
//!   charts and summary cards
//! - Configuration handling
//!
//! It is used by `climate-cli`, but can also be embedded in other frontends.

pub mod aggregate;
pub mod compose;
pub mod config;
pub mod error;
pub mod footprint;
pub mod model;
pub mod source;

pub use aggregate::Aggregator;
pub use compose::{Composer, Dashboard};
pub use config::{Config, DEFAULT_MAP_CENTER};
pub use error::{ErrorKind, SourceError};
pub use footprint::{Diet, FootprintInput};
pub use model::{
    AirQualityReading, Co2Point, Coordinates, FireHotspot, ForecastDay, Location, NewsItem,
    RenewablePoint, ResultBundle, WeatherSnapshot,
};
pub use source::{DataSource, SourceId, SourceQuery};
