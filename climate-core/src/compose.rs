//! Turns a [`ResultBundle`] into renderable documents.
//!
//! Everything here is a pure function of its inputs. The map and chart
//! types describe *what* to draw; actually drawing them is up to the UI.

use serde::{Deserialize, Serialize};

use crate::{
    footprint::FootprintInput,
    model::{
        AirQualityReading, Co2Point, Coordinates, FireHotspot, ForecastDay, NewsItem,
        RenewablePoint, ResultBundle, WeatherSnapshot,
    },
};

pub const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const CHART_TEMPLATE: &str = "plotly_white";

const AQI_EMPTY_ZOOM: u8 = 10;
const AQI_ZOOM: u8 = 11;
const FIRE_ZOOM: u8 = 2;
const FIRE_COLOR: &str = "#ff4500";

/// PM2.5 band used to color AQI markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Moderate,
    Unhealthy,
}

impl AqiLevel {
    /// `≤ 50` Good, `≤ 100` Moderate, anything higher Unhealthy.
    pub fn classify(pm25: f64) -> Self {
        if pm25 <= 50.0 {
            AqiLevel::Good
        } else if pm25 <= 100.0 {
            AqiLevel::Moderate
        } else {
            AqiLevel::Unhealthy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Unhealthy => "Unhealthy",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AqiLevel::Good => "green",
            AqiLevel::Moderate => "orange",
            AqiLevel::Unhealthy => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Pin,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    /// HTML shown when the marker is clicked.
    pub popup: String,
}

/// A slippy map with markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub center: Coordinates,
    pub zoom: u8,
    pub tiles: String,
    pub attribution: String,
    /// Whether markers should be grouped into clusters.
    pub clustered: bool,
    pub markers: Vec<MapMarker>,
}

impl MapDocument {
    fn new(center: Coordinates, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            tiles: TILE_URL.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
            clustered: false,
            markers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<u32>,
    /// Fill down to the previous trace with this color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_to_previous: Option<String>,
}

/// A chart in plotly terms: a titled figure holding traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub height: u32,
    pub template: String,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    fn new(title: &str, height: u32, traces: Vec<Trace>) -> Self {
        Self {
            title: title.to_string(),
            height,
            template: CHART_TEMPLATE.to_string(),
            traces,
        }
    }

    /// True when no trace has any point, i.e. the UI shows an empty chart.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|t| t.y.is_empty())
    }
}

/// Every panel of the dashboard, ready for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub aqi_map: MapDocument,
    pub weather_card: String,
    pub forecast_chart: ChartSpec,
    pub co2_chart: ChartSpec,
    pub renewables_chart: ChartSpec,
    pub fire_map: MapDocument,
    pub carbon_card: String,
    pub news_html: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Composer {
    fallback_center: Coordinates,
}

impl Composer {
    pub fn new(fallback_center: Coordinates) -> Self {
        Self { fallback_center }
    }

    pub fn compose(&self, bundle: &ResultBundle, footprint: &FootprintInput) -> Dashboard {
        Dashboard {
            aqi_map: aqi_map(&bundle.air_quality, bundle.map_center(self.fallback_center)),
            weather_card: weather_card(bundle.weather.as_ref(), &bundle.query),
            forecast_chart: forecast_chart(&bundle.forecast),
            co2_chart: co2_chart(&bundle.co2),
            renewables_chart: renewables_chart(&bundle.renewables),
            fire_map: fire_map(&bundle.fires, self.fallback_center),
            carbon_card: carbon_card(footprint),
            news_html: news_html(&bundle.news),
        }
    }
}

pub fn aqi_map(readings: &[AirQualityReading], center: Coordinates) -> MapDocument {
    if readings.is_empty() {
        let mut map = MapDocument::new(center, AQI_EMPTY_ZOOM);
        map.markers.push(MapMarker {
            kind: MarkerKind::Pin,
            position: center,
            radius: None,
            color: None,
            fill_opacity: None,
            popup: "No AQI data available".to_string(),
        });
        return map;
    }

    let mut map = MapDocument::new(center, AQI_ZOOM);
    map.clustered = true;
    map.markers = readings
        .iter()
        .map(|reading| {
            let level = AqiLevel::classify(reading.pm25_value);
            MapMarker {
                kind: MarkerKind::Circle,
                position: Coordinates::new(reading.latitude, reading.longitude),
                radius: Some(9),
                color: Some(level.color().to_string()),
                fill_opacity: Some(0.8),
                popup: aqi_popup(reading, level),
            }
        })
        .collect();
    map
}

fn aqi_popup(reading: &AirQualityReading, level: AqiLevel) -> String {
    let updated: String = reading.last_updated.chars().take(10).collect();
    format!(
        "<div style=\"width:200px\"><h4>{}</h4>PM2.5: {} µg/m³<br>Updated: {}<br>\
         <span style=\"color:{}\">{}</span></div>",
        escape_html(&reading.station_name),
        reading.pm25_value,
        escape_html(&updated),
        level.color(),
        level.label(),
    )
}

pub fn fire_map(hotspots: &[FireHotspot], center: Coordinates) -> MapDocument {
    let mut map = MapDocument::new(center, FIRE_ZOOM);
    map.markers = hotspots
        .iter()
        .map(|spot| MapMarker {
            kind: MarkerKind::Circle,
            position: Coordinates::new(spot.latitude, spot.longitude),
            radius: Some(3),
            color: Some(FIRE_COLOR.to_string()),
            fill_opacity: None,
            popup: confidence_popup(&spot.confidence),
        })
        .collect();
    map
}

fn confidence_popup(confidence: &str) -> String {
    let trimmed = confidence.trim();
    let percent = trimmed
        .parse::<f64>()
        .is_ok_and(|v| v.is_finite() && (0.0..=100.0).contains(&v));

    if percent {
        format!("Confidence: {trimmed}%")
    } else {
        format!("Confidence: {}", escape_html(confidence))
    }
}

pub fn forecast_chart(days: &[ForecastDay]) -> ChartSpec {
    let labels: Vec<String> = days.iter().map(|d| d.date_label.clone()).collect();

    ChartSpec::new(
        "7-Day Forecast",
        300,
        vec![
            Trace {
                kind: TraceKind::Line,
                name: Some("Max".to_string()),
                x: labels.clone(),
                y: days.iter().map(|d| d.max_temp_c).collect(),
                color: "#ff4444".to_string(),
                line_width: None,
                fill_to_previous: None,
            },
            Trace {
                kind: TraceKind::Line,
                name: Some("Min".to_string()),
                x: labels,
                y: days.iter().map(|d| d.min_temp_c).collect(),
                color: "#4444ff".to_string(),
                line_width: None,
                fill_to_previous: Some("rgba(68,68,255,0.2)".to_string()),
            },
        ],
    )
}

pub fn co2_chart(points: &[Co2Point]) -> ChartSpec {
    ChartSpec::new(
        "Global CO₂ (ppm)",
        400,
        vec![Trace {
            kind: TraceKind::Line,
            name: None,
            x: points
                .iter()
                .map(|p| p.date.format("%Y-%m-%d").to_string())
                .collect(),
            y: points.iter().map(|p| p.ppm_value).collect(),
            color: "#e74c3c".to_string(),
            line_width: Some(4),
            fill_to_previous: None,
        }],
    )
}

pub fn renewables_chart(points: &[RenewablePoint]) -> ChartSpec {
    ChartSpec::new(
        "Renewable Energy Share (%)",
        400,
        vec![Trace {
            kind: TraceKind::Bar,
            name: None,
            x: points.iter().map(|p| p.year.to_string()).collect(),
            y: points.iter().map(|p| p.percentage).collect(),
            color: "#00ff88".to_string(),
            line_width: None,
            fill_to_previous: None,
        }],
    )
}

pub fn weather_card(weather: Option<&WeatherSnapshot>, city: &str) -> String {
    let Some(w) = weather else {
        return "<h3>No weather data</h3>".to_string();
    };

    format!(
        "<div style=\"background:#3498db; color:white; padding:20px; border-radius:10px; text-align:center;\">\
         <h2>Current Weather in {}</h2>\
         <h1>{}°C</h1>\
         <p>Feels like: {}°C</p>\
         <p>{} • Humidity: {}%</p>\
         <p>Wind: {} m/s</p>\
         </div>",
        escape_html(city),
        w.temperature_c,
        w.feels_like_c,
        escape_html(&w.condition_label),
        w.humidity_pct,
        w.wind_speed_ms,
    )
}

pub fn news_html(items: &[NewsItem]) -> String {
    let mut html = String::from("<h2>Latest Climate News</h2>");
    if items.is_empty() {
        html.push_str("<p>No news available</p>");
    }
    for item in items {
        html.push_str(&format!(
            "<b>{}</b><br><small>{} • {}</small><br><br>",
            escape_html(&item.title),
            escape_html(&item.source_label),
            escape_html(&item.published_at),
        ));
    }
    html
}

pub fn carbon_card(input: &FootprintInput) -> String {
    format!(
        "<div style=\"background:#2ecc71; color:white; padding:20px; border-radius:10px;\">\
         <h2>Your Carbon Footprint</h2>\
         <p>Yearly estimate: {:.1} tons CO₂</p>\
         <p>India avg: 2.0t • World avg: 4.7t</p>\
         <p>Diet: {} • Flights: {} • Car: {} km</p>\
         </div>",
        input.estimate_tons(),
        input.diet,
        input.flights,
        input.car_km,
    )
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
