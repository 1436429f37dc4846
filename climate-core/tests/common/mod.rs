//! In-process HTTP stub standing in for the upstream APIs.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use climate_core::{Config, config::Endpoints};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Route {
    pub fn json(body: &str) -> Self {
        Self::ok("application/json", body)
    }

    pub fn csv(body: &str) -> Self {
        Self::ok("text/csv", body)
    }

    pub fn xml(body: &str) -> Self {
        Self::ok("application/rss+xml", body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            ..Self::ok("text/plain", body)
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn ok(content_type: &'static str, body: &str) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.to_string(),
            delay: None,
        }
    }
}

/// A running stub. Records the request target (path and query) of every hit.
pub struct Stub {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub async fn spawn(routes: Vec<(&str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");

        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, route)| (path.to_string(), route))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(Vec::new()));

        let recorded = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorded = recorded.clone();

                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&request);
                    let target = head
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    let path = target.split('?').next().unwrap_or("/").to_string();
                    recorded.lock().unwrap().push(target);

                    let route = routes
                        .get(&path)
                        .cloned()
                        .unwrap_or_else(|| Route::status(404, "not found"));

                    if let Some(delay) = route.delay {
                        tokio::time::sleep(delay).await;
                    }

                    let response = format!(
                        "HTTP/1.1 {} STUB\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        route.status,
                        route.content_type,
                        route.body.len(),
                        route.body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base: format!("http://{addr}"),
            hits,
        }
    }

    /// Request targets that hit `path`.
    pub fn hits(&self, path: &str) -> Vec<String> {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.split('?').next() == Some(path))
            .cloned()
            .collect()
    }
}

/// Base URL of a local port nothing listens on.
pub fn closed_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Config pointing every source at `base`.
pub fn config_for(base: &str) -> Config {
    let mut config = Config::default();
    config.http.timeout_secs = 5;
    config.endpoints = Endpoints {
        air_quality: format!("{base}/v2/latest"),
        geocoding: format!("{base}/v1/search"),
        weather: format!("{base}/v1/current"),
        forecast: format!("{base}/v1/forecast"),
        co2: format!("{base}/api/co2-api"),
        renewables: format!("{base}/owid-energy-data.csv"),
        fires: format!("{base}/VIIRS_SNPP_SP_24h.csv"),
        news: format!("{base}/Climate.xml"),
    };
    config
}

pub const GEOCODE: &str = r#"{"results":[{"id":1273294,"name":"Delhi","latitude":28.65195,"longitude":77.23149,"country":"India"}],"generationtime_ms":0.7}"#;

pub const AQI: &str = r#"{"meta":{"found":3},"results":[
    {"location":"Anand Vihar","city":"Delhi","coordinates":{"latitude":28.6508,"longitude":77.3152},
     "measurements":[{"parameter":"pm25","value":187.0,"lastUpdated":"2024-01-10T08:00:00+00:00","unit":"µg/m³"}]},
    {"location":"Ghost Station","city":"Delhi","coordinates":null,
     "measurements":[{"parameter":"pm25","value":60.0,"lastUpdated":"2024-01-10T08:00:00+00:00","unit":"µg/m³"}]},
    {"location":"Lodhi Road","city":"Delhi","coordinates":{"latitude":28.5918,"longitude":77.2273},
     "measurements":[{"parameter":"pm25","value":48.0,"lastUpdated":"2024-01-10T07:30:00+00:00","unit":"µg/m³"}]}
]}"#;

pub const CURRENT: &str = r#"{"latitude":28.625,"longitude":77.25,"current":{"time":"2024-01-10T13:30","interval":900,
    "temperature_2m":17.84,"apparent_temperature":16.2,"relative_humidity_2m":62,"wind_speed_10m":3.1,"weather_code":2}}"#;

pub const FORECAST: &str = r#"{"latitude":28.625,"longitude":77.25,"daily":{
    "time":["2024-01-10","2024-01-11","2024-01-12","2024-01-13","2024-01-14","2024-01-15","2024-01-16"],
    "temperature_2m_max":[18.2,19.0,17.5,16.9,18.8,20.1,21.0],
    "temperature_2m_min":[7.1,7.9,6.8,6.2,7.0,8.4,9.0]}}"#;

pub const CO2: &str = r#"{"co2":[
    {"year":"2024","month":"1","day":"8","cycle":"421.50","trend":"420.91"},
    {"year":"2024","month":"1","day":"9","cycle":"421.55","trend":"420.93"},
    {"year":"2024","month":"1","day":"10","cycle":"421.61","trend":"420.95"}
]}"#;

pub const OWID: &str = "country,year,iso_code,renewables_share_elec
India,2022,IND,22.1
World,2020,,28.3
World,2021,,28.1
World,2022,,29.9
World,2023,,
";

pub const FIRMS: &str = "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,confidence,version
-12.51,130.92,330.1,0.41,0.45,2024-01-10,0312,N,n,2.0NRT
38.22,-120.41,345.0,0.39,0.44,2024-01-10,0930,N,h,2.0NRT
";

pub const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>NYT &gt; Climate</title>
<item><title>Glaciers retreat faster</title><pubDate>Wed, 10 Jan 2024 10:00:00 +0000</pubDate></item>
<item><title>Heat records fall</title><pubDate>Tue, 09 Jan 2024 18:12:00 +0000</pubDate></item>
</channel></rss>"#;

/// All upstreams answering with healthy payloads.
pub fn healthy_routes() -> Vec<(&'static str, Route)> {
    vec![
        ("/v1/search", Route::json(GEOCODE)),
        ("/v2/latest", Route::json(AQI)),
        ("/v1/current", Route::json(CURRENT)),
        ("/v1/forecast", Route::json(FORECAST)),
        ("/api/co2-api", Route::json(CO2)),
        ("/owid-energy-data.csv", Route::csv(OWID)),
        ("/VIIRS_SNPP_SP_24h.csv", Route::csv(FIRMS)),
        ("/Climate.xml", Route::xml(RSS)),
    ]
}
