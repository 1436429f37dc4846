//! Plain-text rendering of a refresh for the terminal.

use climate_core::{FootprintInput, ResultBundle, compose::AqiLevel};

pub fn print_summary(bundle: &ResultBundle) {
    match &bundle.location {
        Some(loc) => println!(
            "Climate dashboard for {} ({:.4}, {:.4})",
            loc.name, loc.latitude, loc.longitude
        ),
        None => println!(
            "Climate dashboard for {} (location not resolved)",
            bundle.query
        ),
    }
    println!();

    println!("Weather");
    match &bundle.weather {
        Some(w) => {
            println!(
                "  {}°C (feels like {}°C), {}",
                w.temperature_c, w.feels_like_c, w.condition_label
            );
            println!(
                "  Humidity {}% • Wind {} m/s",
                w.humidity_pct, w.wind_speed_ms
            );
        }
        None => println!("  No weather data"),
    }

    println!("Forecast");
    if bundle.forecast.is_empty() {
        println!("  No forecast data");
    }
    for day in &bundle.forecast {
        println!(
            "  {:<11} {:>5.1} / {:>5.1} °C",
            day.date_label, day.max_temp_c, day.min_temp_c
        );
    }

    println!("Air quality (PM2.5)");
    if bundle.air_quality.is_empty() {
        println!("  No AQI data available");
    }
    for reading in &bundle.air_quality {
        println!(
            "  {:<30} {:>6.1} µg/m³  {}",
            reading.station_name,
            reading.pm25_value,
            AqiLevel::classify(reading.pm25_value).label()
        );
    }

    println!("Global CO₂");
    match (bundle.co2.first(), bundle.co2.last()) {
        (Some(first), Some(last)) => println!(
            "  {} ppm on {} ({:+.2} ppm since {})",
            last.ppm_value,
            last.date,
            last.ppm_value - first.ppm_value,
            first.date
        ),
        _ => println!("  No CO₂ data"),
    }

    println!("Renewable electricity share (world)");
    match bundle.renewables.last() {
        Some(point) => println!("  {:.1}% in {}", point.percentage, point.year),
        None => println!("  No renewables data"),
    }

    println!("Active fires (24h)");
    if bundle.fires.is_empty() {
        println!("  No fire data");
    } else {
        println!("  {} hotspots", bundle.fires.len());
    }

    println!("Latest climate news");
    if bundle.news.is_empty() {
        println!("  No news available");
    }
    for item in &bundle.news {
        println!(
            "  {} ({} • {})",
            item.title, item.source_label, item.published_at
        );
    }
}

pub fn print_footprint(input: &FootprintInput) {
    println!("Your carbon footprint");
    println!("  Yearly estimate: {:.1} tons CO₂", input.estimate_tons());
    println!("  India avg: 2.0t • World avg: 4.7t");
}
