use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::SourceError, model::RenewablePoint};

use super::{DataSource, SourceId, SourceQuery, get_text};

/// Row group of the OWID dataset that holds the global aggregate.
pub const WORLD: &str = "World";

/// Renewable share of electricity, world aggregate, from the OWID energy dataset.
#[derive(Debug, Clone)]
pub struct RenewablesSource {
    http: Client,
    url: String,
}

impl RenewablesSource {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

// Only the columns we need; csv ignores the other ~120.
#[derive(Debug, Deserialize)]
struct OwidRow {
    country: String,
    year: i32,
    renewables_share_elec: Option<f64>,
}

pub fn parse_world_share(csv_text: &str) -> Result<Vec<RenewablePoint>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    for column in ["country", "year", "renewables_share_elec"] {
        if !headers.iter().any(|h| h == column) {
            return Err(SourceError::Malformed(format!(
                "renewables CSV lacks column '{column}'"
            )));
        }
    }

    let mut points = Vec::new();
    for row in reader.deserialize::<OwidRow>() {
        let Ok(row) = row else { continue };
        if row.country != WORLD {
            continue;
        }
        if let Some(percentage) = row.renewables_share_elec {
            points.push(RenewablePoint {
                year: row.year,
                percentage,
            });
        }
    }

    if points.is_empty() {
        return Err(SourceError::Empty);
    }

    Ok(points)
}

#[async_trait]
impl DataSource for RenewablesSource {
    type Output = Vec<RenewablePoint>;

    fn id(&self) -> SourceId {
        SourceId::Renewables
    }

    async fn try_fetch(&self, _query: &SourceQuery) -> Result<Self::Output, SourceError> {
        let body = get_text(&self.http, &self.url, &[]).await?;
        parse_world_share(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
country,year,iso_code,population,renewables_share_elec,solar_share_elec
Afghanistan,2019,AFG,37769499,85.0,1.2
World,1999,,6000000000,,
World,2000,,6148898975,18.6,0.0
World,2001,,6230747253,17.9,0.01
Worldwide,2001,,1,99.0,
World,2002,,6312407360,not-a-number,
World,2003,,6393898365,17.4,0.02
";

    #[test]
    fn keeps_world_rows_with_share() {
        let points = parse_world_share(CSV).expect("points");

        assert_eq!(
            points,
            vec![
                RenewablePoint { year: 2000, percentage: 18.6 },
                RenewablePoint { year: 2001, percentage: 17.9 },
                RenewablePoint { year: 2003, percentage: 17.4 },
            ]
        );
    }

    #[test]
    fn missing_share_column_is_malformed() {
        let err = parse_world_share("country,year\nWorld,2000\n").unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn no_world_rows_is_empty() {
        let err =
            parse_world_share("country,year,renewables_share_elec\nPeru,2000,50.1\n").unwrap_err();
        assert!(matches!(err, SourceError::Empty));
    }
}
