use std::error::Error;

use log::info;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::series::{EconSeries, SeriesObservation};

pub const FRED_OBSERVATIONS_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Client for the FRED observations endpoint.
/// https://fred.stlouisfed.org/docs/api/fred/series_observations.html
pub struct FredClient {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<SeriesObservation>,
}

impl FredClient {
    pub fn new(api_key: String) -> FredClient {
        FredClient {
            api_key,
            base_url: FRED_OBSERVATIONS_URL.to_string(),
        }
    }

    /// One GET per series, whatever the API returns in a single response.
    /// Any non-success status aborts the run.
    pub fn observations(
        &self,
        series: EconSeries,
    ) -> Result<Vec<SeriesObservation>, Box<dyn Error>> {
        info!("fetching FRED observations for {} ...", series.series_id());
        let client = Client::new();
        let response = client
            .get(&self.base_url)
            .query(&[
                ("series_id", series.series_id()),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
            ])
            .send()?
            .error_for_status()?;
        let body: ObservationsResponse = response.json()?;
        Ok(body.observations)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, error::Error, path::Path};

    use jiff::civil::date;

    use super::*;

    #[test]
    fn parse_observations() {
        let json = r#"{
            "realtime_start": "2025-01-03",
            "realtime_end": "2025-01-03",
            "units": "lin",
            "count": 2,
            "observations": [
                {"realtime_start": "2025-01-03", "realtime_end": "2025-01-03", "date": "2023-12-01", "value": "306.746"},
                {"realtime_start": "2025-01-03", "realtime_end": "2025-01-03", "date": "2024-11-01", "value": "."}
            ]
        }"#;
        let response: ObservationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.observations.len(), 2);
        assert_eq!(response.observations[0].date, date(2023, 12, 1));
        assert_eq!(response.observations[0].value, "306.746");
        assert_eq!(response.observations[1].value, ".");
    }

    #[ignore]
    #[test]
    fn download_observations() -> Result<(), Box<dyn Error>> {
        dotenvy::from_path(Path::new(".env/test.env")).unwrap();
        let client = FredClient::new(env::var("FRED_API_KEY").unwrap());
        let rows = client.observations(EconSeries::Cpi)?;
        assert!(!rows.is_empty());
        Ok(())
    }
}
