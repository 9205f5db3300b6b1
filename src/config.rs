use std::env;
use std::error::Error;

use jiff::civil::Date;

use crate::series::EconSeries;

// Comparison baselines used when no override is configured.
const CPI_REFERENCE_DATE: &str = "2023-12-01";
const GDP_REFERENCE_DATE: &str = "2024-07-01";
const UNEMPLOYMENT_REFERENCE_DATE: &str = "2023-12-01";

/// Process configuration. The binaries load `.env/{env}.env` with dotenvy
/// before calling [AppConfig::from_env].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub fred_api_key: String,
    pub news_api_key: String,
    pub duckdb_path: String,
    pub cpi_reference_date: Date,
    pub gdp_reference_date: Date,
    pub unemployment_reference_date: Date,
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, Box<dyn Error>> {
        Ok(AppConfig {
            fred_api_key: require("FRED_API_KEY")?,
            news_api_key: require("NEWS_API_KEY")?,
            duckdb_path: require("DUCKDB_PATH")?,
            cpi_reference_date: date_var("CPI_REFERENCE_DATE", CPI_REFERENCE_DATE)?,
            gdp_reference_date: date_var("GDP_REFERENCE_DATE", GDP_REFERENCE_DATE)?,
            unemployment_reference_date: date_var(
                "UNEMPLOYMENT_REFERENCE_DATE",
                UNEMPLOYMENT_REFERENCE_DATE,
            )?,
        })
    }

    pub fn reference_date(&self, series: EconSeries) -> Date {
        match series {
            EconSeries::Cpi => self.cpi_reference_date,
            EconSeries::Gdp => self.gdp_reference_date,
            EconSeries::Unemployment => self.unemployment_reference_date,
        }
    }
}

fn require(key: &str) -> Result<String, Box<dyn Error>> {
    env::var(key).map_err(|_| format!("environment variable {} is not set", key).into())
}

fn date_var(key: &str, default: &str) -> Result<Date, Box<dyn Error>> {
    let value = match env::var(key) {
        Ok(s) => s,
        Err(_) => default.to_string(),
    };
    value
        .parse::<Date>()
        .map_err(|e| format!("{} is not a valid date for {}: {}", value, key, e).into())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn from_env_with_defaults_and_overrides() {
        env::set_var("FRED_API_KEY", "fred-key");
        env::set_var("NEWS_API_KEY", "news-key");
        env::set_var("DUCKDB_PATH", "/tmp/fredash.duckdb");
        env::set_var("GDP_REFERENCE_DATE", "2024-10-01");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.fred_api_key, "fred-key");
        assert_eq!(config.reference_date(EconSeries::Cpi), date(2023, 12, 1));
        assert_eq!(config.reference_date(EconSeries::Gdp), date(2024, 10, 1));
        assert_eq!(
            config.reference_date(EconSeries::Unemployment),
            date(2023, 12, 1)
        );

        env::set_var("GDP_REFERENCE_DATE", "not-a-date");
        assert!(AppConfig::from_env().is_err());
        env::remove_var("GDP_REFERENCE_DATE");
    }
}
