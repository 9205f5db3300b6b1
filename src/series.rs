use std::fmt::Display;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// The three economic indicators tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EconSeries {
    Cpi,
    Gdp,
    Unemployment,
}

impl EconSeries {
    /// Dashboard composition order: CPI, GDP, unemployment.
    pub const ALL: [EconSeries; 3] = [EconSeries::Cpi, EconSeries::Gdp, EconSeries::Unemployment];

    /// FRED series id, e.g. https://fred.stlouisfed.org/series/CPIAUCSL
    pub fn series_id(&self) -> &'static str {
        match self {
            EconSeries::Cpi => "CPIAUCSL",
            EconSeries::Gdp => "GDP",
            EconSeries::Unemployment => "UNRATE",
        }
    }

    /// Destination table in DuckDB.
    pub fn table_name(&self) -> &'static str {
        match self {
            EconSeries::Cpi => "cpi_table",
            EconSeries::Gdp => "gdp_table",
            EconSeries::Unemployment => "unemployment_table",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EconSeries::Cpi => "Consumer Price Index (CPI)",
            EconSeries::Gdp => "Gross Domestic Product (GDP)",
            EconSeries::Unemployment => "Unemployment Rate",
        }
    }

    /// Short label used in metric widgets, e.g. "CPI December 2023".
    pub fn label(&self) -> &'static str {
        match self {
            EconSeries::Cpi => "CPI",
            EconSeries::Gdp => "GDP",
            EconSeries::Unemployment => "Unemployment Rate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EconSeries::Cpi => {
                "The Consumer Price Index (CPI) is a key economic indicator that measures \
                 the average change over time in the prices paid by urban consumers for a \
                 basket of goods and services. It is commonly used to track inflation and \
                 the cost of living. The CPI includes categories such as food, housing, \
                 transportation, and medical care, and is used by governments and central \
                 banks to make policy decisions, such as adjusting interest rates or \
                 social security payments. For detailed and up-to-date CPI data, you can \
                 visit the FRED CPI page provided by the Federal Reserve Economic Data \
                 (FRED) database."
            }
            EconSeries::Gdp => {
                "Gross Domestic Product (GDP) measures the total value of all goods and \
                 services produced within a country over a specific period. It is a key \
                 indicator of economic health and is used by governments and central \
                 banks to guide policy decisions. GDP can be calculated using production, \
                 income, or expenditure approaches. For detailed and up-to-date data, \
                 visit the Bureau of Economic Analysis (BEA) or the Federal Reserve \
                 Economic Data (FRED) database."
            }
            EconSeries::Unemployment => {
                "The unemployment rate is a key economic indicator that measures the \
                 percentage of the labor force that is unemployed and actively seeking \
                 work. It is widely used to gauge the health of the labor market and the \
                 overall economy. A rising unemployment rate typically signals economic \
                 distress, while a low rate suggests a robust economy. Governments and \
                 policymakers monitor the unemployment rate closely to shape fiscal and \
                 monetary policies. For more detailed and up-to-date data, visit the \
                 Federal Reserve Economic Data (FRED) website."
            }
        }
    }

    /// An increase reads as unfavorable for CPI and unemployment, favorable
    /// for GDP.
    pub fn delta_inverted(&self) -> bool {
        matches!(self, EconSeries::Cpi | EconSeries::Unemployment)
    }
}

impl Display for EconSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EconSeries::Cpi => "cpi",
            EconSeries::Gdp => "gdp",
            EconSeries::Unemployment => "unemployment",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for EconSeries {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpi" => Ok(EconSeries::Cpi),
            "gdp" => Ok(EconSeries::Gdp),
            "unemployment" => Ok(EconSeries::Unemployment),
            _ => Err(format!("unknown series '{}'", s)),
        }
    }
}

/// One (date, value) data point as published by FRED. The value stays a
/// string; FRED uses "." for missing observations and the numeric conversion
/// happens in the metrics layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesObservation {
    pub date: Date,
    pub value: String,
}

/// The observations of one indicator, most recent first. The dense zero-based
/// row index is the position in the underlying vector.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub series: EconSeries,
    rows: Vec<SeriesObservation>,
}

impl SeriesTable {
    /// Sort the observations descending by date.
    pub fn from_observations(series: EconSeries, mut rows: Vec<SeriesObservation>) -> SeriesTable {
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        SeriesTable { series, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesObservation> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[SeriesObservation] {
        &self.rows
    }

    /// The observation with the maximum date.
    pub fn latest(&self) -> Option<&SeriesObservation> {
        self.rows.first()
    }

    /// Exact-date lookup, no fallback to a nearest date.
    pub fn value_on(&self, date: Date) -> Option<&SeriesObservation> {
        self.rows.iter().find(|r| r.date == date)
    }

    /// (earliest, latest) dates available.
    pub fn date_range(&self) -> Option<(Date, Date)> {
        match (self.rows.last(), self.rows.first()) {
            (Some(a), Some(b)) => Some((a.date, b.date)),
            _ => None,
        }
    }
}
