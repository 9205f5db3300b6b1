use std::str::FromStr;

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::series::{EconSeries, SeriesObservation, SeriesTable};

/// Any of these aborts the run that asked for the snapshot. There is no
/// fallback to a nearest date and no default value.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("series {0} has no observations")]
    EmptySeries(EconSeries),
    #[error("reference date {date} not found in {series} (available {earliest} to {latest})")]
    ReferenceDateMissing {
        series: EconSeries,
        date: Date,
        earliest: Date,
        latest: Date,
    },
    #[error("value '{value}' on {date} is not numeric")]
    NotNumeric { date: Date, value: String },
    #[error("reference value on {date} is zero, percent change is undefined")]
    ZeroReference { date: Date },
}

/// Reference vs. latest observation of one series. Derived fresh on every
/// run, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub series: EconSeries,
    pub reference_date: Date,
    #[serde(with = "rust_decimal::serde::float")]
    pub reference_value: Decimal,
    pub current_date: Date,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percent_delta: Decimal,
}

impl MetricSnapshot {
    /// percent_delta = round(((current - reference) / reference) * 100, 2),
    /// where current is the observation with the maximum date and reference
    /// the observation exactly on `reference_date`.
    pub fn compute(table: &SeriesTable, reference_date: Date) -> Result<MetricSnapshot, MetricsError> {
        let series = table.series;
        let (earliest, latest) = table
            .date_range()
            .ok_or(MetricsError::EmptySeries(series))?;
        let reference =
            table
                .value_on(reference_date)
                .ok_or(MetricsError::ReferenceDateMissing {
                    series,
                    date: reference_date,
                    earliest,
                    latest,
                })?;
        let current = table.latest().ok_or(MetricsError::EmptySeries(series))?;

        let reference_value = parse_value(reference)?;
        let current_value = parse_value(current)?;
        if reference_value.is_zero() {
            return Err(MetricsError::ZeroReference {
                date: reference_date,
            });
        }
        let percent_delta =
            ((current_value - reference_value) / reference_value * Decimal::ONE_HUNDRED).round_dp(2);

        Ok(MetricSnapshot {
            series,
            reference_date,
            reference_value,
            current_date: current.date,
            current_value,
            percent_delta,
        })
    }
}

fn parse_value(row: &SeriesObservation) -> Result<Decimal, MetricsError> {
    Decimal::from_str(row.value.trim()).map_err(|_| MetricsError::NotNumeric {
        date: row.date,
        value: row.value.clone(),
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal_macros::dec;

    use super::*;

    fn table(rows: Vec<(Date, &str)>) -> SeriesTable {
        SeriesTable::from_observations(
            EconSeries::Cpi,
            rows.into_iter()
                .map(|(d, v)| SeriesObservation {
                    date: d,
                    value: v.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn percent_delta_exact() {
        let t = table(vec![
            (date(2023, 12, 1), "306.7"),
            (date(2024, 11, 1), "315.5"),
        ]);
        let snapshot = MetricSnapshot::compute(&t, date(2023, 12, 1)).unwrap();
        assert_eq!(snapshot.reference_value, dec!(306.7));
        assert_eq!(snapshot.current_value, dec!(315.5));
        assert_eq!(snapshot.current_date, date(2024, 11, 1));
        assert_eq!(snapshot.percent_delta, dec!(2.87));
    }

    #[test]
    fn falling_series_has_negative_delta() {
        let t = table(vec![(date(2023, 12, 1), "4.0"), (date(2024, 11, 1), "3.7")]);
        let snapshot = MetricSnapshot::compute(&t, date(2023, 12, 1)).unwrap();
        assert_eq!(snapshot.percent_delta, dec!(-7.5));
    }

    #[test]
    fn missing_reference_date_is_an_error() {
        let t = table(vec![
            (date(2023, 12, 1), "306.7"),
            (date(2024, 11, 1), "315.5"),
        ]);
        let err = MetricSnapshot::compute(&t, date(2022, 12, 1)).unwrap_err();
        assert_eq!(
            err,
            MetricsError::ReferenceDateMissing {
                series: EconSeries::Cpi,
                date: date(2022, 12, 1),
                earliest: date(2023, 12, 1),
                latest: date(2024, 11, 1),
            }
        );
    }

    #[test]
    fn empty_series_is_an_error() {
        let t = table(vec![]);
        assert_eq!(
            MetricSnapshot::compute(&t, date(2023, 12, 1)).unwrap_err(),
            MetricsError::EmptySeries(EconSeries::Cpi)
        );
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        // FRED publishes "." for missing observations
        let t = table(vec![(date(2023, 12, 1), "306.7"), (date(2024, 11, 1), ".")]);
        let err = MetricSnapshot::compute(&t, date(2023, 12, 1)).unwrap_err();
        assert_eq!(
            err,
            MetricsError::NotNumeric {
                date: date(2024, 11, 1),
                value: ".".to_string(),
            }
        );
    }

    #[test]
    fn zero_reference_is_an_error() {
        let t = table(vec![(date(2023, 12, 1), "0"), (date(2024, 11, 1), "1.5")]);
        assert_eq!(
            MetricSnapshot::compute(&t, date(2023, 12, 1)).unwrap_err(),
            MetricsError::ZeroReference {
                date: date(2023, 12, 1)
            }
        );
    }
}
