//! The five query shapes served by the API, composed from dataset primitives.
//!
//! Every function is stateless and takes the dataset explicitly.

use chrono::NaiveDate;

use crate::{
    dataset::{ClimateDataset, DatasetError},
    date::{one_year_before, parse_date},
    model::{PrecipitationByDate, TemperatureObservation, TemperatureSummary},
};

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid date format. Use 'YYYY-MM-DD' format for the start date.")]
    InvalidStartDate,

    #[error("Invalid date format. Use 'YYYY-MM-DD' format for the start and end dates.")]
    InvalidDateRange,

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl QueryError {
    /// True when the request itself was at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::InvalidStartDate | QueryError::InvalidDateRange)
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

/// First date of the trailing 365-day window ending at the latest measurement.
pub async fn trailing_window_start(dataset: &dyn ClimateDataset) -> Result<NaiveDate> {
    let last = dataset.max_date().await?;
    let last = parse_date(&last).ok_or(DatasetError::MalformedDate(last))?;
    Ok(one_year_before(last))
}

/// Precipitation for the last 365 days, keyed by date.
///
/// Several stations report the same day; the row stored last wins.
pub async fn precipitation(dataset: &dyn ClimateDataset) -> Result<PrecipitationByDate> {
    let cutoff = trailing_window_start(dataset).await?;
    let rows = dataset.measurements_since(cutoff).await?;

    Ok(rows.into_iter().map(|r| (r.date, r.precipitation)).collect())
}

pub async fn stations(dataset: &dyn ClimateDataset) -> Result<Vec<String>> {
    Ok(dataset.station_ids().await?)
}

/// Temperature observations for the last 365 days at the most active station.
pub async fn tobs(dataset: &dyn ClimateDataset) -> Result<Vec<TemperatureObservation>> {
    let cutoff = trailing_window_start(dataset).await?;
    let station = dataset.most_active_station().await?;
    log::debug!("Most active station is {station}, window starts {cutoff}");

    Ok(dataset.temperature_observations_since(&station, cutoff).await?)
}

pub async fn temperature_stats(
    dataset: &dyn ClimateDataset,
    start: &str,
) -> Result<TemperatureSummary> {
    let start = parse_date(start).ok_or(QueryError::InvalidStartDate)?;
    Ok(dataset.temperature_stats(start, None).await?)
}

pub async fn temperature_stats_range(
    dataset: &dyn ClimateDataset,
    start: &str,
    end: &str,
) -> Result<TemperatureSummary> {
    let (Some(start), Some(end)) = (parse_date(start), parse_date(end)) else {
        return Err(QueryError::InvalidDateRange);
    };
    Ok(dataset.temperature_stats(start, Some(end)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sqlite::test_support::{dataset_with, measurement, sample_dataset};

    #[tokio::test]
    async fn precipitation_covers_trailing_year_and_last_row_wins() {
        let (ds, _dir) = sample_dataset();
        let data = precipitation(&ds).await.unwrap();

        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2016-08-23", "2017-01-01", "2017-01-02", "2017-08-18", "2017-08-23"]);

        assert_eq!(data["2016-08-23"], Some(0.0));
        assert_eq!(data["2017-01-01"], None);
        assert_eq!(data["2017-01-02"], Some(0.15));
    }

    #[tokio::test]
    async fn precipitation_keys_are_within_window() {
        let (ds, _dir) = sample_dataset();
        let cutoff = crate::date::format_date(trailing_window_start(&ds).await.unwrap());
        assert_eq!(cutoff, "2016-08-23");

        let data = precipitation(&ds).await.unwrap();
        assert!(data.keys().all(|d| d.as_str() >= cutoff.as_str()));
    }

    #[tokio::test]
    async fn empty_dataset_is_a_server_error() {
        let (ds, _dir) = dataset_with(&[]);

        let err = precipitation(&ds).await.unwrap_err();
        assert!(matches!(err, QueryError::Dataset(DatasetError::EmptyDataset)));
        assert!(!err.is_client_error());

        let err = tobs(&ds).await.unwrap_err();
        assert!(matches!(err, QueryError::Dataset(DatasetError::EmptyDataset)));
    }

    #[tokio::test]
    async fn malformed_stored_date_is_reported() {
        let (ds, _dir) = dataset_with(&[measurement("USC00519281", "2017/08/23", None, None)]);

        let err = precipitation(&ds).await.unwrap_err();
        assert!(matches!(err, QueryError::Dataset(DatasetError::MalformedDate(d)) if d == "2017/08/23"));
    }

    #[tokio::test]
    async fn stations_lists_every_id() {
        let (ds, _dir) = sample_dataset();
        let ids = stations(&ds).await.unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"USC00519281".to_string()));
    }

    #[tokio::test]
    async fn tobs_only_returns_most_active_station() {
        let (ds, _dir) = sample_dataset();
        let obs = tobs(&ds).await.unwrap();

        let dates: Vec<&str> = obs.iter().map(|o| o.date.as_str()).collect();
        assert_eq!(dates, ["2016-08-23", "2017-01-01", "2017-08-18"]);
    }

    #[tokio::test]
    async fn invalid_start_is_rejected_before_querying() {
        let (ds, _dir) = sample_dataset();
        let err = temperature_stats(&ds, "not-a-date").await.unwrap_err();

        assert!(matches!(err, QueryError::InvalidStartDate));
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Invalid date format. Use 'YYYY-MM-DD' format for the start date."
        );
    }

    #[tokio::test]
    async fn invalid_range_reports_both_dates() {
        let (ds, _dir) = sample_dataset();

        for (start, end) in [("2017-01-01", "2017-13-01"), ("2017-02-30", "2017-03-01")] {
            let err = temperature_stats_range(&ds, start, end).await.unwrap_err();
            assert!(matches!(err, QueryError::InvalidDateRange));
            assert_eq!(
                err.to_string(),
                "Invalid date format. Use 'YYYY-MM-DD' format for the start and end dates."
            );
        }
    }

    #[tokio::test]
    async fn range_stats_are_ordered() {
        let (ds, _dir) = sample_dataset();
        let stats = temperature_stats_range(&ds, "2016-08-23", "2017-08-23").await.unwrap();

        let (min, avg, max) =
            (stats.minimum.unwrap(), stats.average.unwrap(), stats.maximum.unwrap());
        assert!(min <= avg && avg <= max);
    }

    #[tokio::test]
    async fn single_day_range_matches_open_start_extremes() {
        let (ds, _dir) = dataset_with(&[
            measurement("USC00519281", "2017-01-01", None, Some(62.0)),
            measurement("USC00519397", "2017-01-01", None, Some(66.0)),
        ]);

        let open = temperature_stats(&ds, "2017-01-01").await.unwrap();
        let day = temperature_stats_range(&ds, "2017-01-01", "2017-01-01").await.unwrap();

        assert_eq!(open.minimum, day.minimum);
        assert_eq!(open.maximum, day.maximum);
        assert_eq!(day.average, Some(64.0));
    }

    #[tokio::test]
    async fn window_without_rows_yields_null_stats() {
        let (ds, _dir) = sample_dataset();
        let stats = temperature_stats_range(&ds, "2016-12-01", "2016-12-31").await.unwrap();
        assert_eq!(stats, TemperatureSummary::default());
    }
}
