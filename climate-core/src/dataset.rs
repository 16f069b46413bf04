use async_trait::async_trait;
use chrono::NaiveDate;
use std::{fmt::Debug, path::PathBuf};

use crate::model::{PrecipitationReading, Station, TemperatureObservation, TemperatureSummary};

pub mod sqlite;

pub use sqlite::SqliteDataset;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("the measurement table contains no rows")]
    EmptyDataset,

    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("dataset is missing table '{0}'")]
    MissingTable(&'static str),

    #[error("table '{table}' is missing column '{column}'")]
    SchemaMismatch { table: &'static str, column: &'static str },

    #[error("stored date '{0}' is not in YYYY-MM-DD format")]
    MalformedDate(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("dataset task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Read-only access to the measurement and station collections.
///
/// Handlers receive this as `Arc<dyn ClimateDataset>`; implementations must
/// be safe for concurrent reads.
#[async_trait]
pub trait ClimateDataset: Send + Sync + Debug {
    /// Latest measurement date. Fails with `EmptyDataset` when there are no rows.
    async fn max_date(&self) -> Result<String>;

    /// Every `(date, precipitation)` with `date >= since`, in storage order.
    async fn measurements_since(&self, since: NaiveDate) -> Result<Vec<PrecipitationReading>>;

    async fn station_ids(&self) -> Result<Vec<String>>;

    /// Full station metadata, in storage order.
    async fn stations(&self) -> Result<Vec<Station>>;

    /// Station with the most measurement rows; ties go to the lowest station id.
    async fn most_active_station(&self) -> Result<String>;

    async fn temperature_observations_since(
        &self,
        station: &str,
        since: NaiveDate,
    ) -> Result<Vec<TemperatureObservation>>;

    /// Min/avg/max temperature over `start <= date` (and `date <= end` if given).
    async fn temperature_stats(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TemperatureSummary>;
}
