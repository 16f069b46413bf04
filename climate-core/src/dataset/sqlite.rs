use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::{Path, PathBuf};

use crate::{
    date::format_date,
    model::{Measurement, PrecipitationReading, Station, TemperatureObservation, TemperatureSummary},
};

use super::{ClimateDataset, DatasetError, Result};

/// SQLite-backed dataset, e.g. `Resources/hawaii.sqlite`.
///
/// Each query opens its own read-only connection on the blocking pool, so
/// concurrent requests never share a connection.
#[derive(Debug, Clone)]
pub struct SqliteDataset {
    path: PathBuf,
}

impl SqliteDataset {
    /// Open the dataset at `path` and verify it carries the expected schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(DatasetError::NotFound(path));
        }

        let conn = connect(&path)?;
        verify_table(&conn, Measurement::TABLE, Measurement::COLUMNS)?;
        verify_table(&conn, Station::TABLE, Station::COLUMNS)?;

        log::debug!("Opened climate dataset at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = connect(&path)?;
            query(&conn)
        })
        .await?
    }
}

fn connect(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(Connection::open_with_flags(path, flags)?)
}

fn verify_table(
    conn: &Connection,
    table: &'static str,
    columns: &'static [&'static str],
) -> Result<()> {
    // Table names are compile-time constants, never user input.
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if present.is_empty() {
        return Err(DatasetError::MissingTable(table));
    }

    for &column in columns {
        if !present.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            return Err(DatasetError::SchemaMismatch { table, column });
        }
    }

    Ok(())
}

#[async_trait]
impl ClimateDataset for SqliteDataset {
    async fn max_date(&self) -> Result<String> {
        self.read(|conn| {
            let max: Option<String> =
                conn.query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))?;
            max.ok_or(DatasetError::EmptyDataset)
        })
        .await
    }

    async fn measurements_since(&self, since: NaiveDate) -> Result<Vec<PrecipitationReading>> {
        let since = format_date(since);
        self.read(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT date, prcp FROM measurement WHERE date >= ?1 ORDER BY rowid",
            )?;
            let rows = stmt.query_map(params![since], |row| {
                Ok(PrecipitationReading { date: row.get(0)?, precipitation: row.get(1)? })
            })?;
            rows.collect::<std::result::Result<Vec<_>, _>>().map_err(DatasetError::from)
        })
        .await
    }

    async fn station_ids(&self) -> Result<Vec<String>> {
        self.read(|conn| {
            let mut stmt = conn.prepare("SELECT station FROM station ORDER BY rowid")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<std::result::Result<Vec<_>, _>>().map_err(DatasetError::from)
        })
        .await
    }

    async fn stations(&self) -> Result<Vec<Station>> {
        self.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT station, name, latitude, longitude, elevation \
                 FROM station ORDER BY rowid",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Station {
                    station: row.get(0)?,
                    name: row.get(1)?,
                    latitude: row.get(2)?,
                    longitude: row.get(3)?,
                    elevation: row.get(4)?,
                })
            })?;
            rows.collect::<std::result::Result<Vec<_>, _>>().map_err(DatasetError::from)
        })
        .await
    }

    async fn most_active_station(&self) -> Result<String> {
        self.read(|conn| {
            let station: Option<String> = conn
                .query_row(
                    "SELECT station FROM measurement \
                     GROUP BY station ORDER BY COUNT(*) DESC, station ASC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?;
            station.ok_or(DatasetError::EmptyDataset)
        })
        .await
    }

    async fn temperature_observations_since(
        &self,
        station: &str,
        since: NaiveDate,
    ) -> Result<Vec<TemperatureObservation>> {
        let station = station.to_owned();
        let since = format_date(since);
        self.read(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT date, tobs FROM measurement \
                 WHERE station = ?1 AND date >= ?2 ORDER BY rowid",
            )?;
            let rows = stmt.query_map(params![station, since], |row| {
                Ok(TemperatureObservation { date: row.get(0)?, temperature: row.get(1)? })
            })?;
            rows.collect::<std::result::Result<Vec<_>, _>>().map_err(DatasetError::from)
        })
        .await
    }

    async fn temperature_stats(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TemperatureSummary> {
        let start = format_date(start);
        let end = end.map(format_date);
        self.read(move |conn| {
            let summary = conn.query_row(
                "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement \
                 WHERE date >= ?1 AND (?2 IS NULL OR date <= ?2)",
                params![start, end],
                |row| {
                    Ok(TemperatureSummary {
                        minimum: row.get(0)?,
                        average: row.get(1)?,
                        maximum: row.get(2)?,
                    })
                },
            )?;
            Ok(summary)
        })
        .await
    }
}
