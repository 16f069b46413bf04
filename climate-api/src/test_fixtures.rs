//! Throwaway SQLite datasets for tests that go through `SqliteDataset`.

use climate_core::SqliteDataset;
use rusqlite::{Connection, params};
use tempfile::TempDir;

pub const STATIONS: &[(&str, &str, f64)] = &[
    ("USC00519397", "WAIKIKI 717.2, HI US", 3.0),
    ("USC00513117", "KANEOHE 838.1, HI US", 14.6),
    ("USC00519281", "WAIHEE 837.5, HI US", 32.9),
];

/// Rows are stored in this order; the later of two same-day rows wins in precipitation.
pub const MEASUREMENTS: &[(&str, &str, Option<f64>, Option<f64>)] = &[
    ("USC00519281", "2016-08-22", Some(0.10), Some(70.0)),
    ("USC00519281", "2016-08-23", Some(1.79), Some(77.0)),
    ("USC00519397", "2016-08-23", Some(0.00), Some(81.0)),
    ("USC00519281", "2017-01-01", Some(0.00), Some(62.0)),
    ("USC00519397", "2017-01-01", None, Some(66.0)),
    ("USC00513117", "2017-01-02", Some(0.15), Some(70.0)),
    ("USC00519281", "2017-08-18", None, Some(79.0)),
    ("USC00519397", "2017-08-23", Some(0.00), Some(81.0)),
];

pub fn sqlite_dataset(
    measurements: &[(&str, &str, Option<f64>, Option<f64>)],
) -> (SqliteDataset, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hawaii.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE measurement (
            id        INTEGER PRIMARY KEY,
            station   TEXT,
            date      TEXT,
            prcp      FLOAT,
            tobs      FLOAT
        );
        CREATE TABLE station (
            id        INTEGER PRIMARY KEY,
            station   TEXT,
            name      TEXT,
            latitude  FLOAT,
            longitude FLOAT,
            elevation FLOAT
        );",
    )
    .unwrap();

    for (id, name, elevation) in STATIONS {
        conn.execute(
            "INSERT INTO station (station, name, latitude, longitude, elevation) \
             VALUES (?1, ?2, 21.3, -157.8, ?3)",
            params![id, name, elevation],
        )
        .unwrap();
    }
    for (station, date, prcp, tobs) in measurements {
        conn.execute(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
            params![station, date, prcp, tobs],
        )
        .unwrap();
    }
    drop(conn);

    (SqliteDataset::open(&path).unwrap(), dir)
}

pub fn sample_sqlite_dataset() -> (SqliteDataset, TempDir) {
    sqlite_dataset(MEASUREMENTS)
}
