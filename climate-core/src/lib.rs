//! Core library for the climate API.
//!
//! This crate defines:
//! - Configuration handling
//! - Read-only access to the measurement/station dataset
//! - Strict date validation
//! - The query handlers behind each endpoint
//!
//! It is used by `climate-api`, but can also be reused by other binaries or services.

pub mod config;
pub mod dataset;
pub mod date;
pub mod model;
pub mod query;

pub use config::{Config, ServerConfig};
pub use dataset::{ClimateDataset, DatasetError, SqliteDataset};
pub use model::{
    Measurement, PrecipitationByDate, PrecipitationReading, Station, TemperatureObservation,
    TemperatureSummary,
};
pub use query::QueryError;
