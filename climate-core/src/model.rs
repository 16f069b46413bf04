use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One station-day reading from the `measurement` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station: String,
    /// `YYYY-MM-DD`, stored as text.
    pub date: String,
    pub precipitation: Option<f64>,
    pub temperature: Option<f64>,
}

impl Measurement {
    pub const TABLE: &'static str = "measurement";

    /// Column names as stored, in the order `Measurement` fields are declared.
    pub const COLUMNS: &'static [&'static str] = &["station", "date", "prcp", "tobs"];
}

/// A weather-observation site from the `station` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Station {
    pub const TABLE: &'static str = "station";

    pub const COLUMNS: &'static [&'static str] =
        &["station", "name", "latitude", "longitude", "elevation"];
}

/// A `(date, precipitation)` pair as returned by the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

/// Payload of the precipitation endpoint: date -> precipitation.
///
/// Ordered so the serialized JSON object has sorted keys.
pub type PrecipitationByDate = BTreeMap<String, Option<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureObservation {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
}

/// Aggregate temperature statistics. All fields are `None` when no rows matched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureSummary {
    #[serde(rename = "Minimum Temperature")]
    pub minimum: Option<f64>,
    #[serde(rename = "Average Temperature")]
    pub average: Option<f64>,
    #[serde(rename = "Maximum Temperature")]
    pub maximum: Option<f64>,
}
