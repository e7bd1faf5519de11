use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Database entity models
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Measurement {
    pub id: i64,
    pub station: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`), stored as text
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Station {
    pub id: i64,
    pub station: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

/// Aggregate temperature row; every field is `None` when no rows matched
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize, ToSchema)]
pub struct TemperatureStats {
    #[serde(rename = "TMIN")]
    #[schema(example = 79.0)]
    pub tmin: Option<f64>,
    #[serde(rename = "TAVG")]
    #[schema(example = 79.5)]
    pub tavg: Option<f64>,
    #[serde(rename = "TMAX")]
    #[schema(example = 80.0)]
    pub tmax: Option<f64>,
}

impl TemperatureStats {
    pub fn is_empty(&self) -> bool {
        self.tmin.is_none() && self.tavg.is_none() && self.tmax.is_none()
    }
}

// API response DTOs

/// Precipitation keyed by date. One entry per date, so readings from several
/// stations on the same day collapse to the last one loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PrecipitationSeries(pub BTreeMap<String, Option<f64>>);

impl PrecipitationSeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Option<f64>)> for PrecipitationSeries {
    fn from_iter<I: IntoIterator<Item = (String, Option<f64>)>>(iter: I) -> Self {
        // Later pairs overwrite earlier ones with the same date
        Self(iter.into_iter().collect())
    }
}

/// A single `{date: tobs}` object
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TemperatureObservation(pub BTreeMap<String, f64>);

impl TemperatureObservation {
    pub fn new(date: impl Into<String>, tobs: f64) -> Self {
        Self(BTreeMap::from([(date.into(), tobs)]))
    }
}
