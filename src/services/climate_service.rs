use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, info, instrument};

use crate::db::{
    DbError, MeasurementRepository, PrecipitationSeries, StationRepository,
    TemperatureObservation, TemperatureStats,
};

/// Format used for stored dates and for date path parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the "last year" window ending at the latest measurement
pub const LOOKBACK_DAYS: i64 = 365;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid {param} date {value:?}: expected YYYY-MM-DD")]
    InvalidDate { param: &'static str, value: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Db(#[from] DbError),
}

#[derive(Clone)]
pub struct ClimateService {
    measurement_repo: MeasurementRepository,
    station_repo: StationRepository,
}

impl ClimateService {
    pub fn new(measurement_repo: MeasurementRepository, station_repo: StationRepository) -> Self {
        Self {
            measurement_repo,
            station_repo,
        }
    }

    /// Most recent measurement date, `None` for an empty store
    pub async fn latest_date(&self) -> Result<Option<NaiveDate>, ServiceError> {
        let Some(latest) = self.measurement_repo.latest_date().await? else {
            return Ok(None);
        };

        let date = NaiveDate::parse_from_str(&latest, DATE_FORMAT)
            .map_err(|source| DbError::InvalidStoredDate {
                value: latest.clone(),
                source,
            })?;
        Ok(Some(date))
    }

    /// Precipitation for the year ending at the latest measurement, keyed by date
    #[instrument(skip(self))]
    pub async fn precipitation_last_year(&self) -> Result<PrecipitationSeries, ServiceError> {
        let Some(since) = self.last_year_start().await? else {
            debug!("No measurements stored, returning empty precipitation series");
            return Ok(PrecipitationSeries::default());
        };

        let rows = self
            .measurement_repo
            .precipitation_since(&format_date(since))
            .await?;
        let row_count = rows.len();
        let series: PrecipitationSeries = rows.into_iter().collect();

        info!(
            "Collapsed {} precipitation rows into {} dates since {}",
            row_count,
            series.len(),
            since
        );
        Ok(series)
    }

    pub async fn list_stations(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.station_repo.list_ids().await?)
    }

    /// Temperature observations for the year ending at the latest measurement,
    /// restricted to the station with the most measurements
    #[instrument(skip(self))]
    pub async fn most_active_tobs_last_year(
        &self,
    ) -> Result<Vec<TemperatureObservation>, ServiceError> {
        let Some(station) = self.measurement_repo.most_active_station().await? else {
            debug!("No measurements stored, returning empty observation list");
            return Ok(Vec::new());
        };
        let Some(since) = self.last_year_start().await? else {
            return Ok(Vec::new());
        };

        let observations: Vec<TemperatureObservation> = self
            .measurement_repo
            .temperatures_for_station_since(&station, &format_date(since))
            .await?
            .into_iter()
            .map(|(date, tobs)| TemperatureObservation::new(date, tobs))
            .collect();

        info!(
            "Retrieved {} observations for most active station {} since {}",
            observations.len(),
            station,
            since
        );
        Ok(observations)
    }

    /// Min/avg/max temperature from `start` onwards, bounded by `end` when given.
    ///
    /// Both bounds are inclusive and must be `YYYY-MM-DD` dates.
    #[instrument(skip(self))]
    pub async fn temp_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, ServiceError> {
        let start = parse_date_param("start", start)?;
        let end = end.map(|end| parse_date_param("end", end)).transpose()?;

        if let Some(end) = end {
            if start > end {
                return Err(ServiceError::InvalidRange { start, end });
            }
        }

        let end = end.map(format_date);
        let stats = self
            .measurement_repo
            .temperature_stats(&format_date(start), end.as_deref())
            .await?;

        if stats.is_empty() {
            debug!("No measurements between {} and {:?}", start, end);
        }
        Ok(stats)
    }

    /// `(stations, measurements)` row counts; doubles as a store liveness check
    pub async fn row_counts(&self) -> Result<(i64, i64), ServiceError> {
        let stations = self.station_repo.count().await?;
        let measurements = self.measurement_repo.count().await?;
        Ok((stations, measurements))
    }

    async fn last_year_start(&self) -> Result<Option<NaiveDate>, ServiceError> {
        Ok(self.latest_date().await?.map(one_year_before))
    }
}

/// Parse a date path parameter, rejecting anything that is not a calendar date.
///
/// Years must be four unsigned digits: stored dates are compared as text, so a
/// signed or five-digit year would sort before every stored date.
pub fn parse_date_param(param: &'static str, value: &str) -> Result<NaiveDate, ServiceError> {
    let invalid = || ServiceError::InvalidDate {
        param,
        value: value.to_string(),
    };

    if !value.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())?;
    if !(0..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}

/// Start of the lookback window ending at `latest`
pub fn one_year_before(latest: NaiveDate) -> NaiveDate {
    latest - Duration::days(LOOKBACK_DAYS)
}

// Stored dates compare as text, so queries always use the zero-padded form
fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
