use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::db::{DbError, Measurement, TemperatureStats};

#[derive(Clone)]
pub struct MeasurementRepository {
    pool: SqlitePool,
}

impl MeasurementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Most recent measurement date, `None` when the table is empty.
    ///
    /// Dates are ISO-8601 text, so the lexicographic maximum is also the
    /// chronological one.
    #[instrument(skip(self))]
    pub async fn latest_date(&self) -> Result<Option<String>, DbError> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&self.pool)
            .await?;

        debug!("Latest measurement date: {:?}", latest);
        Ok(latest)
    }

    /// All `(date, prcp)` pairs on or after `since`, oldest first.
    /// Rows sharing a date keep their load order.
    #[instrument(skip(self))]
    pub async fn precipitation_since(
        &self,
        since: &str,
    ) -> Result<Vec<(String, Option<f64>)>, DbError> {
        let rows = sqlx::query_as::<_, (String, Option<f64>)>(
            r#"
            SELECT date, prcp
            FROM measurement
            WHERE date >= ?
            ORDER BY date, id
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} precipitation rows since {}", rows.len(), since);
        Ok(rows)
    }

    /// Station with the most measurement rows. Ties go to the lowest station id.
    #[instrument(skip(self))]
    pub async fn most_active_station(&self) -> Result<Option<String>, DbError> {
        let station: Option<String> = sqlx::query_scalar(
            r#"
            SELECT station
            FROM measurement
            GROUP BY station
            ORDER BY COUNT(*) DESC, station ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        debug!("Most active station: {:?}", station);
        Ok(station)
    }

    /// `(date, tobs)` pairs for one station on or after `since`, oldest first
    #[instrument(skip(self))]
    pub async fn temperatures_for_station_since(
        &self,
        station: &str,
        since: &str,
    ) -> Result<Vec<(String, f64)>, DbError> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            r#"
            SELECT date, tobs
            FROM measurement
            WHERE station = ? AND date >= ?
            ORDER BY date, id
            "#,
        )
        .bind(station)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Found {} temperature observations for {} since {}",
            rows.len(),
            station,
            since
        );
        Ok(rows)
    }

    /// Min/avg/max tobs for `start <= date` (and `date <= end` when given)
    #[instrument(skip(self))]
    pub async fn temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, DbError> {
        let stats = match end {
            Some(end) => {
                sqlx::query_as::<_, TemperatureStats>(
                    r#"
                    SELECT MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax
                    FROM measurement
                    WHERE date >= ? AND date <= ?
                    "#,
                )
                .bind(start)
                .bind(end)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TemperatureStats>(
                    r#"
                    SELECT MIN(tobs) AS tmin, AVG(tobs) AS tavg, MAX(tobs) AS tmax
                    FROM measurement
                    WHERE date >= ?
                    "#,
                )
                .bind(start)
                .fetch_one(&self.pool)
                .await?
            }
        };

        debug!("Temperature stats from {} to {:?}: {:?}", start, end, stats);
        Ok(stats)
    }

    /// Most recent measurements across all stations, newest first
    #[instrument(skip(self))]
    pub async fn find_recent(&self, limit: i64) -> Result<Vec<Measurement>, DbError> {
        let measurements = sqlx::query_as::<_, Measurement>(
            r#"
            SELECT id, station, date, prcp, tobs
            FROM measurement
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        if measurements.is_empty() {
            debug!("No measurements found in database");
        }
        Ok(measurements)
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM measurement")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
