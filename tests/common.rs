#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub const WAIKIKI: &str = "USC00519397";
pub const KANEOHE: &str = "USC00513117";
pub const WAIHEE: &str = "USC00519281";

/// Fresh in-memory database with the schema applied.
///
/// A single connection that never expires, so every query sees the same
/// in-memory store.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn insert_station(pool: &SqlitePool, station: &str, name: &str) {
    sqlx::query(
        r#"
        INSERT INTO station (station, name, latitude, longitude, elevation)
        VALUES (?, ?, 21.3, -157.8, 3.0)
        "#,
    )
    .bind(station)
    .bind(name)
    .execute(pool)
    .await
    .expect("Failed to insert station");
}

pub async fn insert_measurement(
    pool: &SqlitePool,
    station: &str,
    date: &str,
    prcp: Option<f64>,
    tobs: f64,
) {
    sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
        .bind(station)
        .bind(date)
        .bind(prcp)
        .bind(tobs)
        .execute(pool)
        .await
        .expect("Failed to insert measurement");
}

/// Small slice of the Hawaii dataset.
///
/// Latest date is 2017-08-23, so the one-year window starts at 2016-08-23.
/// WAIHEE has the most rows. WAIHEE and KANEOHE both report on 2017-08-21,
/// with KANEOHE loaded last.
pub async fn seed_sample(pool: &SqlitePool) {
    insert_station(pool, WAIKIKI, "WAIKIKI 717.2, HI US").await;
    insert_station(pool, KANEOHE, "KANEOHE 838.1, HI US").await;
    insert_station(pool, WAIHEE, "WAIHEE 837.5, HI US").await;

    insert_measurement(pool, WAIHEE, "2016-08-22", Some(1.0), 70.0).await;
    insert_measurement(pool, WAIHEE, "2016-08-23", Some(0.15), 77.0).await;
    insert_measurement(pool, WAIHEE, "2017-08-18", None, 76.0).await;
    insert_measurement(pool, WAIHEE, "2017-08-21", Some(0.56), 72.0).await;
    insert_measurement(pool, KANEOHE, "2017-08-21", Some(0.01), 74.0).await;
    insert_measurement(pool, WAIKIKI, "2017-08-22", Some(0.0), 79.0).await;
    insert_measurement(pool, WAIKIKI, "2017-08-23", Some(0.02), 80.0).await;
}
