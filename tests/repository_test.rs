// Repository tests against an in-memory SQLite store

mod common;

use climate_service::db::{MeasurementRepository, StationRepository};
use common::{KANEOHE, WAIHEE, WAIKIKI};

#[tokio::test]
async fn test_latest_date_empty_store() {
    let pool = common::test_pool().await;
    let repo = MeasurementRepository::new(pool);

    assert_eq!(repo.latest_date().await.unwrap(), None);
    assert_eq!(repo.most_active_station().await.unwrap(), None);
}

#[tokio::test]
async fn test_latest_date() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = MeasurementRepository::new(pool);

    assert_eq!(repo.latest_date().await.unwrap().as_deref(), Some("2017-08-23"));
    assert_eq!(repo.count().await.unwrap(), 7);
}

#[tokio::test]
async fn test_precipitation_since_keeps_load_order_within_a_date() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = MeasurementRepository::new(pool);

    let rows = repo.precipitation_since("2017-08-21").await.unwrap();

    assert_eq!(
        rows,
        vec![
            ("2017-08-21".to_string(), Some(0.56)),
            ("2017-08-21".to_string(), Some(0.01)),
            ("2017-08-22".to_string(), Some(0.0)),
            ("2017-08-23".to_string(), Some(0.02)),
        ]
    );
}

#[tokio::test]
async fn test_most_active_station() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = MeasurementRepository::new(pool);

    assert_eq!(repo.most_active_station().await.unwrap().as_deref(), Some(WAIHEE));
}

#[tokio::test]
async fn test_most_active_station_tie_goes_to_lowest_id() {
    let pool = common::test_pool().await;
    common::insert_measurement(&pool, "USC00000002", "2017-01-01", Some(0.1), 70.0).await;
    common::insert_measurement(&pool, "USC00000002", "2017-01-02", Some(0.1), 71.0).await;
    common::insert_measurement(&pool, "USC00000001", "2017-01-01", Some(0.2), 72.0).await;
    common::insert_measurement(&pool, "USC00000001", "2017-01-02", Some(0.2), 73.0).await;
    let repo = MeasurementRepository::new(pool);

    assert_eq!(
        repo.most_active_station().await.unwrap().as_deref(),
        Some("USC00000001")
    );
}

#[tokio::test]
async fn test_temperatures_for_station_since() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = MeasurementRepository::new(pool);

    let rows = repo
        .temperatures_for_station_since(WAIHEE, "2016-08-23")
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![
            ("2016-08-23".to_string(), 77.0),
            ("2017-08-18".to_string(), 76.0),
            ("2017-08-21".to_string(), 72.0),
        ]
    );
}

#[tokio::test]
async fn test_temperature_stats_bounds_are_inclusive() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = MeasurementRepository::new(pool);

    let stats = repo
        .temperature_stats("2017-08-22", Some("2017-08-23"))
        .await
        .unwrap();
    assert_eq!(stats.tmin, Some(79.0));
    assert_eq!(stats.tavg, Some(79.5));
    assert_eq!(stats.tmax, Some(80.0));

    let stats = repo.temperature_stats("2017-08-21", None).await.unwrap();
    assert_eq!(stats.tmin, Some(72.0));
    assert_eq!(stats.tmax, Some(80.0));
}

#[tokio::test]
async fn test_temperature_stats_no_rows_are_null() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = MeasurementRepository::new(pool);

    let stats = repo.temperature_stats("2018-01-01", None).await.unwrap();

    assert!(stats.is_empty());
}

#[tokio::test]
async fn test_station_list_ids_in_table_order() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = StationRepository::new(pool);

    assert_eq!(repo.list_ids().await.unwrap(), vec![WAIKIKI, KANEOHE, WAIHEE]);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_station_find_all_includes_metadata() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = StationRepository::new(pool);

    let stations = repo.find_all().await.unwrap();

    assert_eq!(stations.len(), 3);
    assert_eq!(stations[0].station, WAIKIKI);
    assert_eq!(stations[0].name.as_deref(), Some("WAIKIKI 717.2, HI US"));
    assert_eq!(stations[0].latitude, Some(21.3));
}

#[tokio::test]
async fn test_find_recent_newest_first() {
    let pool = common::test_pool().await;
    common::seed_sample(&pool).await;
    let repo = MeasurementRepository::new(pool);

    let recent = repo.find_recent(3).await.unwrap();

    let keys: Vec<(&str, &str)> = recent
        .iter()
        .map(|m| (m.station.as_str(), m.date.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (WAIKIKI, "2017-08-23"),
            (WAIKIKI, "2017-08-22"),
            (KANEOHE, "2017-08-21"),
        ]
    );
    assert_eq!(recent[0].prcp, Some(0.02));
    assert_eq!(recent[0].tobs, 80.0);
}
