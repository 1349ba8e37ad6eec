//! Postgres-backed tests for the generic repository engine.
//!
//! Run with `DATABASE_URL=postgres://... cargo test --test repository_test -- --ignored`.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use prometheus::Registry;

use medidir_core::error::ErrorKind;
use medidir_core::traits::Repository;
use medidir_core::types::{Changes, Filter};
use medidir_database::{PgRepository, QueryMetrics};
use medidir_entity::city::CityColumn;
use medidir_entity::{City, Doctor};

fn springfield() -> City {
    City {
        name: "Springfield".to_string(),
        population: 100_000,
        ..City::default()
    }
}

fn doctor(name: &str, primary_facility_id: Option<i64>) -> Doctor {
    Doctor {
        name: name.to_string(),
        specialty: "Cardiology".to_string(),
        primary_facility_id,
        ..Doctor::default()
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_then_find() {
    let database = helpers::connect_database().await;
    let metrics = Arc::new(QueryMetrics::new(Registry::new()));
    let cities = PgRepository::<City>::new(database.db.pool().clone(), Arc::clone(&metrics));

    let created = cities.create(&springfield()).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Springfield");

    let found = cities.find(created.id).await.unwrap();
    assert_eq!(found, created);

    let table = metrics.for_table("cities").unwrap();
    assert_eq!(table.total.with_label_values(&["create", "success"]).get(), 1);
    assert_eq!(table.total.with_label_values(&["find", "success"]).get(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_missing_row_is_not_found() {
    let database = helpers::connect_database().await;
    let metrics = Arc::new(QueryMetrics::new(Registry::new()));
    let cities = PgRepository::<City>::new(database.db.pool().clone(), Arc::clone(&metrics));

    let err = cities.find(999).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "City 999 not found");

    let table = metrics.for_table("cities").unwrap();
    assert_eq!(table.total.with_label_values(&["find", "failure"]).get(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_refreshes_updated_at() {
    let database = helpers::connect_database().await;
    let metrics = Arc::new(QueryMetrics::new(Registry::new()));
    let cities = PgRepository::<City>::new(database.db.pool().clone(), metrics);

    let created = cities.create(&springfield()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let changes = Changes::new()
        .set(CityColumn::Population, 120_000i64)
        .unwrap();
    let updated = cities.update(created.id, &changes).await.unwrap();

    assert_eq!(updated.population, 120_000);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_many_is_atomic() {
    let database = helpers::connect_database().await;
    let metrics = Arc::new(QueryMetrics::new(Registry::new()));
    let doctors = PgRepository::<Doctor>::new(database.db.pool().clone(), metrics);

    let batch = vec![
        doctor("Dr. Hibbert", None),
        doctor("Dr. Nick", Some(987_654_321)),
        doctor("Dr. Monroe", None),
    ];
    let err = doctors.create_many(&batch).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);

    let persisted = doctors.find_many(&Filter::new()).await.unwrap();
    assert!(persisted.is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_many_returns_rows_in_order() {
    let database = helpers::connect_database().await;
    let metrics = Arc::new(QueryMetrics::new(Registry::new()));
    let doctors = PgRepository::<Doctor>::new(database.db.pool().clone(), metrics);

    let batch = vec![doctor("Dr. Hibbert", None), doctor("Dr. Monroe", None)];
    let created = doctors.create_many(&batch).await.unwrap();

    let names: Vec<_> = created.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Dr. Hibbert", "Dr. Monroe"]);
    assert!(created[0].id < created[1].id);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_many_and_delete_many() {
    let database = helpers::connect_database().await;
    let metrics = Arc::new(QueryMetrics::new(Registry::new()));
    let cities = PgRepository::<City>::new(database.db.pool().clone(), metrics);

    for name in ["Springfield", "Shelbyville", "Ogdenville"] {
        let city = City {
            name: name.to_string(),
            ..springfield()
        };
        cities.create(&city).await.unwrap();
    }

    let small = Filter::new()
        .eq(CityColumn::Population, 100_000i64)
        .unwrap();
    let utc = Changes::new().set(CityColumn::Timezone, "UTC").unwrap();
    assert_eq!(cities.update_many(&small, &utc).await.unwrap(), 3);

    let shelbyville = Filter::new()
        .eq(CityColumn::Name, "Shelbyville")
        .unwrap();
    let removed = cities.delete_many(&shelbyville).await.unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].timezone.as_deref(), Some("UTC"));

    let remaining = cities.find_many(&Filter::new()).await.unwrap();
    let names: Vec<_> = remaining.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Springfield", "Ogdenville"]);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_bulk_mutations_refuse_empty_filter() {
    let database = helpers::connect_database().await;
    let metrics = Arc::new(QueryMetrics::new(Registry::new()));
    let cities = PgRepository::<City>::new(database.db.pool().clone(), metrics);
    cities.create(&springfield()).await.unwrap();

    let err = cities.delete_many(&Filter::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert_eq!(cities.find_many(&Filter::new()).await.unwrap().len(), 1);
}
