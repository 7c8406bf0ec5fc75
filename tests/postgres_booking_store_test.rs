//! PostgreSQLアダプターのテスト
//!
//! DATABASE_URLで指定したデータベースが必要。
//! `cargo test -- --ignored` で実行する。

mod common;

use chrono::{DateTime, NaiveDate, Utc};
use rusty_booking_ddd::adapters::postgres::{
    PostgresBookingStore, PostgresSpotDirectory, PostgresUserDirectory,
};
use rusty_booking_ddd::domain::{
    BookingField, BoundaryPolicy, DateRange, propose_booking,
    value_objects::{SpotId, UserId},
};
use rusty_booking_ddd::ports::{AdmitOutcome, BookingStore, SpotDirectory, UserDirectory};
use serial_test::serial;
use std::sync::Arc;

/// PostgreSQLの時刻精度（マイクロ秒）に合わせて丸める
fn truncate_to_micros(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(dt.timestamp_micros()).expect("Invalid timestamp")
}

fn dates(start: u32, end: u32) -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2031, 7, start).unwrap(),
        NaiveDate::from_ymd_opt(2031, 7, end).unwrap(),
    )
    .unwrap()
}

async fn admit(
    store: &PostgresBookingStore,
    spot_id: i64,
    user_id: i64,
    range: DateRange,
) -> AdmitOutcome {
    store
        .admit(
            propose_booking(SpotId::from_i64(spot_id), UserId::from_i64(user_id), range),
            BoundaryPolicy::HalfOpen,
            Utc::now(),
        )
        .await
        .expect("Failed to admit booking")
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_admit_and_find_by_spot() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let owner = common::insert_user(&pool, "Demo", "Owner").await;
    let guest = common::insert_user(&pool, "John", "Smith").await;
    let spot = common::insert_spot(&pool, owner, "Seaside").await;
    let store = PostgresBookingStore::new(pool.clone());

    let admitted_at = Utc::now();
    let outcome = store
        .admit(
            propose_booking(SpotId::from_i64(spot), UserId::from_i64(guest), dates(10, 12)),
            BoundaryPolicy::HalfOpen,
            admitted_at,
        )
        .await
        .unwrap();

    let AdmitOutcome::Admitted(booking) = outcome else {
        panic!("expected Admitted, got {:?}", outcome);
    };
    assert_eq!(booking.created_at, truncate_to_micros(admitted_at));

    let found = store.find_by_spot(SpotId::from_i64(spot)).await.unwrap();
    assert_eq!(found, vec![booking]);
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_admit_unknown_spot() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let guest = common::insert_user(&pool, "John", "Smith").await;
    let store = PostgresBookingStore::new(pool.clone());

    let outcome = admit(&store, 4242, guest, dates(1, 2)).await;

    assert_eq!(outcome, AdmitOutcome::SpotNotFound);
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_admit_conflict_is_rolled_back() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let owner = common::insert_user(&pool, "Demo", "Owner").await;
    let guest = common::insert_user(&pool, "John", "Smith").await;
    let spot = common::insert_spot(&pool, owner, "Seaside").await;
    let store = PostgresBookingStore::new(pool.clone());

    admit(&store, spot, guest, dates(5, 9)).await;
    let outcome = admit(&store, spot, guest, dates(3, 11)).await;

    let AdmitOutcome::Conflict(conflict) = outcome else {
        panic!("expected Conflict, got {:?}", outcome);
    };
    assert!(conflict.field_errors().contains(BookingField::StartDate));
    assert!(conflict.field_errors().contains(BookingField::EndDate));
    assert_eq!(store.find_by_spot(SpotId::from_i64(spot)).await.unwrap().len(), 1);

    // 接するだけの予約は受け付けられる
    assert!(matches!(
        admit(&store, spot, guest, dates(9, 10)).await,
        AdmitOutcome::Admitted(_)
    ));
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_inclusive_policy_reads_touching_rows() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let owner = common::insert_user(&pool, "Demo", "Owner").await;
    let guest = common::insert_user(&pool, "John", "Smith").await;
    let spot = common::insert_spot(&pool, owner, "Seaside").await;
    let store = PostgresBookingStore::new(pool.clone());

    admit(&store, spot, guest, dates(5, 9)).await;
    let outcome = store
        .admit(
            propose_booking(SpotId::from_i64(spot), UserId::from_i64(guest), dates(9, 12)),
            BoundaryPolicy::Inclusive,
            Utc::now(),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, AdmitOutcome::Conflict(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
#[ignore]
async fn test_concurrent_admission_admits_exactly_one() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let owner = common::insert_user(&pool, "Demo", "Owner").await;
    let guest = common::insert_user(&pool, "John", "Smith").await;
    let spot = common::insert_spot(&pool, owner, "Seaside").await;
    let store = Arc::new(PostgresBookingStore::new(pool.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { admit(&store, spot, guest, dates(10 + i % 2, 14)).await })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        if let AdmitOutcome::Admitted(_) = handle.await.unwrap() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(store.find_by_spot(SpotId::from_i64(spot)).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_find_by_user_orders_by_start_date() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let owner = common::insert_user(&pool, "Demo", "Owner").await;
    let guest = common::insert_user(&pool, "John", "Smith").await;
    let other = common::insert_user(&pool, "Jane", "Doe").await;
    let seaside = common::insert_spot(&pool, owner, "Seaside").await;
    let cabin = common::insert_spot(&pool, owner, "Cabin").await;
    let store = PostgresBookingStore::new(pool.clone());

    admit(&store, seaside, guest, dates(20, 22)).await;
    admit(&store, cabin, guest, dates(3, 4)).await;
    admit(&store, seaside, other, dates(1, 2)).await;

    let found = store.find_by_user(UserId::from_i64(guest)).await.unwrap();

    let spots: Vec<i64> = found.iter().map(|b| b.spot_id.value()).collect();
    assert_eq!(spots, vec![cabin, seaside]);
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_spot_directory_summaries_with_preview_image() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let owner = common::insert_user(&pool, "Demo", "Owner").await;
    let seaside = common::insert_spot(&pool, owner, "Seaside").await;
    let cabin = common::insert_spot(&pool, owner, "Cabin").await;
    common::insert_spot_image(&pool, seaside, "https://img.example/inside.png", false).await;
    common::insert_spot_image(&pool, seaside, "https://img.example/front.png", true).await;
    let directory = PostgresSpotDirectory::new(pool.clone());

    let spot_ref = directory.find_spot(SpotId::from_i64(seaside)).await.unwrap().unwrap();
    assert_eq!(spot_ref.owner_id, UserId::from_i64(owner));
    assert!(directory.find_spot(SpotId::from_i64(9999)).await.unwrap().is_none());

    let summaries = directory
        .find_summaries(&[SpotId::from_i64(seaside), SpotId::from_i64(cabin), SpotId::from_i64(9999)])
        .await
        .unwrap();

    assert_eq!(summaries.len(), 2);
    let seaside_summary = summaries.iter().find(|s| s.id.value() == seaside).unwrap();
    assert_eq!(seaside_summary.name, "Seaside");
    assert_eq!(
        seaside_summary.preview_image.as_deref(),
        Some("https://img.example/front.png")
    );
    let cabin_summary = summaries.iter().find(|s| s.id.value() == cabin).unwrap();
    assert!(cabin_summary.preview_image.is_none());
}

#[tokio::test]
#[serial]
#[ignore]
async fn test_user_directory_profiles() {
    let pool = common::create_test_pool().await;
    common::cleanup_database(&pool).await;
    let guest = common::insert_user(&pool, "John", "Smith").await;
    let directory = PostgresUserDirectory::new(pool.clone());

    let profiles = directory
        .find_profiles(&[UserId::from_i64(guest), UserId::from_i64(9999)])
        .await
        .unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].first_name, "John");
    assert_eq!(profiles[0].last_name, "Smith");
}
