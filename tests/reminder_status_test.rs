// End-to-end status evaluation over a consistent store snapshot.

use chrono::{TimeZone, Utc};

use carminder::ReminderStatus;
use carminder::models::reminder::ReminderCreate;
use carminder::operations;

mod common;
use common::{seed_car, seed_log, seed_service_item, seed_user, setup_test_db};

fn mileage_rule(car_id: uuid::Uuid, service_item_id: uuid::Uuid) -> ReminderCreate {
    ReminderCreate {
        car_id,
        service_item_id,
        is_active: true,
        interval_mileage: Some(5000),
        interval_days: None,
        warning_mileage_before: Some(1000),
        warning_days_before: None,
        comment: None,
    }
}

#[tokio::test]
async fn test_mileage_axis_scenario() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_user(&db, 200).await;
    let car = seed_car(&db, 200, 10_000).await;
    seed_log(&db, car.id, 15_000).await;
    let item = seed_service_item(&db, car.id, "oil change", 12_000).await;
    operations::create_reminder(&db, mileage_rule(car.id, item.id))
        .await
        .expect("Failed to create reminder");

    let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();

    // Next due at 17,000, warning from 16,000; 15,000 is still fine.
    let report = operations::reminder_statuses_for_car(&db, car.id, now)
        .await
        .expect("Failed to evaluate reminders");
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].status, ReminderStatus::Satisfied);

    seed_log(&db, car.id, 16_500).await;
    let report = operations::reminder_statuses_for_car(&db, car.id, now)
        .await
        .expect("Failed to evaluate reminders");
    assert_eq!(report[0].status, ReminderStatus::DueSoon);

    seed_log(&db, car.id, 17_500).await;
    let report = operations::reminder_statuses_for_car(&db, car.id, now)
        .await
        .expect("Failed to evaluate reminders");
    assert_eq!(report[0].status, ReminderStatus::Overdue);
}

#[tokio::test]
async fn test_date_axis_scenario() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_user(&db, 201).await;
    let car = seed_car(&db, 201, 10_000).await;
    // Item anchored at 2024-01-01 (common::service_anchor_date).
    let item = seed_service_item(&db, car.id, "inspection", 10_000).await;
    operations::create_reminder(
        &db,
        ReminderCreate {
            car_id: car.id,
            service_item_id: item.id,
            is_active: true,
            interval_mileage: None,
            interval_days: Some(90),
            warning_mileage_before: None,
            warning_days_before: Some(14),
            comment: None,
        },
    )
    .await
    .expect("Failed to create reminder");

    // Due 2024-03-31, warning window opens 2024-03-17.
    let cases = [
        (Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(), ReminderStatus::Satisfied),
        (Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap(), ReminderStatus::DueSoon),
        (Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(), ReminderStatus::Overdue),
    ];
    for (now, expected) in cases {
        let report = operations::reminder_statuses_for_car(&db, car.id, now)
            .await
            .expect("Failed to evaluate reminders");
        assert_eq!(report[0].status, expected, "at {now}");
    }
}

#[tokio::test]
async fn test_overdue_date_axis_dominates_due_soon_mileage_axis() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_user(&db, 202).await;
    let car = seed_car(&db, 202, 10_000).await;
    seed_log(&db, car.id, 16_500).await;
    let item = seed_service_item(&db, car.id, "oil change", 12_000).await;
    operations::create_reminder(
        &db,
        ReminderCreate {
            car_id: car.id,
            service_item_id: item.id,
            is_active: true,
            interval_mileage: Some(5000),
            interval_days: Some(30),
            warning_mileage_before: Some(1000),
            warning_days_before: None,
            comment: None,
        },
    )
    .await
    .expect("Failed to create reminder");

    // Mileage sits in its warning window, but the date axis is already past
    // due (2024-01-31): overdue wins.
    let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap();
    let report = operations::reminder_statuses_for_car(&db, car.id, now)
        .await
        .expect("Failed to evaluate reminders");
    assert_eq!(report[0].status, ReminderStatus::Overdue);
}

#[tokio::test]
async fn test_inactive_rules_are_excluded_from_the_report() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_user(&db, 203).await;
    let car = seed_car(&db, 203, 10_000).await;
    let item = seed_service_item(&db, car.id, "oil change", 12_000).await;
    let reminder = operations::create_reminder(&db, mileage_rule(car.id, item.id))
        .await
        .expect("Failed to create reminder");

    let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    assert_eq!(
        operations::reminder_statuses_for_car(&db, car.id, now)
            .await
            .expect("Failed to evaluate reminders")
            .len(),
        1
    );

    operations::deactivate_reminder(&db, reminder.id)
        .await
        .expect("Failed to deactivate reminder");
    assert!(
        operations::reminder_statuses_for_car(&db, car.id, now)
            .await
            .expect("Failed to evaluate reminders")
            .is_empty()
    );
}

#[tokio::test]
async fn test_repeated_evaluation_yields_the_same_report() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    seed_user(&db, 204).await;
    let car = seed_car(&db, 204, 10_000).await;
    seed_log(&db, car.id, 16_200).await;
    let item = seed_service_item(&db, car.id, "oil change", 12_000).await;
    operations::create_reminder(&db, mileage_rule(car.id, item.id))
        .await
        .expect("Failed to create reminder");

    let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let first = operations::reminder_statuses_for_car(&db, car.id, now)
        .await
        .expect("Failed to evaluate reminders");
    for _ in 0..3 {
        let again = operations::reminder_statuses_for_car(&db, car.id, now)
            .await
            .expect("Failed to evaluate reminders");
        assert_eq!(again, first);
    }
}

#[test]
fn test_status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&ReminderStatus::DueSoon).expect("serialize failed"),
        "\"due_soon\""
    );
    assert_eq!(
        serde_json::to_string(&ReminderStatus::Overdue).expect("serialize failed"),
        "\"overdue\""
    );
}

#[tokio::test]
async fn test_report_for_unknown_car_is_not_found() {
    let db = setup_test_db().await.expect("Failed to setup test database");
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let err = operations::reminder_statuses_for_car(&db, uuid::Uuid::new_v4(), now)
        .await
        .expect_err("Expected missing car to fail");
    assert!(matches!(err, carminder::ApiError::NotFound { .. }));
}
