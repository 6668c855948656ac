use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use carminder::Migrator;
use carminder::models::car::CarCreate;
use carminder::models::mileage_log::MileageLogCreate;
use carminder::models::service_item::ServiceItemCreate;
use carminder::models::user::UserCreate;
use carminder::models::{car, mileage_log, service_item, user};
use carminder::operations;

// Helper function to get database URL from environment or default to SQLite
fn get_test_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

// Cleanup function for persistent databases
async fn cleanup_test_tables(db: &DatabaseConnection) {
    // Drop tables in reverse dependency order to avoid foreign key issues
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS reminders").await;
    let _ = db
        .execute_unprepared("DROP TABLE IF EXISTS service_items")
        .await;
    let _ = db
        .execute_unprepared("DROP TABLE IF EXISTS mileage_logs")
        .await;
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS cars").await;
    let _ = db.execute_unprepared("DROP TABLE IF EXISTS users").await;
    let _ = db
        .execute_unprepared("DROP TABLE IF EXISTS seaql_migrations")
        .await;
}

#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url = get_test_database_url();
    let db = Database::connect(&database_url).await?;

    // For persistent databases, clean up any existing tables
    if !database_url.starts_with("sqlite::memory:") {
        cleanup_test_tables(&db).await;
    }

    Migrator::up(&db, None).await?;
    Ok(db)
}

#[allow(dead_code)]
pub fn service_anchor_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

#[allow(dead_code)]
pub async fn seed_user(db: &DatabaseConnection, tg_id: i64) -> user::Model {
    operations::create_user(
        db,
        UserCreate {
            tg_id,
            name: "Alice".to_string(),
            username: Some("alice".to_string()),
            is_premium: false,
        },
    )
    .await
    .expect("Failed to seed user")
}

#[allow(dead_code)]
pub async fn seed_car(db: &DatabaseConnection, tg_id: i64, first_mileage: i32) -> car::Model {
    operations::create_car(
        db,
        CarCreate {
            user_tg_id: tg_id,
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2020,
            first_mileage,
        },
    )
    .await
    .expect("Failed to seed car")
}

#[allow(dead_code)]
pub async fn seed_log(db: &DatabaseConnection, car_id: Uuid, mileage: i32) -> mileage_log::Model {
    operations::log_mileage(db, MileageLogCreate { car_id, mileage })
        .await
        .expect("Failed to seed mileage log")
}

#[allow(dead_code)]
pub async fn seed_service_item(
    db: &DatabaseConnection,
    car_id: Uuid,
    name: &str,
    last_service_mileage: i32,
) -> service_item::Model {
    operations::create_service_item(
        db,
        ServiceItemCreate {
            car_id,
            name: name.to_string(),
            last_service_date: service_anchor_date(),
            last_service_mileage,
        },
    )
    .await
    .expect("Failed to seed service item")
}
