//! Schema migrations, one table per revision.

use sea_orm_migration::prelude::*;

mod m20251029_000001_create_users_table;
mod m20251029_000002_create_cars_table;
mod m20251029_000003_create_mileage_logs_table;
mod m20251029_000004_create_service_items_table;
mod m20251030_000005_create_reminders_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251029_000001_create_users_table::Migration),
            Box::new(m20251029_000002_create_cars_table::Migration),
            Box::new(m20251029_000003_create_mileage_logs_table::Migration),
            Box::new(m20251029_000004_create_service_items_table::Migration),
            Box::new(m20251030_000005_create_reminders_table::Migration),
        ]
    }
}
