//! Validated write and read operations over the store.
//!
//! Every write validates its payload before touching the database, checks
//! parents exist (surfaced as not-found rather than silently ignored) and
//! maps uniqueness races to conflicts. Cascading deletes are explicit
//! ordered routines run inside a transaction; they never rely on the store
//! garbage-collecting orphaned rows.

mod cars;
mod mileage_logs;
mod reminders;
mod service_items;
mod users;

pub use cars::{create_car, delete_car, get_car, list_cars_for_user, update_car};
pub use mileage_logs::{list_mileage_logs, log_mileage};
pub use reminders::{
    EvaluatedReminder, activate_reminder, create_reminder, deactivate_reminder, delete_reminder,
    get_reminder, list_reminders_for_car, reminder_statuses_for_car, update_reminder,
};
pub use service_items::{
    create_service_item, delete_service_item, get_service_item, list_service_items,
    update_service_item,
};
pub use users::{create_user, delete_user, get_user, update_user};

use sea_orm::{DbErr, SqlErr};

use crate::errors::ApiError;

/// Map a unique-constraint race to a conflict, anything else to a database
/// error. Pre-checks inside the transaction catch most duplicates; this
/// covers concurrent writers that pass the check simultaneously.
fn conflict_or_database(err: DbErr, message: &str) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::conflict(message),
        _ => ApiError::database(err),
    }
}
