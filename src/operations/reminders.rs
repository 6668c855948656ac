use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use super::conflict_or_database;
use crate::errors::ApiError;
use crate::models::reminder::{ReminderCreate, ReminderUpdate, validate_intervals};
use crate::models::{car, mileage_log, reminder, service_item};
use crate::status::{ReminderStatus, evaluate_at};
use crate::validation::Validatable;
use crate::mileage;

const ACTIVE_RULE_CONFLICT: &str = "Service item already has an active reminder";

async fn active_rule_exists<C: ConnectionTrait>(
    db: &C,
    service_item_id: Uuid,
    excluding: Option<Uuid>,
) -> Result<bool, ApiError> {
    let mut query = reminder::Entity::find()
        .filter(reminder::Column::ServiceItemId.eq(service_item_id))
        .filter(reminder::Column::IsActive.eq(true));
    if let Some(id) = excluding {
        query = query.filter(reminder::Column::Id.ne(id));
    }
    Ok(query.one(db).await.map_err(ApiError::database)?.is_some())
}

async fn get_reminder_on<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<reminder::Model, ApiError> {
    reminder::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("Reminder", Some(id.to_string())))
}

/// Attach a maintenance rule to a service item.
///
/// The referenced car and service item must exist and agree with each
/// other; at most one active rule may exist per service item. The existence
/// check and the insert run in one transaction, and the partial unique
/// index backs the check against concurrent activations.
///
/// # Errors
///
/// Validation failure on the axis invariants, not-found for a missing
/// parent, bad-request when the car does not match the service item's car,
/// conflict on a second active rule.
pub async fn create_reminder(
    db: &DatabaseConnection,
    payload: ReminderCreate,
) -> Result<reminder::Model, ApiError> {
    payload.validate()?;

    let txn = db.begin().await.map_err(ApiError::database)?;

    car::Entity::find_by_id(payload.car_id)
        .one(&txn)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("Car", Some(payload.car_id.to_string())))?;
    let item = service_item::Entity::find_by_id(payload.service_item_id)
        .one(&txn)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| {
            ApiError::not_found("Service item", Some(payload.service_item_id.to_string()))
        })?;

    if item.car_id != payload.car_id {
        return Err(ApiError::bad_request(
            "Reminder car does not match the service item's car",
        ));
    }

    if payload.is_active && active_rule_exists(&txn, payload.service_item_id, None).await? {
        return Err(ApiError::conflict(ACTIVE_RULE_CONFLICT));
    }

    let now = Utc::now();
    let active = reminder::ActiveModel {
        id: Set(Uuid::new_v4()),
        car_id: Set(payload.car_id),
        service_item_id: Set(payload.service_item_id),
        is_active: Set(payload.is_active),
        interval_mileage: Set(payload.interval_mileage),
        interval_days: Set(payload.interval_days),
        warning_mileage_before: Set(payload.warning_mileage_before),
        warning_days_before: Set(payload.warning_days_before),
        comment: Set(payload.comment),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let model = active
        .insert(&txn)
        .await
        .map_err(|err| conflict_or_database(err, ACTIVE_RULE_CONFLICT))?;

    txn.commit().await.map_err(ApiError::database)?;
    Ok(model)
}

/// # Errors
///
/// Not-found for an unknown reminder.
pub async fn get_reminder(db: &DatabaseConnection, id: Uuid) -> Result<reminder::Model, ApiError> {
    get_reminder_on(db, id).await
}

/// A car's reminders, oldest first. Callers filtering for evaluation should
/// restrict to active rules; inactive ones are kept for reactivation.
///
/// # Errors
///
/// Database failure only; an unknown car yields an empty list.
pub async fn list_reminders_for_car(
    db: &DatabaseConnection,
    car_id: Uuid,
) -> Result<Vec<reminder::Model>, ApiError> {
    reminder::Entity::find()
        .filter(reminder::Column::CarId.eq(car_id))
        .order_by_asc(reminder::Column::CreatedAt)
        .all(db)
        .await
        .map_err(ApiError::database)
}

/// Update a rule. The merged state is re-validated, so an update cannot
/// strip the last remaining trigger axis, and flipping a rule active
/// re-checks the one-active-rule invariant.
///
/// # Errors
///
/// Not-found for an unknown reminder, validation failure on the merged
/// axis state, conflict when activation collides with another active rule.
pub async fn update_reminder(
    db: &DatabaseConnection,
    id: Uuid,
    payload: ReminderUpdate,
) -> Result<reminder::Model, ApiError> {
    let txn = db.begin().await.map_err(ApiError::database)?;
    let existing = get_reminder_on(&txn, id).await?;

    let interval_mileage = payload.interval_mileage.unwrap_or(existing.interval_mileage);
    let interval_days = payload.interval_days.unwrap_or(existing.interval_days);
    let warning_mileage_before = payload
        .warning_mileage_before
        .unwrap_or(existing.warning_mileage_before);
    let warning_days_before = payload
        .warning_days_before
        .unwrap_or(existing.warning_days_before);
    validate_intervals(
        interval_mileage,
        interval_days,
        warning_mileage_before,
        warning_days_before,
    )?;

    let is_active = payload.is_active.unwrap_or(existing.is_active);
    if is_active
        && !existing.is_active
        && active_rule_exists(&txn, existing.service_item_id, Some(id)).await?
    {
        return Err(ApiError::conflict(ACTIVE_RULE_CONFLICT));
    }

    let comment = payload.comment.unwrap_or(existing.comment.clone());

    let mut active: reminder::ActiveModel = existing.into();
    active.is_active = Set(is_active);
    active.interval_mileage = Set(interval_mileage);
    active.interval_days = Set(interval_days);
    active.warning_mileage_before = Set(warning_mileage_before);
    active.warning_days_before = Set(warning_days_before);
    active.comment = Set(comment);
    active.updated_at = Set(Utc::now());

    let model = active
        .update(&txn)
        .await
        .map_err(|err| conflict_or_database(err, ACTIVE_RULE_CONFLICT))?;

    txn.commit().await.map_err(ApiError::database)?;
    Ok(model)
}

/// Turn a rule back on. No-op when it is already active.
///
/// # Errors
///
/// Not-found for an unknown reminder, conflict when its service item
/// already has another active rule.
pub async fn activate_reminder(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<reminder::Model, ApiError> {
    let txn = db.begin().await.map_err(ApiError::database)?;
    let existing = get_reminder_on(&txn, id).await?;

    if existing.is_active {
        return Ok(existing);
    }
    if active_rule_exists(&txn, existing.service_item_id, Some(id)).await? {
        return Err(ApiError::conflict(ACTIVE_RULE_CONFLICT));
    }

    let mut active: reminder::ActiveModel = existing.into();
    active.is_active = Set(true);
    active.updated_at = Set(Utc::now());
    let model = active
        .update(&txn)
        .await
        .map_err(|err| conflict_or_database(err, ACTIVE_RULE_CONFLICT))?;

    txn.commit().await.map_err(ApiError::database)?;
    Ok(model)
}

/// Turn a rule off without deleting it.
///
/// # Errors
///
/// Not-found for an unknown reminder.
pub async fn deactivate_reminder(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<reminder::Model, ApiError> {
    let existing = get_reminder_on(db, id).await?;
    if !existing.is_active {
        return Ok(existing);
    }

    let mut active: reminder::ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(ApiError::database)
}

/// # Errors
///
/// Not-found for an unknown reminder.
pub async fn delete_reminder(db: &DatabaseConnection, id: Uuid) -> Result<Uuid, ApiError> {
    get_reminder_on(db, id).await?;
    reminder::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(ApiError::database)?;
    Ok(id)
}

/// An active rule paired with its service item and evaluated status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct EvaluatedReminder {
    pub reminder: reminder::Model,
    pub service_item: service_item::Model,
    pub status: ReminderStatus,
}

/// Evaluate every active rule on a car against one consistent snapshot.
///
/// Car, mileage history, service items and rules are read inside a single
/// transaction, the mileage aggregate is derived once, and the pure
/// evaluator is mapped over the rules. Nothing is cached; calling again
/// re-reads and re-derives.
///
/// # Errors
///
/// Not-found for an unknown car; internal error when a rule references a
/// service item that is missing from the snapshot.
pub async fn reminder_statuses_for_car(
    db: &DatabaseConnection,
    car_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<EvaluatedReminder>, ApiError> {
    let txn = db.begin().await.map_err(ApiError::database)?;

    let car = car::Entity::find_by_id(car_id)
        .one(&txn)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("Car", Some(car_id.to_string())))?;
    let logs = mileage_log::Entity::find()
        .filter(mileage_log::Column::CarId.eq(car_id))
        .all(&txn)
        .await
        .map_err(ApiError::database)?;
    let reminders = reminder::Entity::find()
        .filter(reminder::Column::CarId.eq(car_id))
        .filter(reminder::Column::IsActive.eq(true))
        .order_by_asc(reminder::Column::CreatedAt)
        .all(&txn)
        .await
        .map_err(ApiError::database)?;
    let items: HashMap<Uuid, service_item::Model> = service_item::Entity::find()
        .filter(service_item::Column::CarId.eq(car_id))
        .all(&txn)
        .await
        .map_err(ApiError::database)?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    txn.commit().await.map_err(ApiError::database)?;

    let current_mileage = mileage::current_mileage(&car, &logs);

    reminders
        .into_iter()
        .map(|rule| {
            let item = items.get(&rule.service_item_id).cloned().ok_or_else(|| {
                ApiError::internal(
                    "Reminder references a missing service item",
                    Some(rule.id.to_string()),
                )
            })?;
            let status = evaluate_at(&rule, &item, current_mileage, now);
            Ok(EvaluatedReminder {
                reminder: rule,
                service_item: item,
                status,
            })
        })
        .collect()
}
