use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use super::conflict_or_database;
use crate::errors::ApiError;
use crate::models::service_item::{ServiceItemCreate, ServiceItemUpdate};
use crate::models::{reminder, service_item};
use crate::validation::Validatable;

async fn name_taken(
    db: &DatabaseConnection,
    car_id: Uuid,
    name: &str,
    excluding: Option<Uuid>,
) -> Result<bool, ApiError> {
    let mut query = service_item::Entity::find()
        .filter(service_item::Column::CarId.eq(car_id))
        .filter(service_item::Column::Name.eq(name));
    if let Some(id) = excluding {
        query = query.filter(service_item::Column::Id.ne(id));
    }
    Ok(query.one(db).await.map_err(ApiError::database)?.is_some())
}

/// Create a maintenance item on a car. Names are a business key: unique
/// within the car.
///
/// # Errors
///
/// Validation failure, not-found for an unknown car, conflict on a
/// duplicate name.
pub async fn create_service_item(
    db: &DatabaseConnection,
    payload: ServiceItemCreate,
) -> Result<service_item::Model, ApiError> {
    payload.validate()?;
    super::get_car(db, payload.car_id).await?;

    if name_taken(db, payload.car_id, &payload.name, None).await? {
        return Err(ApiError::conflict(format!(
            "Service item '{}' already exists for this car",
            payload.name
        )));
    }

    let now = Utc::now();
    let active = service_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        car_id: Set(payload.car_id),
        name: Set(payload.name),
        last_service_date: Set(payload.last_service_date),
        last_service_mileage: Set(payload.last_service_mileage),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active
        .insert(db)
        .await
        .map_err(|err| conflict_or_database(err, "Service item name already taken for this car"))
}

/// # Errors
///
/// Not-found for an unknown service item.
pub async fn get_service_item(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<service_item::Model, ApiError> {
    service_item::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("Service item", Some(id.to_string())))
}

/// A car's maintenance items by name.
///
/// # Errors
///
/// Database failure only; an unknown car yields an empty list.
pub async fn list_service_items(
    db: &DatabaseConnection,
    car_id: Uuid,
) -> Result<Vec<service_item::Model>, ApiError> {
    service_item::Entity::find()
        .filter(service_item::Column::CarId.eq(car_id))
        .order_by_asc(service_item::Column::Name)
        .all(db)
        .await
        .map_err(ApiError::database)
}

/// Update an item, typically after a completed service moved its
/// last-service anchor forward.
///
/// # Errors
///
/// Not-found for an unknown item, validation failure, conflict when a
/// rename collides with a sibling item.
pub async fn update_service_item(
    db: &DatabaseConnection,
    id: Uuid,
    payload: ServiceItemUpdate,
) -> Result<service_item::Model, ApiError> {
    payload.validate()?;
    let existing = get_service_item(db, id).await?;

    if let Some(name) = &payload.name {
        if name != &existing.name && name_taken(db, existing.car_id, name, Some(id)).await? {
            return Err(ApiError::conflict(format!(
                "Service item '{name}' already exists for this car"
            )));
        }
    }

    let mut active: service_item::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(date) = payload.last_service_date {
        active.last_service_date = Set(date);
    }
    if let Some(mileage) = payload.last_service_mileage {
        active.last_service_mileage = Set(mileage);
    }
    active.updated_at = Set(Utc::now());

    active
        .update(db)
        .await
        .map_err(|err| conflict_or_database(err, "Service item name already taken for this car"))
}

/// Delete an item together with the reminders attached to it. Other items
/// and the car's mileage history are untouched.
///
/// # Errors
///
/// Not-found for an unknown item.
pub async fn delete_service_item(db: &DatabaseConnection, id: Uuid) -> Result<Uuid, ApiError> {
    get_service_item(db, id).await?;

    let txn = db.begin().await.map_err(ApiError::database)?;

    reminder::Entity::delete_many()
        .filter(reminder::Column::ServiceItemId.eq(id))
        .exec(&txn)
        .await
        .map_err(ApiError::database)?;
    service_item::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(ApiError::database)?;

    txn.commit().await.map_err(ApiError::database)?;
    Ok(id)
}
