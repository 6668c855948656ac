use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::car::{CarCreate, CarUpdate};
use crate::models::{car, mileage_log, reminder, service_item};
use crate::validation::Validatable;

/// Register a car for an existing user.
///
/// # Errors
///
/// Validation failure (year range, negative baseline mileage, blank
/// brand/model) or not-found when the owner does not exist.
pub async fn create_car(db: &DatabaseConnection, payload: CarCreate) -> Result<car::Model, ApiError> {
    payload.validate()?;
    super::get_user(db, payload.user_tg_id).await?;

    let now = Utc::now();
    let active = car::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_tg_id: Set(payload.user_tg_id),
        brand: Set(payload.brand),
        model: Set(payload.model),
        year: Set(payload.year),
        first_mileage: Set(payload.first_mileage),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(db).await.map_err(ApiError::database)
}

/// # Errors
///
/// Not-found for an unknown car.
pub async fn get_car(db: &DatabaseConnection, id: Uuid) -> Result<car::Model, ApiError> {
    car::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("Car", Some(id.to_string())))
}

/// All cars owned by a user, oldest registration first.
///
/// # Errors
///
/// Database failure only; an unknown user yields an empty list.
pub async fn list_cars_for_user(
    db: &DatabaseConnection,
    tg_id: i64,
) -> Result<Vec<car::Model>, ApiError> {
    car::Entity::find()
        .filter(car::Column::UserTgId.eq(tg_id))
        .order_by_asc(car::Column::CreatedAt)
        .all(db)
        .await
        .map_err(ApiError::database)
}

/// # Errors
///
/// Not-found for an unknown car, validation failure on the payload.
pub async fn update_car(
    db: &DatabaseConnection,
    id: Uuid,
    payload: CarUpdate,
) -> Result<car::Model, ApiError> {
    payload.validate()?;
    let existing = get_car(db, id).await?;

    let mut active: car::ActiveModel = existing.into();
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(model) = payload.model {
        active.model = Set(model);
    }
    if let Some(year) = payload.year {
        active.year = Set(year);
    }
    if let Some(first_mileage) = payload.first_mileage {
        active.first_mileage = Set(first_mileage);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(ApiError::database)
}

/// Delete a car and its owned rows: reminders, service items and mileage
/// logs go first, then the car itself.
///
/// # Errors
///
/// Not-found for an unknown car.
pub async fn delete_car(db: &DatabaseConnection, id: Uuid) -> Result<Uuid, ApiError> {
    get_car(db, id).await?;

    let txn = db.begin().await.map_err(ApiError::database)?;

    reminder::Entity::delete_many()
        .filter(reminder::Column::CarId.eq(id))
        .exec(&txn)
        .await
        .map_err(ApiError::database)?;
    service_item::Entity::delete_many()
        .filter(service_item::Column::CarId.eq(id))
        .exec(&txn)
        .await
        .map_err(ApiError::database)?;
    mileage_log::Entity::delete_many()
        .filter(mileage_log::Column::CarId.eq(id))
        .exec(&txn)
        .await
        .map_err(ApiError::database)?;
    car::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(ApiError::database)?;

    txn.commit().await.map_err(ApiError::database)?;
    Ok(id)
}
