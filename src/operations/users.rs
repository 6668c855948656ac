use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use super::conflict_or_database;
use crate::errors::ApiError;
use crate::models::{car, mileage_log, reminder, service_item, user};
use crate::models::user::{UserCreate, UserUpdate};
use crate::validation::Validatable;

/// Register a user under the identity issued by the messaging platform.
///
/// # Errors
///
/// Validation failure, or a conflict when the identity is already taken.
pub async fn create_user(
    db: &DatabaseConnection,
    payload: UserCreate,
) -> Result<user::Model, ApiError> {
    payload.validate()?;

    if user::Entity::find_by_id(payload.tg_id)
        .one(db)
        .await
        .map_err(ApiError::database)?
        .is_some()
    {
        return Err(ApiError::conflict(format!(
            "User with tg_id {} already exists",
            payload.tg_id
        )));
    }

    let now = Utc::now();
    let active = user::ActiveModel {
        tg_id: Set(payload.tg_id),
        name: Set(payload.name),
        username: Set(payload.username),
        is_premium: Set(payload.is_premium),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active
        .insert(db)
        .await
        .map_err(|err| conflict_or_database(err, "User already exists"))
}

/// # Errors
///
/// Not-found when no user carries the identity.
pub async fn get_user(db: &DatabaseConnection, tg_id: i64) -> Result<user::Model, ApiError> {
    user::Entity::find_by_id(tg_id)
        .one(db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("User", Some(tg_id.to_string())))
}

/// # Errors
///
/// Not-found for an unknown user, validation failure on the payload.
pub async fn update_user(
    db: &DatabaseConnection,
    tg_id: i64,
    payload: UserUpdate,
) -> Result<user::Model, ApiError> {
    payload.validate()?;
    let existing = get_user(db, tg_id).await?;

    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(username) = payload.username {
        active.username = Set(username);
    }
    if let Some(is_premium) = payload.is_premium {
        active.is_premium = Set(is_premium);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(ApiError::database)
}

/// Delete a user and everything they own: each car with its mileage logs,
/// service items and reminders, children first.
///
/// # Errors
///
/// Not-found for an unknown user.
pub async fn delete_user(db: &DatabaseConnection, tg_id: i64) -> Result<i64, ApiError> {
    get_user(db, tg_id).await?;

    let txn = db.begin().await.map_err(ApiError::database)?;

    let car_ids: Vec<Uuid> = car::Entity::find()
        .filter(car::Column::UserTgId.eq(tg_id))
        .select_only()
        .column(car::Column::Id)
        .into_tuple()
        .all(&txn)
        .await
        .map_err(ApiError::database)?;

    if !car_ids.is_empty() {
        reminder::Entity::delete_many()
            .filter(reminder::Column::CarId.is_in(car_ids.clone()))
            .exec(&txn)
            .await
            .map_err(ApiError::database)?;
        service_item::Entity::delete_many()
            .filter(service_item::Column::CarId.is_in(car_ids.clone()))
            .exec(&txn)
            .await
            .map_err(ApiError::database)?;
        mileage_log::Entity::delete_many()
            .filter(mileage_log::Column::CarId.is_in(car_ids.clone()))
            .exec(&txn)
            .await
            .map_err(ApiError::database)?;
        car::Entity::delete_many()
            .filter(car::Column::Id.is_in(car_ids))
            .exec(&txn)
            .await
            .map_err(ApiError::database)?;
    }

    user::Entity::delete_by_id(tg_id)
        .exec(&txn)
        .await
        .map_err(ApiError::database)?;

    txn.commit().await.map_err(ApiError::database)?;
    Ok(tg_id)
}
