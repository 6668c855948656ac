use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::mileage_log::MileageLogCreate;
use crate::models::mileage_log;
use crate::validation::Validatable;

/// Append an odometer reading. There is no update counterpart: the history
/// is append-only and corrections are expressed as further entries.
///
/// # Errors
///
/// Validation failure on negative mileage, not-found for an unknown car.
pub async fn log_mileage(
    db: &DatabaseConnection,
    payload: MileageLogCreate,
) -> Result<mileage_log::Model, ApiError> {
    payload.validate()?;
    super::get_car(db, payload.car_id).await?;

    let now = Utc::now();
    let active = mileage_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        car_id: Set(payload.car_id),
        mileage: Set(payload.mileage),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(db).await.map_err(ApiError::database)
}

/// A car's readings in recording order.
///
/// # Errors
///
/// Database failure only; an unknown car yields an empty list.
pub async fn list_mileage_logs(
    db: &DatabaseConnection,
    car_id: Uuid,
) -> Result<Vec<mileage_log::Model>, ApiError> {
    mileage_log::Entity::find()
        .filter(mileage_log::Column::CarId.eq(car_id))
        .order_by_asc(mileage_log::Column::CreatedAt)
        .all(db)
        .await
        .map_err(ApiError::database)
}
