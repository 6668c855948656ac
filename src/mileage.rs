//! Current-mileage derivation.
//!
//! Canonical formula: a car's current mileage is
//! `COALESCE(MAX(mileage_logs.mileage), cars.first_mileage)` over that car's
//! log entries. [`current_mileage`] evaluates the formula in-process over
//! materialized entries; [`current_mileage_expr`] renders the identical
//! formula as a scalar subquery so batch reads can push it down to the
//! store. Integration tests hold the two paths to the same result.
//!
//! The max-over-history definition makes the value insensitive to entry
//! order and tolerant of corrective entries that regress the odometer.

use sea_orm::sea_query::{Expr, Func, Query, SimpleExpr, SubQueryStatement};
use sea_orm::{ConnectionTrait, EntityTrait, QuerySelect};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{car, mileage_log};

/// Current mileage over materialized log entries: the maximum logged value,
/// or the car's `first_mileage` when no entries exist.
#[must_use]
pub fn current_mileage(car: &car::Model, logs: &[mileage_log::Model]) -> i32 {
    logs.iter()
        .map(|log| log.mileage)
        .max()
        .unwrap_or(car.first_mileage)
}

/// The same derivation as a scalar subquery, correlated on `cars.id`.
///
/// Attach with `expr_as` to any select over [`car::Entity`]:
///
/// ```rust,ignore
/// let mileage: Option<i32> = car::Entity::find_by_id(car_id)
///     .select_only()
///     .expr_as(current_mileage_expr(), "current_mileage")
///     .into_tuple()
///     .one(db)
///     .await?;
/// ```
#[must_use]
pub fn current_mileage_expr() -> SimpleExpr {
    let subquery = Query::select()
        .expr(Func::coalesce([
            Expr::col((mileage_log::Entity, mileage_log::Column::Mileage)).max(),
            Expr::col((car::Entity, car::Column::FirstMileage)).into(),
        ]))
        .from(mileage_log::Entity)
        .and_where(
            Expr::col((mileage_log::Entity, mileage_log::Column::CarId))
                .equals((car::Entity, car::Column::Id)),
        )
        .to_owned();

    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(subquery)))
}

/// Store-side evaluation of the derivation for a single car.
///
/// # Errors
///
/// Returns `ApiError::NotFound` when the car does not exist and
/// `ApiError::Database` on query failure.
pub async fn load_current_mileage<C: ConnectionTrait>(
    db: &C,
    car_id: Uuid,
) -> Result<i32, ApiError> {
    car::Entity::find_by_id(car_id)
        .select_only()
        .expr_as(current_mileage_expr(), "current_mileage")
        .into_tuple::<i32>()
        .one(db)
        .await
        .map_err(ApiError::database)?
        .ok_or_else(|| ApiError::not_found("Car", Some(car_id.to_string())))
}
