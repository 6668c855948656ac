use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{Validatable, ValidationError, validators};

/// A maintenance policy attached to one service item. Each of the two
/// trigger axes (distance, time) is optional, but at least one must be
/// configured; a warning threshold without its paired interval is inert.
///
/// `car_id` is redundant with the service item's car and must always agree
/// with it; the operations layer rejects writes where they diverge.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub car_id: Uuid,
    pub service_item_id: Uuid,
    pub is_active: bool,
    pub interval_mileage: Option<i32>,
    pub interval_days: Option<i32>,
    pub warning_mileage_before: Option<i32>,
    pub warning_days_before: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id"
    )]
    Car,

    #[sea_orm(
        belongs_to = "super::service_item::Entity",
        from = "Column::ServiceItemId",
        to = "super::service_item::Column::Id"
    )]
    ServiceItem,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl Related<super::service_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Mileage at which the next service is due, absent without a distance
    /// interval: `last_service_mileage + interval_mileage`.
    #[must_use]
    pub fn next_service_mileage(&self, item: &super::service_item::Model) -> Option<i32> {
        self.interval_mileage
            .map(|interval| item.last_service_mileage + interval)
    }

    /// Date at which the next service is due, absent without a time
    /// interval: `last_service_date + interval_days`.
    #[must_use]
    pub fn next_service_date(&self, item: &super::service_item::Model) -> Option<DateTime<Utc>> {
        self.interval_days
            .map(|days| item.last_service_date + Duration::days(i64::from(days)))
    }
}

/// Shared axis checks for create payloads and merged update state.
///
/// # Errors
///
/// Returns `ValidationError` when neither interval is present, an interval
/// is not positive, or a warning threshold is negative.
pub fn validate_intervals(
    interval_mileage: Option<i32>,
    interval_days: Option<i32>,
    warning_mileage_before: Option<i32>,
    warning_days_before: Option<i32>,
) -> Result<(), ValidationError> {
    if interval_mileage.is_none() && interval_days.is_none() {
        return Err(ValidationError::new(
            "interval_mileage",
            "At least one of interval_mileage or interval_days is required",
        ));
    }
    if let Some(interval) = interval_mileage {
        validators::validate_range("interval_mileage", interval, Some(1), None)?;
    }
    if let Some(interval) = interval_days {
        validators::validate_range("interval_days", interval, Some(1), None)?;
    }
    if let Some(warning) = warning_mileage_before {
        validators::validate_range("warning_mileage_before", warning, Some(0), None)?;
    }
    if let Some(warning) = warning_days_before {
        validators::validate_range("warning_days_before", warning, Some(0), None)?;
    }
    Ok(())
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ReminderCreate {
    pub car_id: Uuid,
    pub service_item_id: Uuid,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub interval_mileage: Option<i32>,
    pub interval_days: Option<i32>,
    pub warning_mileage_before: Option<i32>,
    pub warning_days_before: Option<i32>,
    pub comment: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Validatable for ReminderCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_intervals(
            self.interval_mileage,
            self.interval_days,
            self.warning_mileage_before,
            self.warning_days_before,
        )
    }
}

/// Update payload. Nullable columns use the double-`Option` convention:
/// the outer `Option` distinguishes "field not sent" from "set to NULL".
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReminderUpdate {
    pub is_active: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub interval_mileage: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub interval_days: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub warning_mileage_before: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub warning_days_before: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub comment: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_without_any_interval_rejected() {
        assert!(validate_intervals(None, None, None, None).is_err());
    }

    #[test]
    fn test_single_axis_rules_accepted() {
        assert!(validate_intervals(Some(5000), None, None, None).is_ok());
        assert!(validate_intervals(None, Some(180), None, None).is_ok());
    }

    #[test]
    fn test_non_positive_intervals_rejected() {
        assert!(validate_intervals(Some(0), None, None, None).is_err());
        assert!(validate_intervals(None, Some(-3), None, None).is_err());
    }

    #[test]
    fn test_negative_warnings_rejected() {
        assert!(validate_intervals(Some(5000), None, Some(-1), None).is_err());
        assert!(validate_intervals(None, Some(180), None, Some(-7)).is_err());
        // Zero-width warnings are allowed
        assert!(validate_intervals(Some(5000), Some(180), Some(0), Some(0)).is_ok());
    }

    #[test]
    fn test_next_service_helpers() {
        use chrono::TimeZone;

        let item = super::super::service_item::Model {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            name: "oil change".to_string(),
            last_service_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            last_service_mileage: 12_000,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let reminder = Model {
            id: Uuid::new_v4(),
            car_id: item.car_id,
            service_item_id: item.id,
            is_active: true,
            interval_mileage: Some(5000),
            interval_days: Some(30),
            warning_mileage_before: None,
            warning_days_before: None,
            comment: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(reminder.next_service_mileage(&item), Some(17_000));
        assert_eq!(
            reminder.next_service_date(&item),
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap())
        );

        let mileage_only = Model {
            interval_days: None,
            ..reminder
        };
        assert_eq!(mileage_only.next_service_date(&item), None);
    }
}
