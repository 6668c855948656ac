use chrono::{DateTime, Datelike, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{Validatable, ValidationError, validators};

/// Oldest model year the bot accepts.
pub const MIN_YEAR: i32 = 1930;

/// A registered vehicle. `first_mileage` is the odometer value at
/// registration time and serves as the baseline while no mileage logs exist.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_tg_id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub first_mileage: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserTgId",
        to = "super::user::Column::TgId"
    )]
    User,

    #[sea_orm(has_many = "super::mileage_log::Entity")]
    MileageLogs,

    #[sea_orm(has_many = "super::service_item::Entity")]
    ServiceItems,

    #[sea_orm(has_many = "super::reminder::Entity")]
    Reminders,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::mileage_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MileageLogs.def()
    }
}

impl Related<super::service_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItems.def()
    }
}

impl Related<super::reminder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reminders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn validate_year(year: i32) -> Result<(), ValidationError> {
    validators::validate_range("year", year, Some(MIN_YEAR), Some(Utc::now().year()))
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct CarCreate {
    pub user_tg_id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub first_mileage: i32,
}

impl Validatable for CarCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        validators::validate_required("brand", &self.brand)?;
        validators::validate_required("model", &self.model)?;
        validate_year(self.year)?;
        validators::validate_range("first_mileage", self.first_mileage, Some(0), None)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CarUpdate {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub first_mileage: Option<i32>,
}

impl Validatable for CarUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(brand) = &self.brand {
            validators::validate_required("brand", brand)?;
        }
        if let Some(model) = &self.model {
            validators::validate_required("model", model)?;
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        if let Some(first_mileage) = self.first_mileage {
            validators::validate_range("first_mileage", first_mileage, Some(0), None)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_payload(year: i32, first_mileage: i32) -> CarCreate {
        CarCreate {
            user_tg_id: 1,
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year,
            first_mileage,
        }
    }

    #[test]
    fn test_year_bounds() {
        assert!(create_payload(1929, 0).validate().is_err());
        assert!(create_payload(MIN_YEAR, 0).validate().is_ok());
        assert!(create_payload(Utc::now().year(), 0).validate().is_ok());
        assert!(create_payload(Utc::now().year() + 1, 0).validate().is_err());
    }

    #[test]
    fn test_negative_first_mileage_rejected() {
        assert!(create_payload(2020, -1).validate().is_err());
        assert!(create_payload(2020, 0).validate().is_ok());
    }

    #[test]
    fn test_blank_brand_rejected() {
        let mut payload = create_payload(2020, 0);
        payload.brand = "  ".to_string();
        assert!(payload.validate().is_err());
    }
}
