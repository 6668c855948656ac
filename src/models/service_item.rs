use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::validation::{Validatable, ValidationError, validators};

/// A named maintenance item ("oil change", "brake pads") on one car. The
/// last-service date and mileage anchor every next-due computation for the
/// reminders attached to it. Names are a business key, unique per car.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "service_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub car_id: Uuid,
    pub name: String,
    pub last_service_date: DateTime<Utc>,
    pub last_service_mileage: i32,
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

    #[sea_orm(has_many = "super::reminder::Entity")]
    Reminders,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl Related<super::reminder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reminders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceItemCreate {
    pub car_id: Uuid,
    pub name: String,
    pub last_service_date: DateTime<Utc>,
    pub last_service_mileage: i32,
}

impl Validatable for ServiceItemCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        validators::validate_required("name", &self.name)?;
        validators::validate_range("last_service_mileage", self.last_service_mileage, Some(0), None)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ServiceItemUpdate {
    pub name: Option<String>,
    pub last_service_date: Option<DateTime<Utc>>,
    pub last_service_mileage: Option<i32>,
}

impl Validatable for ServiceItemUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validators::validate_required("name", name)?;
        }
        if let Some(mileage) = self.last_service_mileage {
            validators::validate_range("last_service_mileage", mileage, Some(0), None)?;
        }
        Ok(())
    }
}
