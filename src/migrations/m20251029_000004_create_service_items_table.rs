use sea_orm_migration::prelude::*;

use super::m20251029_000002_create_cars_table::Cars;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceItems::CarId).uuid().not_null())
                    .col(ColumnDef::new(ServiceItems::Name).string().not_null())
                    .col(
                        ColumnDef::new(ServiceItems::LastServiceDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::LastServiceMileage)
                            .integer()
                            .not_null()
                            .check(Expr::col(ServiceItems::LastServiceMileage).gte(0)),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_items_car_id_cars")
                            .from(ServiceItems::Table, ServiceItems::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_service_items_car_name")
                    .table(ServiceItems::Table)
                    .col(ServiceItems::CarId)
                    .col(ServiceItems::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_service_items_car")
                    .table(ServiceItems::Table)
                    .col(ServiceItems::CarId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ServiceItems {
    Table,
    Id,
    CarId,
    Name,
    LastServiceDate,
    LastServiceMileage,
    CreatedAt,
    UpdatedAt,
}
