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
                    .table(MileageLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MileageLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MileageLogs::CarId).uuid().not_null())
                    .col(
                        ColumnDef::new(MileageLogs::Mileage)
                            .integer()
                            .not_null()
                            .check(Expr::col(MileageLogs::Mileage).gte(0)),
                    )
                    .col(
                        ColumnDef::new(MileageLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MileageLogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mileage_logs_car_id_cars")
                            .from(MileageLogs::Table, MileageLogs::CarId)
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
                    .name("ix_mileage_logs_car_created_at")
                    .table(MileageLogs::Table)
                    .col(MileageLogs::CarId)
                    .col(MileageLogs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MileageLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MileageLogs {
    Table,
    Id,
    CarId,
    Mileage,
    CreatedAt,
    UpdatedAt,
}
