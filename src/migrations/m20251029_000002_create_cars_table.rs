use sea_orm_migration::prelude::*;

use super::m20251029_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cars::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cars::UserTgId).big_integer().not_null())
                    .col(ColumnDef::new(Cars::Brand).string().not_null())
                    .col(ColumnDef::new(Cars::Model).string().not_null())
                    .col(
                        ColumnDef::new(Cars::Year)
                            .integer()
                            .not_null()
                            // The moving current-year upper bound lives in
                            // code-level validation.
                            .check(Expr::col(Cars::Year).gte(1930)),
                    )
                    .col(
                        ColumnDef::new(Cars::FirstMileage)
                            .integer()
                            .not_null()
                            .check(Expr::col(Cars::FirstMileage).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cars::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_user_tg_id_users")
                            .from(Cars::Table, Cars::UserTgId)
                            .to(Users::Table, Users::TgId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_cars_user_tg_id")
                    .table(Cars::Table)
                    .col(Cars::UserTgId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Cars {
    Table,
    Id,
    UserTgId,
    Brand,
    Model,
    Year,
    FirstMileage,
    CreatedAt,
    UpdatedAt,
}
