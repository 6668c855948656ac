use sea_orm::DbBackend;
use sea_orm_migration::prelude::*;

use super::m20251029_000002_create_cars_table::Cars;
use super::m20251029_000004_create_service_items_table::ServiceItems;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        let mut interval_mileage = ColumnDef::new(Reminders::IntervalMileage)
            .integer()
            .to_owned();
        interval_mileage.check(
            Expr::col(Reminders::IntervalMileage)
                .is_null()
                .or(Expr::col(Reminders::IntervalMileage).gt(0)),
        );
        if backend != DbBackend::MySql {
            // MySQL rejects column checks that look at other columns; the
            // operations layer alone enforces the axis invariant there.
            interval_mileage.check(
                Expr::col(Reminders::IntervalMileage)
                    .is_not_null()
                    .or(Expr::col(Reminders::IntervalDays).is_not_null()),
            );
        }

        manager
            .create_table(
                Table::create()
                    .table(Reminders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reminders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reminders::CarId).uuid().not_null())
                    .col(ColumnDef::new(Reminders::ServiceItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(Reminders::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(interval_mileage)
                    .col(
                        ColumnDef::new(Reminders::IntervalDays).integer().check(
                            Expr::col(Reminders::IntervalDays)
                                .is_null()
                                .or(Expr::col(Reminders::IntervalDays).gt(0)),
                        ),
                    )
                    .col(
                        ColumnDef::new(Reminders::WarningMileageBefore)
                            .integer()
                            .check(
                                Expr::col(Reminders::WarningMileageBefore)
                                    .is_null()
                                    .or(Expr::col(Reminders::WarningMileageBefore).gte(0)),
                            ),
                    )
                    .col(
                        ColumnDef::new(Reminders::WarningDaysBefore).integer().check(
                            Expr::col(Reminders::WarningDaysBefore)
                                .is_null()
                                .or(Expr::col(Reminders::WarningDaysBefore).gte(0)),
                        ),
                    )
                    .col(ColumnDef::new(Reminders::Comment).string())
                    .col(
                        ColumnDef::new(Reminders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reminders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reminders_car_id_cars")
                            .from(Reminders::Table, Reminders::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reminders_service_item_id_service_items")
                            .from(Reminders::Table, Reminders::ServiceItemId)
                            .to(ServiceItems::Table, ServiceItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_reminders_car_active")
                    .table(Reminders::Table)
                    .col(Reminders::CarId)
                    .col(Reminders::IsActive)
                    .to_owned(),
            )
            .await?;

        // At most one active reminder per service item. Partial indexes do
        // not exist on MySQL; the transactional check in the operations
        // layer carries the invariant there.
        if backend != DbBackend::MySql {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS ux_reminders_service_item_active \
                     ON reminders (service_item_id) WHERE is_active",
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reminders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Reminders {
    Table,
    Id,
    CarId,
    ServiceItemId,
    IsActive,
    IntervalMileage,
    IntervalDays,
    WarningMileageBefore,
    WarningDaysBefore,
    Comment,
    CreatedAt,
    UpdatedAt,
}
