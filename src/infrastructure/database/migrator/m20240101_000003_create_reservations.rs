//! Create reservations table
//!
//! Reservations are never deleted, so both foreign keys restrict deletion
//! of the referenced car or customer.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;
use super::m20240101_000002_create_cars::Cars;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Reservations::CustomerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::CarId).string().not_null())
                    .col(ColumnDef::new(Reservations::StartDate).date().not_null())
                    .col(ColumnDef::new(Reservations::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Reservations::TotalCostCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string_len(20)
                            .not_null()
                            .default("ACTIVE"),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_car")
                            .from(Reservations::Table, Reservations::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_customer")
                            .from(Reservations::Table, Reservations::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_car_status")
                    .table(Reservations::Table)
                    .col(Reservations::CarId)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_customer")
                    .table(Reservations::Table)
                    .col(Reservations::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    CustomerId,
    CarId,
    StartDate,
    EndDate,
    TotalCostCents,
    Status,
    CreatedAt,
    UpdatedAt,
}
