//! Create cars table (fleet catalog)

use sea_orm_migration::prelude::*;

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
                    .col(ColumnDef::new(Cars::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cars::Make).string().not_null())
                    .col(ColumnDef::new(Cars::Model).string().not_null())
                    .col(ColumnDef::new(Cars::Year).integer().not_null())
                    .col(ColumnDef::new(Cars::CarType).string())
                    .col(
                        ColumnDef::new(Cars::PricePerDayCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cars::Description).text())
                    .col(
                        ColumnDef::new(Cars::Images)
                            .text()
                            .not_null()
                            .default("[]"),
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
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_price")
                    .table(Cars::Table)
                    .col(Cars::PricePerDayCents)
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

#[derive(Iden)]
pub enum Cars {
    Table,
    Id,
    Make,
    Model,
    Year,
    CarType,
    PricePerDayCents,
    Description,
    Images,
    CreatedAt,
    UpdatedAt,
}
