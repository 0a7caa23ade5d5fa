use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TravelItem::Table)
                    .if_not_exists()
                    .col(uuid(TravelItem::Id).primary_key())
                    .col(string(TravelItem::Kind).not_null())
                    .col(string(TravelItem::Origin).not_null())
                    .col(string(TravelItem::Destination).not_null())
                    .col(string_null(TravelItem::Name))
                    .col(string_null(TravelItem::Description))
                    .col(string_null(TravelItem::Carrier))
                    .col(string_null(TravelItem::ServiceNumber))
                    .col(timestamp_with_time_zone(TravelItem::DepartureAt).not_null())
                    .col(timestamp_with_time_zone(TravelItem::ArrivalAt).not_null())
                    .col(double(TravelItem::Price).not_null())
                    .col(integer(TravelItem::Capacity).not_null())
                    .col(integer(TravelItem::MaxCapacity).not_null())
                    .col(boolean(TravelItem::Featured).not_null().default(false))
                    .col(double_null(TravelItem::Rating))
                    .col(string_null(TravelItem::ImageUrl))
                    .col(
                        timestamp_with_time_zone(TravelItem::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(TravelItem::Capacity).gte(0))
                    .check(Expr::col(TravelItem::Capacity).lte(Expr::col(TravelItem::MaxCapacity)))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TravelItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TravelItem {
    Table,
    Id,
    Kind,
    Origin,
    Destination,
    Name,
    Description,
    Carrier,
    ServiceNumber,
    DepartureAt,
    ArrivalAt,
    Price,
    Capacity,
    MaxCapacity,
    Featured,
    Rating,
    ImageUrl,
    CreatedAt,
}
