use sea_orm_migration::{prelude::*, schema::*};

use super::m20250810_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(string(Booking::Reference).not_null().unique_key())
                    .col(uuid(Booking::UserId).not_null())
                    .col(string(Booking::ItemKind).not_null())
                    // No foreign key on purpose: a travel item may be deleted
                    // by an admin after bookings against it exist.
                    .col(uuid(Booking::ItemId).not_null())
                    .col(integer(Booking::Passengers).not_null())
                    .col(double(Booking::TotalPrice).not_null())
                    .col(string(Booking::Status).not_null())
                    .col(string_null(Booking::TravelClass))
                    .col(string(Booking::ContactFirstName).not_null())
                    .col(string(Booking::ContactLastName).not_null())
                    .col(string(Booking::ContactEmail).not_null())
                    .col(string(Booking::ContactPhone).not_null())
                    .col(string_null(Booking::ContactAddress))
                    .col(string_null(Booking::ContactCity))
                    .col(string_null(Booking::ContactCountry))
                    .col(string_null(Booking::ContactZipCode))
                    .col(string_null(Booking::SpecialRequests))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Booking::Passengers).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_user")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    Reference,
    UserId,
    ItemKind,
    ItemId,
    Passengers,
    TotalPrice,
    Status,
    TravelClass,
    ContactFirstName,
    ContactLastName,
    ContactEmail,
    ContactPhone,
    ContactAddress,
    ContactCity,
    ContactCountry,
    ContactZipCode,
    SpecialRequests,
    CreatedAt,
}
