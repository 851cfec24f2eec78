//! Create bookings table
//!
//! Stays are half-open date ranges `[check_in, check_out)`. The overlap
//! query filters on `(room_id, status)` and then on the date columns.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_rooms::Rooms;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::RoomId).integer().not_null())
                    .col(ColumnDef::new(Bookings::GuestId).integer())
                    .col(ColumnDef::new(Bookings::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Bookings::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Bookings::Email).string_len(100))
                    .col(ColumnDef::new(Bookings::CheckIn).date().not_null())
                    .col(ColumnDef::new(Bookings::CheckOut).date().not_null())
                    .col(
                        ColumnDef::new(Bookings::Guests)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Bookings::TotalNights).integer().not_null())
                    .col(ColumnDef::new(Bookings::TotalPrice).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::Notes)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_room")
                            .from(Bookings::Table, Bookings::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_room_status")
                    .table(Bookings::Table)
                    .col(Bookings::RoomId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_check_in")
                    .table(Bookings::Table)
                    .col(Bookings::CheckIn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_check_out")
                    .table(Bookings::Table)
                    .col(Bookings::CheckOut)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    RoomId,
    GuestId,
    Name,
    Phone,
    Email,
    CheckIn,
    CheckOut,
    Guests,
    TotalNights,
    TotalPrice,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
