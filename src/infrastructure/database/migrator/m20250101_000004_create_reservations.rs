//! Create reservations table
//!
//! Canonical reservation records. Venue, event and user names are copied in
//! so a reservation can be rendered without joins.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_venues::Venues;
use super::m20250101_000002_create_events::Events;
use super::m20250101_000003_create_users::Users;

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
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("PROGRAMADA"),
                    )
                    .col(ColumnDef::new(Reservations::DatesJson).text().not_null())
                    .col(
                        ColumnDef::new(Reservations::GuestCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::TotalCost).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::Comments)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Reservations::VenueId).string().not_null())
                    .col(ColumnDef::new(Reservations::VenueName).string().not_null())
                    .col(ColumnDef::new(Reservations::EventId).string().not_null())
                    .col(ColumnDef::new(Reservations::EventName).string().not_null())
                    .col(ColumnDef::new(Reservations::UserId).string().not_null())
                    .col(ColumnDef::new(Reservations::UserName).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::ServicesJson)
                            .text()
                            .not_null()
                            .default("[]"),
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
                            .name("fk_reservations_venue")
                            .from(Reservations::Table, Reservations::VenueId)
                            .to(Venues::Table, Venues::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_event")
                            .from(Reservations::Table, Reservations::EventId)
                            .to(Events::Table, Events::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_user")
                            .from(Reservations::Table, Reservations::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_venue")
                    .table(Reservations::Table)
                    .col(Reservations::VenueId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_status")
                    .table(Reservations::Table)
                    .col(Reservations::Status)
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
    Status,
    DatesJson,
    GuestCount,
    TotalCost,
    Comments,
    VenueId,
    VenueName,
    EventId,
    EventName,
    UserId,
    UserName,
    ServicesJson,
    CreatedAt,
    UpdatedAt,
}
