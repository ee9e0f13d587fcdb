//! Create unit_reservations table
//!
//! A reservation holds a unit while the tenant pays the deposit.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;
use super::m20250101_000003_create_rental_units::RentalUnits;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UnitReservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UnitReservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UnitReservations::UnitId).integer().not_null())
                    .col(ColumnDef::new(UnitReservations::TenantId).string().not_null())
                    .col(
                        ColumnDef::new(UnitReservations::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(UnitReservations::ReservationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitReservations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitReservations::IntendedMoveInDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UnitReservations::SecurityDepositPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(UnitReservations::PaymentReference).string_len(100))
                    .col(ColumnDef::new(UnitReservations::PaymentDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(UnitReservations::Notes).text().not_null().default(""))
                    .col(
                        ColumnDef::new(UnitReservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_unit_reservations_unit")
                            .from(UnitReservations::Table, UnitReservations::UnitId)
                            .to(RentalUnits::Table, RentalUnits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_unit_reservations_tenant")
                            .from(UnitReservations::Table, UnitReservations::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_unit_reservations_unit")
                    .table(UnitReservations::Table)
                    .col(UnitReservations::UnitId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_unit_reservations_status")
                    .table(UnitReservations::Table)
                    .col(UnitReservations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_unit_reservations_expiry")
                    .table(UnitReservations::Table)
                    .col(UnitReservations::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UnitReservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UnitReservations {
    Table,
    Id,
    UnitId,
    TenantId,
    Status,
    ReservationDate,
    ExpiresAt,
    IntendedMoveInDate,
    SecurityDepositPaid,
    PaymentReference,
    PaymentDate,
    Notes,
    UpdatedAt,
}
