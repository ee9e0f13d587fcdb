//! Create rental_units table
//!
//! Rent and deposit are stored in cents.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;
use super::m20250101_000002_create_properties::Properties;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RentalUnits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RentalUnits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RentalUnits::PropertyId).integer().not_null())
                    .col(ColumnDef::new(RentalUnits::UnitNumber).string_len(20).not_null())
                    .col(ColumnDef::new(RentalUnits::UnitType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(RentalUnits::RentAmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentalUnits::DepositAmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RentalUnits::FloorArea).integer())
                    .col(ColumnDef::new(RentalUnits::FloorNumber).integer())
                    .col(
                        ColumnDef::new(RentalUnits::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(RentalUnits::CurrentTenantId).string())
                    .col(ColumnDef::new(RentalUnits::LeaseStartDate).date())
                    .col(ColumnDef::new(RentalUnits::LeaseEndDate).date())
                    .col(ColumnDef::new(RentalUnits::Description).text().not_null().default(""))
                    .col(
                        ColumnDef::new(RentalUnits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentalUnits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_units_property")
                            .from(RentalUnits::Table, RentalUnits::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_units_tenant")
                            .from(RentalUnits::Table, RentalUnits::CurrentTenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rental_units_property_number")
                    .table(RentalUnits::Table)
                    .col(RentalUnits::PropertyId)
                    .col(RentalUnits::UnitNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rental_units_tenant")
                    .table(RentalUnits::Table)
                    .col(RentalUnits::CurrentTenantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RentalUnits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RentalUnits {
    Table,
    Id,
    PropertyId,
    UnitNumber,
    UnitType,
    RentAmountCents,
    DepositAmountCents,
    FloorArea,
    FloorNumber,
    IsAvailable,
    CurrentTenantId,
    LeaseStartDate,
    LeaseEndDate,
    Description,
    CreatedAt,
    UpdatedAt,
}
