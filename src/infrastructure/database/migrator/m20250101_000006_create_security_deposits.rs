//! Create security_deposits table
//!
//! One deposit per (tenant, unit).

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
                    .table(SecurityDeposits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecurityDeposits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SecurityDeposits::TenantId).string().not_null())
                    .col(ColumnDef::new(SecurityDeposits::UnitId).integer().not_null())
                    .col(
                        ColumnDef::new(SecurityDeposits::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SecurityDeposits::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SecurityDeposits::PaymentDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(SecurityDeposits::IsRefunded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SecurityDeposits::RefundDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(SecurityDeposits::RefundAmountCents).big_integer())
                    .col(
                        ColumnDef::new(SecurityDeposits::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SecurityDeposits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_security_deposits_tenant")
                            .from(SecurityDeposits::Table, SecurityDeposits::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_security_deposits_unit")
                            .from(SecurityDeposits::Table, SecurityDeposits::UnitId)
                            .to(RentalUnits::Table, RentalUnits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_security_deposits_tenant_unit")
                    .table(SecurityDeposits::Table)
                    .col(SecurityDeposits::TenantId)
                    .col(SecurityDeposits::UnitId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SecurityDeposits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SecurityDeposits {
    Table,
    Id,
    TenantId,
    UnitId,
    AmountCents,
    IsPaid,
    PaymentDate,
    IsRefunded,
    RefundDate,
    RefundAmountCents,
    CreatedAt,
    UpdatedAt,
}
