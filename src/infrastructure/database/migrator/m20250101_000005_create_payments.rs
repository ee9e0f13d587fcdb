//! Create payments, mpesa_payments and bank_card_payments tables

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
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::PaymentId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::ReferenceNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::TenantId).string().not_null())
                    .col(ColumnDef::new(Payments::UnitId).integer().not_null())
                    .col(ColumnDef::new(Payments::PropertyId).integer().not_null())
                    .col(ColumnDef::new(Payments::PaymentType).string_len(20).not_null())
                    .col(ColumnDef::new(Payments::PaymentMethod).string_len(20).not_null())
                    .col(ColumnDef::new(Payments::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Payments::MonthsPaidFor).integer())
                    .col(ColumnDef::new(Payments::RentPeriodStart).date())
                    .col(ColumnDef::new(Payments::RentPeriodEnd).date())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Payments::TransactionId)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Payments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::ProcessedDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Payments::Notes).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_tenant")
                            .from(Payments::Table, Payments::TenantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_unit")
                            .from(Payments::Table, Payments::UnitId)
                            .to(RentalUnits::Table, RentalUnits::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_tenant")
                    .table(Payments::Table)
                    .col(Payments::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_property")
                    .table(Payments::Table)
                    .col(Payments::PropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_status")
                    .table(Payments::Table)
                    .col(Payments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MpesaPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MpesaPayments::PaymentId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MpesaPayments::PhoneNumber).string_len(15).not_null())
                    .col(ColumnDef::new(MpesaPayments::MpesaReceiptNumber).string_len(20))
                    .col(
                        ColumnDef::new(MpesaPayments::CheckoutRequestId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MpesaPayments::MerchantRequestId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MpesaPayments::TransactionType)
                            .string_len(20)
                            .not_null()
                            .default("paybill"),
                    )
                    .col(
                        ColumnDef::new(MpesaPayments::MpesaStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(MpesaPayments::InitiatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MpesaPayments::CompletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mpesa_payments_payment")
                            .from(MpesaPayments::Table, MpesaPayments::PaymentId)
                            .to(Payments::Table, Payments::PaymentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankCardPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankCardPayments::PaymentId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankCardPayments::CardLast4).string_len(4).not_null())
                    .col(ColumnDef::new(BankCardPayments::CardType).string_len(20).not_null())
                    .col(ColumnDef::new(BankCardPayments::ExpiryMonth).integer().not_null())
                    .col(ColumnDef::new(BankCardPayments::ExpiryYear).integer().not_null())
                    .col(
                        ColumnDef::new(BankCardPayments::CardholderName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BankCardPayments::BillingAddress).text().not_null())
                    .col(
                        ColumnDef::new(BankCardPayments::BillingCity)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankCardPayments::BillingState)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(BankCardPayments::BillingZip)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankCardPayments::BillingCountry)
                            .string_len(100)
                            .not_null()
                            .default("Kenya"),
                    )
                    .col(ColumnDef::new(BankCardPayments::AuthorizationCode).string_len(50))
                    .col(
                        ColumnDef::new(BankCardPayments::CvvVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_card_payments_payment")
                            .from(BankCardPayments::Table, BankCardPayments::PaymentId)
                            .to(Payments::Table, Payments::PaymentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BankCardPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MpesaPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Payments {
    Table,
    PaymentId,
    ReferenceNumber,
    TenantId,
    UnitId,
    PropertyId,
    PaymentType,
    PaymentMethod,
    AmountCents,
    MonthsPaidFor,
    RentPeriodStart,
    RentPeriodEnd,
    Status,
    TransactionId,
    PaymentDate,
    ProcessedDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum MpesaPayments {
    Table,
    PaymentId,
    PhoneNumber,
    MpesaReceiptNumber,
    CheckoutRequestId,
    MerchantRequestId,
    TransactionType,
    MpesaStatus,
    InitiatedAt,
    CompletedAt,
}

#[derive(Iden)]
pub enum BankCardPayments {
    Table,
    PaymentId,
    CardLast4,
    CardType,
    ExpiryMonth,
    ExpiryYear,
    CardholderName,
    BillingAddress,
    BillingCity,
    BillingState,
    BillingZip,
    BillingCountry,
    AuthorizationCode,
    CvvVerified,
}
