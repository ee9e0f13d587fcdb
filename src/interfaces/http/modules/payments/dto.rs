//! Payment and security deposit DTOs
//!
//! Card numbers and CVVs arrive in requests only; responses carry the last
//! four digits at most.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::payments::{
    CardInput, PaymentDashboard, PaymentListing, PaymentMethodInput, PaymentOptions, PaymentView,
};
use crate::domain::payment::{
    BankCardDetails, CardType, MpesaDetails, MpesaTransactionType, PaymentMethodDetails,
    PaymentSummary,
};
use crate::domain::{Payment, SecurityDeposit};
use crate::interfaces::http::common::PaginatedResponse;
use crate::interfaces::http::modules::properties::UnitDto;
use crate::shared::format_kes;

// ── Requests ────────────────────────────────────────────────

/// Payment channel, selected by `payment_method`
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethodRequest {
    Mpesa {
        /// `2547XXXXXXXX`, 12 digits
        phone_number: String,
        /// `paybill`, `buygoods` or `sendmoney`
        #[serde(default)]
        transaction_type: Option<String>,
    },
    BankCard {
        card_number: String,
        /// `visa`, `mastercard`, `amex` or `discover`
        card_type: String,
        expiry_month: u32,
        expiry_year: i32,
        cvv: String,
        cardholder_name: String,
        #[serde(default)]
        billing_address: String,
        #[serde(default)]
        billing_city: String,
        #[serde(default)]
        billing_state: String,
        #[serde(default)]
        billing_zip: String,
        #[serde(default)]
        billing_country: String,
    },
}

impl PaymentMethodRequest {
    pub fn into_input(self) -> Result<PaymentMethodInput, String> {
        match self {
            Self::Mpesa {
                phone_number,
                transaction_type,
            } => {
                let transaction_type = match transaction_type.as_deref() {
                    None => MpesaTransactionType::default(),
                    Some(t) => MpesaTransactionType::parse(t)
                        .ok_or_else(|| format!("Unknown transaction type '{}'", t))?,
                };
                Ok(PaymentMethodInput::Mpesa {
                    phone_number,
                    transaction_type,
                })
            }
            Self::BankCard {
                card_number,
                card_type,
                expiry_month,
                expiry_year,
                cvv,
                cardholder_name,
                billing_address,
                billing_city,
                billing_state,
                billing_zip,
                billing_country,
            } => {
                let card_type = CardType::parse(&card_type)
                    .ok_or_else(|| format!("Unknown card type '{}'", card_type))?;
                Ok(PaymentMethodInput::BankCard(CardInput {
                    card_number,
                    card_type,
                    expiry_month,
                    expiry_year,
                    cvv,
                    cardholder_name,
                    billing_address,
                    billing_city,
                    billing_state,
                    billing_zip,
                    billing_country,
                }))
            }
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SecurityDepositRequest {
    pub unit_id: i32,
    #[serde(flatten)]
    pub method: PaymentMethodRequest,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RentPaymentRequest {
    pub unit_id: i32,
    #[validate(range(min = 1, max = 12, message = "months must be between 1 and 12"))]
    #[serde(default = "one_month")]
    pub months: i32,
    #[serde(flatten)]
    pub method: PaymentMethodRequest,
}

fn one_month() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    /// `pending`, `processing`, `completed`, `failed` or `cancelled`
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefundDepositRequest {
    #[schema(value_type = String, example = "28250.00")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentsQuery {
    pub status: Option<String>,
    /// `rent`, `security_deposit` or `other`
    pub payment_type: Option<String>,
    /// Matches the tenant username, email or name
    pub search: Option<String>,
    pub page: Option<u32>,
}

// ── Responses ───────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub payment_id: String,
    pub reference_number: String,
    pub tenant_id: String,
    pub unit_id: i32,
    pub property_id: i32,
    pub payment_type: String,
    pub payment_method: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub amount_display: String,
    pub months_paid_for: Option<i32>,
    pub rent_period_start: Option<NaiveDate>,
    pub rent_period_end: Option<NaiveDate>,
    pub rent_period_display: String,
    pub status: String,
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
    pub processed_date: Option<DateTime<Utc>>,
    pub notes: String,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            payment_type: p.payment_type.as_str().to_string(),
            payment_method: p.payment_method.as_str().to_string(),
            status: p.status.as_str().to_string(),
            amount_display: p.amount_display(),
            rent_period_display: p.rent_period_display(),
            payment_id: p.payment_id,
            reference_number: p.reference_number,
            tenant_id: p.tenant_id,
            unit_id: p.unit_id,
            property_id: p.property_id,
            amount: p.amount,
            months_paid_for: p.months_paid_for,
            rent_period_start: p.rent_period_start,
            rent_period_end: p.rent_period_end,
            transaction_id: p.transaction_id,
            payment_date: p.payment_date,
            processed_date: p.processed_date,
            notes: p.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethodDetailsDto {
    Mpesa {
        phone_number: String,
        mpesa_receipt_number: Option<String>,
        checkout_request_id: String,
        merchant_request_id: String,
        transaction_type: String,
        mpesa_status: String,
        initiated_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    },
    BankCard {
        card_last4: String,
        card_type: String,
        expiry_month: u32,
        expiry_year: i32,
        cardholder_name: String,
        billing_city: String,
        billing_country: String,
        authorization_code: Option<String>,
        cvv_verified: bool,
    },
}

impl From<PaymentMethodDetails> for PaymentMethodDetailsDto {
    fn from(d: PaymentMethodDetails) -> Self {
        match d {
            PaymentMethodDetails::Mpesa(MpesaDetails {
                phone_number,
                mpesa_receipt_number,
                checkout_request_id,
                merchant_request_id,
                transaction_type,
                mpesa_status,
                initiated_at,
                completed_at,
                ..
            }) => Self::Mpesa {
                phone_number,
                mpesa_receipt_number,
                checkout_request_id,
                merchant_request_id,
                transaction_type: transaction_type.as_str().to_string(),
                mpesa_status: mpesa_status.as_str().to_string(),
                initiated_at,
                completed_at,
            },
            PaymentMethodDetails::BankCard(BankCardDetails {
                card_last4,
                card_type,
                expiry_month,
                expiry_year,
                cardholder_name,
                billing_city,
                billing_country,
                authorization_code,
                cvv_verified,
                ..
            }) => Self::BankCard {
                card_last4,
                card_type: card_type.as_str().to_string(),
                expiry_month,
                expiry_year,
                cardholder_name,
                billing_city,
                billing_country,
                authorization_code,
                cvv_verified,
            },
        }
    }
}

/// A payment with its M-Pesa or card record
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentViewDto {
    pub payment: PaymentDto,
    pub details: Option<PaymentMethodDetailsDto>,
}

impl From<PaymentView> for PaymentViewDto {
    fn from(v: PaymentView) -> Self {
        Self {
            payment: v.payment.into(),
            details: v.details.map(PaymentMethodDetailsDto::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepositDto {
    pub id: i32,
    pub tenant_id: String,
    pub unit_id: i32,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub amount_display: String,
    pub is_paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub is_refunded: bool,
    pub refund_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>)]
    pub refund_amount: Option<Decimal>,
}

impl From<SecurityDeposit> for DepositDto {
    fn from(d: SecurityDeposit) -> Self {
        Self {
            amount_display: d.amount_display(),
            id: d.id,
            tenant_id: d.tenant_id,
            unit_id: d.unit_id,
            amount: d.amount,
            is_paid: d.is_paid,
            payment_date: d.payment_date,
            is_refunded: d.is_refunded,
            refund_date: d.refund_date,
            refund_amount: d.refund_amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDashboardDto {
    pub units: Vec<UnitDto>,
    pub deposits: Vec<DepositDto>,
    pub recent_payments: Vec<PaymentDto>,
    #[schema(value_type = String)]
    pub total_paid: Decimal,
    pub total_paid_display: String,
}

impl From<PaymentDashboard> for PaymentDashboardDto {
    fn from(d: PaymentDashboard) -> Self {
        Self {
            units: d.units.into_iter().map(UnitDto::from).collect(),
            deposits: d.deposits.into_iter().map(DepositDto::from).collect(),
            recent_payments: d.recent_payments.into_iter().map(PaymentDto::from).collect(),
            total_paid_display: format_kes(d.total_paid),
            total_paid: d.total_paid,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentOptionsDto {
    /// Units the caller can pay for
    pub units: Vec<UnitDto>,
    pub deposits: Vec<DepositDto>,
    pub security_deposit_paid: bool,
}

impl From<PaymentOptions> for PaymentOptionsDto {
    fn from(o: PaymentOptions) -> Self {
        Self {
            units: o.units.into_iter().map(UnitDto::from).collect(),
            deposits: o.deposits.into_iter().map(DepositDto::from).collect(),
            security_deposit_paid: o.security_deposit_paid,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentSummaryDto {
    pub total_payments: u64,
    /// Sum of completed payments
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub pending_payments: u64,
}

impl From<PaymentSummary> for PaymentSummaryDto {
    fn from(s: PaymentSummary) -> Self {
        Self {
            total_payments: s.total_payments,
            total_amount: s.total_amount,
            pending_payments: s.pending_payments,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentListingDto {
    pub payments: PaginatedResponse<PaymentDto>,
    pub summary: PaymentSummaryDto,
}

impl From<PaymentListing> for PaymentListingDto {
    fn from(l: PaymentListing) -> Self {
        Self {
            payments: PaginatedResponse::from_result(l.payments, PaymentDto::from),
            summary: l.summary.into(),
        }
    }
}
