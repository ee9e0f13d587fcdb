//! Payment, payment-method detail and security deposit entities

use chrono::{DateTime, NaiveDate, Utc};
use rand::RngCore;
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};
use crate::shared::money::format_kes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    Rent,
    SecurityDeposit,
    Other,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::SecurityDeposit => "security_deposit",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rent" => Some(Self::Rent),
            "security_deposit" => Some(Self::SecurityDeposit),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Mpesa,
    BankCard,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mpesa => "mpesa",
            Self::BankCard => "bank_card",
            Self::BankTransfer => "bank_transfer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mpesa" => Some(Self::Mpesa),
            "bank_card" => Some(Self::BankCard),
            "bank_transfer" => Some(Self::BankTransfer),
            _ => None,
        }
    }
}

/// Payment lifecycle.
///
/// ```text
/// pending ──► processing ──► completed | failed | cancelled
///    └──────────────────────► completed | failed | cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Processing) => true,
            (Self::Pending | Self::Processing, n) => n.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rent, deposit or other charge paid by a tenant
#[derive(Debug, Clone)]
pub struct Payment {
    /// UUID
    pub payment_id: String,
    /// `PAY-XXXXXXXX`
    pub reference_number: String,
    pub tenant_id: String,
    pub unit_id: i32,
    pub property_id: i32,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    pub months_paid_for: Option<i32>,
    pub rent_period_start: Option<NaiveDate>,
    pub rent_period_end: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
    pub processed_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: impl Into<String>,
        unit_id: i32,
        property_id: i32,
        payment_type: PaymentType,
        payment_method: PaymentMethod,
        amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            payment_id: uuid::Uuid::new_v4().to_string(),
            reference_number: generate_reference(),
            tenant_id: tenant_id.into(),
            unit_id,
            property_id,
            payment_type,
            payment_method,
            amount,
            months_paid_for: None,
            rent_period_start: None,
            rent_period_end: None,
            status: PaymentStatus::Pending,
            transaction_id: String::new(),
            payment_date: now,
            processed_date: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, stamping `processed_date` on completion.
    pub fn transition(&mut self, next: PaymentStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::Validation(format!(
                "Cannot change payment status from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        let now = Utc::now();
        if next == PaymentStatus::Completed {
            self.processed_date = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn amount_display(&self) -> String {
        format_kes(self.amount)
    }

    pub fn rent_period_display(&self) -> String {
        match (self.rent_period_start, self.rent_period_end) {
            (Some(start), Some(end)) => {
                format!("{} - {}", start.format("%b %Y"), end.format("%b %Y"))
            }
            _ => "Not specified".to_string(),
        }
    }
}

/// `PAY-` followed by eight upper-case hex characters.
pub fn generate_reference() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("PAY-{}", hex::encode_upper(bytes))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    Visa,
    Mastercard,
    Amex,
    Discover,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" => Some(Self::Mastercard),
            "amex" => Some(Self::Amex),
            "discover" => Some(Self::Discover),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MpesaTransactionType {
    #[default]
    Paybill,
    BuyGoods,
    SendMoney,
}

impl MpesaTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paybill => "paybill",
            Self::BuyGoods => "buygoods",
            Self::SendMoney => "sendmoney",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paybill" => Some(Self::Paybill),
            "buygoods" => Some(Self::BuyGoods),
            "sendmoney" => Some(Self::SendMoney),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MpesaStatus {
    #[default]
    Pending,
    Success,
    Failed,
    Timeout,
}

impl MpesaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Timeout => "timeout",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MpesaDetails {
    pub payment_id: String,
    /// `2547XXXXXXXX`
    pub phone_number: String,
    pub mpesa_receipt_number: Option<String>,
    pub checkout_request_id: String,
    pub merchant_request_id: String,
    pub transaction_type: MpesaTransactionType,
    pub mpesa_status: MpesaStatus,
    pub initiated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct BankCardDetails {
    pub payment_id: String,
    /// Only the last four digits are ever stored.
    pub card_last4: String,
    pub card_type: CardType,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cardholder_name: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_zip: String,
    pub billing_country: String,
    pub authorization_code: Option<String>,
    pub cvv_verified: bool,
}

/// Method-specific record stored alongside a payment
#[derive(Debug, Clone)]
pub enum PaymentMethodDetails {
    Mpesa(MpesaDetails),
    BankCard(BankCardDetails),
}

impl PaymentMethodDetails {
    pub fn payment_id(&self) -> &str {
        match self {
            Self::Mpesa(m) => &m.payment_id,
            Self::BankCard(c) => &c.payment_id,
        }
    }

    /// Reflect a settled payment on the method record.
    pub fn mark_settled(&mut self, status: PaymentStatus) {
        if let Self::Mpesa(m) = self {
            m.mpesa_status = match status {
                PaymentStatus::Completed => MpesaStatus::Success,
                PaymentStatus::Failed | PaymentStatus::Cancelled => MpesaStatus::Failed,
                _ => m.mpesa_status,
            };
            if status.is_terminal() {
                m.completed_at = Some(Utc::now());
            }
            if status == PaymentStatus::Completed && m.mpesa_receipt_number.is_none() {
                m.mpesa_receipt_number = Some(m.checkout_request_id.clone());
            }
        }
    }
}

/// Refundable deposit a tenant owes per unit
#[derive(Debug, Clone)]
pub struct SecurityDeposit {
    pub id: i32,
    pub tenant_id: String,
    pub unit_id: i32,
    pub amount: Decimal,
    pub is_paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub is_refunded: bool,
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SecurityDeposit {
    pub fn new(tenant_id: impl Into<String>, unit_id: i32, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            tenant_id: tenant_id.into(),
            unit_id,
            amount,
            is_paid: false,
            payment_date: None,
            is_refunded: false,
            refund_date: None,
            refund_amount: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_paid(&mut self, at: DateTime<Utc>) {
        self.is_paid = true;
        self.payment_date = Some(at);
        self.updated_at = at;
    }

    pub fn refund(&mut self, amount: Decimal) -> DomainResult<()> {
        if !self.is_paid {
            return Err(DomainError::Validation(
                "Cannot refund a deposit that has not been paid".into(),
            ));
        }
        if self.is_refunded {
            return Err(DomainError::Conflict(
                "Security deposit has already been refunded".into(),
            ));
        }
        if amount.is_sign_negative() || amount > self.amount {
            return Err(DomainError::Validation(format!(
                "Refund amount must be between 0 and {}",
                self.amount
            )));
        }
        let now = Utc::now();
        self.is_refunded = true;
        self.refund_amount = Some(amount);
        self.refund_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn amount_display(&self) -> String {
        format_kes(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payment() -> Payment {
        Payment::new(
            "tenant",
            1,
            1,
            PaymentType::Rent,
            PaymentMethod::Mpesa,
            Decimal::from(25_000),
        )
    }

    #[test]
    fn reference_format() {
        let r = generate_reference();
        assert_eq!(r.len(), 12);
        assert!(r.starts_with("PAY-"));
        assert!(r[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn new_payment_is_pending() {
        let p = payment();
        assert_eq!(p.status, PaymentStatus::Pending);
        assert!(p.processed_date.is_none());
        assert_eq!(p.amount_display(), "KES 25,000.00");
    }

    #[test]
    fn allowed_transitions() {
        use PaymentStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
        for terminal in [Completed, Failed, Cancelled] {
            for next in [Pending, Processing, Completed, Failed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn completing_stamps_processed_date() {
        let mut p = payment();
        p.transition(PaymentStatus::Processing).unwrap();
        assert!(p.processed_date.is_none());
        p.transition(PaymentStatus::Completed).unwrap();
        assert!(p.processed_date.is_some());
        assert!(p.transition(PaymentStatus::Failed).is_err());
    }

    #[test]
    fn rent_period_display() {
        let mut p = payment();
        assert_eq!(p.rent_period_display(), "Not specified");
        p.rent_period_start = NaiveDate::from_ymd_opt(2025, 1, 10);
        p.rent_period_end = NaiveDate::from_ymd_opt(2025, 3, 11);
        assert_eq!(p.rent_period_display(), "Jan 2025 - Mar 2025");
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_eq!(PaymentStatus::parse("completed"), Some(PaymentStatus::Completed));
        assert_eq!(PaymentStatus::parse("refunded"), None);
    }

    #[test]
    fn mpesa_details_follow_settlement() {
        let mut d = PaymentMethodDetails::Mpesa(MpesaDetails {
            payment_id: "p".into(),
            phone_number: "254712345678".into(),
            mpesa_receipt_number: None,
            checkout_request_id: "ws_CO_1".into(),
            merchant_request_id: "m-1".into(),
            transaction_type: MpesaTransactionType::Paybill,
            mpesa_status: MpesaStatus::Pending,
            initiated_at: Utc::now(),
            completed_at: None,
        });
        d.mark_settled(PaymentStatus::Completed);
        let PaymentMethodDetails::Mpesa(m) = d else {
            panic!("expected mpesa details");
        };
        assert_eq!(m.mpesa_status, MpesaStatus::Success);
        assert!(m.completed_at.is_some());
        assert_eq!(m.mpesa_receipt_number.as_deref(), Some("ws_CO_1"));
    }

    #[test]
    fn deposit_refund_rules() {
        let mut d = SecurityDeposit::new("t", 1, Decimal::from_str("56500.00").unwrap());
        assert!(d.refund(Decimal::from(100)).is_err());
        d.mark_paid(Utc::now());
        assert!(d.refund(Decimal::from(60_000)).is_err());
        d.refund(Decimal::from(50_000)).unwrap();
        assert!(d.is_refunded);
        assert!(matches!(
            d.refund(Decimal::from(1)),
            Err(DomainError::Conflict(_))
        ));
    }
}
