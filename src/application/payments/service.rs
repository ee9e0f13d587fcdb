//! Payment use-cases
//!
//! Tenants pay security deposits and rent through MPesa or a bank card.
//! Every payment starts `pending`; staff settle it with
//! [`PaymentService::update_status`]. Completing a deposit payment marks
//! the deposit paid and confirms the tenant's reservation.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::gateway::PaymentGateway;
use crate::application::reservations::ReservationService;
use crate::application::{access, Actor};
use crate::domain::payment::{
    BankCardDetails, CardType, MpesaDetails, MpesaStatus, MpesaTransactionType,
    PaymentFilter, PaymentMethodDetails, PaymentSummary,
};
use crate::domain::{
    DomainError, DomainResult, Payment, PaymentMethod, PaymentStatus, PaymentType, Property,
    RentalUnit, RepositoryProvider, SecurityDeposit, UserRole,
};
use crate::shared::{
    card_last4, deposit_for_rent, validate_card_expiry, validate_mpesa_phone, PaginatedResult,
};

pub const PAYMENTS_PAGE_SIZE: u32 = 20;
const RECENT_PAYMENTS: u32 = 5;
const MAX_RENT_MONTHS: i32 = 6;

#[derive(Debug, Clone)]
pub struct CardInput {
    pub card_number: String,
    pub card_type: CardType,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: String,
    pub cardholder_name: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_zip: String,
    pub billing_country: String,
}

/// How the tenant pays
#[derive(Debug, Clone)]
pub enum PaymentMethodInput {
    Mpesa {
        phone_number: String,
        transaction_type: MpesaTransactionType,
    },
    BankCard(CardInput),
}

#[derive(Debug)]
pub struct PaymentDashboard {
    pub units: Vec<RentalUnit>,
    pub deposits: Vec<SecurityDeposit>,
    pub recent_payments: Vec<Payment>,
    pub total_paid: Decimal,
}

#[derive(Debug)]
pub struct PaymentOptions {
    pub units: Vec<RentalUnit>,
    pub deposits: Vec<SecurityDeposit>,
    pub security_deposit_paid: bool,
}

/// A payment with its method record
#[derive(Debug)]
pub struct PaymentView {
    pub payment: Payment,
    pub details: Option<PaymentMethodDetails>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentQuery {
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug)]
pub struct PaymentListing {
    pub payments: PaginatedResult<Payment>,
    pub summary: PaymentSummary,
}

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    reservations: Arc<ReservationService>,
    gateway: Arc<dyn PaymentGateway>,
    /// Serialises status changes so two settlements of one payment cannot
    /// both pass the transition check.
    status_lock: Mutex<()>,
}

impl PaymentService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        reservations: Arc<ReservationService>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            repos,
            reservations,
            gateway,
            status_lock: Mutex::new(()),
        }
    }

    pub async fn dashboard(&self, actor: &Actor) -> DomainResult<PaymentDashboard> {
        actor.require_tenant("Only tenants can access the payment dashboard.")?;

        let units = self.repos.units().list_for_tenant(&actor.user_id).await?;
        let deposits = self.repos.deposits().list_for_tenant(&actor.user_id).await?;
        let own = PaymentFilter {
            tenant_id: Some(actor.user_id.clone()),
            ..Default::default()
        };
        let recent_payments = self
            .repos
            .payments()
            .list(own.clone(), 1, RECENT_PAYMENTS)
            .await?
            .items;
        let total_paid = self.repos.payments().summary(own).await?.total_amount;

        Ok(PaymentDashboard {
            units,
            deposits,
            recent_payments,
            total_paid,
        })
    }

    /// Units the tenant can pay for, with their deposits.
    pub async fn options(&self, actor: &Actor) -> DomainResult<PaymentOptions> {
        actor.require_tenant("Only tenants can make payments.")?;

        let units = self.payable_units(&actor.user_id).await?;
        if units.is_empty() {
            return Err(DomainError::Validation(
                "You don't have any rental units to make payments for.".into(),
            ));
        }

        let mut deposits = Vec::with_capacity(units.len());
        for unit in &units {
            deposits.push(
                self.repos
                    .deposits()
                    .get_or_create(&actor.user_id, unit.id, deposit_for_rent(unit.rent_amount))
                    .await?,
            );
        }
        let security_deposit_paid = deposits.iter().all(|d| d.is_paid);

        Ok(PaymentOptions {
            units,
            deposits,
            security_deposit_paid,
        })
    }

    pub async fn pay_security_deposit(
        &self,
        actor: &Actor,
        unit_id: i32,
        method: PaymentMethodInput,
    ) -> DomainResult<Payment> {
        actor.require_tenant("Only tenants can make payments.")?;

        let unit = self.require_unit(unit_id).await?;
        if !self.holds_unit(&actor.user_id, &unit).await? {
            return Err(DomainError::not_found("RentalUnit", "id", unit_id));
        }

        let deposit = self
            .repos
            .deposits()
            .get_or_create(&actor.user_id, unit_id, deposit_for_rent(unit.rent_amount))
            .await?;
        if deposit.is_paid {
            return Err(DomainError::Conflict(
                "Security deposit has already been paid for this unit.".into(),
            ));
        }

        let payment = Payment::new(
            &actor.user_id,
            unit_id,
            unit.property_id,
            PaymentType::SecurityDeposit,
            method_of(&method),
            deposit.amount,
        );
        self.submit(payment, method).await
    }

    pub async fn pay_rent(
        &self,
        actor: &Actor,
        unit_id: i32,
        months: i32,
        method: PaymentMethodInput,
    ) -> DomainResult<Payment> {
        actor.require_tenant("Only tenants can make payments.")?;

        let unit = self.require_unit(unit_id).await?;
        if !unit.is_rented_by(&actor.user_id) {
            return Err(DomainError::not_found("RentalUnit", "id", unit_id));
        }

        let deposit_paid = self
            .repos
            .deposits()
            .find(&actor.user_id, unit_id)
            .await?
            .is_some_and(|d| d.is_paid);
        if !deposit_paid {
            return Err(DomainError::Validation(
                "Security deposit must be paid before making rent payments.".into(),
            ));
        }
        if !(1..=MAX_RENT_MONTHS).contains(&months) {
            return Err(DomainError::Validation(
                "Rent payments can only cover 1-6 months.".into(),
            ));
        }

        let today = Utc::now().date_naive();
        let mut payment = Payment::new(
            &actor.user_id,
            unit_id,
            unit.property_id,
            PaymentType::Rent,
            method_of(&method),
            unit.rent_amount * Decimal::from(months),
        );
        payment.months_paid_for = Some(months);
        payment.rent_period_start = Some(today);
        payment.rent_period_end = Some(today + Duration::days(30 * i64::from(months)));
        self.submit(payment, method).await
    }

    /// Receipt for a payment the caller made.
    pub async fn payment_success(&self, actor: &Actor, payment_id: &str) -> DomainResult<PaymentView> {
        let payment = self.require_payment(payment_id).await?;
        if payment.tenant_id != actor.user_id {
            return Err(DomainError::not_found("Payment", "payment_id", payment_id));
        }
        let details = self.repos.payments().details(payment_id).await?;
        Ok(PaymentView { payment, details })
    }

    /// Staff ledger, scoped to the properties the actor can see.
    pub async fn view_payments(&self, actor: &Actor, query: PaymentQuery) -> DomainResult<PaymentListing> {
        actor.require_staff("You don't have permission to view payments.")?;

        let tenant_ids = match query.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                Some(self.repos.users().search_user_ids(term).await?)
            }
            _ => None,
        };
        let filter = PaymentFilter {
            tenant_ids,
            property_ids: access::accessible_property_ids(self.repos.as_ref(), actor).await?,
            status: query.status,
            payment_type: query.payment_type,
            ..Default::default()
        };

        let summary = self.repos.payments().summary(filter.clone()).await?;
        let payments = self
            .repos
            .payments()
            .list(filter, query.page.unwrap_or(1).max(1), PAYMENTS_PAGE_SIZE)
            .await?;
        Ok(PaymentListing { payments, summary })
    }

    pub async fn payment_details(&self, actor: &Actor, payment_id: &str) -> DomainResult<PaymentView> {
        actor.require_staff("You don't have permission to view payments.")?;

        let payment = self.require_payment(payment_id).await?;
        let property = self.require_property(payment.property_id).await?;
        if !access::can_access(actor, &property, false) {
            return Err(DomainError::not_found("Payment", "payment_id", payment_id));
        }
        let details = self.repos.payments().details(payment_id).await?;
        Ok(PaymentView { payment, details })
    }

    /// Settle or advance a payment. Completing a deposit payment marks the
    /// deposit paid and confirms the tenant's reservation for the unit.
    pub async fn update_status(
        &self,
        actor: &Actor,
        payment_id: &str,
        status: &str,
    ) -> DomainResult<Payment> {
        actor.require(
            &[UserRole::Admin, UserRole::PropertyManager],
            "You don't have permission to update payment status.",
        )?;

        let _guard = self.status_lock.lock().await;
        let mut payment = self.require_payment(payment_id).await?;
        let property = self.require_property(payment.property_id).await?;
        if !manages(actor, &property) {
            return Err(DomainError::Forbidden(
                "You don't have permission to update payment status.".into(),
            ));
        }

        let next = PaymentStatus::parse(status.trim())
            .ok_or_else(|| DomainError::Validation("Invalid payment status".into()))?;
        let previous = payment.status;
        payment.transition(next)?;

        let settles_deposit =
            next == PaymentStatus::Completed && payment.payment_type == PaymentType::SecurityDeposit;
        if settles_deposit {
            let unit = self.require_unit(payment.unit_id).await?;
            if !self.holds_unit(&payment.tenant_id, &unit).await? {
                return Err(DomainError::Conflict(
                    "The tenant's reservation for this unit has lapsed. \
                     Cancel this payment or have the tenant reserve the unit again."
                        .into(),
                ));
            }
        }
        self.repos.payments().update(payment.clone()).await?;

        if let Some(mut details) = self.repos.payments().details(payment_id).await? {
            details.mark_settled(next);
            self.repos.payments().update_details(details).await?;
        }

        info!(
            payment_id,
            reference = %payment.reference_number,
            from = %previous,
            to = %next,
            updated_by = %actor.user_id,
            "Payment status updated"
        );

        if settles_deposit {
            self.settle_deposit(&payment).await?;
        }
        Ok(payment)
    }

    pub async fn refund_deposit(
        &self,
        actor: &Actor,
        deposit_id: i32,
        amount: Decimal,
    ) -> DomainResult<SecurityDeposit> {
        actor.require(
            &[UserRole::Admin, UserRole::PropertyManager],
            "You don't have permission to refund deposits.",
        )?;

        let mut deposit = self
            .repos
            .deposits()
            .find_by_id(deposit_id)
            .await?
            .ok_or_else(|| DomainError::not_found("SecurityDeposit", "id", deposit_id))?;
        let unit = self.require_unit(deposit.unit_id).await?;
        let property = self.require_property(unit.property_id).await?;
        if !manages(actor, &property) {
            return Err(DomainError::Forbidden(
                "You don't have permission to refund deposits.".into(),
            ));
        }

        deposit.refund(amount)?;
        self.repos.deposits().update(deposit.clone()).await?;
        info!(
            deposit_id,
            tenant_id = %deposit.tenant_id,
            refund = %amount,
            refunded_by = %actor.user_id,
            "Security deposit refunded"
        );
        metrics::counter!("deposits_refunded_total").increment(1);
        Ok(deposit)
    }

    /// The tenant rents the unit or holds its live reservation.
    async fn holds_unit(&self, tenant_id: &str, unit: &RentalUnit) -> DomainResult<bool> {
        if unit.is_rented_by(tenant_id) {
            return Ok(true);
        }
        Ok(self
            .repos
            .reservations()
            .find_live_for_unit(unit.id, Utc::now())
            .await?
            .is_some_and(|r| r.tenant_id == tenant_id))
    }

    async fn settle_deposit(&self, payment: &Payment) -> DomainResult<()> {
        let now = Utc::now();
        let mut deposit = self
            .repos
            .deposits()
            .get_or_create(&payment.tenant_id, payment.unit_id, payment.amount)
            .await?;
        deposit.mark_paid(now);
        self.repos.deposits().update(deposit).await?;

        let confirmed = self
            .reservations
            .confirm_deposit_paid(&payment.tenant_id, payment.unit_id, &payment.reference_number)
            .await?;
        if confirmed.is_none() {
            warn!(
                payment_id = %payment.payment_id,
                unit_id = payment.unit_id,
                "Deposit settled without a live reservation"
            );
        }
        Ok(())
    }

    /// Validate the method, contact the gateway and store the pending
    /// payment with its method record.
    async fn submit(&self, mut payment: Payment, method: PaymentMethodInput) -> DomainResult<Payment> {
        let details = match method {
            PaymentMethodInput::Mpesa {
                phone_number,
                transaction_type,
            } => {
                let phone_number =
                    validate_mpesa_phone(&phone_number).map_err(DomainError::Validation)?;
                let push = self
                    .gateway
                    .stk_push(&phone_number, payment.amount, &payment.reference_number)
                    .await?;
                payment.transaction_id = push.checkout_request_id.clone();
                PaymentMethodDetails::Mpesa(MpesaDetails {
                    payment_id: payment.payment_id.clone(),
                    phone_number,
                    mpesa_receipt_number: None,
                    checkout_request_id: push.checkout_request_id,
                    merchant_request_id: push.merchant_request_id,
                    transaction_type,
                    mpesa_status: MpesaStatus::Pending,
                    initiated_at: Utc::now(),
                    completed_at: None,
                })
            }
            PaymentMethodInput::BankCard(card) => {
                let last4 = card_last4(&card.card_number).map_err(DomainError::Validation)?;
                validate_card_expiry(card.expiry_month, card.expiry_year, Utc::now().date_naive())
                    .map_err(DomainError::Validation)?;
                if card.cardholder_name.trim().is_empty() {
                    return Err(DomainError::Validation("Cardholder name is required".into()));
                }
                let auth = self
                    .gateway
                    .authorize_card(&last4, &card.cvv, payment.amount, &payment.reference_number)
                    .await?;
                payment.transaction_id = auth.authorization_code.clone();
                PaymentMethodDetails::BankCard(BankCardDetails {
                    payment_id: payment.payment_id.clone(),
                    card_last4: last4,
                    card_type: card.card_type,
                    expiry_month: card.expiry_month,
                    expiry_year: card.expiry_year,
                    cardholder_name: card.cardholder_name.trim().to_string(),
                    billing_address: card.billing_address,
                    billing_city: card.billing_city,
                    billing_state: card.billing_state,
                    billing_zip: card.billing_zip,
                    billing_country: if card.billing_country.trim().is_empty() {
                        "Kenya".to_string()
                    } else {
                        card.billing_country
                    },
                    authorization_code: Some(auth.authorization_code),
                    cvv_verified: auth.cvv_verified,
                })
            }
        };

        let payment = self.repos.payments().create(payment, Some(details)).await?;
        info!(
            payment_id = %payment.payment_id,
            reference = %payment.reference_number,
            tenant_id = %payment.tenant_id,
            unit_id = payment.unit_id,
            payment_type = payment.payment_type.as_str(),
            method = payment.payment_method.as_str(),
            amount = %payment.amount,
            "Payment submitted"
        );
        metrics::counter!(
            "payments_submitted_total",
            "type" => payment.payment_type.as_str(),
            "method" => payment.payment_method.as_str()
        )
        .increment(1);
        Ok(payment)
    }

    /// Rented units plus units held by a live reservation.
    async fn payable_units(&self, tenant_id: &str) -> DomainResult<Vec<RentalUnit>> {
        let mut units = self.repos.units().list_for_tenant(tenant_id).await?;
        let now = Utc::now();
        for reservation in self.repos.reservations().find_for_tenant(tenant_id).await? {
            if !reservation.is_live(now) || units.iter().any(|u| u.id == reservation.unit_id) {
                continue;
            }
            if let Some(unit) = self.repos.units().find_by_id(reservation.unit_id).await? {
                units.push(unit);
            }
        }
        Ok(units)
    }

    async fn require_unit(&self, id: i32) -> DomainResult<RentalUnit> {
        self.repos
            .units()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("RentalUnit", "id", id))
    }

    async fn require_property(&self, id: i32) -> DomainResult<Property> {
        self.repos
            .properties()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", "id", id))
    }

    async fn require_payment(&self, payment_id: &str) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "payment_id", payment_id))
    }
}

/// Admins manage everything, property managers their own buildings.
fn manages(actor: &Actor, property: &Property) -> bool {
    match actor.role {
        UserRole::Admin => true,
        UserRole::PropertyManager => property.manager_id.as_deref() == Some(actor.user_id.as_str()),
        _ => false,
    }
}

fn method_of(input: &PaymentMethodInput) -> PaymentMethod {
    match input {
        PaymentMethodInput::Mpesa { .. } => PaymentMethod::Mpesa,
        PaymentMethodInput::BankCard(_) => PaymentMethod::BankCard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::World;
    use crate::domain::ReservationStatus;
    use chrono::{Datelike, NaiveDate};
    use std::str::FromStr;

    fn mpesa() -> PaymentMethodInput {
        PaymentMethodInput::Mpesa {
            phone_number: "254712345678".into(),
            transaction_type: MpesaTransactionType::Paybill,
        }
    }

    fn card(number: &str, year: i32) -> PaymentMethodInput {
        PaymentMethodInput::BankCard(CardInput {
            card_number: number.into(),
            card_type: CardType::Visa,
            expiry_month: 12,
            expiry_year: year,
            cvv: "123".into(),
            cardholder_name: "Wanjiru Kamau".into(),
            billing_address: "Moi Avenue".into(),
            billing_city: "Nairobi".into(),
            billing_state: String::new(),
            billing_zip: "00100".into(),
            billing_country: String::new(),
        })
    }

    fn tomorrow() -> NaiveDate {
        Utc::now().date_naive() + Duration::days(1)
    }

    /// Tenant with a live reservation on a 50,000 unit.
    async fn reserved(w: &World) -> (Actor, Actor, RentalUnit) {
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 50_000).await;
        w.reservations.reserve(&tenant, unit.id, tomorrow(), "").await.unwrap();
        (owner, tenant, unit)
    }

    #[tokio::test]
    async fn deposit_payment_is_pending_with_mpesa_record() {
        let w = World::new();
        let (_, tenant, unit) = reserved(&w).await;

        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();
        assert_eq!(p.status, PaymentStatus::Pending);
        assert_eq!(p.payment_type, PaymentType::SecurityDeposit);
        assert_eq!(p.amount, Decimal::from_str("56500.00").unwrap());
        assert!(p.reference_number.starts_with("PAY-"));

        let receipt = w.payments.payment_success(&tenant, &p.payment_id).await.unwrap();
        let Some(PaymentMethodDetails::Mpesa(m)) = receipt.details else {
            panic!("expected mpesa details");
        };
        assert_eq!(m.mpesa_status, MpesaStatus::Pending);
        assert_eq!(m.checkout_request_id, p.transaction_id);
    }

    #[tokio::test]
    async fn completing_deposit_confirms_reservation() {
        let w = World::new();
        let (_, tenant, unit) = reserved(&w).await;
        let admin = w.user("admin", UserRole::Admin).await;
        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();

        let done = w.payments.update_status(&admin, &p.payment_id, "completed").await.unwrap();
        assert_eq!(done.status, PaymentStatus::Completed);
        assert!(done.processed_date.is_some());

        let deposit = w.repos.deposits().find(&tenant.user_id, unit.id).await.unwrap().unwrap();
        assert!(deposit.is_paid);
        let reservations = w.reservations.list(&tenant, None).await.unwrap();
        assert_eq!(reservations[0].status, ReservationStatus::Confirmed);
        assert_eq!(reservations[0].payment_reference.as_deref(), Some(p.reference_number.as_str()));
        let unit = w.repos.units().find_by_id(unit.id).await.unwrap().unwrap();
        assert!(unit.is_rented_by(&tenant.user_id));

        let Some(PaymentMethodDetails::Mpesa(m)) =
            w.repos.payments().details(&p.payment_id).await.unwrap()
        else {
            panic!("expected mpesa details");
        };
        assert_eq!(m.mpesa_status, MpesaStatus::Success);

        assert!(matches!(
            w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(w.payments.update_status(&admin, &p.payment_id, "failed").await.is_err());
    }

    #[tokio::test]
    async fn completing_deposit_after_hold_lapsed_is_rejected_until_reserved_again() {
        let w = World::new();
        let (_, tenant, unit) = reserved(&w).await;
        let admin = w.user("admin", UserRole::Admin).await;
        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();
        let first = w.reservations.list(&tenant, None).await.unwrap().remove(0);
        w.backdate(first.id).await;

        assert!(matches!(
            w.payments.update_status(&admin, &p.payment_id, "completed").await,
            Err(DomainError::Conflict(_))
        ));
        let stored = w.repos.payments().find_by_id(&p.payment_id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Pending);
        let deposit = w.repos.deposits().find(&tenant.user_id, unit.id).await.unwrap().unwrap();
        assert!(!deposit.is_paid);

        w.reservations.reserve(&tenant, unit.id, tomorrow(), "").await.unwrap();
        let done = w.payments.update_status(&admin, &p.payment_id, "completed").await.unwrap();
        assert_eq!(done.status, PaymentStatus::Completed);

        let reservations = w.reservations.list(&tenant, None).await.unwrap();
        assert!(reservations.iter().any(|r| r.status == ReservationStatus::Confirmed));
        let unit = w.repos.units().find_by_id(unit.id).await.unwrap().unwrap();
        assert!(unit.is_rented_by(&tenant.user_id));
        assert!(!unit.is_available);
    }

    #[tokio::test]
    async fn concurrent_status_updates_settle_once() {
        let w = World::new();
        let (_, tenant, unit) = reserved(&w).await;
        let admin = w.user("admin", UserRole::Admin).await;
        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();

        let (completed, cancelled) = tokio::join!(
            w.payments.update_status(&admin, &p.payment_id, "completed"),
            w.payments.update_status(&admin, &p.payment_id, "cancelled"),
        );
        assert_ne!(completed.is_ok(), cancelled.is_ok());

        let winner = completed.or(cancelled).unwrap();
        let stored = w.repos.payments().find_by_id(&p.payment_id).await.unwrap().unwrap();
        assert_eq!(stored.status, winner.status);
        let deposit = w.repos.deposits().find(&tenant.user_id, unit.id).await.unwrap().unwrap();
        assert_eq!(deposit.is_paid, winner.status == PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn deposit_flow_persists_through_sqlite() {
        let w = World::sqlite().await;
        let (_, tenant, unit) = reserved(&w).await;
        let admin = w.user("admin", UserRole::Admin).await;

        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();
        assert_eq!(p.amount, Decimal::from_str("56500.00").unwrap());
        assert!(matches!(
            w.repos.payments().details(&p.payment_id).await.unwrap(),
            Some(PaymentMethodDetails::Mpesa(_))
        ));

        w.payments.update_status(&admin, &p.payment_id, "completed").await.unwrap();

        let stored = w.repos.payments().find_by_id(&p.payment_id).await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Completed);
        assert!(stored.processed_date.is_some());
        let deposit = w.repos.deposits().find(&tenant.user_id, unit.id).await.unwrap().unwrap();
        assert!(deposit.is_paid && deposit.payment_date.is_some());
        let reservations = w.reservations.list(&tenant, None).await.unwrap();
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0].status, ReservationStatus::Confirmed);
        let unit = w.repos.units().find_by_id(unit.id).await.unwrap().unwrap();
        assert!(unit.is_rented_by(&tenant.user_id));
        assert!(matches!(
            w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn deposit_requires_a_hold_on_the_unit() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;
        assert!(matches!(
            w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            w.payments.pay_security_deposit(&owner, unit.id, mpesa()).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn method_details_are_validated() {
        let w = World::new();
        let (_, tenant, unit) = reserved(&w).await;
        let bad_phone = PaymentMethodInput::Mpesa {
            phone_number: "0712345678".into(),
            transaction_type: MpesaTransactionType::Paybill,
        };
        assert!(matches!(
            w.payments.pay_security_deposit(&tenant, unit.id, bad_phone).await,
            Err(DomainError::Validation(_))
        ));
        let next_year = Utc::now().year() + 1;
        assert!(w
            .payments
            .pay_security_deposit(&tenant, unit.id, card("4242 42", next_year))
            .await
            .is_err());
        assert!(w
            .payments
            .pay_security_deposit(&tenant, unit.id, card("4242424242424242", 2020))
            .await
            .is_err());

        let p = w
            .payments
            .pay_security_deposit(&tenant, unit.id, card("4242 4242 4242 4242", next_year))
            .await
            .unwrap();
        assert_eq!(p.payment_method, PaymentMethod::BankCard);
        let Some(PaymentMethodDetails::BankCard(c)) =
            w.repos.payments().details(&p.payment_id).await.unwrap()
        else {
            panic!("expected card details");
        };
        assert_eq!(c.card_last4, "4242");
        assert_eq!(c.billing_country, "Kenya");
        assert!(c.cvv_verified);
        assert_eq!(c.authorization_code.as_deref(), Some(p.transaction_id.as_str()));
    }

    #[tokio::test]
    async fn rent_needs_paid_deposit_and_valid_months() {
        let w = World::new();
        let (_, tenant, unit) = reserved(&w).await;
        let admin = w.user("admin", UserRole::Admin).await;

        // Not rented yet: only the hold exists.
        assert!(w.payments.pay_rent(&tenant, unit.id, 1, mpesa()).await.is_err());

        let deposit = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();
        w.payments.update_status(&admin, &deposit.payment_id, "completed").await.unwrap();

        for months in [0, 7] {
            assert!(matches!(
                w.payments.pay_rent(&tenant, unit.id, months, mpesa()).await,
                Err(DomainError::Validation(_))
            ));
        }
        let rent = w.payments.pay_rent(&tenant, unit.id, 3, mpesa()).await.unwrap();
        assert_eq!(rent.amount, Decimal::from(150_000));
        assert_eq!(rent.months_paid_for, Some(3));
        let start = rent.rent_period_start.unwrap();
        assert_eq!(start, Utc::now().date_naive());
        assert_eq!(rent.rent_period_end, Some(start + Duration::days(90)));
    }

    #[tokio::test]
    async fn rent_without_deposit_is_rejected() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let mut unit = w.listed_unit(&owner, "A1", 10_000).await;
        unit.assign_tenant(Some(tenant.user_id.clone()));
        w.repos.units().update(unit.clone()).await.unwrap();

        assert!(matches!(
            w.payments.pay_rent(&tenant, unit.id, 1, mpesa()).await,
            Err(DomainError::Validation(m)) if m.contains("Security deposit must be paid")
        ));
    }

    #[tokio::test]
    async fn options_and_dashboard() {
        let w = World::new();
        let tenant = w.user("lonely", UserRole::Tenant).await;
        assert!(matches!(
            w.payments.options(&tenant).await,
            Err(DomainError::Validation(_))
        ));

        let (_, tenant, unit) = reserved(&w).await;
        let options = w.payments.options(&tenant).await.unwrap();
        assert_eq!(options.units.len(), 1);
        assert_eq!(options.units[0].id, unit.id);
        assert!(!options.security_deposit_paid);

        let admin = w.user("admin", UserRole::Admin).await;
        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();
        w.payments.update_status(&admin, &p.payment_id, "completed").await.unwrap();

        let options = w.payments.options(&tenant).await.unwrap();
        assert!(options.security_deposit_paid);

        let dash = w.payments.dashboard(&tenant).await.unwrap();
        assert_eq!(dash.units.len(), 1);
        assert_eq!(dash.recent_payments.len(), 1);
        assert_eq!(dash.total_paid, Decimal::from_str("56500.00").unwrap());
        assert!(w.payments.dashboard(&admin).await.is_err());
    }

    #[tokio::test]
    async fn receipt_belongs_to_payer() {
        let w = World::new();
        let (_, tenant, unit) = reserved(&w).await;
        let other = w.user("other", UserRole::Tenant).await;
        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();
        assert!(matches!(
            w.payments.payment_success(&other, &p.payment_id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn staff_ledger_is_scoped_and_searchable() {
        let w = World::new();
        let (owner, tenant, unit) = reserved(&w).await;
        let other_owner = w.user("other_owner", UserRole::Landlord).await;
        let admin = w.user("admin", UserRole::Admin).await;
        w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();

        let listing = w.payments.view_payments(&owner, PaymentQuery::default()).await.unwrap();
        assert_eq!(listing.payments.total, 1);
        assert_eq!(listing.summary.pending_payments, 1);
        assert_eq!(listing.summary.total_amount, Decimal::ZERO);

        let listing = w
            .payments
            .view_payments(&other_owner, PaymentQuery::default())
            .await
            .unwrap();
        assert_eq!(listing.payments.total, 0);

        let search = |term: &str| PaymentQuery {
            search: Some(term.into()),
            ..Default::default()
        };
        assert_eq!(w.payments.view_payments(&admin, search("TENANT")).await.unwrap().payments.total, 1);
        assert_eq!(w.payments.view_payments(&admin, search("nobody")).await.unwrap().payments.total, 0);

        let by_status = PaymentQuery {
            status: Some(PaymentStatus::Completed),
            ..Default::default()
        };
        assert_eq!(w.payments.view_payments(&admin, by_status).await.unwrap().payments.total, 0);

        assert!(matches!(
            w.payments.view_payments(&tenant, PaymentQuery::default()).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn status_updates_are_restricted() {
        let w = World::new();
        let (owner, tenant, unit) = reserved(&w).await;
        let pm = w.user("pm", UserRole::PropertyManager).await;
        let admin = w.user("admin", UserRole::Admin).await;
        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();

        assert!(matches!(
            w.payments.update_status(&owner, &p.payment_id, "completed").await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            w.payments.update_status(&pm, &p.payment_id, "completed").await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            w.payments.update_status(&admin, &p.payment_id, "refunded").await,
            Err(DomainError::Validation(m)) if m == "Invalid payment status"
        ));

        w.properties
            .assign_manager(&owner, unit.property_id, Some(pm.user_id.clone()))
            .await
            .unwrap();
        let p = w.payments.update_status(&pm, &p.payment_id, "processing").await.unwrap();
        assert_eq!(p.status, PaymentStatus::Processing);
        let p = w.payments.update_status(&pm, &p.payment_id, "cancelled").await.unwrap();
        assert_eq!(p.status, PaymentStatus::Cancelled);

        let deposit = w.repos.deposits().find(&tenant.user_id, unit.id).await.unwrap().unwrap();
        assert!(!deposit.is_paid);
    }

    #[tokio::test]
    async fn refund_rules() {
        let w = World::new();
        let (owner, tenant, unit) = reserved(&w).await;
        let admin = w.user("admin", UserRole::Admin).await;
        let deposit = w.repos.deposits().find(&tenant.user_id, unit.id).await.unwrap().unwrap();

        assert!(matches!(
            w.payments.refund_deposit(&admin, deposit.id, Decimal::from(100)).await,
            Err(DomainError::Validation(_))
        ));

        let p = w.payments.pay_security_deposit(&tenant, unit.id, mpesa()).await.unwrap();
        w.payments.update_status(&admin, &p.payment_id, "completed").await.unwrap();

        assert!(matches!(
            w.payments.refund_deposit(&owner, deposit.id, Decimal::from(100)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(w
            .payments
            .refund_deposit(&admin, deposit.id, Decimal::from(60_000))
            .await
            .is_err());
        let refunded = w
            .payments
            .refund_deposit(&admin, deposit.id, Decimal::from(50_000))
            .await
            .unwrap();
        assert!(refunded.is_refunded);
        assert_eq!(refunded.refund_amount, Some(Decimal::from(50_000)));
        assert!(matches!(
            w.payments.refund_deposit(&admin, deposit.id, Decimal::from(1)).await,
            Err(DomainError::Conflict(_))
        ));
    }
}
