//! Payments, method records and security deposits

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use super::{db_err, unique_or_db_err};
use crate::domain::payment::{
    BankCardDetails, CardType, DepositRepository, MpesaDetails, MpesaStatus,
    MpesaTransactionType, Payment, PaymentFilter, PaymentMethod, PaymentMethodDetails,
    PaymentRepository, PaymentStatus, PaymentSummary, PaymentType, SecurityDeposit,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    bank_card_payment, mpesa_payment, payment, security_deposit,
};
use crate::shared::money::{from_cents, to_cents};
use crate::shared::PaginatedResult;

// ── Conversion helpers ──────────────────────────────────────────

fn payment_model_to_domain(m: payment::Model) -> Payment {
    Payment {
        payment_id: m.payment_id,
        reference_number: m.reference_number,
        tenant_id: m.tenant_id,
        unit_id: m.unit_id,
        property_id: m.property_id,
        payment_type: PaymentType::parse(&m.payment_type).unwrap_or(PaymentType::Other),
        payment_method: PaymentMethod::parse(&m.payment_method)
            .unwrap_or(PaymentMethod::BankTransfer),
        amount: from_cents(m.amount_cents),
        months_paid_for: m.months_paid_for,
        rent_period_start: m.rent_period_start,
        rent_period_end: m.rent_period_end,
        status: PaymentStatus::parse(&m.status).unwrap_or(PaymentStatus::Pending),
        transaction_id: m.transaction_id,
        payment_date: m.payment_date,
        processed_date: m.processed_date,
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn payment_to_active(p: Payment) -> payment::ActiveModel {
    payment::ActiveModel {
        payment_id: Set(p.payment_id),
        reference_number: Set(p.reference_number),
        tenant_id: Set(p.tenant_id),
        unit_id: Set(p.unit_id),
        property_id: Set(p.property_id),
        payment_type: Set(p.payment_type.as_str().to_string()),
        payment_method: Set(p.payment_method.as_str().to_string()),
        amount_cents: Set(to_cents(p.amount)),
        months_paid_for: Set(p.months_paid_for),
        rent_period_start: Set(p.rent_period_start),
        rent_period_end: Set(p.rent_period_end),
        status: Set(p.status.as_str().to_string()),
        transaction_id: Set(p.transaction_id),
        payment_date: Set(p.payment_date),
        processed_date: Set(p.processed_date),
        notes: Set(p.notes),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

fn mpesa_model_to_domain(m: mpesa_payment::Model) -> MpesaDetails {
    MpesaDetails {
        payment_id: m.payment_id,
        phone_number: m.phone_number,
        mpesa_receipt_number: m.mpesa_receipt_number,
        checkout_request_id: m.checkout_request_id,
        merchant_request_id: m.merchant_request_id,
        transaction_type: MpesaTransactionType::parse(&m.transaction_type).unwrap_or_default(),
        mpesa_status: MpesaStatus::parse(&m.mpesa_status).unwrap_or_default(),
        initiated_at: m.initiated_at,
        completed_at: m.completed_at,
    }
}

fn mpesa_to_active(d: MpesaDetails) -> mpesa_payment::ActiveModel {
    mpesa_payment::ActiveModel {
        payment_id: Set(d.payment_id),
        phone_number: Set(d.phone_number),
        mpesa_receipt_number: Set(d.mpesa_receipt_number),
        checkout_request_id: Set(d.checkout_request_id),
        merchant_request_id: Set(d.merchant_request_id),
        transaction_type: Set(d.transaction_type.as_str().to_string()),
        mpesa_status: Set(d.mpesa_status.as_str().to_string()),
        initiated_at: Set(d.initiated_at),
        completed_at: Set(d.completed_at),
    }
}

fn card_model_to_domain(m: bank_card_payment::Model) -> BankCardDetails {
    BankCardDetails {
        payment_id: m.payment_id,
        card_last4: m.card_last4,
        card_type: CardType::parse(&m.card_type).unwrap_or(CardType::Visa),
        expiry_month: m.expiry_month.clamp(1, 12) as u32,
        expiry_year: m.expiry_year,
        cardholder_name: m.cardholder_name,
        billing_address: m.billing_address,
        billing_city: m.billing_city,
        billing_state: m.billing_state,
        billing_zip: m.billing_zip,
        billing_country: m.billing_country,
        authorization_code: m.authorization_code,
        cvv_verified: m.cvv_verified,
    }
}

fn card_to_active(d: BankCardDetails) -> bank_card_payment::ActiveModel {
    bank_card_payment::ActiveModel {
        payment_id: Set(d.payment_id),
        card_last4: Set(d.card_last4),
        card_type: Set(d.card_type.as_str().to_string()),
        expiry_month: Set(d.expiry_month as i32),
        expiry_year: Set(d.expiry_year),
        cardholder_name: Set(d.cardholder_name),
        billing_address: Set(d.billing_address),
        billing_city: Set(d.billing_city),
        billing_state: Set(d.billing_state),
        billing_zip: Set(d.billing_zip),
        billing_country: Set(d.billing_country),
        authorization_code: Set(d.authorization_code),
        cvv_verified: Set(d.cvv_verified),
    }
}

fn deposit_model_to_domain(m: security_deposit::Model) -> SecurityDeposit {
    SecurityDeposit {
        id: m.id,
        tenant_id: m.tenant_id,
        unit_id: m.unit_id,
        amount: from_cents(m.amount_cents),
        is_paid: m.is_paid,
        payment_date: m.payment_date,
        is_refunded: m.is_refunded,
        refund_date: m.refund_date,
        refund_amount: m.refund_amount_cents.map(from_cents),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn apply_filter(mut query: Select<payment::Entity>, filter: &PaymentFilter) -> Select<payment::Entity> {
    if let Some(ref tenant_id) = filter.tenant_id {
        query = query.filter(payment::Column::TenantId.eq(tenant_id.as_str()));
    }
    if let Some(ref ids) = filter.tenant_ids {
        query = query.filter(payment::Column::TenantId.is_in(ids.iter().map(String::as_str)));
    }
    if let Some(ref ids) = filter.property_ids {
        query = query.filter(payment::Column::PropertyId.is_in(ids.iter().copied()));
    }
    if let Some(status) = filter.status {
        query = query.filter(payment::Column::Status.eq(status.as_str()));
    }
    if let Some(payment_type) = filter.payment_type {
        query = query.filter(payment::Column::PaymentType.eq(payment_type.as_str()));
    }
    query
}

// ── Payments ────────────────────────────────────────────────────

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn create(
        &self,
        p: Payment,
        details: Option<PaymentMethodDetails>,
    ) -> DomainResult<Payment> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = payment_to_active(p)
            .insert(&txn)
            .await
            .map_err(|e| unique_or_db_err(e, "Payment reference already exists"))?;

        match details {
            Some(PaymentMethodDetails::Mpesa(d)) => {
                mpesa_to_active(d).insert(&txn).await.map_err(db_err)?;
            }
            Some(PaymentMethodDetails::BankCard(d)) => {
                card_to_active(d).insert(&txn).await.map_err(db_err)?;
            }
            None => {}
        }

        txn.commit().await.map_err(db_err)?;
        Ok(payment_model_to_domain(model))
    }

    async fn find_by_id(&self, payment_id: &str) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(payment_model_to_domain))
    }

    async fn update(&self, p: Payment) -> DomainResult<()> {
        let exists = payment::Entity::find_by_id(p.payment_id.as_str())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Payment", "payment_id", &p.payment_id));
        }

        let mut active = payment_to_active(p);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(
        &self,
        filter: PaymentFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<PaginatedResult<Payment>> {
        let query = apply_filter(payment::Entity::find(), &filter)
            .order_by_desc(payment::Column::PaymentDate);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset(((page.max(1) - 1) * limit) as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PaginatedResult::new(
            models.into_iter().map(payment_model_to_domain).collect(),
            total,
            page.max(1),
            limit,
        ))
    }

    async fn summary(&self, filter: PaymentFilter) -> DomainResult<PaymentSummary> {
        let rows: Vec<(i64, String)> = apply_filter(payment::Entity::find(), &filter)
            .select_only()
            .column(payment::Column::AmountCents)
            .column(payment::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut summary = PaymentSummary {
            total_payments: rows.len() as u64,
            ..Default::default()
        };
        let mut completed_cents: i64 = 0;
        for (cents, status) in rows {
            match PaymentStatus::parse(&status) {
                Some(PaymentStatus::Completed) => completed_cents += cents,
                Some(PaymentStatus::Pending) => summary.pending_payments += 1,
                _ => {}
            }
        }
        summary.total_amount = from_cents(completed_cents);
        Ok(summary)
    }

    async fn details(&self, payment_id: &str) -> DomainResult<Option<PaymentMethodDetails>> {
        if let Some(m) = mpesa_payment::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        {
            return Ok(Some(PaymentMethodDetails::Mpesa(mpesa_model_to_domain(m))));
        }

        let card = bank_card_payment::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(card.map(|m| PaymentMethodDetails::BankCard(card_model_to_domain(m))))
    }

    async fn update_details(&self, details: PaymentMethodDetails) -> DomainResult<()> {
        match details {
            PaymentMethodDetails::Mpesa(d) => {
                mpesa_to_active(d).update(&self.db).await.map_err(db_err)?;
            }
            PaymentMethodDetails::BankCard(d) => {
                card_to_active(d).update(&self.db).await.map_err(db_err)?;
            }
        }
        Ok(())
    }
}

// ── Security deposits ───────────────────────────────────────────

pub struct SeaOrmDepositRepository {
    db: DatabaseConnection,
}

impl SeaOrmDepositRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepositRepository for SeaOrmDepositRepository {
    async fn get_or_create(
        &self,
        tenant_id: &str,
        unit_id: i32,
        amount: Decimal,
    ) -> DomainResult<SecurityDeposit> {
        if let Some(existing) = self.find(tenant_id, unit_id).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = security_deposit::ActiveModel {
            tenant_id: Set(tenant_id.to_string()),
            unit_id: Set(unit_id),
            amount_cents: Set(to_cents(amount)),
            is_paid: Set(false),
            payment_date: Set(None),
            is_refunded: Set(false),
            refund_date: Set(None),
            refund_amount_cents: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_or_db_err(e, "Security deposit already exists"))?;

        Ok(deposit_model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<SecurityDeposit>> {
        let model = security_deposit::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(deposit_model_to_domain))
    }

    async fn find(&self, tenant_id: &str, unit_id: i32) -> DomainResult<Option<SecurityDeposit>> {
        let model = security_deposit::Entity::find()
            .filter(security_deposit::Column::TenantId.eq(tenant_id))
            .filter(security_deposit::Column::UnitId.eq(unit_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(deposit_model_to_domain))
    }

    async fn list_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<SecurityDeposit>> {
        let models = security_deposit::Entity::find()
            .filter(security_deposit::Column::TenantId.eq(tenant_id))
            .order_by_asc(security_deposit::Column::UnitId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(deposit_model_to_domain).collect())
    }

    async fn update(&self, d: SecurityDeposit) -> DomainResult<()> {
        let existing = security_deposit::Entity::find_by_id(d.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("SecurityDeposit", "id", d.id))?;

        let mut active: security_deposit::ActiveModel = existing.into();
        active.amount_cents = Set(to_cents(d.amount));
        active.is_paid = Set(d.is_paid);
        active.payment_date = Set(d.payment_date);
        active.is_refunded = Set(d.is_refunded);
        active.refund_date = Set(d.refund_date);
        active.refund_amount_cents = Set(d.refund_amount.map(to_cents));
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
