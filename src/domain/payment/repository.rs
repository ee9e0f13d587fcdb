//! Payment and security deposit repository interfaces

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::model::{Payment, PaymentMethodDetails, PaymentStatus, PaymentType, SecurityDeposit};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// Filter for staff payment listings. `None` scopes mean "no restriction".
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub tenant_id: Option<String>,
    pub tenant_ids: Option<Vec<String>>,
    pub property_ids: Option<Vec<i32>>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
}

impl PaymentFilter {
    pub fn matches(&self, p: &Payment) -> bool {
        self.tenant_id.as_deref().map_or(true, |t| p.tenant_id == t)
            && self
                .tenant_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&p.tenant_id))
            && self
                .property_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&p.property_id))
            && self.status.map_or(true, |s| p.status == s)
            && self.payment_type.map_or(true, |t| p.payment_type == t)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentSummary {
    pub total_payments: u64,
    /// Sum of completed payments
    pub total_amount: Decimal,
    pub pending_payments: u64,
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert the payment and its method record atomically.
    async fn create(
        &self,
        payment: Payment,
        details: Option<PaymentMethodDetails>,
    ) -> DomainResult<Payment>;
    async fn find_by_id(&self, payment_id: &str) -> DomainResult<Option<Payment>>;
    async fn update(&self, payment: Payment) -> DomainResult<()>;

    /// Newest first.
    async fn list(
        &self,
        filter: PaymentFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<PaginatedResult<Payment>>;
    async fn summary(&self, filter: PaymentFilter) -> DomainResult<PaymentSummary>;

    async fn details(&self, payment_id: &str) -> DomainResult<Option<PaymentMethodDetails>>;
    async fn update_details(&self, details: PaymentMethodDetails) -> DomainResult<()>;
}

#[async_trait]
pub trait DepositRepository: Send + Sync {
    /// Fetch the (tenant, unit) deposit, creating it with `amount` if missing.
    async fn get_or_create(
        &self,
        tenant_id: &str,
        unit_id: i32,
        amount: Decimal,
    ) -> DomainResult<SecurityDeposit>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<SecurityDeposit>>;
    async fn find(&self, tenant_id: &str, unit_id: i32) -> DomainResult<Option<SecurityDeposit>>;
    async fn list_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<SecurityDeposit>>;
    async fn update(&self, deposit: SecurityDeposit) -> DomainResult<()>;
}
