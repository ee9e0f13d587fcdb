//! Reservation repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::UnitReservation;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Save a new reservation and return it with its id
    async fn save(&self, reservation: UnitReservation) -> DomainResult<UnitReservation>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UnitReservation>>;

    async fn update(&self, reservation: UnitReservation) -> DomainResult<()>;

    /// Pending reservation on the unit whose hold has not lapsed at `now`
    async fn find_live_for_unit(
        &self,
        unit_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<UnitReservation>>;

    /// Newest first
    async fn find_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<UnitReservation>>;

    /// Newest first
    async fn find_for_units(&self, unit_ids: &[i32]) -> DomainResult<Vec<UnitReservation>>;

    /// Newest first
    async fn find_all(&self) -> DomainResult<Vec<UnitReservation>>;

    /// Pending reservations with `expires_at < now`
    async fn find_expired(&self, now: DateTime<Utc>) -> DomainResult<Vec<UnitReservation>>;
}
