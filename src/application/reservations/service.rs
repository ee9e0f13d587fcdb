//! Reservation use-cases

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::application::{access, Actor};
use crate::domain::{
    DomainError, DomainResult, RentalUnit, RepositoryProvider, ReservationStatus,
    UnitReservation, UserRole,
};
use crate::shared::deposit_for_rent;

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    hold: Duration,
    /// Serialises the availability check with the insert.
    reserve_lock: Mutex<()>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, hold_hours: i64) -> Self {
        Self {
            repos,
            hold: Duration::hours(hold_hours),
            reserve_lock: Mutex::new(()),
        }
    }

    /// Place a pending hold on an available unit and open the tenant's
    /// security deposit for it.
    pub async fn reserve(
        &self,
        actor: &Actor,
        unit_id: i32,
        intended_move_in_date: NaiveDate,
        notes: &str,
    ) -> DomainResult<UnitReservation> {
        actor.require_tenant("Only tenants can reserve units.")?;

        let now = Utc::now();
        if intended_move_in_date < now.date_naive() {
            return Err(DomainError::Validation(
                "Intended move-in date cannot be in the past".into(),
            ));
        }

        let _guard = self.reserve_lock.lock().await;

        let unit = self.require_unit(unit_id).await?;
        if !unit.is_available {
            return Err(DomainError::Validation(
                "This unit is not available for reservation".into(),
            ));
        }
        let property_active = self
            .repos
            .properties()
            .find_by_id(unit.property_id)
            .await?
            .is_some_and(|p| p.is_active);
        if !property_active {
            return Err(DomainError::Validation(
                "This property is not accepting reservations".into(),
            ));
        }

        if let Some(live) = self.repos.reservations().find_live_for_unit(unit_id, now).await? {
            let message = if live.tenant_id == actor.user_id {
                "You already have an active reservation for this unit"
            } else {
                "This unit is already reserved"
            };
            return Err(DomainError::Conflict(message.into()));
        }

        let reservation = self
            .repos
            .reservations()
            .save(UnitReservation::new(
                unit_id,
                &actor.user_id,
                intended_move_in_date,
                notes.trim(),
                self.hold,
            ))
            .await?;

        let deposit = self
            .repos
            .deposits()
            .get_or_create(&actor.user_id, unit_id, deposit_for_rent(unit.rent_amount))
            .await?;

        info!(
            reservation_id = reservation.id,
            unit_id,
            tenant_id = %actor.user_id,
            expires_at = %reservation.expires_at,
            deposit = %deposit.amount,
            "Unit reserved"
        );
        metrics::counter!("reservations_created_total").increment(1);
        Ok(reservation)
    }

    /// Tenant who holds it, or staff with access to the property.
    pub async fn cancel(&self, actor: &Actor, id: i32) -> DomainResult<UnitReservation> {
        let mut reservation = self.require_reservation(id).await?;
        if !self.can_act_on(actor, &reservation).await? {
            return Err(DomainError::Forbidden(
                "You don't have permission to cancel this reservation.".into(),
            ));
        }

        reservation.cancel(Utc::now())?;
        self.repos.reservations().update(reservation.clone()).await?;
        info!(reservation_id = id, cancelled_by = %actor.user_id, "Reservation cancelled");
        Ok(reservation)
    }

    /// Called when a security-deposit payment completes. Confirms the
    /// tenant's live hold on the unit and hands the unit over.
    pub async fn confirm_deposit_paid(
        &self,
        tenant_id: &str,
        unit_id: i32,
        payment_reference: &str,
    ) -> DomainResult<Option<UnitReservation>> {
        let now = Utc::now();
        let live = self
            .repos
            .reservations()
            .find_live_for_unit(unit_id, now)
            .await?
            .filter(|r| r.tenant_id == tenant_id);
        let Some(mut reservation) = live else {
            return Ok(None);
        };

        reservation.confirm(payment_reference, now)?;
        self.repos.reservations().update(reservation.clone()).await?;

        let mut unit = self.require_unit(unit_id).await?;
        unit.assign_tenant(Some(tenant_id.to_string()));
        unit.lease_start_date = Some(reservation.intended_move_in_date);
        self.repos.units().update(unit).await?;

        info!(
            reservation_id = reservation.id,
            unit_id,
            tenant_id,
            payment_reference,
            "Reservation confirmed, unit assigned"
        );
        Ok(Some(reservation))
    }

    /// Mark every lapsed pending hold as expired. Returns the count.
    pub async fn expire_overdue(&self) -> DomainResult<usize> {
        let now = Utc::now();
        let overdue = self.repos.reservations().find_expired(now).await?;
        let mut expired = 0;
        for mut reservation in overdue {
            if let Err(e) = reservation.expire(now) {
                warn!(reservation_id = reservation.id, error = %e, "Could not expire reservation");
                continue;
            }
            self.repos.reservations().update(reservation.clone()).await?;
            info!(
                reservation_id = reservation.id,
                unit_id = reservation.unit_id,
                "Reservation expired"
            );
            expired += 1;
        }
        metrics::counter!("reservations_expired_total").increment(expired as u64);
        Ok(expired)
    }

    /// Tenants see their own reservations, property managers and landlords
    /// those on accessible properties, admins everything. Lapsed holds are
    /// reported as expired.
    pub async fn list(
        &self,
        actor: &Actor,
        status: Option<ReservationStatus>,
    ) -> DomainResult<Vec<UnitReservation>> {
        let reservations = match actor.role {
            UserRole::Tenant => {
                self.repos
                    .reservations()
                    .find_for_tenant(&actor.user_id)
                    .await?
            }
            UserRole::Admin => self.repos.reservations().find_all().await?,
            UserRole::PropertyManager | UserRole::Landlord => {
                let unit_ids = self.accessible_unit_ids(actor).await?;
                if unit_ids.is_empty() {
                    Vec::new()
                } else {
                    self.repos.reservations().find_for_units(&unit_ids).await?
                }
            }
        };

        let now = Utc::now();
        Ok(reservations
            .into_iter()
            .map(|r| as_seen_at(r, now))
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect())
    }

    pub async fn get(&self, actor: &Actor, id: i32) -> DomainResult<UnitReservation> {
        let reservation = self.require_reservation(id).await?;
        if !self.can_act_on(actor, &reservation).await? {
            return Err(DomainError::not_found("Reservation", "id", id));
        }
        Ok(as_seen_at(reservation, Utc::now()))
    }

    async fn can_act_on(&self, actor: &Actor, reservation: &UnitReservation) -> DomainResult<bool> {
        match actor.role {
            UserRole::Tenant => Ok(reservation.tenant_id == actor.user_id),
            UserRole::Admin => Ok(true),
            UserRole::PropertyManager | UserRole::Landlord => {
                let unit = self.require_unit(reservation.unit_id).await?;
                let property = self.repos.properties().find_by_id(unit.property_id).await?;
                Ok(property.is_some_and(|p| access::can_access(actor, &p, false)))
            }
        }
    }

    async fn accessible_unit_ids(&self, actor: &Actor) -> DomainResult<Vec<i32>> {
        let mut ids = Vec::new();
        for property in access::accessible_properties(self.repos.as_ref(), actor).await? {
            ids.extend(
                self.repos
                    .units()
                    .list_for_property(property.id)
                    .await?
                    .into_iter()
                    .map(|u| u.id),
            );
        }
        Ok(ids)
    }

    async fn require_unit(&self, id: i32) -> DomainResult<RentalUnit> {
        self.repos
            .units()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("RentalUnit", "id", id))
    }

    async fn require_reservation(&self, id: i32) -> DomainResult<UnitReservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }
}

fn as_seen_at(mut reservation: UnitReservation, now: DateTime<Utc>) -> UnitReservation {
    reservation.status = reservation.effective_status(now);
    reservation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::World;
    use std::str::FromStr;

    fn tomorrow() -> NaiveDate {
        Utc::now().date_naive() + Duration::days(1)
    }

    #[tokio::test]
    async fn reserve_creates_pending_hold_and_deposit() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 50_000).await;

        let r = w
            .reservations
            .reserve(&tenant, unit.id, tomorrow(), "Moving from Nakuru")
            .await
            .unwrap();
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.expires_at - r.reservation_date, Duration::hours(24));

        let deposit = w
            .repos
            .deposits()
            .find(&tenant.user_id, unit.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(deposit.amount, rust_decimal::Decimal::from_str("56500.00").unwrap());
        assert!(!deposit.is_paid);
    }

    #[tokio::test]
    async fn only_tenants_reserve() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;
        assert!(matches!(
            w.reservations.reserve(&owner, unit.id, tomorrow(), "").await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn move_in_cannot_be_in_the_past() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        assert!(matches!(
            w.reservations.reserve(&tenant, unit.id, yesterday, "").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn one_live_reservation_per_unit() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let first = w.user("first", UserRole::Tenant).await;
        let second = w.user("second", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;

        let r = w.reservations.reserve(&first, unit.id, tomorrow(), "").await.unwrap();
        assert!(matches!(
            w.reservations.reserve(&first, unit.id, tomorrow(), "").await,
            Err(DomainError::Conflict(m)) if m.contains("already have")
        ));
        assert!(matches!(
            w.reservations.reserve(&second, unit.id, tomorrow(), "").await,
            Err(DomainError::Conflict(_))
        ));

        w.backdate(r.id).await;
        assert!(w.reservations.reserve(&second, unit.id, tomorrow(), "").await.is_ok());
    }

    #[tokio::test]
    async fn cannot_reserve_occupied_or_inactive() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;

        w.properties.set_active(&owner, unit.property_id, false).await.unwrap();
        assert!(w.reservations.reserve(&tenant, unit.id, tomorrow(), "").await.is_err());

        w.properties.set_active(&owner, unit.property_id, true).await.unwrap();
        let mut occupied = unit.clone();
        occupied.assign_tenant(Some(tenant.user_id.clone()));
        w.repos.units().update(occupied).await.unwrap();
        assert!(w.reservations.reserve(&tenant, unit.id, tomorrow(), "").await.is_err());

        assert!(matches!(
            w.reservations.reserve(&tenant, 9_999, tomorrow(), "").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn cancel_permissions_and_state() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let stranger = w.user("stranger", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;
        let r = w.reservations.reserve(&tenant, unit.id, tomorrow(), "").await.unwrap();

        assert!(matches!(
            w.reservations.cancel(&stranger, r.id).await,
            Err(DomainError::Forbidden(_))
        ));
        let cancelled = w.reservations.cancel(&owner, r.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert!(matches!(
            w.reservations.cancel(&tenant, r.id).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn confirm_assigns_unit() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;
        let r = w.reservations.reserve(&tenant, unit.id, tomorrow(), "").await.unwrap();

        let confirmed = w
            .reservations
            .confirm_deposit_paid(&tenant.user_id, unit.id, "PAY-00000001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(confirmed.id, r.id);
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert!(confirmed.security_deposit_paid);

        let unit = w.repos.units().find_by_id(unit.id).await.unwrap().unwrap();
        assert!(unit.is_rented_by(&tenant.user_id));
        assert!(!unit.is_available);
        assert_eq!(unit.lease_start_date, Some(tomorrow()));
    }

    #[tokio::test]
    async fn lapsed_hold_is_not_confirmed() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let unit = w.listed_unit(&owner, "A1", 10_000).await;
        let r = w.reservations.reserve(&tenant, unit.id, tomorrow(), "").await.unwrap();
        w.backdate(r.id).await;

        assert!(w
            .reservations
            .confirm_deposit_paid(&tenant.user_id, unit.id, "PAY-1")
            .await
            .unwrap()
            .is_none());
        let unit = w.repos.units().find_by_id(unit.id).await.unwrap().unwrap();
        assert!(unit.is_available);
    }

    #[tokio::test]
    async fn expire_overdue_marks_lapsed_holds() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let a = w.listed_unit(&owner, "A1", 10_000).await;
        let b = w.listed_unit(&owner, "B1", 10_000).await;
        let lapsed = w.reservations.reserve(&tenant, a.id, tomorrow(), "").await.unwrap();
        let fresh = w.reservations.reserve(&tenant, b.id, tomorrow(), "").await.unwrap();
        w.backdate(lapsed.id).await;

        let seen = w.reservations.get(&tenant, lapsed.id).await.unwrap();
        assert_eq!(seen.status, ReservationStatus::Expired);

        assert_eq!(w.reservations.expire_overdue().await.unwrap(), 1);
        assert_eq!(w.reservations.expire_overdue().await.unwrap(), 0);

        let stored = w.repos.reservations().find_by_id(lapsed.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Expired);
        let stored = w.repos.reservations().find_by_id(fresh.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn list_is_scoped_and_filterable() {
        let w = World::new();
        let owner = w.user("owner", UserRole::Landlord).await;
        let other_owner = w.user("other", UserRole::Landlord).await;
        let admin = w.user("admin", UserRole::Admin).await;
        let tenant = w.user("tenant", UserRole::Tenant).await;
        let a = w.listed_unit(&owner, "A1", 10_000).await;
        let b = w.listed_unit(&other_owner, "B1", 10_000).await;
        w.reservations.reserve(&tenant, a.id, tomorrow(), "").await.unwrap();
        let rb = w.reservations.reserve(&tenant, b.id, tomorrow(), "").await.unwrap();
        w.reservations.cancel(&tenant, rb.id).await.unwrap();

        assert_eq!(w.reservations.list(&tenant, None).await.unwrap().len(), 2);
        assert_eq!(w.reservations.list(&admin, None).await.unwrap().len(), 2);
        let owners = w.reservations.list(&owner, None).await.unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].unit_id, a.id);

        let cancelled = w
            .reservations
            .list(&tenant, Some(ReservationStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, rb.id);

        assert!(w.reservations.get(&owner, rb.id).await.is_err());
    }
}
