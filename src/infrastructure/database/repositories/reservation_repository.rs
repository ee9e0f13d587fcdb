//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::db_err;
use crate::domain::reservation::{ReservationRepository, ReservationStatus, UnitReservation};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::unit_reservation;

fn model_to_domain(m: unit_reservation::Model) -> UnitReservation {
    UnitReservation {
        id: m.id,
        unit_id: m.unit_id,
        tenant_id: m.tenant_id,
        status: ReservationStatus::parse(&m.status).unwrap_or(ReservationStatus::Cancelled),
        reservation_date: m.reservation_date,
        expires_at: m.expires_at,
        intended_move_in_date: m.intended_move_in_date,
        security_deposit_paid: m.security_deposit_paid,
        payment_reference: m.payment_reference,
        payment_date: m.payment_date,
        notes: m.notes,
        updated_at: m.updated_at,
    }
}

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn save(&self, r: UnitReservation) -> DomainResult<UnitReservation> {
        let model = unit_reservation::ActiveModel {
            unit_id: Set(r.unit_id),
            tenant_id: Set(r.tenant_id),
            status: Set(r.status.as_str().to_string()),
            reservation_date: Set(r.reservation_date),
            expires_at: Set(r.expires_at),
            intended_move_in_date: Set(r.intended_move_in_date),
            security_deposit_paid: Set(r.security_deposit_paid),
            payment_reference: Set(r.payment_reference),
            payment_date: Set(r.payment_date),
            notes: Set(r.notes),
            updated_at: Set(r.updated_at),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UnitReservation>> {
        let model = unit_reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, r: UnitReservation) -> DomainResult<()> {
        let existing = unit_reservation::Entity::find_by_id(r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", r.id))?;

        let mut active: unit_reservation::ActiveModel = existing.into();
        active.status = Set(r.status.as_str().to_string());
        active.expires_at = Set(r.expires_at);
        active.intended_move_in_date = Set(r.intended_move_in_date);
        active.security_deposit_paid = Set(r.security_deposit_paid);
        active.payment_reference = Set(r.payment_reference);
        active.payment_date = Set(r.payment_date);
        active.notes = Set(r.notes);
        active.updated_at = Set(r.updated_at);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_live_for_unit(
        &self,
        unit_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<UnitReservation>> {
        let model = unit_reservation::Entity::find()
            .filter(unit_reservation::Column::UnitId.eq(unit_id))
            .filter(unit_reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .filter(unit_reservation::Column::ExpiresAt.gte(now))
            .order_by_desc(unit_reservation::Column::ReservationDate)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<UnitReservation>> {
        let models = unit_reservation::Entity::find()
            .filter(unit_reservation::Column::TenantId.eq(tenant_id))
            .order_by_desc(unit_reservation::Column::ReservationDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_for_units(&self, unit_ids: &[i32]) -> DomainResult<Vec<UnitReservation>> {
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = unit_reservation::Entity::find()
            .filter(unit_reservation::Column::UnitId.is_in(unit_ids.iter().copied()))
            .order_by_desc(unit_reservation::Column::ReservationDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<UnitReservation>> {
        let models = unit_reservation::Entity::find()
            .order_by_desc(unit_reservation::Column::ReservationDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> DomainResult<Vec<UnitReservation>> {
        let models = unit_reservation::Entity::find()
            .filter(unit_reservation::Column::Status.eq(ReservationStatus::Pending.as_str()))
            .filter(unit_reservation::Column::ExpiresAt.lt(now))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
