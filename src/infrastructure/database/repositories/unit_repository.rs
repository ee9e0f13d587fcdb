//! Rental units

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{db_err, unique_or_db_err};
use crate::domain::property::{RentalUnit, UnitRepository, UnitType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::rental_unit;
use crate::shared::money::{from_cents, to_cents};

fn unit_model_to_domain(model: rental_unit::Model) -> RentalUnit {
    RentalUnit {
        id: model.id,
        property_id: model.property_id,
        unit_number: model.unit_number,
        unit_type: UnitType::parse(&model.unit_type).unwrap_or(UnitType::Studio),
        rent_amount: from_cents(model.rent_amount_cents),
        deposit_amount: from_cents(model.deposit_amount_cents),
        floor_area: model.floor_area,
        floor_number: model.floor_number,
        is_available: model.is_available,
        current_tenant_id: model.current_tenant_id,
        lease_start_date: model.lease_start_date,
        lease_end_date: model.lease_end_date,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn apply(active: &mut rental_unit::ActiveModel, unit: RentalUnit) {
    active.property_id = Set(unit.property_id);
    active.unit_number = Set(unit.unit_number);
    active.unit_type = Set(unit.unit_type.as_str().to_string());
    active.rent_amount_cents = Set(to_cents(unit.rent_amount));
    active.deposit_amount_cents = Set(to_cents(unit.deposit_amount));
    active.floor_area = Set(unit.floor_area);
    active.floor_number = Set(unit.floor_number);
    active.is_available = Set(unit.is_available);
    active.current_tenant_id = Set(unit.current_tenant_id);
    active.lease_start_date = Set(unit.lease_start_date);
    active.lease_end_date = Set(unit.lease_end_date);
    active.description = Set(unit.description);
    active.updated_at = Set(Utc::now());
}

const DUPLICATE_UNIT: &str = "A unit with this number already exists in the property";

pub struct SeaOrmUnitRepository {
    db: DatabaseConnection,
}

impl SeaOrmUnitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitRepository for SeaOrmUnitRepository {
    async fn create(&self, unit: RentalUnit) -> DomainResult<RentalUnit> {
        let mut active = rental_unit::ActiveModel {
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        apply(&mut active, unit);

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| unique_or_db_err(e, DUPLICATE_UNIT))?;

        Ok(unit_model_to_domain(model))
    }

    async fn update(&self, unit: RentalUnit) -> DomainResult<()> {
        let existing = rental_unit::Entity::find_by_id(unit.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("RentalUnit", "id", unit.id))?;

        let mut active: rental_unit::ActiveModel = existing.into();
        apply(&mut active, unit);
        active
            .update(&self.db)
            .await
            .map_err(|e| unique_or_db_err(e, DUPLICATE_UNIT))?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RentalUnit>> {
        let model = rental_unit::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(unit_model_to_domain))
    }

    async fn find_by_property_and_number(
        &self,
        property_id: i32,
        unit_number: &str,
    ) -> DomainResult<Option<RentalUnit>> {
        let model = rental_unit::Entity::find()
            .filter(rental_unit::Column::PropertyId.eq(property_id))
            .filter(rental_unit::Column::UnitNumber.eq(unit_number))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(unit_model_to_domain))
    }

    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<RentalUnit>> {
        let models = rental_unit::Entity::find()
            .filter(rental_unit::Column::PropertyId.eq(property_id))
            .order_by_asc(rental_unit::Column::UnitNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(unit_model_to_domain).collect())
    }

    async fn list_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<RentalUnit>> {
        let models = rental_unit::Entity::find()
            .filter(rental_unit::Column::CurrentTenantId.eq(tenant_id))
            .order_by_asc(rental_unit::Column::PropertyId)
            .order_by_asc(rental_unit::Column::UnitNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(unit_model_to_domain).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        rental_unit::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
