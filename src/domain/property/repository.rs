//! Property, unit, amenity and image repository interfaces

use async_trait::async_trait;

use super::model::{Amenity, Property, PropertyImage};
use super::unit::RentalUnit;
use crate::domain::DomainResult;

#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub active_only: bool,
    pub owner_id: Option<String>,
    pub manager_id: Option<String>,
    pub ids: Option<Vec<i32>>,
}

impl PropertyFilter {
    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, p: &Property) -> bool {
        (!self.active_only || p.is_active)
            && self.owner_id.as_deref().map_or(true, |o| p.owner_id == o)
            && self
                .manager_id
                .as_deref()
                .map_or(true, |m| p.manager_id.as_deref() == Some(m))
            && self.ids.as_ref().map_or(true, |ids| ids.contains(&p.id))
    }
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Insert and return the property with its assigned id.
    async fn create(&self, property: Property) -> DomainResult<Property>;
    /// Persist all fields, amenity links included.
    async fn update(&self, property: Property) -> DomainResult<()>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Property>>;
    /// Newest first.
    async fn list(&self, filter: PropertyFilter) -> DomainResult<Vec<Property>>;
    async fn count(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Conflict when the unit number already exists in the property.
    async fn create(&self, unit: RentalUnit) -> DomainResult<RentalUnit>;
    async fn update(&self, unit: RentalUnit) -> DomainResult<()>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RentalUnit>>;
    async fn find_by_property_and_number(
        &self,
        property_id: i32,
        unit_number: &str,
    ) -> DomainResult<Option<RentalUnit>>;
    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<RentalUnit>>;
    /// Units whose current tenant is `tenant_id`.
    async fn list_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<RentalUnit>>;
    async fn count(&self) -> DomainResult<u64>;
}

#[async_trait]
pub trait AmenityRepository: Send + Sync {
    /// Conflict on duplicate name.
    async fn create(&self, amenity: Amenity) -> DomainResult<Amenity>;
    /// Ordered by name.
    async fn list_all(&self) -> DomainResult<Vec<Amenity>>;
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Amenity>>;
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Amenity>>;
}

#[async_trait]
pub trait PropertyImageRepository: Send + Sync {
    /// A primary image clears the flag on the property's other images.
    async fn add(&self, image: PropertyImage) -> DomainResult<PropertyImage>;
    /// Ordered by (order, newest first).
    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<PropertyImage>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PropertyImage>>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
