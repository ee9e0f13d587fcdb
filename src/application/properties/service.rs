//! Property and rental unit management

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use validator::ValidateEmail;

use super::DEFAULT_AMENITIES;
use crate::application::{access, Actor};
use crate::domain::property::{primary_image, PropertyFilter};
use crate::domain::{
    Amenity, County, DomainError, DomainResult, Property, PropertyImage, PropertyType, RentalUnit,
    RepositoryProvider, UnitType, UserRole,
};
use crate::shared::normalize_kenyan_phone;

#[derive(Debug, Clone)]
pub struct NewImage {
    pub image_path: String,
    pub caption: String,
    pub is_primary: bool,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    pub county: County,
    pub town: String,
    pub property_type: PropertyType,
    pub description: String,
    pub number_of_floors: Option<i32>,
    pub units_per_floor: Option<i32>,
    pub amenity_ids: Vec<i32>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub manager_id: Option<String>,
    /// Optional first listing image
    pub image: Option<NewImage>,
}

/// Partial update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct PropertyChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub county: Option<County>,
    pub town: Option<String>,
    pub property_type: Option<PropertyType>,
    pub description: Option<String>,
    pub number_of_floors: Option<Option<i32>>,
    pub units_per_floor: Option<Option<i32>>,
    pub amenity_ids: Option<Vec<i32>>,
    pub contact_phone: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewUnit {
    pub property_id: i32,
    pub unit_number: String,
    pub unit_type: UnitType,
    pub rent_amount: Decimal,
    pub floor_area: Option<i32>,
    pub floor_number: Option<i32>,
    pub current_tenant_id: Option<String>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct UnitChanges {
    pub unit_number: Option<String>,
    pub unit_type: Option<UnitType>,
    pub rent_amount: Option<Decimal>,
    pub floor_area: Option<Option<i32>>,
    pub floor_number: Option<Option<i32>>,
    pub current_tenant_id: Option<Option<String>>,
    pub lease_start_date: Option<Option<NaiveDate>>,
    pub lease_end_date: Option<Option<NaiveDate>>,
    pub description: Option<String>,
}

/// Public listing row
#[derive(Debug, Clone)]
pub struct PropertyListing {
    pub property: Property,
    pub primary_image: Option<PropertyImage>,
    pub total_units: usize,
    pub available_units: usize,
}

#[derive(Debug, Clone)]
pub struct PropertyDetail {
    pub property: Property,
    pub amenities: Vec<Amenity>,
    pub images: Vec<PropertyImage>,
    pub units: Vec<RentalUnit>,
}

pub struct PropertyService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PropertyService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Properties ──────────────────────────────────────────────

    /// Active properties with their unit counts, newest first.
    pub async fn list_properties(&self) -> DomainResult<Vec<PropertyListing>> {
        let properties = self.repos.properties().list(PropertyFilter::active()).await?;
        let mut listings = Vec::with_capacity(properties.len());
        for property in properties {
            let images = self.repos.images().list_for_property(property.id).await?;
            let units = self.repos.units().list_for_property(property.id).await?;
            listings.push(PropertyListing {
                primary_image: primary_image(&images).cloned(),
                total_units: units.len(),
                available_units: units.iter().filter(|u| u.is_available).count(),
                property,
            });
        }
        Ok(listings)
    }

    /// Active properties are public; inactive ones only to users with access.
    pub async fn get_property(
        &self,
        actor: Option<&Actor>,
        id: i32,
    ) -> DomainResult<PropertyDetail> {
        let property = self.visible_property(actor, id).await?;
        let amenities = self
            .repos
            .amenities()
            .find_by_ids(&property.amenity_ids)
            .await?;
        let images = self.repos.images().list_for_property(id).await?;
        let units = self.repos.units().list_for_property(id).await?;
        Ok(PropertyDetail {
            property,
            amenities,
            images,
            units,
        })
    }

    pub async fn add_property(&self, actor: &Actor, new: NewProperty) -> DomainResult<Property> {
        actor.require_staff("You don't have permission to add properties.")?;

        let now = Utc::now();
        let mut property = Property {
            id: 0,
            name: new.name.trim().to_string(),
            address: new.address.trim().to_string(),
            county: new.county,
            town: new.town.trim().to_string(),
            property_type: new.property_type,
            description: new.description,
            number_of_floors: new.number_of_floors,
            units_per_floor: new.units_per_floor,
            owner_id: actor.user_id.clone(),
            manager_id: None,
            amenity_ids: dedup(new.amenity_ids),
            contact_phone: clean_phone(new.contact_phone)?,
            contact_email: clean_email(new.contact_email)?,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        property.validate()?;
        self.check_amenities(&property.amenity_ids).await?;
        if let Some(manager_id) = new.manager_id.filter(|m| !m.is_empty()) {
            self.check_manager(&manager_id).await?;
            property.manager_id = Some(manager_id);
        }

        let property = self.repos.properties().create(property).await?;
        if let Some(image) = new.image {
            self.store_image(property.id, image).await?;
        }

        info!(property_id = property.id, owner_id = %property.owner_id, "Property added");
        Ok(property)
    }

    /// Owner, manager or admin only.
    pub async fn update_property(
        &self,
        actor: &Actor,
        id: i32,
        changes: PropertyChanges,
    ) -> DomainResult<Property> {
        let mut property = self.editable_property(actor, id).await?;

        if let Some(name) = changes.name {
            property.name = name.trim().to_string();
        }
        if let Some(address) = changes.address {
            property.address = address.trim().to_string();
        }
        if let Some(county) = changes.county {
            property.county = county;
        }
        if let Some(town) = changes.town {
            property.town = town.trim().to_string();
        }
        if let Some(property_type) = changes.property_type {
            property.property_type = property_type;
        }
        if let Some(description) = changes.description {
            property.description = description;
        }
        if let Some(floors) = changes.number_of_floors {
            property.number_of_floors = floors;
        }
        if let Some(per_floor) = changes.units_per_floor {
            property.units_per_floor = per_floor;
        }
        if let Some(ids) = changes.amenity_ids {
            property.amenity_ids = dedup(ids);
            self.check_amenities(&property.amenity_ids).await?;
        }
        if let Some(phone) = changes.contact_phone {
            property.contact_phone = clean_phone(phone)?;
        }
        if let Some(email) = changes.contact_email {
            property.contact_email = clean_email(email)?;
        }
        if let Some(active) = changes.is_active {
            property.is_active = active;
        }
        property.validate()?;

        self.repos.properties().update(property.clone()).await?;
        info!(property_id = id, updated_by = %actor.user_id, "Property updated");
        Ok(property)
    }

    pub async fn set_active(&self, actor: &Actor, id: i32, active: bool) -> DomainResult<Property> {
        self.update_property(
            actor,
            id,
            PropertyChanges {
                is_active: Some(active),
                ..Default::default()
            },
        )
        .await
    }

    /// Admin or owner. `None` removes the manager.
    pub async fn assign_manager(
        &self,
        actor: &Actor,
        id: i32,
        manager_id: Option<String>,
    ) -> DomainResult<Property> {
        let mut property = self.require_property(id).await?;
        if !(actor.is_admin() || property.owner_id == actor.user_id) {
            return Err(DomainError::Forbidden(
                "Only the owner or an administrator can assign a manager.".into(),
            ));
        }
        if let Some(manager_id) = &manager_id {
            self.check_manager(manager_id).await?;
        }
        property.manager_id = manager_id;
        self.repos.properties().update(property.clone()).await?;
        info!(property_id = id, manager_id = ?property.manager_id, "Property manager assigned");
        Ok(property)
    }

    pub async fn accessible_properties(&self, actor: &Actor) -> DomainResult<Vec<Property>> {
        access::accessible_properties(self.repos.as_ref(), actor).await
    }

    pub async fn has_property_access(&self, actor: &Actor, id: i32) -> DomainResult<bool> {
        let property = self.require_property(id).await?;
        access::has_property_access(self.repos.as_ref(), actor, &property).await
    }

    // ── Rental units ────────────────────────────────────────────

    pub async fn add_unit(&self, actor: &Actor, new: NewUnit) -> DomainResult<RentalUnit> {
        actor.require_staff("You don't have permission to add rental units.")?;
        let property = self.require_property(new.property_id).await?;
        if !access::can_manage_units(actor, &property) {
            return Err(DomainError::Forbidden(
                "You can only add units to active properties you own or manage.".into(),
            ));
        }

        let now = Utc::now();
        let mut unit = RentalUnit {
            id: 0,
            property_id: property.id,
            unit_number: new.unit_number.trim().to_string(),
            unit_type: new.unit_type,
            rent_amount: Decimal::ZERO,
            deposit_amount: Decimal::ZERO,
            floor_area: new.floor_area,
            floor_number: new.floor_number,
            is_available: true,
            current_tenant_id: None,
            lease_start_date: new.lease_start_date,
            lease_end_date: new.lease_end_date,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        unit.set_rent(new.rent_amount)?;
        if let Some(tenant_id) = new.current_tenant_id.filter(|t| !t.is_empty()) {
            self.check_tenant(&tenant_id).await?;
            unit.assign_tenant(Some(tenant_id));
        }
        unit.validate_against(&property)?;
        check_lease(&unit)?;

        let unit = self.repos.units().create(unit).await?;
        info!(
            unit_id = unit.id,
            property_id = property.id,
            rent = %unit.rent_amount,
            deposit = %unit.deposit_amount,
            "Rental unit added"
        );
        Ok(unit)
    }

    /// Same rules as [`add_unit`](Self::add_unit); a rent change re-derives
    /// the deposit.
    pub async fn update_unit(
        &self,
        actor: &Actor,
        id: i32,
        changes: UnitChanges,
    ) -> DomainResult<RentalUnit> {
        actor.require_staff("You don't have permission to edit rental units.")?;
        let mut unit = self.require_unit(id).await?;
        let property = self.require_property(unit.property_id).await?;
        if !access::can_manage_units(actor, &property) {
            return Err(DomainError::Forbidden(
                "You can only edit units of active properties you own or manage.".into(),
            ));
        }

        if let Some(number) = changes.unit_number {
            unit.unit_number = number.trim().to_string();
        }
        if let Some(unit_type) = changes.unit_type {
            unit.unit_type = unit_type;
        }
        if let Some(rent) = changes.rent_amount {
            unit.set_rent(rent)?;
        }
        if let Some(area) = changes.floor_area {
            unit.floor_area = area;
        }
        if let Some(floor) = changes.floor_number {
            unit.floor_number = floor;
        }
        if let Some(tenant) = changes.current_tenant_id {
            let tenant = tenant.filter(|t| !t.is_empty());
            if let Some(tenant_id) = &tenant {
                self.check_tenant(tenant_id).await?;
            }
            unit.assign_tenant(tenant);
        }
        if let Some(start) = changes.lease_start_date {
            unit.lease_start_date = start;
        }
        if let Some(end) = changes.lease_end_date {
            unit.lease_end_date = end;
        }
        if let Some(description) = changes.description {
            unit.description = description;
        }
        unit.validate_against(&property)?;
        check_lease(&unit)?;

        self.repos.units().update(unit.clone()).await?;
        info!(unit_id = id, updated_by = %actor.user_id, "Rental unit updated");
        Ok(unit)
    }

    /// Units of a property, ordered by unit number.
    pub async fn list_units(
        &self,
        actor: Option<&Actor>,
        property_id: i32,
    ) -> DomainResult<Vec<RentalUnit>> {
        self.visible_property(actor, property_id).await?;
        self.repos.units().list_for_property(property_id).await
    }

    pub async fn get_unit(
        &self,
        actor: Option<&Actor>,
        id: i32,
    ) -> DomainResult<(RentalUnit, Property)> {
        let unit = self.require_unit(id).await?;
        let property = self.visible_property(actor, unit.property_id).await?;
        Ok((unit, property))
    }

    // ── Amenities ───────────────────────────────────────────────

    pub async fn add_amenity(
        &self,
        actor: &Actor,
        name: &str,
        description: &str,
        icon: &str,
    ) -> DomainResult<Amenity> {
        actor.require_staff("You don't have permission to add amenities.")?;
        let name = name.trim();
        if name.is_empty() || name.chars().count() > 100 {
            return Err(DomainError::Validation(
                "Amenity name must be 1-100 characters".into(),
            ));
        }
        let amenity = self
            .repos
            .amenities()
            .create(Amenity {
                id: 0,
                name: name.to_string(),
                description: description.trim().to_string(),
                icon: icon.trim().to_string(),
                created_at: Utc::now(),
            })
            .await?;
        info!(amenity_id = amenity.id, name = %amenity.name, "Amenity added");
        Ok(amenity)
    }

    pub async fn list_amenities(&self) -> DomainResult<Vec<Amenity>> {
        self.repos.amenities().list_all().await
    }

    /// Insert any missing default amenities; returns how many were created.
    pub async fn seed_amenities(&self) -> DomainResult<usize> {
        let mut created = 0;
        for (name, description, icon) in DEFAULT_AMENITIES {
            if self.repos.amenities().find_by_name(name).await?.is_some() {
                continue;
            }
            self.repos
                .amenities()
                .create(Amenity {
                    id: 0,
                    name: name.to_string(),
                    description: description.to_string(),
                    icon: icon.to_string(),
                    created_at: Utc::now(),
                })
                .await?;
            debug!(name, "Created amenity");
            created += 1;
        }
        if created > 0 {
            info!(created, "Default amenities seeded");
        }
        Ok(created)
    }

    // ── Images ──────────────────────────────────────────────────

    pub async fn add_image(
        &self,
        actor: &Actor,
        property_id: i32,
        image: NewImage,
    ) -> DomainResult<PropertyImage> {
        self.editable_property(actor, property_id).await?;
        self.store_image(property_id, image).await
    }

    pub async fn delete_image(
        &self,
        actor: &Actor,
        property_id: i32,
        image_id: i32,
    ) -> DomainResult<()> {
        self.editable_property(actor, property_id).await?;
        let image = self
            .repos
            .images()
            .find_by_id(image_id)
            .await?
            .filter(|i| i.property_id == property_id)
            .ok_or_else(|| DomainError::not_found("PropertyImage", "id", image_id))?;
        self.repos.images().delete(image.id).await?;
        info!(property_id, image_id, "Property image deleted");
        Ok(())
    }

    async fn store_image(&self, property_id: i32, image: NewImage) -> DomainResult<PropertyImage> {
        let path = image.image_path.trim();
        if path.is_empty() {
            return Err(DomainError::Validation("Image path is required".into()));
        }
        let caption = image.caption.trim();
        if caption.chars().count() > 200 {
            return Err(DomainError::Validation(
                "Caption must be at most 200 characters".into(),
            ));
        }
        self.repos
            .images()
            .add(PropertyImage {
                id: 0,
                property_id,
                image_path: path.to_string(),
                caption: caption.to_string(),
                is_primary: image.is_primary,
                order: image.order,
                created_at: Utc::now(),
            })
            .await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn require_property(&self, id: i32) -> DomainResult<Property> {
        self.repos
            .properties()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", "id", id))
    }

    async fn require_unit(&self, id: i32) -> DomainResult<RentalUnit> {
        self.repos
            .units()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("RentalUnit", "id", id))
    }

    async fn visible_property(&self, actor: Option<&Actor>, id: i32) -> DomainResult<Property> {
        let property = self.require_property(id).await?;
        if property.is_active {
            return Ok(property);
        }
        if let Some(actor) = actor {
            if access::has_property_access(self.repos.as_ref(), actor, &property).await? {
                return Ok(property);
            }
        }
        Err(DomainError::not_found("Property", "id", id))
    }

    async fn editable_property(&self, actor: &Actor, id: i32) -> DomainResult<Property> {
        actor.require_staff("You don't have permission to edit properties.")?;
        let property = self.require_property(id).await?;
        if !access::can_access(actor, &property, false) {
            return Err(DomainError::Forbidden(
                "You don't have permission to edit this property.".into(),
            ));
        }
        Ok(property)
    }

    async fn check_amenities(&self, ids: &[i32]) -> DomainResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = self.repos.amenities().find_by_ids(ids).await?;
        if found.len() != ids.len() {
            return Err(DomainError::Validation("Unknown amenity selected".into()));
        }
        Ok(())
    }

    async fn check_manager(&self, user_id: &str) -> DomainResult<()> {
        match self.repos.users().get_user_by_id(user_id).await? {
            Some(u) if u.role == UserRole::PropertyManager => Ok(()),
            Some(_) => Err(DomainError::Validation(
                "Manager must have the Property Manager role".into(),
            )),
            None => Err(DomainError::not_found("User", "id", user_id)),
        }
    }

    async fn check_tenant(&self, user_id: &str) -> DomainResult<()> {
        match self.repos.users().get_user_by_id(user_id).await? {
            Some(u) if u.role == UserRole::Tenant => Ok(()),
            Some(_) => Err(DomainError::Validation(
                "Current tenant must have the Tenant role".into(),
            )),
            None => Err(DomainError::not_found("User", "id", user_id)),
        }
    }
}

fn dedup(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn clean_phone(phone: Option<String>) -> DomainResult<Option<String>> {
    match phone.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(p) => normalize_kenyan_phone(p)
            .map(Some)
            .map_err(DomainError::Validation),
    }
}

fn clean_email(email: Option<String>) -> DomainResult<Option<String>> {
    match email.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(e) if e.validate_email() => Ok(Some(e.to_lowercase())),
        Some(_) => Err(DomainError::Validation("Enter a valid email address".into())),
    }
}

fn check_lease(unit: &RentalUnit) -> DomainResult<()> {
    if let (Some(start), Some(end)) = (unit.lease_start_date, unit.lease_end_date) {
        if end < start {
            return Err(DomainError::Validation(
                "Lease end date cannot be before the start date".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::CreateUserDto;
    use crate::infrastructure::InMemoryStorage;
    use std::str::FromStr;

    struct Fixture {
        repos: Arc<InMemoryStorage>,
        svc: PropertyService,
    }

    impl Fixture {
        fn new() -> Self {
            let repos = Arc::new(InMemoryStorage::new());
            let svc = PropertyService::new(repos.clone());
            Self { repos, svc }
        }

        async fn user(&self, name: &str, role: UserRole) -> Actor {
            let user = self
                .repos
                .users()
                .create_user(CreateUserDto {
                    username: name.into(),
                    email: format!("{}@example.com", name),
                    first_name: name.into(),
                    last_name: "Test".into(),
                    phone_number: None,
                    role,
                    password_hash: "x".into(),
                })
                .await
                .unwrap();
            Actor::new(user.id, user.username, user.role)
        }
    }

    fn apartment(name: &str) -> NewProperty {
        NewProperty {
            name: name.into(),
            address: "Ngong Road".into(),
            county: County::Nairobi,
            town: "Nairobi".into(),
            property_type: PropertyType::Apartment,
            description: String::new(),
            number_of_floors: None,
            units_per_floor: None,
            amenity_ids: vec![],
            contact_phone: None,
            contact_email: None,
            manager_id: None,
            image: None,
        }
    }

    fn unit(property_id: i32, number: &str, rent: i64) -> NewUnit {
        NewUnit {
            property_id,
            unit_number: number.into(),
            unit_type: UnitType::TwoBedroom,
            rent_amount: Decimal::from(rent),
            floor_area: None,
            floor_number: None,
            current_tenant_id: None,
            lease_start_date: None,
            lease_end_date: None,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn tenants_cannot_add_properties() {
        let fx = Fixture::new();
        let tenant = fx.user("tenant", UserRole::Tenant).await;
        assert!(matches!(
            fx.svc.add_property(&tenant, apartment("Nope")).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn add_property_sets_owner_and_first_image() {
        let fx = Fixture::new();
        let landlord = fx.user("landlord", UserRole::Landlord).await;
        let mut new = apartment("Sunrise Towers");
        new.contact_phone = Some("0712345678".into());
        new.image = Some(NewImage {
            image_path: "/media/front.jpg".into(),
            caption: "Front".into(),
            is_primary: true,
            order: 0,
        });
        let property = fx.svc.add_property(&landlord, new).await.unwrap();
        assert_eq!(property.owner_id, landlord.user_id);
        assert_eq!(property.contact_phone.as_deref(), Some("+254712345678"));

        let listings = fx.svc.list_properties().await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(
            listings[0].primary_image.as_ref().map(|i| i.image_path.as_str()),
            Some("/media/front.jpg")
        );
    }

    #[tokio::test]
    async fn commercial_property_needs_layout() {
        let fx = Fixture::new();
        let landlord = fx.user("landlord", UserRole::Landlord).await;
        let mut new = apartment("Biashara Plaza");
        new.property_type = PropertyType::Commercial;
        assert!(fx.svc.add_property(&landlord, new.clone()).await.is_err());
        new.number_of_floors = Some(3);
        new.units_per_floor = Some(5);
        let p = fx.svc.add_property(&landlord, new).await.unwrap();
        assert_eq!(p.total_units(), Some(15));
    }

    #[tokio::test]
    async fn unit_deposit_is_derived_from_rent() {
        let fx = Fixture::new();
        let landlord = fx.user("landlord", UserRole::Landlord).await;
        let p = fx.svc.add_property(&landlord, apartment("Kileleshwa Court")).await.unwrap();

        let u = fx.svc.add_unit(&landlord, unit(p.id, "A1", 50_000)).await.unwrap();
        assert_eq!(u.deposit_amount, Decimal::from_str("56500.00").unwrap());
        assert!(u.is_available);

        let u = fx
            .svc
            .update_unit(
                &landlord,
                u.id,
                UnitChanges {
                    rent_amount: Some(Decimal::from(20_000)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(u.deposit_amount, Decimal::from_str("22600.00").unwrap());
        assert_eq!(crate::shared::deposit_for_rent(Decimal::from(20_000)), u.deposit_amount);
    }

    #[tokio::test]
    async fn duplicate_unit_number_conflicts() {
        let fx = Fixture::new();
        let landlord = fx.user("landlord", UserRole::Landlord).await;
        let p = fx.svc.add_property(&landlord, apartment("Lavington Flats")).await.unwrap();
        fx.svc.add_unit(&landlord, unit(p.id, "B2", 30_000)).await.unwrap();
        assert!(matches!(
            fx.svc.add_unit(&landlord, unit(p.id, "B2", 30_000)).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn unit_scope_follows_ownership_and_management() {
        let fx = Fixture::new();
        let owner = fx.user("owner", UserRole::Landlord).await;
        let other = fx.user("other", UserRole::Landlord).await;
        let pm = fx.user("pm", UserRole::PropertyManager).await;
        let admin = fx.user("admin", UserRole::Admin).await;
        let p = fx.svc.add_property(&owner, apartment("Runda Gardens")).await.unwrap();

        assert!(matches!(
            fx.svc.add_unit(&other, unit(p.id, "1", 10_000)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(fx.svc.add_unit(&pm, unit(p.id, "1", 10_000)).await.is_err());

        fx.svc
            .assign_manager(&owner, p.id, Some(pm.user_id.clone()))
            .await
            .unwrap();
        fx.svc.add_unit(&pm, unit(p.id, "1", 10_000)).await.unwrap();
        fx.svc.add_unit(&admin, unit(p.id, "2", 10_000)).await.unwrap();

        fx.svc.set_active(&owner, p.id, false).await.unwrap();
        assert!(fx.svc.add_unit(&admin, unit(p.id, "3", 10_000)).await.is_err());
    }

    #[tokio::test]
    async fn commercial_unit_floor_is_checked() {
        let fx = Fixture::new();
        let landlord = fx.user("landlord", UserRole::Landlord).await;
        let mut new = apartment("Upper Hill Offices");
        new.property_type = PropertyType::Commercial;
        new.number_of_floors = Some(4);
        new.units_per_floor = Some(2);
        let p = fx.svc.add_property(&landlord, new).await.unwrap();

        let mut u = unit(p.id, "OF-1", 80_000);
        assert!(fx.svc.add_unit(&landlord, u.clone()).await.is_err());
        u.floor_number = Some(5);
        assert!(fx.svc.add_unit(&landlord, u.clone()).await.is_err());
        u.floor_number = Some(4);
        assert!(fx.svc.add_unit(&landlord, u).await.is_ok());
    }

    #[tokio::test]
    async fn tenant_assignment_requires_tenant_role() {
        let fx = Fixture::new();
        let landlord = fx.user("landlord", UserRole::Landlord).await;
        let tenant = fx.user("tenant", UserRole::Tenant).await;
        let p = fx.svc.add_property(&landlord, apartment("Karen Villas")).await.unwrap();

        let mut u = unit(p.id, "V1", 120_000);
        u.current_tenant_id = Some(landlord.user_id.clone());
        assert!(fx.svc.add_unit(&landlord, u.clone()).await.is_err());

        u.current_tenant_id = Some(tenant.user_id.clone());
        let created = fx.svc.add_unit(&landlord, u).await.unwrap();
        assert!(!created.is_available);
        assert!(created.is_occupied());

        let accessible = fx.svc.accessible_properties(&tenant).await.unwrap();
        assert_eq!(accessible.len(), 1);
        assert!(fx.svc.has_property_access(&tenant, p.id).await.unwrap());

        let freed = fx
            .svc
            .update_unit(
                &landlord,
                created.id,
                UnitChanges {
                    current_tenant_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(freed.is_available);
        assert!(!fx.svc.has_property_access(&tenant, p.id).await.unwrap());
    }

    #[tokio::test]
    async fn only_owner_manager_or_admin_edit() {
        let fx = Fixture::new();
        let owner = fx.user("owner", UserRole::Landlord).await;
        let stranger = fx.user("stranger", UserRole::PropertyManager).await;
        let p = fx.svc.add_property(&owner, apartment("Westlands Heights")).await.unwrap();

        let rename = PropertyChanges {
            name: Some("Westlands Towers".into()),
            ..Default::default()
        };
        assert!(matches!(
            fx.svc.update_property(&stranger, p.id, rename.clone()).await,
            Err(DomainError::Forbidden(_))
        ));
        let p = fx.svc.update_property(&owner, p.id, rename).await.unwrap();
        assert_eq!(p.name, "Westlands Towers");
    }

    #[tokio::test]
    async fn assign_manager_requires_pm_role() {
        let fx = Fixture::new();
        let owner = fx.user("owner", UserRole::Landlord).await;
        let tenant = fx.user("tenant", UserRole::Tenant).await;
        let p = fx.svc.add_property(&owner, apartment("Parklands Court")).await.unwrap();
        assert!(matches!(
            fx.svc.assign_manager(&owner, p.id, Some(tenant.user_id)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn inactive_properties_hidden_from_public() {
        let fx = Fixture::new();
        let owner = fx.user("owner", UserRole::Landlord).await;
        let p = fx.svc.add_property(&owner, apartment("Hidden Place")).await.unwrap();
        fx.svc.set_active(&owner, p.id, false).await.unwrap();

        assert!(fx.svc.list_properties().await.unwrap().is_empty());
        assert!(matches!(
            fx.svc.get_property(None, p.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(fx.svc.get_property(Some(&owner), p.id).await.is_ok());
    }

    #[tokio::test]
    async fn primary_image_is_unique() {
        let fx = Fixture::new();
        let owner = fx.user("owner", UserRole::Landlord).await;
        let p = fx.svc.add_property(&owner, apartment("Gallery House")).await.unwrap();
        let img = |path: &str| NewImage {
            image_path: path.into(),
            caption: String::new(),
            is_primary: true,
            order: 0,
        };
        let first = fx.svc.add_image(&owner, p.id, img("/a.jpg")).await.unwrap();
        let second = fx.svc.add_image(&owner, p.id, img("/b.jpg")).await.unwrap();

        let detail = fx.svc.get_property(None, p.id).await.unwrap();
        let primaries: Vec<i32> = detail
            .images
            .iter()
            .filter(|i| i.is_primary)
            .map(|i| i.id)
            .collect();
        assert_eq!(primaries, vec![second.id]);

        fx.svc.delete_image(&owner, p.id, first.id).await.unwrap();
        assert!(fx.svc.delete_image(&owner, p.id, first.id).await.is_err());
    }

    #[tokio::test]
    async fn seed_amenities_is_idempotent() {
        let fx = Fixture::new();
        assert_eq!(fx.svc.seed_amenities().await.unwrap(), 18);
        assert_eq!(fx.svc.seed_amenities().await.unwrap(), 0);
        let all = fx.svc.list_amenities().await.unwrap();
        assert_eq!(all.len(), 18);
        assert_eq!(all[0].name, "Air Conditioning");
    }

    #[tokio::test]
    async fn amenity_names_are_unique() {
        let fx = Fixture::new();
        let landlord = fx.user("landlord", UserRole::Landlord).await;
        fx.svc
            .add_amenity(&landlord, "Borehole", "Own water source", "💧")
            .await
            .unwrap();
        assert!(matches!(
            fx.svc.add_amenity(&landlord, "Borehole", "", "").await,
            Err(DomainError::Conflict(_))
        ));
        let mut new = apartment("With Amenities");
        new.amenity_ids = vec![999];
        assert!(fx.svc.add_property(&landlord, new).await.is_err());
    }
}
