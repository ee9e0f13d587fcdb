//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::domain::payment::{
    DepositRepository, Payment, PaymentFilter, PaymentMethodDetails, PaymentRepository,
    PaymentStatus, PaymentSummary, SecurityDeposit,
};
use crate::domain::property::{
    Amenity, AmenityRepository, Property, PropertyFilter, PropertyImage,
    PropertyImageRepository, PropertyRepository, RentalUnit, UnitRepository,
};
use crate::domain::reservation::{ReservationRepository, UnitReservation};
use crate::domain::user::{
    group_for, CreateUserDto, GetUserDto, UpdateUserDto, User, UserProfile, UserRepository,
};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::{validate_pagination, PaginatedResult};

fn next(counter: &AtomicI32) -> i32 {
    counter.fetch_add(1, Ordering::SeqCst)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    profiles: DashMap<String, UserProfile>,
    groups: DashMap<String, Vec<String>>,
}

impl InMemoryUserRepository {
    fn check_unique(
        &self,
        except_id: Option<&str>,
        username: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> DomainResult<()> {
        let clash = self.users.iter().any(|u| {
            Some(u.id.as_str()) != except_id
                && (username == Some(u.username.as_str())
                    || email == Some(u.email.as_str())
                    || (phone.is_some() && phone == u.phone_number.as_deref()))
        });
        if clash {
            return Err(DomainError::Conflict(
                "Username, email or phone number already exists".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let phone = dto.phone_number.filter(|p| !p.is_empty());
        self.check_unique(
            None,
            Some(&dto.username),
            Some(&dto.email),
            phone.as_deref(),
        )?;

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: dto.username,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: phone,
            password_hash: dto.password_hash,
            role: dto.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.profiles
            .insert(user.id.clone(), UserProfile::empty(&user.id));
        self.groups
            .insert(user.id.clone(), vec![group_for(user.role).name().to_string()]);
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>> {
        let (page, limit) = validate_pagination(dto.page, dto.page_size, 20);
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|e| e.value().clone())
            .filter(|u| {
                dto.search.as_deref().map_or(true, |s| {
                    contains_ci(&u.username, s)
                        || contains_ci(&u.email, s)
                        || contains_ci(&u.first_name, s)
                        || contains_ci(&u.last_name, s)
                })
            })
            .filter(|u| dto.role.map_or(true, |r| u.role == r))
            .filter(|u| dto.roles_in.as_ref().map_or(true, |rs| rs.contains(&u.role)))
            .filter(|u| dto.only_id.as_deref().map_or(true, |id| u.id == id))
            .collect();

        match dto.sort_by.as_deref() {
            Some("username") => users.sort_by(|a, b| a.username.cmp(&b.username)),
            Some("email") => users.sort_by(|a, b| a.email.cmp(&b.email)),
            Some("role") => users.sort_by(|a, b| a.role.as_str().cmp(b.role.as_str())),
            Some("last_name") => users.sort_by(|a, b| a.last_name.cmp(&b.last_name)),
            _ => users.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        Ok(PaginatedResult::from_vec(users, page, limit))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn get_user_by_phone(&self, phone: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.phone_number.as_deref() == Some(phone))
            .map(|u| u.value().clone()))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn search_user_ids(&self, search: &str) -> DomainResult<Vec<String>> {
        Ok(self
            .users
            .iter()
            .filter(|u| {
                contains_ci(&u.first_name, search)
                    || contains_ci(&u.last_name, search)
                    || contains_ci(&u.username, search)
            })
            .map(|u| u.id.clone())
            .collect())
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let new_phone = dto.phone_number.clone().map(|p| p.filter(|p| !p.is_empty()));
        self.check_unique(
            Some(id),
            dto.username.as_deref(),
            dto.email.as_deref(),
            new_phone.clone().flatten().as_deref(),
        )?;

        let Some(mut user) = self.users.get_mut(id) else {
            return Ok(None);
        };
        if let Some(username) = dto.username {
            user.username = username;
        }
        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(first_name) = dto.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = new_phone {
            user.phone_number = phone;
        }
        if let Some(is_active) = dto.is_active {
            user.is_active = is_active;
        }
        if let Some(role) = dto.role {
            if role != user.role {
                self.groups
                    .insert(id.to_string(), vec![group_for(role).name().to_string()]);
            }
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.password_hash = new_password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.last_login_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.users
            .remove(id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        self.profiles.remove(id);
        self.groups.remove(id);
        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    async fn save_profile(&self, mut profile: UserProfile) -> DomainResult<UserProfile> {
        profile.updated_at = Utc::now();
        self.profiles.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    async fn groups_for_user(&self, user_id: &str) -> DomainResult<Vec<String>> {
        Ok(self.groups.get(user_id).map(|g| g.clone()).unwrap_or_default())
    }
}

// ── Properties ──────────────────────────────────────────────────

pub struct InMemoryPropertyRepository {
    properties: DashMap<i32, Property>,
    counter: AtomicI32,
}

impl Default for InMemoryPropertyRepository {
    fn default() -> Self {
        Self {
            properties: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn create(&self, mut property: Property) -> DomainResult<Property> {
        property.id = next(&self.counter);
        let now = Utc::now();
        property.created_at = now;
        property.updated_at = now;
        self.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn update(&self, mut property: Property) -> DomainResult<()> {
        if !self.properties.contains_key(&property.id) {
            return Err(DomainError::not_found("Property", "id", property.id));
        }
        property.updated_at = Utc::now();
        self.properties.insert(property.id, property);
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Property>> {
        Ok(self.properties.get(&id).map(|p| p.clone()))
    }

    async fn list(&self, filter: PropertyFilter) -> DomainResult<Vec<Property>> {
        let mut items: Vec<Property> = self
            .properties
            .iter()
            .filter(|p| filter.matches(p.value()))
            .map(|p| p.value().clone())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.properties.len() as u64)
    }
}

// ── Units ───────────────────────────────────────────────────────

pub struct InMemoryUnitRepository {
    units: DashMap<i32, RentalUnit>,
    counter: AtomicI32,
}

impl Default for InMemoryUnitRepository {
    fn default() -> Self {
        Self {
            units: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl InMemoryUnitRepository {
    fn number_taken(&self, unit: &RentalUnit) -> bool {
        self.units.iter().any(|u| {
            u.id != unit.id
                && u.property_id == unit.property_id
                && u.unit_number == unit.unit_number
        })
    }
}

const DUPLICATE_UNIT: &str = "A unit with this number already exists in the property";

#[async_trait]
impl UnitRepository for InMemoryUnitRepository {
    async fn create(&self, mut unit: RentalUnit) -> DomainResult<RentalUnit> {
        unit.id = 0;
        if self.number_taken(&unit) {
            return Err(DomainError::Conflict(DUPLICATE_UNIT.into()));
        }
        unit.id = next(&self.counter);
        self.units.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn update(&self, mut unit: RentalUnit) -> DomainResult<()> {
        if !self.units.contains_key(&unit.id) {
            return Err(DomainError::not_found("RentalUnit", "id", unit.id));
        }
        if self.number_taken(&unit) {
            return Err(DomainError::Conflict(DUPLICATE_UNIT.into()));
        }
        unit.updated_at = Utc::now();
        self.units.insert(unit.id, unit);
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RentalUnit>> {
        Ok(self.units.get(&id).map(|u| u.clone()))
    }

    async fn find_by_property_and_number(
        &self,
        property_id: i32,
        unit_number: &str,
    ) -> DomainResult<Option<RentalUnit>> {
        Ok(self
            .units
            .iter()
            .find(|u| u.property_id == property_id && u.unit_number == unit_number)
            .map(|u| u.value().clone()))
    }

    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<RentalUnit>> {
        let mut items: Vec<RentalUnit> = self
            .units
            .iter()
            .filter(|u| u.property_id == property_id)
            .map(|u| u.value().clone())
            .collect();
        items.sort_by(|a, b| a.unit_number.cmp(&b.unit_number));
        Ok(items)
    }

    async fn list_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<RentalUnit>> {
        let mut items: Vec<RentalUnit> = self
            .units
            .iter()
            .filter(|u| u.is_rented_by(tenant_id))
            .map(|u| u.value().clone())
            .collect();
        items.sort_by(|a, b| (a.property_id, &a.unit_number).cmp(&(b.property_id, &b.unit_number)));
        Ok(items)
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.units.len() as u64)
    }
}

// ── Amenities & images ──────────────────────────────────────────

pub struct InMemoryAmenityRepository {
    amenities: DashMap<i32, Amenity>,
    counter: AtomicI32,
}

impl Default for InMemoryAmenityRepository {
    fn default() -> Self {
        Self {
            amenities: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl AmenityRepository for InMemoryAmenityRepository {
    async fn create(&self, mut amenity: Amenity) -> DomainResult<Amenity> {
        if self.amenities.iter().any(|a| a.name == amenity.name) {
            return Err(DomainError::Conflict(
                "Amenity with this name already exists".into(),
            ));
        }
        amenity.id = next(&self.counter);
        amenity.created_at = Utc::now();
        self.amenities.insert(amenity.id, amenity.clone());
        Ok(amenity)
    }

    async fn list_all(&self) -> DomainResult<Vec<Amenity>> {
        let mut items: Vec<Amenity> = self.amenities.iter().map(|a| a.value().clone()).collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Amenity>> {
        Ok(self
            .amenities
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Amenity>> {
        let mut items: Vec<Amenity> = ids
            .iter()
            .filter_map(|id| self.amenities.get(id).map(|a| a.clone()))
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

pub struct InMemoryPropertyImageRepository {
    images: DashMap<i32, PropertyImage>,
    counter: AtomicI32,
}

impl Default for InMemoryPropertyImageRepository {
    fn default() -> Self {
        Self {
            images: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl PropertyImageRepository for InMemoryPropertyImageRepository {
    async fn add(&self, mut image: PropertyImage) -> DomainResult<PropertyImage> {
        if image.is_primary {
            for mut other in self.images.iter_mut() {
                if other.property_id == image.property_id {
                    other.is_primary = false;
                }
            }
        }
        image.id = next(&self.counter);
        image.created_at = Utc::now();
        self.images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn list_for_property(&self, property_id: i32) -> DomainResult<Vec<PropertyImage>> {
        let mut items: Vec<PropertyImage> = self
            .images
            .iter()
            .filter(|i| i.property_id == property_id)
            .map(|i| i.value().clone())
            .collect();
        items.sort_by(|a, b| a.order.cmp(&b.order).then(b.created_at.cmp(&a.created_at)));
        Ok(items)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<PropertyImage>> {
        Ok(self.images.get(&id).map(|i| i.clone()))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.images
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("PropertyImage", "id", id))?;
        Ok(())
    }
}

// ── Reservations ────────────────────────────────────────────────

pub struct InMemoryReservationRepository {
    reservations: DashMap<i32, UnitReservation>,
    counter: AtomicI32,
}

impl Default for InMemoryReservationRepository {
    fn default() -> Self {
        Self {
            reservations: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

impl InMemoryReservationRepository {
    fn collect(&self, keep: impl Fn(&UnitReservation) -> bool) -> Vec<UnitReservation> {
        let mut items: Vec<UnitReservation> = self
            .reservations
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        items.sort_by(|a, b| {
            b.reservation_date
                .cmp(&a.reservation_date)
                .then(b.id.cmp(&a.id))
        });
        items
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn save(&self, mut reservation: UnitReservation) -> DomainResult<UnitReservation> {
        reservation.id = next(&self.counter);
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<UnitReservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn update(&self, reservation: UnitReservation) -> DomainResult<()> {
        if !self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::not_found("Reservation", "id", reservation.id));
        }
        self.reservations.insert(reservation.id, reservation);
        Ok(())
    }

    async fn find_live_for_unit(
        &self,
        unit_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<UnitReservation>> {
        Ok(self
            .collect(|r| r.unit_id == unit_id && r.is_live(now))
            .into_iter()
            .next())
    }

    async fn find_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<UnitReservation>> {
        Ok(self.collect(|r| r.tenant_id == tenant_id))
    }

    async fn find_for_units(&self, unit_ids: &[i32]) -> DomainResult<Vec<UnitReservation>> {
        Ok(self.collect(|r| unit_ids.contains(&r.unit_id)))
    }

    async fn find_all(&self) -> DomainResult<Vec<UnitReservation>> {
        Ok(self.collect(|_| true))
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> DomainResult<Vec<UnitReservation>> {
        Ok(self.collect(|r| {
            r.status == crate::domain::ReservationStatus::Pending && r.expires_at < now
        }))
    }
}

// ── Payments & deposits ─────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: DashMap<String, Payment>,
    details: DashMap<String, PaymentMethodDetails>,
}

impl InMemoryPaymentRepository {
    fn filtered(&self, filter: &PaymentFilter) -> Vec<Payment> {
        let mut items: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| filter.matches(p.value()))
            .map(|p| p.value().clone())
            .collect();
        items.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        items
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(
        &self,
        payment: Payment,
        details: Option<PaymentMethodDetails>,
    ) -> DomainResult<Payment> {
        if self
            .payments
            .iter()
            .any(|p| p.reference_number == payment.reference_number)
        {
            return Err(DomainError::Conflict("Payment reference already exists".into()));
        }
        if let Some(details) = details {
            self.details.insert(payment.payment_id.clone(), details);
        }
        self.payments
            .insert(payment.payment_id.clone(), payment.clone());
        Ok(payment)
    }

    async fn find_by_id(&self, payment_id: &str) -> DomainResult<Option<Payment>> {
        Ok(self.payments.get(payment_id).map(|p| p.clone()))
    }

    async fn update(&self, mut payment: Payment) -> DomainResult<()> {
        if !self.payments.contains_key(&payment.payment_id) {
            return Err(DomainError::not_found(
                "Payment",
                "payment_id",
                &payment.payment_id,
            ));
        }
        payment.updated_at = Utc::now();
        self.payments.insert(payment.payment_id.clone(), payment);
        Ok(())
    }

    async fn list(
        &self,
        filter: PaymentFilter,
        page: u32,
        limit: u32,
    ) -> DomainResult<PaginatedResult<Payment>> {
        Ok(PaginatedResult::from_vec(self.filtered(&filter), page, limit))
    }

    async fn summary(&self, filter: PaymentFilter) -> DomainResult<PaymentSummary> {
        let items = self.filtered(&filter);
        Ok(PaymentSummary {
            total_payments: items.len() as u64,
            total_amount: items
                .iter()
                .filter(|p| p.status == PaymentStatus::Completed)
                .map(|p| p.amount)
                .sum(),
            pending_payments: items
                .iter()
                .filter(|p| p.status == PaymentStatus::Pending)
                .count() as u64,
        })
    }

    async fn details(&self, payment_id: &str) -> DomainResult<Option<PaymentMethodDetails>> {
        Ok(self.details.get(payment_id).map(|d| d.clone()))
    }

    async fn update_details(&self, details: PaymentMethodDetails) -> DomainResult<()> {
        self.details
            .insert(details.payment_id().to_string(), details);
        Ok(())
    }
}

pub struct InMemoryDepositRepository {
    deposits: DashMap<i32, SecurityDeposit>,
    counter: AtomicI32,
}

impl Default for InMemoryDepositRepository {
    fn default() -> Self {
        Self {
            deposits: DashMap::new(),
            counter: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl DepositRepository for InMemoryDepositRepository {
    async fn get_or_create(
        &self,
        tenant_id: &str,
        unit_id: i32,
        amount: Decimal,
    ) -> DomainResult<SecurityDeposit> {
        if let Some(existing) = self
            .deposits
            .iter()
            .find(|d| d.tenant_id == tenant_id && d.unit_id == unit_id)
        {
            return Ok(existing.value().clone());
        }
        let mut deposit = SecurityDeposit::new(tenant_id, unit_id, amount);
        deposit.id = next(&self.counter);
        self.deposits.insert(deposit.id, deposit.clone());
        Ok(deposit)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<SecurityDeposit>> {
        Ok(self.deposits.get(&id).map(|d| d.clone()))
    }

    async fn find(&self, tenant_id: &str, unit_id: i32) -> DomainResult<Option<SecurityDeposit>> {
        Ok(self
            .deposits
            .iter()
            .find(|d| d.tenant_id == tenant_id && d.unit_id == unit_id)
            .map(|d| d.value().clone()))
    }

    async fn list_for_tenant(&self, tenant_id: &str) -> DomainResult<Vec<SecurityDeposit>> {
        let mut items: Vec<SecurityDeposit> = self
            .deposits
            .iter()
            .filter(|d| d.tenant_id == tenant_id)
            .map(|d| d.value().clone())
            .collect();
        items.sort_by_key(|d| d.unit_id);
        Ok(items)
    }

    async fn update(&self, mut deposit: SecurityDeposit) -> DomainResult<()> {
        if !self.deposits.contains_key(&deposit.id) {
            return Err(DomainError::not_found("SecurityDeposit", "id", deposit.id));
        }
        deposit.updated_at = Utc::now();
        self.deposits.insert(deposit.id, deposit);
        Ok(())
    }
}

// ── Provider ────────────────────────────────────────────────────

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryStorage {
    users: InMemoryUserRepository,
    properties: InMemoryPropertyRepository,
    units: InMemoryUnitRepository,
    amenities: InMemoryAmenityRepository,
    images: InMemoryPropertyImageRepository,
    reservations: InMemoryReservationRepository,
    payments: InMemoryPaymentRepository,
    deposits: InMemoryDepositRepository,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn properties(&self) -> &dyn PropertyRepository {
        &self.properties
    }

    fn units(&self) -> &dyn UnitRepository {
        &self.units
    }

    fn amenities(&self) -> &dyn AmenityRepository {
        &self.amenities
    }

    fn images(&self) -> &dyn PropertyImageRepository {
        &self.images
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn deposits(&self) -> &dyn DepositRepository {
        &self.deposits
    }
}
