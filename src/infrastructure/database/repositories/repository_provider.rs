//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::payment::{DepositRepository, PaymentRepository};
use crate::domain::property::{
    AmenityRepository, PropertyImageRepository, PropertyRepository, UnitRepository,
};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;

use super::payment_repository::{SeaOrmDepositRepository, SeaOrmPaymentRepository};
use super::property_repository::{
    SeaOrmAmenityRepository, SeaOrmPropertyImageRepository, SeaOrmPropertyRepository,
};
use super::reservation_repository::SeaOrmReservationRepository;
use super::unit_repository::SeaOrmUnitRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let unit = repos.units().find_by_id(12).await?;
/// let deposits = repos.deposits().list_for_tenant(&tenant_id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    properties: SeaOrmPropertyRepository,
    units: SeaOrmUnitRepository,
    amenities: SeaOrmAmenityRepository,
    images: SeaOrmPropertyImageRepository,
    reservations: SeaOrmReservationRepository,
    payments: SeaOrmPaymentRepository,
    deposits: SeaOrmDepositRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            properties: SeaOrmPropertyRepository::new(db.clone()),
            units: SeaOrmUnitRepository::new(db.clone()),
            amenities: SeaOrmAmenityRepository::new(db.clone()),
            images: SeaOrmPropertyImageRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            deposits: SeaOrmDepositRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
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
