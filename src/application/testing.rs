//! Shared fixture for service tests

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;

use super::payments::{PaymentService, SimulatedGateway};
use super::properties::{NewProperty, NewUnit, PropertyService};
use super::reservations::ReservationService;
use super::Actor;
use crate::domain::user::CreateUserDto;
use crate::domain::{County, PropertyType, RentalUnit, RepositoryProvider, UnitType, UserRole};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{InMemoryStorage, SeaOrmRepositoryProvider};

pub(crate) struct World {
    pub repos: Arc<dyn RepositoryProvider>,
    pub properties: PropertyService,
    pub reservations: Arc<ReservationService>,
    pub payments: PaymentService,
}

impl World {
    pub fn new() -> Self {
        Self::with_repos(Arc::new(InMemoryStorage::new()))
    }

    /// Same services over a migrated in-memory SQLite database.
    pub async fn sqlite() -> Self {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Self::with_repos(Arc::new(SeaOrmRepositoryProvider::new(db)))
    }

    fn with_repos(repos: Arc<dyn RepositoryProvider>) -> Self {
        let reservations = Arc::new(ReservationService::new(repos.clone(), 24));
        Self {
            properties: PropertyService::new(repos.clone()),
            payments: PaymentService::new(
                repos.clone(),
                reservations.clone(),
                Arc::new(SimulatedGateway),
            ),
            reservations,
            repos,
        }
    }

    pub async fn user(&self, name: &str, role: UserRole) -> Actor {
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

    /// An active apartment block owned by `owner` with one unit.
    pub async fn listed_unit(&self, owner: &Actor, unit_number: &str, rent: i64) -> RentalUnit {
        let property = self
            .properties
            .add_property(
                owner,
                NewProperty {
                    name: format!("{} Court", unit_number),
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
                },
            )
            .await
            .unwrap();
        self.properties
            .add_unit(
                owner,
                NewUnit {
                    property_id: property.id,
                    unit_number: unit_number.into(),
                    unit_type: UnitType::OneBedroom,
                    rent_amount: Decimal::from(rent),
                    floor_area: None,
                    floor_number: None,
                    current_tenant_id: None,
                    lease_start_date: None,
                    lease_end_date: None,
                    description: String::new(),
                },
            )
            .await
            .unwrap()
    }

    /// Push a reservation's hold window into the past.
    pub async fn backdate(&self, reservation_id: i32) {
        let mut r = self
            .repos
            .reservations()
            .find_by_id(reservation_id)
            .await
            .unwrap()
            .unwrap();
        r.reservation_date = Utc::now() - Duration::hours(25);
        r.expires_at = Utc::now() - Duration::hours(1);
        self.repos.reservations().update(r).await.unwrap();
    }
}
