//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_properties;
mod m20250101_000003_create_rental_units;
mod m20250101_000004_create_unit_reservations;
mod m20250101_000005_create_payments;
mod m20250101_000006_create_security_deposits;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_properties::Migration),
            Box::new(m20250101_000003_create_rental_units::Migration),
            Box::new(m20250101_000004_create_unit_reservations::Migration),
            Box::new(m20250101_000005_create_payments::Migration),
            Box::new(m20250101_000006_create_security_deposits::Migration),
        ]
    }
}
