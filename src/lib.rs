//! # Rental Management Service
//!
//! Property rental backend: listings and units, 24-hour unit reservations,
//! security deposits and rent paid through simulated MPesa and card
//! gateways, and role-based access for admins, property managers,
//! landlords and tenants.
//!
//! ## Architecture
//!
//! - **domain**: entities, value types and repository traits
//! - **application**: services enforcing roles, scopes and state machines
//! - **infrastructure**: SeaORM persistence, in-memory storage, crypto
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap shared by both binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_api_router, ApiServices};
