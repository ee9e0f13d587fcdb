//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::payment::{DepositRepository, PaymentRepository};
use super::property::{
    AmenityRepository, PropertyImageRepository, PropertyRepository, UnitRepository,
};
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::shared::types::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let unit = repos.units().find_by_id(12).await?;
///     let live = repos.reservations().find_live_for_unit(12, Utc::now()).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn properties(&self) -> &dyn PropertyRepository;
    fn units(&self) -> &dyn UnitRepository;
    fn amenities(&self) -> &dyn AmenityRepository;
    fn images(&self) -> &dyn PropertyImageRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn deposits(&self) -> &dyn DepositRepository;
}
