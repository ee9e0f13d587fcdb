//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod payment_repository;
pub mod property_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod unit_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;
use crate::shared::InfraError;

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(InfraError::Database(e))
}

/// Map a UNIQUE constraint violation to `Conflict(message)`.
pub(crate) fn unique_or_db_err(e: sea_orm::DbErr, message: &str) -> DomainError {
    let text = e.to_string();
    if text.contains("UNIQUE") || text.contains("duplicate") {
        DomainError::Conflict(message.to_string())
    } else {
        db_err(e)
    }
}
