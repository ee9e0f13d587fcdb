use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Storage(#[from] InfraError),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Whether this error came from the storage layer rather than from a
    /// business rule.
    pub fn is_storage(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::Infra(InfraError::Database(e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Infra(InfraError::Io(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_failures_are_storage_errors() {
        let err = DomainError::from(InfraError::Database(sea_orm::DbErr::Custom("locked".into())));
        assert!(err.is_storage());
        assert!(err.to_string().starts_with("Database error:"));

        // A rule message that happens to mention the database stays a rule failure.
        assert!(!DomainError::Validation("Database error: spoofed".into()).is_storage());
    }

    #[test]
    fn app_error_wraps_both_layers() {
        let domain: AppError = DomainError::Forbidden("no".into()).into();
        assert!(matches!(domain, AppError::Domain(_)));

        let infra: AppError = sea_orm::DbErr::Custom("gone".into()).into();
        assert!(matches!(infra, AppError::Infra(InfraError::Database(_))));
    }
}
