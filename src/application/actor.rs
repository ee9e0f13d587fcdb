//! Caller identity and role guards

use crate::domain::{DomainError, DomainResult, UserRole};

/// The authenticated user on whose behalf a use-case runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_tenant(&self) -> bool {
        self.role == UserRole::Tenant
    }

    /// Fail with `Forbidden(message)` unless the actor holds one of `roles`.
    pub fn require(&self, roles: &[UserRole], message: &str) -> DomainResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(message.to_string()))
        }
    }

    pub fn require_staff(&self, message: &str) -> DomainResult<()> {
        self.require(STAFF, message)
    }

    pub fn require_tenant(&self, message: &str) -> DomainResult<()> {
        self.require(&[UserRole::Tenant], message)
    }
}

pub const STAFF: &[UserRole] = &[
    UserRole::Admin,
    UserRole::PropertyManager,
    UserRole::Landlord,
];
