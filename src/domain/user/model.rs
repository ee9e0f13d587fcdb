//! User domain entities

use chrono::{DateTime, NaiveDate, Utc};

/// User role. Every user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    Admin,
    PropertyManager,
    Landlord,
    #[default]
    Tenant,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::PropertyManager,
        UserRole::Landlord,
        UserRole::Tenant,
    ];

    /// Stored value; also the name of the role's permission group.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::PropertyManager => "PROPERTY_MANAGER",
            Self::Landlord => "LANDLORD",
            Self::Tenant => "TENANT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "ADMIN" => Some(Self::Admin),
            "PROPERTY_MANAGER" => Some(Self::PropertyManager),
            "LANDLORD" => Some(Self::Landlord),
            "TENANT" => Some(Self::Tenant),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::PropertyManager => "Property Manager",
            Self::Landlord => "Landlord",
            Self::Tenant => "Tenant",
        }
    }

    /// Roles that may sign themselves up without an administrator.
    pub fn is_self_registrable(&self) -> bool {
        !matches!(self, Self::Admin)
    }

    /// Admin, property manager and landlord: the roles that manage stock.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Self::Tenant)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn display_label(&self) -> String {
        format!("{} ({})", self.full_name(), self.role.display_name())
    }
}

/// Preferred UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Swahili,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Swahili => "sw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Self::English),
            "sw" => Some(Self::Swahili),
            _ => None,
        }
    }
}

/// Extended contact details, one per user
#[derive(Clone, Debug)]
pub struct UserProfile {
    pub user_id: String,
    pub date_of_birth: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub county: Option<String>,
    pub town: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub preferred_language: Language,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn empty(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            date_of_birth: None,
            national_id: None,
            county: None,
            town: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            preferred_language: Language::English,
            email_notifications: true,
            sms_notifications: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_accepts_stored_and_display_forms() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
            assert_eq!(UserRole::parse(role.display_name()), Some(role));
        }
        assert_eq!(UserRole::parse("property-manager"), Some(UserRole::PropertyManager));
        assert_eq!(UserRole::parse("superuser"), None);
    }

    #[test]
    fn default_role_is_tenant() {
        assert_eq!(UserRole::default(), UserRole::Tenant);
        assert!(!UserRole::Tenant.is_staff());
        assert!(UserRole::Landlord.is_staff());
    }

    #[test]
    fn admin_cannot_self_register() {
        assert!(!UserRole::Admin.is_self_registrable());
        assert!(UserRole::Landlord.is_self_registrable());
    }

    #[test]
    fn new_profile_defaults() {
        let p = UserProfile::empty("u1");
        assert_eq!(p.preferred_language, Language::English);
        assert!(p.email_notifications);
        assert!(p.sms_notifications);
    }
}
