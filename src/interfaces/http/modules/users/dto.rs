//! User, profile and dashboard DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::identity::{Dashboard, NewUser};
use crate::domain::user::{Language, UpdateProfileDto, UpdateUserDto};
use crate::domain::{User, UserProfile};
use crate::interfaces::http::modules::properties::{PropertyDto, UnitDto};
use crate::interfaces::http::modules::reservations::ReservationDto;
use crate::shared::validate_kenyan_phone;

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// `ADMIN`, `PROPERTY_MANAGER`, `LANDLORD` or `TENANT`
    pub role: String,
    pub role_display: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            full_name: u.full_name(),
            role: u.role.as_str().to_string(),
            role_display: u.role.display_name().to_string(),
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone_number: u.phone_number,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

/// Staff-created account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 150, message = "username must be 3-150 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(custom(function = "validate_kenyan_phone"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    pub password_confirm: String,
    /// Ignored when adding a tenant
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "TENANT".to_string()
}

impl CreateUserRequest {
    pub fn account(self) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            password: self.password,
            password_confirm: self.password_confirm,
        }
    }
}

/// Partial update; only administrators may send `role` or `is_active`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Empty string clears the number
    pub phone_number: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn into_dto(self, role: Option<crate::domain::UserRole>) -> UpdateUserDto {
        UpdateUserDto {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number.map(Some),
            role,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Matches username, email, first or last name
    pub search: Option<String>,
    /// Role filter, e.g. `TENANT`
    pub role: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// `username`, `email`, `created_at` or `-created_at`
    pub sort_by: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileDto {
    pub user: UserDto,
    pub date_of_birth: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub county: Option<String>,
    pub town: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    /// `en` or `sw`
    pub preferred_language: String,
    pub email_notifications: bool,
    pub sms_notifications: bool,
}

impl From<(User, UserProfile)> for ProfileDto {
    fn from((user, p): (User, UserProfile)) -> Self {
        Self {
            user: user.into(),
            date_of_birth: p.date_of_birth,
            national_id: p.national_id,
            county: p.county,
            town: p.town,
            address: p.address,
            emergency_contact_name: p.emergency_contact_name,
            emergency_contact_phone: p.emergency_contact_phone,
            preferred_language: p.preferred_language.as_str().to_string(),
            email_notifications: p.email_notifications,
            sms_notifications: p.sms_notifications,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub national_id: Option<String>,
    #[validate(length(max = 50))]
    pub county: Option<String>,
    #[validate(length(max = 100))]
    pub town: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    /// `en` or `sw`
    pub preferred_language: Option<String>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
}

impl UpdateProfileRequest {
    pub fn into_dto(self) -> Result<UpdateProfileDto, String> {
        let preferred_language = match self.preferred_language.as_deref() {
            None => None,
            Some(code) => Some(
                Language::parse(code).ok_or_else(|| format!("Unknown language '{}'", code))?,
            ),
        };
        Ok(UpdateProfileDto {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            date_of_birth: self.date_of_birth,
            national_id: self.national_id,
            county: self.county,
            town: self.town,
            address: self.address,
            emergency_contact_name: self.emergency_contact_name,
            emergency_contact_phone: self.emergency_contact_phone,
            preferred_language,
            email_notifications: self.email_notifications,
            sms_notifications: self.sms_notifications,
        })
    }
}

/// Role-specific landing data
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardResponse {
    Admin {
        total_properties: u64,
        total_units: u64,
        total_users: u64,
        pending_payments: u64,
    },
    Staff {
        role: String,
        properties: Vec<PropertyDto>,
    },
    Tenant {
        units: Vec<UnitDto>,
        reservations: Vec<ReservationDto>,
    },
}

impl From<Dashboard> for DashboardResponse {
    fn from(d: Dashboard) -> Self {
        match d {
            Dashboard::Admin {
                properties,
                units,
                users,
                pending_payments,
            } => Self::Admin {
                total_properties: properties,
                total_units: units,
                total_users: users,
                pending_payments,
            },
            Dashboard::Staff { role, properties } => Self::Staff {
                role: role.as_str().to_string(),
                properties: properties.into_iter().map(PropertyDto::from).collect(),
            },
            Dashboard::Tenant {
                units,
                reservations,
            } => Self::Tenant {
                units: units.into_iter().map(UnitDto::from).collect(),
                reservations: reservations.into_iter().map(ReservationDto::from).collect(),
            },
        }
    }
}
