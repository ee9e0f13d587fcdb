//! User repository DTOs

use chrono::NaiveDate;

use super::{Language, UserRole};

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct GetUserDto {
    /// Matches username, email, first or last name
    pub search: Option<String>,
    pub role: Option<UserRole>,
    /// Restrict results to these roles (visibility scope)
    pub roles_in: Option<Vec<UserRole>>,
    /// Restrict results to a single user (visibility scope)
    pub only_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` clears the number
    pub phone_number: Option<Option<String>>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub national_id: Option<String>,
    pub county: Option<String>,
    pub town: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub preferred_language: Option<Language>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
}
