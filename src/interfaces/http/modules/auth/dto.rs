//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::identity::{AuthResult, CurrentUser, NewUser};
use crate::interfaces::http::modules::users::UserDto;
use crate::shared::validate_kenyan_phone;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username or email
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds
    pub expires_in: i64,
    pub user: UserDto,
}

impl From<AuthResult> for LoginResponse {
    fn from(r: AuthResult) -> Self {
        Self {
            token: r.token,
            token_type: r.token_type,
            expires_in: r.expires_in,
            user: r.user.into(),
        }
    }
}

/// Public sign-up; admin accounts cannot be self-registered
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
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
    /// `TENANT`, `LANDLORD` or `PROPERTY_MANAGER`
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub terms_accepted: bool,
}

fn default_role() -> String {
    "TENANT".to_string()
}

impl RegisterRequest {
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

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128, message = "new password must be 8-128 characters"))]
    pub new_password: String,
}

/// The caller with their permission group
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: UserDto,
    pub group: String,
    pub permissions: Vec<String>,
}

impl From<CurrentUser> for CurrentUserResponse {
    fn from(c: CurrentUser) -> Self {
        Self {
            group: c.group.name().to_string(),
            permissions: c.group.permissions.iter().map(|p| p.to_string()).collect(),
            user: c.user.into(),
        }
    }
}
