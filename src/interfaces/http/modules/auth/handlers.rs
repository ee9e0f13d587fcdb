//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{
    ChangePasswordRequest, CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest,
};
use crate::application::identity::{Registration, UserService};
use crate::domain::UserRole;
use crate::interfaces::http::common::{
    domain_error, parse_field, ApiError, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::users::UserDto;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError<LoginResponse>> {
    let result = state
        .user_service
        .login(request.username.trim(), &request.password)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserDto>),
        (status = 400, description = "Rejected by a business rule"),
        (status = 409, description = "Username, email or phone already taken"),
        (status = 422, description = "Invalid fields")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError<UserDto>> {
    let role = parse_field("role", &request.role, UserRole::parse)?;
    let terms_accepted = request.terms_accepted;
    let user = state
        .user_service
        .register(Registration {
            user: request.account(),
            role,
            terms_accepted,
        })
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<CurrentUserResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<CurrentUserResponse>>, ApiError<CurrentUserResponse>> {
    let current = state
        .user_service
        .me(&user.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(current.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 401, description = "Wrong current password")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state
        .user_service
        .change_password(&user.actor(), &request.current_password, &request.new_password)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
