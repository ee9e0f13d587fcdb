//! User management, profile and dashboard handlers
//!
//! Visibility and role rules live in `UserService`; handlers translate
//! wire values and map domain errors.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    ChangeRoleRequest, CreateUserRequest, DashboardResponse, ListUsersParams, ProfileDto,
    UpdateProfileRequest, UpdateUserRequest, UserDto,
};
use crate::application::identity::UserService;
use crate::domain::user::GetUserDto;
use crate::domain::UserRole;
use crate::interfaces::http::common::{
    bad_request, domain_error, parse_field, ApiError, ApiResponse, EmptyData, PaginatedResponse,
    ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "Users visible to the caller", body = PaginatedResponse<UserDto>),
        (status = 403, description = "Tenants cannot list users")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<PaginatedResponse<UserDto>>, ApiError<()>> {
    let role = match params.role.as_deref() {
        Some(r) => Some(parse_field("role", r, UserRole::parse)?),
        None => None,
    };
    let dto = GetUserDto {
        search: params.search,
        role,
        page: Some(params.page),
        page_size: Some(params.page_size),
        sort_by: params.sort_by,
        ..Default::default()
    };
    let result = state
        .user_service
        .list_users(&user.actor(), dto)
        .await
        .map_err(domain_error)?;
    Ok(Json(PaginatedResponse::from_result(result, UserDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found or not visible")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let found = state
        .user_service
        .get_user(&user.actor(), &id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(found.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 403, description = "Administrators only"),
        (status = 409, description = "Username, email or phone already taken")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError<UserDto>> {
    let role = parse_field("role", &request.role, UserRole::parse)?;
    let created = state
        .user_service
        .create_user(&user.actor(), request.account(), role)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/tenants",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Tenant account created", body = ApiResponse<UserDto>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn add_tenant(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError<UserDto>> {
    let created = state
        .user_service
        .add_tenant(&user.actor(), request.account())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 403, description = "Not allowed to change this user"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let role = match request.role.as_deref() {
        Some(r) => Some(parse_field("role", r, UserRole::parse)?),
        None => None,
    };
    let updated = state
        .user_service
        .update_user(&user.actor(), &id, request.into_dto(role))
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<EmptyData>),
        (status = 400, description = "Cannot delete own account"),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state
        .user_service
        .delete_user(&user.actor(), &id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role and group changed", body = ApiResponse<UserDto>),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn change_role(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let role = parse_field("role", &request.role, UserRole::parse)?;
    let updated = state
        .user_service
        .change_role(&user.actor(), &id, role)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own profile", body = ApiResponse<ProfileDto>))
)]
pub async fn get_profile(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError<ProfileDto>> {
    let profile = state
        .user_service
        .get_profile(&user.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(profile.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<ProfileDto>),
        (status = 409, description = "Email or phone already taken")
    )
)]
pub async fn update_profile(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<ProfileDto>>, ApiError<ProfileDto>> {
    let dto = request.into_dto().map_err(bad_request)?;
    let profile = state
        .user_service
        .update_profile(&user.actor(), dto)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(profile.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Role-specific dashboard", body = ApiResponse<DashboardResponse>))
)]
pub async fn dashboard(
    State(state): State<UserHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError<DashboardResponse>> {
    let dashboard = state
        .user_service
        .dashboard(&user.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(dashboard.into())))
}
