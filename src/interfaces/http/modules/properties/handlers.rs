//! Property catalogue handlers
//!
//! Listing and detail routes are public and sit behind the optional auth
//! layer, so an owner or manager can still see an inactive property.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    AddImageRequest, AmenityDto, AssignManagerRequest, CreateAmenityRequest,
    CreatePropertyRequest, CreateUnitRequest, ImageDto, PropertyDetailDto, PropertyDto,
    PropertyListingDto, UnitDetailDto, UnitDto, UnitsQuery, UpdatePropertyRequest,
    UpdateUnitRequest,
};
use crate::application::properties::PropertyService;
use crate::application::Actor;
use crate::interfaces::http::common::{
    bad_request, domain_error, ApiError, ApiResponse, EmptyData, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct PropertyHandlerState {
    pub property_service: Arc<PropertyService>,
}

fn caller(user: &Option<Extension<AuthenticatedUser>>) -> Option<Actor> {
    user.as_ref().map(|Extension(u)| u.actor())
}

// ── Properties ──────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = "Properties",
    responses((status = 200, description = "Active properties", body = ApiResponse<Vec<PropertyListingDto>>))
)]
pub async fn list_properties(
    State(state): State<PropertyHandlerState>,
) -> Result<Json<ApiResponse<Vec<PropertyListingDto>>>, ApiError<Vec<PropertyListingDto>>> {
    let listings = state
        .property_service
        .list_properties()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        listings.into_iter().map(PropertyListingDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    tag = "Properties",
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property with amenities, images and units", body = ApiResponse<PropertyDetailDto>),
        (status = 404, description = "Not found or inactive")
    )
)]
pub async fn get_property(
    State(state): State<PropertyHandlerState>,
    user: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PropertyDetailDto>>, ApiError<PropertyDetailDto>> {
    let actor = caller(&user);
    let detail = state
        .property_service
        .get_property(actor.as_ref(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(detail.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/mine",
    tag = "Properties",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Properties the caller owns, manages or rents in", body = ApiResponse<Vec<PropertyDto>>))
)]
pub async fn my_properties(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<PropertyDto>>>, ApiError<Vec<PropertyDto>>> {
    let properties = state
        .property_service
        .accessible_properties(&user.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        properties.into_iter().map(PropertyDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property listed", body = ApiResponse<PropertyDto>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn add_property(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PropertyDto>>), ApiError<PropertyDto>> {
    let new = request.into_new().map_err(bad_request)?;
    let property = state
        .property_service
        .add_property(&user.actor(), new)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(property.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/properties/{id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property ID")),
    request_body = UpdatePropertyRequest,
    responses(
        (status = 200, description = "Property updated", body = ApiResponse<PropertyDto>),
        (status = 403, description = "No access to this property")
    )
)]
pub async fn update_property(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdatePropertyRequest>,
) -> Result<Json<ApiResponse<PropertyDto>>, ApiError<PropertyDto>> {
    let changes = request.into_changes().map_err(bad_request)?;
    let property = state
        .property_service
        .update_property(&user.actor(), id, changes)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(property.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/properties/{id}/manager",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property ID")),
    request_body = AssignManagerRequest,
    responses(
        (status = 200, description = "Manager assigned", body = ApiResponse<PropertyDto>),
        (status = 403, description = "Owner or administrator only")
    )
)]
pub async fn assign_manager(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<AssignManagerRequest>,
) -> Result<Json<ApiResponse<PropertyDto>>, ApiError<PropertyDto>> {
    let property = state
        .property_service
        .assign_manager(&user.actor(), id, request.manager_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(property.into())))
}

// ── Images ──────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/images",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Property ID")),
    request_body = AddImageRequest,
    responses((status = 201, description = "Image added", body = ApiResponse<ImageDto>))
)]
pub async fn add_image(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<AddImageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ImageDto>>), ApiError<ImageDto>> {
    let image = state
        .property_service
        .add_image(&user.actor(), id, request.into_new())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(image.into()))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}/images/{image_id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Property ID"),
        ("image_id" = i32, Path, description = "Image ID")
    ),
    responses((status = 200, description = "Image removed", body = ApiResponse<EmptyData>))
)]
pub async fn delete_image(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, image_id)): Path<(i32, i32)>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError<EmptyData>> {
    state
        .property_service
        .delete_image(&user.actor(), id, image_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

// ── Units ───────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/units",
    tag = "Units",
    params(UnitsQuery),
    responses((status = 200, description = "Units of a property", body = ApiResponse<Vec<UnitDto>>))
)]
pub async fn list_units(
    State(state): State<PropertyHandlerState>,
    user: Option<Extension<AuthenticatedUser>>,
    Query(query): Query<UnitsQuery>,
) -> Result<Json<ApiResponse<Vec<UnitDto>>>, ApiError<Vec<UnitDto>>> {
    let actor = caller(&user);
    let units = state
        .property_service
        .list_units(actor.as_ref(), query.property_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        units.into_iter().map(UnitDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/units/{id}",
    tag = "Units",
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit with its property", body = ApiResponse<UnitDetailDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_unit(
    State(state): State<PropertyHandlerState>,
    user: Option<Extension<AuthenticatedUser>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UnitDetailDto>>, ApiError<UnitDetailDto>> {
    let actor = caller(&user);
    let found = state
        .property_service
        .get_unit(actor.as_ref(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(found.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/units",
    tag = "Units",
    security(("bearer_auth" = [])),
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Unit added", body = ApiResponse<UnitDto>),
        (status = 409, description = "Unit number already used in this property")
    )
)]
pub async fn add_unit(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateUnitRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UnitDto>>), ApiError<UnitDto>> {
    let new = request.into_new().map_err(bad_request)?;
    let unit = state
        .property_service
        .add_unit(&user.actor(), new)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(unit.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/units/{id}",
    tag = "Units",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Unit ID")),
    request_body = UpdateUnitRequest,
    responses((status = 200, description = "Unit updated", body = ApiResponse<UnitDto>))
)]
pub async fn update_unit(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateUnitRequest>,
) -> Result<Json<ApiResponse<UnitDto>>, ApiError<UnitDto>> {
    let changes = request.into_changes().map_err(bad_request)?;
    let unit = state
        .property_service
        .update_unit(&user.actor(), id, changes)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(unit.into())))
}

// ── Amenities ───────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/amenities",
    tag = "Amenities",
    responses((status = 200, description = "All amenities", body = ApiResponse<Vec<AmenityDto>>))
)]
pub async fn list_amenities(
    State(state): State<PropertyHandlerState>,
) -> Result<Json<ApiResponse<Vec<AmenityDto>>>, ApiError<Vec<AmenityDto>>> {
    let amenities = state
        .property_service
        .list_amenities()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        amenities.into_iter().map(AmenityDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/amenities",
    tag = "Amenities",
    security(("bearer_auth" = [])),
    request_body = CreateAmenityRequest,
    responses(
        (status = 201, description = "Amenity added", body = ApiResponse<AmenityDto>),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn add_amenity(
    State(state): State<PropertyHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateAmenityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AmenityDto>>), ApiError<AmenityDto>> {
    let amenity = state
        .property_service
        .add_amenity(
            &user.actor(),
            &request.name,
            &request.description,
            &request.icon,
        )
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(amenity.into()))))
}
