//! Reservation handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateReservationRequest, ListReservationsParams, ReservationDto};
use crate::application::ReservationService;
use crate::domain::ReservationStatus;
use crate::interfaces::http::common::{
    domain_error, parse_field, ApiError, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ReservationHandlerState {
    pub reservation_service: Arc<ReservationService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Unit held until the deposit is paid", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Unit unavailable or move-in date in the past"),
        (status = 403, description = "Tenants only"),
        (status = 409, description = "Unit already held")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError<ReservationDto>> {
    let reservation = state
        .reservation_service
        .reserve(
            &user.actor(),
            request.unit_id,
            request.intended_move_in_date,
            &request.notes,
        )
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(reservation.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(ListReservationsParams),
    responses((status = 200, description = "Reservations visible to the caller", body = ApiResponse<Vec<ReservationDto>>))
)]
pub async fn list_reservations(
    State(state): State<ReservationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<ListReservationsParams>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError<Vec<ReservationDto>>> {
    let status = match params.status.as_deref() {
        Some(s) => Some(parse_field("status", s, ReservationStatus::parse)?),
        None => None,
    };
    let reservations = state
        .reservation_service
        .list(&user.actor(), status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError<ReservationDto>> {
    let reservation = state
        .reservation_service
        .get(&user.actor(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Reservation is no longer pending"),
        (status = 403, description = "Not your reservation")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError<ReservationDto>> {
    let reservation = state
        .reservation_service
        .cancel(&user.actor(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
