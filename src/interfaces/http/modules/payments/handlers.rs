//! Payment handlers
//!
//! Tenant routes pay and read receipts; staff routes list, inspect and
//! settle payments and refund deposits.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    DepositDto, PaymentDashboardDto, PaymentDto, PaymentListingDto, PaymentOptionsDto,
    PaymentViewDto, PaymentsQuery, RefundDepositRequest, RentPaymentRequest,
    SecurityDepositRequest, UpdatePaymentStatusRequest,
};
use crate::application::payments::{PaymentQuery, PaymentService};
use crate::domain::{PaymentStatus, PaymentType};
use crate::interfaces::http::common::{
    bad_request, domain_error, parse_field, ApiError, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct PaymentHandlerState {
    pub payment_service: Arc<PaymentService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/dashboard",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tenant's units, deposits and recent payments", body = ApiResponse<PaymentDashboardDto>),
        (status = 403, description = "Tenants only")
    )
)]
pub async fn payment_dashboard(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<PaymentDashboardDto>>, ApiError<PaymentDashboardDto>> {
    let dashboard = state
        .payment_service
        .dashboard(&user.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(dashboard.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/options",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Units the tenant can pay for", body = ApiResponse<PaymentOptionsDto>),
        (status = 400, description = "No rented or reserved units")
    )
)]
pub async fn payment_options(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<PaymentOptionsDto>>, ApiError<PaymentOptionsDto>> {
    let options = state
        .payment_service
        .options(&user.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(options.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/security-deposit",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = SecurityDepositRequest,
    responses(
        (status = 201, description = "Deposit payment submitted", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Invalid payment details or deposit already paid"),
        (status = 404, description = "Unit not rented or held by the caller")
    )
)]
pub async fn pay_security_deposit(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<SecurityDepositRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentDto>>), ApiError<PaymentDto>> {
    let method = request.method.into_input().map_err(bad_request)?;
    let payment = state
        .payment_service
        .pay_security_deposit(&user.actor(), request.unit_id, method)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(payment.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments/rent",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RentPaymentRequest,
    responses(
        (status = 201, description = "Rent payment submitted", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Invalid payment details"),
        (status = 404, description = "Unit not rented by the caller")
    )
)]
pub async fn pay_rent(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RentPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentDto>>), ApiError<PaymentDto>> {
    let method = request.method.into_input().map_err(bad_request)?;
    let payment = state
        .payment_service
        .pay_rent(&user.actor(), request.unit_id, request.months, method)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(payment.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_id}/receipt",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("payment_id" = String, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Receipt for the caller's payment", body = ApiResponse<PaymentViewDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn payment_receipt(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(payment_id): Path<String>,
) -> Result<Json<ApiResponse<PaymentViewDto>>, ApiError<PaymentViewDto>> {
    let view = state
        .payment_service
        .payment_success(&user.actor(), &payment_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(view.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(PaymentsQuery),
    responses(
        (status = 200, description = "Payments on accessible properties", body = ApiResponse<PaymentListingDto>),
        (status = 403, description = "Staff only")
    )
)]
pub async fn list_payments(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<PaymentsQuery>,
) -> Result<Json<ApiResponse<PaymentListingDto>>, ApiError<PaymentListingDto>> {
    let status = match params.status.as_deref() {
        Some(s) => Some(parse_field("status", s, PaymentStatus::parse)?),
        None => None,
    };
    let payment_type = match params.payment_type.as_deref() {
        Some(t) => Some(parse_field("payment type", t, PaymentType::parse)?),
        None => None,
    };
    let listing = state
        .payment_service
        .view_payments(
            &user.actor(),
            PaymentQuery {
                status,
                payment_type,
                search: params.search,
                page: params.page,
            },
        )
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(listing.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{payment_id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("payment_id" = String, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment with method details", body = ApiResponse<PaymentViewDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn payment_details(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(payment_id): Path<String>,
) -> Result<Json<ApiResponse<PaymentViewDto>>, ApiError<PaymentViewDto>> {
    let view = state
        .payment_service
        .payment_details(&user.actor(), &payment_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(view.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/payments/{payment_id}/status",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("payment_id" = String, Path, description = "Payment ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<PaymentDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Administrator or managing property manager only")
    )
)]
pub async fn update_payment_status(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(payment_id): Path<String>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<ApiResponse<PaymentDto>>, ApiError<PaymentDto>> {
    let payment = state
        .payment_service
        .update_status(&user.actor(), &payment_id, &request.status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/deposits/{id}/refund",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Security deposit ID")),
    request_body = RefundDepositRequest,
    responses(
        (status = 200, description = "Deposit refunded", body = ApiResponse<DepositDto>),
        (status = 400, description = "Unpaid, already refunded or amount out of range")
    )
)]
pub async fn refund_deposit(
    State(state): State<PaymentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<RefundDepositRequest>,
) -> Result<Json<ApiResponse<DepositDto>>, ApiError<DepositDto>> {
    let deposit = state
        .payment_service
        .refund_deposit(&user.actor(), id, request.amount)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(deposit.into())))
}
