//! Domain error to HTTP status mapping

use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler result
pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
    }
}

/// Build the error response for a failed use-case. Storage failures are
/// logged and reported without detail.
pub fn domain_error<T>(e: DomainError) -> ApiError<T> {
    let status = status_for(&e);
    let message = match e {
        DomainError::Storage(e) => {
            error!(error = %e, "Request failed on storage");
            "Internal server error".to_string()
        }
        DomainError::NotFound { entity, .. } => format!("{} not found", entity),
        DomainError::Validation(m)
        | DomainError::Conflict(m)
        | DomainError::Unauthorized(m)
        | DomainError::Forbidden(m) => m,
    };
    (status, Json(ApiResponse::error(message)))
}

pub fn bad_request<T>(message: impl Into<String>) -> ApiError<T> {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

/// Parse a wire value with `parse`, or fail with 400 naming the field.
pub fn parse_field<V, T>(
    field: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<V>,
) -> Result<V, ApiError<T>> {
    parse(value).ok_or_else(|| bad_request(format!("Unknown {} '{}'", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::InfraError;

    #[test]
    fn statuses() {
        assert_eq!(
            status_for(&DomainError::not_found("Property", "id", 3)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_for(&DomainError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&DomainError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(status_for(&DomainError::Unauthorized("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&DomainError::Forbidden("x".into())), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(&InfraError::Database(sea_orm::DbErr::Custom("locked".into())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_field_value_is_bad_request() {
        let err = parse_field::<u8, ()>("role", "OWNER", |_| None).unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1 .0.error.as_deref(), Some("Unknown role 'OWNER'"));
    }

    #[test]
    fn message_drops_variant_prefix() {
        let (status, Json(body)) =
            domain_error::<()>(DomainError::Conflict("This unit is already reserved".into()));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error.as_deref(), Some("This unit is already reserved"));

        let (_, Json(body)) = domain_error::<()>(DomainError::not_found("RentalUnit", "id", 9));
        assert_eq!(body.error.as_deref(), Some("RentalUnit not found"));

        let (_, Json(body)) =
            domain_error::<()>(InfraError::Database(sea_orm::DbErr::Custom("disk full".into())).into());
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }
}
