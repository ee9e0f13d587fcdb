//! JSON body extractor that also runs `validator` rules
//!
//! Malformed JSON is a 400; a body that parses but breaks a field rule is
//! a 422 whose message lists `field: message` pairs.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

/// Drop-in replacement for `axum::Json<T>` on request bodies.
///
/// ```ignore
/// async fn reserve(ValidatedJson(body): ValidatedJson<CreateReservationRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    JsonError(JsonRejection),
    ValidationError(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection.body_text()));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::ValidationError(errors) => {
                let mut field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| {
                            let msg = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            format!("{}: {}", field, msg)
                        })
                    })
                    .collect();
                field_errors.sort();

                let message = if field_errors.is_empty() {
                    "Validation failed".to_string()
                } else {
                    field_errors.join("; ")
                };

                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct RentBody {
        #[validate(range(min = 1, max = 6, message = "months must be 1-6"))]
        months: i32,
        #[validate(length(min = 12, max = 12, message = "phone must be 12 digits"))]
        phone_number: String,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<RentBody>) -> String {
        body.months.to_string()
    }

    async fn send(body: Body) -> (StatusCode, serde_json::Value) {
        use tower::Service;
        let req = Request::builder()
            .method("POST")
            .uri("/rent")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let mut svc = Router::new().route("/rent", post(handler)).into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let body = serde_json::json!({"months": 3, "phone_number": "254712345678"});
        let (status, _) = send(Body::from(body.to_string())).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, json) = send(Body::from("{months: 3")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn rule_violations_are_422_with_field_messages() {
        let body = serde_json::json!({"months": 9, "phone_number": "0712"});
        let (status, json) = send(Body::from(body.to_string())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json["error"],
            "months: months must be 1-6; phone_number: phone must be 12 digits"
        );
    }
}
