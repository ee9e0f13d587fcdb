//! `x-request-id` correlation
//!
//! An incoming id is kept when it is short printable ASCII; otherwise a
//! fresh UUID is issued. The id is stored as a [`RequestId`] extension,
//! attached to a `request` span and echoed on the response.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_INCOMING_LEN: usize = 128;

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

fn incoming_id(request: &Request<Body>) -> Option<String> {
    let raw = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let usable = !raw.is_empty()
        && raw.len() <= MAX_INCOMING_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| raw.to_string())
}

pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = incoming_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());
    request.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Extension, Router};
    use tower::Service;

    async fn echo(Extension(RequestId(id)): Extension<RequestId>) -> String {
        id
    }

    async fn call(header: Option<&str>) -> (String, String) {
        let mut app = Router::new()
            .route("/", get(echo))
            .layer(axum::middleware::from_fn(request_id_middleware))
            .into_service();
        let mut req = Request::builder().uri("/");
        if let Some(h) = header {
            req = req.header(REQUEST_ID_HEADER, h);
        }
        let resp = app.call(req.body(Body::empty()).unwrap()).await.unwrap();
        let echoed = resp.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (echoed, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn propagates_caller_id() {
        let (header, body) = call(Some("mpesa-callback-42")).await;
        assert_eq!(header, "mpesa-callback-42");
        assert_eq!(body, "mpesa-callback-42");
    }

    #[tokio::test]
    async fn replaces_missing_or_unusable_id() {
        let (header, body) = call(None).await;
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(header, body);

        let long = "x".repeat(MAX_INCOMING_LEN + 1);
        let (header, _) = call(Some(&long)).await;
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
