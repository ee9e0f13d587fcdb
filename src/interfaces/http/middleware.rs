//! Bearer-token authentication middleware
//!
//! The token only proves who the caller is. Role and active flag are read
//! from the stored account on every request.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::application::{Actor, UserService};
use crate::domain::{DomainError, User, UserRole};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::common::ApiResponse;

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    /// Token is valid but the account was deleted or deactivated.
    InactiveAccount,
    Storage(DomainError),
}

/// State for the auth middlewares
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub user_service: Arc<UserService>,
}

/// Caller identity resolved from the access token and the stored account
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn actor(&self) -> Actor {
        Actor::new(&self.user_id, &self.username, self.role)
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ").map(str::trim)
}

async fn authenticate(
    headers: &header::HeaderMap,
    state: &AuthState,
) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = extract_token(auth_header).ok_or(AuthError::InvalidToken)?;

    let claims = verify_token(token, &state.jwt_config).map_err(|e| {
        debug!(error = %e, "Rejected access token");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        }
    })?;
    if claims.is_expired() {
        return Err(AuthError::ExpiredToken);
    }

    let user = state
        .user_service
        .active_account(&claims.sub)
        .await
        .map_err(AuthError::Storage)?
        .ok_or(AuthError::InactiveAccount)?;
    Ok(user.into())
}

/// Reject the request unless it carries a valid bearer token for an active
/// account.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(request.headers(), &auth_state).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Attach the caller when a valid token is present; anonymous otherwise.
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Ok(user) = authenticate(request.headers(), &auth_state).await {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::InactiveAccount => (
            StatusCode::UNAUTHORIZED,
            "Account is disabled or no longer exists",
        ),
        AuthError::Storage(e) => {
            error!(error = %e, "Failed to load account for token");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{CreateUserDto, UpdateUserDto};
    use crate::domain::RepositoryProvider;
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::InMemoryStorage;
    use axum::routing::get;
    use axum::{Extension, Router};

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        format!("{}:{}", user.username, user.role)
    }

    async fn maybe(user: Option<Extension<AuthenticatedUser>>) -> String {
        user.map(|Extension(u)| u.username).unwrap_or_else(|| "anonymous".into())
    }

    struct Fixture {
        repos: Arc<InMemoryStorage>,
        config: JwtConfig,
        router: Router,
    }

    impl Fixture {
        fn new() -> Self {
            let repos = Arc::new(InMemoryStorage::new());
            let config = JwtConfig::new("middleware-secret", 1);
            let state = AuthState {
                jwt_config: config.clone(),
                user_service: Arc::new(UserService::new(repos.clone(), config.clone())),
            };
            let protected = Router::new()
                .route("/me", get(whoami))
                .layer(axum::middleware::from_fn_with_state(state.clone(), auth_middleware));
            let open = Router::new()
                .route("/open", get(maybe))
                .layer(axum::middleware::from_fn_with_state(state, optional_auth_middleware));
            Self {
                repos,
                config,
                router: protected.merge(open),
            }
        }

        async fn user(&self, username: &str, role: UserRole) -> (String, String) {
            let user = self
                .repos
                .users()
                .create_user(CreateUserDto {
                    username: username.into(),
                    email: format!("{}@example.co.ke", username),
                    first_name: username.into(),
                    last_name: "Njoroge".into(),
                    phone_number: None,
                    role,
                    password_hash: "x".into(),
                })
                .await
                .unwrap();
            let token = create_token(&user.id, &user.username, user.role, &self.config).unwrap();
            (user.id, token)
        }

        async fn call(&self, uri: &str, token: Option<&str>) -> (StatusCode, String) {
            use tower::Service;
            let mut req = Request::builder().uri(uri);
            if let Some(token) = token {
                req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let resp = self
                .router
                .clone()
                .into_service()
                .call(req.body(Body::empty()).unwrap())
                .await
                .unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            (status, String::from_utf8_lossy(&bytes).into_owned())
        }
    }

    #[tokio::test]
    async fn protected_route_requires_valid_token() {
        let fx = Fixture::new();
        let (id, token) = fx.user("amina", UserRole::Landlord).await;

        assert_eq!(fx.call("/me", None).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(fx.call("/me", Some("garbage")).await.0, StatusCode::UNAUTHORIZED);

        let other = JwtConfig::new("other-secret", 1);
        let forged = create_token(&id, "amina", UserRole::Admin, &other).unwrap();
        assert_eq!(fx.call("/me", Some(&forged)).await.0, StatusCode::UNAUTHORIZED);

        let (status, body) = fx.call("/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "amina:LANDLORD");
    }

    #[tokio::test]
    async fn role_comes_from_the_stored_account() {
        let fx = Fixture::new();
        let (id, token) = fx.user("otieno", UserRole::Landlord).await;

        fx.repos
            .users()
            .update_user(
                &id,
                UpdateUserDto {
                    role: Some(UserRole::Tenant),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(fx.call("/me", Some(&token)).await.1, "otieno:TENANT");
    }

    #[tokio::test]
    async fn deactivated_or_deleted_account_is_rejected() {
        let fx = Fixture::new();
        let (id, token) = fx.user("mwangi", UserRole::Tenant).await;

        fx.repos
            .users()
            .update_user(
                &id,
                UpdateUserDto {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(fx.call("/me", Some(&token)).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(fx.call("/open", Some(&token)).await.1, "anonymous");

        let (id, token) = fx.user("chebet", UserRole::Tenant).await;
        fx.repos.users().delete_user(&id).await.unwrap();
        assert_eq!(fx.call("/me", Some(&token)).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn optional_route_allows_anonymous() {
        let fx = Fixture::new();
        let (_, token) = fx.user("baraka", UserRole::Tenant).await;
        assert_eq!(fx.call("/open", None).await.1, "anonymous");
        assert_eq!(fx.call("/open", Some("garbage")).await.1, "anonymous");
        assert_eq!(fx.call("/open", Some(&token)).await.1, "baraka");
    }
}
