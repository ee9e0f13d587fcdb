//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{PaymentService, PropertyService, ReservationService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, optional_auth_middleware, AuthState};
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{self, http_metrics_middleware, MetricsState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{
    auth, payments, properties, reservations, users,
};

/// Application services the HTTP layer delegates to
#[derive(Clone)]
pub struct ApiServices {
    pub users: Arc<UserService>,
    pub properties: Arc<PropertyService>,
    pub reservations: Arc<ReservationService>,
    pub payments: Arc<PaymentService>,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::add_tenant,
        users::update_user,
        users::delete_user,
        users::change_role,
        users::get_profile,
        users::update_profile,
        users::dashboard,
        // Properties
        properties::list_properties,
        properties::get_property,
        properties::my_properties,
        properties::add_property,
        properties::update_property,
        properties::assign_manager,
        properties::add_image,
        properties::delete_image,
        properties::list_units,
        properties::get_unit,
        properties::add_unit,
        properties::update_unit,
        properties::list_amenities,
        properties::add_amenity,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::cancel_reservation,
        // Payments
        payments::payment_dashboard,
        payments::payment_options,
        payments::pay_security_deposit,
        payments::pay_rent,
        payments::payment_receipt,
        payments::list_payments,
        payments::payment_details,
        payments::update_payment_status,
        payments::refund_deposit,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            PaginatedResponse<users::UserDto>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::ChangePasswordRequest,
            auth::CurrentUserResponse,
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::ChangeRoleRequest,
            users::ProfileDto,
            users::UpdateProfileRequest,
            users::DashboardResponse,
            properties::PropertyDto,
            properties::PropertyListingDto,
            properties::PropertyDetailDto,
            properties::CreatePropertyRequest,
            properties::UpdatePropertyRequest,
            properties::AssignManagerRequest,
            properties::ImageDto,
            properties::AddImageRequest,
            properties::UnitDto,
            properties::UnitDetailDto,
            properties::CreateUnitRequest,
            properties::UpdateUnitRequest,
            properties::AmenityDto,
            properties::CreateAmenityRequest,
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            payments::PaymentMethodRequest,
            payments::SecurityDepositRequest,
            payments::RentPaymentRequest,
            payments::UpdatePaymentStatusRequest,
            payments::RefundDepositRequest,
            payments::PaymentDto,
            payments::PaymentMethodDetailsDto,
            payments::PaymentViewDto,
            payments::DepositDto,
            payments::PaymentDashboardDto,
            payments::PaymentOptionsDto,
            payments::PaymentSummaryDto,
            payments::PaymentListingDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration, login and password change"),
        (name = "Users", description = "User administration by role"),
        (name = "Profile", description = "Own profile and role dashboard"),
        (name = "Properties", description = "Property listings, managers and images"),
        (name = "Units", description = "Rental units and rent"),
        (name = "Amenities", description = "Amenity catalogue"),
        (name = "Reservations", description = "24-hour unit holds pending the security deposit"),
        (name = "Payments", description = "M-Pesa and card payments, receipts and deposit refunds"),
    ),
    info(
        title = "Rental Management API",
        version = "1.0.0",
        description = "Property listings, unit reservations and rent collection for Kenyan rentals",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the full application router.
pub fn create_api_router(
    services: ApiServices,
    jwt_config: JwtConfig,
    health_state: HealthState,
    metrics_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config,
        user_service: services.users.clone(),
    };
    let protect = || middleware::from_fn_with_state(auth_state.clone(), auth_middleware);
    let identify = || middleware::from_fn_with_state(auth_state.clone(), optional_auth_middleware);

    // ── Auth ────────────────────────────────────────────────
    let auth_handlers = auth::AuthHandlerState {
        user_service: services.users.clone(),
    };
    let auth_public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .with_state(auth_handlers.clone());
    let auth_protected = Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/change-password", put(auth::change_password))
        .layer(protect())
        .with_state(auth_handlers);

    // ── Users, profile, dashboard ───────────────────────────
    let user_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/tenants", post(users::add_tenant))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/role", put(users::change_role))
        .route("/profile", get(users::get_profile).put(users::update_profile))
        .route("/dashboard", get(users::dashboard))
        .layer(protect())
        .with_state(users::UserHandlerState {
            user_service: services.users.clone(),
        });

    // ── Catalogue: public reads, staff writes ───────────────
    let property_handlers = properties::PropertyHandlerState {
        property_service: services.properties.clone(),
    };
    let catalogue_public = Router::new()
        .route("/properties", get(properties::list_properties))
        .route("/properties/{id}", get(properties::get_property))
        .route("/units", get(properties::list_units))
        .route("/units/{id}", get(properties::get_unit))
        .route("/amenities", get(properties::list_amenities))
        .layer(identify())
        .with_state(property_handlers.clone());
    let catalogue_protected = Router::new()
        .route("/properties", post(properties::add_property))
        .route("/properties/mine", get(properties::my_properties))
        .route("/properties/{id}", put(properties::update_property))
        .route("/properties/{id}/manager", put(properties::assign_manager))
        .route("/properties/{id}/images", post(properties::add_image))
        .route(
            "/properties/{id}/images/{image_id}",
            axum::routing::delete(properties::delete_image),
        )
        .route("/units", post(properties::add_unit))
        .route("/units/{id}", put(properties::update_unit))
        .route("/amenities", post(properties::add_amenity))
        .layer(protect())
        .with_state(property_handlers);

    // ── Reservations ────────────────────────────────────────
    let reservation_routes = Router::new()
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/reservations/{id}", get(reservations::get_reservation))
        .route("/reservations/{id}/cancel", post(reservations::cancel_reservation))
        .layer(protect())
        .with_state(reservations::ReservationHandlerState {
            reservation_service: services.reservations.clone(),
        });

    // ── Payments ────────────────────────────────────────────
    let payment_routes = Router::new()
        .route("/payments", get(payments::list_payments))
        .route("/payments/dashboard", get(payments::payment_dashboard))
        .route("/payments/options", get(payments::payment_options))
        .route("/payments/security-deposit", post(payments::pay_security_deposit))
        .route("/payments/rent", post(payments::pay_rent))
        .route("/payments/{payment_id}", get(payments::payment_details))
        .route("/payments/{payment_id}/receipt", get(payments::payment_receipt))
        .route("/payments/{payment_id}/status", put(payments::update_payment_status))
        .route("/deposits/{id}/refund", post(payments::refund_deposit))
        .layer(protect())
        .with_state(payments::PaymentHandlerState {
            payment_service: services.payments.clone(),
        });

    let api = Router::new()
        .merge(auth_public)
        .merge(auth_protected)
        .merge(user_routes)
        .merge(catalogue_public)
        .merge(catalogue_protected)
        .merge(reservation_routes)
        .merge(payment_routes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check).with_state(health_state))
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(MetricsState {
                handle: metrics_handle,
            }),
        )
        .nest("/api/v1", api)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::payments::SimulatedGateway;
    use crate::infrastructure::InMemoryStorage;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::str::FromStr;
    use tower::Service;

    struct TestApp {
        router: Router,
        users: Arc<UserService>,
    }

    fn app() -> TestApp {
        let repos = Arc::new(InMemoryStorage::new());
        let jwt = JwtConfig::new("router-test-secret", 1);
        let reservations = Arc::new(ReservationService::new(repos.clone(), 24));
        let services = ApiServices {
            users: Arc::new(UserService::new(repos.clone(), jwt.clone())),
            properties: Arc::new(PropertyService::new(repos.clone())),
            payments: Arc::new(PaymentService::new(
                repos.clone(),
                reservations.clone(),
                Arc::new(SimulatedGateway),
            )),
            reservations,
        };
        TestApp {
            users: services.users.clone(),
            router: create_api_router(
                services,
                jwt,
                HealthState::new(None),
                metrics::detached_handle(),
            ),
        }
    }

    async fn send(
        app: &TestApp,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let resp = app.router.clone().into_service().call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register(app: &TestApp, username: &str, role: &str, phone: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": username,
                "email": format!("{}@example.co.ke", username),
                "first_name": username,
                "last_name": "Otieno",
                "phone_number": phone,
                "password": "nyumba-safi-2024",
                "password_confirm": "nyumba-safi-2024",
                "role": role,
                "terms_accepted": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        login(app, username, "nyumba-safi-2024").await
    }

    async fn login(app: &TestApp, username: &str, password: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"username": username, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    fn amount(v: &Value) -> Decimal {
        Decimal::from_str(v.as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn health_and_openapi_are_public() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "in_memory");

        let (status, body) = send(&app, Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/payments/security-deposit"].is_object());
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let app = app();
        for uri in ["/api/v1/auth/me", "/api/v1/reservations", "/api/v1/payments", "/api/v1/dashboard"] {
            let (status, _) = send(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        }
        let (status, body) = send(&app, Method::GET, "/api/v1/properties", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn admin_role_cannot_be_self_registered() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "mallory",
                "email": "mallory@example.co.ke",
                "password": "nyumba-safi-2024",
                "password_confirm": "nyumba-safi-2024",
                "role": "ADMIN",
                "terms_accepted": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn reserve_pay_deposit_and_confirm() {
        let app = app();
        app.users
            .create_default_admin("admin", "admin@example.co.ke", "admin-pass-123")
            .await
            .unwrap();
        let admin = login(&app, "admin", "admin-pass-123").await;
        let landlord = register(&app, "kamau", "LANDLORD", "0711000001").await;
        let tenant = register(&app, "achieng", "TENANT", "0722000002").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/properties",
            Some(&landlord),
            Some(json!({
                "name": "Kilimani Heights",
                "address": "Argwings Kodhek Rd",
                "county": "Nairobi",
                "town": "Kilimani",
                "property_type": "apartment",
                "number_of_floors": 4,
                "units_per_floor": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        let property_id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/units",
            Some(&landlord),
            Some(json!({
                "property_id": property_id,
                "unit_number": "2B",
                "unit_type": "1br",
                "rent_amount": "25000",
                "floor_number": 2
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(amount(&body["data"]["deposit_amount"]), Decimal::new(28250, 0));
        let unit_id = body["data"]["id"].as_i64().unwrap();

        // Tenants cannot list units for sale.
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/units",
            Some(&tenant),
            Some(json!({
                "property_id": property_id,
                "unit_number": "3A",
                "unit_type": "studio",
                "rent_amount": "12000"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let move_in = (Utc::now() + Duration::days(10)).date_naive().to_string();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            Some(&tenant),
            Some(json!({"unit_id": unit_id, "intended_move_in_date": move_in})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["status"], "pending");
        let reservation_id = body["data"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/reservations",
            Some(&tenant),
            Some(json!({"unit_id": unit_id, "intended_move_in_date": move_in})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/payments/security-deposit",
            Some(&tenant),
            Some(json!({
                "unit_id": unit_id,
                "payment_method": "mpesa",
                "phone_number": "254722000002"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(amount(&body["data"]["amount"]), Decimal::new(28250, 0));
        let payment_id = body["data"]["payment_id"].as_str().unwrap().to_string();

        // Landlords do not settle payments.
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/payments/{}/status", payment_id),
            Some(&landlord),
            Some(json!({"status": "completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/payments/{}/status", payment_id),
            Some(&admin),
            Some(json!({"status": "completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/reservations/{}", reservation_id),
            Some(&tenant),
            None,
        )
        .await;
        assert_eq!(body["data"]["status"], "confirmed");
        assert_eq!(body["data"]["security_deposit_paid"], true);

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/payments/{}/receipt", payment_id),
            Some(&tenant),
            None,
        )
        .await;
        assert_eq!(body["data"]["details"]["method"], "mpesa");
        assert_eq!(body["data"]["details"]["mpesa_status"], "success");

        let (_, body) =
            send(&app, Method::GET, &format!("/api/v1/units/{}", unit_id), None, None).await;
        assert_eq!(body["data"]["unit"]["is_available"], false);
    }

    #[tokio::test]
    async fn stale_tokens_follow_the_stored_account() {
        let app = app();
        app.users
            .create_default_admin("admin", "admin@example.co.ke", "admin-pass-123")
            .await
            .unwrap();
        let admin = login(&app, "admin", "admin-pass-123").await;
        let landlord = register(&app, "kiprono", "LANDLORD", "0755000005").await;
        let (_, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&landlord), None).await;
        let landlord_id = me["data"]["user"]["id"].as_str().unwrap().to_string();

        let new_property = json!({
            "name": "Nyali Gardens",
            "address": "Links Road",
            "county": "Mombasa",
            "town": "Nyali",
            "property_type": "apartment"
        });

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/users/{}/role", landlord_id),
            Some(&admin),
            Some(json!({"role": "TENANT"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/properties",
            Some(&landlord),
            Some(new_property.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/users/{}", landlord_id),
            Some(&admin),
            Some(json!({"is_active": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, "/api/v1/auth/me", Some(&landlord), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/users/{}", landlord_id),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/properties",
            Some(&landlord),
            Some(new_property),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn validation_failures_are_reported_per_field() {
        let app = app();
        let tenant = register(&app, "wanjiru", "TENANT", "0733000003").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/payments/rent",
            Some(&tenant),
            Some(json!({
                "unit_id": 1,
                "months": 24,
                "payment_method": "mpesa",
                "phone_number": "254733000003"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("months"));
    }
}
