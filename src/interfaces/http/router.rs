//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::middleware::{auth_middleware, require_admin, require_customer};
use super::modules::{auth, cars, health, reservations};
use crate::application::{FleetService, IdentityService, ReservationService};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub fleet: Arc<FleetService>,
    pub reservations: Arc<ReservationService>,
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Wires the SeaORM repositories and the services on top of `db`.
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Self {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        Self {
            identity: Arc::new(IdentityService::new(
                repos.clone(),
                config.jwt_config(),
                config.security.bcrypt_cost,
            )),
            fleet: Arc::new(FleetService::new(repos.clone())),
            reservations: Arc::new(ReservationService::new(
                repos,
                config.booking.boundary_policy(),
            )),
            db,
            started_at: Arc::new(Instant::now()),
        }
    }
}

/// Security scheme modifier for OpenAPI
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
                        .description(Some("Admin or customer JWT"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::admin_login,
        auth::admin_register,
        auth::get_profile,
        auth::update_profile,
        // Cars
        cars::list_cars,
        cars::get_car,
        cars::create_car,
        cars::update_car,
        cars::delete_car,
        // Bookings
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::get_my_reservation,
        reservations::cancel_my_reservation,
        reservations::list_all_reservations,
        reservations::get_reservation,
        reservations::update_reservation_status,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            auth::RegisterRequest,
            auth::AdminRegisterRequest,
            auth::LoginRequest,
            auth::UpdateProfileRequest,
            auth::UserInfo,
            auth::AuthResponse,
            cars::CarDto,
            cars::CarSummaryDto,
            cars::CreateCarRequest,
            cars::UpdateCarRequest,
            reservations::CreateReservationRequest,
            reservations::UpdateStatusRequest,
            reservations::ReservationDto,
            reservations::CustomerDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Customer and administrator sign-up and login"),
        (name = "Profile", description = "The signed-in customer's profile"),
        (name = "Cars", description = "Fleet catalog"),
        (name = "Bookings", description = "Customer bookings"),
        (name = "Booking Administration", description = "Review and status changes of all bookings"),
    ),
    info(
        title = "Car Rental API",
        version = "1.0.0",
        description = "Fleet catalog and reservation engine for a car rental service"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/admin/login", post(auth::admin_login))
        .route("/api/v1/cars", get(cars::list_cars))
        .route("/api/v1/cars/{id}", get(cars::get_car));

    let customer_routes = Router::new()
        .route(
            "/api/v1/user/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route(
            "/api/v1/user/bookings",
            get(reservations::list_my_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/v1/user/bookings/{id}",
            get(reservations::get_my_reservation),
        )
        .route(
            "/api/v1/user/bookings/{id}/cancel",
            patch(reservations::cancel_my_reservation),
        )
        .layer(middleware::from_fn(require_customer))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/api/v1/admin/register", post(auth::admin_register))
        .route("/api/v1/cars", post(cars::create_car))
        .route(
            "/api/v1/cars/{id}",
            put(cars::update_car).delete(cars::delete_car),
        )
        .route("/api/v1/bookings", get(reservations::list_all_reservations))
        .route("/api/v1/bookings/{id}", get(reservations::get_reservation))
        .route(
            "/api/v1/bookings/{id}/status",
            patch(reservations::update_reservation_status),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(customer_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────
