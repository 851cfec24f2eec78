//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BookingEngine, ReconciliationJob};

use super::common::{ApiResponse, PaginatedResponse};
use super::modules::availability::{self, RoomTypeAvailabilityDto};
use super::modules::bookings::{self, BookingAppState, BookingCreatedResponse, BookingDto};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::reconciliation::{self, ReconciliationState};
use super::modules::request_id::request_id_middleware;

/// State shared by every `/api/v1` route. Handlers extract their own slice
/// of it through `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<BookingEngine>,
    pub reconciliation: Arc<ReconciliationJob>,
}

impl FromRef<ApiState> for BookingAppState {
    fn from_ref(s: &ApiState) -> Self {
        BookingAppState {
            engine: Arc::clone(&s.engine),
        }
    }
}

impl FromRef<ApiState> for ReconciliationState {
    fn from_ref(s: &ApiState) -> Self {
        ReconciliationState {
            job: Arc::clone(&s.reconciliation),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        bookings::create_booking,
        bookings::create_type_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::confirm_booking,
        bookings::cancel_booking,
        bookings::check_in_booking,
        bookings::check_out_booking,
        availability::check_availability,
        reconciliation::run_reconciliation,
    ),
    components(
        schemas(
            ApiResponse<BookingDto>,
            ApiResponse<BookingCreatedResponse>,
            PaginatedResponse<BookingDto>,
            bookings::CreateBookingRequest,
            bookings::CreateTypeBookingRequest,
            BookingDto,
            BookingCreatedResponse,
            RoomTypeAvailabilityDto,
            reconciliation::ReconciliationRunResponse,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Bookings", description = "Room bookings: creation, confirmation, cancellation, check-in and check-out"),
        (name = "Availability", description = "Free rooms per room type for a date range"),
        (name = "Reconciliation", description = "Date-driven check-in/check-out pass"),
    ),
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "Reservation core: bookings, availability and automatic stay transitions",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    state: ApiState,
    db: DatabaseConnection,
    prometheus: PrometheusHandle,
) -> Router {
    let booking_routes = Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/by-type", post(bookings::create_type_booking))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/confirm", post(bookings::confirm_booking))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/check-in", post(bookings::check_in_booking))
        .route("/{id}/check-out", post(bookings::check_out_booking))
        .with_state(state.clone());

    let availability_routes = Router::new()
        .route("/", get(availability::check_availability))
        .with_state(state.clone());

    let reconciliation_routes = Router::new()
        .route("/run", post(reconciliation::run_reconciliation))
        .with_state(state);

    let health_state = HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: prometheus });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check).with_state(health_state))
        .merge(metrics_routes)
        .nest("/api/v1/bookings", booking_routes)
        .nest("/api/v1/availability", availability_routes)
        .nest("/api/v1/reconciliation", reconciliation_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
