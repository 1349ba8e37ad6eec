//! Route definitions: maps HTTP paths to handler functions.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use medidir_entity::{
    City, Doctor, Facility, FacilityAppointment, FacilityCategory, FacilityCertification,
    FacilityDepartment, FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours,
    FacilityPlan, InsuranceProvider, Plan, Review,
};

use crate::handlers;
use crate::handlers::directory::DirectoryResource;
use crate::middleware;
use crate::state::AppState;

/// Builds the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", auth_routes())
        .nest("/audit-log", audit_routes())
        .merge(directory_routes::<City>())
        .merge(directory_routes::<FacilityCategory>())
        .nest(
            Facility::PATH,
            crud_routes::<Facility>().merge(facility_routes()),
        )
        .merge(directory_routes::<Doctor>())
        .merge(directory_routes::<FacilityDepartment>())
        .merge(directory_routes::<FacilityEquipment>())
        .merge(directory_routes::<FacilityCertification>())
        .merge(directory_routes::<InsuranceProvider>())
        .merge(directory_routes::<FacilityInsuranceProvider>())
        .merge(directory_routes::<FacilityOperatingHours>())
        .merge(directory_routes::<Plan>())
        .merge(directory_routes::<FacilityPlan>())
        .merge(directory_routes::<Review>())
        .merge(directory_routes::<FacilityAppointment>());

    let body_limit = state.config.server.body_limit_bytes;
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let http_metrics = Arc::clone(&state.http_metrics);

    Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/metrics", get(handlers::metrics::metrics))
        .nest("/api", api)
        .layer(axum_middleware::from_fn_with_state(
            http_metrics,
            middleware::metrics::track_http_metrics,
        ))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
        .route("/logout", delete(handlers::auth::logout))
        .route(
            "/verification-tokens",
            post(handlers::auth::create_verification_token),
        )
        .route(
            "/verification-tokens/{identifier}/{token}",
            delete(handlers::auth::use_verification_token),
        )
}

fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::audit::list))
        .route("/{id}", get(handlers::audit::get))
}

/// The eight CRUD routes for one entity, mounted at its path.
fn directory_routes<T: DirectoryResource>() -> Router<AppState> {
    Router::new().nest(T::PATH, crud_routes::<T>())
}

fn crud_routes<T: DirectoryResource>() -> Router<AppState> {
    use handlers::directory as h;

    Router::new()
        .route(
            "/",
            get(h::list::<T>)
                .post(h::create::<T>)
                .patch(h::update_many::<T>)
                .delete(h::delete_many::<T>),
        )
        .route("/batch", post(h::create_many::<T>))
        .route(
            "/{id}",
            get(h::get::<T>)
                .patch(h::update::<T>)
                .delete(h::delete::<T>),
        )
}

fn facility_routes() -> Router<AppState> {
    use handlers::facility as h;

    Router::new()
        .route("/city/{city_id}", get(h::by_city))
        .route("/type/{facility_type}", get(h::by_type))
        .route("/category/{category_id}", get(h::by_category))
        .route("/{id}/doctors", get(h::doctors).post(h::assign_doctor))
        .route("/{id}/doctors/{doctor_id}", delete(h::remove_doctor))
        .route("/{id}/reviews", get(h::reviews).post(h::add_review))
        .route(
            "/{id}/appointments",
            get(h::appointments).post(h::book_appointment),
        )
        .route(
            "/{id}/appointments/{appointment_id}",
            delete(h::cancel_appointment),
        )
        .route("/{id}/departments", get(h::departments))
        .route("/{id}/equipment", get(h::equipment))
        .route("/{id}/certifications", get(h::certifications))
        .route("/{id}/operating-hours", get(h::operating_hours))
        .route("/{id}/insurance-providers", get(h::insurance_providers))
        .route("/{id}/plans", get(h::plans))
}
