//! Application builder: wires repositories, services, and the router.

use std::sync::Arc;

use axum::Router;
use prometheus::Registry;
use sqlx::FromRow;
use sqlx::postgres::PgRow;
use tokio::net::TcpListener;
use tracing::info;

use medidir_core::config::AppConfig;
use medidir_core::error::{AppError, ErrorKind};
use medidir_core::traits::{Entity, Repository};
use medidir_database::{AuditLogRepository, DatabasePool, PgRepository, QueryMetrics};
use medidir_entity::{
    City, Doctor, Facility, FacilityAppointment, FacilityCategory, FacilityCertification,
    FacilityDepartment, FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours,
    FacilityPlan, InsuranceProvider, Plan, Review, Session, User, VerificationToken,
};
use medidir_service::{AuthService, DirectoryService, FacilityRepositories, FacilityService};

use crate::middleware::metrics::HttpMetrics;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Creates every repository and service over one pool and one registry.
pub fn build_state(
    config: Arc<AppConfig>,
    db: DatabasePool,
    registry: Registry,
) -> Result<AppState, AppError> {
    let query_metrics = Arc::new(QueryMetrics::new(registry.clone()));
    let http_metrics = Arc::new(HttpMetrics::new(&registry)?);

    // ── Repositories ─────────────────────────────────────────────
    let facilities = repository::<Facility>(&db, &query_metrics);
    let doctors = repository::<Doctor>(&db, &query_metrics);
    let reviews = repository::<Review>(&db, &query_metrics);
    let appointments = repository::<FacilityAppointment>(&db, &query_metrics);
    let departments = repository::<FacilityDepartment>(&db, &query_metrics);
    let equipment = repository::<FacilityEquipment>(&db, &query_metrics);
    let certifications = repository::<FacilityCertification>(&db, &query_metrics);
    let operating_hours = repository::<FacilityOperatingHours>(&db, &query_metrics);
    let facility_insurance = repository::<FacilityInsuranceProvider>(&db, &query_metrics);
    let facility_plans = repository::<FacilityPlan>(&db, &query_metrics);

    // ── Services ─────────────────────────────────────────────────
    let facility_service = FacilityService::new(FacilityRepositories {
        facilities: Arc::clone(&facilities),
        doctors: Arc::clone(&doctors),
        reviews: Arc::clone(&reviews),
        appointments: Arc::clone(&appointments),
        departments: Arc::clone(&departments),
        equipment: Arc::clone(&equipment),
        certifications: Arc::clone(&certifications),
        operating_hours: Arc::clone(&operating_hours),
        insurance: Arc::clone(&facility_insurance),
        plans: Arc::clone(&facility_plans),
    });

    let auth_service = AuthService::new(
        &config.auth,
        repository::<User>(&db, &query_metrics),
        repository::<Session>(&db, &query_metrics),
        repository::<VerificationToken>(&db, &query_metrics),
    )?;

    let audit_log = AuditLogRepository::new(db.pool().clone(), Arc::clone(&query_metrics));

    Ok(AppState {
        cities: DirectoryService::new(repository::<City>(&db, &query_metrics)),
        categories: DirectoryService::new(repository::<FacilityCategory>(&db, &query_metrics)),
        facilities: DirectoryService::new(facilities),
        doctors: DirectoryService::new(doctors),
        departments: DirectoryService::new(departments),
        equipment: DirectoryService::new(equipment),
        certifications: DirectoryService::new(certifications),
        insurance_providers: DirectoryService::new(repository::<InsuranceProvider>(&db, &query_metrics)),
        facility_insurance: DirectoryService::new(facility_insurance),
        operating_hours: DirectoryService::new(operating_hours),
        plans: DirectoryService::new(repository::<Plan>(&db, &query_metrics)),
        facility_plans: DirectoryService::new(facility_plans),
        reviews: DirectoryService::new(reviews),
        appointments: DirectoryService::new(appointments),
        facility_service,
        auth_service,
        audit_log,
        config,
        db,
        registry,
        http_metrics,
    })
}

fn repository<T>(db: &DatabasePool, metrics: &Arc<QueryMetrics>) -> Arc<dyn Repository<T>>
where
    T: Entity + for<'r> FromRow<'r, PgRow>,
{
    Arc::new(PgRepository::<T>::new(db.pool().clone(), Arc::clone(metrics)))
}

/// Runs the MediDir server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    let config = Arc::new(config);
    let state = build_state(Arc::clone(&config), db.clone(), Registry::new())?;
    let app = build_app(state);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    info!(address = %addr, "MediDir server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    db.close().await;
    info!("MediDir server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
