//! Shared application state passed to all handlers via Axum's `State` extractor.

use std::sync::Arc;

use prometheus::Registry;

use medidir_core::config::AppConfig;
use medidir_database::{AuditLogRepository, DatabasePool};
use medidir_entity::{
    City, Doctor, Facility, FacilityAppointment, FacilityCategory, FacilityCertification,
    FacilityDepartment, FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours,
    FacilityPlan, InsuranceProvider, Plan, Review,
};
use medidir_service::{AuthService, DirectoryService, FacilityService};

use crate::middleware::metrics::HttpMetrics;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────────
    /// Application configuration.
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────────
    /// Database connection pool.
    pub db: DatabasePool,
    /// Registry exposed on `/metrics`.
    pub registry: Registry,
    /// HTTP request collectors.
    pub http_metrics: Arc<HttpMetrics>,

    // ── Directory services ───────────────────────────────────────
    pub cities: DirectoryService<City>,
    pub categories: DirectoryService<FacilityCategory>,
    pub facilities: DirectoryService<Facility>,
    pub doctors: DirectoryService<Doctor>,
    pub departments: DirectoryService<FacilityDepartment>,
    pub equipment: DirectoryService<FacilityEquipment>,
    pub certifications: DirectoryService<FacilityCertification>,
    pub insurance_providers: DirectoryService<InsuranceProvider>,
    pub facility_insurance: DirectoryService<FacilityInsuranceProvider>,
    pub operating_hours: DirectoryService<FacilityOperatingHours>,
    pub plans: DirectoryService<Plan>,
    pub facility_plans: DirectoryService<FacilityPlan>,
    pub reviews: DirectoryService<Review>,
    pub appointments: DirectoryService<FacilityAppointment>,

    // ── Domain services ──────────────────────────────────────────
    /// Facility-scoped queries, reviews, doctors, and appointments.
    pub facility_service: FacilityService,
    /// Registration, login, sessions, and verification tokens.
    pub auth_service: AuthService,
    /// Read-only audit trail.
    pub audit_log: AuditLogRepository,
}
