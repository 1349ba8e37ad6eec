//! Facility-scoped handlers: lookups by city, type and category, staffing,
//! reviews, appointments, and the per-facility listings.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use medidir_core::error::AppError;
use medidir_entity::{
    Doctor, Facility, FacilityAppointment, FacilityCertification, FacilityDepartment,
    FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours, FacilityPlan,
    FacilityType, Review,
};

use crate::dto::request::AssignDoctorRequest;
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, JsonBody, ValidatedJson};
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// GET /api/facilities/city/{city_id}
pub async fn by_city(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> ApiResult<Vec<Facility>> {
    let facilities = state.facility_service.by_city(city_id).await?;
    Ok(Json(ApiResponse::ok(facilities)))
}

/// GET /api/facilities/type/{type}
pub async fn by_type(
    State(state): State<AppState>,
    Path(facility_type): Path<String>,
) -> ApiResult<Vec<Facility>> {
    let facility_type: FacilityType = facility_type.parse()?;
    let facilities = state.facility_service.by_type(facility_type).await?;
    Ok(Json(ApiResponse::ok(facilities)))
}

/// GET /api/facilities/category/{category_id}
pub async fn by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Vec<Facility>> {
    let facilities = state.facility_service.by_category(category_id).await?;
    Ok(Json(ApiResponse::ok(facilities)))
}

/// GET /api/facilities/{id}/doctors
pub async fn doctors(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vec<Doctor>> {
    let doctors = state.facility_service.doctors(id).await?;
    Ok(Json(ApiResponse::ok(doctors)))
}

/// POST /api/facilities/{id}/doctors
pub async fn assign_doctor(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<AssignDoctorRequest>,
) -> ApiResult<Doctor> {
    let doctor = state.facility_service.assign_doctor(id, req.doctor_id).await?;
    Ok(Json(ApiResponse::ok(doctor)))
}

/// DELETE /api/facilities/{id}/doctors/{doctor_id}
pub async fn remove_doctor(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((id, doctor_id)): Path<(i64, i64)>,
) -> ApiResult<Doctor> {
    let doctor = state.facility_service.remove_doctor(id, doctor_id).await?;
    Ok(Json(ApiResponse::ok(doctor)))
}

/// GET /api/facilities/{id}/reviews
pub async fn reviews(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vec<Review>> {
    let reviews = state.facility_service.reviews(id).await?;
    Ok(Json(ApiResponse::ok(reviews)))
}

/// POST /api/facilities/{id}/reviews
pub async fn add_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    JsonBody(review): JsonBody<Review>,
) -> Result<(StatusCode, Json<ApiResponse<Review>>), AppError> {
    let review = state
        .facility_service
        .add_review(id, auth.user_id(), review)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(review))))
}

/// GET /api/facilities/{id}/appointments
pub async fn appointments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Vec<FacilityAppointment>> {
    let appointments = state.facility_service.appointments(id).await?;
    Ok(Json(ApiResponse::ok(appointments)))
}

/// POST /api/facilities/{id}/appointments
pub async fn book_appointment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    JsonBody(appointment): JsonBody<FacilityAppointment>,
) -> Result<(StatusCode, Json<ApiResponse<FacilityAppointment>>), AppError> {
    let booked = state.facility_service.book_appointment(id, appointment).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booked))))
}

/// DELETE /api/facilities/{id}/appointments/{appointment_id}
pub async fn cancel_appointment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((id, appointment_id)): Path<(i64, i64)>,
) -> ApiResult<FacilityAppointment> {
    let cancelled = state
        .facility_service
        .cancel_appointment(id, appointment_id)
        .await?;
    Ok(Json(ApiResponse::ok(cancelled)))
}

/// GET /api/facilities/{id}/departments
pub async fn departments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<FacilityDepartment>> {
    Ok(Json(ApiResponse::ok(
        state.facility_service.departments(id).await?,
    )))
}

/// GET /api/facilities/{id}/equipment
pub async fn equipment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<FacilityEquipment>> {
    Ok(Json(ApiResponse::ok(state.facility_service.equipment(id).await?)))
}

/// GET /api/facilities/{id}/certifications
pub async fn certifications(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<FacilityCertification>> {
    Ok(Json(ApiResponse::ok(
        state.facility_service.certifications(id).await?,
    )))
}

/// GET /api/facilities/{id}/operating-hours
pub async fn operating_hours(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<FacilityOperatingHours>> {
    Ok(Json(ApiResponse::ok(
        state.facility_service.operating_hours(id).await?,
    )))
}

/// GET /api/facilities/{id}/insurance-providers
pub async fn insurance_providers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<FacilityInsuranceProvider>> {
    Ok(Json(ApiResponse::ok(
        state.facility_service.insurance_providers(id).await?,
    )))
}

/// GET /api/facilities/{id}/plans
pub async fn plans(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vec<FacilityPlan>> {
    Ok(Json(ApiResponse::ok(state.facility_service.plans(id).await?)))
}
