//! Generic CRUD handlers shared by every directory entity.
//!
//! Each entity mounts the same eight routes; [`DirectoryResource`] tells a
//! handler which service in [`AppState`] to call.

use std::marker::PhantomData;

use axum::Json;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use medidir_core::error::AppError;
use medidir_core::traits::Entity;
use medidir_core::types::{Changes, Filter};
use medidir_entity::{
    City, Doctor, Facility, FacilityAppointment, FacilityCategory, FacilityCertification,
    FacilityDepartment, FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours,
    FacilityPlan, InsuranceProvider, Plan, Review,
};
use medidir_service::DirectoryService;

use crate::dto::request::BulkUpdateRequest;
use crate::dto::response::{ApiResponse, CountResponse};
use crate::extractors::{AuthUser, JsonBody, QueryFilter};
use crate::state::AppState;

/// An entity exposed through the generic CRUD routes.
pub trait DirectoryResource: Entity + DeserializeOwned {
    /// Path segment under `/api`.
    const PATH: &'static str;

    /// Whether `GET` needs no bearer token.
    const PUBLIC_READ: bool = true;

    fn service(state: &AppState) -> &DirectoryService<Self>;
}

macro_rules! directory_resource {
    ($($entity:ty => ($path:literal, $field:ident $(, $public:literal)?)),+ $(,)?) => {
        $(
            impl DirectoryResource for $entity {
                const PATH: &'static str = $path;
                $(const PUBLIC_READ: bool = $public;)?

                fn service(state: &AppState) -> &DirectoryService<Self> {
                    &state.$field
                }
            }
        )+
    };
}

directory_resource! {
    City => ("/cities", cities),
    FacilityCategory => ("/facility-categories", categories),
    Facility => ("/facilities", facilities),
    Doctor => ("/doctors", doctors),
    FacilityDepartment => ("/departments", departments),
    FacilityEquipment => ("/equipment", equipment),
    FacilityCertification => ("/certifications", certifications),
    InsuranceProvider => ("/insurance-providers", insurance_providers),
    FacilityInsuranceProvider => ("/facility-insurance-providers", facility_insurance),
    FacilityOperatingHours => ("/operating-hours", operating_hours),
    Plan => ("/plans", plans),
    FacilityPlan => ("/facility-plans", facility_plans),
    Review => ("/reviews", reviews),
    // Appointments carry patient contact details.
    FacilityAppointment => ("/appointments", appointments, false),
}

/// Gate for read routes: passes through for public resources and requires
/// an [`AuthUser`] otherwise.
pub struct ReadAccess<T>(PhantomData<T>);

impl<T: DirectoryResource> FromRequestParts<AppState> for ReadAccess<T> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !T::PUBLIC_READ {
            AuthUser::from_request_parts(parts, state).await?;
        }
        Ok(Self(PhantomData))
    }
}

/// GET /api/{resource}
pub async fn list<T: DirectoryResource>(
    State(state): State<AppState>,
    _access: ReadAccess<T>,
    QueryFilter(filter): QueryFilter<T::Column>,
) -> Result<Json<ApiResponse<Vec<T>>>, AppError> {
    let rows = T::service(&state).list(&filter).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/{resource}/{id}
pub async fn get<T: DirectoryResource>(
    State(state): State<AppState>,
    _access: ReadAccess<T>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let row = T::service(&state).get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(row)))
}

/// POST /api/{resource}
pub async fn create<T: DirectoryResource>(
    State(state): State<AppState>,
    _auth: AuthUser,
    JsonBody(entity): JsonBody<T>,
) -> Result<(StatusCode, Json<ApiResponse<T>>), AppError> {
    let created = T::service(&state).create(entity).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// POST /api/{resource}/batch
pub async fn create_many<T: DirectoryResource>(
    State(state): State<AppState>,
    _auth: AuthUser,
    JsonBody(entities): JsonBody<Vec<T>>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<T>>>), AppError> {
    let created = T::service(&state).create_many(entities).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// PATCH /api/{resource}/{id}
pub async fn update<T: DirectoryResource>(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    JsonBody(body): JsonBody<Map<String, Value>>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let changes = Changes::from_json(&body)?;
    let updated = T::service(&state).update(id, &changes).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// PATCH /api/{resource}
pub async fn update_many<T: DirectoryResource>(
    State(state): State<AppState>,
    _auth: AuthUser,
    JsonBody(body): JsonBody<BulkUpdateRequest>,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let filter = Filter::from_json(&body.filter)?;
    let changes = Changes::from_json(&body.changes)?;
    let affected = T::service(&state).update_many(&filter, &changes).await?;
    Ok(Json(ApiResponse::ok(CountResponse { affected })))
}

/// DELETE /api/{resource}/{id}
pub async fn delete<T: DirectoryResource>(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let deleted = T::service(&state).delete(id).await?;
    Ok(Json(ApiResponse::ok(deleted)))
}

/// DELETE /api/{resource}?column=value
pub async fn delete_many<T: DirectoryResource>(
    State(state): State<AppState>,
    _auth: AuthUser,
    QueryFilter(filter): QueryFilter<T::Column>,
) -> Result<Json<ApiResponse<Vec<T>>>, AppError> {
    let deleted = T::service(&state).delete_many(&filter).await?;
    Ok(Json(ApiResponse::ok(deleted)))
}
