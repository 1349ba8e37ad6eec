//! Facility-scoped queries and workflows: staffing, reviews, appointments,
//! and the per-facility listings of departments, equipment, certifications,
//! hours, insurance coverage and plans.

use std::sync::Arc;

use tracing::info;

use medidir_core::error::AppError;
use medidir_core::result::AppResult;
use medidir_core::traits::Repository;
use medidir_core::types::{Changes, Filter};
use medidir_entity::appointment::FacilityAppointmentColumn;
use medidir_entity::certification::FacilityCertificationColumn;
use medidir_entity::department::FacilityDepartmentColumn;
use medidir_entity::doctor::DoctorColumn;
use medidir_entity::equipment::FacilityEquipmentColumn;
use medidir_entity::facility::FacilityColumn;
use medidir_entity::insurance::FacilityInsuranceProviderColumn;
use medidir_entity::operating_hours::FacilityOperatingHoursColumn;
use medidir_entity::plan::FacilityPlanColumn;
use medidir_entity::review::{FACILITY_REVIEW, ReviewColumn};
use medidir_entity::{
    AppointmentStatus, Doctor, Facility, FacilityAppointment, FacilityCertification,
    FacilityDepartment, FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours,
    FacilityPlan, FacilityType, Review,
};

use crate::directory::DirectoryService;

/// Repositories the facility service reads and writes.
pub struct FacilityRepositories {
    pub facilities: Arc<dyn Repository<Facility>>,
    pub doctors: Arc<dyn Repository<Doctor>>,
    pub reviews: Arc<dyn Repository<Review>>,
    pub appointments: Arc<dyn Repository<FacilityAppointment>>,
    pub departments: Arc<dyn Repository<FacilityDepartment>>,
    pub equipment: Arc<dyn Repository<FacilityEquipment>>,
    pub certifications: Arc<dyn Repository<FacilityCertification>>,
    pub operating_hours: Arc<dyn Repository<FacilityOperatingHours>>,
    pub insurance: Arc<dyn Repository<FacilityInsuranceProvider>>,
    pub plans: Arc<dyn Repository<FacilityPlan>>,
}

/// Facility workflows. Every facility-scoped call first checks the
/// facility exists, so an unknown id is `NotFound` rather than an empty list.
#[derive(Clone)]
pub struct FacilityService {
    facilities: DirectoryService<Facility>,
    doctors: DirectoryService<Doctor>,
    reviews: DirectoryService<Review>,
    appointments: DirectoryService<FacilityAppointment>,
    departments: Arc<dyn Repository<FacilityDepartment>>,
    equipment: Arc<dyn Repository<FacilityEquipment>>,
    certifications: Arc<dyn Repository<FacilityCertification>>,
    operating_hours: Arc<dyn Repository<FacilityOperatingHours>>,
    insurance: Arc<dyn Repository<FacilityInsuranceProvider>>,
    plans: Arc<dyn Repository<FacilityPlan>>,
}

impl std::fmt::Debug for FacilityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacilityService").finish_non_exhaustive()
    }
}

impl FacilityService {
    /// Creates a new facility service.
    pub fn new(repos: FacilityRepositories) -> Self {
        Self {
            facilities: DirectoryService::new(repos.facilities),
            doctors: DirectoryService::new(repos.doctors),
            reviews: DirectoryService::new(repos.reviews),
            appointments: DirectoryService::new(repos.appointments),
            departments: repos.departments,
            equipment: repos.equipment,
            certifications: repos.certifications,
            operating_hours: repos.operating_hours,
            insurance: repos.insurance,
            plans: repos.plans,
        }
    }

    /// Fetch one facility.
    pub async fn get(&self, id: i64) -> AppResult<Facility> {
        self.facilities.get_by_id(id).await
    }

    /// Facilities located in a city.
    pub async fn by_city(&self, city_id: i64) -> AppResult<Vec<Facility>> {
        let filter = Filter::new().eq(FacilityColumn::CityId, city_id)?;
        self.facilities.list(&filter).await
    }

    /// Facilities of one type.
    pub async fn by_type(&self, facility_type: FacilityType) -> AppResult<Vec<Facility>> {
        let filter = Filter::new().eq(FacilityColumn::FacilityType, facility_type)?;
        self.facilities.list(&filter).await
    }

    /// Facilities in a category.
    pub async fn by_category(&self, category_id: i64) -> AppResult<Vec<Facility>> {
        let filter = Filter::new().eq(FacilityColumn::CategoryId, category_id)?;
        self.facilities.list(&filter).await
    }

    /// Doctors whose primary facility is this one.
    pub async fn doctors(&self, facility_id: i64) -> AppResult<Vec<Doctor>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(DoctorColumn::PrimaryFacilityId, facility_id)?;
        self.doctors.list(&filter).await
    }

    /// Make this facility the doctor's primary facility.
    pub async fn assign_doctor(&self, facility_id: i64, doctor_id: i64) -> AppResult<Doctor> {
        self.get(facility_id).await?;
        let changes = Changes::new().set(DoctorColumn::PrimaryFacilityId, facility_id)?;
        let doctor = self.doctors.update(doctor_id, &changes).await?;
        info!(facility_id, doctor_id, "Doctor assigned to facility");
        Ok(doctor)
    }

    /// Detach a doctor from this facility.
    pub async fn remove_doctor(&self, facility_id: i64, doctor_id: i64) -> AppResult<Doctor> {
        self.get(facility_id).await?;
        let doctor = self.doctors.get_by_id(doctor_id).await?;
        if doctor.primary_facility_id != Some(facility_id) {
            return Err(AppError::not_found(format!(
                "Doctor {doctor_id} is not assigned to facility {facility_id}"
            )));
        }
        let changes = Changes::new().set(DoctorColumn::PrimaryFacilityId, Option::<i64>::None)?;
        let doctor = self.doctors.update(doctor_id, &changes).await?;
        info!(facility_id, doctor_id, "Doctor removed from facility");
        Ok(doctor)
    }

    /// Reviews left for this facility.
    pub async fn reviews(&self, facility_id: i64) -> AppResult<Vec<Review>> {
        self.get(facility_id).await?;
        self.reviews.list(&Self::review_filter(facility_id)?).await
    }

    /// Store a review written by `author_id` and refresh the facility's
    /// average rating. Any author given in `review` is replaced.
    pub async fn add_review(
        &self,
        facility_id: i64,
        author_id: i64,
        mut review: Review,
    ) -> AppResult<Review> {
        self.get(facility_id).await?;
        review.user_id = Some(author_id);
        review.entity_type = FACILITY_REVIEW.to_string();
        review.entity_id = facility_id;
        let created = self.reviews.create(review).await?;

        let all = self.reviews.list(&Self::review_filter(facility_id)?).await?;
        let average = all.iter().map(|r| r.rating).sum::<f64>() / all.len().max(1) as f64;
        let changes = Changes::new().set(FacilityColumn::Rating, average)?;
        self.facilities.update(facility_id, &changes).await?;

        info!(facility_id, review_id = created.id, rating = average, "Review added");
        Ok(created)
    }

    fn review_filter(facility_id: i64) -> AppResult<Filter<ReviewColumn>> {
        Filter::new()
            .eq(ReviewColumn::EntityType, FACILITY_REVIEW)?
            .eq(ReviewColumn::EntityId, facility_id)
    }

    /// Appointments booked at this facility.
    pub async fn appointments(&self, facility_id: i64) -> AppResult<Vec<FacilityAppointment>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(FacilityAppointmentColumn::FacilityId, facility_id)?;
        self.appointments.list(&filter).await
    }

    /// Book an appointment with an existing doctor. New bookings always
    /// start out `Scheduled`.
    pub async fn book_appointment(
        &self,
        facility_id: i64,
        mut appointment: FacilityAppointment,
    ) -> AppResult<FacilityAppointment> {
        self.get(facility_id).await?;
        self.doctors.get_by_id(appointment.doctor_id).await?;

        appointment.facility_id = facility_id;
        appointment.status = AppointmentStatus::Scheduled;
        let booked = self.appointments.create(appointment).await?;
        info!(
            facility_id,
            appointment_id = booked.id,
            doctor_id = booked.doctor_id,
            "Appointment booked"
        );
        Ok(booked)
    }

    /// Cancel an open appointment at this facility.
    pub async fn cancel_appointment(
        &self,
        facility_id: i64,
        appointment_id: i64,
    ) -> AppResult<FacilityAppointment> {
        self.get(facility_id).await?;
        let appointment = self.appointments.get_by_id(appointment_id).await?;
        if appointment.facility_id != facility_id {
            return Err(AppError::not_found(format!(
                "Appointment {appointment_id} not found at facility {facility_id}"
            )));
        }
        if !appointment.status.is_cancellable() {
            return Err(AppError::validation(format!(
                "Appointment {appointment_id} is already {}",
                appointment.status
            )));
        }

        let changes = Changes::new().set(
            FacilityAppointmentColumn::Status,
            AppointmentStatus::Cancelled,
        )?;
        let cancelled = self.appointments.update(appointment_id, &changes).await?;
        info!(facility_id, appointment_id, "Appointment cancelled");
        Ok(cancelled)
    }

    pub async fn departments(&self, facility_id: i64) -> AppResult<Vec<FacilityDepartment>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(FacilityDepartmentColumn::FacilityId, facility_id)?;
        self.departments.find_many(&filter).await
    }

    pub async fn equipment(&self, facility_id: i64) -> AppResult<Vec<FacilityEquipment>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(FacilityEquipmentColumn::FacilityId, facility_id)?;
        self.equipment.find_many(&filter).await
    }

    pub async fn certifications(&self, facility_id: i64) -> AppResult<Vec<FacilityCertification>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(FacilityCertificationColumn::FacilityId, facility_id)?;
        self.certifications.find_many(&filter).await
    }

    pub async fn operating_hours(
        &self,
        facility_id: i64,
    ) -> AppResult<Vec<FacilityOperatingHours>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(FacilityOperatingHoursColumn::FacilityId, facility_id)?;
        self.operating_hours.find_many(&filter).await
    }

    /// Insurance providers accepted here, with coverage details.
    pub async fn insurance_providers(
        &self,
        facility_id: i64,
    ) -> AppResult<Vec<FacilityInsuranceProvider>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(FacilityInsuranceProviderColumn::FacilityId, facility_id)?;
        self.insurance.find_many(&filter).await
    }

    /// Subscription plans attached to this facility.
    pub async fn plans(&self, facility_id: i64) -> AppResult<Vec<FacilityPlan>> {
        self.get(facility_id).await?;
        let filter = Filter::new().eq(FacilityPlanColumn::FacilityId, facility_id)?;
        self.plans.find_many(&filter).await
    }
}
