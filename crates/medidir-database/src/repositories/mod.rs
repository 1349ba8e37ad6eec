//! Repository implementations.

pub mod audit;
pub mod pg;

use medidir_entity::{
    City, Doctor, Facility, FacilityAppointment, FacilityCategory, FacilityCertification,
    FacilityDepartment, FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours,
    FacilityPlan, InsuranceProvider, Plan, Review, Session, User, VerificationToken,
};

pub use audit::AuditLogRepository;
pub use pg::PgRepository;

pub type CityRepository = PgRepository<City>;
pub type FacilityCategoryRepository = PgRepository<FacilityCategory>;
pub type FacilityRepository = PgRepository<Facility>;
pub type DoctorRepository = PgRepository<Doctor>;
pub type DepartmentRepository = PgRepository<FacilityDepartment>;
pub type EquipmentRepository = PgRepository<FacilityEquipment>;
pub type CertificationRepository = PgRepository<FacilityCertification>;
pub type InsuranceProviderRepository = PgRepository<InsuranceProvider>;
pub type FacilityInsuranceRepository = PgRepository<FacilityInsuranceProvider>;
pub type OperatingHoursRepository = PgRepository<FacilityOperatingHours>;
pub type PlanRepository = PgRepository<Plan>;
pub type FacilityPlanRepository = PgRepository<FacilityPlan>;
pub type ReviewRepository = PgRepository<Review>;
pub type AppointmentRepository = PgRepository<FacilityAppointment>;
pub type UserRepository = PgRepository<User>;
pub type SessionRepository = PgRepository<Session>;
pub type VerificationTokenRepository = PgRepository<VerificationToken>;
