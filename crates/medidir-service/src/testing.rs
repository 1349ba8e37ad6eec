//! In-memory repositories for service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use medidir_core::error::AppError;
use medidir_core::result::AppResult;
use medidir_core::traits::{Entity, Repository};
use medidir_core::types::{Changes, Column, Filter};
use medidir_entity::{
    City, Doctor, Facility, FacilityAppointment, FacilityCertification, FacilityDepartment,
    FacilityEquipment, FacilityInsuranceProvider, FacilityOperatingHours, FacilityPlan, Review,
    Session, User, VerificationToken,
};

/// Access to the storage-assigned columns every row carries.
pub(crate) trait Stamped {
    fn row_id(&self) -> i64;
    fn stamp(&mut self, id: i64, now: DateTime<Utc>);
    fn touch(&mut self, now: DateTime<Utc>);
}

macro_rules! stamped {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Stamped for $ty {
                fn row_id(&self) -> i64 {
                    self.id
                }

                fn stamp(&mut self, id: i64, now: DateTime<Utc>) {
                    self.id = id;
                    self.created_at = now;
                    self.updated_at = now;
                }

                fn touch(&mut self, now: DateTime<Utc>) {
                    self.updated_at = now;
                }
            }
        )*
    };
}

stamped!(
    City,
    Doctor,
    Facility,
    FacilityAppointment,
    FacilityCertification,
    FacilityDepartment,
    FacilityEquipment,
    FacilityInsuranceProvider,
    FacilityOperatingHours,
    FacilityPlan,
    Review,
    Session,
    User,
    VerificationToken,
);

/// A `Repository` over a `Vec`, matching filters on the serialized rows.
///
/// Updates go through serde, so fields skipped during serialization
/// (`User::password_hash`) reset to their defaults when a row is updated.
pub(crate) struct MemoryRepository<T> {
    rows: Mutex<Vec<T>>,
    next_id: AtomicI64,
    failure: Mutex<Option<AppError>>,
}

impl<T> MemoryRepository<T>
where
    T: Entity + Stamped + Clone + DeserializeOwned,
{
    pub(crate) fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            failure: Mutex::new(None),
        }
    }

    /// Insert rows directly, assigning ids.
    pub(crate) fn seed(&self, rows: Vec<T>) -> Vec<T> {
        let now = Utc::now();
        let mut stored = self.rows.lock().unwrap();
        rows.into_iter()
            .map(|mut row| {
                row.stamp(self.next_id.fetch_add(1, Ordering::SeqCst), now);
                stored.push(row.clone());
                row
            })
            .collect()
    }

    /// Make the next call fail with `err`.
    pub(crate) fn fail_next(&self, err: AppError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub(crate) fn rows(&self) -> Vec<T> {
        self.rows.lock().unwrap().clone()
    }

    fn check_failure(&self) -> AppResult<()> {
        match self.failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found(format!("{} {id} not found", T::LABEL))
    }

    fn matches(row: &T, filter: &Filter<T::Column>) -> bool {
        let json = serde_json::to_value(row).unwrap();
        filter.conditions().iter().all(|(column, value)| {
            let actual = json.get(column.name()).unwrap_or(&Value::Null);
            same_value(actual, &value.to_json())
        })
    }

    fn apply(row: &T, changes: &Changes<T::Column>) -> T {
        let mut json = serde_json::to_value(row).unwrap();
        for (column, value) in changes.assignments() {
            json[column.name()] = value.to_json();
        }
        let mut updated: T = serde_json::from_value(json).unwrap();
        updated.touch(Utc::now());
        updated
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

#[async_trait]
impl<T> Repository<T> for MemoryRepository<T>
where
    T: Entity + Stamped + Clone + DeserializeOwned,
{
    async fn find(&self, id: i64) -> AppResult<T> {
        self.check_failure()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.row_id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn find_many(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>> {
        self.check_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| Self::matches(r, filter))
            .cloned()
            .collect())
    }

    async fn create(&self, entity: &T) -> AppResult<T> {
        self.check_failure()?;
        Ok(self.seed(vec![entity.clone()]).remove(0))
    }

    async fn create_many(&self, entities: &[T]) -> AppResult<Vec<T>> {
        self.check_failure()?;
        Ok(self.seed(entities.to_vec()))
    }

    async fn update(&self, id: i64, changes: &Changes<T::Column>) -> AppResult<T> {
        self.check_failure()?;
        if changes.is_empty() {
            return Err(AppError::validation("no fields to update"));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.row_id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        *row = Self::apply(row, changes);
        Ok(row.clone())
    }

    async fn update_many(
        &self,
        filter: &Filter<T::Column>,
        changes: &Changes<T::Column>,
    ) -> AppResult<u64> {
        self.check_failure()?;
        if filter.is_empty() || changes.is_empty() {
            return Err(AppError::validation("filter and changes must be non-empty"));
        }
        let mut affected = 0;
        for row in self.rows.lock().unwrap().iter_mut() {
            if Self::matches(row, filter) {
                *row = Self::apply(row, changes);
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete(&self, id: i64) -> AppResult<T> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let index = rows
            .iter()
            .position(|r| r.row_id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        Ok(rows.remove(index))
    }

    async fn delete_many(&self, filter: &Filter<T::Column>) -> AppResult<Vec<T>> {
        self.check_failure()?;
        if filter.is_empty() {
            return Err(AppError::validation("filter must be non-empty"));
        }
        let mut rows = self.rows.lock().unwrap();
        let (removed, kept): (Vec<T>, Vec<T>) =
            rows.drain(..).partition(|r| Self::matches(r, filter));
        *rows = kept;
        Ok(removed)
    }
}
