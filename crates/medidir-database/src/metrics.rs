//! Per-table Prometheus instrumentation for repository operations.
//!
//! Each table gets three collectors, registered lazily on first use:
//!
//! - `database_<table>_query_duration_seconds` (histogram; `operation`, `status`)
//! - `database_<table>_query_total` (counter; `operation`, `status`)
//! - `database_<table>_in_flight_queries` (gauge; `operation`)

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};
use tracing::warn;

use medidir_core::{AppError, AppResult};

/// Histogram buckets, in seconds.
pub const DURATION_BUCKETS: [f64; 8] = [0.001, 0.005, 0.01, 0.1, 0.5, 1.0, 5.0, 10.0];

/// `status` label for calls that returned `Ok`.
pub const STATUS_SUCCESS: &str = "success";
/// `status` label for calls that returned `Err`.
pub const STATUS_FAILURE: &str = "failure";

/// The `operation` label of a tracked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Find,
    FindMany,
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Delete,
    DeleteMany,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::FindMany => "find_many",
            Self::Create => "create",
            Self::CreateMany => "create_many",
            Self::Update => "update",
            Self::UpdateMany => "update_many",
            Self::Delete => "delete",
            Self::DeleteMany => "delete_many",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The collectors for one table.
#[derive(Debug, Clone)]
pub struct TableMetrics {
    pub duration: HistogramVec,
    pub total: IntCounterVec,
    pub in_flight: IntGaugeVec,
}

impl TableMetrics {
    fn register(registry: &Registry, table: &str) -> Result<Self, prometheus::Error> {
        let duration = HistogramVec::new(
            HistogramOpts::new(
                format!("database_{table}_query_duration_seconds"),
                format!("Duration of queries against {table} in seconds"),
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["operation", "status"],
        )?;
        let total = IntCounterVec::new(
            Opts::new(
                format!("database_{table}_query_total"),
                format!("Total queries against {table}"),
            ),
            &["operation", "status"],
        )?;
        let in_flight = IntGaugeVec::new(
            Opts::new(
                format!("database_{table}_in_flight_queries"),
                format!("Queries against {table} currently executing"),
            ),
            &["operation"],
        )?;

        registry.register(Box::new(duration.clone()))?;
        registry.register(Box::new(total.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;

        Ok(Self {
            duration,
            total,
            in_flight,
        })
    }
}

/// Decrements the in-flight gauge when the tracked future finishes or is dropped.
struct InFlightGuard(IntGauge);

impl InFlightGuard {
    fn enter(gauge: IntGauge) -> Self {
        gauge.inc();
        Self(gauge)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.dec();
    }
}

/// Metrics client shared by every repository.
///
/// Owns a handle to the registry it writes to, so several independent
/// clients can coexist (one per test, for instance).
#[derive(Debug)]
pub struct QueryMetrics {
    registry: Registry,
    tables: DashMap<String, Arc<TableMetrics>>,
}

impl QueryMetrics {
    /// Create a client that registers its collectors on `registry`.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            tables: DashMap::new(),
        }
    }

    /// The registry the collectors live in.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Return the collectors for `table`, registering them on first use.
    ///
    /// Concurrent first calls for the same table register exactly once and
    /// all observe the same collectors.
    pub fn for_table(&self, table: &str) -> AppResult<Arc<TableMetrics>> {
        if let Some(existing) = self.tables.get(table) {
            return Ok(Arc::clone(existing.value()));
        }

        let entry = self
            .tables
            .entry(table.to_string())
            .or_try_insert_with(|| TableMetrics::register(&self.registry, table).map(Arc::new))
            .map_err(|e| {
                AppError::internal(format!("Failed to register metrics for {table}: {e}"))
            })?;
        Ok(Arc::clone(entry.value()))
    }

    /// Run `operation` against `table`, recording latency, outcome, and
    /// concurrency. The result is returned unchanged.
    pub async fn track<F, R>(&self, table: &str, operation: Operation, fut: F) -> AppResult<R>
    where
        F: Future<Output = AppResult<R>>,
    {
        let metrics = match self.for_table(table) {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(table, error = %e.message, "Query metrics unavailable");
                return fut.await;
            }
        };

        let op = operation.as_str();
        let guard = InFlightGuard::enter(metrics.in_flight.with_label_values(&[op]));
        let started = Instant::now();

        let result = fut.await;

        drop(guard);
        let status = if result.is_ok() {
            STATUS_SUCCESS
        } else {
            STATUS_FAILURE
        };
        metrics
            .duration
            .with_label_values(&[op, status])
            .observe(started.elapsed().as_secs_f64());
        metrics.total.with_label_values(&[op, status]).inc();

        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    fn family_names(registry: &Registry) -> Vec<String> {
        registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect()
    }

    #[test]
    fn test_for_table_is_idempotent() {
        let metrics = QueryMetrics::new(Registry::new());
        let first = metrics.for_table("cities").unwrap();
        let second = metrics.for_table("cities").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clients_with_separate_registries_are_independent() {
        let a = QueryMetrics::new(Registry::new());
        let b = QueryMetrics::new(Registry::new());
        assert!(a.for_table("doctors").is_ok());
        assert!(b.for_table("doctors").is_ok());
    }

    #[test]
    fn test_concurrent_first_use_registers_once() {
        let metrics = Arc::new(QueryMetrics::new(Registry::new()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || metrics.for_table("facilities").map(|_| ()))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        metrics.for_table("facilities").unwrap();
    }

    #[tokio::test]
    async fn test_track_counts_success_and_failure() {
        let metrics = QueryMetrics::new(Registry::new());

        let ok = metrics
            .track("cities", Operation::Find, async { Ok::<_, AppError>(5) })
            .await;
        assert_eq!(ok.unwrap(), 5);

        let err = metrics
            .track("cities", Operation::Find, async {
                Err::<i32, _>(AppError::not_found("City 9 not found"))
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "City 9 not found");

        let table = metrics.for_table("cities").unwrap();
        assert_eq!(
            table.total.with_label_values(&["find", STATUS_SUCCESS]).get(),
            1
        );
        assert_eq!(
            table.total.with_label_values(&["find", STATUS_FAILURE]).get(),
            1
        );
        assert_eq!(
            table
                .duration
                .with_label_values(&["find", STATUS_SUCCESS])
                .get_sample_count(),
            1
        );

        let names = family_names(metrics.registry());
        assert!(names.contains(&"database_cities_query_total".to_string()));
        assert!(names.contains(&"database_cities_query_duration_seconds".to_string()));
    }

    #[tokio::test]
    async fn test_in_flight_rises_during_call_and_returns_to_zero() {
        let metrics = Arc::new(QueryMetrics::new(Registry::new()));
        let (release, wait) = oneshot::channel::<()>();

        let task_metrics = Arc::clone(&metrics);
        let handle = tokio::spawn(async move {
            task_metrics
                .track("doctors", Operation::CreateMany, async move {
                    let _ = wait.await;
                    Ok::<_, AppError>(())
                })
                .await
        });

        let gauge = metrics
            .for_table("doctors")
            .unwrap()
            .in_flight
            .with_label_values(&["create_many"]);
        for _ in 0..100 {
            if gauge.get() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(gauge.get(), 1);

        release.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(gauge.get(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_call_releases_in_flight() {
        let metrics = QueryMetrics::new(Registry::new());
        let pending = metrics.track("reviews", Operation::FindMany, async {
            std::future::pending::<()>().await;
            Ok::<_, AppError>(())
        });
        let timed_out = tokio::time::timeout(Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());

        let gauge = metrics
            .for_table("reviews")
            .unwrap()
            .in_flight
            .with_label_values(&["find_many"]);
        assert_eq!(gauge.get(), 0);
    }
}
