//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use prometheus::Registry;
use serde_json::Value;
use tower::ServiceExt;

use medidir_api::{AppState, build_app, build_state};
use medidir_core::config::AppConfig;
use medidir_database::DatabasePool;
use medidir_database::migration::run_migrations;

/// Tables emptied between Postgres-backed tests, children first.
const TABLES: &[&str] = &[
    "audit_log",
    "facility_appointments",
    "reviews",
    "verification_tokens",
    "sessions",
    "users",
    "facility_plans",
    "plans",
    "facility_operating_hours",
    "facility_insurance_providers",
    "insurance_providers",
    "facility_certifications",
    "facility_equipment",
    "facility_departments",
    "doctors",
    "facilities",
    "facility_categories",
    "cities",
];

/// Postgres-backed tests share one database, so they run one at a time.
static DATABASE_LOCK: Mutex<()> = Mutex::new(());

/// Configuration whose database is never reachable.
pub fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.host = "127.0.0.1".to_string();
    config.database.port = 1;
    config.database.min_connections = 0;
    config.database.connect_timeout_seconds = 1;
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config
}

/// Configuration pointing at `DATABASE_URL`.
pub fn database_config() -> AppConfig {
    let mut config = offline_config();
    config.database.url =
        Some(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test"));
    config.database.connect_timeout_seconds = 10;
    config
}

/// Exclusive access to the test database.
pub struct TestDatabase {
    pub db: DatabasePool,
    _lock: MutexGuard<'static, ()>,
}

/// Connect to `DATABASE_URL`, apply migrations, and empty every table.
pub async fn connect_database() -> TestDatabase {
    let lock = DATABASE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let db = DatabasePool::connect(&database_config().database)
        .await
        .expect("Failed to connect to test database");
    run_migrations(db.pool())
        .await
        .expect("Failed to run migrations");

    let truncate = format!("TRUNCATE {} RESTART IDENTITY CASCADE", TABLES.join(", "));
    sqlx::query(&truncate)
        .execute(db.pool())
        .await
        .expect("Failed to clean database");
    TestDatabase { db, _lock: lock }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The state behind the router
    pub state: AppState,
    _database: Option<TestDatabase>,
}

impl TestApp {
    /// An app whose pool connects lazily to an unreachable server. Routes
    /// that reject before touching storage behave exactly as in production.
    pub fn offline() -> Self {
        let config = offline_config();
        let db = DatabasePool::connect_lazy(&config.database).expect("lazy pool");
        Self::with(config, db, None)
    }

    /// An app backed by the `DATABASE_URL` database, freshly emptied.
    pub async fn connected() -> Self {
        let database = connect_database().await;
        let db = database.db.clone();
        Self::with(database_config(), db, Some(database))
    }

    fn with(config: AppConfig, db: DatabasePool, database: Option<TestDatabase>) -> Self {
        let state =
            build_state(Arc::new(config), db, Registry::new()).expect("Failed to build state");
        Self {
            router: build_app(state.clone()),
            state,
            _database: database,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            text,
            body,
        }
    }

    /// Register an account and log in, returning the bearer token.
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "name": "Test User",
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );

        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// `Content-Type` header, empty when absent
    pub content_type: String,
    /// Raw body
    pub text: String,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
}
