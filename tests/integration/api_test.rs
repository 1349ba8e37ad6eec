//! Integration tests for the HTTP surface.
//!
//! The first group runs without a database: every request here is answered
//! before any query is issued. The second group needs `DATABASE_URL` and is
//! run with `cargo test -- --ignored`.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_ping_returns_pong() {
    let app = TestApp::offline();

    let response = app.request("GET", "/ping", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "pong" }));
}

#[tokio::test]
async fn test_metrics_exposes_http_counters() {
    let app = TestApp::offline();
    app.request("GET", "/ping", None, None).await;

    let response = app.request("GET", "/metrics", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/plain"));
    assert!(response.text.contains("server_http_requests_total"));
    assert!(response.text.contains("endpoint=\"/ping\""));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/spaceships", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_bearer_token() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/cities",
            Some(json!({ "name": "Springfield", "population": 100000 })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_token_is_rejected() {
    let app = TestApp::offline();

    let response = app
        .request("DELETE", "/api/cities/1", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bulk_delete_requires_bearer_token() {
    let app = TestApp::offline();

    let response = app
        .request("DELETE", "/api/doctors?specialty=Cardiology", None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_appointment_reads_require_bearer_token() {
    let app = TestApp::offline();

    for path in [
        "/api/appointments",
        "/api/appointments/1",
        "/api/facilities/1/appointments",
    ] {
        let response = app.request("GET", path, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(response.body["error"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_review_requires_bearer_token() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/facilities/1/reviews",
            Some(json!({ "rating": 4.0, "user_id": 42 })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_validation_failure_lists_fields() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "a@b.com", "password": "" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(response.body["details"]["password"][0], "Password is required");
}

#[tokio::test]
async fn test_login_without_identifier_is_rejected() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "password": "longenough1" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::offline();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "not-an-email", "password": "longenough1" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::offline();

    let response = app
        .request("POST", "/api/auth/register", Some(json!([1, 2, 3])), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_BODY");
}

#[tokio::test]
async fn test_list_rejects_unknown_filter_column() {
    let app = TestApp::offline();

    let response = app
        .request("GET", "/api/cities?nickname=Shelbyville", None, None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("unknown field 'nickname'")
    );
}

#[tokio::test]
async fn test_unknown_facility_type_is_rejected() {
    let app = TestApp::offline();

    let response = app
        .request("GET", "/api/facilities/type/Spaceport", None, None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "degraded");
    assert_eq!(response.body["data"]["database"], "unreachable");
}

#[tokio::test]
async fn test_storage_failure_hides_cause() {
    let app = TestApp::offline();

    let response = app.request("GET", "/api/cities", None, None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Internal server error");
}

// ── Postgres-backed ──────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_register_login_and_me() {
    let app = TestApp::connected().await;

    let token = app.register_and_login("a@b.com", "longenough1").await;
    assert_eq!(token.split('.').count(), 3);

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["email"], "a@b.com");
    assert!(response.body["data"].get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::connected().await;
    app.register_and_login("dup@b.com", "longenough1").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "dup@b.com", "password": "longenough1" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_wrong_password_and_unknown_user_look_alike() {
    let app = TestApp::connected().await;
    app.register_and_login("c@d.com", "longenough1").await;

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "c@d.com", "password": "wrongpassword" })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@d.com", "password": "wrongpassword" })),
            None,
        )
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body, unknown.body);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_logout_ends_session() {
    let app = TestApp::connected().await;
    let token = app.register_and_login("e@f.com", "longenough1").await;

    let response = app
        .request("DELETE", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_city_crud_round_trip() {
    let app = TestApp::connected().await;
    let token = app.register_and_login("g@h.com", "longenough1").await;

    let response = app
        .request(
            "POST",
            "/api/cities",
            Some(json!({ "name": "Springfield", "population": 100000 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["data"]["id"].as_i64().unwrap();
    assert!(id > 0);

    let response = app
        .request("GET", &format!("/api/cities/{id}"), None, None)
        .await;
    assert_eq!(response.body["data"]["name"], "Springfield");
    assert_eq!(response.body["data"]["population"], 100000);

    let response = app
        .request(
            "PATCH",
            &format!("/api/cities/{id}"),
            Some(json!({ "population": 120000 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["population"], 120000);

    let response = app
        .request("GET", "/api/cities?name=Springfield", None, None)
        .await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);

    let response = app
        .request("DELETE", &format!("/api/cities/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/cities/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], format!("City {id} not found"));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_bulk_delete_with_empty_filter_is_rejected() {
    let app = TestApp::connected().await;
    let token = app.register_and_login("i@j.com", "longenough1").await;

    let response = app
        .request("DELETE", "/api/cities", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_verification_token_is_single_use() {
    let app = TestApp::connected().await;

    let response = app
        .request(
            "POST",
            "/api/auth/verification-tokens",
            Some(json!({ "identifier": "k@l.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let token = response.body["data"]["token"].as_str().unwrap().to_string();

    let path = format!("/api/auth/verification-tokens/k@l.com/{token}");
    let first = app.request("DELETE", &path, None, None).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.request("DELETE", &path, None, None).await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
    assert_eq!(second.body["message"], "Invalid token");
}
