//! End-to-end tests of the HTTP API through the axum router.

#![cfg(all(feature = "http-server", feature = "sqlite-repo"))]

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use incidents_api::db::{IncidentRepository, RepositoryError, RepositoryResult};
use incidents_api::http::{create_router, AppState};
use incidents_api::models::{Incident, ListQuery, NewIncident};
use support::{sample_incidents, TestStore};

fn app_for(store: &TestStore) -> Router {
    create_router(AppState::new(store.repo.clone()))
}

async fn seeded_store() -> TestStore {
    let store = TestStore::new();
    for new_incident in sample_incidents() {
        store.repo.insert_incident(&new_incident).await.unwrap();
    }
    store
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn list(app: Router, uri: &str) -> Vec<Value> {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    serde_json::from_str(&body).unwrap()
}

fn new_incident_body() -> Value {
    json!({
        "case_number": "19245020",
        "date": "2019-10-30",
        "time": "23:57:08",
        "code": 9954,
        "incident": "Proactive Police Visit",
        "police_grid": 87,
        "neighborhood_number": 7,
        "block": "THOMAS AV  & VICTORIA"
    })
}

// =========================================================
// GET /incidents
// =========================================================

#[tokio::test]
async fn test_list_empty_store() {
    let store = TestStore::new();
    let (status, body) = send(app_for(&store), Method::GET, "/incidents", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_list_newest_first_with_display_dates() {
    let store = seeded_store().await;
    let rows = list(app_for(&store), "/incidents").await;

    let case_numbers: Vec<&str> = rows
        .iter()
        .map(|r| r["case_number"].as_str().unwrap())
        .collect();
    assert_eq!(
        case_numbers,
        vec!["19245005", "19245004", "19245003", "19245002", "19245001"]
    );
    assert_eq!(rows[0]["date_time"], "2019-10-31 06:00:00");
    assert_eq!(rows[0]["code"], 600);
    assert_eq!(rows[0]["police_grid"], 120);
    assert_eq!(rows[0]["neighborhood_number"], 11);
    assert_eq!(rows[0]["block"], "98X UNIVERSITY AV W");
}

#[tokio::test]
async fn test_list_with_filters() {
    let store = seeded_store().await;

    let rows = list(app_for(&store), "/incidents?grid=87&code=110,9954").await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["police_grid"] == 87));

    let rows = list(app_for(&store), "/incidents?neighborhood=1,2").await;
    assert_eq!(rows.len(), 2);

    let rows = list(
        app_for(&store),
        "/incidents?start_date=2019-10-05&end_date=2019-10-31",
    )
    .await;
    let case_numbers: Vec<&str> = rows
        .iter()
        .map(|r| r["case_number"].as_str().unwrap())
        .collect();
    assert_eq!(case_numbers, vec!["19245004", "19245003", "19245002"]);
}

#[tokio::test]
async fn test_list_limit() {
    let store = seeded_store().await;

    let rows = list(app_for(&store), "/incidents?limit=3").await;
    assert_eq!(rows.len(), 3);

    let rows = list(app_for(&store), "/incidents?limit=1000").await;
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn test_list_rejects_limit_over_maximum() {
    let store = seeded_store().await;
    let (status, body) = send(app_for(&store), Method::GET, "/incidents?limit=1001", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "\"limit\" must be less than or equal to 1000");
}

#[tokio::test]
async fn test_list_rejects_non_numeric_code() {
    let store = seeded_store().await;
    let (status, body) = send(app_for(&store), Method::GET, "/incidents?code=abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("\"code\" with value \"abc\" fails to match"), "{}", body);
}

#[tokio::test]
async fn test_list_rejects_malformed_date() {
    let store = seeded_store().await;
    let (status, _) = send(
        app_for(&store),
        Method::GET,
        "/incidents?start_date=10/01/2019",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_unknown_parameter() {
    let store = seeded_store().await;
    let (status, body) = send(app_for(&store), Method::GET, "/incidents?color=red", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "\"color\" is not allowed");
}

// =========================================================
// POST /new-incident
// =========================================================

#[tokio::test]
async fn test_create_then_list() {
    let store = TestStore::new();

    let (status, body) = send(
        app_for(&store),
        Method::POST,
        "/new-incident",
        Some(new_incident_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let rows = list(
        app_for(&store),
        "/incidents?code=9954&start_date=2019-10-30",
    )
    .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["case_number"], "19245020");
    assert_eq!(rows[0]["date_time"], "2019-10-30 23:57:08");
    assert_eq!(rows[0]["incident"], "Proactive Police Visit");
}

#[tokio::test]
async fn test_create_missing_field_rejected() {
    let store = TestStore::new();
    let mut body = new_incident_body();
    body.as_object_mut().unwrap().remove("block");

    let (status, message) = send(app_for(&store), Method::POST, "/new-incident", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "\"block\" is required");
    assert_eq!(store.repo.count_incidents().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_bad_values() {
    let store = TestStore::new();

    let mut body = new_incident_body();
    body["code"] = json!(-3);
    let (status, message) = send(app_for(&store), Method::POST, "/new-incident", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "\"code\" must be a positive number");

    let mut body = new_incident_body();
    body["time"] = json!("11pm");
    let (status, _) = send(app_for(&store), Method::POST, "/new-incident", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = new_incident_body();
    body["weapon"] = json!("none");
    let (status, message) = send(app_for(&store), Method::POST, "/new-incident", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "\"weapon\" is not allowed");

    assert_eq!(store.repo.count_incidents().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_invalid_json() {
    let store = TestStore::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/new-incident")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app_for(&store).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).starts_with("Invalid JSON body:"));
}

#[tokio::test]
async fn test_create_duplicate_reports_store_message() {
    let store = TestStore::new();
    let (status, _) = send(
        app_for(&store),
        Method::POST,
        "/new-incident",
        Some(new_incident_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app_for(&store),
        Method::POST,
        "/new-incident",
        Some(new_incident_body()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("UNIQUE constraint failed"), "{}", body);
    assert_eq!(store.repo.count_incidents().await.unwrap(), 1);
}

// =========================================================
// DELETE /remove-incident
// =========================================================

#[tokio::test]
async fn test_remove_existing_incident() {
    let store = seeded_store().await;

    let (status, body) = send(
        app_for(&store),
        Method::DELETE,
        "/remove-incident",
        Some(json!({ "case_number": "19245003" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Deleted incident 19245003");
    assert_eq!(store.repo.count_incidents().await.unwrap(), 4);

    let (status, body) = send(
        app_for(&store),
        Method::DELETE,
        "/remove-incident",
        Some(json!({ "case_number": "19245003" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Incident with case number 19245003 does not exist");
}

#[tokio::test]
async fn test_remove_missing_incident_leaves_store_untouched() {
    let store = seeded_store().await;

    let (status, body) = send(
        app_for(&store),
        Method::DELETE,
        "/remove-incident",
        Some(json!({ "case_number": "99999999" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("does not exist"));
    assert_eq!(store.repo.count_incidents().await.unwrap(), 5);
}

#[tokio::test]
async fn test_remove_requires_case_number() {
    let store = seeded_store().await;

    let (status, body) = send(
        app_for(&store),
        Method::DELETE,
        "/remove-incident",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "\"case_number\" is required");
}

// =========================================================
// Health and failures
// =========================================================

#[tokio::test]
async fn test_health_reports_store() {
    let store = seeded_store().await;
    let (status, body) = send(app_for(&store), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "connected");
    assert_eq!(health["incidents"], 5);
}

/// A store whose every statement fails.
struct FailingRepository;

#[async_trait]
impl IncidentRepository for FailingRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Err(RepositoryError::connection("unable to open database file"))
    }

    async fn list_incidents(&self, _query: &ListQuery) -> RepositoryResult<Vec<Incident>> {
        Err(RepositoryError::query("no such table: Incidents"))
    }

    async fn insert_incident(&self, _incident: &NewIncident) -> RepositoryResult<()> {
        Err(RepositoryError::query("no such table: Incidents"))
    }

    async fn delete_incident(&self, _case_number: &str) -> RepositoryResult<usize> {
        Err(RepositoryError::query("no such table: Incidents"))
    }

    async fn count_incidents(&self) -> RepositoryResult<i64> {
        Err(RepositoryError::query("no such table: Incidents"))
    }
}

fn failing_app() -> Router {
    create_router(AppState::new(Arc::new(FailingRepository)))
}

#[tokio::test]
async fn test_store_failure_returns_raw_message() {
    let request = Request::builder()
        .uri("/incidents")
        .body(Body::empty())
        .unwrap();
    let response = failing_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{}", content_type);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"no such table: Incidents");
}

#[tokio::test]
async fn test_validation_runs_before_store() {
    // Validation failures never reach the failing store.
    let (status, _) = send(failing_app(), Method::GET, "/incidents?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        failing_app(),
        Method::POST,
        "/new-incident",
        Some(new_incident_body()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "no such table: Incidents");
}

#[tokio::test]
async fn test_health_reports_store_error() {
    let (status, body) = send(failing_app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["database"], "error: unable to open database file");
    assert!(health["incidents"].is_null());
}
